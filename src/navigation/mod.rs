pub mod breadcrumbs;
pub mod debounce;
pub mod mega_menu;
pub mod page;
pub mod related;

pub use breadcrumbs::{build_trail, select_listing, verify_path, Crumb, Trail};
pub use debounce::{DebounceTimer, SearchDebouncer};
pub use mega_menu::{FetchRequest, MegaMenu, MenuEvent, MenuLevel, MenuState, MenuView, PanelWidth};
pub use page::{load_node_page, NodeCard, NodePage};
pub use related::{parent_path, related_nodes};
