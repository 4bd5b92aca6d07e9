//! Hover-driven mega-menu: category → group → item columns disclosed progressively.
//!
//! State is a tagged union advanced by one transition function
//! ([`MenuState::next`]). The only reset point is `Closed` + `TriggerEnter`; hovering
//! the trigger of an already open menu keeps every active selection.
//!
//! Column contents are fetched lazily the first time a path is hovered and memoized
//! for the life of the controller. There is no eviction: the catalog is small and a
//! session is short. An LRU would be needed if the tree stops being bounded.

use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

use super::breadcrumbs::select_listing;
use super::debounce::DebounceTimer;
use crate::catalog::error::CatalogResult;
use crate::catalog::model::{ContentNode, NodeType, SortKey};
use crate::catalog::repository::CatalogRepository;

pub const DEFAULT_CLOSE_DELAY: Duration = Duration::from_millis(150);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuState {
    Closed,
    /// Open, only the category column showing.
    Categories,
    /// A category is hovered; its groups column may appear.
    Groups { category: String },
    /// A group inside the open category is hovered; its items column may appear.
    Items { category: String, group: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEvent {
    TriggerEnter,
    /// Pointer re-entered the menu region.
    PointerEnter,
    /// Pointer left the menu region.
    PointerLeave,
    CategoryHover(String),
    GroupHover(String),
    CloseTimerFired,
}

impl MenuState {
    pub fn is_open(&self) -> bool {
        !matches!(self, MenuState::Closed)
    }

    pub fn active_category(&self) -> Option<&str> {
        match self {
            MenuState::Groups { category } | MenuState::Items { category, .. } => Some(category),
            _ => None,
        }
    }

    pub fn active_group(&self) -> Option<&str> {
        match self {
            MenuState::Items { group, .. } => Some(group),
            _ => None,
        }
    }

    /// The transition function.
    pub fn next(&self, event: &MenuEvent) -> MenuState {
        match (self, event) {
            (MenuState::Closed, MenuEvent::TriggerEnter) => MenuState::Categories,
            (MenuState::Closed, _) => MenuState::Closed,
            (_, MenuEvent::CloseTimerFired) => MenuState::Closed,
            (_, MenuEvent::CategoryHover(path)) => {
                if self.active_category() == Some(path.as_str()) {
                    self.clone()
                } else {
                    MenuState::Groups {
                        category: path.clone(),
                    }
                }
            }
            (
                MenuState::Groups { category } | MenuState::Items { category, .. },
                MenuEvent::GroupHover(path),
            ) => MenuState::Items {
                category: category.clone(),
                group: path.clone(),
            },
            // TriggerEnter while open, pointer enter/leave, stray group hovers.
            _ => self.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuLevel {
    Groups,
    Items,
}

/// A column fetch the caller must run and report back through
/// [`MegaMenu::complete_fetch`] or [`MegaMenu::abandon_fetch`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchRequest {
    pub level: MenuLevel,
    pub path: String,
}

/// Panel width, derived only from how many columns have content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelWidth {
    One,
    Two,
    Three,
}

impl PanelWidth {
    pub fn for_columns(populated: usize) -> Self {
        match populated {
            0 | 1 => PanelWidth::One,
            2 => PanelWidth::Two,
            _ => PanelWidth::Three,
        }
    }

    pub fn columns(&self) -> usize {
        match self {
            PanelWidth::One => 1,
            PanelWidth::Two => 2,
            PanelWidth::Three => 3,
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            PanelWidth::One => "w-[280px]",
            PanelWidth::Two => "w-[560px]",
            PanelWidth::Three => "w-[840px]",
        }
    }
}

/// What the menu renders right now.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuView<'a> {
    pub open: bool,
    pub categories: &'a [ContentNode],
    pub active_category: Option<&'a str>,
    pub active_group: Option<&'a str>,
    /// Present only when the active category's list is loaded and non-empty.
    pub groups: Option<&'a [ContentNode]>,
    pub groups_loading: bool,
    /// Present only when the active group's list is loaded and non-empty.
    pub items: Option<&'a [ContentNode]>,
    pub items_loading: bool,
    pub width: PanelWidth,
}

#[derive(Debug)]
pub struct MegaMenu {
    state: MenuState,
    close_timer: DebounceTimer,
    categories: Vec<ContentNode>,
    groups: HashMap<String, Vec<ContentNode>>,
    items: HashMap<String, Vec<ContentNode>>,
    has_groups: HashMap<String, bool>,
    has_items: HashMap<String, bool>,
    in_flight: HashSet<FetchRequest>,
}

impl Default for MegaMenu {
    fn default() -> Self {
        Self::new(DEFAULT_CLOSE_DELAY)
    }
}

impl MegaMenu {
    pub fn new(close_delay: Duration) -> Self {
        Self {
            state: MenuState::Closed,
            close_timer: DebounceTimer::new(close_delay),
            categories: Vec::new(),
            groups: HashMap::new(),
            items: HashMap::new(),
            has_groups: HashMap::new(),
            has_items: HashMap::new(),
            in_flight: HashSet::new(),
        }
    }

    pub fn state(&self) -> &MenuState {
        &self.state
    }

    pub fn close_pending(&self) -> bool {
        self.close_timer.is_pending()
    }

    pub fn set_categories(&mut self, categories: Vec<ContentNode>) {
        self.categories = categories;
    }

    pub async fn load_categories(&mut self, repo: &CatalogRepository) {
        self.categories = repo.fetch_root_categories().await.items;
    }

    /// `Some(flag)` once the category's groups have been fetched.
    pub fn category_has_children(&self, path: &str) -> Option<bool> {
        self.has_groups.get(path).copied()
    }

    /// `Some(flag)` once the group's items have been fetched.
    pub fn group_has_children(&self, path: &str) -> Option<bool> {
        self.has_items.get(path).copied()
    }

    /// Apply one pointer/timer event. Returns the column fetch this event requires,
    /// if the target path is neither cached nor already being fetched.
    pub fn handle(&mut self, event: MenuEvent, now: Instant) -> Option<FetchRequest> {
        match &event {
            MenuEvent::TriggerEnter | MenuEvent::PointerEnter => self.close_timer.cancel(),
            MenuEvent::PointerLeave if self.state.is_open() => self.close_timer.restart(now),
            MenuEvent::CloseTimerFired => self.close_timer.cancel(),
            _ => {}
        }

        let next = self.state.next(&event);
        if next != self.state {
            debug!(target = "menu", from = ?self.state, to = ?next, "menu transition");
        }
        self.state = next;

        match event {
            MenuEvent::CategoryHover(_) => {
                let path = self.state.active_category()?.to_string();
                self.request(MenuLevel::Groups, path)
            }
            MenuEvent::GroupHover(_) => {
                let category = self.state.active_category()?.to_string();
                let group = self.state.active_group()?.to_string();
                if self.is_leaf_in_column(&category, &group) {
                    // Flat categories list items in the second column; they have no children.
                    self.items.entry(group.clone()).or_default();
                    self.has_items.insert(group, false);
                    return None;
                }
                self.request(MenuLevel::Items, group)
            }
            _ => None,
        }
    }

    /// Close the menu if the close delay has elapsed. Returns true when it closed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.close_timer.fire_if_due(now) {
            self.handle(MenuEvent::CloseTimerFired, now);
            return true;
        }
        false
    }

    fn is_leaf_in_column(&self, category: &str, path: &str) -> bool {
        self.groups
            .get(category)
            .and_then(|col| col.iter().find(|n| n.path == path))
            .is_some_and(|n| n.node_type == NodeType::Item)
    }

    fn request(&mut self, level: MenuLevel, path: String) -> Option<FetchRequest> {
        let cached = match level {
            MenuLevel::Groups => self.groups.contains_key(&path),
            MenuLevel::Items => self.items.contains_key(&path),
        };
        if cached {
            return None;
        }
        let request = FetchRequest { level, path };
        if !self.in_flight.insert(request.clone()) {
            debug!(target = "menu", path = %request.path, "fetch already in flight");
            return None;
        }
        Some(request)
    }

    /// Store a finished fetch. The result is always cached; the return value says
    /// whether its path is still the active one (i.e. whether it is now visible).
    pub fn complete_fetch(&mut self, request: &FetchRequest, nodes: Vec<ContentNode>) -> bool {
        self.in_flight.remove(request);
        let non_empty = !nodes.is_empty();
        let active = match request.level {
            MenuLevel::Groups => {
                self.groups.insert(request.path.clone(), nodes);
                self.has_groups.insert(request.path.clone(), non_empty);
                self.state.active_category() == Some(request.path.as_str())
            }
            MenuLevel::Items => {
                self.items.insert(request.path.clone(), nodes);
                self.has_items.insert(request.path.clone(), non_empty);
                self.state.active_group() == Some(request.path.as_str())
            }
        };
        if !active {
            debug!(target = "menu", path = %request.path, "fetched column no longer active; cached only");
        }
        active
    }

    /// Forget a failed fetch so the next hover retries it.
    pub fn abandon_fetch(&mut self, request: &FetchRequest) {
        self.in_flight.remove(request);
    }

    /// Load one column from the repository.
    ///
    /// Group columns follow the listing policy, so a category without groups shows
    /// its items directly.
    pub async fn fetch(
        repo: &CatalogRepository,
        request: &FetchRequest,
    ) -> CatalogResult<Vec<ContentNode>> {
        let resolved = repo
            .fetch_node_with_children(&request.path, SortKey::Order)
            .await?;
        Ok(select_listing(&resolved.node, &resolved.children))
    }

    /// `handle` followed by running any fetch it asks for. Returns true when a fetched
    /// column became visible.
    pub async fn dispatch(
        &mut self,
        repo: &CatalogRepository,
        event: MenuEvent,
        now: Instant,
    ) -> bool {
        let Some(request) = self.handle(event, now) else {
            return false;
        };
        match Self::fetch(repo, &request).await {
            Ok(nodes) => self.complete_fetch(&request, nodes),
            Err(err) => {
                warn!(target = "menu", path = %request.path, error = %err, "menu column fetch failed");
                self.abandon_fetch(&request);
                false
            }
        }
    }

    pub fn view(&self) -> MenuView<'_> {
        let open = self.state.is_open();
        let active_category = self.state.active_category();
        let active_group = self.state.active_group();

        let groups = active_category
            .and_then(|c| self.groups.get(c))
            .filter(|col| !col.is_empty())
            .map(Vec::as_slice);
        let groups_loading = active_category.is_some_and(|c| {
            self.in_flight.contains(&FetchRequest {
                level: MenuLevel::Groups,
                path: c.to_string(),
            })
        });
        let items = active_group
            .and_then(|g| self.items.get(g))
            .filter(|col| !col.is_empty())
            .map(Vec::as_slice);
        let items_loading = active_group.is_some_and(|g| {
            self.in_flight.contains(&FetchRequest {
                level: MenuLevel::Items,
                path: g.to_string(),
            })
        });

        let populated = usize::from(!self.categories.is_empty())
            + usize::from(groups.is_some())
            + usize::from(items.is_some());

        MenuView {
            open,
            categories: &self.categories,
            active_category,
            active_group,
            groups,
            groups_loading,
            items,
            items_loading,
            width: PanelWidth::for_columns(populated),
        }
    }
}
