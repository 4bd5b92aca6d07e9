pub mod gallery;

pub use gallery::{hydrate_gallery, DEFAULT_LOOKUP_BUDGET};
