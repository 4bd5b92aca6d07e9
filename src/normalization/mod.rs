pub mod locale;
pub mod title;

pub use locale::{resolve_field, Field, LocaleKey, Localized, Locales};
pub use title::TitleKey;
