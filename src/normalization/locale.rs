//! Language-variant selection for node text fields.
//!
//! Every title/tagline/description shown to a visitor goes through
//! [`Locales::resolve`] so one render never mixes languages for the same node.

use serde::{Deserialize, Serialize};

use crate::catalog::model::{Breadcrumb, ContentNode, LocalizedMap};

/// The two language slots the site supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocaleKey {
    Primary,
    Secondary,
}

/// Localizable text fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Tagline,
    Description,
}

/// Anything carrying base-language text with optional per-language variants.
pub trait Localized {
    fn base_text(&self, field: Field) -> &str;
    fn variants(&self, field: Field) -> Option<&LocalizedMap>;
}

impl Localized for ContentNode {
    fn base_text(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Tagline => &self.tagline,
            Field::Description => &self.description,
        }
    }

    fn variants(&self, field: Field) -> Option<&LocalizedMap> {
        Some(match field {
            Field::Title => &self.title_i18n,
            Field::Tagline => &self.tagline_i18n,
            Field::Description => &self.description_i18n,
        })
    }
}

impl Localized for Breadcrumb {
    fn base_text(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            _ => "",
        }
    }

    fn variants(&self, field: Field) -> Option<&LocalizedMap> {
        match field {
            Field::Title => Some(&self.title_i18n),
            _ => None,
        }
    }
}

/// Variant for `code` if present and non-empty.
pub fn localized_variant<'a, E: Localized + ?Sized>(
    entity: &'a E,
    code: &str,
    field: Field,
) -> Option<&'a str> {
    entity
        .variants(field)
        .and_then(|m| m.get(code))
        .map(String::as_str)
        .filter(|s| !s.trim().is_empty())
}

/// Variant for `code`, else the base field, else "".
pub fn resolve_field<E: Localized + ?Sized>(entity: &E, code: &str, field: Field) -> String {
    localized_variant(entity, code, field)
        .unwrap_or_else(|| entity.base_text(field))
        .to_string()
}

/// The configured primary/secondary language codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locales {
    primary: String,
    secondary: String,
}

impl Default for Locales {
    fn default() -> Self {
        Self::new("en", "ar")
    }
}

impl Locales {
    pub fn new(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self {
            primary: primary.into().trim().to_ascii_lowercase(),
            secondary: secondary.into().trim().to_ascii_lowercase(),
        }
    }

    /// First code is primary, second is secondary; missing slots keep the defaults.
    pub fn from_codes(codes: &[String]) -> Self {
        let defaults = Self::default();
        let primary = codes.first().cloned().unwrap_or(defaults.primary);
        let secondary = codes.get(1).cloned().unwrap_or(defaults.secondary);
        Self::new(primary, secondary)
    }

    /// Prefix test on the requested tag: anything not recognized as secondary is primary.
    pub fn key_for(&self, tag: &str) -> LocaleKey {
        let tag = tag.trim().to_ascii_lowercase();
        if !self.secondary.is_empty() && tag.starts_with(&self.secondary) {
            LocaleKey::Secondary
        } else {
            LocaleKey::Primary
        }
    }

    pub fn code(&self, key: LocaleKey) -> &str {
        match key {
            LocaleKey::Primary => &self.primary,
            LocaleKey::Secondary => &self.secondary,
        }
    }

    /// Both locales, primary first.
    pub fn all(&self) -> [LocaleKey; 2] {
        [LocaleKey::Primary, LocaleKey::Secondary]
    }

    pub fn resolve<E: Localized + ?Sized>(&self, entity: &E, key: LocaleKey, field: Field) -> String {
        resolve_field(entity, self.code(key), field)
    }
}
