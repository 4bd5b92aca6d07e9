//! Per-locale pathname table.
//!
//! Maps logical route keys to the locale-specific URL template. Breadcrumb links and
//! the sitemap both read from it; neither owns it.

use itertools::Itertools;
use serde::Serialize;
use std::collections::HashMap;

use crate::normalization::{LocaleKey, Locales};

const SEGMENTS_SLOT: &str = "[...segments]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteKey {
    Home,
    About,
    Contact,
    Products,
    /// Catalog node addressed by its path segments.
    ProductDetail,
}

impl RouteKey {
    /// Routes emitted once per locale regardless of catalog content.
    pub const STATIC: [RouteKey; 4] = [
        RouteKey::Home,
        RouteKey::About,
        RouteKey::Contact,
        RouteKey::Products,
    ];
}

#[derive(Debug, Clone)]
pub struct RouteTable {
    templates: HashMap<(RouteKey, LocaleKey), String>,
}

impl RouteTable {
    /// Locale-prefixed table: `/<code>`, `/<code>/about`, `/<code>/products/[...segments]`.
    pub fn localized(locales: &Locales) -> Self {
        let mut templates = HashMap::new();
        for key in locales.all() {
            let prefix = format!("/{}", locales.code(key));
            templates.insert((RouteKey::Home, key), prefix.clone());
            templates.insert((RouteKey::About, key), format!("{prefix}/about"));
            templates.insert((RouteKey::Contact, key), format!("{prefix}/contact"));
            templates.insert((RouteKey::Products, key), format!("{prefix}/products"));
            templates.insert(
                (RouteKey::ProductDetail, key),
                format!("{prefix}/products/{SEGMENTS_SLOT}"),
            );
        }
        Self { templates }
    }

    /// Override one entry, e.g. a translated pathname for the secondary locale.
    pub fn with_template(
        mut self,
        route: RouteKey,
        locale: LocaleKey,
        template: impl Into<String>,
    ) -> Self {
        self.templates.insert((route, locale), template.into());
        self
    }

    /// Localized pathname for `route`; `segments` fill the `[...segments]` slot.
    pub fn href(&self, route: RouteKey, locale: LocaleKey, segments: &[&str]) -> String {
        let template = self
            .templates
            .get(&(route, locale))
            .map(String::as_str)
            .unwrap_or("/");
        if !template.contains(SEGMENTS_SLOT) {
            return template.to_string();
        }
        let joined = segments
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| urlencoding::encode(s))
            .join("/");
        let filled = template.replace(SEGMENTS_SLOT, &joined);
        filled.trim_end_matches('/').to_string()
    }

    /// Detail pathname for a materialized path.
    pub fn node_href(&self, locale: LocaleKey, path: &str) -> String {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        self.href(RouteKey::ProductDetail, locale, &segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_prefixed_paths_per_locale() {
        let table = RouteTable::localized(&Locales::default());
        assert_eq!(table.href(RouteKey::Home, LocaleKey::Primary, &[]), "/en");
        assert_eq!(
            table.href(RouteKey::About, LocaleKey::Secondary, &[]),
            "/ar/about"
        );
        assert_eq!(
            table.node_href(LocaleKey::Secondary, "water/pumps/p-100"),
            "/ar/products/water/pumps/p-100"
        );
    }

    #[test]
    fn overrides_replace_single_entries() {
        let table = RouteTable::localized(&Locales::default()).with_template(
            RouteKey::ProductDetail,
            LocaleKey::Secondary,
            "/ar/montajat/[...segments]",
        );
        assert_eq!(
            table.node_href(LocaleKey::Secondary, "water"),
            "/ar/montajat/water"
        );
        assert_eq!(
            table.node_href(LocaleKey::Primary, "water"),
            "/en/products/water"
        );
    }

    #[test]
    fn segments_are_percent_encoded() {
        let table = RouteTable::localized(&Locales::default());
        assert_eq!(
            table.node_href(LocaleKey::Primary, "a b/c"),
            "/en/products/a%20b/c"
        );
    }
}
