use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Level of a node in the catalog tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Category,
    Group,
    #[default]
    Item,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Category => "category",
            NodeType::Group => "group",
            NodeType::Item => "item",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "category" => Ok(NodeType::Category),
            "group" => Ok(NodeType::Group),
            "item" => Ok(NodeType::Item),
            other => Err(format!("unknown node type: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

/// Language code -> localized text.
pub type LocalizedMap = BTreeMap<String, String>;

/// A category, group or item record as served by the backend.
///
/// Treated as an immutable value; the backend owns every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentNode {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(rename = "type", default)]
    pub node_type: NodeType,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, rename = "title_i18n", alias = "titleI18n")]
    pub title_i18n: LocalizedMap,
    #[serde(default)]
    pub tagline: String,
    #[serde(default, rename = "tagline_i18n", alias = "taglineI18n")]
    pub tagline_i18n: LocalizedMap,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "description_i18n", alias = "descriptionI18n")]
    pub description_i18n: LocalizedMap,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub images: Vec<ImageRef>,
    #[serde(default)]
    pub specs: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub order: i64,
    #[serde(default = "default_published")]
    pub is_published: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_published() -> bool {
    true
}

impl ContentNode {
    /// Minimal node; remaining fields take their serde defaults.
    pub fn new(
        id: impl Into<String>,
        node_type: NodeType,
        slug: impl Into<String>,
        parent: Option<&ContentNode>,
    ) -> Self {
        let slug = slug.into();
        let path = match parent {
            Some(p) => format!("{}/{}", p.path, slug),
            None => slug.clone(),
        };
        Self {
            id: id.into(),
            node_type,
            title: slug.clone(),
            slug,
            parent_id: parent.map(|p| p.id.clone()),
            path,
            title_i18n: LocalizedMap::new(),
            tagline: String::new(),
            tagline_i18n: LocalizedMap::new(),
            description: String::new(),
            description_i18n: LocalizedMap::new(),
            thumbnail: None,
            images: Vec::new(),
            specs: BTreeMap::new(),
            order: 0,
            is_published: true,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.order = order;
        self
    }

    pub fn has_images(&self) -> bool {
        self.images.iter().any(|img| !img.url.trim().is_empty())
    }

    /// Path segments, root first.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split('/').filter(|s| !s.is_empty())
    }

    pub fn breadcrumb(&self) -> Breadcrumb {
        Breadcrumb {
            title: self.title.clone(),
            slug: self.slug.clone(),
            title_i18n: self.title_i18n.clone(),
        }
    }
}

/// Read-only projection of one ancestor for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breadcrumb {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default, rename = "title_i18n", alias = "titleI18n")]
    pub title_i18n: LocalizedMap,
}

/// One page of a filtered listing. `total` is the server-side match count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogListing {
    pub items: Vec<ContentNode>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
}

impl CatalogListing {
    pub fn empty(page: u32, limit: u32) -> Self {
        Self {
            items: Vec::new(),
            page,
            limit,
            total: 0,
        }
    }
}

/// A node resolved by path together with its children and ancestor chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeWithChildren {
    pub node: ContentNode,
    #[serde(default)]
    pub children: Vec<ContentNode>,
    /// Root first, the node itself last.
    #[serde(default)]
    pub breadcrumbs: Vec<Breadcrumb>,
}

/// Closed set of accepted sort keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortKey {
    #[default]
    Order,
    OrderDesc,
    Title,
    TitleDesc,
    CreatedAt,
    CreatedAtDesc,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Order => "order",
            SortKey::OrderDesc => "-order",
            SortKey::Title => "title",
            SortKey::TitleDesc => "-title",
            SortKey::CreatedAt => "createdAt",
            SortKey::CreatedAtDesc => "-createdAt",
        }
    }

    /// Orders nodes in place the way the backend would for this key.
    pub fn sort(&self, nodes: &mut [ContentNode]) {
        match self {
            SortKey::Order => nodes.sort_by_key(|n| n.order),
            SortKey::OrderDesc => nodes.sort_by_key(|n| std::cmp::Reverse(n.order)),
            SortKey::Title => nodes.sort_by_key(|n| n.title.to_lowercase()),
            SortKey::TitleDesc => nodes.sort_by_key(|n| std::cmp::Reverse(n.title.to_lowercase())),
            SortKey::CreatedAt => nodes.sort_by_key(|n| n.created_at),
            SortKey::CreatedAtDesc => nodes.sort_by_key(|n| std::cmp::Reverse(n.created_at)),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "order" => Ok(SortKey::Order),
            "-order" => Ok(SortKey::OrderDesc),
            "title" => Ok(SortKey::Title),
            "-title" => Ok(SortKey::TitleDesc),
            "createdAt" => Ok(SortKey::CreatedAt),
            "-createdAt" => Ok(SortKey::CreatedAtDesc),
            other => Err(format!("unsupported sort key: {other}")),
        }
    }
}

/// Optional restrictions for `search_nodes`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    pub node_type: Option<NodeType>,
    pub sort: Option<SortKey>,
}

/// Parameters for the generic filtered listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
    pub sort: SortKey,
    pub node_type: Option<NodeType>,
    /// Parent node id.
    pub parent: Option<String>,
    pub q: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 20,
            sort: SortKey::Order,
            node_type: None,
            parent: None,
            q: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_backend_shape_with_aliases() {
        let raw = json!({
            "_id": "65f0",
            "type": "group",
            "slug": "pumps",
            "parentId": "c1",
            "path": "water/pumps",
            "title": "Pumps",
            "title_i18n": {"ar": "مضخات"},
            "images": [{"url": "https://cdn/x.jpg"}],
            "order": 3,
            "isPublished": false,
            "updatedAt": "2024-05-01T10:00:00Z"
        });
        let node: ContentNode = serde_json::from_value(raw).unwrap();
        assert_eq!(node.id, "65f0");
        assert_eq!(node.node_type, NodeType::Group);
        assert_eq!(node.parent_id.as_deref(), Some("c1"));
        assert_eq!(node.title_i18n.get("ar").map(String::as_str), Some("مضخات"));
        assert!(node.has_images());
        assert!(!node.is_published);
        assert!(node.updated_at.is_some());
    }

    #[test]
    fn sort_keys_parse_only_the_closed_set() {
        for key in ["order", "-order", "title", "-title", "createdAt", "-createdAt"] {
            let parsed: SortKey = key.parse().unwrap();
            assert_eq!(parsed.as_str(), key);
        }
        assert!("price".parse::<SortKey>().is_err());
    }

    #[test]
    fn new_node_derives_path_from_parent() {
        let cat = ContentNode::new("1", NodeType::Category, "water", None);
        let grp = ContentNode::new("2", NodeType::Group, "pumps", Some(&cat));
        let item = ContentNode::new("3", NodeType::Item, "p-100", Some(&grp));
        assert_eq!(item.path, "water/pumps/p-100");
        assert_eq!(item.segments().collect::<Vec<_>>(), ["water", "pumps", "p-100"]);
    }
}
