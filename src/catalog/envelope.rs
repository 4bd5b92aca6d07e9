//! Response envelope normalization.
//!
//! The backend has served listings as a bare array, as `{items, page, limit, total}`,
//! as `{data: [...], total}` and as `{data: {items, ...}}`. Each function here accepts
//! every tolerated shape and returns the one canonical type, so call sites never
//! sniff payloads themselves.

use serde_json::Value;
use tracing::debug;

use super::error::{CatalogError, CatalogResult};
use super::model::{Breadcrumb, CatalogListing, ContentNode, NodeWithChildren};

fn as_u64(v: &Value) -> Option<u64> {
    v.as_u64()
        .or_else(|| v.as_i64().and_then(|n| u64::try_from(n).ok()))
        .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
}

fn decode_nodes(arr: &[Value]) -> Vec<ContentNode> {
    arr.iter()
        .filter_map(|raw| match serde_json::from_value::<ContentNode>(raw.clone()) {
            Ok(node) => Some(node),
            Err(err) => {
                debug!(target = "catalog", error = %err, "skipping undecodable node");
                None
            }
        })
        .collect()
}

/// Normalize any tolerated listing payload. `page`/`limit` are the request values and
/// fill in whatever the payload leaves out.
pub fn listing_from_value(value: &Value, page: u32, limit: u32) -> CatalogResult<CatalogListing> {
    let (items_raw, meta): (&Vec<Value>, Option<&Value>) = match value {
        Value::Array(arr) => (arr, None),
        Value::Object(obj) => {
            if let Some(arr) = obj.get("items").and_then(Value::as_array) {
                (arr, Some(value))
            } else if let Some(data) = obj.get("data") {
                match data {
                    Value::Array(arr) => (arr, Some(value)),
                    Value::Object(_) => {
                        let mut inner = listing_from_value(data, page, limit)?;
                        // Outer totals win when the envelope carries them.
                        if let Some(total) = obj.get("total").and_then(as_u64) {
                            inner.total = total;
                        }
                        return Ok(inner);
                    }
                    _ => {
                        return Err(CatalogError::Payload(
                            "listing `data` is neither array nor object".into(),
                        ))
                    }
                }
            } else {
                return Err(CatalogError::Payload(
                    "listing object without `items` or `data`".into(),
                ));
            }
        }
        _ => return Err(CatalogError::Payload("listing is not an array or object".into())),
    };

    let items = decode_nodes(items_raw);
    let field = |key: &str| meta.and_then(|m| m.get(key)).and_then(as_u64);
    let page = field("page").map(|p| p as u32).unwrap_or(page);
    let requested_limit = field("limit").map(|l| l as u32).unwrap_or(limit);
    // Keep `items.len() <= limit` without dropping data the server chose to send.
    let limit = requested_limit.max(items.len() as u32);
    let total = field("total")
        .or_else(|| field("count"))
        .unwrap_or(items.len() as u64);

    Ok(CatalogListing {
        items,
        page,
        limit,
        total,
    })
}

/// Normalize `{node, children, breadcrumbs}`, optionally wrapped in `data`.
pub fn node_with_children_from_value(value: &Value) -> CatalogResult<NodeWithChildren> {
    let body = match value.get("data") {
        Some(inner @ Value::Object(_)) => inner,
        _ => value,
    };
    let node_raw = body
        .get("node")
        .ok_or_else(|| CatalogError::Payload("node payload without `node`".into()))?;
    let node: ContentNode = serde_json::from_value(node_raw.clone())?;

    let children = body
        .get("children")
        .and_then(Value::as_array)
        .map(|arr| decode_nodes(arr))
        .unwrap_or_default();

    let breadcrumbs = body
        .get("breadcrumbs")
        .or_else(|| body.get("ancestors"))
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(|b| serde_json::from_value::<Breadcrumb>(b.clone()).ok())
                .collect()
        })
        .unwrap_or_default();

    Ok(NodeWithChildren {
        node,
        children,
        breadcrumbs,
    })
}

/// Normalize a single-node detail payload: bare object, `{data}` or `{node}`.
pub fn node_from_value(value: &Value) -> CatalogResult<ContentNode> {
    let body = value
        .get("data")
        .filter(|v| v.is_object())
        .or_else(|| value.get("node").filter(|v| v.is_object()))
        .unwrap_or(value);
    if !body.is_object() {
        return Err(CatalogError::Payload("node detail is not an object".into()));
    }
    Ok(serde_json::from_value(body.clone())?)
}
