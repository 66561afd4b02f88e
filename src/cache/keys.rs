//! Cache key scheme
//!
//! One list namespace and one detail namespace per entity kind. List keys
//! carry an optional canonical query suffix so that filtered or paginated
//! views never share an entry with the default view.

use crate::catalog::EntityKind;

pub const TOPIC_LIST_KEY: &str = "topic_list";
pub const FOLDER_LIST_KEY: &str = "folder_list";
pub const DOCUMENT_LIST_KEY: &str = "document_list";

pub const TOPIC_DETAIL_KEY_PREFIX: &str = "topic_detail_";
pub const FOLDER_DETAIL_KEY_PREFIX: &str = "folder_detail_";
pub const DOCUMENT_DETAIL_KEY_PREFIX: &str = "document_detail_";

/// Base list key for a kind.
pub fn list_key(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Topic => TOPIC_LIST_KEY,
        EntityKind::Folder => FOLDER_LIST_KEY,
        EntityKind::Document => DOCUMENT_LIST_KEY,
    }
}

/// Detail key prefix for a kind.
pub fn detail_prefix(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Topic => TOPIC_DETAIL_KEY_PREFIX,
        EntityKind::Folder => FOLDER_DETAIL_KEY_PREFIX,
        EntityKind::Document => DOCUMENT_DETAIL_KEY_PREFIX,
    }
}

/// Detail key for one record, e.g. `topic_detail_1`.
pub fn detail_key(kind: EntityKind, id: u64) -> String {
    format!("{}{}", detail_prefix(kind), id)
}

/// List key for a specific set of query parameters.
///
/// Parameters are sorted by name and their values escaped, so the mapping
/// from (kind, parameter set) to key is injective. An empty set yields the
/// base list key.
pub fn list_variant_key(kind: EntityKind, params: &[(&str, String)]) -> String {
    let base = list_key(kind);
    if params.is_empty() {
        return base.to_string();
    }

    let mut sorted: Vec<&(&str, String)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0).then_with(|| a.1.cmp(&b.1)));

    let query = sorted
        .iter()
        .map(|(name, value)| format!("{}={}", escape(name), escape(value)))
        .collect::<Vec<_>>()
        .join("&");

    format!("{}?{}", base, query)
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '%' => out.push_str("%25"),
            '&' => out.push_str("%26"),
            '=' => out.push_str("%3D"),
            '?' => out.push_str("%3F"),
            _ => out.push(ch),
        }
    }
    out
}
