//! Request DTOs for the catalog API
//!
//! Defines the structure of incoming JSON bodies and list query strings.

use serde::{Deserialize, Deserializer};

use crate::error::{CatalogError, Result};

/// Maximum length of a record name in characters
pub const MAX_NAME_LENGTH: usize = 200;

/// Body for creating or updating a topic.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopicRequest {
    #[serde(default)]
    pub name: Option<String>,
}

/// Body for creating or updating a folder.
///
/// `parent` distinguishes an absent field (keep) from `null` (move to root).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FolderRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub parent: Option<Option<u64>>,
}

/// Query string accepted by the list endpoints.
///
/// `page` and `page_size` stay raw so a malformed value reaches the
/// pagination rules instead of failing extraction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub page_size: Option<String>,
    /// Topic name filter, honoured by the document list only
    pub topic: Option<String>,
}

fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Validates a record name: required, non-blank, at most
/// [`MAX_NAME_LENGTH`] characters.
pub fn validate_name(name: Option<&str>) -> Result<String> {
    let name = name
        .ok_or_else(|| CatalogError::Validation("name: this field is required".to_string()))?;
    validate_present_name(name)
}

/// Validates a name that was supplied. Used for partial updates.
pub fn validate_present_name(name: &str) -> Result<String> {
    if name.trim().is_empty() {
        return Err(CatalogError::Validation(
            "name: this field may not be blank".to_string(),
        ));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(CatalogError::Validation(format!(
            "name: ensure this field has no more than {} characters",
            MAX_NAME_LENGTH
        )));
    }
    Ok(name.to_string())
}

/// Validates an optional name: absent passes, present must be valid.
pub fn validate_optional_name(name: Option<&str>) -> Result<Option<String>> {
    name.map(validate_present_name).transpose()
}
