use serde::{Deserialize, Serialize};

/// Where a recipe comes from and how it is encoded.
///
/// Exactly one of `content` and `location` is expected. Inline content wins
/// when both are present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    pub content_type: String,
}

impl RecipeDescriptor {
    pub fn inline(content: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            location: None,
            content_type: content_type.into(),
        }
    }

    pub fn remote(location: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            content: None,
            location: Some(location.into()),
            content_type: content_type.into(),
        }
    }
}
