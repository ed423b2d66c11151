/**
 * Routes Module
 * API route handlers and the shared response envelope
 */
pub mod auth;
pub mod config;
pub mod health;
pub mod messages;
pub mod projects;
pub mod skills;
pub mod social_links;

use serde::{Deserialize, Serialize};

use crate::pagination::Pagination;

/// `{ success, message?, data?, pagination? }` wrapper used by every endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            pagination: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_pagination(mut self, pagination: Option<Pagination>) -> Self {
        self.pagination = pagination;
        self
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
            pagination: None,
        }
    }
}

/// Body of a 201 response.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedId {
    pub id: i64,
}

/// Trimmed, non-empty string field.
pub(crate) fn required(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// A patch field is either omitted or carries non-blank text.
pub(crate) fn present_or_absent(value: &Option<String>) -> bool {
    value.is_none() || required(value).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_envelope_omits_data() {
        let json = serde_json::to_value(ApiResponse::message("done")).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "message": "done"}));
    }

    #[test]
    fn test_data_envelope() {
        let json = serde_json::to_value(ApiResponse::data(CreatedId { id: 3 })).unwrap();
        assert_eq!(json["data"]["id"], 3);
        assert!(json.get("pagination").is_none());
    }

    #[test]
    fn test_required() {
        assert_eq!(required(&Some("  hi ".to_string())), Some("hi".to_string()));
        assert_eq!(required(&Some("   ".to_string())), None);
        assert_eq!(required(&None), None);
    }

    #[test]
    fn test_present_or_absent() {
        assert!(present_or_absent(&None));
        assert!(present_or_absent(&Some("x".to_string())));
        assert!(!present_or_absent(&Some(" ".to_string())));
    }
}
