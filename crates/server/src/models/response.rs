//! Uniform response envelope.

use serde::Serialize;

/// Envelope wrapping every API response body.
///
/// Success and failure share the shape `{ success, message, data? }`;
/// `data` is omitted entirely when absent rather than serialized as null.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Human-readable outcome description.
    pub message: String,
    /// Operation payload, present on success when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Successful envelope with a payload.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Failed envelope; carries no payload.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_includes_data() {
        let envelope = ApiResponse::ok("Item retrieved successfully", 42);
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "success": true,
                "message": "Item retrieved successfully",
                "data": 42,
            })
        );
    }

    #[test]
    fn test_failure_omits_data_key() {
        let envelope = ApiResponse::<()>::failure("Item not found");
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "success": false,
                "message": "Item not found",
            })
        );
        assert!(json.get("data").is_none());
    }
}
