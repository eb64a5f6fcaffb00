use serde::Serialize;

use crate::services::CourseInfo;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Bare `{"success": bool}` body used by the preference endpoints.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub const fn new(success: bool) -> Self {
        Self { success }
    }
}

#[derive(Debug, Serialize)]
pub struct CourseInfoResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<CourseInfo>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthDto {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_response_shape() {
        let body = serde_json::to_string(&SuccessResponse::new(false)).unwrap();
        assert_eq!(body, r#"{"success":false}"#);
    }

    #[test]
    fn test_error_response_omits_data() {
        let body = serde_json::to_value(ApiResponse::<()>::error("nope")).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "nope");
        assert!(body.get("data").is_none());
    }

    #[test]
    fn test_missing_course_info_omits_info() {
        let body = serde_json::to_string(&CourseInfoResponse {
            success: false,
            info: None,
        })
        .unwrap();
        assert_eq!(body, r#"{"success":false}"#);
    }
}
