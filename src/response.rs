use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct Meta {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub total: Option<i64>,
}

impl Meta {
    pub fn new(page: i64, per_page: i64, total: i64) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
            total: Some(total),
        }
    }

    pub fn empty() -> Self {
        Self {
            page: None,
            per_page: None,
            total: None,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    /// Severity hint for the frontend toast: "success", "warning" or "error".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub data: Option<T>,
    pub meta: Option<Meta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T, meta: Option<Meta>) -> Self {
        Self {
            message: message.into(),
            icon: None,
            data: Some(data),
            meta,
        }
    }

    pub fn with_icon(message: impl Into<String>, icon: &str, data: T) -> Self {
        Self {
            message: message.into(),
            icon: Some(icon.to_string()),
            data: Some(data),
            meta: None,
        }
    }
}
