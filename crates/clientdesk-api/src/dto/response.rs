use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Ok,
    Error,
}

/// Envelope shared by every JSON endpoint: `data` on success, `msg` on failure.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub status: ResponseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn ok(data: T) -> Self {
        Self {
            status: ResponseStatus::Ok,
            data: Some(data),
            msg: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            data: None,
            msg: Some(msg.into()),
        }
    }
}

/// Body returned by delete and bulk-update endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AffectedRows {
    pub affected: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_omits_the_unused_side() {
        let ok = serde_json::to_value(ApiResponse::ok(AffectedRows { affected: 2 })).unwrap();
        assert_eq!(ok, serde_json::json!({ "status": "ok", "data": { "affected": 2 } }));

        let err = serde_json::to_value(ApiResponse::error("Project not found")).unwrap();
        assert_eq!(err, serde_json::json!({ "status": "error", "msg": "Project not found" }));
    }
}
