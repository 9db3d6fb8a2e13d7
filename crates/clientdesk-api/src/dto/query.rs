use clientdesk_types::{PaymentStatus, ProjectStatus};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProjectQuery {
    /// Case-insensitive match on the project name
    pub search: Option<String>,
    pub status: Option<ProjectStatus>,
    pub client_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ClientQuery {
    /// Matches name, company or email
    pub search: Option<String>,
    #[serde(default = "defaults::limit")]
    pub limit: i64,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaymentQuery {
    pub project_id: Option<Uuid>,
    pub status: Option<PaymentStatus>,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TeamPaymentQuery {
    pub user_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub status: Option<PaymentStatus>,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RateQuery {
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MeetingQuery {
    /// Days ahead to look for upcoming meetings
    #[serde(default = "defaults::upcoming_days")]
    pub days: i64,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ActivityQuery {
    pub project_id: Option<Uuid>,
    #[serde(default = "defaults::limit")]
    pub limit: i64,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NotificationQuery {
    #[serde(default)]
    pub unread_only: bool,
    #[serde(default = "defaults::limit")]
    pub limit: i64,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TrendQuery {
    #[serde(default = "defaults::months_back")]
    pub months_back: u32,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StorageListQuery {
    pub prefix: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RealtimeQuery {
    /// Comma separated table names, every table when omitted
    pub tables: Option<String>,
}

pub mod defaults {
    pub const fn limit() -> i64 {
        50
    }

    pub const fn upcoming_days() -> i64 {
        7
    }

    pub const fn months_back() -> u32 {
        clientdesk_analytics::DEFAULT_MONTHS_BACK
    }
}

/// Upper bound applied to every client supplied `limit`.
pub const MAX_LIMIT: i64 = 500;

pub fn clamp_limit(limit: i64) -> i64 {
    limit.clamp(1, MAX_LIMIT)
}
