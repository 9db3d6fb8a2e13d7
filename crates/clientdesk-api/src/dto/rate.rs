use chrono::{DateTime, Utc};
use clientdesk_db::models::TeamPaymentRate;
use clientdesk_types::{Currency, RateType};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RateDTO {
    pub id: Uuid,
    pub user_id: Uuid,
    pub project_id: Option<Uuid>,
    pub rate_type: String,
    pub rate_amount: String,
    pub currency: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TeamPaymentRate> for RateDTO {
    fn from(rate: TeamPaymentRate) -> Self {
        Self {
            id: rate.id,
            user_id: rate.user_id,
            project_id: rate.project_id,
            rate_type: rate.rate_type,
            rate_amount: rate.rate_amount.to_string(),
            currency: rate.currency,
            is_active: rate.is_active,
            created_at: rate.created_at,
            updated_at: rate.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateRateRequest {
    pub user_id: Uuid,
    pub project_id: Option<Uuid>,
    pub rate_type: RateType,
    pub rate_amount: String,
    pub currency: Option<Currency>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateRateRequest {
    pub project_id: Option<Uuid>,
    pub rate_type: Option<RateType>,
    pub rate_amount: Option<String>,
    pub currency: Option<Currency>,
    pub is_active: Option<bool>,
}
