use chrono::{DateTime, Utc};
use clientdesk_db::models::{Payment, TeamPayment};
use clientdesk_types::{Currency, PaymentStatus};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Client-facing payment
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentDTO {
    pub id: Uuid,
    pub project_id: Uuid,
    pub user_id: Option<Uuid>,
    pub amount: String, // Decimal as string for precision
    pub currency: String,
    pub status: String,
    pub payment_type: String,
    pub payment_date: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Payment> for PaymentDTO {
    fn from(payment: Payment) -> Self {
        Self {
            id: payment.id,
            project_id: payment.project_id,
            user_id: payment.user_id,
            amount: payment.amount.to_string(),
            currency: payment.currency,
            status: payment.status,
            payment_type: payment.payment_type,
            payment_date: payment.payment_date,
            due_date: payment.due_date,
            description: payment.description,
            created_at: payment.created_at,
            updated_at: payment.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreatePaymentRequest {
    pub project_id: Uuid,
    pub user_id: Option<Uuid>,
    pub amount: String,
    pub currency: Option<Currency>,
    pub status: Option<PaymentStatus>,
    pub payment_type: String,
    pub due_date: Option<DateTime<Utc>>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdatePaymentRequest {
    pub amount: Option<String>,
    pub currency: Option<Currency>,
    /// Use the mark-paid endpoint to settle a payment
    pub status: Option<PaymentStatus>,
    pub payment_type: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub description: Option<String>,
}

/// Internal payout to a team member
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TeamPaymentDTO {
    pub id: Uuid,
    pub project_id: Option<Uuid>,
    pub user_id: Uuid,
    pub amount: String,
    pub currency: String,
    pub status: String,
    pub payment_type: String,
    pub payment_date: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TeamPayment> for TeamPaymentDTO {
    fn from(payment: TeamPayment) -> Self {
        Self {
            id: payment.id,
            project_id: payment.project_id,
            user_id: payment.user_id,
            amount: payment.amount.to_string(),
            currency: payment.currency,
            status: payment.status,
            payment_type: payment.payment_type,
            payment_date: payment.payment_date,
            due_date: payment.due_date,
            description: payment.description,
            created_at: payment.created_at,
            updated_at: payment.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateTeamPaymentRequest {
    pub project_id: Option<Uuid>,
    pub user_id: Uuid,
    pub amount: String,
    pub currency: Option<Currency>,
    pub status: Option<PaymentStatus>,
    pub payment_type: String,
    pub due_date: Option<DateTime<Utc>>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateTeamPaymentRequest {
    pub project_id: Option<Uuid>,
    pub amount: Option<String>,
    pub currency: Option<Currency>,
    pub status: Option<PaymentStatus>,
    pub payment_type: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub description: Option<String>,
}
