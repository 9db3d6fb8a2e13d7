use chrono::{DateTime, Utc};
use clientdesk_db::models::{Payment, TeamPayment};
use clientdesk_types::PaymentStatus;
use rust_decimal::Decimal;
use uuid::Uuid;

/// Read access shared by client payments and team payouts.
pub trait PaymentRecord {
    fn id(&self) -> Uuid;
    fn project_id(&self) -> Option<Uuid>;
    fn user_id(&self) -> Option<Uuid>;
    fn amount(&self) -> Decimal;
    fn currency(&self) -> &str;
    fn status(&self) -> &str;
    fn payment_date(&self) -> Option<DateTime<Utc>>;
    fn due_date(&self) -> Option<DateTime<Utc>>;
    fn created_at(&self) -> DateTime<Utc>;

    fn is_paid(&self) -> bool {
        self.status() == PaymentStatus::Paid.as_str()
    }

    fn is_outstanding(&self) -> bool {
        self.status()
            .parse::<PaymentStatus>()
            .is_ok_and(PaymentStatus::is_outstanding)
    }

    /// Date used to place a payment in time: when it was paid, or when it was recorded.
    fn effective_date(&self) -> DateTime<Utc> {
        self.payment_date().unwrap_or_else(|| self.created_at())
    }
}

impl PaymentRecord for Payment {
    fn id(&self) -> Uuid {
        self.id
    }
    fn project_id(&self) -> Option<Uuid> {
        Some(self.project_id)
    }
    fn user_id(&self) -> Option<Uuid> {
        self.user_id
    }
    fn amount(&self) -> Decimal {
        self.amount
    }
    fn currency(&self) -> &str {
        &self.currency
    }
    fn status(&self) -> &str {
        &self.status
    }
    fn payment_date(&self) -> Option<DateTime<Utc>> {
        self.payment_date
    }
    fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl PaymentRecord for TeamPayment {
    fn id(&self) -> Uuid {
        self.id
    }
    fn project_id(&self) -> Option<Uuid> {
        self.project_id
    }
    fn user_id(&self) -> Option<Uuid> {
        Some(self.user_id)
    }
    fn amount(&self) -> Decimal {
        self.amount
    }
    fn currency(&self) -> &str {
        &self.currency
    }
    fn status(&self) -> &str {
        &self.status
    }
    fn payment_date(&self) -> Option<DateTime<Utc>> {
        self.payment_date
    }
    fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl<P: PaymentRecord> PaymentRecord for &P {
    fn id(&self) -> Uuid {
        (**self).id()
    }
    fn project_id(&self) -> Option<Uuid> {
        (**self).project_id()
    }
    fn user_id(&self) -> Option<Uuid> {
        (**self).user_id()
    }
    fn amount(&self) -> Decimal {
        (**self).amount()
    }
    fn currency(&self) -> &str {
        (**self).currency()
    }
    fn status(&self) -> &str {
        (**self).status()
    }
    fn payment_date(&self) -> Option<DateTime<Utc>> {
        (**self).payment_date()
    }
    fn due_date(&self) -> Option<DateTime<Utc>> {
        (**self).due_date()
    }
    fn created_at(&self) -> DateTime<Utc> {
        (**self).created_at()
    }
}
