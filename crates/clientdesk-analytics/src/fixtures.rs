use chrono::{DateTime, TimeZone, Utc};
use clientdesk_db::models::{Payment, Project, TeamPayment, TeamPaymentRate};
use clientdesk_types::{PaymentStatus, ProjectStatus, RateType};
use rust_decimal::Decimal;
use uuid::Uuid;

pub(crate) fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

pub(crate) fn team_payment(
    user_id: Uuid,
    amount: Decimal,
    status: PaymentStatus,
    created_at: DateTime<Utc>,
) -> TeamPayment {
    TeamPayment {
        id: Uuid::new_v4(),
        project_id: None,
        user_id,
        amount,
        currency: "USD".to_string(),
        status: status.as_str().to_string(),
        payment_type: "salary".to_string(),
        payment_date: None,
        due_date: None,
        description: None,
        created_at,
        updated_at: created_at,
    }
}

pub(crate) fn client_payment(
    project_id: Uuid,
    amount: Decimal,
    status: PaymentStatus,
    created_at: DateTime<Utc>,
) -> Payment {
    Payment {
        id: Uuid::new_v4(),
        project_id,
        user_id: None,
        amount,
        currency: "USD".to_string(),
        status: status.as_str().to_string(),
        payment_type: "milestone".to_string(),
        payment_date: None,
        due_date: None,
        description: None,
        created_at,
        updated_at: created_at,
    }
}

pub(crate) fn rate(user_id: Uuid, rate_type: RateType, amount: Decimal, active: bool) -> TeamPaymentRate {
    TeamPaymentRate {
        id: Uuid::new_v4(),
        user_id,
        project_id: None,
        rate_type: rate_type.as_str().to_string(),
        rate_amount: amount,
        currency: "USD".to_string(),
        is_active: active,
        created_at: at(2026, 1, 1),
        updated_at: at(2026, 1, 1),
    }
}

pub(crate) fn project(name: &str, status: ProjectStatus) -> Project {
    Project {
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: None,
        status: status.as_str().to_string(),
        client_id: Uuid::new_v4(),
        budget: None,
        currency: "USD".to_string(),
        start_date: None,
        end_date: None,
        created_at: at(2026, 1, 1),
        updated_at: at(2026, 1, 1),
    }
}
