use std::str::FromStr;

use chrono::NaiveDate;
use clientdesk_db::{
    DeskPool,
    models::{Activity, NewActivity},
};
use clientdesk_types::{ChangeAction, ChangeTable};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{AppState, auth::AuthUser, errors::ApiError};

/// Parses a money amount sent as a decimal string. Negative values are rejected.
pub fn parse_amount(field: &str, raw: &str) -> Result<Decimal, ApiError> {
    let amount = Decimal::from_str(raw.trim()).map_err(|_| {
        ApiError::BadRequest(format!("{field} must be a valid decimal string"))
    })?;

    if amount < Decimal::ZERO {
        return Err(ApiError::BadRequest(format!(
            "{field} must not be negative"
        )));
    }

    Ok(amount.normalize())
}

pub fn parse_optional_amount(field: &str, raw: Option<&str>) -> Result<Option<Decimal>, ApiError> {
    raw.map(|value| parse_amount(field, value)).transpose()
}

pub fn ensure_date_order(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(), ApiError> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => Err(ApiError::BadRequest(format!(
            "end_date {end} is before start_date {start}"
        ))),
        _ => Ok(()),
    }
}

pub fn ensure_positive_duration(minutes: i32) -> Result<(), ApiError> {
    if minutes > 0 {
        Ok(())
    } else {
        Err(ApiError::BadRequest(
            "duration_minutes must be greater than zero".to_string(),
        ))
    }
}

pub fn ensure_not_blank(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        Err(ApiError::BadRequest(format!("{field} must not be empty")))
    } else {
        Ok(())
    }
}

/// A successful mutation, as recorded in the activity log and the change feed.
#[derive(Debug, Clone)]
pub struct Change {
    pub table: ChangeTable,
    pub action: ChangeAction,
    pub record_id: Uuid,
    pub project_id: Option<Uuid>,
    pub details: Option<serde_json::Value>,
}

impl Change {
    pub const fn new(table: ChangeTable, action: ChangeAction, record_id: Uuid) -> Self {
        Self {
            table,
            action,
            record_id,
            project_id: None,
            details: None,
        }
    }

    #[must_use]
    pub fn in_project(mut self, project_id: Option<Uuid>) -> Self {
        self.project_id = project_id;
        self
    }

    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    fn activity_action(&self) -> String {
        let verb = match self.action {
            ChangeAction::Insert => "created",
            ChangeAction::Update => "updated",
            ChangeAction::Delete => "deleted",
        };
        format!("{}_{verb}", entity_type(self.table))
    }
}

/// Singular entity name stored in `activities.entity_type`.
pub const fn entity_type(table: ChangeTable) -> &'static str {
    match table {
        ChangeTable::Projects => "project",
        ChangeTable::Clients => "client",
        ChangeTable::Payments => "payment",
        ChangeTable::TeamPayments => "team_payment",
        ChangeTable::TeamPaymentRates => "team_payment_rate",
        ChangeTable::Deliverables => "deliverable",
        ChangeTable::Phases => "phase",
        ChangeTable::Meetings => "meeting",
        ChangeTable::Activities => "activity",
        ChangeTable::Profiles => "profile",
        ChangeTable::UserProjectAssignments => "assignment",
        ChangeTable::Notifications => "notification",
    }
}

/// Publishes the change and appends an activity row.
///
/// The mutation has already been committed, so a failed activity insert is
/// logged and swallowed.
pub async fn record_change(state: &AppState, actor: &AuthUser, change: Change) {
    state
        .feed
        .publish(change.table, change.action, change.record_id);

    let new_activity = NewActivity {
        project_id: change.project_id,
        user_id: Some(actor.id),
        action: change.activity_action(),
        entity_type: entity_type(change.table).to_string(),
        entity_id: Some(change.record_id),
        details: change.details,
    };

    let result = state
        .pool
        .interact_with_context(
            format!("record activity {}", new_activity.action),
            move |conn| Activity::create(&new_activity, conn),
        )
        .await;

    match result {
        Ok(activity) => {
            state
                .feed
                .publish(ChangeTable::Activities, ChangeAction::Insert, activity.id);
        }
        Err(e) => {
            tracing::warn!(
                table = %change.table,
                record_id = %change.record_id,
                error = %e,
                "Failed to record activity"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    #[test]
    fn amounts_must_be_non_negative_decimals() {
        assert_eq!(parse_amount("amount", "150.50").unwrap(), dec!(150.5));
        assert_eq!(parse_amount("amount", " 0 ").unwrap(), Decimal::ZERO);
        assert!(matches!(
            parse_amount("amount", "-1"),
            Err(ApiError::BadRequest(msg)) if msg == "amount must not be negative"
        ));
        assert!(matches!(
            parse_amount("rate_amount", "ten"),
            Err(ApiError::BadRequest(_))
        ));
        assert_eq!(parse_optional_amount("budget", None).unwrap(), None);
    }

    #[test]
    fn end_date_may_equal_start_date() {
        let start = NaiveDate::from_ymd_opt(2026, 3, 1);
        let before = NaiveDate::from_ymd_opt(2026, 2, 28);

        assert!(ensure_date_order(start, start).is_ok());
        assert!(ensure_date_order(start, None).is_ok());
        assert!(ensure_date_order(start, before).is_err());
    }

    #[test]
    fn meeting_duration_must_be_positive() {
        assert!(ensure_positive_duration(30).is_ok());
        assert!(ensure_positive_duration(0).is_err());
        assert!(ensure_positive_duration(-15).is_err());
    }

    #[test]
    fn activity_actions_use_singular_entity_names() {
        let change = Change::new(
            ChangeTable::TeamPayments,
            ChangeAction::Update,
            Uuid::nil(),
        );
        assert_eq!(change.activity_action(), "team_payment_updated");

        let change = Change::new(
            ChangeTable::UserProjectAssignments,
            ChangeAction::Insert,
            Uuid::nil(),
        );
        assert_eq!(change.activity_action(), "assignment_created");
    }
}
