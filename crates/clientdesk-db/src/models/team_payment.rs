use chrono::{DateTime, Utc};
use clientdesk_types::PaymentStatus;
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::payment::OUTSTANDING;
use crate::schema::team_payments;

/// Internal payout to a team member.
#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = team_payments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TeamPayment {
    pub id: Uuid,
    pub project_id: Option<Uuid>,
    pub user_id: Uuid,
    pub amount: Decimal,
    pub currency: String,
    pub status: String,
    pub payment_type: String,
    pub payment_date: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Insertable)]
#[diesel(table_name = team_payments)]
pub struct NewTeamPayment {
    pub project_id: Option<Uuid>,
    pub user_id: Uuid,
    pub amount: Decimal,
    pub currency: String,
    pub status: String,
    pub payment_type: String,
    pub payment_date: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, AsChangeset)]
#[diesel(table_name = team_payments)]
pub struct TeamPaymentUpdate {
    pub project_id: Option<Uuid>,
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub status: Option<String>,
    pub payment_type: Option<String>,
    /// `Some(None)` clears the column.
    pub payment_date: Option<Option<DateTime<Utc>>>,
    pub due_date: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct TeamPaymentFilter {
    pub user_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub status: Option<PaymentStatus>,
}

impl TeamPayment {
    pub fn find_by_id(id: Uuid, conn: &mut diesel::PgConnection) -> QueryResult<Self> {
        team_payments::table.find(id).first(conn)
    }

    pub fn find_all(conn: &mut diesel::PgConnection) -> QueryResult<Vec<Self>> {
        team_payments::table
            .order(team_payments::created_at.desc())
            .load(conn)
    }

    pub fn find_by_user(user_id: Uuid, conn: &mut diesel::PgConnection) -> QueryResult<Vec<Self>> {
        team_payments::table
            .filter(team_payments::user_id.eq(user_id))
            .order(team_payments::created_at.desc())
            .load(conn)
    }

    pub fn find_filtered(
        filter: &TeamPaymentFilter,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Vec<Self>> {
        let mut query = team_payments::table.into_boxed();

        if let Some(user_id) = filter.user_id {
            query = query.filter(team_payments::user_id.eq(user_id));
        }
        if let Some(project_id) = filter.project_id {
            query = query.filter(team_payments::project_id.eq(project_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(team_payments::status.eq(status.as_str()));
        }

        query.order(team_payments::created_at.desc()).load(conn)
    }

    /// Outstanding payouts whose due date has passed, oldest due date first.
    pub fn find_overdue(
        now: DateTime<Utc>,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Vec<Self>> {
        team_payments::table
            .filter(team_payments::status.eq_any(OUTSTANDING))
            .filter(team_payments::due_date.lt(now))
            .order(team_payments::due_date.asc())
            .load(conn)
    }

    pub fn create(
        new_payment: &NewTeamPayment,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Self> {
        diesel::insert_into(team_payments::table)
            .values(new_payment)
            .get_result(conn)
    }

    pub fn update(
        id: Uuid,
        updates: &TeamPaymentUpdate,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Self> {
        diesel::update(team_payments::table.find(id))
            .set(updates)
            .get_result(conn)
    }

    /// Same contract as [`crate::models::Payment::mark_paid`].
    pub fn mark_paid(
        id: Uuid,
        paid_at: DateTime<Utc>,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Self> {
        diesel::update(team_payments::table.find(id))
            .filter(team_payments::status.eq_any(OUTSTANDING))
            .set((
                team_payments::status.eq(PaymentStatus::Paid.as_str()),
                team_payments::payment_date.eq(paid_at),
                team_payments::updated_at.eq(Utc::now()),
            ))
            .get_result(conn)
    }

    pub fn delete(id: Uuid, conn: &mut diesel::PgConnection) -> QueryResult<usize> {
        diesel::delete(team_payments::table.find(id)).execute(conn)
    }
}
