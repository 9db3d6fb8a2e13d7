use chrono::{DateTime, Utc};
use clientdesk_types::PaymentStatus;
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::payments;

/// Storage names of the statuses `mark_paid` may settle.
pub(crate) const OUTSTANDING: [&str; 2] = ["pending", "approved"];

/// Client-facing payment (an invoice line the client pays).
#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = payments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Payment {
    pub id: Uuid,
    pub project_id: Uuid,
    pub user_id: Option<Uuid>,
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
#[diesel(table_name = payments)]
pub struct NewPayment {
    pub project_id: Uuid,
    pub user_id: Option<Uuid>,
    pub amount: Decimal,
    pub currency: String,
    pub status: String,
    pub payment_type: String,
    pub payment_date: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, AsChangeset)]
#[diesel(table_name = payments)]
pub struct PaymentUpdate {
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
pub struct PaymentFilter {
    pub project_id: Option<Uuid>,
    pub project_ids: Option<Vec<Uuid>>,
    pub status: Option<PaymentStatus>,
}

impl Payment {
    pub fn find_by_id(id: Uuid, conn: &mut diesel::PgConnection) -> QueryResult<Self> {
        payments::table.find(id).first(conn)
    }

    pub fn find_all(conn: &mut diesel::PgConnection) -> QueryResult<Vec<Self>> {
        payments::table.order(payments::created_at.desc()).load(conn)
    }

    pub fn find_filtered(
        filter: &PaymentFilter,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Vec<Self>> {
        let mut query = payments::table.into_boxed();

        if let Some(project_id) = filter.project_id {
            query = query.filter(payments::project_id.eq(project_id));
        }
        if let Some(project_ids) = &filter.project_ids {
            query = query.filter(payments::project_id.eq_any(project_ids.clone()));
        }
        if let Some(status) = filter.status {
            query = query.filter(payments::status.eq(status.as_str()));
        }

        query.order(payments::created_at.desc()).load(conn)
    }

    pub fn create(new_payment: &NewPayment, conn: &mut diesel::PgConnection) -> QueryResult<Self> {
        diesel::insert_into(payments::table)
            .values(new_payment)
            .get_result(conn)
    }

    pub fn update(
        id: Uuid,
        updates: &PaymentUpdate,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Self> {
        diesel::update(payments::table.find(id))
            .set(updates)
            .get_result(conn)
    }

    /// Flip an outstanding payment to `paid` and stamp `payment_date` in the same
    /// statement. Settled or cancelled rows are left alone and yield `NotFound`.
    pub fn mark_paid(
        id: Uuid,
        paid_at: DateTime<Utc>,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Self> {
        diesel::update(payments::table.find(id))
            .filter(payments::status.eq_any(OUTSTANDING))
            .set((
                payments::status.eq(PaymentStatus::Paid.as_str()),
                payments::payment_date.eq(paid_at),
                payments::updated_at.eq(Utc::now()),
            ))
            .get_result(conn)
    }

    pub fn delete(id: Uuid, conn: &mut diesel::PgConnection) -> QueryResult<usize> {
        diesel::delete(payments::table.find(id)).execute(conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settleable_statuses_are_the_outstanding_ones() {
        assert_eq!(
            OUTSTANDING,
            [PaymentStatus::Pending.as_str(), PaymentStatus::Approved.as_str()]
        );
        assert!(!OUTSTANDING.contains(&PaymentStatus::Paid.as_str()));
        assert!(!OUTSTANDING.contains(&PaymentStatus::Cancelled.as_str()));
    }
}
