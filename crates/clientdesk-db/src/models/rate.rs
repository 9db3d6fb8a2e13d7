use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::team_payment_rates;

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = team_payment_rates)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TeamPaymentRate {
    pub id: Uuid,
    pub user_id: Uuid,
    pub project_id: Option<Uuid>,
    pub rate_type: String,
    pub rate_amount: Decimal,
    pub currency: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Insertable)]
#[diesel(table_name = team_payment_rates)]
pub struct NewTeamPaymentRate {
    pub user_id: Uuid,
    pub project_id: Option<Uuid>,
    pub rate_type: String,
    pub rate_amount: Decimal,
    pub currency: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, AsChangeset)]
#[diesel(table_name = team_payment_rates)]
pub struct TeamPaymentRateUpdate {
    pub project_id: Option<Uuid>,
    pub rate_type: Option<String>,
    pub rate_amount: Option<Decimal>,
    pub currency: Option<String>,
    pub is_active: Option<bool>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl TeamPaymentRate {
    pub fn find_by_id(id: Uuid, conn: &mut diesel::PgConnection) -> QueryResult<Self> {
        team_payment_rates::table.find(id).first(conn)
    }

    pub fn find_all(conn: &mut diesel::PgConnection) -> QueryResult<Vec<Self>> {
        team_payment_rates::table
            .order(team_payment_rates::created_at.desc())
            .load(conn)
    }

    pub fn find_by_user(user_id: Uuid, conn: &mut diesel::PgConnection) -> QueryResult<Vec<Self>> {
        team_payment_rates::table
            .filter(team_payment_rates::user_id.eq(user_id))
            .order(team_payment_rates::created_at.desc())
            .load(conn)
    }

    pub fn create(
        new_rate: &NewTeamPaymentRate,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Self> {
        diesel::insert_into(team_payment_rates::table)
            .values(new_rate)
            .get_result(conn)
    }

    pub fn update(
        id: Uuid,
        updates: &TeamPaymentRateUpdate,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Self> {
        diesel::update(team_payment_rates::table.find(id))
            .set(updates)
            .get_result(conn)
    }

    pub fn deactivate(id: Uuid, conn: &mut diesel::PgConnection) -> QueryResult<Self> {
        diesel::update(team_payment_rates::table.find(id))
            .set((
                team_payment_rates::is_active.eq(false),
                team_payment_rates::updated_at.eq(Utc::now()),
            ))
            .get_result(conn)
    }

    pub fn delete(id: Uuid, conn: &mut diesel::PgConnection) -> QueryResult<usize> {
        diesel::delete(team_payment_rates::table.find(id)).execute(conn)
    }
}
