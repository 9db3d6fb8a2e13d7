use chrono::{DateTime, NaiveDate, Utc};
use clientdesk_types::PhaseStatus;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::phases;

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = phases)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Phase {
    pub id: Uuid,
    pub project_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Insertable)]
#[diesel(table_name = phases)]
pub struct NewPhase {
    pub project_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub sort_order: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, AsChangeset)]
#[diesel(table_name = phases)]
pub struct PhaseUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub sort_order: Option<i32>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Phase {
    /// Both the start day and the end day count as active.
    pub fn status_on(&self, today: NaiveDate) -> PhaseStatus {
        if today < self.start_date {
            PhaseStatus::Upcoming
        } else if today > self.end_date {
            PhaseStatus::Completed
        } else {
            PhaseStatus::Active
        }
    }

    pub fn find_by_id(id: Uuid, conn: &mut diesel::PgConnection) -> QueryResult<Self> {
        phases::table.find(id).first(conn)
    }

    pub fn find_by_project(
        project_id: Uuid,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Vec<Self>> {
        phases::table
            .filter(phases::project_id.eq(project_id))
            .order((phases::sort_order.asc(), phases::start_date.asc()))
            .load(conn)
    }

    pub fn create(new_phase: &NewPhase, conn: &mut diesel::PgConnection) -> QueryResult<Self> {
        diesel::insert_into(phases::table)
            .values(new_phase)
            .get_result(conn)
    }

    pub fn update(
        id: Uuid,
        updates: &PhaseUpdate,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Self> {
        diesel::update(phases::table.find(id))
            .set(updates)
            .get_result(conn)
    }

    pub fn delete(id: Uuid, conn: &mut diesel::PgConnection) -> QueryResult<usize> {
        diesel::delete(phases::table.find(id)).execute(conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, day).unwrap()
    }

    #[test]
    fn status_follows_the_phase_window() {
        let phase = Phase {
            id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            name: "Discovery".to_string(),
            description: None,
            start_date: date(10),
            end_date: date(20),
            sort_order: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert_eq!(phase.status_on(date(9)), PhaseStatus::Upcoming);
        assert_eq!(phase.status_on(date(10)), PhaseStatus::Active);
        assert_eq!(phase.status_on(date(15)), PhaseStatus::Active);
        assert_eq!(phase.status_on(date(20)), PhaseStatus::Active);
        assert_eq!(phase.status_on(date(21)), PhaseStatus::Completed);
    }
}
