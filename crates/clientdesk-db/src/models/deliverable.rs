use chrono::{DateTime, NaiveDate, Utc};
use clientdesk_types::DeliverableStatus;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::deliverables;

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = deliverables)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Deliverable {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub due_date: Option<NaiveDate>,
    pub file_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Insertable)]
#[diesel(table_name = deliverables)]
pub struct NewDeliverable {
    pub project_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, AsChangeset)]
#[diesel(table_name = deliverables)]
pub struct DeliverableUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub file_path: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Deliverable {
    /// A deliverable is overdue once its due date is behind `today` and it is not completed.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status != DeliverableStatus::Completed.as_str()
            && self.due_date.is_some_and(|due| due < today)
    }

    pub fn find_by_id(id: Uuid, conn: &mut diesel::PgConnection) -> QueryResult<Self> {
        deliverables::table.find(id).first(conn)
    }

    pub fn find_all(conn: &mut diesel::PgConnection) -> QueryResult<Vec<Self>> {
        deliverables::table
            .order(deliverables::due_date.asc().nulls_last())
            .load(conn)
    }

    pub fn find_by_project(
        project_id: Uuid,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Vec<Self>> {
        deliverables::table
            .filter(deliverables::project_id.eq(project_id))
            .order(deliverables::due_date.asc().nulls_last())
            .load(conn)
    }

    pub fn create(
        new_deliverable: &NewDeliverable,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Self> {
        diesel::insert_into(deliverables::table)
            .values(new_deliverable)
            .get_result(conn)
    }

    pub fn update(
        id: Uuid,
        updates: &DeliverableUpdate,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Self> {
        diesel::update(deliverables::table.find(id))
            .set(updates)
            .get_result(conn)
    }

    pub fn delete(id: Uuid, conn: &mut diesel::PgConnection) -> QueryResult<usize> {
        diesel::delete(deliverables::table.find(id)).execute(conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deliverable(status: DeliverableStatus, due: Option<NaiveDate>) -> Deliverable {
        Deliverable {
            id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            title: "Wireframes".to_string(),
            description: None,
            status: status.as_str().to_string(),
            due_date: due,
            file_path: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn overdue_requires_past_due_date_and_open_status() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let yesterday = NaiveDate::from_ymd_opt(2026, 3, 9);

        assert!(deliverable(DeliverableStatus::InProgress, yesterday).is_overdue(today));
        assert!(!deliverable(DeliverableStatus::Completed, yesterday).is_overdue(today));
        assert!(!deliverable(DeliverableStatus::Pending, Some(today)).is_overdue(today));
        assert!(!deliverable(DeliverableStatus::Pending, None).is_overdue(today));
    }
}
