use chrono::{DateTime, Utc};
use clientdesk_types::MeetingStatus;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::meetings;

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = meetings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Meeting {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: i32,
    pub meeting_url: Option<String>,
    pub status: String,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Insertable)]
#[diesel(table_name = meetings)]
pub struct NewMeeting {
    pub project_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: i32,
    pub meeting_url: Option<String>,
    pub status: String,
    pub created_by: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, AsChangeset)]
#[diesel(table_name = meetings)]
pub struct MeetingUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i32>,
    pub meeting_url: Option<String>,
    pub status: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Meeting {
    pub fn find_by_id(id: Uuid, conn: &mut diesel::PgConnection) -> QueryResult<Self> {
        meetings::table.find(id).first(conn)
    }

    pub fn find_all(conn: &mut diesel::PgConnection) -> QueryResult<Vec<Self>> {
        meetings::table.order(meetings::scheduled_at.asc()).load(conn)
    }

    pub fn find_by_project(
        project_id: Uuid,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Vec<Self>> {
        meetings::table
            .filter(meetings::project_id.eq(project_id))
            .order(meetings::scheduled_at.asc())
            .load(conn)
    }

    /// Scheduled meetings in `[from, until)`, optionally restricted to a set of projects.
    pub fn find_upcoming(
        from: DateTime<Utc>,
        until: DateTime<Utc>,
        project_ids: Option<Vec<Uuid>>,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Vec<Self>> {
        let mut query = meetings::table
            .filter(meetings::status.eq(MeetingStatus::Scheduled.as_str()))
            .filter(meetings::scheduled_at.ge(from))
            .filter(meetings::scheduled_at.lt(until))
            .into_boxed();

        if let Some(ids) = project_ids {
            query = query.filter(meetings::project_id.eq_any(ids));
        }

        query.order(meetings::scheduled_at.asc()).load(conn)
    }

    pub fn create(new_meeting: &NewMeeting, conn: &mut diesel::PgConnection) -> QueryResult<Self> {
        diesel::insert_into(meetings::table)
            .values(new_meeting)
            .get_result(conn)
    }

    pub fn update(
        id: Uuid,
        updates: &MeetingUpdate,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Self> {
        diesel::update(meetings::table.find(id))
            .set(updates)
            .get_result(conn)
    }

    pub fn delete(id: Uuid, conn: &mut diesel::PgConnection) -> QueryResult<usize> {
        diesel::delete(meetings::table.find(id)).execute(conn)
    }
}
