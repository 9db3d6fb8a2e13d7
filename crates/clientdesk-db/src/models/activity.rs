use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::schema::activities;

/// Audit trail entry written after every successful mutation.
#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = activities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Activity {
    pub id: Uuid,
    pub project_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Option<Uuid>,
    pub details: Option<JsonValue>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Insertable)]
#[diesel(table_name = activities)]
pub struct NewActivity {
    pub project_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Option<Uuid>,
    pub details: Option<JsonValue>,
}

impl Activity {
    pub fn create(new_activity: &NewActivity, conn: &mut diesel::PgConnection) -> QueryResult<Self> {
        diesel::insert_into(activities::table)
            .values(new_activity)
            .get_result(conn)
    }

    pub fn find_by_project(
        project_id: Uuid,
        limit: i64,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Vec<Self>> {
        activities::table
            .filter(activities::project_id.eq(project_id))
            .order(activities::created_at.desc())
            .limit(limit)
            .load(conn)
    }

    /// Most recent activity, optionally restricted to a set of projects.
    pub fn find_recent(
        project_ids: Option<Vec<Uuid>>,
        limit: i64,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Vec<Self>> {
        let mut query = activities::table.into_boxed();

        if let Some(ids) = project_ids {
            query = query.filter(activities::project_id.eq_any(ids));
        }

        query
            .order(activities::created_at.desc())
            .limit(limit)
            .load(conn)
    }
}
