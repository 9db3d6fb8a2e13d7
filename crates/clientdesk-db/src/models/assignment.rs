use chrono::{DateTime, Utc};
use diesel::{dsl::exists, prelude::*, select};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::user_project_assignments;

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = user_project_assignments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProjectAssignment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub project_id: Uuid,
    pub role: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Insertable)]
#[diesel(table_name = user_project_assignments)]
pub struct NewProjectAssignment {
    pub user_id: Uuid,
    pub project_id: Uuid,
    pub role: Option<String>,
}

impl ProjectAssignment {
    pub fn find_by_project(
        project_id: Uuid,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Vec<Self>> {
        user_project_assignments::table
            .filter(user_project_assignments::project_id.eq(project_id))
            .order(user_project_assignments::created_at.asc())
            .load(conn)
    }

    pub fn find_by_user(user_id: Uuid, conn: &mut diesel::PgConnection) -> QueryResult<Vec<Self>> {
        user_project_assignments::table
            .filter(user_project_assignments::user_id.eq(user_id))
            .order(user_project_assignments::created_at.asc())
            .load(conn)
    }

    pub fn project_ids_for_user(
        user_id: Uuid,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Vec<Uuid>> {
        user_project_assignments::table
            .filter(user_project_assignments::user_id.eq(user_id))
            .select(user_project_assignments::project_id)
            .load(conn)
    }

    pub fn is_assigned(
        user_id: Uuid,
        project_id: Uuid,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<bool> {
        select(exists(
            user_project_assignments::table
                .filter(user_project_assignments::user_id.eq(user_id))
                .filter(user_project_assignments::project_id.eq(project_id)),
        ))
        .get_result(conn)
    }

    pub fn create(
        new_assignment: &NewProjectAssignment,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Self> {
        diesel::insert_into(user_project_assignments::table)
            .values(new_assignment)
            .get_result(conn)
    }

    pub fn delete(
        user_id: Uuid,
        project_id: Uuid,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<usize> {
        diesel::delete(
            user_project_assignments::table
                .filter(user_project_assignments::user_id.eq(user_id))
                .filter(user_project_assignments::project_id.eq(project_id)),
        )
        .execute(conn)
    }
}
