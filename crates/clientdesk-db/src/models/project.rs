use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::{projects, user_project_assignments};

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub client_id: Uuid,
    pub budget: Option<Decimal>,
    pub currency: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Insertable)]
#[diesel(table_name = projects)]
pub struct NewProject {
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub client_id: Uuid,
    pub budget: Option<Decimal>,
    pub currency: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, AsChangeset)]
#[diesel(table_name = projects)]
pub struct ProjectUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub client_id: Option<Uuid>,
    pub budget: Option<Decimal>,
    pub currency: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Filters for the project listing. `assigned_to` restricts the result to
/// projects the given profile is assigned to.
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    pub search: Option<String>,
    pub status: Option<String>,
    pub client_id: Option<Uuid>,
    pub assigned_to: Option<Uuid>,
}

impl Project {
    pub fn find_by_id(id: Uuid, conn: &mut diesel::PgConnection) -> QueryResult<Self> {
        projects::table.find(id).first(conn)
    }

    pub fn find_all(conn: &mut diesel::PgConnection) -> QueryResult<Vec<Self>> {
        projects::table.order(projects::created_at.desc()).load(conn)
    }

    pub fn find_filtered(
        filter: &ProjectFilter,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Vec<Self>> {
        let mut query = projects::table.into_boxed();

        if let Some(term) = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
        {
            query = query.filter(projects::name.ilike(format!("%{term}%")));
        }

        if let Some(status) = &filter.status {
            query = query.filter(projects::status.eq(status.clone()));
        }

        if let Some(client_id) = filter.client_id {
            query = query.filter(projects::client_id.eq(client_id));
        }

        if let Some(user_id) = filter.assigned_to {
            query = query.filter(
                projects::id.eq_any(
                    user_project_assignments::table
                        .filter(user_project_assignments::user_id.eq(user_id))
                        .select(user_project_assignments::project_id),
                ),
            );
        }

        query.order(projects::created_at.desc()).load(conn)
    }

    pub fn create(new_project: &NewProject, conn: &mut diesel::PgConnection) -> QueryResult<Self> {
        diesel::insert_into(projects::table)
            .values(new_project)
            .get_result(conn)
    }

    pub fn update(
        id: Uuid,
        updates: &ProjectUpdate,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Self> {
        diesel::update(projects::table.find(id))
            .set(updates)
            .get_result(conn)
    }

    pub fn delete(id: Uuid, conn: &mut diesel::PgConnection) -> QueryResult<usize> {
        diesel::delete(projects::table.find(id)).execute(conn)
    }
}
