use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::clients;

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = clients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub logo_url: Option<String>,
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Insertable)]
#[diesel(table_name = clients)]
pub struct NewClient {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, AsChangeset)]
#[diesel(table_name = clients)]
pub struct ClientUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub logo_url: Option<String>,
    pub notes: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Client {
    pub fn find_by_id(id: Uuid, conn: &mut diesel::PgConnection) -> QueryResult<Self> {
        clients::table.find(id).first(conn)
    }

    /// Case-insensitive match on name, company or email, for search-as-you-type.
    pub fn search(
        term: Option<&str>,
        limit: i64,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Vec<Self>> {
        let mut query = clients::table.into_boxed();

        if let Some(term) = term.map(str::trim).filter(|t| !t.is_empty()) {
            let pattern = format!("%{term}%");
            query = query.filter(
                clients::name
                    .ilike(pattern.clone())
                    .or(clients::company.ilike(pattern.clone()))
                    .or(clients::email.ilike(pattern)),
            );
        }

        query.order(clients::name.asc()).limit(limit).load(conn)
    }

    pub fn find_all(conn: &mut diesel::PgConnection) -> QueryResult<Vec<Self>> {
        clients::table.order(clients::name.asc()).load(conn)
    }

    pub fn create(new_client: &NewClient, conn: &mut diesel::PgConnection) -> QueryResult<Self> {
        diesel::insert_into(clients::table)
            .values(new_client)
            .get_result(conn)
    }

    pub fn update(
        id: Uuid,
        updates: &ClientUpdate,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Self> {
        diesel::update(clients::table.find(id))
            .set(updates)
            .get_result(conn)
    }

    pub fn set_logo_url(
        id: Uuid,
        logo_url: &str,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Self> {
        diesel::update(clients::table.find(id))
            .set((
                clients::logo_url.eq(logo_url),
                clients::updated_at.eq(Utc::now()),
            ))
            .get_result(conn)
    }

    pub fn delete(id: Uuid, conn: &mut diesel::PgConnection) -> QueryResult<usize> {
        diesel::delete(clients::table.find(id)).execute(conn)
    }

    pub fn count(conn: &mut diesel::PgConnection) -> QueryResult<i64> {
        clients::table.count().get_result(conn)
    }
}
