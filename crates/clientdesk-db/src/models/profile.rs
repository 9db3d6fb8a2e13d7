use std::str::FromStr;

use chrono::{DateTime, Utc};
use clientdesk_types::UserRole;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::profiles;

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub role: String,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Insertable)]
#[diesel(table_name = profiles)]
pub struct NewProfile {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub role: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, AsChangeset)]
#[diesel(table_name = profiles)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub role: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Profile {
    /// Unknown role strings are treated as the least privileged role.
    pub fn role(&self) -> UserRole {
        UserRole::from_str(&self.role).unwrap_or(UserRole::Client)
    }

    pub fn find_by_id(id: Uuid, conn: &mut diesel::PgConnection) -> QueryResult<Self> {
        profiles::table.find(id).first(conn)
    }

    pub fn find_all(conn: &mut diesel::PgConnection) -> QueryResult<Vec<Self>> {
        profiles::table.order(profiles::email.asc()).load(conn)
    }

    pub fn find_by_role(role: UserRole, conn: &mut diesel::PgConnection) -> QueryResult<Vec<Self>> {
        profiles::table
            .filter(profiles::role.eq(role.as_str()))
            .order(profiles::email.asc())
            .load(conn)
    }

    pub fn create(new_profile: &NewProfile, conn: &mut diesel::PgConnection) -> QueryResult<Self> {
        diesel::insert_into(profiles::table)
            .values(new_profile)
            .get_result(conn)
    }

    /// Profiles are provisioned on first authenticated request; the identity
    /// provider owns the account itself.
    pub fn find_or_create(
        new_profile: NewProfile,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Self> {
        match Self::find_by_id(new_profile.id, conn) {
            Ok(profile) => Ok(profile),
            Err(diesel::NotFound) => Self::create(&new_profile, conn),
            Err(e) => Err(e),
        }
    }

    pub fn update(
        id: Uuid,
        updates: &ProfileUpdate,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Self> {
        diesel::update(profiles::table.find(id))
            .set(updates)
            .get_result(conn)
    }

    pub fn count_by_role(role: UserRole, conn: &mut diesel::PgConnection) -> QueryResult<i64> {
        profiles::table
            .filter(profiles::role.eq(role.as_str()))
            .count()
            .get_result(conn)
    }
}
