use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::notifications;

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
    pub kind: String,
    pub link: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Insertable)]
#[diesel(table_name = notifications)]
pub struct NewNotification {
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
    pub kind: String,
    pub link: Option<String>,
}

impl Notification {
    pub fn find_by_user(
        user_id: Uuid,
        unread_only: bool,
        limit: i64,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Vec<Self>> {
        let mut query = notifications::table
            .filter(notifications::user_id.eq(user_id))
            .into_boxed();

        if unread_only {
            query = query.filter(notifications::is_read.eq(false));
        }

        query
            .order(notifications::created_at.desc())
            .limit(limit)
            .load(conn)
    }

    pub fn unread_count(user_id: Uuid, conn: &mut diesel::PgConnection) -> QueryResult<i64> {
        notifications::table
            .filter(notifications::user_id.eq(user_id))
            .filter(notifications::is_read.eq(false))
            .count()
            .get_result(conn)
    }

    /// `(user_id, link)` of every linked notification of `kind` sent to `user_ids`.
    pub fn sent_links(
        kind: &str,
        user_ids: &[Uuid],
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Vec<(Uuid, String)>> {
        let rows: Vec<(Uuid, Option<String>)> = notifications::table
            .filter(notifications::kind.eq(kind))
            .filter(notifications::user_id.eq_any(user_ids))
            .filter(notifications::link.is_not_null())
            .select((notifications::user_id, notifications::link))
            .load(conn)?;

        Ok(rows
            .into_iter()
            .filter_map(|(user_id, link)| link.map(|link| (user_id, link)))
            .collect())
    }

    pub fn create(
        new_notification: &NewNotification,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Self> {
        diesel::insert_into(notifications::table)
            .values(new_notification)
            .get_result(conn)
    }

    /// Scoped to the owner so one user can never flip another user's notification.
    pub fn mark_read(
        id: Uuid,
        user_id: Uuid,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Self> {
        diesel::update(
            notifications::table
                .filter(notifications::id.eq(id))
                .filter(notifications::user_id.eq(user_id)),
        )
        .set(notifications::is_read.eq(true))
        .get_result(conn)
    }

    pub fn mark_all_read(user_id: Uuid, conn: &mut diesel::PgConnection) -> QueryResult<usize> {
        diesel::update(
            notifications::table
                .filter(notifications::user_id.eq(user_id))
                .filter(notifications::is_read.eq(false)),
        )
        .set(notifications::is_read.eq(true))
        .execute(conn)
    }
}
