use std::collections::HashSet;

use chrono::{DateTime, Utc};
use clientdesk_analytics::ChangeSink;
use clientdesk_types::{ChangeAction, ChangeTable, UserRole};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::{self, error::RecvError};
use utoipa::ToSchema;
use uuid::Uuid;

const FEED_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChangeEvent {
    pub table: ChangeTable,
    pub action: ChangeAction,
    pub record_id: Uuid,
    pub at: DateTime<Utc>,
}

/// In-process fan-out of mutation events.
#[derive(Clone)]
pub struct ChangeFeed {
    sender: broadcast::Sender<ChangeEvent>,
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new(FEED_CAPACITY)
    }
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn publish(&self, table: ChangeTable, action: ChangeAction, record_id: Uuid) {
        let event = ChangeEvent {
            table,
            action,
            record_id,
            at: Utc::now(),
        };
        // No receivers is the normal idle state.
        let receivers = self.sender.send(event).unwrap_or(0);
        tracing::debug!(%table, %action, %record_id, receivers, "Published change event");
    }

    pub fn subscribe(&self, filter: TableFilter) -> ChangeSubscription {
        ChangeSubscription {
            receiver: self.sender.subscribe(),
            filter,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl ChangeSink for ChangeFeed {
    fn publish(&self, table: ChangeTable, action: ChangeAction, record_id: Uuid) {
        ChangeFeed::publish(self, table, action, record_id);
    }
}

/// Tables a subscriber cares about. Empty means every table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableFilter(HashSet<ChangeTable>);

impl TableFilter {
    /// Parses a comma separated list such as `projects,team_payments`.
    pub fn parse(raw: Option<&str>) -> Result<Self, String> {
        let Some(raw) = raw else {
            return Ok(Self::default());
        };

        raw.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| {
                name.parse::<ChangeTable>()
                    .map_err(|_| format!("Unknown table '{name}'"))
            })
            .collect::<Result<HashSet<_>, _>>()
            .map(Self)
    }

    /// Narrows the filter to what `role` may watch. An open filter becomes the
    /// explicit set of visible tables; naming a hidden table is an error.
    pub fn scoped_to(self, role: UserRole) -> Result<Self, ChangeTable> {
        if let Some(hidden) = self.0.iter().copied().find(|t| !t.visible_to(role)) {
            return Err(hidden);
        }
        if self.0.is_empty() {
            return Ok(Self(ChangeTable::visible_tables(role).collect()));
        }
        Ok(self)
    }

    pub fn matches(&self, table: ChangeTable) -> bool {
        self.0.is_empty() || self.0.contains(&table)
    }
}

pub struct ChangeSubscription {
    receiver: broadcast::Receiver<ChangeEvent>,
    filter: TableFilter,
}

impl ChangeSubscription {
    /// Next matching event, or `None` once the feed is gone.
    /// A lagging subscriber skips what it missed and keeps going.
    pub async fn next(&mut self) -> Option<ChangeEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.filter.matches(event.table) => return Some(event),
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Realtime subscriber lagged behind");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_parsing() {
        let filter = TableFilter::parse(Some("projects, team_payments,")).unwrap();
        assert!(filter.matches(ChangeTable::Projects));
        assert!(filter.matches(ChangeTable::TeamPayments));
        assert!(!filter.matches(ChangeTable::Profiles));

        assert!(TableFilter::parse(None).unwrap().matches(ChangeTable::Profiles));
        assert!(TableFilter::parse(Some("invoices")).is_err());
    }

    #[test]
    fn clients_cannot_watch_payouts() {
        let open = TableFilter::default().scoped_to(UserRole::Client).unwrap();
        assert!(open.matches(ChangeTable::Projects));
        assert!(open.matches(ChangeTable::Notifications));
        assert!(!open.matches(ChangeTable::TeamPayments));
        assert!(!open.matches(ChangeTable::TeamPaymentRates));

        let asked = TableFilter::parse(Some("projects,team_payments")).unwrap();
        assert_eq!(
            asked.scoped_to(UserRole::Client),
            Err(ChangeTable::TeamPayments)
        );
    }

    #[test]
    fn staff_filters_follow_route_gates() {
        let admin = TableFilter::default().scoped_to(UserRole::Admin).unwrap();
        assert!(admin.matches(ChangeTable::TeamPaymentRates));
        assert!(admin.matches(ChangeTable::Profiles));

        let team = TableFilter::default().scoped_to(UserRole::Team).unwrap();
        assert!(team.matches(ChangeTable::TeamPayments));
        assert!(!team.matches(ChangeTable::TeamPaymentRates));

        let payouts = TableFilter::parse(Some("team_payments")).unwrap();
        assert_eq!(payouts.clone().scoped_to(UserRole::Team), Ok(payouts));
    }

    #[tokio::test]
    async fn subscribers_only_receive_their_tables() {
        let feed = ChangeFeed::default();
        let mut activities = feed.subscribe(TableFilter::parse(Some("activities")).unwrap());
        let mut everything = feed.subscribe(TableFilter::default());
        assert_eq!(feed.subscriber_count(), 2);

        let project = Uuid::new_v4();
        let activity = Uuid::new_v4();
        feed.publish(ChangeTable::Projects, ChangeAction::Update, project);
        feed.publish(ChangeTable::Activities, ChangeAction::Insert, activity);

        let first = activities.next().await.unwrap();
        assert_eq!(first.table, ChangeTable::Activities);
        assert_eq!(first.record_id, activity);

        assert_eq!(everything.next().await.unwrap().record_id, project);
        assert_eq!(everything.next().await.unwrap().record_id, activity);
    }

    #[tokio::test]
    async fn lagging_subscriber_skips_to_recent_events() {
        let feed = ChangeFeed::new(2);
        let mut slow = feed.subscribe(TableFilter::default());

        let ids: Vec<Uuid> = (0..5).map(|_| Uuid::new_v4()).collect();
        for id in &ids {
            feed.publish(ChangeTable::Payments, ChangeAction::Insert, *id);
        }

        assert_eq!(slow.next().await.unwrap().record_id, ids[3]);
        assert_eq!(slow.next().await.unwrap().record_id, ids[4]);
    }

    #[tokio::test]
    async fn closed_feed_ends_the_subscription() {
        let feed = ChangeFeed::default();
        let mut subscription = feed.subscribe(TableFilter::default());
        drop(feed);

        assert!(subscription.next().await.is_none());
    }
}
