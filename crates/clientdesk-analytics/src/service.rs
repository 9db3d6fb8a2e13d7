use std::{collections::HashSet, sync::Arc, time::Duration};

use anyhow::Result;
use chrono::Utc;
use clientdesk_db::{
    DeskPool,
    models::{NewNotification, Notification, Profile, TeamPayment},
};
use clientdesk_metrics::MetricsRegistry;
use clientdesk_types::{ChangeAction, ChangeTable, UserRole};
use deadpool_diesel::postgres::Pool;
use uuid::Uuid;

use crate::overdue::{OverduePayment, compute_overdue};

pub const OVERDUE_NOTIFICATION_KIND: &str = "payment_overdue";

pub fn overdue_link(payment: &OverduePayment) -> String {
    format!("/team-payments/{}", payment.payment_id)
}

/// Where the scanner announces the rows it creates.
pub trait ChangeSink: Send + Sync {
    fn publish(&self, table: ChangeTable, action: ChangeAction, record_id: Uuid);
}

/// Admin and payment pairs with no overdue notification on record yet.
pub fn pending_alerts<'a>(
    admins: &[Uuid],
    overdue: &'a [OverduePayment],
    already_sent: &HashSet<(Uuid, String)>,
) -> Vec<(Uuid, &'a OverduePayment)> {
    admins
        .iter()
        .flat_map(|admin| overdue.iter().map(move |payment| (*admin, payment)))
        .filter(|(admin, payment)| !already_sent.contains(&(*admin, overdue_link(payment))))
        .collect()
}

/// Turns overdue team payouts into notifications for every administrator.
pub struct OverdueScanService {
    db_pool: Pool,
    metrics: Arc<MetricsRegistry>,
    changes: Arc<dyn ChangeSink>,
    interval: Duration,
}

impl OverdueScanService {
    pub fn new(
        db_pool: Pool,
        metrics: Arc<MetricsRegistry>,
        changes: Arc<dyn ChangeSink>,
        interval: Duration,
    ) -> Self {
        Self {
            db_pool,
            metrics,
            changes,
            interval,
        }
    }

    pub async fn run_forever(&self) -> Result<()> {
        loop {
            if let Err(e) = self.run_scan().await {
                tracing::error!("[OverdueScan] 🔴 Error in overdue payment scan: {e}");
            }

            tokio::time::sleep(self.interval).await;
        }
    }

    pub async fn run_scan(&self) -> Result<usize> {
        let now = Utc::now();

        let candidates = self
            .db_pool
            .interact_with_context("find overdue team payments".to_string(), move |conn| {
                TeamPayment::find_overdue(now, conn)
            })
            .await?;
        let overdue = compute_overdue(&candidates, now);
        if overdue.is_empty() {
            tracing::debug!("[OverdueScan] No overdue team payments");
            return Ok(0);
        }

        let admins: Vec<Uuid> = self
            .db_pool
            .interact_with_context("find admin profiles".to_string(), |conn| {
                Profile::find_by_role(UserRole::Admin, conn)
            })
            .await?
            .into_iter()
            .map(|profile| profile.id)
            .collect();

        let admin_ids = admins.clone();
        let already_sent: HashSet<(Uuid, String)> = self
            .db_pool
            .interact_with_context("find sent overdue notifications".to_string(), move |conn| {
                Notification::sent_links(OVERDUE_NOTIFICATION_KIND, &admin_ids, conn)
            })
            .await?
            .into_iter()
            .collect();

        let mut created = 0;
        for (admin_id, payment) in pending_alerts(&admins, &overdue, &already_sent) {
            match self.notify(admin_id, payment).await {
                Ok(notification_id) => {
                    self.changes
                        .publish(ChangeTable::Notifications, ChangeAction::Insert, notification_id);
                    created += 1;
                }
                Err(e) => {
                    tracing::error!(
                        "[OverdueScan] 🔴 Failed to notify admin {} about payment {}: {e}",
                        admin_id,
                        payment.payment_id
                    );
                }
            }
        }

        self.metrics
            .notifications
            .record_overdue_notifications(created as u64);
        tracing::info!(
            overdue = overdue.len(),
            admins = admins.len(),
            created,
            "[OverdueScan] 🔔 Overdue scan completed"
        );

        Ok(created)
    }

    async fn notify(&self, admin_id: Uuid, payment: &OverduePayment) -> Result<Uuid> {
        let new_notification = NewNotification {
            user_id: admin_id,
            title: "Team payment overdue".to_string(),
            message: format!(
                "A {} {} payout is {} day(s) past due",
                payment.amount, payment.currency, payment.days_past_due
            ),
            kind: OVERDUE_NOTIFICATION_KIND.to_string(),
            link: Some(overdue_link(payment)),
        };

        let notification = self
            .db_pool
            .interact_with_context(
                format!("notify admin {admin_id} about overdue payment"),
                move |conn| Notification::create(&new_notification, conn),
            )
            .await?;

        Ok(notification.id)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rust_decimal::dec;

    use super::*;

    fn overdue(payment_id: Uuid) -> OverduePayment {
        OverduePayment {
            payment_id,
            user_id: Some(Uuid::new_v4()),
            project_id: None,
            amount: dec!(250),
            currency: "USD".to_string(),
            status: "pending".to_string(),
            due_date: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            days_past_due: 4,
        }
    }

    #[test]
    fn already_notified_pairs_are_skipped() {
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
        let payments = vec![overdue(Uuid::new_v4()), overdue(Uuid::new_v4())];
        let already_sent = HashSet::from([(alice, overdue_link(&payments[0]))]);

        let alerts = pending_alerts(&[alice, bob], &payments, &already_sent);

        let pairs: Vec<(Uuid, Uuid)> = alerts.iter().map(|(a, p)| (*a, p.payment_id)).collect();
        assert_eq!(
            pairs,
            vec![
                (alice, payments[1].payment_id),
                (bob, payments[0].payment_id),
                (bob, payments[1].payment_id),
            ]
        );
    }

    #[test]
    fn a_link_sent_to_another_admin_does_not_count() {
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
        let payments = vec![overdue(Uuid::new_v4())];
        let already_sent = HashSet::from([(bob, overdue_link(&payments[0]))]);

        let alerts = pending_alerts(&[alice], &payments, &already_sent);

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].0, alice);
    }

    #[test]
    fn no_admins_means_no_alerts() {
        let payments = vec![overdue(Uuid::new_v4())];
        assert!(pending_alerts(&[], &payments, &HashSet::new()).is_empty());
    }
}
