use std::sync::Arc;

use opentelemetry::{KeyValue, global, metrics::Counter};

#[derive(Debug)]
pub struct MetricsRegistry {
    pub payments: Arc<PaymentMetrics>,
    pub notifications: Arc<NotificationMetrics>,
    pub chat: Arc<ChatMetrics>,
}

impl MetricsRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            payments: PaymentMetrics::new(),
            notifications: NotificationMetrics::new(),
            chat: ChatMetrics::new(),
        })
    }
}

const METER_NAME: &str = "clientdesk-api";

#[derive(Debug)]
pub struct PaymentMetrics {
    payments_created: Counter<u64>,
    payments_settled: Counter<u64>,
}

impl PaymentMetrics {
    fn new() -> Arc<Self> {
        let meter = global::meter(METER_NAME);
        let payments_created = meter
            .u64_counter("payments_created_total")
            .with_description("Number of client payments and team payouts recorded")
            .with_unit("count")
            .init();

        let payments_settled = meter
            .u64_counter("payments_settled_total")
            .with_description("Number of payments moved to the paid status")
            .with_unit("count")
            .init();

        Arc::new(Self {
            payments_created,
            payments_settled,
        })
    }

    pub fn record_created(&self, ledger: PaymentLedger, currency: &str) {
        self.payments_created.add(
            1,
            &[
                KeyValue::new("ledger", ledger.as_str()),
                KeyValue::new("currency", currency.to_string()),
            ],
        );
    }

    pub fn record_settled(&self, ledger: PaymentLedger, currency: &str) {
        self.payments_settled.add(
            1,
            &[
                KeyValue::new("ledger", ledger.as_str()),
                KeyValue::new("currency", currency.to_string()),
            ],
        );
    }
}

#[derive(Debug)]
pub struct NotificationMetrics {
    overdue_notifications: Counter<u64>,
}

impl NotificationMetrics {
    fn new() -> Arc<Self> {
        let overdue_notifications = global::meter(METER_NAME)
            .u64_counter("overdue_payment_notifications_total")
            .with_description("Number of notifications raised for overdue team payouts")
            .with_unit("count")
            .init();

        Arc::new(Self {
            overdue_notifications,
        })
    }

    pub fn record_overdue_notifications(&self, count: u64) {
        if count > 0 {
            self.overdue_notifications.add(count, &[]);
        }
    }
}

#[derive(Debug)]
pub struct ChatMetrics {
    messages_relayed: Counter<u64>,
}

impl ChatMetrics {
    fn new() -> Arc<Self> {
        let messages_relayed = global::meter(METER_NAME)
            .u64_counter("chat_messages_relayed_total")
            .with_description("Number of chat messages forwarded to the assistant webhook")
            .with_unit("count")
            .init();

        Arc::new(Self { messages_relayed })
    }

    pub fn record_relayed(&self, outcome: RelayOutcome) {
        self.messages_relayed
            .add(1, &[KeyValue::new("outcome", outcome.as_str())]);
    }
}

#[derive(Clone, Copy, Debug)]
pub enum PaymentLedger {
    Client,
    Team,
}

impl PaymentLedger {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Team => "team",
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub enum RelayOutcome {
    Delivered,
    Failed,
}

impl RelayOutcome {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Delivered => "delivered",
            Self::Failed => "failed",
        }
    }
}
