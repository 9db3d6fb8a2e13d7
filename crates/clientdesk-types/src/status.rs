use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};
use utoipa::ToSchema;

macro_rules! text_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            Serialize,
            Deserialize,
            ToSchema,
            Hash,
            Eq,
            PartialEq,
            Display,
            AsRefStr,
            EnumString,
            EnumIter,
            IntoStaticStr,
        )]
        #[strum(serialize_all = "snake_case", ascii_case_insensitive)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(self) -> &'static str {
                self.into()
            }
        }
    };
}

text_enum!(
    /// Lifecycle of both client payments and team payouts.
    PaymentStatus {
        Pending,
        Approved,
        Paid,
        Cancelled,
    }
);

impl PaymentStatus {
    /// Pending and approved payments still owe money.
    pub const fn is_outstanding(self) -> bool {
        matches!(self, Self::Pending | Self::Approved)
    }

    /// Only settled payments keep a payment date.
    pub const fn carries_payment_date(self) -> bool {
        matches!(self, Self::Paid)
    }
}

text_enum!(RateType { Salary, Hourly, Bonus });

text_enum!(ProjectStatus {
    Planning,
    Active,
    OnHold,
    Completed,
    Cancelled,
});

text_enum!(DeliverableStatus {
    Pending,
    InProgress,
    Review,
    Completed,
});

text_enum!(MeetingStatus {
    Scheduled,
    Completed,
    Cancelled,
});

text_enum!(
    /// Derived from today's date against the phase window, never stored.
    PhaseStatus {
        Upcoming,
        Active,
        Completed,
    }
);

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn snake_case_storage_names() {
        assert_eq!(ProjectStatus::OnHold.as_str(), "on_hold");
        assert_eq!(DeliverableStatus::InProgress.as_str(), "in_progress");
        assert_eq!(
            ProjectStatus::from_str("on_hold").unwrap(),
            ProjectStatus::OnHold
        );
    }

    #[test]
    fn outstanding_payments() {
        let outstanding: Vec<_> = PaymentStatus::iter()
            .filter(|s| s.is_outstanding())
            .collect();
        assert_eq!(outstanding, vec![PaymentStatus::Pending, PaymentStatus::Approved]);
    }

    #[test]
    fn only_paid_payments_carry_a_date() {
        let dated: Vec<_> = PaymentStatus::iter()
            .filter(|s| s.carries_payment_date())
            .collect();
        assert_eq!(dated, vec![PaymentStatus::Paid]);
    }
}
