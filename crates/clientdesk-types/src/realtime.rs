use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};
use utoipa::ToSchema;

use crate::UserRole;

/// Tables that publish on the realtime change feed.
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
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ChangeTable {
    Projects,
    Clients,
    Payments,
    TeamPayments,
    TeamPaymentRates,
    Deliverables,
    Phases,
    Meetings,
    Activities,
    Profiles,
    UserProjectAssignments,
    Notifications,
}

impl ChangeTable {
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Payout tables follow the same gates as their routes.
    pub const fn visible_to(self, role: UserRole) -> bool {
        match self {
            Self::TeamPayments => !matches!(role, UserRole::Client),
            Self::TeamPaymentRates => matches!(role, UserRole::Admin),
            _ => true,
        }
    }

    pub fn visible_tables(role: UserRole) -> impl Iterator<Item = Self> {
        Self::iter().filter(move |table| table.visible_to(role))
    }
}

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
    IntoStaticStr,
)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeAction {
    Insert,
    Update,
    Delete,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn table_names_match_schema() {
        assert_eq!(ChangeTable::TeamPaymentRates.as_str(), "team_payment_rates");
        assert_eq!(
            ChangeTable::from_str("user_project_assignments").unwrap(),
            ChangeTable::UserProjectAssignments
        );
    }

    #[test]
    fn payout_tables_are_hidden_from_outsiders() {
        assert_eq!(
            ChangeTable::visible_tables(UserRole::Admin).count(),
            ChangeTable::iter().count()
        );

        let hidden = |role| {
            ChangeTable::iter()
                .filter(|t| !t.visible_to(role))
                .collect::<Vec<_>>()
        };
        assert_eq!(hidden(UserRole::Team), vec![ChangeTable::TeamPaymentRates]);
        assert_eq!(
            hidden(UserRole::Client),
            vec![ChangeTable::TeamPayments, ChangeTable::TeamPaymentRates]
        );
    }
}
