use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};
use utoipa::ToSchema;

/// Amounts are summed nominally across currencies; no conversion happens
/// anywhere in the service.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
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
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl Currency {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!(Currency::from_str("eur").unwrap(), Currency::EUR);
        assert_eq!(Currency::from_str("USD").unwrap(), Currency::USD);
        assert!(Currency::from_str("XYZ").is_err());
    }

    #[test]
    fn stored_form_is_uppercase() {
        assert_eq!(Currency::GBP.as_str(), "GBP");
        assert_eq!(
            serde_json::to_string(&Currency::CAD).unwrap_or_default(),
            "\"CAD\""
        );
    }
}
