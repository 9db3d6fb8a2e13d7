use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};
use utoipa::ToSchema;

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
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Bucket {
    ProjectDocuments,
    ClientLogos,
}

impl Bucket {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn bucket_names() {
        assert_eq!(Bucket::ProjectDocuments.as_str(), "project-documents");
        assert_eq!(Bucket::from_str("client-logos").unwrap(), Bucket::ClientLogos);
        assert!(Bucket::from_str("avatars").is_err());
    }
}
