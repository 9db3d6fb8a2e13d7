pub mod currency;
pub mod realtime;
pub mod role;
pub mod status;
pub mod storage;

pub use currency::Currency;
pub use realtime::{ChangeAction, ChangeTable};
pub use role::UserRole;
pub use status::{
    DeliverableStatus, MeetingStatus, PaymentStatus, PhaseStatus, ProjectStatus, RateType,
};
pub use storage::Bucket;
