pub mod activity;
pub mod analytics;
pub mod assignment;
pub mod client;
pub mod deliverable;
pub mod meeting;
pub mod notification;
pub mod payment;
pub mod phase;
pub mod project;
pub mod query;
pub mod rate;
pub mod response;
pub mod user;

pub use activity::*;
pub use analytics::*;
pub use assignment::*;
pub use client::*;
pub use deliverable::*;
pub use meeting::*;
pub use notification::*;
pub use payment::*;
pub use phase::*;
pub use project::*;
pub use query::*;
pub use rate::*;
pub use response::*;
pub use user::*;
