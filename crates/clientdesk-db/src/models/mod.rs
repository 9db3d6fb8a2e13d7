pub mod activity;
pub mod assignment;
pub mod client;
pub mod deliverable;
pub mod meeting;
pub mod notification;
pub mod payment;
pub mod phase;
pub mod profile;
pub mod project;
pub mod rate;
pub mod team_payment;

pub use activity::{Activity, NewActivity};
pub use assignment::{NewProjectAssignment, ProjectAssignment};
pub use client::{Client, ClientUpdate, NewClient};
pub use deliverable::{Deliverable, DeliverableUpdate, NewDeliverable};
pub use meeting::{Meeting, MeetingUpdate, NewMeeting};
pub use notification::{NewNotification, Notification};
pub use payment::{NewPayment, Payment, PaymentFilter, PaymentUpdate};
pub use phase::{NewPhase, Phase, PhaseUpdate};
pub use profile::{NewProfile, Profile, ProfileUpdate};
pub use project::{NewProject, Project, ProjectFilter, ProjectUpdate};
pub use rate::{NewTeamPaymentRate, TeamPaymentRate, TeamPaymentRateUpdate};
pub use team_payment::{NewTeamPayment, TeamPayment, TeamPaymentFilter, TeamPaymentUpdate};
