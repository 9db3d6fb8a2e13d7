pub mod activities;
pub mod analytics;
pub mod assignments;
pub mod chat;
pub mod clients;
pub mod deliverables;
pub mod meetings;
pub mod notifications;
pub mod payments;
pub mod phases;
pub mod projects;
pub mod rates;
pub mod realtime;
pub mod storage;
pub mod team_payments;
pub mod users;

pub use activities::list_activities;
pub use analytics::{
    get_admin_charts, get_admin_metrics, get_member_projection, get_my_projection,
    get_team_payment_analytics,
};
pub use assignments::{assign_user, list_project_assignments, list_user_assignments, unassign_user};
pub use chat::send_chat_message;
pub use clients::{
    create_client, delete_client, get_client, list_clients, update_client, upload_client_logo,
};
pub use deliverables::{
    create_deliverable, delete_deliverable, get_deliverable, list_project_deliverables,
    update_deliverable, upload_deliverable_file,
};
pub use meetings::{
    create_meeting, delete_meeting, list_project_meetings, list_upcoming_meetings, update_meeting,
};
pub use notifications::{
    list_notifications, mark_all_notifications_read, mark_notification_read,
    unread_notification_count,
};
pub use payments::{
    create_payment, delete_payment, get_payment, list_payments, mark_payment_paid, update_payment,
};
pub use phases::{create_phase, delete_phase, list_project_phases, update_phase};
pub use projects::{create_project, delete_project, get_project, list_projects, update_project};
pub use rates::{create_rate, deactivate_rate, delete_rate, list_rates, update_rate};
pub use realtime::realtime_ws;
pub use storage::{delete_object, get_object, list_objects, put_object};
pub use team_payments::{
    create_team_payment, delete_team_payment, get_team_payment, list_team_payments,
    mark_team_payment_paid, update_team_payment,
};
pub use users::{get_me, get_user, list_users, update_me, update_user_role};
