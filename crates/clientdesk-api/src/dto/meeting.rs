use chrono::{DateTime, Utc};
use clientdesk_db::models::Meeting;
use clientdesk_types::MeetingStatus;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MeetingDTO {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: i32,
    pub meeting_url: Option<String>,
    pub status: String,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Meeting> for MeetingDTO {
    fn from(meeting: Meeting) -> Self {
        Self {
            id: meeting.id,
            project_id: meeting.project_id,
            title: meeting.title,
            description: meeting.description,
            scheduled_at: meeting.scheduled_at,
            duration_minutes: meeting.duration_minutes,
            meeting_url: meeting.meeting_url,
            status: meeting.status,
            created_by: meeting.created_by,
            created_at: meeting.created_at,
            updated_at: meeting.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateMeetingRequest {
    pub title: String,
    pub description: Option<String>,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: i32,
    pub meeting_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateMeetingRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i32>,
    pub meeting_url: Option<String>,
    pub status: Option<MeetingStatus>,
}
