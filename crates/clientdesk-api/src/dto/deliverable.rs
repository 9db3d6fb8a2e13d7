use chrono::{DateTime, NaiveDate, Utc};
use clientdesk_db::models::Deliverable;
use clientdesk_types::DeliverableStatus;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeliverableDTO {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub due_date: Option<NaiveDate>,
    /// Key of the attached file in the `project-documents` bucket
    pub file_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Deliverable> for DeliverableDTO {
    fn from(deliverable: Deliverable) -> Self {
        Self {
            id: deliverable.id,
            project_id: deliverable.project_id,
            title: deliverable.title,
            description: deliverable.description,
            status: deliverable.status,
            due_date: deliverable.due_date,
            file_path: deliverable.file_path,
            created_at: deliverable.created_at,
            updated_at: deliverable.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateDeliverableRequest {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<DeliverableStatus>,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateDeliverableRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<DeliverableStatus>,
    pub due_date: Option<NaiveDate>,
    pub file_path: Option<String>,
}
