use chrono::{DateTime, Utc};
use clientdesk_db::models::ProjectAssignment;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssignmentDTO {
    pub id: Uuid,
    pub user_id: Uuid,
    pub project_id: Uuid,
    pub role: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ProjectAssignment> for AssignmentDTO {
    fn from(assignment: ProjectAssignment) -> Self {
        Self {
            id: assignment.id,
            user_id: assignment.user_id,
            project_id: assignment.project_id,
            role: assignment.role,
            created_at: assignment.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateAssignmentRequest {
    pub user_id: Uuid,
    /// Free-form role on the project, e.g. `designer`
    pub role: Option<String>,
}
