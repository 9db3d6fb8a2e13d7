#![allow(clippy::needless_for_each)]

use anyhow::Result;
use serde_json::to_string_pretty;
use std::path::PathBuf;
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::openapi::{ServerBuilder, ServerVariableBuilder};
use utoipauto::utoipauto;

pub struct ServerAddon;

impl Modify for ServerAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let version_variable = ServerVariableBuilder::new()
            .default_value("v1")
            .enum_values(Some(vec!["v1"]))
            .build();
        openapi.servers = Some(vec![
            ServerBuilder::new()
                .url("/{version}")
                .parameter("version", version_variable)
                .build(),
        ]);
    }
}

/// Registers the `bearer` scheme referenced by every authenticated path.
pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[utoipauto(paths = "./crates/clientdesk-api/src/")]
#[derive(OpenApi)]
#[openapi(
    modifiers(&ServerAddon, &SecurityAddon),
    tags(
        (name = "clientdesk_bin", description = "Client management API"),
        (name = "Projects", description = "Project endpoints"),
        (name = "Clients", description = "Client directory endpoints"),
        (name = "Payments", description = "Client payment endpoints"),
        (name = "Team Payments", description = "Team member payout endpoints"),
        (name = "Rates", description = "Team payment rate endpoints"),
        (name = "Deliverables", description = "Project deliverable endpoints"),
        (name = "Phases", description = "Project phase endpoints"),
        (name = "Meetings", description = "Meeting endpoints"),
        (name = "Activities", description = "Activity log endpoints"),
        (name = "Notifications", description = "Notification endpoints"),
        (name = "Users", description = "User profile endpoints"),
        (name = "Assignments", description = "Project assignment endpoints"),
        (name = "Analytics", description = "Payment analytics and projections"),
        (name = "Storage", description = "Object storage endpoints"),
        (name = "Chat", description = "Chat assistant relay"),
        (name = "Realtime", description = "Change feed over websocket")
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    pub fn generate_openapi_json(output_path: PathBuf) -> Result<()> {
        let openapi = Self::openapi();
        let json = to_string_pretty(&openapi)?;

        let file_path = output_path.join("openapi.json");

        tracing::info!("Saving OpenAPI specs to {}...", file_path.display());

        std::fs::write(&file_path, json)?;
        tracing::info!("OpenAPI specs saved!");
        Ok(())
    }
}
