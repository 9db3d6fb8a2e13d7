use axum::Router;
use axum::http::StatusCode;
use axum::middleware::from_fn_with_state;
use axum::response::IntoResponse;
use axum::routing::{delete, get, patch, post, put};

use utoipa::OpenApi as OpenApiT;
use utoipa_swagger_ui::SwaggerUi;

use crate::{AppState, auth, handlers};

pub fn api_router<T: OpenApiT>(state: AppState) -> Router<AppState> {
    let open_api = T::openapi();

    let project_assignments = Router::new()
        .route(
            "/{project_id}/assignments",
            get(handlers::list_project_assignments).post(handlers::assign_user),
        )
        .route(
            "/{project_id}/assignments/{user_id}",
            delete(handlers::unassign_user),
        )
        .route_layer(from_fn_with_state(state.clone(), auth::admin_gate));

    let projects_router = Router::new()
        .route(
            "/",
            get(handlers::list_projects).post(handlers::create_project),
        )
        .route(
            "/{project_id}",
            get(handlers::get_project)
                .patch(handlers::update_project)
                .delete(handlers::delete_project),
        )
        .route(
            "/{project_id}/deliverables",
            get(handlers::list_project_deliverables).post(handlers::create_deliverable),
        )
        .route(
            "/{project_id}/phases",
            get(handlers::list_project_phases).post(handlers::create_phase),
        )
        .route(
            "/{project_id}/meetings",
            get(handlers::list_project_meetings).post(handlers::create_meeting),
        )
        .merge(project_assignments);

    let clients_router = Router::new()
        .route("/", get(handlers::list_clients).post(handlers::create_client))
        .route(
            "/{client_id}",
            get(handlers::get_client)
                .patch(handlers::update_client)
                .delete(handlers::delete_client),
        )
        .route("/{client_id}/logo", put(handlers::upload_client_logo));

    let payments_router = Router::new()
        .route("/", get(handlers::list_payments).post(handlers::create_payment))
        .route(
            "/{payment_id}",
            get(handlers::get_payment)
                .patch(handlers::update_payment)
                .delete(handlers::delete_payment),
        )
        .route("/{payment_id}/mark-paid", post(handlers::mark_payment_paid));

    let team_payments_router = Router::new()
        .route(
            "/",
            get(handlers::list_team_payments).post(handlers::create_team_payment),
        )
        .route(
            "/{payment_id}",
            get(handlers::get_team_payment)
                .patch(handlers::update_team_payment)
                .delete(handlers::delete_team_payment),
        )
        .route(
            "/{payment_id}/mark-paid",
            post(handlers::mark_team_payment_paid),
        )
        .route_layer(from_fn_with_state(state.clone(), auth::team_gate));

    let rates_router = Router::new()
        .route("/", get(handlers::list_rates).post(handlers::create_rate))
        .route(
            "/{rate_id}",
            patch(handlers::update_rate).delete(handlers::delete_rate),
        )
        .route("/{rate_id}/deactivate", post(handlers::deactivate_rate))
        .route_layer(from_fn_with_state(state.clone(), auth::admin_gate));

    let deliverables_router = Router::new()
        .route(
            "/{deliverable_id}",
            get(handlers::get_deliverable)
                .patch(handlers::update_deliverable)
                .delete(handlers::delete_deliverable),
        )
        .route(
            "/{deliverable_id}/file/{file_name}",
            put(handlers::upload_deliverable_file),
        );

    let phases_router = Router::new().route(
        "/{phase_id}",
        patch(handlers::update_phase).delete(handlers::delete_phase),
    );

    let meetings_router = Router::new()
        .route("/upcoming", get(handlers::list_upcoming_meetings))
        .route(
            "/{meeting_id}",
            patch(handlers::update_meeting).delete(handlers::delete_meeting),
        );

    let notifications_router = Router::new()
        .route("/", get(handlers::list_notifications))
        .route("/unread-count", get(handlers::unread_notification_count))
        .route("/read-all", post(handlers::mark_all_notifications_read))
        .route(
            "/{notification_id}/read",
            post(handlers::mark_notification_read),
        );

    let me_router = Router::new()
        .route("/", get(handlers::get_me).patch(handlers::update_me))
        .route("/projection", get(handlers::get_my_projection));

    let users_router = Router::new()
        .route("/", get(handlers::list_users))
        .route("/{user_id}", get(handlers::get_user))
        .route("/{user_id}/role", patch(handlers::update_user_role))
        .route("/{user_id}/assignments", get(handlers::list_user_assignments))
        .route_layer(from_fn_with_state(state.clone(), auth::admin_gate));

    let analytics_router = Router::new()
        .route("/team-payments", get(handlers::get_team_payment_analytics))
        .route("/admin/metrics", get(handlers::get_admin_metrics))
        .route("/admin/charts", get(handlers::get_admin_charts))
        .route("/projection/{user_id}", get(handlers::get_member_projection))
        .route_layer(from_fn_with_state(state, auth::admin_gate));

    let storage_router = Router::new()
        .route("/{bucket}", get(handlers::list_objects))
        .route(
            "/{bucket}/{*key}",
            get(handlers::get_object)
                .put(handlers::put_object)
                .delete(handlers::delete_object),
        );

    Router::new()
        .route("/health", get(health))
        .nest("/v1/projects", projects_router)
        .nest("/v1/clients", clients_router)
        .nest("/v1/payments", payments_router)
        .nest("/v1/team-payments", team_payments_router)
        .nest("/v1/rates", rates_router)
        .nest("/v1/deliverables", deliverables_router)
        .nest("/v1/phases", phases_router)
        .nest("/v1/meetings", meetings_router)
        .nest("/v1/notifications", notifications_router)
        .nest("/v1/me", me_router)
        .nest("/v1/users", users_router)
        .nest("/v1/analytics", analytics_router)
        .nest("/v1/storage", storage_router)
        .route("/v1/activities", get(handlers::list_activities))
        .route("/v1/chat", post(handlers::send_chat_message))
        .route("/v1/realtime", get(handlers::realtime_ws))
        .merge(SwaggerUi::new("/v1/docs").url("/v1/docs/openapi.json", open_api))
        .fallback(handler_404)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn handler_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        "The requested resource was not found",
    )
}
