use crate::{
    deliverable::deliverable_dto::{CreateDeliverableRequest, UpdateDeliverableRequest},
    deliverable::deliverable_handlers,
    deliverable::deliverable_models::{Deliverable, DeliverableStatus},
    email::email_handlers::{self, EmailSendRequest, EmailSendResponse},
    middleware::auth_middleware,
    notification::notification_dto::{
        BatchNotificationRequest, BatchNotificationResponse, CreateNotificationRequest,
        NotificationListResponse, UpdateNotificationRequest,
    },
    notification::notification_handlers,
    notification::notification_models::{Notification, NotificationType},
    phase::phase_handlers,
    phase::phase_models::{PhaseStatus, ProjectPhase},
    profile::profile_handlers,
    profile::profile_models::Profile,
    state::AppState,
};
use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        deliverable_handlers::get_deliverables,
        deliverable_handlers::create_deliverable,
        deliverable_handlers::update_deliverable,
        notification_handlers::list_notifications,
        notification_handlers::create_notification,
        notification_handlers::batch_update_notifications,
        phase_handlers::get_project_phases,
        profile_handlers::get_team_members,
        email_handlers::send_email,
    ),
    components(
        schemas(
            Deliverable,
            DeliverableStatus,
            CreateDeliverableRequest,
            UpdateDeliverableRequest,
            Notification,
            NotificationType,
            CreateNotificationRequest,
            UpdateNotificationRequest,
            BatchNotificationRequest,
            BatchNotificationResponse,
            NotificationListResponse,
            ProjectPhase,
            PhaseStatus,
            Profile,
            EmailSendRequest,
            EmailSendResponse,
        )
    ),
    tags(
        (name = "deliverables", description = "Deliverable management endpoints"),
        (name = "notifications", description = "Notification endpoints"),
        (name = "phases", description = "Project phase endpoints"),
        (name = "team", description = "Team member endpoints"),
        (name = "email", description = "Outbound email endpoints")
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::Http::new(
                        utoipa::openapi::security::HttpAuthScheme::Bearer,
                    ),
                ),
            )
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let deliverable_routes = Router::new()
        .route(
            "/",
            get(deliverable_handlers::get_deliverables)
                .post(deliverable_handlers::create_deliverable),
        )
        .route(
            "/:id",
            get(deliverable_handlers::get_deliverable)
                .put(deliverable_handlers::update_deliverable)
                .delete(deliverable_handlers::delete_deliverable),
        )
        .route(
            "/:id/history",
            get(deliverable_handlers::get_deliverable_history),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // The list route is mounted outside the auth layer: it degrades to an
    // empty payload for anonymous callers instead of answering 401.
    let notification_routes = Router::new()
        .route("/", post(notification_handlers::create_notification))
        .route("/batch", put(notification_handlers::batch_update_notifications))
        .route(
            "/:id",
            put(notification_handlers::update_notification)
                .delete(notification_handlers::delete_notification),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .route("/", get(notification_handlers::list_notifications));

    let phase_routes = Router::new()
        .route("/", get(phase_handlers::get_project_phases))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let team_routes = Router::new()
        .route("/", get(profile_handlers::get_team_members))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let email_routes = Router::new()
        .route("/send", post(email_handlers::send_email))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let api_routes = Router::new()
        .nest("/deliverables", deliverable_routes)
        .nest("/notifications", notification_routes)
        .nest("/project-phases", phase_routes)
        .nest("/team-members", team_routes)
        .nest("/email", email_routes);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(state)
}
