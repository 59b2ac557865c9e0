use cr_dashboard::db::{create_pool, run_migrations};
use cr_dashboard::deliverable::DeliverableRepository;
use cr_dashboard::email::{EmailService, ResendTransport};
use cr_dashboard::notification::notifier::NotifierPolicy;
use cr_dashboard::notification::{start_reminder_service, NotificationRepository, Notifier};
use cr_dashboard::phase::PhaseRepository;
use cr_dashboard::profile::ProfileRepository;
use cr_dashboard::routes::create_router;
use cr_dashboard::state::{AppState, Config};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,cr_dashboard=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Arc::new(Config::from_env());

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    tracing::info!("Connecting to database...");
    let db = create_pool(&database_url).await?;

    tracing::info!("Running migrations...");
    run_migrations(&db).await?;

    // Create repositories
    let profile_repository = ProfileRepository::new(db.clone());
    let deliverable_repository = DeliverableRepository::new(db.clone());
    let notification_repository = NotificationRepository::new(db.clone());
    let phase_repository = PhaseRepository::new(db.clone());

    // Create the mutation fan-out services
    let notifier = Notifier::new(
        profile_repository.clone(),
        notification_repository.clone(),
        NotifierPolicy {
            suppress_status_change_on_completion: config.suppress_status_change_on_completion,
        },
    );
    let transport = Arc::new(ResendTransport::new(
        config.resend_api_key.clone(),
        config.email_from.clone(),
    ));
    let email_service = EmailService::new(
        transport,
        config.team_directory.clone(),
        config.ops_email.clone(),
        config.app_url.clone(),
    );

    // Create application state
    let state = AppState {
        db: db.clone(),
        config: config.clone(),
        profile_repository,
        deliverable_repository,
        notification_repository,
        phase_repository,
        notifier,
        email_service,
    };

    // Start the due-date reminder sweep
    let reminder_state = state.clone();
    tokio::spawn(async move {
        if let Err(e) = start_reminder_service(reminder_state).await {
            tracing::error!("Reminder service error: {:?}", e);
        }
    });

    // Create router
    let app = create_router(state);

    // Start server
    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("{}:{}", host, port);

    tracing::info!("Server starting on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
