use cohort_api::{build_router, state::AppState};
use cohort_config::Settings;
use cohort_db::connect;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file (silently ignore if missing)
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "cohort_api=debug,cohort_services=debug,cohort_db=debug,tower_http=debug".into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::load()?;
    info!("Starting Cohort API on {}:{}", settings.app.host, settings.app.port);
    if settings.zoom.account_id.is_empty() {
        warn!("Zoom credentials are not configured; attendance imports will fail");
    }

    let db = connect(&settings).await?;

    let app_state = AppState::new(db, settings.clone())?;
    let app = build_router(app_state);

    let addr = format!("{}:{}", settings.app.host, settings.app.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
