use std::time::Duration;

use cohort_config::Settings;
use mongodb::{Client, Database, options::ClientOptions};
use tracing::info;

use crate::indexes::ensure_indexes;

/// Connects to the attendance database, verifies the server answers and
/// makes sure every collection index exists before the database is handed
/// out.
pub async fn connect(settings: &Settings) -> Result<Database, mongodb::error::Error> {
    let db_settings = &settings.database;
    let mut client_options = ClientOptions::parse(&db_settings.url).await?;

    client_options.app_name = Some(db_settings.app_name.clone());
    client_options.server_selection_timeout =
        Some(Duration::from_secs(db_settings.server_selection_timeout_secs));
    if let Some(max_pool) = db_settings.max_pool_size {
        client_options.max_pool_size = Some(max_pool);
    }
    if let Some(min_pool) = db_settings.min_pool_size {
        client_options.min_pool_size = Some(min_pool);
    }

    let client = Client::with_options(client_options)?;
    let db = client.database(&db_settings.name);

    db.run_command(bson::doc! { "ping": 1 }).await?;
    info!(db = %db_settings.name, app = %db_settings.app_name, "Connected to MongoDB");

    ensure_indexes(&db).await?;

    Ok(db)
}
