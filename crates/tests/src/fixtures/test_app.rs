use cohort_api::{build_router, state::AppState};
use cohort_config::Settings;
use cohort_db::connect;
use cohort_services::{
    AuthService,
    dao::{session::SessionDao, user::UserDao},
};
use mongodb::Database;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use super::provider::ScriptedConnector;

/// A running test application with its own MongoDB database.
pub struct TestApp {
    pub addr: SocketAddr,
    pub base_url: String,
    pub db: Database,
    pub settings: Settings,
    pub client: reqwest::Client,
    pub provider: Arc<ScriptedConnector>,
    pub auth: AuthService,
    pub users: UserDao,
    pub sessions: SessionDao,
}

impl TestApp {
    /// Spawn a new test server backed by a scripted meeting provider.
    ///
    /// Requires a running MongoDB (default localhost:27017).
    /// Set COHORT__DATABASE__URL to override the connection string.
    /// Each test gets a unique database name for isolation.
    pub async fn spawn() -> Self {
        let db_name = format!("cohort_test_{}", uuid::Uuid::new_v4().simple());

        let mut settings = Settings::load().unwrap_or_else(|_| test_settings());
        settings.database.name = db_name;

        let db = connect(&settings)
            .await
            .expect("Failed to connect to MongoDB");

        let provider = Arc::new(ScriptedConnector::default());
        let app_state = AppState::with_provider(db.clone(), settings.clone(), provider.clone());
        let app = build_router(app_state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let base_url = format!("http://{}", addr);
        let client = reqwest::Client::builder()
            .build()
            .expect("Failed to build HTTP client");

        Self {
            addr,
            base_url,
            auth: AuthService::new(settings.jwt.clone()),
            users: UserDao::new(&db),
            sessions: SessionDao::new(&db),
            db,
            settings,
            client,
            provider,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let db = self.db.clone();
        // Best effort cleanup: drop the test database
        tokio::spawn(async move {
            let _ = db.drop().await;
        });
    }
}

fn test_settings() -> Settings {
    Settings {
        app: cohort_config::AppSettings {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec![],
        },
        database: cohort_config::DatabaseSettings {
            url: "mongodb://localhost:27017".to_string(),
            name: "cohort_test".to_string(),
            max_pool_size: Some(5),
            min_pool_size: Some(1),
            app_name: "cohort-tests".to_string(),
            server_selection_timeout_secs: 5,
        },
        jwt: cohort_config::JwtSettings {
            secret: "test-secret-key-for-jwt-signing-minimum-32-chars".to_string(),
            issuer: "cohort".to_string(),
            access_token_ttl_secs: 3600,
        },
        zoom: cohort_config::ZoomSettings {
            account_id: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            api_base_url: "http://127.0.0.1:9".to_string(),
            oauth_url: "http://127.0.0.1:9/oauth/token".to_string(),
            request_timeout_secs: 5,
            page_size: 300,
        },
    }
}
