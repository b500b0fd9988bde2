use mongodb::Database;
use cohort_config::Settings;
use cohort_services::{
    AttendanceReconciler, AuthService, ZoomService,
    attendance::{AttendanceStore, IdentityDirectory, ProviderConnector, ProviderError, SessionStore},
    dao::{attendance::AttendanceDao, session::SessionDao, user::UserDao},
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub settings: Settings,
    pub auth: Arc<AuthService>,
    pub users: Arc<UserDao>,
    pub sessions: Arc<SessionDao>,
    pub attendance: Arc<AttendanceDao>,
    pub reconciler: Arc<AttendanceReconciler>,
    pub provider: Arc<dyn ProviderConnector>,
}

impl AppState {
    pub fn new(db: Database, settings: Settings) -> Result<Self, ProviderError> {
        let zoom = Arc::new(ZoomService::new(settings.zoom.clone())?);
        Ok(Self::with_provider(db, settings, zoom))
    }

    /// Builds the state around an arbitrary meeting provider.
    pub fn with_provider(
        db: Database,
        settings: Settings,
        provider: Arc<dyn ProviderConnector>,
    ) -> Self {
        let auth = Arc::new(AuthService::new(settings.jwt.clone()));
        let users = Arc::new(UserDao::new(&db));
        let sessions = Arc::new(SessionDao::new(&db));
        let attendance = Arc::new(AttendanceDao::new(&db));
        let reconciler = Arc::new(AttendanceReconciler::new(
            users.clone() as Arc<dyn IdentityDirectory>,
            sessions.clone() as Arc<dyn SessionStore>,
            attendance.clone() as Arc<dyn AttendanceStore>,
        ));

        Self {
            db,
            settings,
            auth,
            users,
            sessions,
            attendance,
            reconciler,
            provider,
        }
    }
}
