pub mod attendance;
pub mod auth;
pub mod dao;
pub mod zoom;

pub use attendance::AttendanceReconciler;
pub use auth::AuthService;
pub use dao::BaseDao;
pub use zoom::ZoomService;
