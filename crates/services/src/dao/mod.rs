pub mod attendance;
pub mod base;
pub mod session;
pub mod user;

pub use base::BaseDao;
