pub mod attendance;
pub mod session;
pub mod user;
pub mod user_alias;

pub use attendance::*;
pub use session::*;
pub use user::*;
pub use user_alias::*;
