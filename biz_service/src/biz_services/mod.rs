pub mod login_log_service;
pub mod role_service;
pub mod user_service;

pub use login_log_service::*;
pub use role_service::*;
pub use user_service::*;
