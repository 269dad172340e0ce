pub mod admin;
pub mod auth;
pub mod prize;
pub mod user;

pub use admin::admin_config;
pub use auth::auth_config;
pub use prize::prize_config;
pub use user::user_config;
