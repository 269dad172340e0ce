pub mod backend_service;
pub mod session_service;

pub use backend_service::*;
pub use session_service::*;
