pub mod latency;
pub mod logging;
pub mod validation;

pub use latency::{LatencyKind, random_delay, simulate};
pub use logging::init_json_logger;
pub use validation::validate_username;
