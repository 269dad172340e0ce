pub mod common;
pub mod prize;
pub mod spin;
pub mod user;
pub mod win_record;

pub use common::*;
pub use prize::*;
pub use spin::*;
pub use user::*;
pub use win_record::*;
