pub mod user;
pub mod announcement;
pub mod serde_helpers;

pub use user::*;
pub use announcement::*;
