pub mod errors;
pub mod types;

pub use errors::PriorityError;
pub use types::{PriorityClass, ThreadPriorityLevel};
