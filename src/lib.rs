pub mod cs;
pub mod error;
pub mod math;

pub use cs::security;
pub use error::{Error, Result};
pub use math::number_theory;
