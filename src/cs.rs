pub mod randomized;
pub mod security;

// Re-export all modules
pub use randomized::*;
pub use security::*;
