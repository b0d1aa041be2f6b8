//! API Routes

pub mod analyze;
pub mod sessions;
