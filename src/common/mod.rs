//! Shared types, errors, traits and channels

pub mod channels;
pub mod errors;
pub mod traits;
pub mod types;
