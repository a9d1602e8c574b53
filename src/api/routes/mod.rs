//! API Routes
//!
//! Route handlers organized by functionality.

pub mod health;
pub mod sample;
pub mod sessions;
pub mod summarize;
