//! Route handlers

pub mod quotes;
pub mod plans;
pub mod health;
