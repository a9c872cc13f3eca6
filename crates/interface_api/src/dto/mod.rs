//! Request and response bodies

pub mod quotes;
pub mod plans;
