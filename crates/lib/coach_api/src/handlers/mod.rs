//! Request handlers.

pub mod growth_coach;
pub mod health;
