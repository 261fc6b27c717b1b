//! Route paths.

pub const POST_API_GROWTH_COACH: &str = "/api/growth-coach";
pub const GET_API_HEALTH: &str = "/api/health";
