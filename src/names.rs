// Quiz policy bounds
pub const MIN_TIME_LIMIT_MINUTES: i32 = 1;
pub const MAX_TIME_LIMIT_MINUTES: i32 = 180;

/// Header carrying the authenticated user id, set by the fronting auth layer.
pub const USER_ID_HEADER: &str = "x-user-id";
