/// Application name
pub const APP_NAME: &str = "Torque";

/// Reliability score stored for a car when the caller leaves it out
pub const DEFAULT_RELIABILITY: i32 = 3;

/// Role assigned to a new user unless one is supplied
pub const DEFAULT_ROLE: &str = "user";

/// Field name reported when the payload itself is malformed
pub const PAYLOAD_FIELD: &str = "payload";
