use std::time::Duration;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

pub const API_PREFIX: &str = "/api/v1";

/// How often idle realtime channels and stale OAuth states are swept.
pub const MAINTENANCE_INTERVAL: Duration = Duration::from_secs(60);
