use chrono::Utc;

pub fn now_i64() -> i64 {
    Utc::now().timestamp()
}

/// Seconds since the UNIX epoch, clamped at zero.
pub fn now_unix() -> u64 {
    now_i64().max(0) as u64
}
