//! Platform abstraction layer
//!
//! The simulation never reads the clock; wall time is only used by the
//! driver for seeding and the FPS readout.

/// Milliseconds since an arbitrary epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Fresh gap-layout seed, mixed from OS entropy and wall time
pub fn session_seed() -> u32 {
    rand::random::<u32>() ^ (now_ms() as u64 as u32)
}
