use std::time::Duration;

/// Default tick interval in milliseconds
pub const DEFAULT_TICK_MS: u64 = 250;

/// Get tick duration for a configured interval (0 means the default)
pub fn tick_duration(tick_ms: u64) -> Duration {
    if tick_ms == 0 {
        Duration::from_millis(DEFAULT_TICK_MS)
    } else {
        Duration::from_millis(tick_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_duration() {
        assert_eq!(tick_duration(0), Duration::from_millis(250));
        assert_eq!(tick_duration(1000), Duration::from_secs(1));
    }
}
