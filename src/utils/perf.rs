//! Performance measurement utilities for the scalability experiments.
//!
//! Memory figures are read from `/proc/self/status`, so they are only
//! available on Linux.

use std::time::Instant;

/// Reads the peak virtual memory size (`VmPeak`) of the current process.
///
/// # Returns
/// The peak memory usage in kilobytes (KB), or 0 if the value cannot be read.
#[cfg(target_os = "linux")]
pub fn get_peak_rss_kb() -> u64 {
    let Ok(status) = std::fs::read_to_string("/proc/self/status") else {
        return 0;
    };
    status
        .lines()
        .find_map(|line| line.strip_prefix("VmPeak:"))
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|value| value.parse().ok())
        .unwrap_or(0)
}

#[cfg(not(target_os = "linux"))]
pub fn get_peak_rss_kb() -> u64 {
    use std::sync::Once;
    static WARN_ONCE: Once = Once::new();
    WARN_ONCE.call_once(|| {
        log::warn!("Peak memory measurement is only supported on Linux; reporting 0.");
    });
    0
}

/// Runs `op` and returns its output together with the elapsed wall time in seconds.
pub fn timed<R>(op: impl FnOnce() -> R) -> (R, f64) {
    let start = Instant::now();
    let out = op();
    (out, start.elapsed().as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timed_returns_output() {
        let (value, seconds) = timed(|| 21 * 2);
        assert_eq!(value, 42);
        assert!(seconds >= 0.0);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_peak_memory_is_reported() {
        assert!(get_peak_rss_kb() > 0);
    }
}
