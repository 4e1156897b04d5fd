//! Elapsed-time formatting for training runs

use std::time::Duration;

/// Format a duration as seconds, minutes or hours.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1} sec", secs)
    } else if secs < 3600.0 {
        format!("{:.1} min", secs / 60.0)
    } else {
        format!("{:.1} hr", secs / 3600.0)
    }
}
