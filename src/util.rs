//! Small formatting helpers shared by the command handlers.

use chrono::{DateTime, Utc};

/// Render a past UTC instant as a rough relative phrase ("3 months ago").
pub fn pretty_date(time: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now - time;
    if diff < chrono::Duration::zero() {
        return "something's wrong".to_string();
    }
    let day_diff = diff.num_days();
    let second_diff = (diff - chrono::Duration::days(day_diff)).num_seconds();

    if day_diff == 0 {
        if second_diff < 10 {
            return "just now".to_string();
        }
        if second_diff < 60 {
            return format!("{} seconds ago", second_diff);
        }
        if second_diff < 120 {
            return "a minute ago".to_string();
        }
        if second_diff < 3600 {
            return format!("{} minutes ago", second_diff / 60);
        }
        if second_diff < 7200 {
            return "an hour ago".to_string();
        }
        return format!("{} hours ago", second_diff / 3600);
    }
    if day_diff < 7 {
        return format!("{} days ago", day_diff);
    }
    if day_diff < 31 {
        return format!("{} weeks ago", day_diff / 7);
    }
    if day_diff < 365 {
        return format!("{} months ago", day_diff / 30);
    }
    format!("{} years ago", day_diff / 365)
}

/// Format a second count as `H:MM:SS`.
pub fn fmt_duration(total_seconds: i64) -> String {
    let total_seconds = total_seconds.max(0);
    format!(
        "{}:{:02}:{:02}",
        total_seconds / 3600,
        (total_seconds % 3600) / 60,
        total_seconds % 60
    )
}

/// Insert thousands separators into a non-negative integer.
pub fn group_thousands(n: i64) -> String {
    let digits = n.abs().to_string();
    let mut out = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if n < 0 {
        format!("-{}", out)
    } else {
        out
    }
}
