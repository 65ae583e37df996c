//! Reminder scheduling: parse, persist, arm, fire.
//!
//! A reminder is one `tokio` sleep task per pending entry. The persisted
//! store is the source of truth across restarts; stale entries are dropped
//! when re-arming at startup.

use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

use crate::dispatch::Platform;
use crate::error::Result;
use crate::state::BotState;

/// Parse a reminder timestamp relative to `now`.
///
/// Accepted shapes: RFC 3339, `YYYY-MM-DD HH:MM[:SS]`, a bare `HH:MM[:SS]`
/// (today), or a bare `YYYY-MM-DD` (midnight).
pub fn parse_when(input: &str, now: DateTime<Local>) -> Option<DateTime<Local>> {
    let input = input.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(input) {
        return Some(parsed.with_timezone(&Local));
    }

    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Local.from_local_datetime(&naive).earliest();
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Local
            .from_local_datetime(&date.and_hms_opt(0, 0, 0)?)
            .earliest();
    }

    for format in ["%H:%M:%S", "%H:%M"] {
        if let Ok(time) = NaiveTime::parse_from_str(input, format) {
            return Local
                .from_local_datetime(&now.date_naive().and_time(time))
                .earliest();
        }
    }

    None
}

/// Persist a reminder and arm its timer.
pub async fn schedule(
    state: Arc<BotState>,
    platform: Arc<dyn Platform>,
    user_id: String,
    when: DateTime<Local>,
) -> Result<()> {
    {
        let mut reminders = state.reminders.lock().await;
        reminders.set(&user_id, when.to_rfc3339())?;
    }
    arm(state, platform, user_id, when);
    Ok(())
}

/// Re-arm every persisted reminder; drop those already in the past.
/// Returns how many were armed.
pub async fn restore(state: Arc<BotState>, platform: Arc<dyn Platform>) -> Result<usize> {
    let entries: Vec<(String, String)> = {
        let reminders = state.reminders.lock().await;
        reminders
            .entries()
            .iter()
            .map(|(user, ts)| (user.clone(), ts.clone()))
            .collect()
    };

    let now = Local::now();
    let mut armed = 0;

    for (user_id, timestamp) in entries {
        let when = DateTime::parse_from_rfc3339(&timestamp)
            .ok()
            .map(|dt| dt.with_timezone(&Local));

        match when {
            Some(when) if when > now => {
                arm(state.clone(), platform.clone(), user_id, when);
                armed += 1;
            }
            _ => {
                tracing::debug!("Dropping stale reminder for {}", user_id);
                let mut reminders = state.reminders.lock().await;
                reminders.remove(&user_id)?;
            }
        }
    }

    Ok(armed)
}

fn arm(
    state: Arc<BotState>,
    platform: Arc<dyn Platform>,
    user_id: String,
    when: DateTime<Local>,
) {
    tokio::spawn(async move {
        let delay = (when - Local::now()).to_std().unwrap_or_default();
        tokio::time::sleep(delay).await;
        fire(state, platform, &user_id).await;
    });
}

async fn fire(state: Arc<BotState>, platform: Arc<dyn Platform>, user_id: &str) {
    let text = format!(
        "Wake up! The time is {}.",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    if let Err(e) = platform.send_user(user_id, &text).await {
        tracing::error!("Failed to deliver reminder to {}: {}", user_id, e);
    }

    let mut reminders = state.reminders.lock().await;
    if let Err(e) = reminders.remove(user_id) {
        tracing::error!("Failed to clear reminder for {}: {}", user_id, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::testutil::FakePlatform;

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 8, 6, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_date_time() {
        let when = parse_when("2026-12-24 18:30:00", now()).unwrap();
        assert_eq!(when.format("%Y-%m-%d %H:%M:%S").to_string(), "2026-12-24 18:30:00");

        let when = parse_when("2026-12-24 18:30", now()).unwrap();
        assert_eq!(when.format("%H:%M:%S").to_string(), "18:30:00");
    }

    #[test]
    fn test_parse_bare_date_is_midnight() {
        let when = parse_when("2026-12-24", now()).unwrap();
        assert_eq!(when.format("%Y-%m-%d %H:%M:%S").to_string(), "2026-12-24 00:00:00");
    }

    #[test]
    fn test_parse_bare_time_is_today() {
        let when = parse_when("18:30", now()).unwrap();
        assert_eq!(when.format("%Y-%m-%d %H:%M").to_string(), "2026-08-06 18:30");
    }

    #[test]
    fn test_parse_garbage_is_none() {
        assert!(parse_when("someday", now()).is_none());
        assert!(parse_when("", now()).is_none());
    }

    #[tokio::test]
    async fn test_fire_sends_and_clears() {
        let dir = tempfile::tempdir().unwrap();
        let state = Arc::new(BotState::open(dir.path()).unwrap());
        let platform = Arc::new(FakePlatform::new(false));

        {
            let mut reminders = state.reminders.lock().await;
            reminders.set("42", "2026-01-01T00:00:00+00:00".to_string()).unwrap();
        }

        fire(state.clone(), platform.clone(), "42").await;

        let sent = platform.user_messages.lock().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "42");
        assert!(sent[0].1.starts_with("Wake up! The time is "));
        assert!(state.reminders.lock().await.get("42").is_none());
    }

    #[tokio::test]
    async fn test_restore_drops_stale_and_arms_future() {
        let dir = tempfile::tempdir().unwrap();
        let state = Arc::new(BotState::open(dir.path()).unwrap());
        let platform: Arc<dyn Platform> = Arc::new(FakePlatform::new(false));

        {
            let mut reminders = state.reminders.lock().await;
            reminders.set("past", "2001-01-01T00:00:00+00:00".to_string()).unwrap();
            reminders.set("future", "2999-01-01T00:00:00+00:00".to_string()).unwrap();
            reminders.set("garbage", "not a timestamp".to_string()).unwrap();
        }

        let armed = restore(state.clone(), platform).await.unwrap();
        assert_eq!(armed, 1);

        let reminders = state.reminders.lock().await;
        assert!(reminders.get("past").is_none());
        assert!(reminders.get("garbage").is_none());
        assert!(reminders.get("future").is_some());
    }
}
