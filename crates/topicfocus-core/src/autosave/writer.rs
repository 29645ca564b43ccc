//! Write path shared by every save trigger.
//!
//! Order matters: identifiers are validated before anything touches the
//! store, then identity is resolved, then the user row is upserted, then the
//! progress row is written.

use chrono::NaiveDate;
use tracing::{debug, info};

use super::SaveSnapshot;
use crate::error::{CoreError, ValidationError};
use crate::stats::UserStats;
use crate::storage::{ProgressStore, ProgressUpdate, UserIdentity};

/// Persist `snapshot` for `topic_id` on behalf of the signed-in user.
///
/// Returns the identity the write was made under so callers can chain
/// stats updates without a second lookup.
pub fn write_progress<S: ProgressStore + ?Sized>(
    store: &S,
    topic_id: &str,
    snapshot: &SaveSnapshot,
    study_minutes_delta: u32,
) -> Result<UserIdentity, CoreError> {
    if topic_id.trim().is_empty() {
        return Err(ValidationError::MissingIdentifier("topic_id").into());
    }
    let user = store.current_user()?;
    if user.id.trim().is_empty() {
        return Err(ValidationError::MissingIdentifier("user_id").into());
    }

    store.ensure_user_record(&user.id, &user.email)?;
    store.save_progress(
        &user.id,
        topic_id,
        &ProgressUpdate {
            notes: snapshot.notes.clone(),
            completed: snapshot.completed,
            study_minutes_delta,
        },
    )?;
    debug!(topic_id, study_minutes_delta, "progress written");
    Ok(user)
}

/// Credit a finished work session to the user's aggregate stats.
pub fn record_session<S: ProgressStore + ?Sized>(
    store: &S,
    user: &UserIdentity,
    minutes: u32,
    today: NaiveDate,
) -> Result<UserStats, CoreError> {
    let mut stats = store.load_stats(&user.id)?.unwrap_or_default();
    let new_day = stats.record_study(u64::from(minutes), today);
    store.save_stats(&user.id, &stats)?;
    info!(
        minutes,
        streak = stats.current_streak,
        new_day,
        "study session recorded"
    );
    Ok(stats)
}

/// Rewrite stats with unchanged study totals and a recounted note total.
pub fn refresh_stats<S: ProgressStore + ?Sized>(
    store: &S,
    user: &UserIdentity,
) -> Result<UserStats, CoreError> {
    let mut stats = store.load_stats(&user.id)?.unwrap_or_default();
    stats.total_notes = store.count_notes(&user.id)?;
    store.save_stats(&user.id, &stats)?;
    Ok(stats)
}
