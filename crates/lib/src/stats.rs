//! # Habit Statistics
//!
//! Reading days are calendar dates in a fixed UTC offset (JST by default), so
//! a record logged at 23:30 in Tokyo counts for that Tokyo day.

use crate::{errors::IchidanError, row, types::UserStats};
use chrono::{Days, FixedOffset, NaiveDate, Offset, Utc};
use std::collections::BTreeSet;
use turso::Database;

/// Builds a `FixedOffset` from whole hours, falling back to UTC when out of range.
pub fn offset_from_hours(hours: i32) -> FixedOffset {
    hours
        .checked_mul(3600)
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(|| Utc.fix())
}

/// Computes `(current, longest)` streaks of consecutive reading days.
///
/// The current streak is still alive if the last reading day is yesterday:
/// the user has until the end of today to extend it.
pub fn streaks(days: &BTreeSet<NaiveDate>, today: NaiveDate) -> (i64, i64) {
    let mut longest = 0;
    let mut run = 0;
    let mut prev: Option<NaiveDate> = None;
    for &day in days {
        run = match prev {
            Some(p) if p.checked_add_days(Days::new(1)) == Some(day) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        prev = Some(day);
    }

    let yesterday = today.checked_sub_days(Days::new(1));
    let current = match days.iter().next_back() {
        Some(&last) if last == today || Some(last) == yesterday => {
            let mut count = 0;
            let mut cursor = Some(last);
            while let Some(day) = cursor.filter(|d| days.contains(d)) {
                count += 1;
                cursor = day.checked_sub_days(Days::new(1));
            }
            count
        }
        _ => 0,
    };

    (current, longest)
}

/// Collects the habit statistics shown on the user's personal page.
pub async fn user_stats(
    db: &Database,
    user_id: &str,
    offset: FixedOffset,
) -> Result<UserStats, IchidanError> {
    let conn = db.connect()?;

    let mut rows = conn
        .query(
            "SELECT created_at FROM reading_records WHERE owner_id = ?",
            vec![row::text(user_id)],
        )
        .await?;
    let mut days = BTreeSet::new();
    let mut total_records = 0;
    while let Some(r) = rows.next().await? {
        let created_at = row::get_timestamp(&r, 0)?;
        days.insert(created_at.with_timezone(&offset).date_naive());
        total_records += 1;
    }

    let likes_received = row::scalar_i64(
        &conn,
        "SELECT COUNT(*) FROM likes l JOIN reading_records r ON r.id = l.record_id
         WHERE r.owner_id = ?",
        vec![row::text(user_id)],
    )
    .await?;

    let today = Utc::now().with_timezone(&offset).date_naive();
    let (current_streak, longest_streak) = streaks(&days, today);

    Ok(UserStats {
        total_records,
        likes_received,
        reading_days: days.len() as i64,
        current_streak,
        longest_streak,
        last_read_on: days.iter().next_back().copied(),
    })
}
