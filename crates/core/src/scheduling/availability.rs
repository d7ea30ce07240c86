//! # Availability Resolver
//!
//! Computes the bookable windows for one staff member on one business-local
//! calendar day. The algorithm is standard interval subtraction:
//!
//! 1. Start from the day's enabled working-hours window (empty result when
//!    the weekday is disabled).
//! 2. Turn each existing non-cancelled appointment into a busy interval,
//!    expanded by half the buffer on each side and clamped to the window.
//! 3. Sort busy intervals by start, merge overlapping or touching ones.
//! 4. The free intervals are the gaps between merged busy intervals.
//!
//! All intervals are closed-open `[start, end)`. The output is ordered,
//! non-overlapping, and deterministic for identical input.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::models::appointment::{Appointment, AppointmentStatus};
use crate::models::staff::WorkingHours;

/// Resolves a business-local wall-clock value to an instant. Returns `None`
/// for wall-clock times skipped by a DST jump; ambiguous times take the
/// earlier offset.
pub fn local_instant(date: NaiveDate, time: NaiveTime, tz: Tz) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// The staff member's enabled working window on `date` as a pair of instants,
/// or `None` when the day is disabled (or erased by a DST gap).
pub fn working_window(
    hours: &WorkingHours,
    date: NaiveDate,
    tz: Tz,
) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let day = hours.enabled_window(date.weekday())?;
    let start = local_instant(date, day.start, tz)?;
    let end = local_instant(date, day.end, tz)?;
    (start < end).then_some((start, end))
}

/// Ordered free `[start, end)` intervals for one staff member on `date`.
///
/// `existing` is the staff member's appointments for that day; cancelled ones
/// never occupy time. Appointments partly outside working hours only subtract
/// the portion inside the window, since the rest is already non-bookable.
pub fn free_intervals(
    hours: &WorkingHours,
    date: NaiveDate,
    tz: Tz,
    existing: &[Appointment],
    buffer_minutes: i64,
) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
    let Some((window_start, window_end)) = working_window(hours, date, tz) else {
        return Vec::new();
    };

    // Half the buffer pads each side of a busy interval, so rendered slots
    // stay clear of neighbours in both directions.
    let pad = Duration::minutes(buffer_minutes / 2);

    let mut busy: Vec<(DateTime<Utc>, DateTime<Utc>)> = existing
        .iter()
        .filter(|appt| appt.status != AppointmentStatus::Cancelled)
        .filter_map(|appt| {
            let start = (appt.start_time - pad).max(window_start);
            let end = (appt.end_time + pad).min(window_end);
            (start < end).then_some((start, end))
        })
        .collect();

    busy.sort_by_key(|interval| interval.0);

    // Merge overlapping or touching busy intervals.
    let mut merged: Vec<(DateTime<Utc>, DateTime<Utc>)> = Vec::with_capacity(busy.len());
    for interval in busy {
        match merged.last_mut() {
            Some(last) if interval.0 <= last.1 => {
                last.1 = last.1.max(interval.1);
            }
            _ => merged.push(interval),
        }
    }

    // Carve the working window into the gaps between busy intervals.
    let mut free = Vec::new();
    let mut cursor = window_start;
    for (busy_start, busy_end) in merged {
        if busy_start > cursor {
            free.push((cursor, busy_start));
        }
        cursor = cursor.max(busy_end);
    }
    if cursor < window_end {
        free.push((cursor, window_end));
    }

    free
}
