//! Working calendar: shifts, maintenance blackouts, and working-time arithmetic.
//!
//! # Time Model
//! Instants are `DateTime<Utc>`. Shifts recur weekly (day 0 = Sunday) with
//! fractional start/end hours; maintenance windows are absolute intervals.
//!
//! # Precedence
//! Blackouts override shifts. An instant is working time iff:
//! - It falls within at least one shift of its weekday, AND
//! - It does NOT fall within any blackout window.
//!
//! All intervals are half-open `[start, end)`: an instant equal to a shift's
//! end or a blackout's end is outside that interval.
//!
//! # Algorithm
//! Working-minute arithmetic walks segment by segment rather than solving
//! analytically, since shift and blackout boundaries interleave arbitrarily.
//! Each step works until the nearest of (a) the remaining duration, (b) the
//! current shift's end, (c) the next blackout start inside the shift, then
//! jumps to the next working instant. Both search loops are bounded by the
//! limits in [`ReflowConfig`]; exceeding them is a fatal
//! [`ReflowError::ImpossibleSchedule`].

use chrono::{DateTime, Datelike, NaiveTime, TimeDelta, Timelike, Utc};
use serde::{Deserialize, Serialize};

use super::instant::{format_instant, parse_instant};
use super::WorkOrder;
use crate::config::ReflowConfig;
use crate::error::ReflowError;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// A time interval [start, end).
///
/// Half-open interval: includes start, excludes end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    /// Interval start (inclusive).
    pub start: DateTime<Utc>,
    /// Interval end (exclusive).
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Creates a new time window.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Duration of this window.
    #[inline]
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Whether the window contains no instant.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Whether an instant falls within this window.
    #[inline]
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        t >= self.start && t < self.end
    }

    /// Whether two windows overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// A recurring weekly working window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    /// Day of week, 0 = Sunday .. 6 = Saturday.
    pub day_of_week: u8,
    /// Start hour of day (fractional, inclusive).
    pub start_hour: f64,
    /// End hour of day (fractional, exclusive, at most 24).
    pub end_hour: f64,
}

impl Shift {
    /// Creates a shift.
    pub fn new(day_of_week: u8, start_hour: f64, end_hour: f64) -> Self {
        Self {
            day_of_week,
            start_hour,
            end_hour,
        }
    }

    /// Start as seconds after midnight.
    #[inline]
    pub fn start_seconds(&self) -> i64 {
        (self.start_hour * SECONDS_PER_HOUR).round() as i64
    }

    /// End as seconds after midnight.
    #[inline]
    pub fn end_seconds(&self) -> i64 {
        (self.end_hour * SECONDS_PER_HOUR).round() as i64
    }

    /// Whether `0 <= day <= 6` and `0 <= start < end <= 24`.
    pub fn is_valid(&self) -> bool {
        self.day_of_week <= 6
            && self.start_hour >= 0.0
            && self.start_hour < self.end_hour
            && self.end_hour <= 24.0
    }

    /// Whether the shift covers the given instant. Invalid shifts cover nothing.
    pub fn covers(&self, t: DateTime<Utc>) -> bool {
        if !self.is_valid() || day_of_week(t) != self.day_of_week {
            return false;
        }
        let secs = i64::from(t.num_seconds_from_midnight());
        secs >= self.start_seconds() && secs < self.end_seconds()
    }

    /// This shift's interval on the day containing `t`, if representable.
    pub fn window_on(&self, t: DateTime<Utc>) -> Option<TimeWindow> {
        let midnight = start_of_day(t);
        let start = midnight.checked_add_signed(TimeDelta::try_seconds(self.start_seconds())?)?;
        let end = midnight.checked_add_signed(TimeDelta::try_seconds(self.end_seconds())?)?;
        Some(TimeWindow::new(start, end))
    }
}

/// A configured maintenance window as it appears on the boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceWindow {
    /// Start instant (ISO-8601 UTC).
    pub start_date: String,
    /// End instant (ISO-8601 UTC).
    pub end_date: String,
    /// Free-text reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl MaintenanceWindow {
    /// Creates a maintenance window.
    pub fn new(start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            start_date: start_date.into(),
            end_date: end_date.into(),
            reason: None,
        }
    }

    /// Sets the reason.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Parsed interval.
    pub fn window(&self) -> Result<TimeWindow, ReflowError> {
        Ok(TimeWindow::new(
            parse_instant(&self.start_date)?,
            parse_instant(&self.end_date)?,
        ))
    }
}

/// Why a work center is blacked out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlackoutSource {
    /// A maintenance window configured on the work center.
    Configured { reason: Option<String> },
    /// A fixed maintenance work order occupying the center.
    FixedOrder(String),
}

/// An interval during which a work center cannot do production work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlackoutWindow {
    /// Blocked interval.
    pub window: TimeWindow,
    /// Origin of the blackout.
    pub source: BlackoutSource,
}

impl BlackoutWindow {
    /// Blackout from a configured maintenance window.
    pub fn configured(window: TimeWindow, reason: Option<String>) -> Self {
        Self {
            window,
            source: BlackoutSource::Configured { reason },
        }
    }

    /// Blackout occupied by a fixed maintenance order.
    pub fn fixed_order(window: TimeWindow, work_order_id: impl Into<String>) -> Self {
        Self {
            window,
            source: BlackoutSource::FixedOrder(work_order_id.into()),
        }
    }

    /// Parses a configured maintenance window.
    pub fn from_maintenance(window: &MaintenanceWindow) -> Result<Self, ReflowError> {
        Ok(Self::configured(window.window()?, window.reason.clone()))
    }

    /// Synthesizes a blackout from a fixed maintenance order's interval.
    pub fn from_fixed_order(order: &WorkOrder) -> Result<Self, ReflowError> {
        let window = TimeWindow::new(order.start()?, order.end()?);
        Ok(Self::fixed_order(window, order.id()))
    }

    /// Whether this blackout comes from a fixed maintenance order.
    pub fn is_fixed_order(&self) -> bool {
        matches!(self.source, BlackoutSource::FixedOrder(_))
    }

    /// Human-readable label for explanations.
    pub fn label(&self) -> String {
        match &self.source {
            BlackoutSource::Configured { reason: Some(r) } => r.clone(),
            BlackoutSource::Configured { reason: None } => "maintenance window".to_string(),
            BlackoutSource::FixedOrder(id) => format!("fixed maintenance work order {id}"),
        }
    }
}

/// Kind of a walked segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    /// Working time consumed.
    Work,
    /// Non-working time skipped.
    Pause,
}

/// One step of a working-time walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// Segment start.
    pub from: DateTime<Utc>,
    /// Segment end.
    pub to: DateTime<Utc>,
    /// Whether time was worked or skipped.
    pub kind: SegmentKind,
}

/// Result of advancing by working minutes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingSpan {
    /// Snapped start (first working instant).
    pub start: DateTime<Utc>,
    /// Instant the work completes.
    pub end: DateTime<Utc>,
    /// Work and pause segments, in order.
    pub segments: Vec<Segment>,
}

impl WorkingSpan {
    fn starting_at(start: DateTime<Utc>) -> Self {
        Self {
            start,
            end: start,
            segments: Vec::new(),
        }
    }

    fn push(&mut self, kind: SegmentKind, from: DateTime<Utc>, to: DateTime<Utc>) {
        if to > from {
            self.segments.push(Segment { from, to, kind });
        }
    }

    /// Total working time in the span.
    pub fn worked(&self) -> TimeDelta {
        self.segments
            .iter()
            .filter(|s| s.kind == SegmentKind::Work)
            .map(|s| s.to - s.from)
            .sum()
    }
}

/// Day of week of an instant, 0 = Sunday.
pub fn day_of_week(t: DateTime<Utc>) -> u8 {
    t.weekday().num_days_from_sunday() as u8
}

/// Midnight (UTC) of the day containing `t`.
pub fn start_of_day(t: DateTime<Utc>) -> DateTime<Utc> {
    t.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Whether `t` falls inside some shift (maintenance is not considered).
pub fn is_working(t: DateTime<Utc>, shifts: &[Shift]) -> bool {
    shifts.iter().any(|s| s.covers(t))
}

/// Work center availability: weekly shifts minus blackout windows.
#[derive(Debug, Clone)]
pub struct WorkingCalendar {
    shifts: Vec<Shift>,
    blackouts: Vec<BlackoutWindow>,
    config: ReflowConfig,
}

impl WorkingCalendar {
    /// Creates a calendar. Blackouts are kept sorted by start.
    pub fn new(shifts: Vec<Shift>, mut blackouts: Vec<BlackoutWindow>) -> Self {
        blackouts.sort_by_key(|b| (b.window.start, b.window.end));
        Self {
            shifts,
            blackouts,
            config: ReflowConfig::default(),
        }
    }

    /// Sets search bounds.
    pub fn with_config(mut self, config: ReflowConfig) -> Self {
        self.config = config;
        self
    }

    /// Shifts.
    pub fn shifts(&self) -> &[Shift] {
        &self.shifts
    }

    /// Blackouts, sorted by start.
    pub fn blackouts(&self) -> &[BlackoutWindow] {
        &self.blackouts
    }

    /// The blackout containing `t`, if any.
    pub fn blackout_at(&self, t: DateTime<Utc>) -> Option<&BlackoutWindow> {
        self.blackouts.iter().find(|b| b.window.contains(t))
    }

    /// Whether `t` is inside a shift and outside every blackout.
    pub fn is_working_time(&self, t: DateTime<Utc>) -> bool {
        self.blackout_at(t).is_none() && is_working(t, &self.shifts)
    }

    /// Earliest shift start at or after `after`, searching `lookahead_days` ahead.
    pub fn next_shift_start(&self, after: DateTime<Utc>) -> Result<DateTime<Utc>, ReflowError> {
        let first_day = start_of_day(after);
        for offset in 0..=i64::from(self.config.lookahead_days) {
            let day = first_day + TimeDelta::days(offset);
            let dow = day_of_week(day);
            let earliest = self
                .shifts
                .iter()
                .filter(|s| s.day_of_week == dow && s.is_valid())
                .map(|s| day + TimeDelta::seconds(s.start_seconds()))
                .filter(|start| *start >= after)
                .min();
            if let Some(start) = earliest {
                return Ok(start);
            }
        }
        Err(ReflowError::NoUpcomingShift {
            after: format_instant(after),
            lookahead_days: self.config.lookahead_days,
        })
    }

    /// Smallest instant `>= t` that is inside a shift and outside every blackout.
    pub fn next_working_instant(&self, t: DateTime<Utc>) -> Result<DateTime<Utc>, ReflowError> {
        let mut cur = t;
        for _ in 0..self.config.snap_iteration_limit {
            if let Some(blackout) = self.blackout_at(cur) {
                cur = blackout.window.end;
                continue;
            }
            if is_working(cur, &self.shifts) {
                return Ok(cur);
            }
            cur = self.next_shift_start(cur)?;
        }
        Err(ReflowError::ImpossibleSchedule {
            operation: "next_working_instant",
            from: format_instant(t),
            limit: self.config.snap_iteration_limit,
        })
    }

    /// End instant after `duration_minutes` of working time from `start`.
    pub fn advance_by_working_minutes(
        &self,
        start: DateTime<Utc>,
        duration_minutes: i64,
    ) -> Result<DateTime<Utc>, ReflowError> {
        Ok(self.advance(start, duration_minutes)?.end)
    }

    /// Walks `duration_minutes` of working time from the first working
    /// instant at or after `start`, recording every work/pause segment.
    pub fn advance(
        &self,
        start: DateTime<Utc>,
        duration_minutes: i64,
    ) -> Result<WorkingSpan, ReflowError> {
        if duration_minutes < 0 {
            return Err(ReflowError::InvalidDuration {
                minutes: duration_minutes,
            });
        }

        let out_of_range = || ReflowError::DurationOutOfRange {
            from: format_instant(start),
            minutes: duration_minutes,
        };

        let first = self.next_working_instant(start)?;
        let mut span = WorkingSpan::starting_at(first);
        let mut remaining = TimeDelta::try_minutes(duration_minutes).ok_or_else(out_of_range)?;
        if remaining.is_zero() {
            return Ok(span);
        }

        let mut cur = first;
        for _ in 0..self.config.advance_iteration_limit {
            let Some(shift_end) = self.shift_end_at(cur) else {
                let next = self.next_working_instant(cur)?;
                span.push(SegmentKind::Pause, cur, next);
                cur = next;
                continue;
            };

            // The end is never earlier than `cur + remaining`.
            let mut limit = cur
                .checked_add_signed(remaining)
                .ok_or_else(out_of_range)?
                .min(shift_end);
            if let Some(blackout_start) = self.next_blackout_start(cur, shift_end) {
                limit = limit.min(blackout_start);
            }

            span.push(SegmentKind::Work, cur, limit);
            remaining -= limit - cur;
            cur = limit;
            if remaining <= TimeDelta::zero() {
                span.end = cur;
                return Ok(span);
            }

            // Blocked by shift end or blackout start.
            let next = self.next_working_instant(cur)?;
            span.push(SegmentKind::Pause, cur, next);
            cur = next;
        }

        Err(ReflowError::ImpossibleSchedule {
            operation: "advance_by_working_minutes",
            from: format_instant(start),
            limit: self.config.advance_iteration_limit,
        })
    }

    /// First non-empty blackout whose start lies in `[start, end)`.
    pub fn first_blackout_starting_within(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Option<&BlackoutWindow> {
        self.blackouts
            .iter()
            .find(|b| !b.window.is_empty() && b.window.start >= start && b.window.start < end)
    }

    /// First fixed-order blackout overlapping `[start, end)`.
    pub fn first_fixed_order_overlapping(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Option<&BlackoutWindow> {
        let span = TimeWindow::new(start, end);
        self.blackouts
            .iter()
            .find(|b| b.is_fixed_order() && !b.window.is_empty() && b.window.overlaps(&span))
    }

    /// End of the shift covering `t`.
    fn shift_end_at(&self, t: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.shifts
            .iter()
            .find(|s| s.covers(t))
            .and_then(|s| s.window_on(t))
            .map(|w| w.end)
    }

    /// Start of the next blackout strictly after `cur` and before `shift_end`.
    fn next_blackout_start(
        &self,
        cur: DateTime<Utc>,
        shift_end: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        for b in &self.blackouts {
            if b.window.is_empty() || b.window.end <= cur {
                continue;
            }
            if b.window.start >= shift_end {
                break;
            }
            if b.window.start > cur {
                return Some(b.window.start);
            }
        }
        None
    }
}
