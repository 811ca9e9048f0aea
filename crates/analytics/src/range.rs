use crate::error::AnalyticsError;
use chrono::{NaiveDate, NaiveDateTime};
use core_types::OrderRecord;
use serde::Serialize;
use std::borrow::Borrow;

/// An inclusive range of calendar days applied to `order_date`.
///
/// Comparison happens on the day, not the timestamp, so every line item placed
/// on `end` is part of the range regardless of its time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Builds a range, rejecting `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, AnalyticsError> {
        if start > end {
            return Err(AnalyticsError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// The smallest range holding every record, or `None` for an empty table.
    pub fn covering<R: Borrow<OrderRecord>>(records: &[R]) -> Option<Self> {
        let mut days = iter_records(records).map(OrderRecord::order_day);
        let first = days.next()?;
        let (start, end) = days.fold((first, first), |(min, max), day| (min.min(day), max.max(day)));
        Some(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of calendar days in the range, both ends included.
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn contains(&self, timestamp: NaiveDateTime) -> bool {
        let day = timestamp.date();
        self.start <= day && day <= self.end
    }
}

/// Selects the records inside `range`, preserving input order.
///
/// `None` selects everything.
pub fn filter_records<'a>(records: &'a [OrderRecord], range: Option<&DateRange>) -> Vec<&'a OrderRecord> {
    records
        .iter()
        .filter(|record| range.is_none_or(|r| r.contains(record.order_date)))
        .collect()
}

/// Iterates owned or borrowed records as `&OrderRecord`.
pub(crate) fn iter_records<R: Borrow<OrderRecord>>(records: &[R]) -> impl Iterator<Item = &OrderRecord> {
    records.iter().map(<R as Borrow<OrderRecord>>::borrow)
}
