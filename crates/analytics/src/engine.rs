use crate::error::AnalyticsError;
use crate::range::{DateRange, iter_records};
use crate::report::DashboardReport;
use crate::tables::{CategoryQuantity, DailyOrders, RfmRow, StateCount, StatusCount};
use chrono::{NaiveDate, NaiveDateTime};
use core_types::{DailyBucketPolicy, OrderRecord, RecordField, StatusGroup};
use rust_decimal::Decimal;
use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap, HashSet};

const DAILY_FIELDS: &[RecordField] = &[RecordField::OrderId, RecordField::TotalPrice];
const CATEGORY_FIELDS: &[RecordField] = &[RecordField::ProductCategoryName];
// The status label is checked while parsing it in `status_summary`.
const STATUS_FIELDS: &[RecordField] = &[RecordField::CustomerId];
const STATE_FIELDS: &[RecordField] = &[RecordField::CustomerId, RecordField::CustomerState];
const RFM_FIELDS: &[RecordField] = &[
    RecordField::CustomerId,
    RecordField::OrderId,
    RecordField::TotalPrice,
];
const DASHBOARD_FIELDS: &[RecordField] = &[
    RecordField::OrderId,
    RecordField::CustomerId,
    RecordField::ProductCategoryName,
    RecordField::TotalPrice,
    RecordField::CustomerState,
    RecordField::StatusGroup,
    RecordField::OrderDeliveredCustomerDate,
];

/// A stateless calculator for the dashboard's derived tables.
///
/// Every operation borrows its input, validates only the fields it reads, and
/// either returns the complete table or an error. Empty input yields an empty table.
///
/// The operations accept any slice of owned or borrowed records, so the output of
/// [`crate::filter_records`] can be passed straight in.
#[derive(Debug, Default, Clone)]
pub struct AnalyticsEngine {
    daily_buckets: DailyBucketPolicy,
}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how `daily_orders` treats days without records.
    pub fn with_daily_buckets(mut self, policy: DailyBucketPolicy) -> Self {
        self.daily_buckets = policy;
        self
    }

    /// Computes all five tables for the records inside `range`.
    ///
    /// Validation errors carry the record's index in `records`, not in the selection.
    /// Records outside the range are never inspected.
    #[tracing::instrument(name = "analytics_dashboard", skip(self, records), fields(records = records.len()))]
    pub fn dashboard(
        &self,
        records: &[OrderRecord],
        range: Option<DateRange>,
    ) -> Result<DashboardReport, AnalyticsError> {
        let mut selected = Vec::new();
        for (index, record) in records.iter().enumerate() {
            if range.is_none_or(|r| r.contains(record.order_date)) {
                check_record(record, index, DASHBOARD_FIELDS)?;
                selected.push(record);
            }
        }
        tracing::debug!(selected = selected.len(), "Applied date range.");

        Ok(DashboardReport {
            range,
            record_count: selected.len(),
            daily_orders: self.daily_orders(&selected)?,
            category_quantities: self.category_quantity_summary(&selected)?,
            status_counts: self.status_summary(&selected)?,
            state_counts: self.state_summary(&selected)?,
            rfm: self.rfm_summary(&selected)?,
        })
    }

    /// Orders and revenue per calendar day of `order_date`, ascending by date.
    ///
    /// An order with several line items on the same day is counted once.
    pub fn daily_orders<R: Borrow<OrderRecord>>(
        &self,
        records: &[R],
    ) -> Result<Vec<DailyOrders>, AnalyticsError> {
        validate(records, DAILY_FIELDS)?;

        let mut buckets: BTreeMap<NaiveDate, (HashSet<&str>, Decimal)> = BTreeMap::new();
        for record in iter_records(records) {
            let (orders, revenue) = buckets.entry(record.order_day()).or_default();
            orders.insert(record.order_id.as_str());
            *revenue += record.total_price;
        }

        let bounds = buckets.first_key_value().zip(buckets.last_key_value());
        let rows: Vec<DailyOrders> = match (self.daily_buckets, bounds) {
            (DailyBucketPolicy::ZeroFill, Some(((&first, _), (&last, _)))) => first
                .iter_days()
                .take_while(|day| *day <= last)
                .map(|day| match buckets.get(&day) {
                    Some((orders, revenue)) => daily_row(day, orders, *revenue),
                    None => daily_row(day, &HashSet::new(), Decimal::ZERO),
                })
                .collect(),
            _ => buckets
                .iter()
                .map(|(day, (orders, revenue))| daily_row(*day, orders, *revenue))
                .collect(),
        };

        tracing::debug!(rows = rows.len(), policy = ?self.daily_buckets, "Computed daily orders.");
        Ok(rows)
    }

    /// Units sold per product category, most sold first.
    ///
    /// Categories with equal quantity keep the order in which they first appear.
    pub fn category_quantity_summary<R: Borrow<OrderRecord>>(
        &self,
        records: &[R],
    ) -> Result<Vec<CategoryQuantity>, AnalyticsError> {
        validate(records, CATEGORY_FIELDS)?;

        let mut positions: HashMap<&str, usize> = HashMap::new();
        let mut rows: Vec<CategoryQuantity> = Vec::new();
        for record in iter_records(records) {
            let name = record.product_category_name.as_str();
            let position = *positions.entry(name).or_insert_with(|| {
                rows.push(CategoryQuantity {
                    product_category_name: name.to_string(),
                    quantity: 0,
                });
                rows.len() - 1
            });
            rows[position].quantity += record.quantity;
        }

        // `sort_by` is stable, which is what keeps ties in first-seen order.
        rows.sort_by(|a, b| b.quantity.cmp(&a.quantity));

        tracing::debug!(rows = rows.len(), "Computed category quantities.");
        Ok(rows)
    }

    /// Distinct customers per status group, in the fixed status display order.
    pub fn status_summary<R: Borrow<OrderRecord>>(
        &self,
        records: &[R],
    ) -> Result<Vec<StatusCount>, AnalyticsError> {
        validate(records, STATUS_FIELDS)?;

        let mut customers: HashMap<StatusGroup, HashSet<&str>> = HashMap::new();
        for (index, record) in iter_records(records).enumerate() {
            let group = record.status().map_err(|e| validation_error(index, e))?;
            customers
                .entry(group)
                .or_default()
                .insert(record.customer_id.as_str());
        }

        let mut rows: Vec<StatusCount> = customers
            .into_iter()
            .map(|(status_group, ids)| StatusCount {
                status_group,
                customer_count: ids.len(),
            })
            .collect();
        rows.sort_by_key(|row| row.status_group.rank());

        tracing::debug!(rows = rows.len(), "Computed status counts.");
        Ok(rows)
    }

    /// Distinct customers per state, in order of first appearance.
    pub fn state_summary<R: Borrow<OrderRecord>>(
        &self,
        records: &[R],
    ) -> Result<Vec<StateCount>, AnalyticsError> {
        validate(records, STATE_FIELDS)?;

        let mut states: Vec<(&str, HashSet<&str>)> = Vec::new();
        let mut positions: HashMap<&str, usize> = HashMap::new();
        for record in iter_records(records) {
            let state = record.customer_state.as_str();
            let position = *positions.entry(state).or_insert_with(|| {
                states.push((state, HashSet::new()));
                states.len() - 1
            });
            states[position].1.insert(record.customer_id.as_str());
        }

        let rows: Vec<StateCount> = states
            .into_iter()
            .map(|(state, ids)| StateCount {
                customer_state: state.to_string(),
                customer_count: ids.len(),
            })
            .collect();

        tracing::debug!(rows = rows.len(), "Computed state counts.");
        Ok(rows)
    }

    /// Recency, frequency and monetary value per customer, in order of first appearance.
    ///
    /// Recency is measured in calendar days from the latest `order_date` across all of
    /// `records`, so the customer holding that order has a recency of zero.
    pub fn rfm_summary<R: Borrow<OrderRecord>>(
        &self,
        records: &[R],
    ) -> Result<Vec<RfmRow>, AnalyticsError> {
        validate(records, RFM_FIELDS)?;

        let Some(anchor) = iter_records(records).map(|r| r.order_date).max() else {
            return Ok(Vec::new());
        };
        let anchor_day = anchor.date();

        let mut customers: Vec<CustomerTotals> = Vec::new();
        let mut positions: HashMap<&str, usize> = HashMap::new();
        for record in iter_records(records) {
            let position = *positions.entry(record.customer_id.as_str()).or_insert_with(|| {
                customers.push(CustomerTotals::new(&record.customer_id, record.order_date));
                customers.len() - 1
            });
            customers[position].add(record);
        }

        let rows: Vec<RfmRow> = customers
            .into_iter()
            .map(|totals| RfmRow {
                customer_id: totals.customer_id.to_string(),
                recency: (anchor_day - totals.last_order.date()).num_days(),
                frequency: totals.orders.len(),
                monetary: totals.monetary,
            })
            .collect();

        tracing::debug!(rows = rows.len(), anchor = %anchor, "Computed RFM summary.");
        Ok(rows)
    }
}

/// Running totals for one customer while building the RFM table.
struct CustomerTotals<'a> {
    customer_id: &'a str,
    orders: HashSet<&'a str>,
    monetary: Decimal,
    last_order: NaiveDateTime,
}

impl<'a> CustomerTotals<'a> {
    fn new(customer_id: &'a str, first_seen: NaiveDateTime) -> Self {
        Self {
            customer_id,
            orders: HashSet::new(),
            monetary: Decimal::ZERO,
            last_order: first_seen,
        }
    }

    fn add(&mut self, record: &'a OrderRecord) {
        self.orders.insert(record.order_id.as_str());
        self.monetary += record.total_price;
        self.last_order = self.last_order.max(record.order_date);
    }
}

fn daily_row(date: NaiveDate, orders: &HashSet<&str>, revenue: Decimal) -> DailyOrders {
    DailyOrders {
        date,
        order_count: orders.len(),
        revenue,
    }
}

fn validate<R: Borrow<OrderRecord>>(records: &[R], fields: &[RecordField]) -> Result<(), AnalyticsError> {
    iter_records(records)
        .enumerate()
        .try_for_each(|(index, record)| check_record(record, index, fields))
}

fn check_record(record: &OrderRecord, index: usize, fields: &[RecordField]) -> Result<(), AnalyticsError> {
    fields
        .iter()
        .try_for_each(|field| record.check(*field))
        .map_err(|e| validation_error(index, e))
}

fn validation_error(index: usize, error: core_types::CoreError) -> AnalyticsError {
    let field = error.field();
    tracing::warn!(%field, index, error = %error, "Rejected order record.");
    AnalyticsError::DataValidation {
        field,
        index,
        reason: error.to_string(),
    }
}
