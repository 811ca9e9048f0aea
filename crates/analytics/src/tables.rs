use chrono::NaiveDate;
use core_types::StatusGroup;
use rust_decimal::Decimal;
use serde::Serialize;

/// Orders and revenue for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyOrders {
    pub date: NaiveDate,
    /// Distinct `order_id`s placed that day.
    pub order_count: usize,
    pub revenue: Decimal,
}

/// Units sold for one product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryQuantity {
    pub product_category_name: String,
    pub quantity: u64,
}

/// Distinct customers with at least one line item in a status group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status_group: StatusGroup,
    pub customer_count: usize,
}

/// Distinct customers per state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateCount {
    pub customer_state: String,
    pub customer_count: usize,
}

/// Recency, frequency and monetary value of one customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RfmRow {
    pub customer_id: String,
    /// Days between the customer's last order and the latest order in the selection.
    pub recency: i64,
    /// Distinct orders placed.
    pub frequency: usize,
    /// Total spent across all line items.
    pub monetary: Decimal,
}
