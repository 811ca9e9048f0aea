use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The normalized status of an order line, as grouped in the source dataset.
///
/// The labels keep the dataset's exact spelling (note the lowercase `canceled`),
/// since that is what arrives in `OrderRecord::status_group`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusGroup {
    #[serde(rename = "Completed")]
    Completed,
    #[serde(rename = "canceled")]
    Canceled,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "New")]
    New,
}

impl StatusGroup {
    /// Every status group, in display order.
    pub const ALL: [StatusGroup; 4] = [
        StatusGroup::Completed,
        StatusGroup::Canceled,
        StatusGroup::InProgress,
        StatusGroup::New,
    ];

    /// Position of this group in the fixed display order.
    pub fn rank(&self) -> usize {
        match self {
            StatusGroup::Completed => 0,
            StatusGroup::Canceled => 1,
            StatusGroup::InProgress => 2,
            StatusGroup::New => 3,
        }
    }

    /// The label used by the dataset.
    pub fn label(&self) -> &'static str {
        match self {
            StatusGroup::Completed => "Completed",
            StatusGroup::Canceled => "canceled",
            StatusGroup::InProgress => "In Progress",
            StatusGroup::New => "New",
        }
    }
}

impl fmt::Display for StatusGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for StatusGroup {
    type Err = CoreError;

    /// Matching is exact. A label such as `"Canceled"` is not in the dataset's
    /// vocabulary and is rejected rather than guessed at.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatusGroup::ALL
            .into_iter()
            .find(|group| group.label() == s)
            .ok_or_else(|| CoreError::UnknownStatusGroup(s.to_string()))
    }
}

/// Names the columns of an `OrderRecord`, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordField {
    OrderId,
    CustomerId,
    OrderDate,
    OrderDeliveredCustomerDate,
    ProductCategoryName,
    Quantity,
    TotalPrice,
    CustomerState,
    StatusGroup,
}

impl RecordField {
    /// The column name as it appears in the dataset.
    pub fn column_name(&self) -> &'static str {
        match self {
            RecordField::OrderId => "order_id",
            RecordField::CustomerId => "customer_id",
            RecordField::OrderDate => "order_date",
            RecordField::OrderDeliveredCustomerDate => "order_delivered_customer_date",
            RecordField::ProductCategoryName => "product_category_name",
            RecordField::Quantity => "quantity",
            RecordField::TotalPrice => "total_price",
            RecordField::CustomerState => "customer_state",
            RecordField::StatusGroup => "status_group",
        }
    }
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// How days without any orders are represented in the daily series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DailyBucketPolicy {
    /// Only days that have at least one record get a row.
    #[default]
    Omit,
    /// Every day between the first and last record day gets a row; gaps are zeroed.
    ZeroFill,
}
