//! # Orderlens Analytics
//!
//! This crate turns a table of order line items into the small derived tables a
//! sales dashboard displays: daily orders and revenue, product category volume,
//! customers per status and per state, and RFM (recency, frequency, monetary)
//! figures per customer.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of files,
//!   widgets or charts. It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** The `AnalyticsEngine` holds no data between calls.
//!   It borrows the records, never mutates them, and recomputes every table from
//!   scratch, so the same input always produces the same output.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: The five aggregation operations and the combined `dashboard` call.
//! - `DateRange` / `filter_records`: The inclusive calendar-day selection.
//! - `DashboardReport`: All five tables for a selection plus the headline numbers.
//! - `AnalyticsError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod range;
pub mod report;
pub mod tables;

// Re-export the key components to create a clean, public-facing API.
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use range::{DateRange, filter_records};
pub use report::{DashboardReport, Headline};
pub use tables::{CategoryQuantity, DailyOrders, RfmRow, StateCount, StatusCount};
