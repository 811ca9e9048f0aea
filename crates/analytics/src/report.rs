use crate::range::DateRange;
use crate::tables::{CategoryQuantity, DailyOrders, RfmRow, StateCount, StatusCount};
use rust_decimal::Decimal;
use serde::Serialize;

/// Every derived table for one date-range selection.
///
/// This struct is the output of `AnalyticsEngine::dashboard` and the data transfer
/// object handed to whatever renders the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    /// `None` when the whole table was selected.
    pub range: Option<DateRange>,
    pub record_count: usize,
    pub daily_orders: Vec<DailyOrders>,
    pub category_quantities: Vec<CategoryQuantity>,
    pub status_counts: Vec<StatusCount>,
    pub state_counts: Vec<StateCount>,
    pub rfm: Vec<RfmRow>,
}

/// The headline numbers shown above the charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Headline {
    pub total_orders: usize,
    pub total_revenue: Decimal,
    pub average_recency: Option<Decimal>,
    pub average_frequency: Option<Decimal>,
    pub average_monetary: Option<Decimal>,
}

impl DashboardReport {
    pub fn total_orders(&self) -> usize {
        self.daily_orders.iter().map(|d| d.order_count).sum()
    }

    pub fn total_revenue(&self) -> Decimal {
        self.daily_orders.iter().map(|d| d.revenue).sum()
    }

    /// Mean recency in days, rounded to one decimal place.
    pub fn average_recency(&self) -> Option<Decimal> {
        self.rfm_mean(|r| Decimal::from(r.recency)).map(|m| m.round_dp(1))
    }

    /// Mean number of orders per customer, rounded to two decimal places.
    pub fn average_frequency(&self) -> Option<Decimal> {
        self.rfm_mean(|r| Decimal::from(r.frequency)).map(|m| m.round_dp(2))
    }

    /// Mean spend per customer, rounded to two decimal places.
    pub fn average_monetary(&self) -> Option<Decimal> {
        self.rfm_mean(|r| r.monetary).map(|m| m.round_dp(2))
    }

    pub fn headline(&self) -> Headline {
        Headline {
            total_orders: self.total_orders(),
            total_revenue: self.total_revenue(),
            average_recency: self.average_recency(),
            average_frequency: self.average_frequency(),
            average_monetary: self.average_monetary(),
        }
    }

    /// The `n` categories with the most units sold.
    pub fn best_performing(&self, n: usize) -> &[CategoryQuantity] {
        &self.category_quantities[..n.min(self.category_quantities.len())]
    }

    /// The `n` categories with the fewest units sold, fewest first.
    pub fn worst_performing(&self, n: usize) -> Vec<&CategoryQuantity> {
        let mut rows: Vec<&CategoryQuantity> = self.category_quantities.iter().collect();
        rows.sort_by_key(|row| row.quantity);
        rows.truncate(n);
        rows
    }

    /// States ordered by customer count, largest first.
    pub fn states_by_customers(&self) -> Vec<&StateCount> {
        let mut rows: Vec<&StateCount> = self.state_counts.iter().collect();
        rows.sort_by(|a, b| b.customer_count.cmp(&a.customer_count));
        rows
    }

    /// The `n` most recently active customers.
    pub fn top_by_recency(&self, n: usize) -> Vec<&RfmRow> {
        self.top_rfm(n, |a, b| a.recency.cmp(&b.recency))
    }

    /// The `n` customers with the most orders.
    pub fn top_by_frequency(&self, n: usize) -> Vec<&RfmRow> {
        self.top_rfm(n, |a, b| b.frequency.cmp(&a.frequency))
    }

    /// The `n` customers with the highest spend.
    pub fn top_by_monetary(&self, n: usize) -> Vec<&RfmRow> {
        self.top_rfm(n, |a, b| b.monetary.cmp(&a.monetary))
    }

    fn top_rfm<F>(&self, n: usize, compare: F) -> Vec<&RfmRow>
    where
        F: Fn(&RfmRow, &RfmRow) -> std::cmp::Ordering,
    {
        let mut rows: Vec<&RfmRow> = self.rfm.iter().collect();
        rows.sort_by(|a, b| compare(a, b));
        rows.truncate(n);
        rows
    }

    fn rfm_mean<F>(&self, value: F) -> Option<Decimal>
    where
        F: Fn(&RfmRow) -> Decimal,
    {
        if self.rfm.is_empty() {
            return None;
        }
        let total: Decimal = self.rfm.iter().map(value).sum();
        Some(total / Decimal::from(self.rfm.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn rfm(customer_id: &str, recency: i64, frequency: usize, monetary: Decimal) -> RfmRow {
        RfmRow {
            customer_id: customer_id.to_string(),
            recency,
            frequency,
            monetary,
        }
    }

    fn category(name: &str, quantity: u64) -> CategoryQuantity {
        CategoryQuantity {
            product_category_name: name.to_string(),
            quantity,
        }
    }

    fn report() -> DashboardReport {
        DashboardReport {
            range: None,
            record_count: 0,
            daily_orders: vec![],
            category_quantities: vec![
                category("bed_bath_table", 9),
                category("health_beauty", 6),
                category("toys", 2),
                category("auto", 2),
            ],
            status_counts: vec![],
            state_counts: vec![
                StateCount { customer_state: "MG".to_string(), customer_count: 2 },
                StateCount { customer_state: "SP".to_string(), customer_count: 7 },
            ],
            rfm: vec![
                rfm("a", 10, 1, dec!(20.00)),
                rfm("b", 0, 3, dec!(150.50)),
                rfm("c", 5, 2, dec!(80.25)),
            ],
        }
    }

    #[test]
    fn averages_are_rounded() {
        let r = report();
        assert_eq!(r.average_recency(), Some(dec!(5.0)));
        assert_eq!(r.average_frequency(), Some(dec!(2.00)));
        assert_eq!(r.average_monetary(), Some(dec!(83.58)));
    }

    #[test]
    fn averages_are_absent_without_customers() {
        let mut r = report();
        r.rfm.clear();
        let headline = r.headline();
        assert_eq!(headline.average_recency, None);
        assert_eq!(headline.average_monetary, None);
        assert_eq!(headline.total_orders, 0);
        assert_eq!(headline.total_revenue, Decimal::ZERO);
    }

    #[test]
    fn best_and_worst_slices() {
        let r = report();
        let best: Vec<&str> = r.best_performing(2).iter().map(|c| c.product_category_name.as_str()).collect();
        assert_eq!(best, vec!["bed_bath_table", "health_beauty"]);

        let worst: Vec<&str> = r.worst_performing(3).iter().map(|c| c.product_category_name.as_str()).collect();
        assert_eq!(worst, vec!["toys", "auto", "health_beauty"]);

        assert_eq!(r.best_performing(50).len(), 4);
    }

    #[test]
    fn rfm_rankings() {
        let r = report();
        let ids = |rows: Vec<&RfmRow>| rows.iter().map(|x| x.customer_id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(r.top_by_recency(2)), vec!["b", "c"]);
        assert_eq!(ids(r.top_by_frequency(1)), vec!["b"]);
        assert_eq!(ids(r.top_by_monetary(3)), vec!["b", "c", "a"]);
    }

    #[test]
    fn states_sorted_by_customer_count() {
        let r = report();
        let states: Vec<&str> = r.states_by_customers().iter().map(|s| s.customer_state.as_str()).collect();
        assert_eq!(states, vec!["SP", "MG"]);
    }
}
