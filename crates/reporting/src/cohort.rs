//! Customer cohort growth.
//!
//! Two passes over the order history: first assign every customer to the
//! month of its earliest order, then walk the full sequence of months in which
//! any order occurred and keep a running total of newly seen customers. The
//! running total is an explicit fold, so it does not depend on the storage
//! engine offering window functions.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use northwind_core::{CustomerId, Order, YearMonth};

use crate::dto::CustomerGrowth;

/// Earliest order date per customer.
///
/// Orders without a customer or without an order date do not assign anyone.
pub fn first_order_dates(orders: &[Order]) -> BTreeMap<&CustomerId, NaiveDate> {
    let mut first: BTreeMap<&CustomerId, NaiveDate> = BTreeMap::new();
    for order in orders {
        let (Some(customer), Some(date)) = (order.customer_id.as_ref(), order.order_date) else {
            continue;
        };
        first
            .entry(customer)
            .and_modify(|d| *d = (*d).min(date))
            .or_insert(date);
    }
    first
}

/// Every month in which at least one dated order was placed, chronologically.
pub fn active_periods(orders: &[Order]) -> BTreeSet<YearMonth> {
    orders
        .iter()
        .filter_map(|o| o.order_date.map(YearMonth::of))
        .collect()
}

/// New and cumulative distinct customers per active month.
///
/// `cumulative_unique` never decreases, and its last value equals the number
/// of distinct customers with at least one dated order.
pub fn customer_growth(orders: &[Order]) -> Vec<CustomerGrowth> {
    let mut cohorts: BTreeMap<YearMonth, u64> = BTreeMap::new();
    for date in first_order_dates(orders).into_values() {
        *cohorts.entry(YearMonth::of(date)).or_insert(0) += 1;
    }

    active_periods(orders)
        .into_iter()
        .scan(0u64, |running, period| {
            let new_customers = cohorts.get(&period).copied().unwrap_or(0);
            *running += new_customers;
            Some(CustomerGrowth {
                year_month: period,
                new_customers,
                cumulative_unique: *running,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use northwind_core::OrderId;
    use proptest::prelude::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn order(id: i64, customer: Option<&str>, date: Option<&str>) -> Order {
        let mut o = Order::new(OrderId::new(id));
        if let Some(c) = customer {
            o = o.with_customer(c);
        }
        if let Some(date) = date {
            o = o.ordered_on(d(date));
        }
        o
    }

    #[test]
    fn quiet_months_still_appear_with_zero_new_customers() {
        let orders = vec![
            order(1, Some("ALFKI"), Some("1996-07-04")),
            order(2, Some("ANATR"), Some("1996-07-20")),
            order(3, Some("ALFKI"), Some("1996-08-02")),
            order(4, Some("BONAP"), Some("1996-09-15")),
        ];

        let growth = customer_growth(&orders);
        let rendered: Vec<(String, u64, u64)> = growth
            .iter()
            .map(|g| (g.year_month.to_string(), g.new_customers, g.cumulative_unique))
            .collect();

        assert_eq!(
            rendered,
            vec![
                ("1996-07".to_string(), 2, 2),
                ("1996-08".to_string(), 0, 2),
                ("1996-09".to_string(), 1, 3),
            ]
        );
    }

    #[test]
    fn customer_is_counted_in_its_earliest_month_regardless_of_row_order() {
        let orders = vec![
            order(10, Some("VINET"), Some("1997-02-01")),
            order(11, Some("VINET"), Some("1996-12-31")),
        ];

        let growth = customer_growth(&orders);
        assert_eq!(growth[0].year_month.to_string(), "1996-12");
        assert_eq!(growth[0].new_customers, 1);
        assert_eq!(growth[1].new_customers, 0);
        assert_eq!(growth[1].cumulative_unique, 1);
    }

    #[test]
    fn anonymous_orders_extend_periods_but_add_no_customers() {
        let orders = vec![
            order(1, Some("ALFKI"), Some("1996-07-04")),
            order(2, None, Some("1996-10-01")),
            order(3, Some("ANATR"), None),
        ];

        let growth = customer_growth(&orders);
        assert_eq!(growth.len(), 2);
        assert_eq!(growth[1].year_month.to_string(), "1996-10");
        assert_eq!(growth[1].new_customers, 0);
        assert_eq!(growth[1].cumulative_unique, 1);
    }

    #[test]
    fn no_orders_no_periods() {
        assert!(customer_growth(&[]).is_empty());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: cumulative_unique is non-decreasing and ends at the distinct customer count.
        #[test]
        fn running_total_is_monotonic_and_complete(
            rows in prop::collection::vec((0u8..20, 0u32..48, 1u32..28), 1..200)
        ) {
            let orders: Vec<Order> = rows
                .iter()
                .enumerate()
                .map(|(i, (customer, month_offset, day))| {
                    let year = 1996 + (month_offset / 12) as i32;
                    let month = month_offset % 12 + 1;
                    let date = NaiveDate::from_ymd_opt(year, month, *day).unwrap();
                    Order::new(OrderId::new(i as i64))
                        .with_customer(format!("C{customer:03}"))
                        .ordered_on(date)
                })
                .collect();

            let growth = customer_growth(&orders);

            for pair in growth.windows(2) {
                prop_assert!(pair[0].year_month < pair[1].year_month);
                prop_assert!(pair[0].cumulative_unique <= pair[1].cumulative_unique);
            }

            let distinct: BTreeSet<&CustomerId> =
                orders.iter().filter_map(|o| o.customer_id.as_ref()).collect();
            let last = growth.last().map(|g| g.cumulative_unique).unwrap_or(0);
            prop_assert_eq!(last, distinct.len() as u64);

            let new_total: u64 = growth.iter().map(|g| g.new_customers).sum();
            prop_assert_eq!(new_total, last);
        }
    }
}
