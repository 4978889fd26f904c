//! Product profitability.
//!
//! COGS is approximated as the product's reference unit price times the
//! quantity sold; the data set carries no historical cost. This is an
//! intentional approximation, not an accounting ground truth.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;

use northwind_core::{OrderLine, Product, ProductId};

use crate::dto::ProductProfitability;
use crate::revenue::{line_net, net_amount, saturated};

/// Gross figures for one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GrossFigures {
    pub revenue: Decimal,
    pub cogs: Decimal,
}

impl GrossFigures {
    pub fn gross_profit(&self) -> Decimal {
        self.revenue.saturating_sub(self.cogs)
    }

    /// `gross_profit / revenue * 100`, or zero when there is no revenue.
    ///
    /// Saturates when the ratio leaves the `Decimal` range.
    pub fn gross_margin_pct(&self) -> Decimal {
        if self.revenue.is_zero() {
            return Decimal::ZERO;
        }
        let profit = self.gross_profit();
        profit
            .checked_div(self.revenue)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .unwrap_or_else(|| {
                saturated(profit.is_sign_negative() != self.revenue.is_sign_negative())
            })
    }
}

/// Profitability per product that has at least one order line.
///
/// Lines for products missing from `products` are skipped. Ordered by revenue
/// descending, then product id.
pub fn product_profitability(products: &[Product], lines: &[OrderLine]) -> Vec<ProductProfitability> {
    let catalog: HashMap<ProductId, &Product> = products.iter().map(|p| (p.id, p)).collect();

    let mut figures: BTreeMap<ProductId, GrossFigures> = BTreeMap::new();
    for line in lines {
        let Some(product) = catalog.get(&line.product_id) else {
            continue;
        };
        let cost_price = product.unit_price.unwrap_or(Decimal::ZERO);
        let entry = figures.entry(line.product_id).or_default();
        entry.revenue = entry.revenue.saturating_add(line_net(line));
        entry.cogs = entry
            .cogs
            .saturating_add(net_amount(cost_price, line.quantity, Decimal::ZERO));
    }

    let mut rows: Vec<ProductProfitability> = figures
        .into_iter()
        .filter_map(|(id, f)| {
            let product = catalog.get(&id)?;
            Some(ProductProfitability {
                product_id: id,
                product_name: product.name.clone(),
                revenue: f.revenue,
                cogs: f.cogs,
                gross_profit: f.gross_profit(),
                gross_margin_pct: f.gross_margin_pct(),
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        b.revenue
            .cmp(&a.revenue)
            .then_with(|| a.product_id.cmp(&b.product_id))
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use northwind_core::OrderId;
    use rust_decimal_macros::dec;

    fn line(order: i64, product: i64, price: Decimal, qty: i64, discount: Decimal) -> OrderLine {
        OrderLine::new(OrderId::new(order), ProductId::new(product), price, qty, discount)
    }

    #[test]
    fn zero_revenue_has_zero_margin() {
        let f = GrossFigures {
            revenue: Decimal::ZERO,
            cogs: dec!(50),
        };
        assert_eq!(f.gross_margin_pct(), Decimal::ZERO);
        assert_eq!(f.gross_profit(), dec!(-50));
    }

    #[test]
    fn margin_is_profit_over_revenue() {
        let f = GrossFigures {
            revenue: dec!(200),
            cogs: dec!(150),
        };
        assert_eq!(f.gross_margin_pct(), dec!(25));
    }

    #[test]
    fn sells_below_reference_price_for_negative_profit() {
        let products = vec![Product::new(ProductId::new(11), "Queso Cabrales").with_unit_price(dec!(21))];
        let lines = vec![line(10248, 11, dec!(14), 12, dec!(0))];

        let rows = product_profitability(&products, &lines);
        assert_eq!(rows.len(), 1);
        let r = &rows[0];
        assert_eq!(r.revenue, dec!(168));
        assert_eq!(r.cogs, dec!(252));
        assert_eq!(r.gross_profit, dec!(-84));
        assert_eq!(r.gross_margin_pct, dec!(-50));
    }

    #[test]
    fn fully_discounted_product_reports_zero_margin() {
        let products = vec![Product::new(ProductId::new(1), "Chai").with_unit_price(dec!(18))];
        let lines = vec![line(1, 1, dec!(18), 2, dec!(1))];

        let rows = product_profitability(&products, &lines);
        assert_eq!(rows[0].revenue, Decimal::ZERO);
        assert_eq!(rows[0].gross_margin_pct, Decimal::ZERO);
    }

    #[test]
    fn missing_reference_price_counts_as_zero_cost() {
        let products = vec![Product::new(ProductId::new(3), "Aniseed Syrup")];
        let lines = vec![line(1, 3, dec!(10), 4, dec!(0))];

        let rows = product_profitability(&products, &lines);
        assert_eq!(rows[0].cogs, Decimal::ZERO);
        assert_eq!(rows[0].gross_margin_pct, dec!(100));
    }

    #[test]
    fn extreme_volumes_saturate_instead_of_panicking() {
        let products = vec![Product::new(ProductId::new(1), "Chai").with_unit_price(dec!(1))];
        let huge = Decimal::from(10_000_000_000_i64);
        let lines = vec![
            line(1, 1, huge, i64::MAX, dec!(0)),
            line(2, 1, huge, i64::MAX, dec!(0)),
        ];

        let rows = product_profitability(&products, &lines);
        assert_eq!(rows[0].revenue, Decimal::MAX);
        assert_eq!(rows[0].cogs, Decimal::from(i64::MAX) * Decimal::from(2));
        assert_eq!(rows[0].gross_profit, Decimal::MAX - rows[0].cogs);
    }

    #[test]
    fn margin_saturates_on_tiny_revenue() {
        let f = GrossFigures {
            revenue: Decimal::new(1, 28),
            cogs: Decimal::MIN,
        };
        assert_eq!(f.gross_profit(), Decimal::MAX);
        assert_eq!(f.gross_margin_pct(), Decimal::MAX);
    }

    #[test]
    fn ordered_by_revenue_then_id_and_skips_unsold_and_unknown() {
        let products = vec![
            Product::new(ProductId::new(1), "Chai").with_unit_price(dec!(10)),
            Product::new(ProductId::new(2), "Chang").with_unit_price(dec!(10)),
            Product::new(ProductId::new(3), "Unsold").with_unit_price(dec!(10)),
            Product::new(ProductId::new(4), "Tofu").with_unit_price(dec!(10)),
        ];
        let lines = vec![
            line(1, 2, dec!(10), 5, dec!(0)),
            line(1, 4, dec!(10), 5, dec!(0)),
            line(2, 1, dec!(10), 9, dec!(0)),
            line(2, 99, dec!(10), 100, dec!(0)),
        ];

        let rows = product_profitability(&products, &lines);
        let ids: Vec<i64> = rows.iter().map(|r| r.product_id.get()).collect();
        assert_eq!(ids, vec![1, 2, 4]);
    }
}
