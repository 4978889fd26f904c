//! Order and inventory status classification.
//!
//! Both classifiers are total: every input combination, absent values
//! included, maps to exactly one label.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use northwind_core::{Order, Product};

use crate::dto::{InventoryRow, OrderStatusCount};

/// Fulfilment status derived from an order's dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Shipped,
    Late,
}

impl OrderStatus {
    /// Precedence: not shipped → `Pending`; shipped after a known required
    /// date → `Late`; everything else → `Shipped`.
    pub fn classify(shipped_date: Option<NaiveDate>, required_date: Option<NaiveDate>) -> Self {
        match (shipped_date, required_date) {
            (None, _) => Self::Pending,
            (Some(shipped), Some(required)) if shipped > required => Self::Late,
            (Some(_), _) => Self::Shipped,
        }
    }

    /// An order whose ship date was stored but unreadable is `Shipped`: it
    /// left the warehouse, but lateness cannot be judged.
    pub fn of(order: &Order) -> Self {
        match order.shipped_date {
            None if order.ship_recorded => Self::Shipped,
            shipped => Self::classify(shipped, order.required_date),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Shipped => "Shipped",
            Self::Late => "Late",
        }
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stock health of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InventoryStatus {
    Ok,
    Low,
    Out,
}

impl InventoryStatus {
    /// Absent values count as zero. `units_on_order` does not affect the label.
    pub fn classify(
        units_in_stock: Option<i64>,
        _units_on_order: Option<i64>,
        reorder_level: Option<i64>,
    ) -> Self {
        let stock = units_in_stock.unwrap_or(0);
        let reorder = reorder_level.unwrap_or(0);

        if stock == 0 {
            Self::Out
        } else if stock <= reorder {
            Self::Low
        } else {
            Self::Ok
        }
    }

    pub fn of(product: &Product) -> Self {
        Self::classify(
            product.units_in_stock,
            product.units_on_order,
            product.reorder_level,
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Low => "LOW",
            Self::Out => "OUT",
        }
    }
}

impl core::fmt::Display for InventoryStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Count orders per derived status.
///
/// Ordered by count descending, then label ascending. Statuses no order maps
/// to are omitted.
pub fn order_status_summary(orders: &[Order]) -> Vec<OrderStatusCount> {
    let mut counts: BTreeMap<OrderStatus, u64> = BTreeMap::new();
    for order in orders {
        *counts.entry(OrderStatus::of(order)).or_insert(0) += 1;
    }

    let mut out: Vec<OrderStatusCount> = counts
        .into_iter()
        .map(|(status, count)| OrderStatusCount { status, count })
        .collect();
    out.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.status.as_str().cmp(b.status.as_str()))
    });
    out
}

/// Stock levels and health for every product, ordered by product name.
pub fn inventory_status(products: &[Product]) -> Vec<InventoryRow> {
    let mut rows: Vec<InventoryRow> = products
        .iter()
        .map(|p| InventoryRow {
            product_id: p.id,
            product_name: p.name.clone(),
            units_in_stock: p.units_in_stock.unwrap_or(0),
            units_on_order: p.units_on_order.unwrap_or(0),
            reorder_level: p.reorder_level.unwrap_or(0),
            status: InventoryStatus::of(p),
        })
        .collect();
    rows.sort_by(|a, b| {
        a.product_name
            .cmp(&b.product_name)
            .then_with(|| a.product_id.cmp(&b.product_id))
    });
    rows
}
