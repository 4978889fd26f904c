//! Report row shapes handed back to callers.
//!
//! Field names are the stable external contract; decimals serialize as JSON
//! numbers.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use northwind_core::{
    CategoryId, CustomerId, EmployeeId, Order, OrderId, ProductId, SupplierId, YearMonth,
};

use crate::status::{InventoryStatus, OrderStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopCustomer {
    pub customer_id: CustomerId,
    pub company_name: String,
    pub total_purchase: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopProduct {
    pub product_id: ProductId,
    pub product_name: String,
    pub total_sold: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesByCategory {
    pub category_id: CategoryId,
    pub category_name: String,
    pub total_sales: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesByEmployee {
    pub employee_id: EmployeeId,
    pub employee_name: String,
    pub total_sales: Decimal,
}

/// Whole-book totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesSummary {
    pub total_revenue: Decimal,
    /// Orders with at least one line.
    pub total_orders: u64,
    /// Distinct customers over all orders, with or without lines.
    pub total_customers: u64,
    pub average_order_value: Decimal,
    pub first_order_date: Option<NaiveDate>,
    pub last_order_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySales {
    pub year_month: YearMonth,
    pub total_sales: Decimal,
    pub orders: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRow {
    pub product_id: ProductId,
    pub product_name: String,
    pub units_in_stock: i64,
    pub units_on_order: i64,
    pub reorder_level: i64,
    pub status: InventoryStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopSupplier {
    pub supplier_id: SupplierId,
    pub company_name: String,
    pub total_sales: Decimal,
    pub total_qty: i64,
}

/// One period of the customer cohort series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerGrowth {
    pub year_month: YearMonth,
    /// Customers whose first order falls in this period.
    pub new_customers: u64,
    /// Running total of `new_customers` up to and including this period.
    pub cumulative_unique: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStatusCount {
    pub status: OrderStatus,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionSales {
    /// Ship region, falling back to ship country.
    pub region: String,
    pub total_sales: Decimal,
    pub orders: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeePerformance {
    pub employee_id: EmployeeId,
    pub employee_name: String,
    pub total_sales: Decimal,
    pub orders_handled: u64,
    pub avg_order_value: Decimal,
    pub unique_customers: u64,
}

/// Revenue against an approximated cost basis for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductProfitability {
    pub product_id: ProductId,
    pub product_name: String,
    pub revenue: Decimal,
    /// Approximated from the product's reference unit price.
    pub cogs: Decimal,
    pub gross_profit: Decimal,
    pub gross_margin_pct: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AverageOrderValue {
    pub average: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDetailLine {
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub unit_price: Decimal,
    pub quantity: i64,
    pub discount: Decimal,
    pub net_amount: Decimal,
}

/// An order header with its priced lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDetails {
    pub order: Order,
    pub status: OrderStatus,
    pub lines: Vec<OrderDetailLine>,
    pub total: Decimal,
}
