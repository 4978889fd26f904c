//! Reporting domain module.
//!
//! Pure derivation logic over read-only rows: line revenue, status
//! classification, profitability, cohort growth, pagination math and the
//! per-report folds that combine them. No IO, no storage, no clocks; every
//! function here is deterministic for a given input set.

pub mod aggregate;
pub mod cohort;
pub mod dto;
pub mod kind;
pub mod pagination;
pub mod profitability;
pub mod revenue;
pub mod status;

pub use aggregate::{
    average_order_value, employee_performance, monthly_sales, order_details, order_totals,
    region_of, region_sales, sales_by_category, sales_by_employee, sales_summary, top_customers,
    top_products, top_suppliers,
};
pub use cohort::customer_growth;
pub use dto::{
    AverageOrderValue, CustomerGrowth, EmployeePerformance, InventoryRow, MonthlySales,
    OrderDetailLine, OrderDetails, OrderStatusCount, ProductProfitability, RegionSales,
    SalesByCategory, SalesByEmployee, SalesSummary, TopCustomer, TopProduct, TopSupplier,
};
pub use kind::{ReportKind, UnknownReportKind};
pub use pagination::{PageRequest, PageWindow, Paginated, paginate};
pub use profitability::product_profitability;
pub use revenue::net_amount;
pub use status::{InventoryStatus, OrderStatus, inventory_status, order_status_summary};
