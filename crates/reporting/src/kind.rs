//! Report catalogue.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Every report the orchestrator can compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    TopCustomers,
    TopProducts,
    SalesByCategory,
    SalesByEmployee,
    SalesSummary,
    MonthlySales,
    InventoryStatus,
    TopSuppliers,
    CustomerGrowth,
    OrderStatusSummary,
    RegionSales,
    EmployeePerformance,
    ProductProfitability,
    AverageOrderValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown report `{0}`")]
pub struct UnknownReportKind(pub String);

impl ReportKind {
    pub const ALL: [ReportKind; 14] = [
        Self::TopCustomers,
        Self::TopProducts,
        Self::SalesByCategory,
        Self::SalesByEmployee,
        Self::SalesSummary,
        Self::MonthlySales,
        Self::InventoryStatus,
        Self::TopSuppliers,
        Self::CustomerGrowth,
        Self::OrderStatusSummary,
        Self::RegionSales,
        Self::EmployeePerformance,
        Self::ProductProfitability,
        Self::AverageOrderValue,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TopCustomers => "top-customers",
            Self::TopProducts => "top-products",
            Self::SalesByCategory => "sales-by-category",
            Self::SalesByEmployee => "sales-by-employee",
            Self::SalesSummary => "sales-summary",
            Self::MonthlySales => "monthly-sales",
            Self::InventoryStatus => "inventory-status",
            Self::TopSuppliers => "top-suppliers",
            Self::CustomerGrowth => "customer-growth",
            Self::OrderStatusSummary => "order-status-summary",
            Self::RegionSales => "region-sales",
            Self::EmployeePerformance => "employee-performance",
            Self::ProductProfitability => "product-profitability",
            Self::AverageOrderValue => "average-order-value",
        }
    }
}

impl core::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = UnknownReportKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == wanted)
            .ok_or_else(|| UnknownReportKind(s.to_string()))
    }
}
