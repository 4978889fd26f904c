//! Report orchestration.
//!
//! `ReportService` fetches the rows a report needs from its [`ReportSource`],
//! hands them to the pure folds in `northwind_reporting`, and returns DTOs.
//! Each computation is request-scoped: nothing is cached between calls.
//!
//! Cancellation: every fetch races the caller's `CancellationToken` with the
//! cancellation branch polled first, and the token is checked again before
//! folding. A cancelled computation returns `ReportError::Cancelled` and never
//! a partial report.

use std::future::Future;

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use northwind_core::{Order, OrderId, OrderLine, Product, ReportError, ReportResult};
use northwind_reporting::{
    self as reporting, AverageOrderValue, CustomerGrowth, EmployeePerformance, InventoryRow,
    MonthlySales, OrderDetails, OrderStatusCount, PageRequest, Paginated, ProductProfitability,
    RegionSales, ReportKind, SalesByCategory, SalesByEmployee, SalesSummary, TopCustomer,
    TopProduct, TopSupplier,
};

use crate::config::{DEFAULT_TOP_N, ReportingConfig};
use crate::source::ReportSource;

/// Computes reports over a constructor-injected source.
///
/// Holds no mutable state, so one instance can serve concurrent tasks
/// (wrap it, or the source, in an `Arc`).
#[derive(Debug, Clone)]
pub struct ReportService<S> {
    source: S,
    top_n: usize,
}

impl<S> ReportService<S>
where
    S: ReportSource,
{
    pub fn new(source: S) -> Self {
        Self {
            source,
            top_n: DEFAULT_TOP_N,
        }
    }

    pub fn from_config(source: S, config: &ReportingConfig) -> Self {
        Self::new(source).with_top_n(config.top_n)
    }

    /// Row limit for the ranked reports.
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Run `fut` unless `cancel` fires first.
    async fn guarded<T, F>(
        &self,
        operation: &'static str,
        cancel: &CancellationToken,
        fut: F,
    ) -> ReportResult<T>
    where
        F: Future<Output = ReportResult<T>>,
    {
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ReportError::cancelled(operation)),
            result = fut => result,
        };
        if let Err(err) = &result {
            tracing::warn!(operation, error = %err, "report fetch did not complete");
        }
        result
    }

    fn checkpoint(operation: &'static str, cancel: &CancellationToken) -> ReportResult<()> {
        if cancel.is_cancelled() {
            tracing::warn!(operation, "report cancelled before folding");
            return Err(ReportError::cancelled(operation));
        }
        Ok(())
    }

    pub async fn top_customers(&self, cancel: &CancellationToken) -> ReportResult<Vec<TopCustomer>> {
        const OP: &str = "top_customers";
        let (customers, orders, lines) = self
            .guarded(OP, cancel, async {
                tokio::try_join!(
                    self.source.customers(),
                    self.source.orders(),
                    self.source.order_lines()
                )
            })
            .await?;
        Self::checkpoint(OP, cancel)?;
        let rows = reporting::top_customers(&customers, &orders, &lines, self.top_n);
        tracing::debug!(report = OP, rows = rows.len(), "report computed");
        Ok(rows)
    }

    pub async fn top_products(&self, cancel: &CancellationToken) -> ReportResult<Vec<TopProduct>> {
        const OP: &str = "top_products";
        let (products, lines) = self
            .guarded(OP, cancel, async {
                tokio::try_join!(self.source.products(), self.source.order_lines())
            })
            .await?;
        Self::checkpoint(OP, cancel)?;
        let rows = reporting::top_products(&products, &lines, self.top_n);
        tracing::debug!(report = OP, rows = rows.len(), "report computed");
        Ok(rows)
    }

    pub async fn sales_by_category(
        &self,
        cancel: &CancellationToken,
    ) -> ReportResult<Vec<SalesByCategory>> {
        const OP: &str = "sales_by_category";
        let (categories, products, lines) = self
            .guarded(OP, cancel, async {
                tokio::try_join!(
                    self.source.categories(),
                    self.source.products(),
                    self.source.order_lines()
                )
            })
            .await?;
        Self::checkpoint(OP, cancel)?;
        let rows = reporting::sales_by_category(&categories, &products, &lines);
        tracing::debug!(report = OP, rows = rows.len(), "report computed");
        Ok(rows)
    }

    pub async fn sales_by_employee(
        &self,
        cancel: &CancellationToken,
    ) -> ReportResult<Vec<SalesByEmployee>> {
        const OP: &str = "sales_by_employee";
        let (employees, orders, lines) = self
            .guarded(OP, cancel, async {
                tokio::try_join!(
                    self.source.employees(),
                    self.source.orders(),
                    self.source.order_lines()
                )
            })
            .await?;
        Self::checkpoint(OP, cancel)?;
        let rows = reporting::sales_by_employee(&employees, &orders, &lines);
        tracing::debug!(report = OP, rows = rows.len(), "report computed");
        Ok(rows)
    }

    pub async fn sales_summary(&self, cancel: &CancellationToken) -> ReportResult<SalesSummary> {
        const OP: &str = "sales_summary";
        let (orders, lines) = self.orders_and_lines(OP, cancel).await?;
        let summary = reporting::sales_summary(&orders, &lines);
        tracing::debug!(report = OP, orders = summary.total_orders, "report computed");
        Ok(summary)
    }

    pub async fn monthly_sales(&self, cancel: &CancellationToken) -> ReportResult<Vec<MonthlySales>> {
        const OP: &str = "monthly_sales";
        let (orders, lines) = self.orders_and_lines(OP, cancel).await?;
        let rows = reporting::monthly_sales(&orders, &lines);
        tracing::debug!(report = OP, rows = rows.len(), "report computed");
        Ok(rows)
    }

    pub async fn inventory_status(&self, cancel: &CancellationToken) -> ReportResult<Vec<InventoryRow>> {
        const OP: &str = "inventory_status";
        let products = self.guarded(OP, cancel, self.source.products()).await?;
        Self::checkpoint(OP, cancel)?;
        let rows = reporting::inventory_status(&products);
        tracing::debug!(report = OP, rows = rows.len(), "report computed");
        Ok(rows)
    }

    pub async fn top_suppliers(&self, cancel: &CancellationToken) -> ReportResult<Vec<TopSupplier>> {
        const OP: &str = "top_suppliers";
        let (suppliers, products, lines) = self
            .guarded(OP, cancel, async {
                tokio::try_join!(
                    self.source.suppliers(),
                    self.source.products(),
                    self.source.order_lines()
                )
            })
            .await?;
        Self::checkpoint(OP, cancel)?;
        let rows = reporting::top_suppliers(&suppliers, &products, &lines, self.top_n);
        tracing::debug!(report = OP, rows = rows.len(), "report computed");
        Ok(rows)
    }

    pub async fn customer_growth(
        &self,
        cancel: &CancellationToken,
    ) -> ReportResult<Vec<CustomerGrowth>> {
        const OP: &str = "customer_growth";
        let orders = self.guarded(OP, cancel, self.source.orders()).await?;
        Self::checkpoint(OP, cancel)?;
        let rows = reporting::customer_growth(&orders);
        tracing::debug!(report = OP, periods = rows.len(), "report computed");
        Ok(rows)
    }

    pub async fn order_status_summary(
        &self,
        cancel: &CancellationToken,
    ) -> ReportResult<Vec<OrderStatusCount>> {
        const OP: &str = "order_status_summary";
        let orders = self.guarded(OP, cancel, self.source.orders()).await?;
        Self::checkpoint(OP, cancel)?;
        let rows = reporting::order_status_summary(&orders);
        tracing::debug!(report = OP, rows = rows.len(), "report computed");
        Ok(rows)
    }

    pub async fn region_sales(&self, cancel: &CancellationToken) -> ReportResult<Vec<RegionSales>> {
        const OP: &str = "region_sales";
        let (orders, lines) = self.orders_and_lines(OP, cancel).await?;
        let rows = reporting::region_sales(&orders, &lines);
        tracing::debug!(report = OP, rows = rows.len(), "report computed");
        Ok(rows)
    }

    pub async fn employee_performance(
        &self,
        cancel: &CancellationToken,
    ) -> ReportResult<Vec<EmployeePerformance>> {
        const OP: &str = "employee_performance";
        let (employees, orders, lines) = self
            .guarded(OP, cancel, async {
                tokio::try_join!(
                    self.source.employees(),
                    self.source.orders(),
                    self.source.order_lines()
                )
            })
            .await?;
        Self::checkpoint(OP, cancel)?;
        let rows = reporting::employee_performance(&employees, &orders, &lines);
        tracing::debug!(report = OP, rows = rows.len(), "report computed");
        Ok(rows)
    }

    pub async fn product_profitability(
        &self,
        cancel: &CancellationToken,
    ) -> ReportResult<Vec<ProductProfitability>> {
        const OP: &str = "product_profitability";
        let (products, lines) = self
            .guarded(OP, cancel, async {
                tokio::try_join!(self.source.products(), self.source.order_lines())
            })
            .await?;
        Self::checkpoint(OP, cancel)?;
        let rows = reporting::product_profitability(&products, &lines);
        tracing::debug!(report = OP, rows = rows.len(), "report computed");
        Ok(rows)
    }

    pub async fn average_order_value(
        &self,
        cancel: &CancellationToken,
    ) -> ReportResult<AverageOrderValue> {
        const OP: &str = "average_order_value";
        let (orders, lines) = self.orders_and_lines(OP, cancel).await?;
        Ok(reporting::average_order_value(&orders, &lines))
    }

    /// One page of orders by ascending id.
    pub async fn orders_page(
        &self,
        request: PageRequest,
        cancel: &CancellationToken,
    ) -> ReportResult<Paginated<Order>> {
        const OP: &str = "orders_page";
        let total = self.guarded(OP, cancel, self.source.count_orders()).await?;
        let window = request.window(total);
        let items = self
            .guarded(OP, cancel, self.source.orders_page(window.offset, window.limit))
            .await?;
        Self::checkpoint(OP, cancel)?;
        Ok(Paginated::new(items, request, total))
    }

    /// One page of products by ascending id.
    pub async fn products_page(
        &self,
        request: PageRequest,
        cancel: &CancellationToken,
    ) -> ReportResult<Paginated<Product>> {
        const OP: &str = "products_page";
        let total = self.guarded(OP, cancel, self.source.count_products()).await?;
        let window = request.window(total);
        let items = self
            .guarded(OP, cancel, self.source.products_page(window.offset, window.limit))
            .await?;
        Self::checkpoint(OP, cancel)?;
        Ok(Paginated::new(items, request, total))
    }

    pub async fn order(&self, id: OrderId, cancel: &CancellationToken) -> ReportResult<Order> {
        self.guarded("order", cancel, self.source.order(id))
            .await?
            .ok_or_else(|| ReportError::not_found("order", id))
    }

    pub async fn order_details(
        &self,
        id: OrderId,
        cancel: &CancellationToken,
    ) -> ReportResult<OrderDetails> {
        const OP: &str = "order_details";
        let order = self.order(id, cancel).await?;
        let lines = self
            .guarded(OP, cancel, self.source.lines_for_order(id))
            .await?;
        Self::checkpoint(OP, cancel)?;
        Ok(reporting::order_details(order, &lines))
    }

    /// Compute `kind` and serialize it to JSON.
    pub async fn render(
        &self,
        kind: ReportKind,
        cancel: &CancellationToken,
    ) -> ReportResult<serde_json::Value> {
        match kind {
            ReportKind::TopCustomers => to_json(kind, self.top_customers(cancel).await?),
            ReportKind::TopProducts => to_json(kind, self.top_products(cancel).await?),
            ReportKind::SalesByCategory => to_json(kind, self.sales_by_category(cancel).await?),
            ReportKind::SalesByEmployee => to_json(kind, self.sales_by_employee(cancel).await?),
            ReportKind::SalesSummary => to_json(kind, self.sales_summary(cancel).await?),
            ReportKind::MonthlySales => to_json(kind, self.monthly_sales(cancel).await?),
            ReportKind::InventoryStatus => to_json(kind, self.inventory_status(cancel).await?),
            ReportKind::TopSuppliers => to_json(kind, self.top_suppliers(cancel).await?),
            ReportKind::CustomerGrowth => to_json(kind, self.customer_growth(cancel).await?),
            ReportKind::OrderStatusSummary => {
                to_json(kind, self.order_status_summary(cancel).await?)
            }
            ReportKind::RegionSales => to_json(kind, self.region_sales(cancel).await?),
            ReportKind::EmployeePerformance => {
                to_json(kind, self.employee_performance(cancel).await?)
            }
            ReportKind::ProductProfitability => {
                to_json(kind, self.product_profitability(cancel).await?)
            }
            ReportKind::AverageOrderValue => to_json(kind, self.average_order_value(cancel).await?),
        }
    }

    async fn orders_and_lines(
        &self,
        operation: &'static str,
        cancel: &CancellationToken,
    ) -> ReportResult<(Vec<Order>, Vec<OrderLine>)> {
        let rows = self
            .guarded(operation, cancel, async {
                tokio::try_join!(self.source.orders(), self.source.order_lines())
            })
            .await?;
        Self::checkpoint(operation, cancel)?;
        Ok(rows)
    }
}

fn to_json<T: Serialize>(kind: ReportKind, value: T) -> ReportResult<serde_json::Value> {
    serde_json::to_value(value)
        .map_err(|e| ReportError::fetch("render", format!("cannot serialize {kind}: {e}")))
}
