//! Read-only row sources feeding the report service.
//!
//! A source hands out complete, id-ordered row sets for one consistent
//! snapshot. It never aggregates; every derivation happens in the reporting
//! crate so that all backends produce identical reports.

pub mod in_memory;
pub mod sqlite;

use std::sync::Arc;

use northwind_core::{
    Category, Customer, Employee, Order, OrderId, OrderLine, Product, ReportResult, Supplier,
};

pub use in_memory::{InMemoryReportSource, ReportSnapshot};
pub use sqlite::SqliteReportSource;

/// Async, read-only access to the Northwind tables.
///
/// Collections come back in ascending primary-key order. Order lines are
/// ordered by `(order_id, product_id)`.
#[async_trait::async_trait]
pub trait ReportSource: Send + Sync {
    async fn orders(&self) -> ReportResult<Vec<Order>>;
    async fn order_lines(&self) -> ReportResult<Vec<OrderLine>>;
    async fn products(&self) -> ReportResult<Vec<Product>>;
    async fn customers(&self) -> ReportResult<Vec<Customer>>;
    async fn employees(&self) -> ReportResult<Vec<Employee>>;
    async fn suppliers(&self) -> ReportResult<Vec<Supplier>>;
    async fn categories(&self) -> ReportResult<Vec<Category>>;

    /// Single order by id; `None` when absent.
    async fn order(&self, id: OrderId) -> ReportResult<Option<Order>>;
    async fn lines_for_order(&self, id: OrderId) -> ReportResult<Vec<OrderLine>>;

    async fn count_orders(&self) -> ReportResult<u64>;
    /// Window over orders by ascending id.
    async fn orders_page(&self, offset: u64, limit: u64) -> ReportResult<Vec<Order>>;
    async fn count_products(&self) -> ReportResult<u64>;
    /// Window over products by ascending id.
    async fn products_page(&self, offset: u64, limit: u64) -> ReportResult<Vec<Product>>;
}

#[async_trait::async_trait]
impl<S> ReportSource for Arc<S>
where
    S: ReportSource + ?Sized,
{
    async fn orders(&self) -> ReportResult<Vec<Order>> {
        (**self).orders().await
    }

    async fn order_lines(&self) -> ReportResult<Vec<OrderLine>> {
        (**self).order_lines().await
    }

    async fn products(&self) -> ReportResult<Vec<Product>> {
        (**self).products().await
    }

    async fn customers(&self) -> ReportResult<Vec<Customer>> {
        (**self).customers().await
    }

    async fn employees(&self) -> ReportResult<Vec<Employee>> {
        (**self).employees().await
    }

    async fn suppliers(&self) -> ReportResult<Vec<Supplier>> {
        (**self).suppliers().await
    }

    async fn categories(&self) -> ReportResult<Vec<Category>> {
        (**self).categories().await
    }

    async fn order(&self, id: OrderId) -> ReportResult<Option<Order>> {
        (**self).order(id).await
    }

    async fn lines_for_order(&self, id: OrderId) -> ReportResult<Vec<OrderLine>> {
        (**self).lines_for_order(id).await
    }

    async fn count_orders(&self) -> ReportResult<u64> {
        (**self).count_orders().await
    }

    async fn orders_page(&self, offset: u64, limit: u64) -> ReportResult<Vec<Order>> {
        (**self).orders_page(offset, limit).await
    }

    async fn count_products(&self) -> ReportResult<u64> {
        (**self).count_products().await
    }

    async fn products_page(&self, offset: u64, limit: u64) -> ReportResult<Vec<Product>> {
        (**self).products_page(offset, limit).await
    }
}
