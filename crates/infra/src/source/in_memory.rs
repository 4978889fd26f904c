//! Snapshot-backed source for tests and local runs.
//!
//! Every table is held sorted in source order, so reads and pages match what
//! the SQLite source returns. Writers only ever swap whole values, so a lock
//! poisoned by a panicking holder still guards consistent data and is
//! recovered rather than surfaced.

use std::collections::HashMap;
use std::sync::{LockResult, PoisonError, RwLock};

use northwind_core::{
    Category, Customer, Employee, Order, OrderId, OrderLine, Product, ReportError, ReportResult,
    Supplier,
};

use super::ReportSource;

/// Full set of rows a report may read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportSnapshot {
    pub orders: Vec<Order>,
    pub order_lines: Vec<OrderLine>,
    pub products: Vec<Product>,
    pub customers: Vec<Customer>,
    pub employees: Vec<Employee>,
    pub suppliers: Vec<Supplier>,
    pub categories: Vec<Category>,
}

impl ReportSnapshot {
    /// Sort every table into source order.
    fn normalized(mut self) -> Self {
        self.orders.sort_by_key(|o| o.id);
        self.order_lines.sort_by_key(|l| (l.order_id, l.product_id));
        self.products.sort_by_key(|p| p.id);
        self.customers.sort_by(|a, b| a.id.cmp(&b.id));
        self.employees.sort_by_key(|e| e.id);
        self.suppliers.sort_by_key(|s| s.id);
        self.categories.sort_by_key(|c| c.id);
        self
    }
}

/// In-memory source for tests/dev.
///
/// Any operation can be made to fail with [`fail_operation`](Self::fail_operation)
/// to exercise error propagation.
#[derive(Debug, Default)]
pub struct InMemoryReportSource {
    snapshot: RwLock<ReportSnapshot>,
    failures: RwLock<HashMap<&'static str, String>>,
}

impl InMemoryReportSource {
    pub fn new(snapshot: ReportSnapshot) -> Self {
        Self {
            snapshot: RwLock::new(snapshot.normalized()),
            failures: RwLock::new(HashMap::new()),
        }
    }

    /// Swap in a new snapshot.
    pub fn replace(&self, snapshot: ReportSnapshot) {
        *recover("snapshot", self.snapshot.write()) = snapshot.normalized();
    }

    /// Make every later call of `operation` fail with `message`.
    pub fn fail_operation(&self, operation: &'static str, message: impl Into<String>) {
        recover("failures", self.failures.write()).insert(operation, message.into());
    }

    pub fn clear_failures(&self) {
        recover("failures", self.failures.write()).clear();
    }

    fn read<T>(
        &self,
        operation: &'static str,
        f: impl FnOnce(&ReportSnapshot) -> T,
    ) -> ReportResult<T> {
        let failures = recover("failures", self.failures.read());
        if let Some(message) = failures.get(operation) {
            return Err(ReportError::fetch(operation, message.clone()));
        }
        drop(failures);

        let snapshot = recover("snapshot", self.snapshot.read());
        Ok(f(&snapshot))
    }
}

/// Take the guard even if a previous holder panicked.
fn recover<G>(lock: &'static str, result: LockResult<G>) -> G {
    result.unwrap_or_else(|poisoned| {
        tracing::warn!(lock, "recovering poisoned lock");
        PoisonError::into_inner(poisoned)
    })
}

fn window<T: Clone>(rows: &[T], offset: u64, limit: u64) -> Vec<T> {
    let start = usize::try_from(offset).unwrap_or(usize::MAX);
    let take = usize::try_from(limit).unwrap_or(usize::MAX);
    rows.iter().skip(start).take(take).cloned().collect()
}

#[async_trait::async_trait]
impl ReportSource for InMemoryReportSource {
    async fn orders(&self) -> ReportResult<Vec<Order>> {
        self.read("orders", |s| s.orders.clone())
    }

    async fn order_lines(&self) -> ReportResult<Vec<OrderLine>> {
        self.read("order_lines", |s| s.order_lines.clone())
    }

    async fn products(&self) -> ReportResult<Vec<Product>> {
        self.read("products", |s| s.products.clone())
    }

    async fn customers(&self) -> ReportResult<Vec<Customer>> {
        self.read("customers", |s| s.customers.clone())
    }

    async fn employees(&self) -> ReportResult<Vec<Employee>> {
        self.read("employees", |s| s.employees.clone())
    }

    async fn suppliers(&self) -> ReportResult<Vec<Supplier>> {
        self.read("suppliers", |s| s.suppliers.clone())
    }

    async fn categories(&self) -> ReportResult<Vec<Category>> {
        self.read("categories", |s| s.categories.clone())
    }

    async fn order(&self, id: OrderId) -> ReportResult<Option<Order>> {
        self.read("order", |s| s.orders.iter().find(|o| o.id == id).cloned())
    }

    async fn lines_for_order(&self, id: OrderId) -> ReportResult<Vec<OrderLine>> {
        self.read("lines_for_order", |s| {
            s.order_lines
                .iter()
                .filter(|l| l.order_id == id)
                .cloned()
                .collect()
        })
    }

    async fn count_orders(&self) -> ReportResult<u64> {
        self.read("count_orders", |s| s.orders.len() as u64)
    }

    async fn orders_page(&self, offset: u64, limit: u64) -> ReportResult<Vec<Order>> {
        self.read("orders_page", |s| window(&s.orders, offset, limit))
    }

    async fn count_products(&self) -> ReportResult<u64> {
        self.read("count_products", |s| s.products.len() as u64)
    }

    async fn products_page(&self, offset: u64, limit: u64) -> ReportResult<Vec<Product>> {
        self.read("products_page", |s| window(&s.products, offset, limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use northwind_core::ProductId;

    fn source() -> InMemoryReportSource {
        InMemoryReportSource::new(ReportSnapshot {
            orders: vec![Order::new(OrderId::new(3)), Order::new(OrderId::new(1))],
            products: (1..=5)
                .rev()
                .map(|i| Product::new(ProductId::new(i), format!("P{i}")))
                .collect(),
            ..ReportSnapshot::default()
        })
    }

    #[tokio::test]
    async fn rows_come_back_in_id_order() {
        let src = source();
        let ids: Vec<i64> = src.orders().await.unwrap().iter().map(|o| o.id.get()).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[tokio::test]
    async fn pages_window_the_ordered_rows() {
        let src = source();
        let page: Vec<i64> = src
            .products_page(2, 2)
            .await
            .unwrap()
            .iter()
            .map(|p| p.id.get())
            .collect();
        assert_eq!(page, vec![3, 4]);
        assert!(src.products_page(10, 2).await.unwrap().is_empty());
        assert_eq!(src.count_products().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn injected_failure_hits_only_that_operation() {
        let src = source();
        src.fail_operation("orders", "disk on fire");

        let err = src.orders().await.unwrap_err();
        assert_eq!(err, ReportError::fetch("orders", "disk on fire"));
        assert!(src.products().await.is_ok());

        src.clear_failures();
        assert!(src.orders().await.is_ok());
    }

    #[tokio::test]
    async fn poisoned_locks_are_recovered() {
        let src = std::sync::Arc::new(source());
        let poisoner = std::sync::Arc::clone(&src);
        let outcome = std::thread::spawn(move || {
            let _snapshot = poisoner.snapshot.write().unwrap();
            let _failures = poisoner.failures.write().unwrap();
            panic!("writer died mid-update");
        })
        .join();
        assert!(outcome.is_err());
        assert!(src.snapshot.is_poisoned());
        assert!(src.failures.is_poisoned());

        assert_eq!(src.orders().await.unwrap().len(), 2);

        src.replace(ReportSnapshot {
            orders: vec![Order::new(OrderId::new(9))],
            ..ReportSnapshot::default()
        });
        assert_eq!(src.count_orders().await.unwrap(), 1);

        src.fail_operation("orders", "disk on fire");
        assert!(src.orders().await.is_err());
        src.clear_failures();
        assert!(src.orders().await.is_ok());
    }

    #[tokio::test]
    async fn missing_order_is_none() {
        let src = source();
        assert!(src.order(OrderId::new(2)).await.unwrap().is_none());
        assert!(src.order(OrderId::new(3)).await.unwrap().is_some());
    }
}
