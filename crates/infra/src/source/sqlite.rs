//! SQLite-backed source over the Northwind schema.
//!
//! Tables are read as-is: `Orders`, `OrderDetails`, `Products`, `Customers`,
//! `Employees`, `Suppliers`, `Categories`. The schema stores money as REAL and
//! dates as free-form text, so each row goes through a small decoding step:
//!
//! - REAL columns become `Decimal` via the shortest round-tripping form; a
//!   non-finite value is a fetch failure.
//! - Dates are normalised by SQLite's `date()`, which reads ISO text with or
//!   without a time part as well as Julian day numbers. A stored value that
//!   `date()` rejects is treated as an unknown day and logged; for the ship
//!   date the order still counts as shipped.
//! - Columns are `CAST` in SQL so that loosely typed values (e.g. an integer
//!   `0` in `Discount`) decode uniformly.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use tracing::instrument;

use northwind_core::{
    Category, CategoryId, Customer, CustomerId, Employee, EmployeeId, Order, OrderId, OrderLine,
    Product, ProductId, ReportError, ReportResult, Supplier, SupplierId,
};

use super::ReportSource;

const ORDER_COLUMNS: &str = r#"
    OrderID,
    CustomerID,
    EmployeeID,
    date(OrderDate) AS OrderDate,
    date(RequiredDate) AS RequiredDate,
    date(ShippedDate) AS ShippedDate,
    NULLIF(TRIM(CAST(OrderDate AS TEXT)), '') AS RawOrderDate,
    NULLIF(TRIM(CAST(RequiredDate AS TEXT)), '') AS RawRequiredDate,
    NULLIF(TRIM(CAST(ShippedDate AS TEXT)), '') AS RawShippedDate,
    ShipVia,
    CAST(Freight AS REAL) AS Freight,
    ShipName,
    ShipAddress,
    ShipCity,
    ShipRegion,
    ShipPostalCode,
    ShipCountry
"#;

const LINE_COLUMNS: &str = r#"
    OrderID,
    ProductID,
    CAST(COALESCE(UnitPrice, 0) AS REAL) AS UnitPrice,
    CAST(COALESCE(Quantity, 0) AS INTEGER) AS Quantity,
    CAST(COALESCE(Discount, 0) AS REAL) AS Discount
"#;

const PRODUCT_COLUMNS: &str = r#"
    ProductID,
    COALESCE(ProductName, '') AS ProductName,
    SupplierID,
    CategoryID,
    QuantityPerUnit,
    CAST(UnitPrice AS REAL) AS UnitPrice,
    CAST(UnitsInStock AS INTEGER) AS UnitsInStock,
    CAST(UnitsOnOrder AS INTEGER) AS UnitsOnOrder,
    CAST(ReorderLevel AS INTEGER) AS ReorderLevel,
    CAST(COALESCE(Discontinued, 0) AS INTEGER) AS Discontinued
"#;

/// Read-only source backed by a `sqlx` SQLite pool.
#[derive(Debug, Clone)]
pub struct SqliteReportSource {
    pool: SqlitePool,
}

impl SqliteReportSource {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open a pool against `url` (e.g. `sqlite://northwind.db?mode=ro`).
    pub async fn connect(url: &str) -> ReportResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect(url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    #[instrument(skip(self, sql, decode), fields(rows = tracing::field::Empty), err)]
    async fn fetch_rows<T>(
        &self,
        operation: &'static str,
        sql: &str,
        binds: &[i64],
        decode: fn(&'static str, &SqliteRow) -> ReportResult<T>,
    ) -> ReportResult<Vec<T>> {
        let mut query = sqlx::query(sql);
        for value in binds {
            query = query.bind(*value);
        }
        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(operation, e))?;

        tracing::Span::current().record("rows", rows.len());
        rows.iter().map(|row| decode(operation, row)).collect()
    }

    async fn count(&self, operation: &'static str, table: &str) -> ReportResult<u64> {
        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(operation, e))?;
        Ok(u64::try_from(total).unwrap_or(0))
    }
}

#[async_trait::async_trait]
impl ReportSource for SqliteReportSource {
    async fn orders(&self) -> ReportResult<Vec<Order>> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM Orders ORDER BY OrderID ASC");
        self.fetch_rows("orders", &sql, &[], decode_order).await
    }

    async fn order_lines(&self) -> ReportResult<Vec<OrderLine>> {
        let sql = format!("SELECT {LINE_COLUMNS} FROM OrderDetails ORDER BY OrderID, ProductID");
        self.fetch_rows("order_lines", &sql, &[], decode_line).await
    }

    async fn products(&self) -> ReportResult<Vec<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM Products ORDER BY ProductID ASC");
        self.fetch_rows("products", &sql, &[], decode_product).await
    }

    async fn customers(&self) -> ReportResult<Vec<Customer>> {
        let sql = r#"
            SELECT CustomerID, COALESCE(CompanyName, '') AS CompanyName, ContactName, City, Country
            FROM Customers
            ORDER BY CustomerID ASC
        "#;
        self.fetch_rows("customers", sql, &[], decode_customer).await
    }

    async fn employees(&self) -> ReportResult<Vec<Employee>> {
        let sql = r#"
            SELECT EmployeeID,
                   COALESCE(FirstName, '') AS FirstName,
                   COALESCE(LastName, '') AS LastName,
                   Title
            FROM Employees
            ORDER BY EmployeeID ASC
        "#;
        self.fetch_rows("employees", sql, &[], decode_employee).await
    }

    async fn suppliers(&self) -> ReportResult<Vec<Supplier>> {
        let sql = r#"
            SELECT SupplierID, COALESCE(CompanyName, '') AS CompanyName
            FROM Suppliers
            ORDER BY SupplierID ASC
        "#;
        self.fetch_rows("suppliers", sql, &[], |op, row| {
            Ok(Supplier::new(
                SupplierId::new(get(op, row, "SupplierID")?),
                get::<String>(op, row, "CompanyName")?,
            ))
        })
        .await
    }

    async fn categories(&self) -> ReportResult<Vec<Category>> {
        let sql = r#"
            SELECT CategoryID, COALESCE(CategoryName, '') AS CategoryName
            FROM Categories
            ORDER BY CategoryID ASC
        "#;
        self.fetch_rows("categories", sql, &[], |op, row| {
            Ok(Category::new(
                CategoryId::new(get(op, row, "CategoryID")?),
                get::<String>(op, row, "CategoryName")?,
            ))
        })
        .await
    }

    async fn order(&self, id: OrderId) -> ReportResult<Option<Order>> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM Orders WHERE OrderID = ?");
        let mut rows = self.fetch_rows("order", &sql, &[id.get()], decode_order).await?;
        Ok(rows.pop())
    }

    async fn lines_for_order(&self, id: OrderId) -> ReportResult<Vec<OrderLine>> {
        let sql = format!(
            "SELECT {LINE_COLUMNS} FROM OrderDetails WHERE OrderID = ? ORDER BY ProductID ASC"
        );
        self.fetch_rows("lines_for_order", &sql, &[id.get()], decode_line)
            .await
    }

    async fn count_orders(&self) -> ReportResult<u64> {
        self.count("count_orders", "Orders").await
    }

    async fn orders_page(&self, offset: u64, limit: u64) -> ReportResult<Vec<Order>> {
        let sql =
            format!("SELECT {ORDER_COLUMNS} FROM Orders ORDER BY OrderID ASC LIMIT ? OFFSET ?");
        self.fetch_rows("orders_page", &sql, &[clamp(limit), clamp(offset)], decode_order)
            .await
    }

    async fn count_products(&self) -> ReportResult<u64> {
        self.count("count_products", "Products").await
    }

    async fn products_page(&self, offset: u64, limit: u64) -> ReportResult<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM Products ORDER BY ProductID ASC LIMIT ? OFFSET ?"
        );
        self.fetch_rows(
            "products_page",
            &sql,
            &[clamp(limit), clamp(offset)],
            decode_product,
        )
        .await
    }
}

fn clamp(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn get<'r, T>(operation: &'static str, row: &'r SqliteRow, column: &str) -> ReportResult<T>
where
    T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get(column).map_err(|e| map_sqlx_error(operation, e))
}

fn decimal(operation: &'static str, value: Option<f64>) -> ReportResult<Option<Decimal>> {
    value
        .map(|v| {
            Decimal::from_f64(v)
                .ok_or_else(|| ReportError::fetch(operation, format!("non-finite amount {v}")))
        })
        .transpose()
}

/// A column read both through `date()` and as its raw text.
struct StoredDate {
    day: Option<NaiveDate>,
    recorded: bool,
}

fn stored_date(
    operation: &'static str,
    row: &SqliteRow,
    column: &str,
) -> ReportResult<StoredDate> {
    let normalised: Option<String> = get(operation, row, column)?;
    let raw: Option<String> = get(operation, row, &format!("Raw{column}"))?;
    Ok(StoredDate {
        day: parse_date(operation, column, normalised, raw.as_deref()),
        recorded: raw.is_some(),
    })
}

/// Parse the `YYYY-MM-DD` produced by `date()`; warn when a stored value was
/// present but could not be normalised.
fn parse_date(
    operation: &'static str,
    column: &str,
    normalised: Option<String>,
    raw: Option<&str>,
) -> Option<NaiveDate> {
    let parsed = normalised
        .as_deref()
        .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok());
    if let (None, Some(raw)) = (parsed, raw) {
        tracing::warn!(operation, column, value = %raw, "unreadable date treated as unknown");
    }
    parsed
}

fn decode_order(op: &'static str, row: &SqliteRow) -> ReportResult<Order> {
    let shipped = stored_date(op, row, "ShippedDate")?;
    Ok(Order {
        id: OrderId::new(get(op, row, "OrderID")?),
        customer_id: get::<Option<String>>(op, row, "CustomerID")?.map(CustomerId::new),
        employee_id: get::<Option<i64>>(op, row, "EmployeeID")?.map(EmployeeId::new),
        order_date: stored_date(op, row, "OrderDate")?.day,
        required_date: stored_date(op, row, "RequiredDate")?.day,
        shipped_date: shipped.day,
        ship_recorded: shipped.recorded,
        ship_via: get(op, row, "ShipVia")?,
        freight: decimal(op, get(op, row, "Freight")?)?,
        ship_name: get(op, row, "ShipName")?,
        ship_address: get(op, row, "ShipAddress")?,
        ship_city: get(op, row, "ShipCity")?,
        ship_region: get(op, row, "ShipRegion")?,
        ship_postal_code: get(op, row, "ShipPostalCode")?,
        ship_country: get(op, row, "ShipCountry")?,
    })
}

fn decode_line(op: &'static str, row: &SqliteRow) -> ReportResult<OrderLine> {
    Ok(OrderLine::new(
        OrderId::new(get(op, row, "OrderID")?),
        ProductId::new(get(op, row, "ProductID")?),
        decimal(op, Some(get(op, row, "UnitPrice")?))?.unwrap_or_default(),
        get(op, row, "Quantity")?,
        decimal(op, Some(get(op, row, "Discount")?))?.unwrap_or_default(),
    ))
}

fn decode_product(op: &'static str, row: &SqliteRow) -> ReportResult<Product> {
    Ok(Product {
        id: ProductId::new(get(op, row, "ProductID")?),
        name: get(op, row, "ProductName")?,
        supplier_id: get::<Option<i64>>(op, row, "SupplierID")?.map(SupplierId::new),
        category_id: get::<Option<i64>>(op, row, "CategoryID")?.map(CategoryId::new),
        quantity_per_unit: get(op, row, "QuantityPerUnit")?,
        unit_price: decimal(op, get(op, row, "UnitPrice")?)?,
        units_in_stock: get(op, row, "UnitsInStock")?,
        units_on_order: get(op, row, "UnitsOnOrder")?,
        reorder_level: get(op, row, "ReorderLevel")?,
        discontinued: get::<i64>(op, row, "Discontinued")? != 0,
    })
}

fn decode_customer(op: &'static str, row: &SqliteRow) -> ReportResult<Customer> {
    Ok(Customer {
        id: CustomerId::new(get::<String>(op, row, "CustomerID")?),
        company_name: get(op, row, "CompanyName")?,
        contact_name: get(op, row, "ContactName")?,
        city: get(op, row, "City")?,
        country: get(op, row, "Country")?,
    })
}

fn decode_employee(op: &'static str, row: &SqliteRow) -> ReportResult<Employee> {
    Ok(Employee {
        id: EmployeeId::new(get(op, row, "EmployeeID")?),
        first_name: get(op, row, "FirstName")?,
        last_name: get(op, row, "LastName")?,
        title: get(op, row, "Title")?,
    })
}

/// Translate a driver error into a `FetchFailure` attributed to `operation`.
fn map_sqlx_error(operation: &'static str, err: sqlx::Error) -> ReportError {
    match err {
        sqlx::Error::Database(db_err) => ReportError::fetch(
            operation,
            format!("database error: {}", db_err.message()),
        ),
        sqlx::Error::PoolTimedOut => ReportError::fetch(operation, "connection pool timed out"),
        sqlx::Error::PoolClosed => ReportError::fetch(operation, "connection pool closed"),
        sqlx::Error::ColumnNotFound(column) => {
            ReportError::fetch(operation, format!("missing column {column}"))
        }
        sqlx::Error::ColumnDecode { index, source } => {
            ReportError::fetch(operation, format!("cannot decode column {index}: {source}"))
        }
        other => ReportError::fetch(operation, format!("sqlx error: {other}")),
    }
}
