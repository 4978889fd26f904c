//! Read-only row models supplied by the storage collaborator.
//!
//! These are transient projections of the persisted entities; nothing in the
//! reporting layer mutates them. Every nullable column is an explicit `Option`,
//! and aggregation documents its zero-default where it reads one.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::id::{CategoryId, CustomerId, EmployeeId, OrderId, ProductId, SupplierId};

/// Order header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: Option<CustomerId>,
    pub employee_id: Option<EmployeeId>,
    pub order_date: Option<NaiveDate>,
    pub required_date: Option<NaiveDate>,
    pub shipped_date: Option<NaiveDate>,
    /// A ship date was stored, even when it could not be read as a day.
    #[serde(skip)]
    pub ship_recorded: bool,
    pub ship_via: Option<i64>,
    pub freight: Option<Decimal>,
    pub ship_name: Option<String>,
    pub ship_address: Option<String>,
    pub ship_city: Option<String>,
    pub ship_region: Option<String>,
    pub ship_postal_code: Option<String>,
    pub ship_country: Option<String>,
}

impl Order {
    /// An order with only its identifier set.
    pub fn new(id: OrderId) -> Self {
        Self {
            id,
            customer_id: None,
            employee_id: None,
            order_date: None,
            required_date: None,
            shipped_date: None,
            ship_recorded: false,
            ship_via: None,
            freight: None,
            ship_name: None,
            ship_address: None,
            ship_city: None,
            ship_region: None,
            ship_postal_code: None,
            ship_country: None,
        }
    }

    pub fn with_customer(mut self, customer_id: impl Into<CustomerId>) -> Self {
        self.customer_id = Some(customer_id.into());
        self
    }

    pub fn with_employee(mut self, employee_id: EmployeeId) -> Self {
        self.employee_id = Some(employee_id);
        self
    }

    pub fn ordered_on(mut self, date: NaiveDate) -> Self {
        self.order_date = Some(date);
        self
    }

    pub fn required_by(mut self, date: NaiveDate) -> Self {
        self.required_date = Some(date);
        self
    }

    pub fn shipped_on(mut self, date: NaiveDate) -> Self {
        self.shipped_date = Some(date);
        self.ship_recorded = true;
        self
    }

    /// Mark the order shipped on a day that could not be decoded.
    pub fn shipped_on_unknown_day(mut self) -> Self {
        self.shipped_date = None;
        self.ship_recorded = true;
        self
    }

    pub fn ship_to(mut self, region: Option<&str>, country: Option<&str>) -> Self {
        self.ship_region = region.map(str::to_string);
        self.ship_country = country.map(str::to_string);
        self
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Order line (order detail): one product on one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub order_id: OrderId,
    pub product_id: ProductId,
    /// Selling price per unit at the time of the order.
    pub unit_price: Decimal,
    pub quantity: i64,
    /// Fraction of the price taken off (`0` = none, `1` = full).
    pub discount: Decimal,
}

impl OrderLine {
    pub fn new(
        order_id: OrderId,
        product_id: ProductId,
        unit_price: Decimal,
        quantity: i64,
        discount: Decimal,
    ) -> Self {
        Self {
            order_id,
            product_id,
            unit_price,
            quantity,
            discount,
        }
    }
}

/// Catalog product with stock levels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub supplier_id: Option<SupplierId>,
    pub category_id: Option<CategoryId>,
    pub quantity_per_unit: Option<String>,
    /// Reference list price; doubles as the cost proxy for profitability.
    pub unit_price: Option<Decimal>,
    pub units_in_stock: Option<i64>,
    pub units_on_order: Option<i64>,
    pub reorder_level: Option<i64>,
    pub discontinued: bool,
}

impl Product {
    pub fn new(id: ProductId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            supplier_id: None,
            category_id: None,
            quantity_per_unit: None,
            unit_price: None,
            units_in_stock: None,
            units_on_order: None,
            reorder_level: None,
            discontinued: false,
        }
    }

    pub fn with_supplier(mut self, supplier_id: SupplierId) -> Self {
        self.supplier_id = Some(supplier_id);
        self
    }

    pub fn with_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_unit_price(mut self, unit_price: Decimal) -> Self {
        self.unit_price = Some(unit_price);
        self
    }

    pub fn with_stock(mut self, in_stock: i64, on_order: i64, reorder_level: i64) -> Self {
        self.units_in_stock = Some(in_stock);
        self.units_on_order = Some(on_order);
        self.reorder_level = Some(reorder_level);
        self
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub company_name: String,
    pub contact_name: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

impl Customer {
    pub fn new(id: impl Into<CustomerId>, company_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            company_name: company_name.into(),
            contact_name: None,
            city: None,
            country: None,
        }
    }
}

impl Entity for Customer {
    type Id = CustomerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    pub title: Option<String>,
}

impl Employee {
    pub fn new(id: EmployeeId, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            title: None,
        }
    }

    /// `first last`, the grouping label used by employee reports.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl Entity for Employee {
    type Id = EmployeeId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: SupplierId,
    pub company_name: String,
}

impl Supplier {
    pub fn new(id: SupplierId, company_name: impl Into<String>) -> Self {
        Self {
            id,
            company_name: company_name.into(),
        }
    }
}

impl Entity for Supplier {
    type Id = SupplierId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

impl Category {
    pub fn new(id: CategoryId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
