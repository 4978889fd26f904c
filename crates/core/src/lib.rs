//! `northwind-core`: reporting foundation building blocks.
//!
//! This crate contains the **read-only** row models the reporting layer folds
//! over, their identifiers, and the error taxonomy shared by every report
//! (no IO, no storage concerns).

pub mod entity;
pub mod error;
pub mod id;
pub mod model;
pub mod value_object;

pub use entity::{Entity, index_by_id};
pub use error::{ReportError, ReportResult};
pub use id::{CategoryId, CustomerId, EmployeeId, OrderId, ProductId, SupplierId};
pub use model::{Category, Customer, Employee, Order, OrderLine, Product, Supplier};
pub use value_object::{ParseYearMonthError, YearMonth};
