//! Per-report folds over joined row sets.
//!
//! Each function here defines one report: which rows join, what the grouping
//! key is, which calculator is applied, and how the output is ordered. Joins
//! are inner unless stated otherwise: a line whose order/product/customer is
//! missing from the fetched set does not contribute. Ties in a ranking are
//! always broken by the group key so the output is stable.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use rust_decimal::Decimal;

use northwind_core::{
    Category, CategoryId, Customer, CustomerId, Employee, EmployeeId, Order, OrderId, OrderLine,
    Product, ProductId, Supplier, SupplierId, YearMonth, index_by_id,
};

use crate::dto::{
    AverageOrderValue, EmployeePerformance, MonthlySales, OrderDetailLine, OrderDetails,
    RegionSales, SalesByCategory, SalesByEmployee, SalesSummary, TopCustomer, TopProduct,
    TopSupplier,
};
use crate::revenue::{line_net, sum_amounts};
use crate::status::OrderStatus;

/// Region label used when an order has neither a ship region nor a country.
pub const UNKNOWN_REGION: &str = "Unknown";

/// Net total per order, for known orders with at least one line.
pub fn order_totals(orders: &[Order], lines: &[OrderLine]) -> BTreeMap<OrderId, Decimal> {
    let known: BTreeSet<OrderId> = orders.iter().map(|o| o.id).collect();
    let mut totals: BTreeMap<OrderId, Decimal> = BTreeMap::new();
    for line in lines.iter().filter(|l| known.contains(&l.order_id)) {
        add(totals.entry(line.order_id).or_default(), line_net(line));
    }
    totals
}

fn add(total: &mut Decimal, amount: Decimal) {
    *total = total.saturating_add(amount);
}

fn add_units(total: &mut i64, units: i64) {
    *total = total.saturating_add(units);
}

fn mean(total: Decimal, count: u64) -> Decimal {
    if count == 0 {
        Decimal::ZERO
    } else {
        total / Decimal::from(count)
    }
}

/// Customers ranked by net purchases, first `limit`.
pub fn top_customers(
    customers: &[Customer],
    orders: &[Order],
    lines: &[OrderLine],
    limit: usize,
) -> Vec<TopCustomer> {
    let by_id = index_by_id(customers);
    let buyer: HashMap<OrderId, &CustomerId> = orders
        .iter()
        .filter_map(|o| o.customer_id.as_ref().map(|c| (o.id, c)))
        .collect();

    let mut totals: BTreeMap<&CustomerId, Decimal> = BTreeMap::new();
    for line in lines {
        let Some(customer) = buyer.get(&line.order_id) else {
            continue;
        };
        if by_id.contains_key(customer) {
            add(totals.entry(*customer).or_default(), line_net(line));
        }
    }

    let mut rows: Vec<TopCustomer> = totals
        .into_iter()
        .map(|(id, total)| TopCustomer {
            customer_id: id.clone(),
            company_name: by_id[id].company_name.clone(),
            total_purchase: total,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.total_purchase
            .cmp(&a.total_purchase)
            .then_with(|| a.customer_id.cmp(&b.customer_id))
    });
    rows.truncate(limit);
    rows
}

/// Products ranked by units sold, first `limit`.
pub fn top_products(products: &[Product], lines: &[OrderLine], limit: usize) -> Vec<TopProduct> {
    let by_id = index_by_id(products);

    let mut sold: BTreeMap<ProductId, i64> = BTreeMap::new();
    for line in lines.iter().filter(|l| by_id.contains_key(&l.product_id)) {
        add_units(sold.entry(line.product_id).or_insert(0), line.quantity);
    }

    let mut rows: Vec<TopProduct> = sold
        .into_iter()
        .map(|(id, total_sold)| TopProduct {
            product_id: id,
            product_name: by_id[&id].name.clone(),
            total_sold,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.total_sold
            .cmp(&a.total_sold)
            .then_with(|| a.product_id.cmp(&b.product_id))
    });
    rows.truncate(limit);
    rows
}

/// Net sales per category with at least one sold product.
pub fn sales_by_category(
    categories: &[Category],
    products: &[Product],
    lines: &[OrderLine],
) -> Vec<SalesByCategory> {
    let names: HashMap<CategoryId, &str> =
        categories.iter().map(|c| (c.id, c.name.as_str())).collect();
    let category_of: HashMap<ProductId, CategoryId> = products
        .iter()
        .filter_map(|p| p.category_id.map(|c| (p.id, c)))
        .collect();

    let mut totals: BTreeMap<CategoryId, Decimal> = BTreeMap::new();
    for line in lines {
        let Some(category) = category_of.get(&line.product_id) else {
            continue;
        };
        if names.contains_key(category) {
            add(totals.entry(*category).or_default(), line_net(line));
        }
    }

    let mut rows: Vec<SalesByCategory> = totals
        .into_iter()
        .map(|(id, total_sales)| SalesByCategory {
            category_id: id,
            category_name: names[&id].to_string(),
            total_sales,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.total_sales
            .cmp(&a.total_sales)
            .then_with(|| a.category_id.cmp(&b.category_id))
    });
    rows
}

/// Net sales per employee that handled at least one order line.
pub fn sales_by_employee(
    employees: &[Employee],
    orders: &[Order],
    lines: &[OrderLine],
) -> Vec<SalesByEmployee> {
    let by_id = index_by_id(employees);
    let handler: HashMap<OrderId, EmployeeId> = orders
        .iter()
        .filter_map(|o| o.employee_id.map(|e| (o.id, e)))
        .collect();

    let mut totals: BTreeMap<EmployeeId, Decimal> = BTreeMap::new();
    for line in lines {
        let Some(employee) = handler.get(&line.order_id) else {
            continue;
        };
        if by_id.contains_key(employee) {
            add(totals.entry(*employee).or_default(), line_net(line));
        }
    }

    let mut rows: Vec<SalesByEmployee> = totals
        .into_iter()
        .map(|(id, total_sales)| SalesByEmployee {
            employee_id: id,
            employee_name: by_id[&id].display_name(),
            total_sales,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.total_sales
            .cmp(&a.total_sales)
            .then_with(|| a.employee_id.cmp(&b.employee_id))
    });
    rows
}

/// Whole-book totals.
///
/// Revenue and order count cover orders with lines; the customer count and
/// the first/last dates cover every order.
pub fn sales_summary(orders: &[Order], lines: &[OrderLine]) -> SalesSummary {
    let totals = order_totals(orders, lines);
    let total_revenue = sum_amounts(totals.values().copied());
    let total_orders = totals.len() as u64;

    let customers: BTreeSet<&CustomerId> =
        orders.iter().filter_map(|o| o.customer_id.as_ref()).collect();
    let dates = orders.iter().filter_map(|o| o.order_date);

    SalesSummary {
        total_revenue,
        total_orders,
        total_customers: customers.len() as u64,
        average_order_value: mean(total_revenue, total_orders),
        first_order_date: dates.clone().min(),
        last_order_date: dates.max(),
    }
}

/// Net sales and order count per month, chronologically.
///
/// Orders without an order date are left out.
pub fn monthly_sales(orders: &[Order], lines: &[OrderLine]) -> Vec<MonthlySales> {
    let totals = order_totals(orders, lines);

    let mut months: BTreeMap<YearMonth, (Decimal, u64)> = BTreeMap::new();
    for order in orders {
        let (Some(date), Some(total)) = (order.order_date, totals.get(&order.id)) else {
            continue;
        };
        let entry = months.entry(YearMonth::of(date)).or_default();
        add(&mut entry.0, *total);
        entry.1 += 1;
    }

    months
        .into_iter()
        .map(|(year_month, (total_sales, orders))| MonthlySales {
            year_month,
            total_sales,
            orders,
        })
        .collect()
}

/// Suppliers ranked by net sales of their products, first `limit`.
pub fn top_suppliers(
    suppliers: &[Supplier],
    products: &[Product],
    lines: &[OrderLine],
    limit: usize,
) -> Vec<TopSupplier> {
    let names: HashMap<SupplierId, &str> = suppliers
        .iter()
        .map(|s| (s.id, s.company_name.as_str()))
        .collect();
    let supplier_of: HashMap<ProductId, SupplierId> = products
        .iter()
        .filter_map(|p| p.supplier_id.map(|s| (p.id, s)))
        .collect();

    let mut totals: BTreeMap<SupplierId, (Decimal, i64)> = BTreeMap::new();
    for line in lines {
        let Some(supplier) = supplier_of.get(&line.product_id) else {
            continue;
        };
        if names.contains_key(supplier) {
            let entry = totals.entry(*supplier).or_default();
            add(&mut entry.0, line_net(line));
            add_units(&mut entry.1, line.quantity);
        }
    }

    let mut rows: Vec<TopSupplier> = totals
        .into_iter()
        .map(|(id, (total_sales, total_qty))| TopSupplier {
            supplier_id: id,
            company_name: names[&id].to_string(),
            total_sales,
            total_qty,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.total_sales
            .cmp(&a.total_sales)
            .then_with(|| a.supplier_id.cmp(&b.supplier_id))
    });
    rows.truncate(limit);
    rows
}

/// Shipping region of an order: trimmed ship region, else trimmed ship
/// country, else [`UNKNOWN_REGION`]. Blank values count as absent.
pub fn region_of(order: &Order) -> String {
    let present = |field: &Option<String>| {
        field
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };
    present(&order.ship_region)
        .or_else(|| present(&order.ship_country))
        .unwrap_or_else(|| UNKNOWN_REGION.to_string())
}

/// Net sales and order count per shipping region.
pub fn region_sales(orders: &[Order], lines: &[OrderLine]) -> Vec<RegionSales> {
    let totals = order_totals(orders, lines);

    let mut regions: BTreeMap<String, (Decimal, u64)> = BTreeMap::new();
    for order in orders {
        let Some(total) = totals.get(&order.id) else {
            continue;
        };
        let entry = regions.entry(region_of(order)).or_default();
        add(&mut entry.0, *total);
        entry.1 += 1;
    }

    let mut rows: Vec<RegionSales> = regions
        .into_iter()
        .map(|(region, (total_sales, orders))| RegionSales {
            region,
            total_sales,
            orders,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.total_sales
            .cmp(&a.total_sales)
            .then_with(|| a.region.cmp(&b.region))
    });
    rows
}

/// Sales metrics for every employee, including those with no orders.
///
/// Employees without sales report zero across the board.
pub fn employee_performance(
    employees: &[Employee],
    orders: &[Order],
    lines: &[OrderLine],
) -> Vec<EmployeePerformance> {
    #[derive(Default)]
    struct Tally<'a> {
        total: Decimal,
        orders: u64,
        customers: BTreeSet<&'a CustomerId>,
    }

    let totals = order_totals(orders, lines);
    let mut tallies: HashMap<EmployeeId, Tally<'_>> = HashMap::new();
    for order in orders {
        let (Some(employee), Some(total)) = (order.employee_id, totals.get(&order.id)) else {
            continue;
        };
        let tally = tallies.entry(employee).or_default();
        add(&mut tally.total, *total);
        tally.orders += 1;
        if let Some(customer) = order.customer_id.as_ref() {
            tally.customers.insert(customer);
        }
    }

    let mut rows: Vec<EmployeePerformance> = employees
        .iter()
        .map(|e| {
            let tally = tallies.remove(&e.id).unwrap_or_default();
            EmployeePerformance {
                employee_id: e.id,
                employee_name: e.display_name(),
                total_sales: tally.total,
                orders_handled: tally.orders,
                avg_order_value: mean(tally.total, tally.orders),
                unique_customers: tally.customers.len() as u64,
            }
        })
        .collect();
    rows.sort_by(|a, b| {
        b.total_sales
            .cmp(&a.total_sales)
            .then_with(|| a.employee_id.cmp(&b.employee_id))
    });
    rows
}

/// Mean net value of orders with at least one line; zero when there are none.
pub fn average_order_value(orders: &[Order], lines: &[OrderLine]) -> AverageOrderValue {
    let totals = order_totals(orders, lines);
    let revenue = sum_amounts(totals.values().copied());
    AverageOrderValue {
        average: mean(revenue, totals.len() as u64),
    }
}

/// An order with its priced lines, ordered by product id.
///
/// Lines belonging to other orders are ignored.
pub fn order_details(order: Order, lines: &[OrderLine]) -> OrderDetails {
    let mut priced: Vec<OrderDetailLine> = lines
        .iter()
        .filter(|l| l.order_id == order.id)
        .map(|l| OrderDetailLine {
            order_id: l.order_id,
            product_id: l.product_id,
            unit_price: l.unit_price,
            quantity: l.quantity,
            discount: l.discount,
            net_amount: line_net(l),
        })
        .collect();
    priced.sort_by_key(|l| l.product_id);

    let total = sum_amounts(priced.iter().map(|l| l.net_amount));
    OrderDetails {
        status: OrderStatus::of(&order),
        order,
        lines: priced,
        total,
    }
}
