use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use chrono::{Days, NaiveDate};
use northwind_core::{
    Customer, Employee, EmployeeId, Order, OrderId, OrderLine, Product, ProductId,
};
use northwind_reporting::aggregate::{employee_performance, monthly_sales, region_sales};
use northwind_reporting::{customer_growth, product_profitability};
use rust_decimal::Decimal;

const CUSTOMERS: i64 = 90;
const EMPLOYEES: i64 = 9;
const PRODUCTS: i64 = 77;
const LINES_PER_ORDER: i64 = 3;

struct Dataset {
    employees: Vec<Employee>,
    products: Vec<Product>,
    orders: Vec<Order>,
    lines: Vec<OrderLine>,
}

/// Deterministic synthetic order book with `orders` orders spread over a few years.
fn dataset(orders: i64) -> Dataset {
    let start = NaiveDate::from_ymd_opt(1996, 7, 4).unwrap_or_default();
    let customers: Vec<Customer> = (0..CUSTOMERS)
        .map(|i| Customer::new(format!("C{i:04}"), format!("Customer {i}")))
        .collect();
    let employees = (1..=EMPLOYEES)
        .map(|i| Employee::new(EmployeeId::new(i), "First", format!("Last{i}")))
        .collect();
    let products = (1..=PRODUCTS)
        .map(|i| {
            Product::new(ProductId::new(i), format!("Product {i}"))
                .with_unit_price(Decimal::new(1000 + i * 37, 2))
        })
        .collect();

    let mut book = Vec::with_capacity(orders as usize);
    let mut lines = Vec::with_capacity((orders * LINES_PER_ORDER) as usize);
    for n in 0..orders {
        let id = OrderId::new(10_000 + n);
        let customer = &customers[(n * 7 % CUSTOMERS) as usize];
        let ordered = start.checked_add_days(Days::new((n / 4) as u64)).unwrap_or(start);
        book.push(
            Order::new(id)
                .with_customer(customer.id.clone())
                .with_employee(EmployeeId::new(n % EMPLOYEES + 1))
                .ordered_on(ordered)
                .ship_to(None, Some(["Germany", "USA", "Brazil", "France"][(n % 4) as usize])),
        );
        for k in 0..LINES_PER_ORDER {
            let product = (n * 13 + k * 5) % PRODUCTS + 1;
            lines.push(OrderLine::new(
                id,
                ProductId::new(product),
                Decimal::new(900 + product * 41, 2),
                k + 1 + n % 20,
                Decimal::new(n % 4 * 5, 2),
            ));
        }
    }

    Dataset {
        employees,
        products,
        orders: book,
        lines,
    }
}

fn bench_cohort_growth(c: &mut Criterion) {
    let mut group = c.benchmark_group("customer_growth");
    for size in [1_000_i64, 10_000, 50_000] {
        let data = dataset(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| customer_growth(black_box(&data.orders)));
        });
    }
    group.finish();
}

fn bench_profitability(c: &mut Criterion) {
    let mut group = c.benchmark_group("product_profitability");
    for size in [1_000_i64, 10_000, 50_000] {
        let data = dataset(size);
        group.throughput(Throughput::Elements(data.lines.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| product_profitability(black_box(&data.products), black_box(&data.lines)));
        });
    }
    group.finish();
}

fn bench_order_folds(c: &mut Criterion) {
    let data = dataset(10_000);
    let mut group = c.benchmark_group("order_folds");
    group.throughput(Throughput::Elements(data.lines.len() as u64));

    group.bench_function("monthly_sales", |b| {
        b.iter(|| monthly_sales(black_box(&data.orders), black_box(&data.lines)));
    });
    group.bench_function("region_sales", |b| {
        b.iter(|| region_sales(black_box(&data.orders), black_box(&data.lines)));
    });
    group.bench_function("employee_performance", |b| {
        b.iter(|| {
            employee_performance(
                black_box(&data.employees),
                black_box(&data.orders),
                black_box(&data.lines),
            )
        });
    });

    group.finish();
}

criterion_group!(benches, bench_cohort_growth, bench_profitability, bench_order_folds);
criterion_main!(benches);
