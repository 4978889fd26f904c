use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use northwind_core::OrderId;
use northwind_infra::{ReportService, ReportingConfig, SqliteReportSource};
use northwind_reporting::{PageRequest, ReportKind};

/// Business reports over a Northwind SQLite database.
///
/// Reads `DB_PATH`, `REPORT_TOP_N` and `REPORT_TIMEOUT_SECS` from the
/// environment. Results are printed to stdout as pretty JSON.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute one report (e.g. `customer-growth`, `product-profitability`).
    Report {
        kind: ReportKind,
    },
    /// List orders by ascending id, one page at a time.
    Orders(PageArgs),
    /// List products by ascending id, one page at a time.
    Products(PageArgs),
    /// Show one order with its priced lines.
    Order {
        id: i64,
    },
    /// Print the names of all available reports.
    Kinds,
}

#[derive(Args)]
struct PageArgs {
    /// Page number; invalid or non-positive values mean 1.
    #[arg(long, allow_hyphen_values = true)]
    page: Option<String>,
    /// Items per page; invalid or non-positive values mean 10.
    #[arg(long, allow_hyphen_values = true)]
    page_size: Option<String>,
}

impl PageArgs {
    fn request(&self) -> PageRequest {
        PageRequest::parse(self.page.as_deref(), self.page_size.as_deref())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    northwind_observability::init();

    let cli = Cli::parse();
    if let Command::Kinds = cli.command {
        for kind in ReportKind::ALL {
            println!("{kind}");
        }
        return Ok(());
    }

    let config = ReportingConfig::from_env().context("invalid reporting configuration")?;
    let source = SqliteReportSource::connect(&config.database_url())
        .await
        .with_context(|| format!("failed to open database at {}", config.db_path))?;
    let service = ReportService::from_config(source, &config);

    let cancel = CancellationToken::new();
    spawn_cancel_triggers(cancel.clone(), config.timeout);

    let output = run(&service, cli.command, &cancel).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn run(
    service: &ReportService<SqliteReportSource>,
    command: Command,
    cancel: &CancellationToken,
) -> anyhow::Result<serde_json::Value> {
    let value = match command {
        Command::Report { kind } => service
            .render(kind, cancel)
            .await
            .with_context(|| format!("report {kind} failed"))?,
        Command::Orders(args) => json(service.orders_page(args.request(), cancel).await?)?,
        Command::Products(args) => json(service.products_page(args.request(), cancel).await?)?,
        Command::Order { id } => json(service.order_details(OrderId::new(id), cancel).await?)?,
        Command::Kinds => serde_json::Value::Null,
    };
    Ok(value)
}

fn json<T: Serialize>(value: T) -> anyhow::Result<serde_json::Value> {
    Ok(serde_json::to_value(value)?)
}

/// Cancel on Ctrl-C, and after `timeout` when one is configured.
fn spawn_cancel_triggers(cancel: CancellationToken, timeout: Option<Duration>) {
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        tokio::select! {
            _ = on_signal.cancelled() => {}
            result = tokio::signal::ctrl_c() => {
                if result.is_ok() {
                    tracing::warn!("interrupt received; cancelling");
                    on_signal.cancel();
                }
            }
        }
    });

    if let Some(timeout) = timeout {
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep(timeout) => {
                    tracing::warn!(timeout_secs = timeout.as_secs(), "report timed out; cancelling");
                    cancel.cancel();
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_report_kind() {
        let cli = Cli::try_parse_from(["northwind-report", "report", "customer_growth"]).unwrap();
        assert!(matches!(cli.command, Command::Report { kind: ReportKind::CustomerGrowth }));
        assert!(Cli::try_parse_from(["northwind-report", "report", "nope"]).is_err());
    }

    #[test]
    fn lenient_page_arguments() {
        let cli = Cli::try_parse_from([
            "northwind-report",
            "orders",
            "--page",
            "-3",
            "--page-size",
            "25",
        ])
        .unwrap();
        let Command::Orders(args) = cli.command else {
            panic!("expected orders");
        };
        assert_eq!(args.request(), PageRequest::new(Some(1), Some(25)));
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
