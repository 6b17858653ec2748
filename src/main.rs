//! rescount - AWS resource inventory and counting CLI tool.
//!
//! Counts resources owned by the account across services (EC2, EBS, RDS,
//! S3, Lambda, ECS, Lightsail, IAM, EKS nodes), optionally across every
//! region the account is opted into, and prints a best-effort report:
//! partial failures are collected and shown, never fatal.

mod config;
mod count;
mod error;
#[cfg(test)]
mod mock;
mod monitor;
mod output;
mod pagination;
mod provider;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tracing::info;

use config::{Args, Config, Format};
use monitor::{ActivityMonitor, TerminalMonitor};
use output::{Report, ReportRow};
use provider::ServiceFactory;
use provider::aws::AwsServiceFactory;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::from_args(args);

    init_tracing(&config.log_level)?;

    info!("Starting rescount");

    let factory =
        AwsServiceFactory::new(config.profile.as_deref(), config.region.as_deref()).await?;
    let monitor = TerminalMonitor;

    run(&factory, &monitor, &config).await
}

/// Initialize tracing subscriber.
fn init_tracing(log_level: &str) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .map_err(|e| anyhow::anyhow!("Failed to initialize log filter: {}", e))?;

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    Ok(())
}

/// Drive every counter sequentially and render the final report.
async fn run(
    factory: &dyn ServiceFactory,
    monitor: &dyn ActivityMonitor,
    config: &Config,
) -> Result<()> {
    // Verify credentials up front; nothing can be counted without them.
    let identity = factory.identity();
    let account = match identity.account_id().await {
        Ok(account) => account,
        Err(err) => {
            monitor.check_error(Some(&err));
            return Err(err.into());
        }
    };
    println!("Account: {}", account.bold());

    let all = config.all_regions;
    let rows = vec![
        ReportRow::new(
            "EC2 instances",
            &count::count_instances(factory, monitor, all).await,
        ),
        ReportRow::new(
            "EBS volumes",
            &count::count_volumes(factory, monitor, all).await,
        ),
        ReportRow::new(
            "RDS instances",
            &count::count_databases(factory, monitor, all).await,
        ),
        ReportRow::new("S3 buckets", &count::count_buckets(factory, monitor).await),
        ReportRow::new(
            "Lambda functions",
            &count::count_functions(factory, monitor, all).await,
        ),
        ReportRow::new(
            "ECS task definitions",
            &count::count_task_definitions(factory, monitor, all).await,
        ),
        ReportRow::new(
            "Lightsail instances",
            &count::count_vms(factory, monitor, all).await,
        ),
        ReportRow::new("IAM users", &count::count_users(factory, monitor).await),
        ReportRow::new(
            "EKS nodes",
            &count::count_cluster_nodes(factory, monitor, all, config.node_source).await,
        ),
    ];

    let scope = if all {
        "all enabled regions".to_string()
    } else {
        factory.current_region().to_string()
    };
    let report = Report::new(account, scope, rows);

    let rendered = match config.format {
        Format::Table => report.render_table(),
        Format::Json => report.render_json()?,
    };

    println!();
    println!("{rendered}");

    if let Some(path) = &config.output_file {
        std::fs::write(path, &rendered)?;
        info!("Report written to {}", path.display());
    }

    Ok(())
}
