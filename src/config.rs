//! CLI configuration and argument parsing.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// AWS resource inventory and counting CLI tool.
///
/// Counts resources owned by the account (EC2, EBS, RDS, S3, Lambda, ECS,
/// Lightsail, IAM users, EKS nodes), optionally across every enabled region.
#[derive(Parser, Debug, Clone)]
#[command(name = "rescount")]
#[command(about = "AWS resource inventory and counting CLI tool")]
#[command(version)]
pub struct Args {
    /// AWS profile to use
    #[arg(long, env = "AWS_PROFILE")]
    pub profile: Option<String>,

    /// AWS region override (defaults to the profile/session region)
    #[arg(short, long, env = "AWS_REGION")]
    pub region: Option<String>,

    /// Count resources in every region the account is opted into
    #[arg(long, default_value = "false")]
    pub all_regions: bool,

    /// Source of truth for EKS node counts
    #[arg(long, value_enum, default_value = "desired")]
    pub node_source: NodeSource,

    /// Report output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: Format,

    /// Also write the rendered report to this file
    #[arg(long)]
    pub output_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", env = "RESCOUNT_LOG_LEVEL")]
    pub log_level: String,
}

/// Which source of truth to count EKS worker nodes from.
///
/// The two can diverge while autoscaling reconciles: `desired` is the
/// configured capacity target, `live` is what is actually registered with
/// each cluster's control plane.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeSource {
    /// Sum each node group's configured desired capacity
    Desired,
    /// List nodes registered with each cluster's control plane
    Live,
}

/// Report output format.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Table,
    Json,
}

/// Application configuration derived from CLI args.
#[derive(Debug, Clone)]
pub struct Config {
    pub profile: Option<String>,
    pub region: Option<String>,
    pub all_regions: bool,
    pub node_source: NodeSource,
    pub format: Format,
    pub output_file: Option<PathBuf>,
    pub log_level: String,
}

impl Config {
    /// Create config from CLI arguments.
    pub fn from_args(args: Args) -> Self {
        Self {
            profile: args.profile,
            region: args.region,
            all_regions: args.all_regions,
            node_source: args.node_source,
            format: args.format,
            output_file: args.output_file,
            log_level: args.log_level,
        }
    }
}
