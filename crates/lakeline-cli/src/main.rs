//! Lakeline - layer materialization tool

use anyhow::{bail, Context, Result};
use clap::Parser;
use lakeline_common::logging::{init_logging, LogConfig, LogLevel};
use lakeline_common::types::SchemaRegistry;
use lakeline_core::clock::{Clock, SystemClock};
use lakeline_core::discover::SchemaDiscovery;
use lakeline_core::pipeline::PipelineDriver;
use lakeline_core::provision::Provisioner;
use lakeline_core::query::QuerySubmitter;
use lakeline_core::register::ExternalTableRegistrar;
use lakeline_core::remote::{AthenaEngine, GlueCatalog, S3Store, S3TablesStore};
use lakeline_core::typemap::TypeMapper;
use lakeline_core::{sql, PipelineConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "lakeline")]
#[command(author, version, about = "Lakehouse layer materialization tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Parser, Debug)]
enum Command {
    /// Run the full pipeline: provision, register external tables,
    /// materialize managed tables
    Materialize {
        /// Pipeline configuration file (JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Schema registry file (JSON); omit to discover schemas from the
        /// staging bucket
        #[arg(short, long)]
        registry: Option<PathBuf>,

        /// Storage prefix to discover schemas under when no registry file
        /// is given
        #[arg(short, long, default_value = "")]
        prefix: String,
    },

    /// Discover table schemas from Parquet data and write a registry file
    Discover {
        /// Pipeline configuration file (JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Storage prefix to scan
        #[arg(short, long)]
        prefix: String,

        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the DDL the pipeline would run, without touching remote
    /// services
    Plan {
        /// Pipeline configuration file (JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Schema registry file (JSON)
        #[arg(short, long)]
        registry: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };
    let log_config = LogConfig::from_env()
        .unwrap_or_default()
        .with_level(log_level)
        .with_file_prefix("lakeline");
    init_logging(&log_config)?;

    match cli.command {
        Command::Materialize {
            config,
            registry,
            prefix,
        } => materialize(config, registry, prefix).await,
        Command::Discover {
            config,
            prefix,
            output,
        } => discover(config, prefix, output).await,
        Command::Plan { config, registry } => plan(config, registry),
    }
}

async fn load_sdk_config(region: &str) -> aws_config::SdkConfig {
    aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(region.to_string()))
        .load()
        .await
}

fn load_registry(path: &PathBuf) -> Result<SchemaRegistry> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading registry file {}", path.display()))?;
    Ok(SchemaRegistry::from_json(&raw)?)
}

async fn materialize(
    config_path: PathBuf,
    registry_path: Option<PathBuf>,
    prefix: String,
) -> Result<()> {
    let config = PipelineConfig::from_file(&config_path)?;
    let sdk_config = load_sdk_config(&config.region).await;

    let registry = match registry_path {
        Some(path) => load_registry(&path)?,
        None => {
            info!(bucket = %config.staging_bucket, prefix = %prefix,
                "No registry file given; discovering schemas");
            let store = Arc::new(S3Store::new(&sdk_config, &config.region));
            SchemaDiscovery::new(store)
                .discover(&config.staging_bucket, &prefix)
                .await?
        },
    };
    if registry.is_empty() {
        bail!("schema registry is empty; nothing to materialize");
    }

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let driver = PipelineDriver::new(
        Provisioner::new(Arc::new(S3TablesStore::new(&sdk_config))),
        ExternalTableRegistrar::new(Arc::new(GlueCatalog::new(&sdk_config)), TypeMapper::new()),
        QuerySubmitter::new(
            Arc::new(AthenaEngine::new(&sdk_config)),
            clock.clone(),
            config.output_location(),
            config.poll_interval(),
            config.max_wait(),
        ),
        clock,
        config.clone(),
    );

    let report = driver.run(&registry).await?;
    print!("{}", report);

    if !report.all_succeeded() {
        bail!("{} table(s) failed", report.failures());
    }
    Ok(())
}

async fn discover(config_path: PathBuf, prefix: String, output: Option<PathBuf>) -> Result<()> {
    let config = PipelineConfig::from_file(&config_path)?;
    let sdk_config = load_sdk_config(&config.region).await;

    let store = Arc::new(S3Store::new(&sdk_config, &config.region));
    let registry = SchemaDiscovery::new(store)
        .discover(&config.staging_bucket, &prefix)
        .await?;

    let json = registry.to_json()?;
    match output {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("writing registry to {}", path.display()))?;
            info!(path = %path.display(), tables = registry.len(), "Registry written");
        },
        None => println!("{}", json),
    }
    Ok(())
}

fn plan(config_path: PathBuf, registry_path: PathBuf) -> Result<()> {
    let config = PipelineConfig::from_file(&config_path)?;
    let registry = load_registry(&registry_path)?;
    let mapper = TypeMapper::new();
    let catalog = config.managed_catalog();

    for table in registry.tables() {
        println!(
            "-- External table for {}\n{}\n",
            table.table_name,
            sql::external_table_ddl(&config.source_database, table, &mapper)
        );
        println!(
            "-- Managed table for {}\n{};\n",
            table.table_name,
            sql::ctas_statement(
                &catalog,
                &config.namespace,
                config.target_table_name(&table.table_name),
                &config.source_database,
                table,
            )
        );
    }
    Ok(())
}
