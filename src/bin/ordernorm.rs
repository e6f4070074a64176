//! ordernorm CLI - normalize a flat order file and query the result

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use ordernorm::{
    queries, AnalyticQuery, ConfigOverrides, Database, Pipeline, PipelineConfig, PipelineError,
};

#[derive(Parser)]
#[command(name = "ordernorm")]
#[command(version, about = "Normalize tab-delimited order files into SQLite", long_about = None)]
struct Cli {
    /// Path to a YAML config file (default: ordernorm.yaml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the input file into the normalized tables
    Load {
        /// Tab-delimited input file
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// SQLite database file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Keep existing tables instead of dropping them first
        #[arg(long)]
        keep_existing: bool,

        /// Delete the database file before loading
        #[arg(long)]
        fresh: bool,
    },

    /// Parse the input file without touching the database
    Validate {
        /// Tab-delimited input file
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// List the query catalog
    Queries {
        /// Print the SQL text of each query
        #[arg(long)]
        sql: bool,
    },

    /// Run one catalog query and print its SQL and rows as JSON
    Query {
        /// Catalog name (see `ordernorm queries`)
        name: String,

        /// Customer "First Last" for customer-scoped queries
        #[arg(long)]
        customer: Option<String>,

        /// SQLite database file
        #[arg(short, long)]
        database: Option<PathBuf>,
    },
}

fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Load { input, database, keep_existing, fresh } => {
            let overrides = ConfigOverrides {
                input,
                database,
                keep_existing,
                delete_database: fresh,
            };
            load(cli.config, overrides)
        }
        Commands::Validate { input } => {
            let overrides = ConfigOverrides { input, ..Default::default() };
            validate(cli.config, overrides)
        }
        Commands::Queries { sql } => {
            list_queries(sql);
            Ok(())
        }
        Commands::Query { name, customer, database } => {
            let overrides = ConfigOverrides { database, ..Default::default() };
            run_query(cli.config, overrides, &name, customer.as_deref())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn load(config_file: Option<PathBuf>, overrides: ConfigOverrides) -> Result<(), PipelineError> {
    let config = PipelineConfig::resolve(config_file.as_deref(), overrides)?;
    let pipeline = Pipeline::from_config(&config)?;
    let report = pipeline.run(&config.input)?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn validate(config_file: Option<PathBuf>, overrides: ConfigOverrides) -> Result<(), PipelineError> {
    let config = PipelineConfig::resolve(config_file.as_deref(), overrides)?;
    let records = ordernorm::read_records(&config.input)?;
    let items: usize = records.iter().map(|r| r.items.len()).sum();

    println!(
        "{}: {} records, {} order items",
        config.input.display(),
        records.len(),
        items
    );
    Ok(())
}

fn list_queries(with_sql: bool) {
    for query in AnalyticQuery::ALL {
        let marker = if query.needs_customer() { " (--customer)" } else { "" };
        println!("{:<26} {}{}", query.name(), query.description(), marker);
        if with_sql {
            println!("{}", query.sql());
        }
    }
}

fn run_query(
    config_file: Option<PathBuf>,
    overrides: ConfigOverrides,
    name: &str,
    customer: Option<&str>,
) -> Result<(), PipelineError> {
    let query: AnalyticQuery = name.parse()?;
    let config = PipelineConfig::resolve(config_file.as_deref(), overrides)?;
    if !config.database.exists() {
        return Err(PipelineError::Config(format!(
            "Database {} does not exist; run `ordernorm load` first",
            config.database.display()
        )));
    }

    let db = Database::new_with_config(&config.database, config.pool.clone())?;
    let mut conn = db.get_connection()?;
    let output = queries::run_json(&mut conn, query, customer)?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
