mod analyze;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "placepulse")]
#[command(about = "Place review sentiment analysis")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Analyze a place by name or map URL (served from cache when already analysed)
    Analyze {
        /// Place name, or a map URL containing `/place/<name>/`
        input: String,
        /// Print the full record as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// List stored analyses, most recent first
    List {
        /// Maximum number of analyses to show (defaults to `PLACEPULSE_LIST_LIMIT`)
        #[arg(long)]
        limit: Option<i64>,
    },
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check database connectivity
    Ping,
    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("placepulse: run `placepulse --help` for usage");
        return Ok(());
    };

    let config = placepulse_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let pool_config = placepulse_db::PoolConfig::from_app_config(&config);
    let pool = placepulse_db::connect_pool(&config.database_url, pool_config).await?;
    tracing::debug!(?command, env = %config.env, "running command");

    match command {
        Commands::Analyze { input, json } => {
            placepulse_db::run_migrations(&pool).await?;
            analyze::run_analyze(pool, &config, &input, json).await
        }
        Commands::List { limit } => {
            analyze::run_list(pool, &config, limit.unwrap_or(config.list_limit)).await
        }
        Commands::Db {
            command: DbCommands::Ping,
        } => {
            placepulse_db::health_check(&pool).await?;
            println!("database ok");
            Ok(())
        }
        Commands::Db {
            command: DbCommands::Migrate,
        } => {
            let applied = placepulse_db::run_migrations(&pool).await?;
            println!("applied {applied} migration(s)");
            Ok(())
        }
    }
}
