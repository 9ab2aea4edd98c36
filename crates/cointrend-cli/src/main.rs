mod ingest;
mod report;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "cointrend")]
#[command(about = "Crypto news sentiment tracker")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search, analyse, and store the latest news for a coin
    Ingest {
        /// Coin symbol or name (e.g. btc, ethereum)
        #[arg(value_parser = parse_coin)]
        coin: String,
        /// Number of search results to process
        #[arg(long, short, default_value_t = 3, value_parser = clap::value_parser!(u16).range(1..=20))]
        count: u16,
        /// Analyse into an in-memory store instead of the database
        #[arg(long)]
        dry_run: bool,
    },
    /// Show stored analyses and the overall sentiment distribution for a coin
    Report {
        #[arg(value_parser = parse_coin)]
        coin: String,
        /// Number of recent articles to show
        #[arg(long, short, default_value_t = 5, value_parser = clap::value_parser!(u16).range(1..))]
        limit: u16,
    },
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check the database connection
    Ping,
    /// Apply pending migrations
    Migrate,
}

fn parse_coin(raw: &str) -> Result<String, String> {
    let coin = raw.trim();
    if coin.is_empty() {
        return Err("coin must not be empty".to_string());
    }
    Ok(coin.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = cointrend_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(?config, "configuration loaded");

    match cli.command {
        Commands::Ingest {
            coin,
            count,
            dry_run,
        } => {
            // Credentials are checked before any connection is opened.
            let credentials = config.require_credentials()?;
            let count = usize::from(count);
            if dry_run {
                ingest::run_ingest_dry_run(&config, &credentials, &coin, count).await?;
            } else {
                let pool = connect(&config).await?;
                cointrend_db::run_migrations(&pool).await?;
                ingest::run_ingest(&pool, &config, &credentials, &coin, count).await?;
            }
        }
        Commands::Report { coin, limit } => {
            let pool = connect(&config).await?;
            report::run_report(&pool, &coin, usize::from(limit)).await?;
        }
        Commands::Db { command } => {
            let pool = connect(&config).await?;
            match command {
                DbCommands::Ping => {
                    cointrend_db::ping(&pool).await?;
                    println!("database connection ok");
                }
                DbCommands::Migrate => {
                    let applied = cointrend_db::run_migrations(&pool).await?;
                    println!("applied {applied} migration(s)");
                }
            }
        }
    }

    Ok(())
}

async fn connect(config: &cointrend_core::AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let pool_config = cointrend_db::PoolConfig::from_app_config(config);
    Ok(cointrend_db::connect_pool(&config.database_url, pool_config).await?)
}
