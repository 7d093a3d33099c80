use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use fyyur::app::{Clock, SystemClock};
use fyyur::config::Config;
use fyyur::logging::init_logging;
use fyyur::seed::seed_demo_data;
use fyyur::storage::SqliteStorage;
use fyyur::web::{app_router, AppState};

#[derive(Parser)]
#[command(name = "fyyur")]
#[command(about = "Venue, artist and show booking directory")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to a TOML config file (defaults to fyyur.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web server
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
        /// SQLite database file
        #[arg(long)]
        database: Option<PathBuf>,
    },
    /// Create the database file and its tables
    InitDb {
        #[arg(long)]
        database: Option<PathBuf>,
    },
    /// Load the demo venues, artists and shows into an empty database
    Seed {
        #[arg(long)]
        database: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let _guard = init_logging(&config.logging).context("Failed to initialize logging")?;

    match cli.command {
        Commands::Serve {
            host,
            port,
            database,
        } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(database) = database {
                config.database.path = database;
            }
            serve(config).await
        }
        Commands::InitDb { database } => {
            let path = database.unwrap_or(config.database.path);
            SqliteStorage::open(&path)
                .with_context(|| format!("Failed to initialize database at {}", path.display()))?;
            info!("Database ready at {}", path.display());
            Ok(())
        }
        Commands::Seed { database } => {
            let path = database.unwrap_or(config.database.path);
            let storage = SqliteStorage::open(&path)
                .with_context(|| format!("Failed to open database at {}", path.display()))?;
            let report = seed_demo_data(&storage, SystemClock.now()).await?;
            println!(
                "Seeded {} venues, {} artists and {} shows into {}",
                report.venues,
                report.artists,
                report.shows,
                path.display()
            );
            Ok(())
        }
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let storage = SqliteStorage::open(&config.database.path).with_context(|| {
        format!(
            "Failed to open database at {}",
            config.database.path.display()
        )
    })?;

    let state = AppState::new(Arc::new(storage), Arc::new(SystemClock));
    let app = app_router(state, &config.server.static_dir);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {bind_addr}"))?;

    info!(
        "Fyyur listening on http://{} (database {})",
        bind_addr,
        config.database.path.display()
    );
    axum::serve(listener, app).await?;
    Ok(())
}
