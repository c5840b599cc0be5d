use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use dialoguer::Input;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use publisher_sales::domain::MatchCase;
use publisher_sales::infrastructure::SeaOrmSalesRepository;
use publisher_sales::{config, db, services};

#[derive(Parser)]
#[command(name = "publisher-sales")]
#[command(about = "Load the bookstore fixture and list the sales of a publisher's books")]
#[command(version)]
struct Cli {
    /// Database URL, overrides DATABASE_URL and the DRIVER/LOGIN/... variables
    #[arg(long)]
    database_url: Option<String>,

    /// Fixture to load (default: FIXTURE_PATH or fixtures/tests_data.json)
    #[arg(short, long)]
    fixture: Option<PathBuf>,

    /// Query the existing tables instead of recreating and reloading them
    #[arg(long)]
    no_load: bool,

    /// Publisher id or part of its name; asked for interactively when omitted
    #[arg(short, long)]
    publisher: Option<String>,

    /// Match publisher names ignoring case
    #[arg(long)]
    ignore_case: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "publisher_sales=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = config::Config::from_env();
    if let Some(database_url) = cli.database_url {
        config.database_url = database_url;
    }
    if let Some(fixture) = cli.fixture {
        config.fixture_path = fixture;
    }

    tracing::info!("Connecting to {}", config.redacted_database_url());
    let db = db::init_db(&config.database_url)
        .await
        .context("Failed to initialize database")?;

    if !cli.no_load {
        db::reset_schema(&db)
            .await
            .context("Failed to recreate tables")?;
        services::load_fixture_file(&db, &config.fixture_path).await?;
    }

    let identifier = match cli.publisher {
        Some(identifier) => identifier,
        None => Input::<String>::new()
            .with_prompt("Publisher name or id")
            .allow_empty(true)
            .interact_text()?,
    };

    let case = if cli.ignore_case {
        MatchCase::Insensitive
    } else {
        MatchCase::Sensitive
    };

    let repo = SeaOrmSalesRepository::new(db);
    let report = services::sales_by_publisher(&repo, identifier.trim(), case).await?;

    print!("{}", report);

    Ok(())
}
