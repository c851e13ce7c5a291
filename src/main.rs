use capital_ledger::{config::Config, db::init_db, export, AppError, LedgerSession, Repository};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

/// Load the persisted ledger, log its summary and print the export table as CSV.
async fn run() -> anyhow::Result<()> {
    let config = Config::from_env().map_err(AppError::from)?;

    let pool = init_db(&config.database_path)
        .await
        .map_err(AppError::from)?;
    let store = Arc::new(Repository::new(pool));
    let session = LedgerSession::load(store, config.rules())
        .await
        .map_err(AppError::from)?;

    match session.summary() {
        Some(summary) => tracing::info!(
            base_capital = %summary.base_capital,
            final_balance = %summary.final_balance,
            total_result = %summary.total_result,
            won = summary.won_count,
            lost = summary.lost_count,
            operations = summary.total_operations,
            target_10 = %summary.target_10,
            target_20 = %summary.target_20,
            max_loss_floor = %summary.max_loss_floor,
            "Ledger summary"
        ),
        None => tracing::info!("No base capital set"),
    }

    let stdout = std::io::stdout();
    export::write_csv(
        session.engine().records(),
        &config.export_format(),
        stdout.lock(),
    )
    .map_err(AppError::from)?;
    Ok(())
}
