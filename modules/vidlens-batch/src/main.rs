use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use vidlens_batch::{RunLog, RunOptions, Runner};
use vidlens_common::{Config, MetricRegistry};
use vidlens_enrich::Scorer;
use vidlens_store::PgStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("vidlens=info".parse()?))
        .init();

    info!("Vidlens enrichment batch starting...");

    let config = Config::from_env();

    // Connect to Postgres and run migrations
    let store = PgStore::connect(&config.database_url).await?;
    store.migrate().await?;

    // CLI: `vidlens-batch [--force] [VIDEO_ID ...]`
    let mut options = RunOptions::default();
    let ids: Vec<String> = std::env::args()
        .skip(1)
        .filter(|arg| {
            if arg == "--force" {
                options.force = true;
                false
            } else {
                true
            }
        })
        .collect();
    if !ids.is_empty() {
        options.video_ids = Some(ids);
    }

    let registry = MetricRegistry::standard();
    let scorer = Scorer::new(registry, config.policy);
    let runner = Runner::new(store, scorer, config.policy, config.workers);

    let run_id = Uuid::new_v4().to_string();
    let mut log = RunLog::new(run_id);
    let report = runner.run(&options, &mut log).await?;
    log.save(&report)?;

    println!("{report}");
    Ok(())
}
