use anyhow::Context;
use house_price_predictor::{run_training, Paths, TrainConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

// Training script and entry point
// Steps
// 1. Load the CSV dataset from disk
// 2. Split into train and test sets, then into features and target
// 3. Fit the preprocessing + random forest pipeline
// 4. Print held-out metrics
// 5. Save the pipeline and a sample of held-out predictions

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("house_price_predictor=info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    info!("Starting training script...");

    let paths = Paths::default();
    let config = TrainConfig::default();

    run_training(&paths, &config)
        .with_context(|| format!("training on {} failed", paths.dataset.display()))?;

    info!(
        model = %paths.model.display(),
        report = %paths.report.display(),
        "training complete"
    );

    Ok(())
}
