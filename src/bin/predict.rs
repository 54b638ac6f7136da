use std::io::{self, IsTerminal};

use anyhow::anyhow;
use clap::Parser;
use house_price_predictor::cli::{display_price, PredictArgs, Prompter};
use house_price_predictor::{predict, HousePricePipeline, Paths};
use tracing_subscriber::EnvFilter;

// Inference entry point
// 1. Load the persisted pipeline
// 2. Resolve each feature from flags, defaults or prompts
// 3. Predict and print a single price

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("house_price_predictor=warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let args = PredictArgs::parse();

    let model_path = Paths::default().model;
    let pipeline = HousePricePipeline::load(&model_path)
        .map_err(|e| anyhow!("Failed to load model from {}: {e}", model_path.display()))?;

    let interactive = io::stdin().is_terminal();
    let mut prompter = Prompter::new(io::stdin().lock(), io::stdout());
    let record = args.resolve(&mut prompter, interactive)?;

    let prediction = predict(&pipeline, &record)?;
    println!("Predicted Price: {}", display_price(prediction));

    Ok(())
}
