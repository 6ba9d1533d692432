//! Export the state-owned bank chart with a loop-mode player
//!
//! Run with: cargo run --example export_bank_animation -- bank_wide.csv banks.html

use pricereel::{api::AnimationBuilder, init_logger, services::PlaybackMode};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger()?;

    let mut args = std::env::args().skip(1);
    let input = args.next().unwrap_or_else(|| "bank_wide.csv".to_string());
    let output = args.next().unwrap_or_else(|| "bank_animation.html".to_string());

    let report = AnimationBuilder::state_owned_banks(&input)
        .with_interval_ms(80)
        .with_mode(PlaybackMode::Loop)
        .export(&output)
        .await?;

    println!(
        "📊 {} frames, {:.2} MB embedded -> {}",
        report.frames,
        report.embedded_bytes as f64 / (1024.0 * 1024.0),
        report.path.display()
    );
    Ok(())
}
