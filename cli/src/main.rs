use pricereel::{
    prelude::*,
    utils::{format_table_date, init_logger},
};
use clap::{Parser, Subcommand, ValueEnum};
use std::{path::PathBuf, time::Duration};

#[derive(Parser)]
#[command(name = "pricereel")]
#[command(about = "Render a wide-format price table as an animated line chart")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Once,
    Loop,
    Reflect,
}

impl From<ModeArg> for PlaybackMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Once => PlaybackMode::Once,
            ModeArg::Loop => PlaybackMode::Loop,
            ModeArg::Reflect => PlaybackMode::Reflect,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Export the animation to a self-contained HTML file
    Export {
        /// CSV file path or http(s) URL
        #[arg(short, long, default_value = "bank_wide.csv")]
        input: String,
        /// Destination HTML file
        #[arg(short, long, default_value = "bank_animation.html")]
        output: PathBuf,
        /// Delay between frames in milliseconds
        #[arg(long, default_value_t = 80)]
        interval_ms: u64,
        /// Maximum embedded animation size in megabytes
        #[arg(long, default_value_t = 100.0)]
        embed_limit_mb: f64,
        /// What the player does after the last frame
        #[arg(long, value_enum, default_value = "once")]
        mode: ModeArg,
    },
    /// Print the series and date range of a table
    Inspect {
        /// CSV file path or http(s) URL
        #[arg(short, long, default_value = "bank_wide.csv")]
        input: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger()?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            input,
            output,
            interval_ms,
            embed_limit_mb,
            mode,
        } => {
            let now = chrono::Utc::now();
            println!(
                "[{}] 🚀 Exporting {} to {}",
                now.format("%Y-%m-%d %H:%M:%S UTC"),
                input,
                output.display()
            );

            let mut animator = TimeSeriesAnimator::new()?;
            let table = animator.load(DataSource::from_location(&input)).await?;
            let scene = animator.build_scene(table, &ColorMap::state_owned_banks(), None)?;
            let report = animator.export(
                scene,
                &output,
                ExportOptions {
                    frame_interval: Duration::from_millis(interval_ms),
                    embed_limit_mb,
                    mode: mode.into(),
                },
            )?;

            let complete_time = chrono::Utc::now();
            println!(
                "[{}] ✅ Wrote {} frames ({} bytes) to {}",
                complete_time.format("%Y-%m-%d %H:%M:%S UTC"),
                report.frames,
                report.bytes_written,
                report.path.display()
            );
        }
        Commands::Inspect { input } => {
            let mut animator = TimeSeriesAnimator::new()?;
            let table = animator.load(DataSource::from_location(&input)).await?;

            println!("Series: {}", table.series().join(", "));
            println!("Rows:   {}", table.len());
            if let Some((first, last)) = table.date_range() {
                println!("Dates:  {} .. {}", format_table_date(first), format_table_date(last));
            }
            for (series, malformed) in table.series().iter().zip(table.malformed_counts()) {
                if malformed > 0 {
                    println!("⚠️  {}: {} malformed cells", series, malformed);
                }
            }
        }
    }

    Ok(())
}
