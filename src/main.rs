use chinu::core::config::{CliOverrides, ChinuConfig, load_config, resolve};
use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "chinu", about = "CHINU, a college assistant chat powered by Gemini")]
struct Args {
    /// Gemini model to use (overrides CHINU_MODEL and the config file)
    #[arg(short, long)]
    model: Option<String>,

    /// Disable the in-app API key picker; use GEMINI_API_KEY only
    #[arg(long)]
    no_key_selector: bool,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to chinu.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("chinu.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let config = load_config().unwrap_or_else(|e| {
        log::error!("{}; falling back to defaults", e);
        ChinuConfig::default()
    });
    let resolved = resolve(
        &config,
        &CliOverrides {
            model: args.model,
            no_key_selector: args.no_key_selector,
        },
    );

    log::info!(
        "CHINU starting up with model {} (key selector: {})",
        resolved.model_name,
        resolved.key_selector
    );

    chinu::tui::run(resolved)
}
