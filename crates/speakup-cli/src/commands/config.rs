use anyhow::{Context, Result};
use clap::Args;
use speakup_infrastructure::{ConfigService, SpeakupPaths};

#[derive(Args)]
pub struct ConfigArgs {
    /// Backend base URL, including the `/api` prefix
    #[arg(long)]
    pub api_url: Option<String>,
    /// Default tracing filter when RUST_LOG is not set
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn run(paths: &SpeakupPaths, args: &ConfigArgs) -> Result<()> {
    let service = ConfigService::new(paths)?;
    let mut config = service.get_config()?;

    if args.api_url.is_none() && args.log_level.is_none() {
        println!("api_url = {}", config.api_url);
        println!("request_timeout_secs = {}", config.request_timeout_secs);
        println!("log_level = {}", config.log_level);
        return Ok(());
    }

    config = config.with_api_url_override(args.api_url.clone());
    if let Some(level) = &args.log_level {
        config.log_level = level.clone();
    }
    service
        .save_config(&config)
        .context("Could not write config.toml")?;
    println!("Saved {}", paths.config_file()?.display());
    Ok(())
}
