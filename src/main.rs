use clap::Parser;
use std::time::{Duration, Instant};
use tallpdf::{
    format_duration, run_pipeline, setup_logging, CaptureConfig, Cli, PaperWidth,
};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    setup_logging(args.verbose)?;

    info!("Starting tallpdf v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&args).await?;
    let source = args.url_source();
    let start = Instant::now();

    match run_pipeline(&source, &args.out_dir, &args.merged, &config).await {
        Ok(artifacts) => {
            println!(
                "Done in {}. Captured {} pages.",
                format_duration(start.elapsed()),
                artifacts.len()
            );
            println!("Merged PDF -> {}", resolved(&args.merged));
            println!("Individual PDFs in -> {}", resolved(&args.out_dir));
            Ok(())
        }
        Err(e) => {
            error!("Run failed: {e}");
            eprintln!("{e}");
            std::process::exit(e.exit_code());
        }
    }
}

async fn load_config(args: &Cli) -> anyhow::Result<CaptureConfig> {
    let mut config = if let Some(config_path) = &args.config {
        // Load from file
        let config_content = tokio::fs::read_to_string(config_path).await?;
        serde_json::from_str(&config_content)?
    } else {
        // Use default configuration
        CaptureConfig::default()
    };

    // Override with CLI arguments
    if args.letter {
        config.paper_width = PaperWidth::Letter;
    }

    if let Some(margin) = args.margin {
        config.margin_in = margin;
    }

    if let Some(wait_ms) = args.wait_ms {
        config.settle_delay = Duration::from_millis(wait_ms);
    }

    if let Some(min_wait) = args.min_wait {
        config.min_pacing = Duration::from_secs_f64(min_wait);
    }

    if let Some(max_wait) = args.max_wait {
        config.max_pacing = Duration::from_secs_f64(max_wait);
    }

    if let Some(rest_every) = args.rest_every {
        config.burst_size = rest_every;
    }

    if let Some(cooldown_sec) = args.cooldown_sec {
        config.cooldown = Duration::from_secs(cooldown_sec);
    }

    if let Some(captcha_timeout) = args.captcha_timeout {
        config.captcha_timeout = Duration::from_secs(captcha_timeout);
    }

    if args.headful {
        config.headless = false;
    }

    if let Some(user_data_dir) = &args.user_data_dir {
        config.user_data_dir = Some(user_data_dir.clone());
    }

    if let Some(chrome_path) = &args.chrome_path {
        config.chrome_path = Some(chrome_path.clone());
    }

    config.validate()?;

    info!("Configuration loaded successfully");
    info!("Paper width: {:?} ({}in)", config.paper_width, config.paper_width.inches());
    info!("Settle delay: {:?}", config.settle_delay);
    info!(
        "Pacing: {:?}..{:?}, cooldown {:?} every {} pages",
        config.min_pacing, config.max_pacing, config.cooldown, config.burst_size
    );

    Ok(config)
}

fn resolved(path: &std::path::Path) -> String {
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}
