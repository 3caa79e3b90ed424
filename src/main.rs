//! instagrab - CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use instagrab::{
    api::IgClient,
    browser::BrowserLogin,
    cli::{Args, ModeArg},
    config::{parse_shortcode, validate_config, validate_profile_name, Config},
    download::{download_post, download_profile, DownloadState},
    error::{exit_codes, Result},
    output::{print_banner, print_error, print_info, print_summary},
    session::{acquire_session, SessionStore},
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            ExitCode::from(exit_codes::ABORT as u8)
        }
    }
}

async fn run() -> Result<()> {
    // .env first, so clap env fallbacks see it too
    dotenv::dotenv().ok();

    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt().with_env_filter(filter).with_target(false).init();

    print_banner();

    // Load configuration and merge CLI overrides
    let mut config = Config::from_env();
    args.merge_into_config(&mut config);

    // Credentials are required before any network activity
    validate_config(&config)?;

    std::fs::create_dir_all(&config.download_dir)?;

    print_info(&format!(
        "Mode: {} | Target: {} | Directory: {}",
        args.download_mode(),
        args.target,
        config.download_dir.display()
    ));

    // Establish a session: cached file, then native login, then browser
    let store = SessionStore::new(config.session_file());
    let mut client = IgClient::new(&config)?;
    let browser = BrowserLogin::new(&config);

    let source = acquire_session(&config, &store, &mut client, &browser).await?;
    print_info(&format!("Logged in as {} ({})", config.account.username, source));

    let mut state = DownloadState::new(args.target.clone());
    match args.mode {
        ModeArg::Profile => {
            let profile_name = validate_profile_name(&args.target)?;
            download_profile(&client, &config, &mut state, &profile_name).await?;
        }
        ModeArg::Post => {
            let shortcode = parse_shortcode(&args.target)?;
            download_post(&client, &config, &mut state, &shortcode, &shortcode).await?;
        }
    }

    print_summary(&state);
    print_info("Done.");

    Ok(())
}
