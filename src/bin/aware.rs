use awareness_client::cli::{utils::output_error, Cli, OutputFormat};
use awareness_client::config::config;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so --json output stays machine-readable
    let filter = EnvFilter::try_from_env("AWARE_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(&config().logging.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_format = OutputFormat::from_cli(&cli);

    if let Err(e) = awareness_client::cli::run(cli).await {
        match std::env::var("AWARE_VERBOSE").as_deref() {
            Ok("true") | Ok("1") => eprintln!("Error: {e:?}"),
            _ => output_error(&output_format, &e),
        }
        std::process::exit(1);
    }

    Ok(())
}
