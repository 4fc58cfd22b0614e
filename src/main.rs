use clap::Parser;
use movierec_shared::{AppEnv, AppError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> Result<(), AppError> {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
          "{}=info,movierec_core=info,movierec_ai=info",
          env!("CARGO_CRATE_NAME")
        )
        .into()
      }),
    )
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
    .with(tracing_error::ErrorLayer::default())
    .init();

  let cli = Cli::parse();

  // Earlier files win: dotenvy never overrides variables that are already set
  match dotenvy::from_filename(&cli.env_file) {
    Ok(path) => tracing::debug!(path = %path.display(), "loaded env file"),
    Err(err) => tracing::debug!(path = %cli.env_file.display(), "env file not loaded: {err}"),
  }
  dotenvy::dotenv().ok();

  let env = AppEnv::from_env()?;

  commands::run(cli.command, &env).await
}
