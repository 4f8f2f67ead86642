use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use supportbot::connector::api::{Container, ContainerConfig, Router};
use supportbot::Commands;

#[derive(Parser)]
#[command(name = "supportbot")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Keep session history in process memory instead of the Redis REST store
    #[arg(long, global = true)]
    memory_storage: bool,

    /// Answer with an offline echo model instead of calling the model API
    #[arg(long, global = true)]
    mock_model: bool,

    /// CSV knowledge base included as context (overrides CSV_FILE_PATH)
    #[arg(long, global = true)]
    context_file: Option<PathBuf>,

    /// Model name (overrides MODEL_NAME)
    #[arg(long, global = true)]
    model: Option<String>,

    /// Sampling temperature (overrides TEMPERATURE)
    #[arg(long, global = true, value_parser = parse_temperature)]
    temperature: Option<f32>,

    #[command(subcommand)]
    command: Commands,
}

fn parse_temperature(raw: &str) -> Result<f32, String> {
    let temperature: f32 = raw.trim().parse().map_err(|e| format!("{}", e))?;
    if temperature.is_finite() {
        Ok(temperature)
    } else {
        Err("temperature must be a finite number".to_string())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let subscriber = if cli.verbose {
        FmtSubscriber::builder()
            .with_env_filter(EnvFilter::new("debug"))
            .with_target(false)
            .finish()
    } else {
        FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .finish()
    };
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = ContainerConfig::from_env();
    config.memory_storage = cli.memory_storage;
    config.mock_model = cli.mock_model;
    if let Some(path) = cli.context_file {
        config.context_file = path;
    }
    if let Some(model) = cli.model {
        config.model_name = model;
    }
    if let Some(temperature) = cli.temperature {
        config.temperature = temperature;
    }

    let container = Container::new(config)?;
    let router = Router::new(&container);

    let output = router.route(cli.command).await?;
    if !output.is_empty() {
        println!("{}", output);
    }

    Ok(())
}

#[cfg(test)]
mod cli_tests {
    use super::*;

    #[test]
    fn serve_defaults_to_port_3000() {
        std::env::remove_var("PORT");
        let cli = Cli::try_parse_from(["supportbot", "serve"]).unwrap();
        match cli.command {
            Commands::Serve {
                port,
                public,
                static_dir,
            } => {
                assert_eq!(port, 3000);
                assert!(!public);
                assert_eq!(static_dir, PathBuf::from("public"));
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from([
            "supportbot",
            "chat",
            "--session",
            "abc",
            "--memory-storage",
            "--mock-model",
        ])
        .unwrap();

        assert!(cli.memory_storage);
        assert!(cli.mock_model);
        assert!(matches!(cli.command, Commands::Chat { session: Some(ref s) } if s == "abc"));
    }

    #[test]
    fn temperature_flag_rejects_non_finite_values() {
        assert!(Cli::try_parse_from(["supportbot", "ask", "hi", "--temperature", "NaN"]).is_err());

        let cli = Cli::try_parse_from(["supportbot", "ask", "hi", "--temperature", "0.4"]).unwrap();
        assert_eq!(cli.temperature, Some(0.4));
    }

    #[test]
    fn ask_requires_a_message() {
        assert!(Cli::try_parse_from(["supportbot", "ask"]).is_err());
    }
}
