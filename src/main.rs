use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use camera_control::agent::config::Config;
use camera_control::camera::{CameraCommandClient, CommandResult};
use camera_control::comms::local_api;
use camera_control::messages::MessageLog;
use camera_control::transport::HttpTransport;
use camera_control::utils;

#[derive(Parser)]
#[command(name = "camera", version = camera_control::VERSION, about = "Camera recording control")]
struct AppCli {
    /// Config file path
    #[arg(short, long, default_value = "camera.json", global = true)]
    config: String,

    /// Camera API base URL (overrides config)
    #[arg(long, global = true)]
    url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start recording on the camera
    Start {
        #[arg(long, env = "CAMERA_PASSWORD", default_value = "", hide_env_values = true)]
        password: String,
    },
    /// Stop recording on the camera
    Stop {
        #[arg(long, env = "CAMERA_PASSWORD", default_value = "", hide_env_values = true)]
        password: String,
    },
    /// Ask whether the camera is recording
    Status,
    /// Run a local camera API emulator
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

// Log entries already reach the terminal through the `messages` tracing
// target, so stdout carries only the result.
fn render_outcome(result: &CommandResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

fn print_outcome(result: &CommandResult) -> Result<()> {
    println!("{}", render_outcome(result)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    utils::logging::init();

    let args = AppCli::parse();
    let mut config = Config::load(&args.config)?;
    if let Some(url) = args.url {
        config.stream_location = url;
    }

    let log = MessageLog::new();
    let transport = HttpTransport::new(config.request_timeout())?;
    let client = CameraCommandClient::new(
        config.stream_location.clone(),
        Arc::new(transport),
        Arc::new(log.clone()),
    );

    match args.command {
        Commands::Start { password } => {
            let result = client.start_recording(&password).await;
            print_outcome(&result)?;
        }
        Commands::Stop { password } => {
            let result = client.stop_recording(&password).await;
            print_outcome(&result)?;
        }
        Commands::Status => {
            let result = client.is_recording().await;
            print_outcome(&result)?;
        }
        Commands::Serve { port } => {
            info!("Starting camera emulator on port {port}");
            local_api::serve(config, port).await?;
        }
    }

    Ok(())
}
