use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use audiobridge::audio::host;
use audiobridge::commands;
use audiobridge::AudioHost;

#[derive(Parser)]
#[command(
    name = "audiobridge",
    version,
    about = "Virtual audio device helper for meeting capture"
)]
struct Cli {
    /// Log at debug level (diagnostics go to stderr; stdout stays JSON)
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List all audio devices
    ListDevices,
    /// Report the current default output device
    CurrentOutput,
    /// Find the BlackHole 2ch loopback device
    FindLoopback,
    /// Create the multi-output + aggregate pair and repoint the default output
    CreateDevices { loopback_uid: String },
    /// Destroy a previously created device pair
    DestroyDevices {
        multi_output_id: u32,
        aggregate_id: u32,
    },
    /// Set the default output device by UID
    SwitchOutput { uid: String },
}

fn run<H: AudioHost>(host: &H, command: Command) -> Result<Value, String> {
    match command {
        Command::ListDevices => commands::list_devices(host),
        Command::CurrentOutput => commands::current_output(host),
        Command::FindLoopback => commands::find_loopback(host),
        Command::CreateDevices { loopback_uid } => commands::create_devices(host, &loopback_uid),
        Command::DestroyDevices {
            multi_output_id,
            aggregate_id,
        } => commands::destroy_devices(host, multi_output_id, aggregate_id),
        Command::SwitchOutput { uid } => commands::switch_output(host, &uid),
    }
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    // Command-level failures go through the JSON payload with exit 0; only
    // clap's usage errors exit non-zero.
    let outcome = match host::platform_host() {
        Ok(host) => run(&host, cli.command),
        Err(e) => Err(e.to_string()),
    };

    let payload = match outcome {
        Ok(value) => value,
        Err(message) => serde_json::json!({ "error": message }),
    };
    println!("{payload}");
}
