use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::Value;

use twirp_transport::config::{load_config, ClientConfig};
use twirp_transport::haberdasher::{HaberdasherClient, Size};
use twirp_transport::{Client, ClientError, Format};

#[derive(Parser)]
#[command(name = "twirp-cli")]
#[command(about = "Call Twirp services from the command line", long_about = None)]
struct Cli {
    /// Server base URL; overrides the config file.
    #[arg(short, long)]
    url: Option<String>,

    /// Route prefix; overrides the config file.
    #[arg(short, long)]
    prefix: Option<String>,

    /// TOML file with a [client] section.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Call any method with a JSON body
    Call {
        /// Fully qualified service name, e.g. twitch.twirp.example.Haberdasher
        service: String,
        /// Method name, e.g. MakeHat
        method: String,
        /// Request body as JSON
        #[arg(default_value = "{}")]
        body: String,
    },
    /// Ask the Haberdasher for a hat
    MakeHat {
        #[arg(long)]
        inches: i32,
        /// Use JSON instead of protobuf on the wire
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<String, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?.client,
        None => ClientConfig::default(),
    };
    if let Some(url) = cli.url {
        config.base_url = url;
    }
    if let Some(prefix) = cli.prefix {
        config.prefix = prefix;
    }

    match cli.command {
        Commands::Call {
            service,
            method,
            body,
        } => {
            let input: Value = serde_json::from_str(&body)?;
            let client = Client::from_config(&config)?;
            let output = client
                .call_json(&service, &method, &input)
                .await
                .map_err(describe)?;
            Ok(serde_json::to_string_pretty(&output)?)
        }
        Commands::MakeHat { inches, json } => {
            if json {
                config.format = Format::Json;
            }
            let client = HaberdasherClient::new(Client::from_config(&config)?);
            let hat = client
                .make_hat(&Size { inches })
                .await
                .map_err(describe)?;
            Ok(serde_json::to_string_pretty(&hat)?)
        }
    }
}

/// `code: msg` for server errors, the full chain otherwise.
fn describe(err: ClientError) -> String {
    match err.as_twirp() {
        Some(twirp) => format!("{}: {}", twirp.code(), twirp.msg()),
        None => format!("{} ({})", err, err.code()),
    }
}
