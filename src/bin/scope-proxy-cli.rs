use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use url::Url;

use scope_proxy::blocklist::Blocklist;
use scope_proxy::config::{load_config, ProxyConfig};
use scope_proxy::playground::{ControlMessage, PlaygroundData};

#[derive(Parser)]
#[command(name = "scope-proxy-cli")]
#[command(about = "Management CLI for the scope proxy", long_about = None)]
struct Cli {
    /// Base URL of a running proxy.
    #[arg(short, long, default_value = "http://127.0.0.1:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replace the playground content served by a running proxy
    Push {
        /// Origin the content is served under, e.g. https://play.example/
        #[arg(long)]
        origin: String,
        #[arg(long)]
        html: Option<PathBuf>,
        #[arg(long)]
        css: Option<PathBuf>,
        #[arg(long)]
        js: Option<PathBuf>,
        /// Control endpoint path
        #[arg(long, default_value = "/__scope/message")]
        path: String,
    },
    /// Check a URL against the configured blocklist
    Check {
        #[arg(short, long)]
        config: Option<PathBuf>,
        target: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Push {
            origin,
            html,
            css,
            js,
            path,
        } => {
            let message = ControlMessage::PlaygroundData(PlaygroundData {
                origin,
                html: read_optional(html.as_deref())?,
                css: read_optional(css.as_deref())?,
                js: read_optional(js.as_deref())?,
            });

            let res = reqwest::Client::new()
                .post(format!("{}{}", cli.url.trim_end_matches('/'), path))
                .json(&message)
                .send()
                .await?;

            let status = res.status();
            if status.is_success() {
                println!("Playground content pushed");
            } else {
                eprintln!("Error: control endpoint returned status {}", status);
                if let Ok(text) = res.text().await {
                    eprintln!("Response: {}", text);
                }
            }
        }
        Commands::Check { config, target } => {
            let config = match config {
                Some(path) => load_config(&path)?,
                None => ProxyConfig::default(),
            };
            let blocklist = Blocklist::new(&config.blocklist.patterns);
            let url = Url::parse(&target)?;

            match blocklist.matching_pattern(url.host_str().unwrap_or_default(), url.path()) {
                Some(pattern) => println!("blocked (pattern {:?})", pattern.source()),
                None => println!("allowed"),
            }
        }
    }

    Ok(())
}

fn read_optional(path: Option<&Path>) -> std::io::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path),
        None => Ok(String::new()),
    }
}
