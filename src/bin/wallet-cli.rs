use clap::{Parser, Subcommand};
use futures_util::StreamExt;
use serde_json::Value;
use tokio_tungstenite::tungstenite::Message;

#[derive(Parser)]
#[command(name = "wallet-cli")]
#[command(about = "Management CLI for the Kaia wallet session service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://127.0.0.1:8090")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current session
    Status,
    /// Connect the wallet (may prompt in the signer)
    Connect,
    /// Reset the session
    Disconnect,
    /// Show the target network descriptor
    Network,
    /// Stream session changes until interrupted
    Watch,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Status => {
            let res = client.get(format!("{}/api/v1/session", base)).send().await?;
            print_response(res).await?;
        }
        Commands::Connect => {
            let res = client.post(format!("{}/api/v1/session/connect", base)).send().await?;
            print_response(res).await?;
        }
        Commands::Disconnect => {
            let res = client.post(format!("{}/api/v1/session/disconnect", base)).send().await?;
            print_response(res).await?;
        }
        Commands::Network => {
            let res = client.get(format!("{}/api/v1/network", base)).send().await?;
            print_response(res).await?;
        }
        Commands::Watch => watch(base).await?,
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let json: Value = res.json().await?;

    if !status.is_success() {
        let message = json["message"].as_str().unwrap_or("request failed");
        eprintln!("Error ({}): {}", status, message);
        if let Some(detail) = json["detail"].as_str() {
            eprintln!("Detail: {}", detail);
        }
        return Ok(());
    }

    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

async fn watch(base: &str) -> Result<(), Box<dyn std::error::Error>> {
    let ws_url = format!("{}/api/v1/session/events", base.replacen("http", "ws", 1));
    let (mut stream, _) = tokio_tungstenite::connect_async(ws_url.as_str()).await?;

    while let Some(frame) = stream.next().await {
        match frame? {
            Message::Text(text) => {
                let json: Value = serde_json::from_str(&text)?;
                println!("{}", serde_json::to_string_pretty(&json)?);
            }
            Message::Close(_) => break,
            _ => {}
        }
    }
    Ok(())
}
