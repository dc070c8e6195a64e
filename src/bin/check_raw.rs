use clap::Parser;
use colored::*;
use kautaliya::api::response::{extract_text, finish_reason};
use kautaliya::api::{GeminiClient, GenerateRequest};
use kautaliya::cli::Args;
use kautaliya::config::Config;
use kautaliya::models::Turn;
use kautaliya::prompt::{build_prompt, resolve_timezone};
use std::path::PathBuf;

/// Send one prompt through the real conversation assembly and dump the raw API exchange.
#[derive(Parser, Debug)]
#[command(name = "check-raw")]
struct CheckArgs {
    #[arg(long = "timezone", help = "IANA timezone for the system instruction")]
    timezone: Option<String>,

    #[arg(short = 'm', long = "model", help = "Model to query")]
    model: Option<String>,

    #[arg(long = "api-endpoint", help = "Custom API base URL")]
    api_endpoint: Option<String>,

    #[arg(short = 'c', long = "config", help = "Path to a YAML or JSON config file")]
    config: Option<PathBuf>,

    #[arg(required = true, help = "Prompt to send")]
    prompt: Vec<String>,
}

impl CheckArgs {
    /// The subset of server flags that feed config resolution.
    fn server_args(&self) -> Args {
        Args {
            model: self.model.clone(),
            api_endpoint: self.api_endpoint.clone(),
            config: self.config.clone(),
            ..Args::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CheckArgs::parse();
    let prompt = args.prompt.join(" ");

    let config = Config::from_env_and_args(&args.server_args()).unwrap_or_else(|e| {
        eprintln!("{} {}", "Error:".red(), e);
        std::process::exit(1);
    });

    let tz = resolve_timezone(args.timezone.as_deref());
    println!("{}", format!("Using model: {}", config.model).green());
    println!("{}", format!("Prompt: {}", prompt).cyan());
    println!("{}", format!("Timezone: {}", tz.name()).yellow());
    println!("{}", "-".repeat(80).dimmed());

    let conversation = build_prompt(&[Turn::user(prompt)], args.timezone.as_deref());
    let request = GenerateRequest::from_conversation(&conversation);

    println!("{}", "Request payload:".bold());
    println!("{}", serde_json::to_string_pretty(&request)?);
    println!("{}", "-".repeat(80).dimmed());

    let client = GeminiClient::from_config(&config)?;
    println!("{}", format!("POST {}", client.url()).dimmed());

    let response = match client.generate_raw(&request).await {
        Ok(response) => response,
        Err(e) => {
            eprintln!("{}", format!("Error: {}", e).red());
            std::process::exit(1);
        }
    };

    println!("{}", "Raw response:".bold());
    println!("{}", serde_json::to_string_pretty(&response)?);
    println!("{}", "-".repeat(80).dimmed());

    if let Some(reason) = finish_reason(&response) {
        println!("{}: {}", "Finish reason".yellow(), reason);
    }
    match extract_text(&response) {
        Ok(text) => println!("{}: {}", "Content".yellow(), text),
        Err(e) => eprintln!("{}", format!("Could not extract text: {}", e).red()),
    }

    Ok(())
}
