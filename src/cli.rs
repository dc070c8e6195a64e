use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(name = "kautaliya")]
#[command(about = "Web chat front-end for the Gemini API", long_about = None)]
pub struct Args {
    #[arg(long = "host", help = "Address to bind (default 0.0.0.0)")]
    pub host: Option<String>,

    #[arg(short = 'p', long = "port", help = "Port to listen on (default 5000)")]
    pub port: Option<u16>,

    #[arg(
        long = "api-endpoint",
        help = "Custom API base URL (e.g., http://localhost:8080/v1beta)"
    )]
    pub api_endpoint: Option<String>,

    #[arg(short = 'm', long = "model", help = "Model to use (default gemini-2.5-flash)")]
    pub model: Option<String>,

    #[arg(long = "static-dir", help = "Directory served under /static")]
    pub static_dir: Option<PathBuf>,

    #[arg(short = 'c', long = "config", help = "Path to a YAML or JSON config file")]
    pub config: Option<PathBuf>,

    #[arg(short = 'v', long = "verbose", help = "Enable debug logging")]
    pub verbose: bool,
}
