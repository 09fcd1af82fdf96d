use clap::Parser;

/// Multimodal chat relay for conversational agents
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Listen address, overrides `host` from the config file
    #[arg(long)]
    pub host: Option<String>,

    /// Listen port, overrides `port` from the config file
    #[arg(short, long)]
    pub port: Option<u16>,
}
