use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "webconsole")]
#[command(about = "Embedded admin HTTP console", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP console
    Serve(ServeArgs),
    /// Print the stored digest for an admin user
    HashPassword(HashPasswordArgs),
}

#[derive(clap::Args, Debug)]
pub struct ServeArgs {
    /// Configuration file (defaults to WEBCONSOLE_CONFIG or config/webconsole.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Address to bind, overriding server.bind_ip and server.port
    #[arg(long)]
    pub bind: Option<SocketAddr>,

    /// Serve REST-only handlers
    #[arg(long)]
    pub rest: bool,

    /// Honor the jsonp query parameter
    #[arg(long)]
    pub jsonp: bool,
}

#[derive(clap::Args, Debug)]
pub struct HashPasswordArgs {
    #[arg(long)]
    pub user: String,

    #[arg(long)]
    pub password: String,

    #[arg(long, default_value = "console")]
    pub realm: String,
}
