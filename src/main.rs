mod cli;

use clap::Parser;
use cli::{Cli, Commands, ServeArgs};
use webconsole::auth::password_digest;
use webconsole::config::Config;
use webconsole::observability::init_tracing;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => serve(args).await?,
        Commands::HashPassword(args) => {
            println!("{}", password_digest(&args.user, &args.realm, &args.password));
        }
    }

    Ok(())
}

async fn serve(args: ServeArgs) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut config = match args.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };

    if let Some(bind) = args.bind {
        config.server.bind_ip = bind.ip();
        config.server.port = bind.port();
    }
    config.server.rest |= args.rest;
    config.server.jsonp |= args.jsonp;
    config.validate()?;

    let log = init_tracing(&config.logging);
    tracing::info!(
        realm = %config.auth.realm,
        users = config.auth.users.len(),
        "Configuration loaded"
    );

    webconsole::api::run(config, log).await
}
