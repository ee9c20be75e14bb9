use clap::Parser;
use shop_services::cli::{self, Cli, Command};
use shop_services::ServiceKind;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Auth => cli::server::run(ServiceKind::Auth).await,
        Command::Orders => cli::server::run(ServiceKind::Orders).await,
        Command::Products => cli::server::run(ServiceKind::Products).await,
        Command::Migrate(args) => cli::migrate::run(args).await,
    }
}
