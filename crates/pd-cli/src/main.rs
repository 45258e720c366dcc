use anyhow::Result;
use clap::Parser;
use pd_cli::{App, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let app = App::from_cli(&cli);
    let mut stdout = std::io::stdout().lock();
    app.run(cli.command, &mut stdout).await
}
