use ccbuild_cli::commands::cli::{self, Commands};
use ccbuild_cli::commands::{render, run};
use ccbuild_cli::error::CliError;
use ccbuild_cli::logging;
use ccbuild_core::api::{load_default, load_from_path};
use ccbuild_plugins::TokioProcessExecutor;
use clap::Parser;

#[tokio::main]
async fn main() {
    let exit = match real_main().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e}");
            e.exit_code()
        }
    };

    std::process::exit(exit);
}

async fn real_main() -> Result<i32, CliError> {
    let args = cli::Args::parse();
    let cfg = match args.config.as_deref() {
        Some(path) => load_from_path(path)?,
        None => load_default()?,
    };
    logging::init_tracing(&cfg.logging).map_err(CliError::Logging)?;
    tracing::debug!(config = ?args.config, "configuration loaded");

    let mut stdout = std::io::stdout().lock();
    match args.command {
        Commands::Render(ctx) => render::render(&cfg, &ctx, &mut stdout),
        Commands::Run(run_args) => {
            let executor = TokioProcessExecutor::new(cfg.executor.clone());
            run::run(&cfg, &run_args, &executor, &mut stdout).await
        }
    }
}
