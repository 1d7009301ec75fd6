use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use lsm::app::{App, ListStyle, render};
use lsm::config::{BASE_DIR_ENV, Config};
use lsm::installer::InstallContext;

#[derive(Parser)]
#[command(name = "lsm")]
#[command(version, about = "Install and manage language server binaries")]
struct Cli {
    /// Directory holding one subdirectory per installed server
    #[arg(long, global = true, env = BASE_DIR_ENV, value_name = "DIR")]
    base_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Install language servers, replacing any existing installation
    #[command(visible_alias = "i")]
    Install {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Remove installed language servers
    Uninstall {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Show every known language server and whether it is installed
    List {
        #[arg(long, value_enum, default_value_t)]
        style: ListStyle,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = lsm::logging::init(cli.verbose, cli.log_json);

    let config = Config::resolve(cli.base_dir).context("Failed to resolve base directory")?;
    let app = App::from_config(&config);

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(app, config, cli.command))
}

async fn run(app: App, config: Config, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Install { names } => {
            let cancel = CancellationToken::new();
            let ctx = InstallContext::new(cancel.clone()).with_output(config.output);
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("Interrupted, cancelling");
                    cancel.cancel();
                }
            });

            for name in &names {
                let report = app.install(&ctx, name).await?;
                debug!("{:?}", report);
            }
        }
        Command::Uninstall { names } => {
            for name in &names {
                app.uninstall(name).await?;
            }
        }
        Command::List { style } => {
            let statuses = app.list()?;
            let mut stdout = std::io::stdout().lock();
            render(&statuses, style, &mut stdout)?;
        }
    }
    Ok(())
}
