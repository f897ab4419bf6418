use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::Level;

use ksec_edit::{EditOptions, ExternalEditor, FzfSelector};
use ksec_k8s::KubeSecretStore;

mod commands;
mod config;

use config::{FileConfig, Overrides, Settings};

/// Ksec - A CLI tool to work with Kubernetes secrets
///
/// The kubeconfig can be passed with --kubeconfig or through the KUBECONFIG
/// environment variable (the flag takes precedence).
#[derive(Parser, Debug)]
#[command(name = "ksec")]
#[command(author, version, about, long_about)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Namespace of the secret [default: "default"]
    #[arg(short, long, global = true)]
    namespace: Option<String>,

    /// Path to the kubeconfig file
    #[arg(long, global = true, value_name = "PATH")]
    kubeconfig: Option<PathBuf>,

    /// Kubeconfig context to use instead of the current one
    #[arg(long, global = true)]
    context: Option<String>,

    /// Config file (defaults to $KSEC_CONFIG or <config dir>/ksec/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Retrieve secret data in human-readable format
    ///
    /// Without a name, and with fzf installed, the secret is picked interactively.
    #[command(visible_alias = "r")]
    Read {
        /// Secret name
        name: Option<String>,
    },

    /// Write a key/value pair to secret data
    ///
    /// Overwriting an existing, different value asks for confirmation.
    #[command(visible_alias = "w")]
    Write {
        /// Secret name
        name: String,
        /// Data key
        key: String,
        /// New value
        value: String,
    },

    /// Edit secret data in your default editor
    ///
    /// WARNING: the secret data is replaced with the content saved in the editor.
    #[command(visible_alias = "e")]
    Edit {
        /// Secret name
        name: Option<String>,

        /// Back up the secret data before updating
        #[arg(short, long)]
        backup: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    init_tracing(args.verbose);

    match run_app(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run_app(args: Args) -> Result<()> {
    let config_path = args
        .config
        .clone()
        .or_else(|| std::env::var_os("KSEC_CONFIG").map(PathBuf::from));
    let file = FileConfig::load(config_path.as_deref())?;

    let overrides = Overrides {
        namespace: args.namespace,
        kubeconfig: args.kubeconfig,
        context: args.context,
    };
    let kubeconfig_env = std::env::var_os("KUBECONFIG");
    let settings = Settings::resolve(overrides, kubeconfig_env.as_deref(), file)?;

    let store = KubeSecretStore::connect(&settings.kubeconfig, settings.context.as_deref())
        .await
        .context("Failed to connect to the cluster")?;

    let selector = FzfSelector::detect().map(|fzf| {
        fzf.with_prompt(settings.selector_prompt.as_str())
            .with_height(settings.selector_height.as_str())
    });

    let mut out = io::stdout().lock();
    let namespace = settings.namespace.as_str();

    match args.command {
        Command::Read { name } => {
            commands::read::run(&store, namespace, name, selector.as_ref(), &mut out).await?;
        }
        Command::Write { name, key, value } => {
            let mut input = io::stdin().lock();
            commands::write::run(&store, namespace, &name, &key, &value, &mut input, &mut out)
                .await?;
        }
        Command::Edit { name, backup } => {
            let editor = ExternalEditor::from_env(settings.editor.as_deref());
            let options = EditOptions {
                backup: backup || settings.backup,
                backup_dir: settings.backup_dir.clone(),
            };
            commands::edit::run(
                &store,
                namespace,
                name,
                selector.as_ref(),
                &editor,
                options,
                &mut out,
            )
            .await?;
        }
    }

    Ok(())
}
