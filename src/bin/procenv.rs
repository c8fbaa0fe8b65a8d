//! procenv CLI - run Rhai scripts against the live process environment
//!
//! Usage:
//!   procenv run <script.rhai>      Run a script with ENV bound
//!   procenv eval <expr>            Evaluate an expression and print it
//!   procenv list [--values]        List visible variable names
//!   procenv get <name>             Print a variable (exit 1 if unset)

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use procenv::proxy::deprecation::WarningMode;
use procenv::{EnvOptions, ScriptHost, config, output};
use rhai::Dynamic;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "procenv")]
#[command(about = "Run Rhai scripts with the process environment bound to ENV")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: $XDG_CONFIG_HOME/procenv/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Warn once when a non-primitive value is assigned to ENV
    #[arg(long, global = true)]
    pending_deprecation: bool,

    /// Turn deprecation warnings into failed assignments
    #[arg(long, global = true, conflicts_with = "no_deprecation")]
    throw_deprecation: bool,

    /// Silence deprecation warnings
    #[arg(long, global = true)]
    no_deprecation: bool,

    /// Work on an in-memory copy of the environment
    #[arg(long, global = true)]
    sandbox: bool,

    /// Verbose logging (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a script file
    Run {
        /// Path to the script
        script: PathBuf,
    },

    /// Evaluate an expression and print the result
    Eval {
        /// Rhai source
        expr: String,
    },

    /// List visible variable names in environment order
    List {
        /// Also print values
        #[arg(long)]
        values: bool,
    },

    /// Print the value of a variable
    Get {
        /// Variable name
        name: String,
    },
}

impl Cli {
    fn options(&self) -> Result<EnvOptions> {
        let mut options = config::load(self.config.as_deref())?;
        if self.pending_deprecation {
            options.pending_deprecation = true;
        }
        if self.throw_deprecation {
            options.warnings = WarningMode::Throw;
        }
        if self.no_deprecation {
            options.warnings = WarningMode::Silent;
        }
        if self.sandbox {
            options.sandbox = true;
        }
        Ok(options)
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "procenv=debug",
        _ => "procenv=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    let options = cli.options().context("Failed to load options")?;
    let host = ScriptHost::new(options);

    match cli.command {
        Commands::Run { script } => {
            host.run_file(&script)?;
        }

        Commands::Eval { expr } => {
            let value: Dynamic = host.eval_dynamic(&expr)?;
            if !value.is_unit() {
                println!("{}", value);
            }
        }

        Commands::List { values } => {
            let store = host.proxy().context().store();
            for name in store.enumerate()? {
                if values {
                    let value = store.get(&name)?;
                    output::list_item(&name, Some(value.as_deref().unwrap_or("")));
                } else {
                    output::list_item(&name, None);
                }
            }
        }

        Commands::Get { name } => match host.proxy().context().store().get(&name)? {
            Some(value) => println!("{}", value),
            None => {
                output::warning(&format!("{} is not set", name));
                return Ok(ExitCode::FAILURE);
            }
        },
    }

    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
