//! Vexillum CLI: headless flag simulation, snapshot inspection and config checks.

use clap::{Parser, Subcommand};

mod commands;
mod settings;

#[derive(Parser)]
#[command(name = "vexillum")]
#[command(version, about = "Vexillum: real-time flag cloth simulation kernel")]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation from a config file.
    Simulate {
        /// Path to simulation config (TOML). Defaults are used when omitted.
        #[arg(short, long)]
        config: Option<String>,

        /// Write recorded frames to this JSON file.
        #[arg(short, long)]
        output: Option<String>,

        /// Write the final particle state to this snapshot file.
        #[arg(short, long)]
        snapshot: Option<String>,

        /// Override the number of steps from the config.
        #[arg(long)]
        steps: Option<u32>,
    },

    /// Inspect a state snapshot file.
    Inspect {
        /// Path to snapshot file.
        path: String,
    },

    /// Validate a simulation config.
    Validate {
        /// Path to config file (TOML).
        path: String,
    },

    /// Print the default simulation config as TOML.
    DefaultConfig,
}

fn main() {
    let cli = Cli::parse();
    commands::init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Simulate { config, output, snapshot, steps } => commands::simulate(
            config.as_deref(),
            output.as_deref(),
            snapshot.as_deref(),
            steps,
        ),
        Commands::Inspect { path } => commands::inspect(&path),
        Commands::Validate { path } => commands::validate(&path),
        Commands::DefaultConfig => commands::default_config(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
