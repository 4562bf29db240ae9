//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for llm-relay
#[derive(Parser, Debug)]
#[command(name = "llm-relay")]
#[command(author, version, about = "Streaming relay and long-context experiment runner for chat completion APIs")]
#[command(long_about = r#"
llm-relay sits between clients and an OpenAI-compatible chat completion API.

It can:
- relay one streaming completion as server-sent events
- fan a prompt out to several model tiers and stream their results
- run scripted long-context experiments that grow a conversation until a
  token budget is reached, then verify what the model still remembers

Configuration files are loaded from (in priority order):
1. LLM_RELAY_* environment variables
2. --config <path>     Explicit config file
3. ./llm-relay.toml    Project-level config
4. ~/.config/llm-relay/config.toml   Global config

Example:
  llm-relay serve --port 8080
  llm-relay experiment --fixtures fixtures --output results/run.json
  llm-relay inspect case_2_long
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Serve the streaming and analysis endpoints
    Serve {
        /// Interface to bind (overrides server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Run the full three-case experiment suite and save the results
    Experiment {
        #[command(flatten)]
        run: RunArgs,
    },

    /// Run only the overflow continuation experiment
    Overflow {
        #[command(flatten)]
        run: RunArgs,
    },

    /// Parse a fixture and print its steps
    Inspect {
        /// Fixture name (`case_2_long`) or path to a fixture file
        fixture: String,

        /// Directory holding fixtures (overrides experiment.fixtures_dir)
        #[arg(long, value_name = "DIR")]
        fixtures: Option<PathBuf>,
    },
}

/// Options shared by the experiment commands
#[derive(clap::Args, Debug, Clone, PartialEq, Eq)]
pub struct RunArgs {
    /// Directory holding fixtures (overrides experiment.fixtures_dir)
    #[arg(long, value_name = "DIR")]
    pub fixtures: Option<PathBuf>,

    /// Result file (overrides experiment.output_path)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// JSONL transcript of every event (overrides logging.conversation_log)
    #[arg(long, value_name = "PATH")]
    pub log: Option<PathBuf>,

    /// Pause after every step, in milliseconds (overrides experiment.step_delay_ms)
    #[arg(long, value_name = "MS")]
    pub delay_ms: Option<u64>,

    /// Print the result snapshot as JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}
