//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// iecgen - Generate, validate and simulate IEC 61131-3 code from prompts
#[derive(Parser, Debug)]
#[command(name = "iecgen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding persisted history and theme
    #[arg(long, global = true, env = "IECGEN_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Base URL of a remote generation service (uses offline mocks if unset)
    #[arg(long, global = true, env = "IECGEN_SERVICE_URL")]
    pub service_url: Option<String>,

    /// Request timeout for the remote service, in seconds
    #[arg(long, global = true, default_value = "30")]
    pub timeout_secs: u64,

    /// Artificial latency added by the offline mocks, in milliseconds
    #[arg(long, global = true, default_value = "0")]
    pub mock_delay_ms: u64,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Follow-up steps to run on the resulting code.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct FollowUp {
    /// Validate the code afterwards
    #[arg(long)]
    pub validate: bool,

    /// Simulate the code afterwards
    #[arg(long)]
    pub simulate: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate code from a prompt and record it in history
    Generate {
        /// Prompt describing the control logic
        #[arg(trailing_var_arg = true, required = true)]
        prompt: Vec<String>,

        #[command(flatten)]
        follow_up: FollowUp,
    },

    /// List recorded generations, newest first
    History,

    /// Show a recorded generation
    Load {
        /// Generation ID
        id: String,

        #[command(flatten)]
        follow_up: FollowUp,
    },

    /// Show or toggle the persisted theme
    Theme {
        #[arg(value_enum, default_value = "show")]
        action: ThemeAction,
    },

    /// List built-in example prompts
    Examples,

    /// Generate code from a built-in example prompt
    Example {
        /// Example number as shown by `examples`
        number: usize,

        #[command(flatten)]
        follow_up: FollowUp,
    },

    /// Delete all recorded generations
    Clear,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ThemeAction {
    /// Print the current theme
    Show,
    /// Switch between light and dark
    Toggle,
}
