use clap::{ Parser, Subcommand };
use std::path::PathBuf;

pub mod commands;
pub mod ui;

#[derive(Parser)]
#[command(
    name = "cbc-synth",
    about = "Synthesizes verified statements for Correctness-by-Construction refinements",
    version,
    author,
    long_about = None
)]
pub struct SynthCli {
    /// Sets the log level (error, warn, info, debug, trace)
    #[arg(short, long, global = true, default_value = "info")]
    pub log_level: String,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Synthesize and verify the body of one statement
    Synthesize {
        /// Source directory holding the `prove<project>` folders
        #[arg(long)]
        src_dir: PathBuf,

        /// Project name
        #[arg(short, long)]
        project: String,

        /// Statement identifier (method name or statement id)
        #[arg(short, long)]
        statement: String,

        /// Proof skeleton containing the statement
        #[arg(long)]
        statement_path: PathBuf,

        /// Model description listing the variables
        #[arg(short, long)]
        model: PathBuf,

        /// Component of the model the statement belongs to
        #[arg(long)]
        cbc_id: String,

        /// Slot number keeping working copies of parallel runs apart
        #[arg(long, default_value = "0")]
        slot: String,

        /// Treat the statement as a loop update
        #[arg(long)]
        loop_update: bool,

        /// Override the configured attempt budget
        #[arg(long)]
        max_attempts: Option<u32>,

        /// Write the verified artifact here
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write a JSON run report here
        #[arg(short, long)]
        report: Option<PathBuf>,
    },

    /// Print the contract, variables and first prompt without calling the oracle
    Extract {
        /// Proof skeleton containing the statement
        #[arg(long)]
        statement_path: PathBuf,

        /// Statement identifier (method name or statement id)
        #[arg(short, long)]
        statement: String,

        /// Model description listing the variables
        #[arg(short, long)]
        model: PathBuf,

        /// Component of the model the statement belongs to
        #[arg(long)]
        cbc_id: String,
    },

    /// Run the pipeline over every statement of one or more projects
    Evaluate {
        /// Directory holding `prove<Project>` folders and `<Project>.model.yaml` files
        #[arg(short, long)]
        diagrams: PathBuf,

        /// Projects to evaluate; all found when omitted
        #[arg(short, long, value_delimiter = ',')]
        projects: Option<Vec<String>>,

        /// Statements to leave out, as `Project:1,2`; repeatable
        #[arg(long, value_name = "PROJECT:N,..")]
        skip: Vec<String>,

        /// Runs per statement
        #[arg(long, default_value = "1")]
        runs: u32,

        /// Write JSON results here
        #[arg(short, long)]
        results: Option<PathBuf>,
    },
}
