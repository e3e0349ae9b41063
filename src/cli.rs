//! CLI to inspect and edit mapping documents.
use clap::{Parser, Subcommand, ValueEnum};
use clap_stdin::{FileOrStdin, FileOrStdout};

use crate::{Config, Result};

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Editor parameters, e.g. `root=features,root-name=Features,id-field=id`.
    #[arg(long, env = "FEATMAP_CONFIG", default_value = "", global = true)]
    pub config: String,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum Format {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the display tree of a mapping document.
    Tree {
        #[arg(default_value = "-")]
        input: FileOrStdin,
        #[arg(default_value = "-")]
        output: FileOrStdout,
        #[arg(short, long, value_enum, default_value_t)]
        format: Format,
    },
    /// Report suspicious mapping data.
    Check {
        #[arg(default_value = "-")]
        input: FileOrStdin,
    },
    /// Edit one leaf and write the updated document.
    Edit {
        /// Property path of the leaf, with namespaces shortened.
        #[arg(short, long)]
        leaf: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        alias: Option<String>,
        #[arg(long)]
        enabled: Option<bool>,
        #[arg(long)]
        use_as_id: Option<bool>,
        #[arg(default_value = "-")]
        input: FileOrStdin,
        #[arg(default_value = "-")]
        output: FileOrStdout,
    },
}

impl Args {
    pub fn config(&self) -> Result<Config> {
        Config::try_from(self.config.as_str())
    }
}
