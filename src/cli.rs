use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ghcard")]
#[command(about = "GitHub profile statistics cards rendered as SVG")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone)]
pub struct CommonArgs {
    #[arg(long, help = "GitHub username (falls back to GITHUB_ACTOR)")]
    pub user: Option<String>,

    #[arg(long, help = "API token (falls back to ACCESS_TOKEN, then GITHUB_TOKEN)")]
    pub token: Option<String>,

    #[arg(long, help = "Directory for generated SVG files", default_value = "svg")]
    pub out_dir: PathBuf,

    #[arg(long, help = "Path to cache database directory")]
    pub cache: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    Stats {
        #[arg(long, help = "Print aggregated data as JSON instead of writing the card")]
        json: bool,
    },
    Languages {
        #[arg(long, help = "Print aggregated data as JSON instead of writing the card")]
        json: bool,
    },
    Streak {
        #[arg(long, help = "Print aggregated data as JSON instead of writing the card")]
        json: bool,
    },
    Traffic {
        #[arg(long, help = "Print aggregated data as JSON instead of writing the card")]
        json: bool,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Stats { json } => crate::stats::exec(self.common, json),
            Commands::Languages { json } => crate::languages::exec(self.common, json),
            Commands::Streak { json } => crate::streak::exec(self.common, json),
            Commands::Traffic { json } => crate::traffic::exec(self.common, json),
        }
    }
}
