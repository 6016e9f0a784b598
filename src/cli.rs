//! CLI argument parsing with clap.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "routefilter")]
#[command(author, version, about = "Collect and filter IPv4 routes for BIRD")]
pub struct Cli {
    /// AS list file (downloaded when omitted)
    #[arg(short = 'a', long)]
    pub as_list: Option<PathBuf>,

    /// Output file for the generated reject list
    #[arg(short, long, default_value = "routes.txt")]
    pub output: PathBuf,

    /// Exclude list file (downloaded when omitted)
    #[arg(short = 'x', long)]
    pub exclude: Option<PathBuf>,

    /// Reload the BIRD configuration after a changed update
    #[arg(long)]
    pub apply: bool,

    /// Summarize routes by merging sibling networks
    #[arg(long)]
    pub summarize: bool,

    /// Config file path (defaults apply when omitted)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Quiet mode (errors only, for cron/systemd timer)
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose mode (debug output)
    #[arg(short, long)]
    pub verbose: bool,
}
