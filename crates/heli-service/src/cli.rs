use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "heli-service")]
#[command(
    author,
    version,
    about = "HeLI line-based language identification service"
)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    pub config: String,

    /// Listen address
    #[arg(short = 'l', long)]
    pub listen: Option<String>,

    /// Listen port
    #[arg(short = 'P', long)]
    pub port: Option<u16>,

    /// Path to HeLI.jar
    #[arg(long)]
    pub jar: Option<PathBuf>,

    /// Number of ranked languages the classifier returns per line
    #[arg(short = 't', long)]
    pub best_langs: Option<usize>,

    /// Comma-separated languages the classifier model is restricted to
    #[arg(long)]
    pub languages: Option<String>,

    /// Launch the classifier with `java` from PATH instead of the bundled JVM
    #[arg(long)]
    pub dev: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
