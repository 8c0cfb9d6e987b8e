mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "agile",
    about = "Agile process consultant: assess a team, recommend a methodology, answer process questions",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .agile/ or .git/)
    #[arg(long, global = true, env = "AGILE_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create .agile/ with a default config
    Init,

    /// List the assessment questions
    Questions,

    /// Recommend a methodology, practices, tools and metrics for a team
    Recommend {
        /// Assessment answers (YAML or JSON map of question id to answer)
        #[arg(long)]
        context: PathBuf,
    },

    /// Ask a free-text process question
    Ask {
        /// The question
        query: String,
        /// Assessment answers to tailor the response
        #[arg(long)]
        context: Option<PathBuf>,
    },

    /// Interactive consultation: assessment, recommendation, then questions
    Consult {
        /// Skip the questionnaire and start from these answers
        #[arg(long)]
        context: Option<PathBuf>,
    },

    /// Inspect and validate .agile/config.yaml
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root),
        Commands::Questions => cmd::questions::run(cli.json),
        Commands::Recommend { context } => cmd::recommend::run(&root, &context, cli.json),
        Commands::Ask { query, context } => {
            cmd::ask::run(&root, &query, context.as_deref(), cli.json)
        }
        Commands::Consult { context } => cmd::consult::run(&root, context.as_deref()),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
