use clap::{Parser, Subcommand};
use repoqa_indexer::types::{AskResponse, IndexResponse};
use repoqa_indexer::{Config, RepoQaClient, RepoQaError};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "repoqa-indexer",
    about = "Chunk a repository with tree-sitter and answer questions about it",
    version = concat!(
        env!("CARGO_PKG_VERSION"),
        " (",
        env!("GIT_COMMIT_HASH"),
        ", built ",
        env!("BUILD_TIMESTAMP"),
        ")"
    )
)]
struct Cli {
    /// Configuration file (defaults to the per-user config location)
    #[arg(short, long, global = true, env = "REPOQA_CONFIG")]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Walk a directory and rebuild the chunk store from its source files
    Index {
        /// Root directory of the repository
        root: PathBuf,

        /// Chunk store to write (default: data/chunked.jsonl)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Answer a question from the chunks the ranker considers most relevant
    Ask {
        /// The question; multiple words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Number of chunks to retrieve
        #[arg(short, long)]
        top: Option<usize>,

        /// Print the prompt instead of calling the completion command
        #[arg(long)]
        prompt_only: bool,
    },
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("error: {:#}", e);
            if e.is_user_error() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

async fn run(cli: Cli) -> Result<(), RepoQaError> {
    let mut config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Index { root, output } => {
            if let Some(output) = output {
                config.indexing.output_path = output;
            }
            config.validate()?;

            let client = RepoQaClient::new(config);
            let response = client.index_repository(&root).await?;
            print_index(&response, cli.json)
        }
        Commands::Ask {
            query,
            top,
            prompt_only,
        } => {
            let query = query.join(" ");
            let client = RepoQaClient::new(config);
            let response = client.ask(&query, top, prompt_only).await?;
            print_ask(&response, prompt_only, cli.json)
        }
    }
}

fn print_index(response: &IndexResponse, json: bool) -> Result<(), RepoQaError> {
    if json {
        println!("{}", serde_json::to_string_pretty(response)?);
        return Ok(());
    }

    println!(
        "Indexed {} files ({} skipped), wrote {} chunks to {} in {}ms",
        response.files_indexed,
        response.files_skipped,
        response.chunks_written,
        response.output_path,
        response.duration_ms
    );
    for error in &response.errors {
        println!("  skipped: {}", error);
    }
    Ok(())
}

fn print_ask(response: &AskResponse, prompt_only: bool, json: bool) -> Result<(), RepoQaError> {
    if json {
        println!("{}", serde_json::to_string_pretty(response)?);
    } else if prompt_only {
        println!("{}", serde_json::to_string_pretty(&response.prompt)?);
    } else if let Some(answer) = &response.answer {
        println!("{}", answer);
    }
    Ok(())
}
