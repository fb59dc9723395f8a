mod shell;
mod terminal;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use claim_view::models::{DocumentId, FolderId};
use claim_view::session::{FolderTab, View};
use claim_view::{ClientConfig, HttpClaimApi, ViewController};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::shell::{read_files, render_active};
use crate::terminal::TerminalFrontend;

#[derive(Parser, Debug)]
#[command(name = "claim-terminal")]
#[command(version, about = "Manage insurance claim folders from the terminal")]
struct Args {
    /// Backend base URL, overrides CLAIM_API_BASE and the config file
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// Answer yes to every confirmation
    #[arg(short, long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show stats and every policy folder
    Dashboard,
    /// Upload a policy document into a new folder
    NewPolicy {
        #[arg(long)]
        name: String,
        file: PathBuf,
    },
    /// Show one folder
    Open {
        id: i64,
        #[arg(long, default_value = "documents")]
        tab: FolderTab,
    },
    /// Delete a folder and all its documents
    DeleteFolder { id: i64 },
    /// Upload claim documents into a folder
    Upload {
        id: i64,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Delete one document from a folder
    DeleteDocument { folder: i64, document: i64 },
    /// Generate the claim analysis for a folder
    Analyze { id: i64 },
    /// Ask a question about a folder's policy
    Ask { id: i64, question: String },
    /// Interactive session (default)
    Shell,
}

fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "claim_terminal=info,claim_view=info".into());

    // stdout belongs to the rendered screens
    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_target(true)
                        .with_level(true)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        "pretty" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .compact()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing();

    let mut config = ClientConfig::load().context("Failed to load configuration")?;
    if let Some(base) = args.api_base {
        config = config.with_api_base(base);
    }
    info!(api_base = %config.api_base, "Starting claim terminal");

    let api = Arc::new(HttpClaimApi::new(config.clone()).context("Failed to build HTTP client")?);
    let frontend = Arc::new(TerminalFrontend::new(args.yes));
    let mut controller = ViewController::new(api, frontend.clone(), &config);

    match args.command.unwrap_or(Command::Shell) {
        Command::Shell => shell::run(&mut controller).await?,
        command => {
            run_once(&mut controller, command).await?;
            println!("{}", render_active(&controller));
            let failed = frontend.error_count();
            if failed > 0 {
                anyhow::bail!("{failed} operation(s) reported an error");
            }
        }
    }

    Ok(())
}

async fn run_once(controller: &mut ViewController, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Dashboard => controller.show_view(View::Dashboard).await,
        Command::NewPolicy { name, file } => {
            controller.show_view(View::UploadPolicy).await;
            controller.set_folder_name(name);
            let Some(policy) = read_files(controller, &[file]).await.pop() else {
                return Ok(());
            };
            if controller.select_policy_file(policy) {
                controller.upload_policy().await;
            }
        }
        Command::Open { id, tab } => {
            controller.open_folder(FolderId(id)).await;
            controller.select_tab(tab);
        }
        Command::DeleteFolder { id } => {
            controller.show_view(View::Dashboard).await;
            controller.delete_folder(FolderId(id)).await;
        }
        Command::Upload { id, files } => {
            controller.open_folder(FolderId(id)).await;
            let files = read_files(controller, &files).await;
            controller.upload_documents(files).await;
        }
        Command::DeleteDocument { folder, document } => {
            controller.open_folder(FolderId(folder)).await;
            controller.delete_document(DocumentId(document)).await;
        }
        Command::Analyze { id } => {
            controller.open_folder(FolderId(id)).await;
            controller.generate_analysis().await;
        }
        Command::Ask { id, question } => {
            controller.open_folder(FolderId(id)).await;
            controller.set_question(question);
            controller.ask_question().await;
            controller.select_tab(FolderTab::Qna);
        }
        Command::Shell => shell::run(controller).await?,
    }
    Ok(())
}
