use std::io::{self, Write};
use std::path::PathBuf;

use claim_view::models::{DocumentId, FolderId};
use claim_view::notify::Notification;
use claim_view::session::{FolderTab, View};
use claim_view::upload::PendingFile;
use claim_view::ViewController;
use tracing::{info, warn};

use crate::terminal::{render_dashboard, render_folder, render_policy_form};

pub const HELP: &str = "\
Commands:
  dashboard              show stats and policy folders
  new                    start a new policy folder
  name <text>            set the new folder's name
  file <path>            pick the policy document
  submit                 upload and validate the policy
  open <folder-id>       open a folder
  tab <documents|analysis|qna>
  upload <path>...       upload documents into the open folder
  rm-doc <document-id>   delete a document from the open folder
  rm-folder <folder-id>  delete a folder and all its documents
  analyze                generate the claim analysis
  ask <question>         ask about the open folder's policy
  help                   show this list
  quit                   leave";

#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Dashboard,
    NewPolicy,
    Name(String),
    File(PathBuf),
    Submit,
    Open(FolderId),
    Tab(FolderTab),
    Upload(Vec<PathBuf>),
    RemoveDocument(DocumentId),
    RemoveFolder(FolderId),
    Analyze,
    Ask(String),
    Help,
    Quit,
}

impl ShellCommand {
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match verb {
            "dashboard" | "home" => ShellCommand::Dashboard,
            "new" => ShellCommand::NewPolicy,
            "name" => ShellCommand::Name(rest.to_string()),
            "file" => ShellCommand::File(PathBuf::from(required(verb, rest)?)),
            "submit" => ShellCommand::Submit,
            "open" => ShellCommand::Open(FolderId(parse_id(verb, rest)?)),
            "tab" => ShellCommand::Tab(required(verb, rest)?.parse()?),
            "upload" => {
                let paths: Vec<PathBuf> = rest.split_whitespace().map(PathBuf::from).collect();
                if paths.is_empty() {
                    return Err("upload needs at least one file".to_string());
                }
                ShellCommand::Upload(paths)
            }
            "rm-doc" => ShellCommand::RemoveDocument(DocumentId(parse_id(verb, rest)?)),
            "rm-folder" => ShellCommand::RemoveFolder(FolderId(parse_id(verb, rest)?)),
            "analyze" => ShellCommand::Analyze,
            // Blank questions go through so the controller reports them
            "ask" => ShellCommand::Ask(rest.to_string()),
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" => ShellCommand::Quit,
            other => return Err(format!("unknown command '{other}', try 'help'")),
        };
        Ok(Some(command))
    }
}

fn required<'a>(verb: &str, rest: &'a str) -> Result<&'a str, String> {
    if rest.is_empty() {
        Err(format!("{verb} needs an argument"))
    } else {
        Ok(rest)
    }
}

fn parse_id(verb: &str, rest: &str) -> Result<i64, String> {
    required(verb, rest)?
        .parse()
        .map_err(|_| format!("{verb} expects a numeric id, got '{rest}'"))
}

/// Loads every path; unreadable ones become error notifications.
pub async fn read_files(controller: &ViewController, paths: &[PathBuf]) -> Vec<PendingFile> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        match PendingFile::from_path(path).await {
            Ok(file) => files.push(file),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Cannot read file");
                controller.notify(Notification::error(format!(
                    "Cannot read {}: {e}",
                    path.display()
                )));
            }
        }
    }
    files
}

/// Next stdin line, or `None` at end of input.
async fn read_line() -> anyhow::Result<Option<String>> {
    // std stdin, shared with confirmation prompts
    let line = tokio::task::spawn_blocking(|| -> io::Result<Option<String>> {
        let mut line = String::new();
        let read = io::stdin().read_line(&mut line)?;
        Ok((read > 0).then_some(line))
    })
    .await??;
    Ok(line)
}

pub fn render_active(controller: &ViewController) -> String {
    let state = controller.state();
    match state.active {
        View::Dashboard => render_dashboard(controller.dashboard()),
        View::UploadPolicy => render_policy_form(controller.policy_form()),
        View::Folder => render_folder(controller.folder_screen(), state.tab),
    }
}

/// Interactive loop over stdin; returns on `quit` or end of input.
pub async fn run(controller: &mut ViewController) -> anyhow::Result<()> {
    info!("Starting interactive shell");
    controller.show_view(View::Dashboard).await;
    println!("{}", render_active(controller));
    println!("Type 'help' for commands.");

    loop {
        print!("\n{}> ", controller.state().active);
        io::stdout().flush()?;

        let Some(line) = read_line().await? else {
            break;
        };

        let command = match ShellCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };

        match command {
            ShellCommand::Quit => break,
            ShellCommand::Help => {
                println!("{HELP}");
                continue;
            }
            ShellCommand::Dashboard => controller.show_view(View::Dashboard).await,
            ShellCommand::NewPolicy => controller.show_view(View::UploadPolicy).await,
            ShellCommand::Name(name) => controller.set_folder_name(name),
            ShellCommand::File(path) => {
                if let Some(file) = read_files(controller, &[path]).await.pop() {
                    controller.select_policy_file(file);
                }
            }
            ShellCommand::Submit => controller.upload_policy().await,
            ShellCommand::Open(id) => controller.open_folder(id).await,
            ShellCommand::Tab(tab) => controller.select_tab(tab),
            ShellCommand::Upload(paths) => {
                let files = read_files(controller, &paths).await;
                controller.upload_documents(files).await;
            }
            ShellCommand::RemoveDocument(id) => controller.delete_document(id).await,
            ShellCommand::RemoveFolder(id) => controller.delete_folder(id).await,
            ShellCommand::Analyze => controller.generate_analysis().await,
            ShellCommand::Ask(question) => {
                controller.set_question(question);
                controller.ask_question().await;
            }
        }
        println!("{}", render_active(controller));
    }

    info!("Shell closed");
    Ok(())
}
