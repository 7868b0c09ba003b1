use anyhow::Result;
use clap::{Parser, Subcommand};
use gitlet::Repository;
use gitlet::errors::error_kind;
use is_terminal::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(
    name = "gitlet",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A tiny version-control system",
    long_about = "Gitlet tracks snapshots of a working directory as an immutable, \
    content-addressed commit history, with a staging area and movable branches.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
"
)]
struct Cli {
    #[arg(
        long,
        global = true,
        env = "GITLET_WORK_TREE",
        help = "The working tree to operate on (defaults to the current directory)"
    )]
    work_tree: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command creates the .gitlet directory, the initial commit and the main branch."
    )]
    Init,
    #[command(
        name = "add",
        about = "Stage files for the next commit",
        long_about = "This command stages the current content of each file. Directories are expanded to every file beneath them."
    )]
    Add {
        #[arg(index = 1, required = true, num_args = 1.., help = "The files or directories to stage")]
        paths: Vec<PathBuf>,
    },
    #[command(
        name = "commit",
        about = "Record the staged changes",
        long_about = "This command creates a new commit from HEAD's snapshot plus the staged changes."
    )]
    Commit {
        #[arg(index = 1, help = "The commit message")]
        message: String,
    },
    #[command(
        name = "remove",
        visible_alias = "rm",
        about = "Unstage a file or stage its removal",
        long_about = "This command unstages the file and, if the current commit tracks it, stages its removal and deletes it from the working tree."
    )]
    Remove {
        #[arg(index = 1)]
        path: PathBuf,
    },
    #[command(name = "log", about = "Show the history of the current commit")]
    Log,
    #[command(name = "global-log", about = "Show every commit ever made")]
    GlobalLog,
    #[command(name = "find", about = "Print the ids of commits with the given message")]
    Find {
        #[arg(index = 1, help = "The exact commit message")]
        message: String,
    },
    #[command(name = "status", about = "Show branches, staged files and working tree changes")]
    Status,
    #[command(name = "branch", about = "Create a branch at the current commit")]
    Branch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(
        name = "switch",
        about = "Switch to another branch",
        long_about = "This command checks out the tip of the branch and makes it the current branch. \
        It refuses to run when an untracked file would be overwritten."
    )]
    Switch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(
        name = "remove-branch",
        visible_alias = "rm-branch",
        about = "Delete a branch pointer"
    )]
    RemoveBranch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(
        name = "reset",
        about = "Check out a commit and move the current branch to it",
        long_about = "This command accepts full or abbreviated commit ids."
    )]
    Reset {
        #[arg(index = 1)]
        commit_id: String,
    },
    #[command(
        name = "restore",
        about = "Restore a file from a commit",
        long_about = "This command overwrites the working copy of a file with its content in the given commit, or in HEAD."
    )]
    Restore {
        #[arg(index = 1, help = "The commit to restore from (defaults to HEAD)")]
        commit_id: Option<String>,
        #[arg(index = 2, last = true, required = true, help = "The file to restore")]
        path: PathBuf,
    },
}

fn main() -> ExitCode {
    init_tracing();

    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            match error_kind(&error) {
                Some(kind) => eprintln!("{}", kind),
                None => eprintln!("error: {:#}", error),
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let work_tree = match cli.work_tree {
        Some(path) => path,
        None => std::env::current_dir()?,
    };
    let writer = Box::new(std::io::stdout());

    let mut repository = match cli.command {
        Commands::Init => Repository::new(&work_tree, writer)?,
        _ => Repository::open(&work_tree, writer)?,
    };

    match cli.command {
        Commands::Init => repository.init(),
        Commands::Add { paths } => repository.add(&paths),
        Commands::Commit { message } => repository.commit(&message),
        Commands::Remove { path } => repository.remove(&path),
        Commands::Log => repository.log(),
        Commands::GlobalLog => repository.global_log(),
        Commands::Find { message } => repository.find(&message),
        Commands::Status => repository.status(),
        Commands::Branch { name } => repository.branch(&name),
        Commands::Switch { name } => repository.switch(&name),
        Commands::RemoveBranch { name } => repository.remove_branch(&name),
        Commands::Reset { commit_id } => repository.reset(&commit_id),
        Commands::Restore { commit_id, path } => repository.restore(commit_id.as_deref(), &path),
    }
}
