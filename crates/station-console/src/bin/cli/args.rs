use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use station_console::OpAction;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Backend base URL; overrides STATION_BACKEND_URL.
    #[arg(long, global = true)]
    pub backend_url: Option<String>,

    /// Directory holding the persisted keys; overrides STATION_HOME.
    #[arg(long, global = true)]
    pub home: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show, edit and synchronize the keys record.
    #[command(subcommand)]
    Keys(KeysCommand),
    /// Run a guarded ops action.
    Ops(OpsArgs),
    /// Probe the backend health endpoint.
    Health,
    /// Send one chat line.
    Chat(ChatArgs),
    /// List missing-key notices.
    Notices,
    #[command(subcommand)]
    Rooms(RoomsCommand),
    #[command(subcommand)]
    Loop(LoopCommand),
}

#[derive(Subcommand)]
pub enum KeysCommand {
    Show {
        #[arg(long)]
        reveal: bool,
    },
    /// Set one field (by its record name, e.g. githubRepo) and save locally.
    Set { field: String, value: String },
    /// Push the local record to the backend.
    Push,
    /// Pull the backend record; --adopt saves it locally.
    Pull {
        #[arg(long)]
        adopt: bool,
    },
}

#[derive(Args)]
pub struct OpsArgs {
    #[arg(value_enum)]
    pub action: OpKind,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OpKind {
    GitStatus,
    GitPush,
    RenderDeploy,
}

impl From<OpKind> for OpAction {
    fn from(kind: OpKind) -> Self {
        match kind {
            OpKind::GitStatus => OpAction::GitStatus,
            OpKind::GitPush => OpAction::GitPush,
            OpKind::RenderDeploy => OpAction::RenderDeploy,
        }
    }
}

#[derive(Args)]
pub struct ChatArgs {
    pub text: String,
}

#[derive(Subcommand)]
pub enum RoomsCommand {
    List,
    Ensure { room_id: String, title: String },
    Rename { room_id: String, title: String },
    Messages {
        room_id: String,
        #[arg(long, default_value_t = station_console::api::DEFAULT_MESSAGE_LIMIT)]
        limit: u32,
    },
    Post {
        room_id: String,
        text: String,
        #[arg(long, default_value = "user")]
        role: String,
    },
}

#[derive(Subcommand)]
pub enum LoopCommand {
    Tasks,
    Submit {
        instruction: String,
        #[arg(long, default_value = "ping")]
        kind: String,
    },
}
