use anyhow::{anyhow, Result};
use tracing::info;

use station_console::{
    api::{ApiReply, StationApi},
    notices::notices,
    ops,
    remote::{RemoteSync, SyncOutcome, CONFIG_ENDPOINT},
    Failure, GuardResult, HttpTransport, KeyField, KeyStore, KeysRecord, OpAction, StationConfig,
};

use crate::cli::{
    args::{Cli, Commands, KeysCommand, LoopCommand, RoomsCommand},
    utils::mask,
};

pub struct App {
    store: KeyStore,
    transport: HttpTransport,
}

impl App {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let config = StationConfig::from_env_with(cli.backend_url.as_deref(), cli.home.clone())?;
        info!(
            backend = %config.backend_url,
            home = %config.home.display(),
            "Station console configured."
        );

        Ok(Self {
            store: KeyStore::open(config.home),
            transport: HttpTransport::new(&config.backend_url),
        })
    }

    pub async fn run(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Keys(cmd) => self.keys(cmd).await,
            Commands::Ops(args) => {
                let record = self.store.load();
                println!("{}", ops::invoke(OpAction::from(args.action), &record, &self.transport).await);
                Ok(())
            }
            Commands::Health => {
                match StationApi::new(&self.transport).health().await {
                    ApiReply::Ok(health) => println!("{}", health.summary()),
                    ApiReply::Unavailable(detail) => println!("{detail}"),
                }
                Ok(())
            }
            Commands::Chat(args) => {
                let record = self.store.load();
                match StationApi::new(&self.transport).chat(&args.text, &record).await {
                    Some(reply) => println!("{reply}"),
                    None => println!("Nothing to send."),
                }
                Ok(())
            }
            Commands::Notices => {
                let found = notices(&self.store.load());
                if found.is_empty() {
                    println!("All keys set.");
                }
                for notice in found {
                    println!("{}: {}", notice.title, notice.desc);
                }
                Ok(())
            }
            Commands::Rooms(cmd) => self.rooms(cmd).await,
            Commands::Loop(cmd) => self.loop_tasks(cmd).await,
        }
    }

    async fn keys(&self, command: KeysCommand) -> Result<()> {
        match command {
            KeysCommand::Show { reveal } => {
                let record = self.store.load();
                for field in KeyField::ALL {
                    let value = record.get(field);
                    let shown = if reveal { value.to_owned() } else { mask(value) };
                    println!("{:<20} {}", field.name(), shown);
                }
            }
            KeysCommand::Set { field, value } => {
                let field = KeyField::from_name(&field).ok_or_else(|| {
                    let known: Vec<_> = KeyField::ALL.iter().map(|f| f.name()).collect();
                    anyhow!("Unknown field '{}'. Known fields: {}", field, known.join(", "))
                })?;
                let (_, saved) = self.store.update(field, value);
                if saved {
                    println!("Saved locally.");
                } else {
                    println!("{}", Failure::PersistenceUnavailable("save skipped".to_owned()));
                }
            }
            KeysCommand::Push => {
                let record = self.store.load();
                if record.is_blank(KeyField::EditModeKey) {
                    let blocked = Failure::GuardBlocked(format!("{} missing", KeyField::EditModeKey.name()));
                    println!("{blocked}");
                    return Ok(());
                }
                let outcome = RemoteSync::new(&self.transport).push(CONFIG_ENDPOINT, &record).await;
                println!("{}", outcome.status_text());
            }
            KeysCommand::Pull { adopt } => {
                let outcome = RemoteSync::new(&self.transport).pull(CONFIG_ENDPOINT).await;
                self.report_pull(&outcome, adopt);
            }
        }
        Ok(())
    }

    fn report_pull(&self, outcome: &SyncOutcome, adopt: bool) {
        let pulled = match (outcome, outcome.keys()) {
            (SyncOutcome::Unavailable { detail }, _) => {
                println!("{}", Failure::RemoteUnavailable(detail.clone()));
                return;
            }
            (_, None) => {
                println!("Backend returned no keys.");
                return;
            }
            (_, Some(pulled)) => pulled,
        };

        let local = self.store.load();
        let changed: Vec<KeyField> = KeyField::ALL
            .into_iter()
            .filter(|&field| local.get(field) != pulled.get(field))
            .collect();
        if changed.is_empty() {
            println!("Backend keys match local keys.");
            return;
        }
        for &field in &changed {
            println!("{:<20} {} -> {}", field.name(), mask(local.get(field)), mask(pulled.get(field)));
        }

        if adopt {
            self.adopt(&pulled);
        } else {
            println!("{} field(s) differ; rerun with --adopt to save them locally.", changed.len());
        }
    }

    fn adopt(&self, pulled: &KeysRecord) {
        if self.store.save(pulled) {
            println!("Adopted backend keys.");
            if let GuardResult::Blocked(reason) = ops::guard(OpAction::GitStatus, pulled) {
                println!("Note: ops still blocked ({reason}).");
            }
        } else {
            println!("{}", Failure::PersistenceUnavailable("save skipped".to_owned()));
        }
    }

    async fn rooms(&self, command: RoomsCommand) -> Result<()> {
        let api = StationApi::new(&self.transport);
        match command {
            RoomsCommand::List => match api.rooms().await {
                ApiReply::Ok(rooms) if rooms.is_empty() => println!("No rooms."),
                ApiReply::Ok(rooms) => {
                    for room in rooms {
                        println!("{}\t{}", room.id, room.title);
                    }
                }
                ApiReply::Unavailable(detail) => println!("{detail}"),
            },
            RoomsCommand::Ensure { room_id, title } => {
                print_reply(api.ensure_room(&room_id, &title).await);
            }
            RoomsCommand::Rename { room_id, title } => {
                print_reply(api.rename_room(&room_id, &title).await);
            }
            RoomsCommand::Messages { room_id, limit } => match api.room_messages(&room_id, limit).await {
                ApiReply::Ok(messages) => {
                    for message in messages {
                        println!("[{}] {}: {}", message.created_at, message.role.to_uppercase(), message.text);
                    }
                }
                ApiReply::Unavailable(detail) => println!("{detail}"),
            },
            RoomsCommand::Post { room_id, text, role } => {
                match api.post_message(&room_id, &role, &text).await {
                    Some(reply) => print_reply(reply),
                    None => println!("Nothing to send."),
                }
            }
        }
        Ok(())
    }

    async fn loop_tasks(&self, command: LoopCommand) -> Result<()> {
        let api = StationApi::new(&self.transport);
        match command {
            LoopCommand::Tasks => match api.loop_tasks().await {
                ApiReply::Ok(tasks) => {
                    for task in tasks {
                        println!("{}\t{}\t{}", task.id, task.kind, task.status);
                    }
                }
                ApiReply::Unavailable(detail) => println!("{detail}"),
            },
            LoopCommand::Submit { instruction, kind } => {
                print_reply(api.submit_task(&kind, &instruction).await);
            }
        }
        Ok(())
    }
}

fn print_reply(reply: ApiReply<serde_json::Value>) {
    match reply {
        ApiReply::Ok(body) => println!(
            "{}",
            serde_json::to_string_pretty(&body).unwrap_or_else(|_| body.to_string())
        ),
        ApiReply::Unavailable(detail) => println!("{detail}"),
    }
}
