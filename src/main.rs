mod cli;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;

use starter_core::api::{ApiClient, Credentials, Todo, User};
use starter_core::config::Config;
use starter_core::logging::init_tracing;
use starter_core::session::SessionManager;
use starter_core::settings::Settings;
use starter_core::storage::{FileStore, Storage};
use starter_core::todos::TodoService;

use cli::{Cli, Command};

struct App {
    config: Config,
    storage: Storage,
    api: ApiClient,
}

impl App {
    fn build(cli: &Cli) -> anyhow::Result<Self> {
        let base_url = cli.base_url.as_deref();
        let config = match &cli.config {
            Some(path) => Config::load_from(path, base_url),
            None => Config::load(base_url),
        }
        .context("Failed to load configuration")?;

        let storage = Storage::new(FileStore::new(config.storage_path()));
        let api = ApiClient::new(&config.api, storage.clone())?;
        tracing::debug!(base_url = %api.base_url(), "Client ready");

        Ok(Self {
            config,
            storage,
            api,
        })
    }

    fn sessions(&self) -> SessionManager {
        SessionManager::new(self.storage.clone(), Arc::new(self.api.clone()))
    }

    fn todos(&self) -> TodoService {
        TodoService::new(self.api.clone(), self.storage.clone())
    }

    /// Cached list, fetching it first if nothing is cached yet.
    async fn cached_todos(&self) -> anyhow::Result<TodoService> {
        let service = self.todos();
        if !service.load_cached().await {
            let state = service.refresh(None).await;
            if let Some(message) = state.error() {
                bail!("{}", message);
            }
        }
        Ok(service)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_directive());

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let message = match err.downcast_ref::<starter_core::Error>() {
                Some(err) => err.user_message(),
                None => format!("{:#}", err),
            };
            eprintln!("Error: {}", message);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let app = App::build(&cli)?;

    match cli.command {
        Command::Todos {
            user,
            limit,
            offline,
        } => {
            let service = app.todos();
            let has_cache = service.load_cached().await;
            if offline {
                if !has_cache {
                    println!("No cached todos.");
                    return Ok(());
                }
            } else {
                let state = service.refresh(user).await;
                if let Some(message) = state.error() {
                    if !has_cache {
                        bail!("{}", message);
                    }
                    eprintln!("Warning: {} (showing cached list)", message);
                }
            }

            let list = match user {
                Some(user_id) => service.list().owned_by(user_id),
                None => service.list(),
            };
            let limit = limit.unwrap_or(app.config.display.list_limit);
            for todo in list.visible(limit) {
                print_todo(todo);
            }
            println!(
                "Showing {} of {} ({} completed)",
                list.visible(limit).len(),
                list.len(),
                list.completed_count()
            );
        }

        Command::Todo { id } => print_todo(&app.api.todo(id).await?),

        Command::Users => {
            for user in app.api.users().await? {
                print_user(&user);
            }
        }

        Command::User { id } => print_user(&app.api.user(id).await?),

        Command::Toggle { id } => {
            let list = app.cached_todos().await?.toggle(id).await?;
            match list.get(id) {
                Some(todo) => print_todo(todo),
                None => bail!("No todo with id {}", id),
            }
        }

        Command::Add { title, user } => {
            let service = app.cached_todos().await?;
            let before = service.list().len();
            let list = service.add(title, user).await?;
            if list.len() == before {
                bail!("Title must not be empty");
            }
            if let Some(todo) = list.items().last() {
                print_todo(todo);
            }
        }

        Command::Remove { id } => {
            let service = app.cached_todos().await?;
            if service.list().get(id).is_none() {
                bail!("No todo with id {}", id);
            }
            service.remove(id).await?;
            println!("Removed todo {}", id);
        }

        Command::Login { username, password } => {
            let session = app
                .sessions()
                .login(&Credentials::new(username, password))
                .await?;
            println!(
                "Logged in as {} ({})",
                session.user.name, session.user.username
            );
        }

        Command::Logout => {
            let sessions = app.sessions();
            sessions.restore().await;
            sessions.logout().await;
            println!("Logged out.");
        }

        Command::Whoami => {
            let state = app.sessions().restore().await;
            match state.user() {
                Some(user) => print_user(user),
                None => println!("Not logged in."),
            }
        }

        Command::Theme { value } => {
            let mut settings = Settings::load(&app.storage).await;
            if let Some(value) = value {
                settings.theme = value.parse()?;
                settings.save(&app.storage).await?;
            }
            println!("{}", settings.theme);
        }
    }

    Ok(())
}

fn print_todo(todo: &Todo) {
    let mark = if todo.completed { "x" } else { " " };
    println!("[{}] {:>4}  {}", mark, todo.id, todo.title);
}

fn print_user(user: &User) {
    println!("{:>4}  {} <{}> @{}", user.id, user.name, user.email, user.username);
}
