mod cli;

use clap::Parser;
use cli::{Cli, Command, build_overrides};
use taskbot_core::config::{self, Config, ConfigOverrides};
use taskbot_core::dispatcher::Dispatcher;
use taskbot_core::error::AppError;
use taskbot_core::model::Task;
use taskbot_core::poller::Poller;
use taskbot_core::render;
use taskbot_core::task_api::TaskStore;
use taskbot_core::telegram::TelegramClient;
use tracing_subscriber::EnvFilter;

fn print_task_json(chat: i64, task: &Task) {
    let json = serde_json::json!({
        "chat": chat,
        "position": task.position,
        "text": task.text,
    });
    println!("{}", json);
}

fn print_tasks_json(chat: i64, tasks: &[Task]) {
    let payload: Vec<_> = tasks
        .iter()
        .map(|task| {
            serde_json::json!({
                "chat": chat,
                "position": task.position,
                "text": task.text,
            })
        })
        .collect();
    println!("{}", serde_json::Value::Array(payload));
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::validation(message)
}

/// File config, then environment, then `--config-override` flags.
fn resolve_config(cli: &Cli) -> Result<(Config, Option<AppError>), AppError> {
    let loaded = config::load_config_with_fallback();
    let from_env = config::merge_overrides(&loaded.config, &ConfigOverrides::from_env());
    let overrides = build_overrides(&cli.config_override).map_err(AppError::validation)?;
    Ok((config::merge_overrides(&from_env, &overrides), loaded.error))
}

fn init_logging(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_bot(config: &Config) -> Result<(), AppError> {
    config.validate()?;
    let store = TaskStore::new(config.store_path()?);
    let client = TelegramClient::new(config)?;

    tracing::info!(store = %store.path().display(), "using task store");

    let mut source = client.clone();
    let mut dispatcher = Dispatcher::new(store, client);
    Poller::from_config(config).run(&mut source, &mut dispatcher)
}

fn run_command(cli: &Cli, config: &Config) -> Result<(), AppError> {
    let store = || config.store_path().map(TaskStore::new);

    match &cli.command {
        Command::Run => run_bot(config)?,
        Command::Add { chat, text } => {
            let text = match text {
                Some(value) if !value.trim().is_empty() => value,
                _ => return Err(AppError::validation("task text is required")),
            };

            let task = store()?.add_task(*chat, text)?;
            if cli.json {
                print_task_json(*chat, &task);
            } else {
                println!("Added task {}: {}", task.position, task.text);
            }
        }
        Command::List { chat } => {
            let tasks = store()?.list_tasks(*chat)?;
            if cli.json {
                print_tasks_json(*chat, &tasks);
            } else {
                println!("{}", render::task_list(&tasks));
            }
        }
        Command::Delete { chat, position } => {
            let task = store()?.delete_task(*chat, *position)?;
            if cli.json {
                print_task_json(*chat, &task);
            } else {
                println!("Deleted task {}: {}", task.position, task.text);
            }
        }
        Command::Clear { chat } => {
            let removed = store()?.clear_tasks(*chat)?;
            if cli.json {
                println!("{}", serde_json::json!({ "chat": chat, "removed": removed }));
            } else {
                println!("{}", render::cleared(removed));
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => {
            // --help and --version
            let _ = err.print();
            return;
        }
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    let (config, config_error) = match resolve_config(&cli) {
        Ok(resolved) => resolved,
        Err(err) => {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
    };

    init_logging(&config);
    if let Some(err) = config_error {
        tracing::warn!(error = %err, "ignoring unreadable config file, using defaults");
    }

    if let Err(err) = run_command(&cli, &config) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
