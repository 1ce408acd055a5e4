use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
mod config;
mod error;
mod events;
mod services;
mod ui;
mod utils;

use config::{Config, LoggingConfig};
use services::probe::{CommandRunner, SystemCommandRunner};
use services::{
    create_contact_source, create_launcher, create_phone_detector, CallDispatcher,
    ConnectionMonitor, StatusTracker,
};
use ui::{ActionOutcome, Console, ConsoleCommand, ContactRef};

#[derive(Parser, Debug)]
#[command(name = "call-assistant")]
#[command(about = "Обнаруживает телефон, подключённый к Windows, и звонит через Phone Link")]
struct Args {
    /// Путь к файлу конфигурации
    #[arg(short, long, default_value = "call-assistant.toml")]
    config: String,

    /// Режим сухого запуска (без реальных действий)
    #[arg(long)]
    dry_run: bool,

    /// Уровень логирования (перекрывает logging.filter из конфигурации)
    #[arg(long)]
    log_level: Option<String>,

    /// Выполнить одно действие и выйти вместо интерактивной консоли
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Показать статус Phone Link и подключения телефона
    Status,
    /// Позвонить на номер
    Call { number: String },
    /// Позвонить контакту по имени
    CallContact { name: String },
    /// Запустить Phone Link
    Launch,
    /// Открыть страницу Phone Link в Microsoft Store
    Install,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Загрузка конфигурации
    let config = Config::load(&args.config)?;

    // Инициализация системы логирования
    init_tracing(args.log_level.as_deref(), &config.logging)?;

    info!("Запуск Phone Call Assistant v{}", env!("CARGO_PKG_VERSION"));
    info!("Конфигурация загружена из: {}", args.config);

    if args.dry_run {
        warn!("Режим сухого запуска - реальные действия отключены");
    }

    // Проверка платформы
    utils::ensure_supported_platform(args.dry_run)?;

    // Инициализация компонентов
    let runner: Arc<dyn CommandRunner> = Arc::new(SystemCommandRunner::new());
    let detector = Arc::new(create_phone_detector(&config, runner.clone(), args.dry_run));
    let dispatcher = CallDispatcher::new(&config, create_launcher(&config, runner, args.dry_run));
    let tracker = Arc::new(StatusTracker::new());
    let (events_tx, mut events_rx) = mpsc::channel(16);

    let mut console = Console::new(
        detector.clone(),
        tracker.clone(),
        dispatcher,
        create_contact_source(&config),
        events_tx.clone(),
        std::io::stdout(),
    );

    info!("Все компоненты инициализированы");

    if let Some(command) = args.command {
        if run_once(&mut console, command).await? == ActionOutcome::Failed {
            std::process::exit(1);
        }
        return Ok(());
    }

    console.initial_setup().await?;
    console.show_status_now().await?;

    let monitor_handle = if config.monitor.enabled {
        tracker.start_monitoring();
        Some(
            ConnectionMonitor::new(detector, tracker.clone(), config.poll_interval(), events_tx)
                .spawn(),
        )
    } else {
        warn!("Фоновый мониторинг отключён в конфигурации");
        None
    };

    let mut input = ui::spawn_stdin_reader();

    // Ожидание выхода из консоли или сигнала завершения
    tokio::select! {
        result = console.run(&mut events_rx, &mut input) => {
            if let Err(e) = result {
                error!("Ошибка в консоли: {}", e);
            }
        }
        result = signal::ctrl_c() => {
            match result {
                Ok(()) => info!("Получен сигнал завершения (Ctrl+C)"),
                Err(err) => error!("Ошибка при ожидании сигнала завершения: {}", err),
            }
        }
    }

    info!("Завершение работы...");
    tracker.stop_monitoring();

    if let Some(handle) = monitor_handle {
        // Опрос может висеть на внешней команде до её таймаута, поэтому прерываем задачу
        handle.abort();
        let shutdown_timeout = tokio::time::Duration::from_secs(5);
        match tokio::time::timeout(shutdown_timeout, handle).await {
            Ok(_) => info!("ConnectionMonitor остановлен"),
            Err(_) => warn!("Таймаут при остановке ConnectionMonitor"),
        }
    }

    info!("Phone Call Assistant завершил работу");
    Ok(())
}

async fn run_once<W: std::io::Write>(console: &mut Console<W>, command: Command) -> Result<ActionOutcome> {
    let outcome = match command {
        Command::Status => {
            console.initial_setup().await?;
            console.show_status_now().await?;
            ActionOutcome::Done
        }
        Command::Call { number } => console.handle_command(ConsoleCommand::Call(number)).await?,
        Command::CallContact { name } => {
            console
                .handle_command(ConsoleCommand::CallContact(ContactRef::Name(name)))
                .await?
        }
        Command::Launch => console.handle_command(ConsoleCommand::Launch).await?,
        Command::Install => console.handle_command(ConsoleCommand::Install).await?,
    };
    Ok(outcome)
}

fn init_tracing(level: Option<&str>, logging: &LoggingConfig) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    // RUST_LOG -> --log-level -> logging.filter -> logging.level
    let directive = match level {
        Some(level) => level,
        None if !logging.filter.is_empty() => logging.filter.as_str(),
        None => logging.level.as_str(),
    };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directive))?;

    let registry = tracing_subscriber::registry().with(filter);

    // Логи идут в stderr, stdout занят консолью
    match logging.format.as_str() {
        "full" => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        _ => registry
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init(),
    }

    Ok(())
}
