use crate::error::Result;
use crate::events::{ConnectionStatus, StatusEvent, StatusEventType};
use crate::services::{
    CallDispatcher, ConnectionMonitor, ContactSource, PhoneDetector, StatusTracker,
};
use std::io::{BufRead, Write};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::activity_log::ActivityLog;
use super::command::{ConsoleCommand, ContactRef, HELP};
use super::view::StatusView;

/// Результат одной пользовательской команды
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Done,
    Failed,
    Quit,
}

/// Консольный фронтенд. Владеет отображаемым состоянием и живёт в единственной
/// задаче: события статуса приходят сюда по каналу из ConnectionMonitor.
pub struct Console<W: Write> {
    detector: Arc<PhoneDetector>,
    tracker: Arc<StatusTracker>,
    dispatcher: CallDispatcher,
    contact_source: Arc<dyn ContactSource>,
    events: mpsc::Sender<StatusEvent>,
    view: StatusView,
    log: ActivityLog,
    contacts: Vec<String>,
    out: W,
}

impl<W: Write> Console<W> {
    pub fn new(
        detector: Arc<PhoneDetector>,
        tracker: Arc<StatusTracker>,
        dispatcher: CallDispatcher,
        contact_source: Arc<dyn ContactSource>,
        events: mpsc::Sender<StatusEvent>,
        out: W,
    ) -> Self {
        Self {
            detector,
            tracker,
            dispatcher,
            contact_source,
            events,
            view: StatusView::new(),
            log: ActivityLog::new(),
            contacts: Vec::new(),
            out,
        }
    }

    #[allow(dead_code)]
    pub fn view(&self) -> &StatusView {
        &self.view
    }

    #[allow(dead_code)]
    pub fn activity_log(&self) -> &ActivityLog {
        &self.log
    }

    #[allow(dead_code)]
    pub fn contacts(&self) -> &[String] {
        &self.contacts
    }

    #[allow(dead_code)]
    pub fn output(&self) -> &W {
        &self.out
    }

    fn note(&mut self, message: impl Into<String>) -> Result<()> {
        let line = self.log.push(message).to_string();
        writeln!(self.out, "{}", line)?;
        Ok(())
    }

    fn show(&mut self, message: &str) -> Result<()> {
        writeln!(self.out, "{}", message)?;
        Ok(())
    }

    fn show_view(&mut self) -> Result<()> {
        let rendered = self.view.render();
        self.show(&rendered)
    }

    /// Проверка установки Phone Link при старте
    pub async fn initial_setup(&mut self) -> Result<bool> {
        self.note("Checking Phone Link installation...")?;
        let installed = self.tracker.initial_installation_check(&self.detector).await;
        self.view.set_installed(installed);

        if installed {
            self.note("Phone Link is installed")?;
        } else {
            warn!("Phone Link не установлен");
            self.note("Phone Link is not installed")?;
            self.show(
                "Windows Phone Link is not installed.\n\n\
                 Type 'install' to open Microsoft Store and install it.\n\n\
                 Phone Link is required for this application to work.",
            )?;
        }

        Ok(installed)
    }

    /// Синхронный опрос подключения с немедленным выводом
    pub async fn show_status_now(&mut self) -> Result<ConnectionStatus> {
        self.note("Checking phone connection...")?;
        let status = self.detector.detect_connection().await;
        self.tracker.record(status);
        self.apply_event(StatusEvent::refreshed(status))?;
        Ok(status)
    }

    pub fn apply_event(&mut self, event: StatusEvent) -> Result<()> {
        debug!("Консоль получила событие: {}", event);
        let changed = self.view.apply(event.status);

        if !changed && event.event_type == StatusEventType::ConnectionChanged {
            return Ok(());
        }

        match event.status.connection_type() {
            Some(kind) => self.note(format!("Phone detected via {}", kind))?,
            None => self.note("No phone connection detected")?,
        }
        self.show_view()
    }

    pub async fn handle_line(&mut self, line: &str) -> Result<ActionOutcome> {
        match ConsoleCommand::parse(line) {
            Ok(command) => self.handle_command(command).await,
            Err(message) => {
                self.show(&message)?;
                Ok(ActionOutcome::Failed)
            }
        }
    }

    pub async fn handle_command(&mut self, command: ConsoleCommand) -> Result<ActionOutcome> {
        match command {
            ConsoleCommand::Call(number) => self.call_number(&number).await,
            ConsoleCommand::CallContact(contact) => self.call_contact(contact).await,
            ConsoleCommand::Contacts => self.load_contacts().await,
            ConsoleCommand::Launch => self.launch_phone_link().await,
            ConsoleCommand::Install => self.install_phone_link().await,
            ConsoleCommand::Refresh => {
                self.note("Checking phone connection...")?;
                // Результат придёт событием Refreshed через канал
                let _ = ConnectionMonitor::refresh_now(
                    self.detector.clone(),
                    self.tracker.clone(),
                    self.events.clone(),
                );
                Ok(ActionOutcome::Done)
            }
            ConsoleCommand::Status => {
                self.show_view()?;
                Ok(ActionOutcome::Done)
            }
            ConsoleCommand::Log => {
                let rendered = self.log.render();
                self.show(&rendered)?;
                Ok(ActionOutcome::Done)
            }
            ConsoleCommand::Help => {
                self.show(HELP)?;
                Ok(ActionOutcome::Done)
            }
            ConsoleCommand::Quit => Ok(ActionOutcome::Quit),
            ConsoleCommand::Empty => Ok(ActionOutcome::Done),
        }
    }

    async fn call_number(&mut self, number: &str) -> Result<ActionOutcome> {
        self.note(format!("Calling {}...", number))?;

        match self.dispatcher.call_number(number).await {
            Ok(accepted) => {
                info!("Запрос на звонок принят ОС: {}", accepted.uri);
                self.note(format!("Call initiated to {}", number))?;
                self.show(&format!(
                    "Calling {}...\nPhone Link should open to handle the call.",
                    number
                ))?;
                Ok(ActionOutcome::Done)
            }
            Err(e) => {
                error!("Не удалось позвонить на {}: {}", number, e);
                self.note(format!("Failed to call {}", number))?;
                self.show(&format!("Failed to call {}: {}", number, e))?;
                Ok(ActionOutcome::Failed)
            }
        }
    }

    async fn call_contact(&mut self, contact: ContactRef) -> Result<ActionOutcome> {
        let name = match contact {
            ContactRef::Name(name) => name,
            ContactRef::Index(index) => match index.checked_sub(1).and_then(|i| self.contacts.get(i)) {
                Some(name) => name.clone(),
                None => {
                    self.show(&format!(
                        "No contact #{} in the list ({} loaded). Type 'contacts' first",
                        index,
                        self.contacts.len()
                    ))?;
                    return Ok(ActionOutcome::Failed);
                }
            },
        };

        self.note(format!("Calling {}...", name))?;

        match self.dispatcher.call_contact(&name).await {
            Ok(accepted) => {
                info!("Запрос на звонок контакту принят ОС: {}", accepted.uri);
                self.note(format!("Call initiated to {}", name))?;
                Ok(ActionOutcome::Done)
            }
            Err(e) => {
                error!("Не удалось позвонить контакту {}: {}", name, e);
                self.note(format!("Failed to call {}", name))?;
                self.show(&format!("Failed to call {}", name))?;
                Ok(ActionOutcome::Failed)
            }
        }
    }

    async fn load_contacts(&mut self) -> Result<ActionOutcome> {
        self.note("Loading contacts...")?;
        self.contacts.clear();

        let contacts = match self.contact_source.load().await {
            Ok(contacts) => contacts,
            Err(e) => {
                warn!("Не удалось загрузить контакты: {}", e);
                Vec::new()
            }
        };

        if contacts.is_empty() {
            self.note("Note: Full contact access requires Phone Link to be running and phone to be paired.")?;
            self.note("Could not access contacts directly. Use Phone Link to view contacts.")?;
            self.show(
                "Direct contact access is limited.\n\n\
                 Please use Phone Link to view your contacts, or enter phone numbers manually.",
            )?;
            return Ok(ActionOutcome::Done);
        }

        self.contacts = contacts;
        let listing = self
            .contacts
            .iter()
            .enumerate()
            .map(|(i, name)| format!("{:>3}. {}", i + 1, name))
            .collect::<Vec<_>>()
            .join("\n");
        self.show(&listing)?;
        self.note(format!("Loaded {} contacts", self.contacts.len()))?;
        Ok(ActionOutcome::Done)
    }

    async fn launch_phone_link(&mut self) -> Result<ActionOutcome> {
        self.note("Launching Phone Link...")?;

        match self.dispatcher.launch_app().await {
            Ok(_) => {
                self.note("Phone Link launched successfully")?;
                self.show("Phone Link has been launched.\n\nPlease pair your phone if not already done.")?;
                Ok(ActionOutcome::Done)
            }
            Err(e) => {
                error!("Не удалось запустить Phone Link: {}", e);
                self.note("Failed to launch Phone Link")?;
                self.show("Failed to launch Phone Link.\n\nPlease install it from Microsoft Store.")?;
                Ok(ActionOutcome::Failed)
            }
        }
    }

    async fn install_phone_link(&mut self) -> Result<ActionOutcome> {
        self.note("Opening Microsoft Store to install Phone Link...")?;

        match self.dispatcher.open_store().await {
            Ok(_) => {
                self.note("Microsoft Store opened")?;
                self.show(
                    "Microsoft Store has been opened.\n\n\
                     Please install 'Phone Link' from the Store.\n\n\
                     After installation, restart this application.",
                )?;
                Ok(ActionOutcome::Done)
            }
            Err(e) => {
                error!("Не удалось открыть Microsoft Store: {}", e);
                self.note("Failed to open Microsoft Store")?;
                Ok(ActionOutcome::Failed)
            }
        }
    }

    /// Главный цикл: события статуса и строки ввода обрабатываются по очереди
    pub async fn run(
        &mut self,
        events: &mut mpsc::Receiver<StatusEvent>,
        input: &mut mpsc::Receiver<String>,
    ) -> Result<()> {
        info!("Консоль запущена");
        self.show("Type 'help' for the list of commands")?;

        loop {
            tokio::select! {
                Some(event) = events.recv() => {
                    self.apply_event(event)?;
                }
                line = input.recv() => {
                    let Some(line) = line else {
                        debug!("Ввод закрыт");
                        break;
                    };
                    if self.handle_line(&line).await? == ActionOutcome::Quit {
                        break;
                    }
                }
            }
            self.out.flush()?;
        }

        info!("Консоль завершила работу");
        Ok(())
    }
}

/// Читает stdin в отдельном потоке ОС: блокирующее чтение нельзя отменить,
/// поэтому поток не присоединяется и завершается вместе с процессом
pub fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);

    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });

    rx
}
