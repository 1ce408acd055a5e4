/// Ссылка на контакт: номер в загруженном списке (с 1) или имя
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactRef {
    Index(usize),
    Name(String),
}

/// Команда пользователя в консоли
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Call(String),
    CallContact(ContactRef),
    Contacts,
    Launch,
    Install,
    Refresh,
    Status,
    Log,
    Help,
    Quit,
    Empty,
}

pub const HELP: &str = "\
Commands:
  call <number>          call a phone number through Phone Link
  contact <n|name>       call a contact from the loaded list or by name
  contacts               load contacts
  launch                 launch Phone Link
  install                open the Microsoft Store page of Phone Link
  refresh                check the phone connection now
  status                 show connection status
  log                    show the activity log
  help                   show this help
  quit                   exit";

impl ConsoleCommand {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(ConsoleCommand::Empty);
        }

        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        match verb.to_lowercase().as_str() {
            "call" | "dial" => {
                if rest.is_empty() {
                    Err("Please enter a phone number".to_string())
                } else {
                    Ok(ConsoleCommand::Call(rest.to_string()))
                }
            }
            "contact" => {
                if rest.is_empty() {
                    return Err("Please choose a contact".to_string());
                }
                Ok(ConsoleCommand::CallContact(match rest.parse::<usize>() {
                    Ok(index) if index > 0 => ContactRef::Index(index),
                    _ => ContactRef::Name(rest.to_string()),
                }))
            }
            "contacts" => Ok(ConsoleCommand::Contacts),
            "launch" => Ok(ConsoleCommand::Launch),
            "install" => Ok(ConsoleCommand::Install),
            "refresh" => Ok(ConsoleCommand::Refresh),
            "status" => Ok(ConsoleCommand::Status),
            "log" => Ok(ConsoleCommand::Log),
            "help" | "?" => Ok(ConsoleCommand::Help),
            "quit" | "exit" => Ok(ConsoleCommand::Quit),
            other => Err(format!("Unknown command '{}'. Type 'help' for the list of commands", other)),
        }
    }
}
