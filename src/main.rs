use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use rolodex::shell::{Answer, FilePicker, Notifier, Outcome, Prompt, Shell};
use rolodex::{Command, Config, ContactField, ContactListController, StateChange};

const HELP: &str = "\
Commands:
  list                  show all contacts
  show                  show the selected contact
  select <n>            select contact number n (no number clears)
  set <field> <value>   edit the selected contact (name, phone, email, address, company, notes)
  add | delete | save | import | export
  theme [name]          list themes or switch theme
  quit";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = Config::default_path();
    let mut config = Config::load_or_default(&config_path);

    init_logging(config.debug_logging);

    if let Err(e) = config.ensure_dirs() {
        log::error!("Cannot create {}: {}", config.data_directory.display(), e);
    }

    let mut controller = ContactListController::from_config(&config);
    controller.subscribe(|change| {
        if let StateChange::Status(status) = change {
            println!("[{}]", status);
        }
    });

    let report = controller.initialize();
    if let Some(e) = report.recovered {
        eprintln!("Could not read saved contacts ({}); starting with an empty list.", e);
    }

    println!("{}", HELP);
    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();

        match verb {
            "" => {}
            "quit" | "exit" => break,
            "help" => println!("{}", HELP),
            "list" => list(&controller),
            "show" => show(&controller),
            "select" => {
                let id = rest
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| controller.contacts().get(i))
                    .map(|c| c.id);
                if id.is_none() && !rest.is_empty() {
                    println!("No contact number {}", rest);
                }
                controller.select(id);
            }
            "set" => {
                let (field, value) = rest.split_once(' ').unwrap_or((rest, ""));
                match (ContactField::from_name(field), controller.selected()) {
                    (Some(field), Some(id)) => {
                        if let Err(e) = controller.update_field(id, field, value.trim()) {
                            println!("{}", e);
                        }
                    }
                    (None, _) => println!("Unknown field {:?}", field),
                    (_, None) => println!("Select a contact first"),
                }
            }
            "theme" if rest.is_empty() => {
                for theme in controller.themes() {
                    let mark = if theme == controller.theme() { "*" } else { " " };
                    println!(" {} {}", mark, theme);
                }
            }
            "theme" => match controller.set_theme(rest) {
                Ok(()) => {
                    config.theme = rest.to_string();
                    if let Err(e) = config.save(&config_path) {
                        log::error!("Failed to save config: {}", e);
                    }
                }
                Err(e) => println!("{}", e),
            },
            other => match parse_command(other) {
                Some(command) => {
                    let outcome = Shell::new(&mut controller, Console, Console, Console)
                        .execute(command);
                    match outcome {
                        Outcome::Disabled => println!("{} is not available right now", command),
                        Outcome::Cancelled => println!("Cancelled"),
                        Outcome::Done | Outcome::Failed(_) => {}
                    }
                }
                None => println!("Unknown command {:?}; try `help`", other),
            },
        }
    }

    Ok(())
}

fn parse_command(verb: &str) -> Option<Command> {
    Command::ALL
        .into_iter()
        .find(|c| c.label().eq_ignore_ascii_case(verb))
}

fn list(controller: &ContactListController) {
    if controller.is_empty() {
        println!("(no contacts)");
    }
    for (i, contact) in controller.contacts().iter().enumerate() {
        let mark = if controller.selected() == Some(contact.id) { ">" } else { " " };
        println!("{}{:>3}. [{}] {}", mark, i + 1, contact.initial(), contact.name);
    }
}

fn show(controller: &ContactListController) {
    let Some(contact) = controller.selected_contact() else {
        println!("Nothing selected");
        return;
    };
    println!("id: {}", contact.id);
    for field in ContactField::ALL {
        println!("{}: {}", field, contact.field(field));
    }
}

/// Collaborators backed by stdin/stdout.
#[derive(Clone, Copy)]
struct Console;

impl Console {
    fn read_answer(question: &str) -> Option<String> {
        print!("{} ", question);
        io::stdout().flush().ok()?;
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }

    fn read_path(question: &str) -> Option<PathBuf> {
        Self::read_answer(question)
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
    }
}

impl FilePicker for Console {
    fn open_file(&mut self) -> Option<PathBuf> {
        Self::read_path("File to import (empty to cancel):")
    }

    fn save_file(&mut self, suggested_name: &str) -> Option<PathBuf> {
        let answer = Self::read_answer(&format!("Export to [{}] (`-` to cancel):", suggested_name))?;
        match answer.as_str() {
            "-" => None,
            "" => Some(PathBuf::from(suggested_name)),
            path => Some(PathBuf::from(path)),
        }
    }
}

impl Prompt for Console {
    fn ask(&mut self, title: &str, text: &str) -> Answer {
        let answer = Self::read_answer(&format!("{}: {} [y/n/c]", title, text));
        match answer.as_deref().map(str::to_ascii_lowercase).as_deref() {
            Some("y") | Some("yes") => Answer::Yes,
            Some("n") | Some("no") => Answer::No,
            _ => Answer::Cancel,
        }
    }
}

impl Notifier for Console {
    fn info(&mut self, title: &str, text: &str) {
        println!("{}: {}", title, text);
    }

    fn error(&mut self, title: &str, text: &str) {
        eprintln!("{}: {}", title, text);
    }
}

/// Log to the systemd user journal (`journalctl --user -t rolodex -f`).
/// Rolodex targets log at info (debug when enabled in config), everything else at warn.
fn init_logging(debug: bool) {
    struct FilteredJournal {
        inner: systemd_journal_logger::JournalLog,
    }

    impl log::Log for FilteredJournal {
        fn enabled(&self, metadata: &log::Metadata) -> bool {
            if metadata.target().starts_with("rolodex") {
                let max = if rolodex::debug_logging() {
                    log::LevelFilter::Debug
                } else {
                    log::LevelFilter::Info
                };
                metadata.level() <= max
            } else {
                metadata.level() <= log::LevelFilter::Warn
            }
        }
        fn log(&self, record: &log::Record) {
            if self.enabled(record.metadata()) {
                self.inner.log(record);
            }
        }
        fn flush(&self) {
            self.inner.flush();
        }
    }

    rolodex::set_debug_logging(debug);

    let journal = match systemd_journal_logger::JournalLog::new() {
        Ok(journal) => journal.with_syslog_identifier("rolodex".to_string()),
        Err(e) => {
            eprintln!("Journal logging unavailable: {}", e);
            return;
        }
    };

    if log::set_boxed_logger(Box::new(FilteredJournal { inner: journal })).is_ok() {
        // Global max must be Debug so debug logs can pass through when toggled
        log::set_max_level(log::LevelFilter::Debug);
    }
}
