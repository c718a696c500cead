//! Command execution on top of the controller.
//!
//! A front-end supplies the three collaborators (file picker, yes/no/cancel
//! prompt, notifier) and calls [`Shell::execute`] for each command the user
//! triggers. The shell asks the controller whether the command can run,
//! gathers whatever input the command needs, and reports the result.

use std::path::PathBuf;

use crate::controller::ContactListController;
use crate::message::{Command, ImportMode};

pub const DEFAULT_EXPORT_NAME: &str = "contacts.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
    Cancel,
}

pub trait FilePicker {
    /// Choose an existing file to read. `None` means cancelled.
    fn open_file(&mut self) -> Option<PathBuf>;
    /// Choose a destination file. `None` means cancelled.
    fn save_file(&mut self, suggested_name: &str) -> Option<PathBuf>;
}

pub trait Prompt {
    fn ask(&mut self, title: &str, text: &str) -> Answer;
}

pub trait Notifier {
    fn info(&mut self, title: &str, text: &str);
    fn error(&mut self, title: &str, text: &str);
}

/// How a command run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// `can_execute` was false.
    Disabled,
    /// The user backed out of a picker or prompt.
    Cancelled,
    /// The operation failed; the message was shown to the user.
    Failed(String),
}

pub struct Shell<'a, P, Q, N> {
    pub controller: &'a mut ContactListController,
    pub picker: P,
    pub prompt: Q,
    pub notifier: N,
}

impl<'a, P: FilePicker, Q: Prompt, N: Notifier> Shell<'a, P, Q, N> {
    pub fn new(controller: &'a mut ContactListController, picker: P, prompt: Q, notifier: N) -> Self {
        Self {
            controller,
            picker,
            prompt,
            notifier,
        }
    }

    pub fn execute(&mut self, command: Command) -> Outcome {
        if !self.controller.can_execute(command) {
            log::debug!("{} is disabled", command);
            return Outcome::Disabled;
        }
        match command {
            Command::Add => {
                self.controller.add();
                Outcome::Done
            }
            Command::Delete => self.delete(),
            Command::Save => self.save(),
            Command::Import => self.import(),
            Command::Export => self.export(),
        }
    }

    fn delete(&mut self) -> Outcome {
        let Some(contact) = self.controller.selected_contact() else {
            return Outcome::Disabled;
        };
        let (id, text) = (
            contact.id,
            format!("Are you sure you want to delete '{}'?", contact.name),
        );
        if self.prompt.ask("Confirm Delete", &text) != Answer::Yes {
            return Outcome::Cancelled;
        }
        match self.controller.delete(id) {
            Ok(_) => Outcome::Done,
            Err(e) => self.fail(format!("Error deleting contact: {}", e)),
        }
    }

    fn save(&mut self) -> Outcome {
        match self.controller.save() {
            Ok(()) => Outcome::Done,
            Err(e) => self.fail(format!("Error saving contacts: {}", e)),
        }
    }

    fn export(&mut self) -> Outcome {
        let Some(path) = self.picker.save_file(DEFAULT_EXPORT_NAME) else {
            return Outcome::Cancelled;
        };
        match self.controller.export_all(&path) {
            Ok(count) => {
                self.notifier.info(
                    "Export Complete",
                    &format!("Successfully exported {} contacts.", count),
                );
                Outcome::Done
            }
            Err(e) => self.fail(format!("Error exporting contacts: {}", e)),
        }
    }

    fn import(&mut self) -> Outcome {
        let Some(path) = self.picker.open_file() else {
            return Outcome::Cancelled;
        };
        let imported = match self.controller.preview_import(&path) {
            Ok(contacts) => contacts,
            Err(e) => return self.fail(format!("Error importing contacts: {}", e)),
        };
        let text = format!(
            "Found {} contacts. Replace existing contacts or add to them?",
            imported.len()
        );
        let mode = match self.prompt.ask("Import Contacts", &text) {
            Answer::Yes => ImportMode::Replace,
            Answer::No => ImportMode::Merge,
            Answer::Cancel => return Outcome::Cancelled,
        };
        self.controller.apply_import(imported, mode);
        Outcome::Done
    }

    fn fail(&mut self, text: String) -> Outcome {
        log::error!("{}", text);
        self.notifier.error("Error", &text);
        Outcome::Failed(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::contact::{Contact, ContactField};
    use crate::store::ContactFile;
    use std::collections::VecDeque;
    use std::path::Path;

    #[derive(Default)]
    struct Script {
        paths: VecDeque<Option<PathBuf>>,
        answers: VecDeque<Answer>,
        asked: Vec<String>,
        infos: Vec<String>,
        errors: Vec<String>,
    }

    struct Fake<'s>(&'s std::cell::RefCell<Script>);

    impl FilePicker for Fake<'_> {
        fn open_file(&mut self) -> Option<PathBuf> {
            self.0.borrow_mut().paths.pop_front().flatten()
        }
        fn save_file(&mut self, suggested_name: &str) -> Option<PathBuf> {
            assert_eq!(suggested_name, DEFAULT_EXPORT_NAME);
            self.0.borrow_mut().paths.pop_front().flatten()
        }
    }

    impl Prompt for Fake<'_> {
        fn ask(&mut self, _title: &str, text: &str) -> Answer {
            let mut script = self.0.borrow_mut();
            script.asked.push(text.to_string());
            script.answers.pop_front().unwrap_or(Answer::Cancel)
        }
    }

    impl Notifier for Fake<'_> {
        fn info(&mut self, _title: &str, text: &str) {
            self.0.borrow_mut().infos.push(text.to_string());
        }
        fn error(&mut self, _title: &str, text: &str) {
            self.0.borrow_mut().errors.push(text.to_string());
        }
    }

    fn controller(dir: &Path) -> ContactListController {
        ContactListController::new(ContactFile::new(dir), "Light", vec!["Light".into()])
    }

    fn run(
        controller: &mut ContactListController,
        script: &std::cell::RefCell<Script>,
        command: Command,
    ) -> Outcome {
        Shell::new(controller, Fake(script), Fake(script), Fake(script)).execute(command)
    }

    #[test]
    fn disabled_commands_do_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut c = controller(dir.path());
        let script = std::cell::RefCell::new(Script::default());
        assert_eq!(run(&mut c, &script, Command::Delete), Outcome::Disabled);
        assert_eq!(run(&mut c, &script, Command::Export), Outcome::Disabled);
        assert!(script.borrow().asked.is_empty());
    }

    #[test]
    fn delete_asks_first() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut c = controller(dir.path());
        let script = std::cell::RefCell::new(Script::default());
        run(&mut c, &script, Command::Add);

        script.borrow_mut().answers.push_back(Answer::No);
        assert_eq!(run(&mut c, &script, Command::Delete), Outcome::Cancelled);
        assert_eq!(c.len(), 1);
        assert_eq!(
            script.borrow().asked[0],
            "Are you sure you want to delete 'New Contact'?"
        );

        script.borrow_mut().answers.push_back(Answer::Yes);
        assert_eq!(run(&mut c, &script, Command::Delete), Outcome::Done);
        assert!(c.is_empty());
    }

    #[test]
    fn export_reports_count() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut c = controller(dir.path());
        c.add();
        c.add();
        let script = std::cell::RefCell::new(Script::default());

        script.borrow_mut().paths.push_back(None);
        assert_eq!(run(&mut c, &script, Command::Export), Outcome::Cancelled);

        let out = dir.path().join("out.json");
        script.borrow_mut().paths.push_back(Some(out.clone()));
        assert_eq!(run(&mut c, &script, Command::Export), Outcome::Done);
        assert!(out.exists());
        assert_eq!(script.borrow().infos, vec!["Successfully exported 2 contacts."]);
    }

    #[test]
    fn export_failure_is_shown() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut c = controller(dir.path());
        c.add();
        let script = std::cell::RefCell::new(Script::default());
        script
            .borrow_mut()
            .paths
            .push_back(Some(dir.path().join("missing").join("out.json")));
        let outcome = run(&mut c, &script, Command::Export);
        assert!(matches!(outcome, Outcome::Failed(_)));
        assert!(script.borrow().errors[0].starts_with("Error exporting contacts: "));
    }

    #[test]
    fn import_prompt_picks_mode() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut c = controller(dir.path());
        let kept = c.add();
        c.update_field(kept, ContactField::Name, "Kept").unwrap();

        let file = dir.path().join("in.json");
        let incoming = vec![Contact::new("One"), Contact::new("Two")];
        c.store().export_to(&file, &incoming).unwrap();
        let script = std::cell::RefCell::new(Script::default());

        // Cancel leaves everything alone.
        script.borrow_mut().paths.push_back(Some(file.clone()));
        script.borrow_mut().answers.push_back(Answer::Cancel);
        assert_eq!(run(&mut c, &script, Command::Import), Outcome::Cancelled);
        assert_eq!(c.len(), 1);
        assert_eq!(
            script.borrow().asked[0],
            "Found 2 contacts. Replace existing contacts or add to them?"
        );

        // No merges.
        script.borrow_mut().paths.push_back(Some(file.clone()));
        script.borrow_mut().answers.push_back(Answer::No);
        assert_eq!(run(&mut c, &script, Command::Import), Outcome::Done);
        assert_eq!(c.len(), 3);
        assert_ne!(c.contacts()[1].id, incoming[0].id);

        // Yes replaces.
        script.borrow_mut().paths.push_back(Some(file));
        script.borrow_mut().answers.push_back(Answer::Yes);
        assert_eq!(run(&mut c, &script, Command::Import), Outcome::Done);
        assert_eq!(c.contacts(), incoming.as_slice());
    }

    #[test]
    fn import_errors_are_shown_and_nothing_is_asked() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut c = controller(dir.path());
        let script = std::cell::RefCell::new(Script::default());
        script
            .borrow_mut()
            .paths
            .push_back(Some(dir.path().join("nope.json")));
        assert!(matches!(
            run(&mut c, &script, Command::Import),
            Outcome::Failed(_)
        ));
        assert!(script.borrow().asked.is_empty());
        assert!(script.borrow().errors[0].starts_with("Error importing contacts: file not found"));
    }

    #[test]
    fn save_failure_is_shown() {
        let dir = tempfile::tempdir().expect("tempdir");
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();
        let mut c = controller(&blocker);
        let script = std::cell::RefCell::new(Script::default());
        assert!(matches!(
            run(&mut c, &script, Command::Save),
            Outcome::Failed(_)
        ));
        assert!(script.borrow().errors[0].starts_with("Error saving contacts: "));
    }
}
