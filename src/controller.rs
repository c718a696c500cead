use std::collections::HashSet;
use std::path::Path;

use thiserror::Error;
use uuid::Uuid;

use crate::config::Config;
use crate::core::contact::{Contact, ContactField, PLACEHOLDER_NAME};
use crate::message::{Command, ImportMode, Message, StateChange};
use crate::store::{ContactFile, LoadOutcome, StoreError};

const INITIAL_STATUS: &str = "Ready";

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("{0} is not available right now")]
    Unavailable(Command),
    #[error("no contact with id {0}")]
    UnknownContact(Uuid),
    #[error("unknown theme {0:?}")]
    UnknownTheme(String),
}

/// Result of `initialize`.
#[derive(Debug)]
pub struct LoadReport {
    pub count: usize,
    /// Set when the contacts file existed but could not be used.
    pub recovered: Option<StoreError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub mode: ImportMode,
    pub count: usize,
}

pub type SubscriptionId = usize;

type Listener = Box<dyn FnMut(&StateChange)>;

/// Owns the live contact list and the state derived from it.
///
/// All mutation goes through this type. Subscribers are called
/// synchronously, in subscription order, after each change.
pub struct ContactListController {
    store: ContactFile,
    contacts: Vec<Contact>,
    selected: Option<Uuid>,
    theme: String,
    themes: Vec<String>,
    status: String,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: SubscriptionId,
}

impl std::fmt::Debug for ContactListController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContactListController")
            .field("store", &self.store)
            .field("contacts", &self.contacts.len())
            .field("selected", &self.selected)
            .field("theme", &self.theme)
            .field("status", &self.status)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl ContactListController {
    pub fn new(store: ContactFile, theme: impl Into<String>, themes: Vec<String>) -> Self {
        Self {
            store,
            contacts: Vec::new(),
            selected: None,
            theme: theme.into(),
            themes,
            status: INITIAL_STATUS.to_string(),
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            ContactFile::from_config(config),
            config.theme.clone(),
            config.themes.clone(),
        )
    }

    // Queries

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn contact(&self, id: Uuid) -> Option<&Contact> {
        self.contacts.iter().find(|c| c.id == id)
    }

    pub fn selected(&self) -> Option<Uuid> {
        self.selected
    }

    pub fn selected_contact(&self) -> Option<&Contact> {
        self.selected.and_then(|id| self.contact(id))
    }

    pub fn status_message(&self) -> &str {
        &self.status
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    pub fn themes(&self) -> &[String] {
        &self.themes
    }

    pub fn store(&self) -> &ContactFile {
        &self.store
    }

    pub fn can_execute(&self, command: Command) -> bool {
        match command {
            Command::Add | Command::Save | Command::Import => true,
            Command::Delete => self.selected.is_some(),
            Command::Export => !self.contacts.is_empty(),
        }
    }

    // Subscriptions

    pub fn subscribe(&mut self, listener: impl FnMut(&StateChange) + 'static) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    // Operations

    /// Replace the list with whatever the canonical file holds.
    pub fn initialize(&mut self) -> LoadReport {
        let outcome = self.store.load();
        let recovered = match outcome {
            LoadOutcome::Loaded(contacts) => {
                self.contacts = with_unique_ids(contacts);
                None
            }
            LoadOutcome::Missing => {
                self.contacts.clear();
                None
            }
            LoadOutcome::Recovered(e) => {
                self.contacts.clear();
                Some(e)
            }
        };
        self.emit(StateChange::Contacts);
        self.set_selection(None);
        self.refresh_status();
        LoadReport {
            count: self.contacts.len(),
            recovered,
        }
    }

    /// Append a placeholder contact and select it.
    pub fn add(&mut self) -> Uuid {
        let contact = Contact::new(PLACEHOLDER_NAME);
        let id = contact.id;
        self.contacts.push(contact);
        log::debug!("Added contact {}", id);
        self.emit(StateChange::Contacts);
        self.set_selection(Some(id));
        self.refresh_status();
        id
    }

    /// Select a contact, or clear the selection. Unknown ids clear it.
    pub fn select(&mut self, id: Option<Uuid>) {
        let id = id.filter(|id| {
            let known = self.contacts.iter().any(|c| c.id == *id);
            if !known {
                log::debug!("Ignoring selection of unknown contact {}", id);
            }
            known
        });
        self.set_selection(id);
    }

    pub fn update_field(
        &mut self,
        id: Uuid,
        field: ContactField,
        value: impl Into<String>,
    ) -> Result<(), ControllerError> {
        let contact = self
            .contacts
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(ControllerError::UnknownContact(id))?;
        contact.set_field(field, value.into());
        self.emit(StateChange::Contacts);
        Ok(())
    }

    /// Remove the selected contact. `id` must be the current selection.
    pub fn delete(&mut self, id: Uuid) -> Result<Contact, ControllerError> {
        if self.selected != Some(id) {
            return Err(ControllerError::Unavailable(Command::Delete));
        }
        let index = self
            .contacts
            .iter()
            .position(|c| c.id == id)
            .ok_or(ControllerError::UnknownContact(id))?;
        let removed = self.contacts.remove(index);
        log::info!("Deleted contact {:?}", removed.name);
        self.emit(StateChange::Contacts);
        self.set_selection(None);
        self.refresh_status();
        Ok(removed)
    }

    pub fn save(&mut self) -> Result<(), ControllerError> {
        self.store.save(&self.contacts)?;
        let now = chrono::Local::now().format("%H:%M:%S");
        self.set_status(format!("Saved {} contacts - {}", self.contacts.len(), now));
        Ok(())
    }

    /// Write every contact to `path`. Returns how many were written.
    pub fn export_all(&self, path: &Path) -> Result<usize, ControllerError> {
        if !self.can_execute(Command::Export) {
            return Err(ControllerError::Unavailable(Command::Export));
        }
        self.store.export_to(path, &self.contacts)?;
        Ok(self.contacts.len())
    }

    pub fn import_from(
        &mut self,
        path: &Path,
        mode: ImportMode,
    ) -> Result<ImportSummary, ControllerError> {
        let imported = self.preview_import(path)?;
        Ok(self.apply_import(imported, mode))
    }

    /// Read an import file without touching the list.
    pub fn preview_import(&self, path: &Path) -> Result<Vec<Contact>, ControllerError> {
        Ok(self.store.import_from(path)?)
    }

    pub fn apply_import(&mut self, imported: Vec<Contact>, mode: ImportMode) -> ImportSummary {
        let count = imported.len();
        match mode {
            ImportMode::Replace => {
                self.contacts = with_unique_ids(imported);
                self.emit(StateChange::Contacts);
                self.set_selection(None);
            }
            ImportMode::Merge => {
                for mut contact in imported {
                    contact.regenerate_id();
                    while self.contacts.iter().any(|c| c.id == contact.id) {
                        contact.regenerate_id();
                    }
                    self.contacts.push(contact);
                }
                self.emit(StateChange::Contacts);
            }
        }
        log::info!("Imported {} contacts ({:?})", count, mode);
        self.refresh_status();
        ImportSummary { mode, count }
    }

    pub fn set_theme(&mut self, name: &str) -> Result<(), ControllerError> {
        if !self.themes.iter().any(|t| t == name) {
            return Err(ControllerError::UnknownTheme(name.to_string()));
        }
        log::debug!("Theme set to {}", name);
        self.theme = name.to_string();
        self.refresh_status();
        Ok(())
    }

    /// Dispatch a UI intent.
    pub fn update(&mut self, message: Message) -> Result<(), ControllerError> {
        match message {
            Message::Initialize => {
                self.initialize();
            }
            Message::Add => {
                self.add();
            }
            Message::Select(id) => self.select(id),
            Message::SetField(id, field, value) => self.update_field(id, field, value)?,
            Message::Delete(id) => {
                self.delete(id)?;
            }
            Message::Save => self.save()?,
            Message::Export(path) => {
                self.export_all(&path)?;
            }
            Message::Import(path, mode) => {
                self.import_from(&path, mode)?;
            }
            Message::SetTheme(name) => self.set_theme(&name)?,
        }
        Ok(())
    }

    fn set_selection(&mut self, id: Option<Uuid>) {
        self.selected = id;
        self.emit(StateChange::Selection(id));
    }

    fn refresh_status(&mut self) {
        let status = format!("{} contacts | Theme: {}", self.contacts.len(), self.theme);
        self.set_status(status);
    }

    fn set_status(&mut self, status: String) {
        self.status = status.clone();
        self.emit(StateChange::Status(status));
    }

    fn emit(&mut self, change: StateChange) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&change);
        }
    }
}

/// Keep ids as given, except that a repeated id gets a fresh one so every
/// row stays selectable.
fn with_unique_ids(mut contacts: Vec<Contact>) -> Vec<Contact> {
    let mut seen = HashSet::with_capacity(contacts.len());
    for contact in contacts.iter_mut() {
        while !seen.insert(contact.id) {
            log::warn!("Duplicate contact id {} for {:?}, assigning a new one", contact.id, contact.name);
            contact.regenerate_id();
        }
    }
    contacts
}
