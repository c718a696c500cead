use std::path::PathBuf;

use uuid::Uuid;

use crate::core::contact::ContactField;

/// User-facing commands. Each has a can-execute rule on the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Add,
    Delete,
    Save,
    Import,
    Export,
}

impl Command {
    pub const ALL: [Command; 5] = [
        Self::Add,
        Self::Delete,
        Self::Save,
        Self::Import,
        Self::Export,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Add => "Add",
            Self::Delete => "Delete",
            Self::Save => "Save",
            Self::Import => "Import",
            Self::Export => "Export",
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    /// Discard current contacts and keep imported ids.
    Replace,
    /// Append imported contacts under fresh ids.
    Merge,
}

/// Intents a UI sends to the controller.
#[derive(Debug, Clone)]
pub enum Message {
    Initialize,
    Add,
    Select(Option<Uuid>),
    SetField(Uuid, ContactField, String),
    Delete(Uuid),
    Save,
    Export(PathBuf),
    Import(PathBuf, ImportMode),
    SetTheme(String),
}

/// Observable change announced to subscribers after a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateChange {
    /// The collection changed structurally or a contact was edited.
    Contacts,
    Selection(Option<Uuid>),
    Status(String),
}
