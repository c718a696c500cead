use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name given to contacts created from the "add" action.
pub const PLACEHOLDER_NAME: &str = "New Contact";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    Name,
    Phone,
    Email,
    Address,
    Company,
    Notes,
}

impl ContactField {
    pub const ALL: [ContactField; 6] = [
        Self::Name,
        Self::Phone,
        Self::Email,
        Self::Address,
        Self::Company,
        Self::Notes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Phone => "phone",
            Self::Email => "email",
            Self::Address => "address",
            Self::Company => "company",
            Self::Notes => "notes",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Some(Self::Name),
            "phone" => Some(Self::Phone),
            "email" => Some(Self::Email),
            "address" => Some(Self::Address),
            "company" => Some(Self::Company),
            "notes" => Some(Self::Notes),
            _ => None,
        }
    }
}

impl std::fmt::Display for ContactField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One address-book entry.
///
/// The JSON shape is a flat object of strings; fields missing from a file
/// read back as empty, and unknown keys are ignored. PascalCase keys are
/// accepted on read so address books written by older desktop builds import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(alias = "Id")]
    pub id: Uuid,
    #[serde(default, alias = "Name")]
    pub name: String,
    #[serde(default, alias = "Phone")]
    pub phone: String,
    #[serde(default, alias = "Email")]
    pub email: String,
    #[serde(default, alias = "Address")]
    pub address: String,
    #[serde(default, alias = "Company")]
    pub company: String,
    #[serde(default, alias = "Notes")]
    pub notes: String,
}

impl Default for Contact {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl Contact {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            phone: String::new(),
            email: String::new(),
            address: String::new(),
            company: String::new(),
            notes: String::new(),
        }
    }

    /// Badge letter shown next to the contact. Never persisted.
    pub fn initial(&self) -> String {
        initial(&self.name)
    }

    /// Give this contact a fresh identity. Used when merging imported
    /// contacts so they cannot clash with existing ones.
    pub fn regenerate_id(&mut self) {
        self.id = Uuid::new_v4();
    }

    pub fn field(&self, field: ContactField) -> &str {
        match field {
            ContactField::Name => &self.name,
            ContactField::Phone => &self.phone,
            ContactField::Email => &self.email,
            ContactField::Address => &self.address,
            ContactField::Company => &self.company,
            ContactField::Notes => &self.notes,
        }
    }

    pub fn set_field(&mut self, field: ContactField, value: String) {
        let slot = match field {
            ContactField::Name => &mut self.name,
            ContactField::Phone => &mut self.phone,
            ContactField::Email => &mut self.email,
            ContactField::Address => &mut self.address,
            ContactField::Company => &mut self.company,
            ContactField::Notes => &mut self.notes,
        };
        *slot = value;
    }
}

/// First character of the trimmed name, uppercased, or `"?"` for a blank name.
pub fn initial(name: &str) -> String {
    match name.trim().chars().next() {
        Some(c) => c.to_uppercase().collect(),
        None => "?".to_string(),
    }
}
