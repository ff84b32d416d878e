//! Student records and the payloads used to create and edit them.

use crate::{error::Result, Error, RecordId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Suffix appended to the name of a cloned record.
pub const COPY_SUFFIX: &str = " (copy)";

/// One student in the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    /// Unique identifier, assigned by the store at creation
    #[serde(default)]
    pub id: RecordId,
    /// Full name
    #[serde(default)]
    pub name: String,
    /// Contact email
    #[serde(default)]
    pub email: String,
    /// Classification used for filtering and charting; may be empty
    #[serde(default)]
    pub major: String,
}

impl Student {
    /// Create a student from its parts.
    pub fn new(
        id: impl Into<RecordId>,
        name: impl Into<String>,
        email: impl Into<String>,
        major: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            major: major.into(),
        }
    }

    /// Build a record from a draft and an assigned id.
    pub fn from_draft(id: impl Into<RecordId>, draft: StudentDraft) -> Self {
        Self {
            id: id.into(),
            name: draft.name,
            email: draft.email,
            major: draft.major,
        }
    }

    /// The create payload matching this record (everything but the id).
    pub fn to_draft(&self) -> StudentDraft {
        StudentDraft {
            name: self.name.clone(),
            email: self.email.clone(),
            major: self.major.clone(),
        }
    }

    /// Read a field by sort key.
    pub fn field(&self, key: SortKey) -> &str {
        match key {
            SortKey::Name => &self.name,
            SortKey::Email => &self.email,
            SortKey::Major => &self.major,
        }
    }

    /// Merge a patch into this record. Fields left unset are untouched.
    pub fn apply_patch(&mut self, patch: &StudentPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(email) = &patch.email {
            self.email = email.clone();
        }
        if let Some(major) = &patch.major {
            self.major = major.clone();
        }
    }

    /// A copy of this record under a new id, its name marked as a duplicate.
    pub fn duplicate(&self, new_id: impl Into<RecordId>) -> Self {
        Self {
            id: new_id.into(),
            name: format!("{}{}", self.name, COPY_SUFFIX),
            email: self.email.clone(),
            major: self.major.clone(),
        }
    }
}

/// Payload for creating a student.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub major: String,
}

impl StudentDraft {
    /// Create a draft, trimming surrounding whitespace from every field.
    pub fn new(name: &str, email: &str, major: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            major: major.trim().to_string(),
        }
    }

    /// Check that `name` and `email` are present.
    pub fn validate(&self) -> Result<()> {
        require("name", &self.name)?;
        require("email", &self.email)
    }
}

/// Payload for editing a student. `None` leaves the field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major: Option<String>,
}

impl StudentPatch {
    /// Fields that are set must not blank out `name` or `email`.
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            require("name", name)?;
        }
        if let Some(email) = &self.email {
            require("email", email)?;
        }
        Ok(())
    }
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::MissingRequiredField(field.to_string()));
    }
    Ok(())
}

/// Field a view can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Name,
    Email,
    Major,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Email => "email",
            SortKey::Major => "major",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "email" => Ok(SortKey::Email),
            "major" => Ok(SortKey::Major),
            _ => Err(Error::InvalidSortSpec(s.to_string())),
        }
    }
}
