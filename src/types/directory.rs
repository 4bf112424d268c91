use serde::de::Error;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::errors::ValidationError;

/// Group label used for entries whose building is blank.
pub const UNSPECIFIED_BUILDING: &str = "อื่นๆ";

/// Display text for entries with a blank department.
pub const UNNAMED_DEPARTMENT: &str = "ไม่ระบุชื่อแผนก";

/// Display text for entries with a blank number.
pub const MISSING_NUMBER: &str = "-";

/// One directory record: a department in a building and its extension(s).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneEntry {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub building: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub department: String,
    /// Free-form; may hold several `/`-separated alternates.
    #[serde(default, deserialize_with = "deserialize_text")]
    pub number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl PhoneEntry {
    /// Building name used for grouping: blank buildings fall into [`UNSPECIFIED_BUILDING`].
    pub fn building_label(&self) -> &str {
        if self.building.is_empty() {
            UNSPECIFIED_BUILDING
        } else {
            &self.building
        }
    }

    pub fn department_label(&self) -> &str {
        if self.department.is_empty() {
            UNNAMED_DEPARTMENT
        } else {
            &self.department
        }
    }

    pub fn number_label(&self) -> &str {
        if self.number.is_empty() {
            MISSING_NUMBER
        } else {
            &self.number
        }
    }
}

/// Accepts string or numeric primary keys; the remote column may be either.
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(Error::custom(format!("invalid entry id: {}", other))),
    }
}

/// Treats `null` text columns as empty strings.
fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Editable fields of an entry, as held by the add/edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryDraft {
    pub building: String,
    pub department: String,
    pub number: String,
}

impl EntryDraft {
    pub fn new(building: &str, department: &str, number: &str) -> Self {
        Self {
            building: building.to_string(),
            department: department.to_string(),
            number: number.to_string(),
        }
    }

    /// Checks that all three fields are filled in.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.department.is_empty() {
            return Err(ValidationError::MissingField("department"));
        }
        if self.number.is_empty() {
            return Err(ValidationError::MissingField("number"));
        }
        if self.building.is_empty() {
            return Err(ValidationError::MissingField("building"));
        }
        Ok(())
    }

    pub fn set(&mut self, field: EntryField, value: &str) {
        match field {
            EntryField::Building => self.building = value.to_string(),
            EntryField::Department => self.department = value.to_string(),
            EntryField::Number => self.number = value.to_string(),
        }
    }
}

impl From<&PhoneEntry> for EntryDraft {
    fn from(entry: &PhoneEntry) -> Self {
        Self {
            building: entry.building.clone(),
            department: entry.department.clone(),
            number: entry.number.clone(),
        }
    }
}

/// A form field addressable by name from the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryField {
    Building,
    Department,
    Number,
}

impl EntryField {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "building" => Some(EntryField::Building),
            "department" => Some(EntryField::Department),
            "number" => Some(EntryField::Number),
            _ => None,
        }
    }
}

/// A user-facing message queued by the controller for the presentation to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Error,
}
