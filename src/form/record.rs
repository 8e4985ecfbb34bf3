use std::{fmt, str::FromStr};

use crate::foundation::error::{CvError, CvResult};

/// Flat record of user-entered résumé fields.
///
/// Every field is a plain string defaulting to empty. Only presence matters: the record carries
/// no validation, ordering or referential constraints.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeRecord {
    /// Given name (required for export).
    pub first_name: String,
    /// Family name (required for export).
    pub last_name: String,
    /// Professional title.
    pub title: String,
    /// Contact email.
    pub email: String,
    /// Contact phone number.
    pub phone: String,
    /// Postal address or city.
    pub address: String,
    /// Free-text professional experience; line breaks are preserved.
    pub experience: String,
    /// Free-text education; line breaks are preserved.
    pub education: String,
    /// Newline-delimited skills list.
    pub skills: String,
}

/// Names one [`ResumeRecord`] field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    /// [`ResumeRecord::first_name`].
    FirstName,
    /// [`ResumeRecord::last_name`].
    LastName,
    /// [`ResumeRecord::title`].
    Title,
    /// [`ResumeRecord::email`].
    Email,
    /// [`ResumeRecord::phone`].
    Phone,
    /// [`ResumeRecord::address`].
    Address,
    /// [`ResumeRecord::experience`].
    Experience,
    /// [`ResumeRecord::education`].
    Education,
    /// [`ResumeRecord::skills`].
    Skills,
}

impl Field {
    /// All fields in form order.
    pub const ALL: [Field; 9] = [
        Field::FirstName,
        Field::LastName,
        Field::Title,
        Field::Email,
        Field::Phone,
        Field::Address,
        Field::Experience,
        Field::Education,
        Field::Skills,
    ];

    /// Fields the form marks as required.
    pub const REQUIRED: [Field; 3] = [Field::FirstName, Field::LastName, Field::Title];

    /// Serialized (camelCase) field name.
    pub fn name(self) -> &'static str {
        match self {
            Field::FirstName => "firstName",
            Field::LastName => "lastName",
            Field::Title => "title",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::Address => "address",
            Field::Experience => "experience",
            Field::Education => "education",
            Field::Skills => "skills",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = CvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Field::ALL
            .into_iter()
            .find(|f| f.name().to_ascii_lowercase() == key)
            .ok_or_else(|| CvError::validation(format!("unknown field '{s}'")))
    }
}

impl ResumeRecord {
    /// Borrow the value of `field`.
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::FirstName => &self.first_name,
            Field::LastName => &self.last_name,
            Field::Title => &self.title,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
            Field::Address => &self.address,
            Field::Experience => &self.experience,
            Field::Education => &self.education,
            Field::Skills => &self.skills,
        }
    }

    /// Replace the value of `field`, leaving every other field untouched.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::FirstName => &mut self.first_name,
            Field::LastName => &mut self.last_name,
            Field::Title => &mut self.title,
            Field::Email => &mut self.email,
            Field::Phone => &mut self.phone,
            Field::Address => &mut self.address,
            Field::Experience => &mut self.experience,
            Field::Education => &mut self.education,
            Field::Skills => &mut self.skills,
        };
        *slot = value.into();
    }

    /// `true` when `field` is empty or whitespace-only.
    pub fn is_blank(&self, field: Field) -> bool {
        is_blank(self.get(field))
    }

    /// Parsed skill tokens, see [`parse_skills`].
    pub fn skill_tokens(&self) -> Vec<String> {
        parse_skills(&self.skills)
    }

    /// Parse a record from JSON using the camelCase field names.
    pub fn from_json(json: &str) -> CvResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// `true` when `s` is empty or contains only whitespace.
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Split a newline-delimited skills list into trimmed tokens, dropping blank lines.
pub fn parse_skills(raw: &str) -> Vec<String> {
    raw.split('\n')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split free text into display lines, treating `\r\n` as a plain line break.
pub fn text_lines(raw: &str) -> Vec<&str> {
    raw.split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/form/record.rs"]
mod tests;
