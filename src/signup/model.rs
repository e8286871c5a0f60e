//! Signup data models: actor types, form fields, and the form record.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WizardError;

/// Which kind of account is being registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorType {
    Client,
    Agent,
    Organization,
}

impl ActorType {
    pub const ALL: [ActorType; 3] = [Self::Client, Self::Agent, Self::Organization];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Agent => "agent",
            Self::Organization => "organization",
        }
    }
}

impl fmt::Display for ActorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActorType {
    type Err = WizardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "client" => Ok(Self::Client),
            "agent" => Ok(Self::Agent),
            "organization" => Ok(Self::Organization),
            _ => Err(WizardError::UnknownActorType(s.to_string())),
        }
    }
}

/// The kind of value a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Flag,
    Tags,
    File,
}

impl ValueKind {
    fn name(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Flag => "boolean",
            Self::Tags => "tag list",
            Self::File => "file reference",
        }
    }
}

/// A single field of [`FormData`].
///
/// Ordering follows declaration order, which is also the order errors are
/// reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    FullName,
    Email,
    Password,
    ConfirmPassword,
    Phone,
    AgreeToTerms,
    Experience,
    Expertise,
    License,
    Bio,
    OrgName,
    AdminName,
    Website,
}

impl Field {
    pub const ALL: [Field; 13] = [
        Self::FullName,
        Self::Email,
        Self::Password,
        Self::ConfirmPassword,
        Self::Phone,
        Self::AgreeToTerms,
        Self::Experience,
        Self::Expertise,
        Self::License,
        Self::Bio,
        Self::OrgName,
        Self::AdminName,
        Self::Website,
    ];

    /// Serialized (camelCase) name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullName => "fullName",
            Self::Email => "email",
            Self::Password => "password",
            Self::ConfirmPassword => "confirmPassword",
            Self::Phone => "phone",
            Self::AgreeToTerms => "agreeToTerms",
            Self::Experience => "experience",
            Self::Expertise => "expertise",
            Self::License => "license",
            Self::Bio => "bio",
            Self::OrgName => "orgName",
            Self::AdminName => "adminName",
            Self::Website => "website",
        }
    }

    /// Human-readable label used in messages and prompts.
    pub fn label(&self) -> &'static str {
        match self {
            Self::FullName => "Full name",
            Self::Email => "Email",
            Self::Password => "Password",
            Self::ConfirmPassword => "Confirm password",
            Self::Phone => "Phone number",
            Self::AgreeToTerms => "Terms agreement",
            Self::Experience => "Experience",
            Self::Expertise => "Areas of expertise",
            Self::License => "License document",
            Self::Bio => "Bio",
            Self::OrgName => "Organization name",
            Self::AdminName => "Admin name",
            Self::Website => "Website",
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Self::AgreeToTerms => ValueKind::Flag,
            Self::Expertise => ValueKind::Tags,
            Self::License => ValueKind::File,
            _ => ValueKind::Text,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = WizardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| WizardError::UnknownField(s.to_string()))
    }
}

/// Opaque reference to an uploaded file. Transport is handled elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileRef(pub String);

/// A value being written into a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
    Tags(Vec<String>),
    File(Option<FileRef>),
}

impl FieldValue {
    fn kind(&self) -> ValueKind {
        match self {
            Self::Text(_) => ValueKind::Text,
            Self::Flag(_) => ValueKind::Flag,
            Self::Tags(_) => ValueKind::Tags,
            Self::File(_) => ValueKind::File,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Flag(b)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(tags: Vec<String>) -> Self {
        Self::Tags(tags)
    }
}

impl From<FileRef> for FieldValue {
    fn from(file: FileRef) -> Self {
        Self::File(Some(file))
    }
}

/// Every field any actor type can fill in.
///
/// Fields that don't apply to the active actor type stay at their defaults
/// and are ignored by validation. Missing keys deserialize to defaults, which
/// is how a stored draft is merged over a fresh form.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormData {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub phone: String,
    pub agree_to_terms: bool,

    // Agent
    pub experience: String,
    pub expertise: Vec<String>,
    pub license: Option<FileRef>,
    pub bio: String,

    // Organization
    pub org_name: String,
    pub admin_name: String,
    pub website: String,
}

impl fmt::Debug for FormData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |s: &str| if s.is_empty() { "" } else { "[REDACTED]" };
        f.debug_struct("FormData")
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("password", &redact(&self.password))
            .field("confirm_password", &redact(&self.confirm_password))
            .field("phone", &self.phone)
            .field("agree_to_terms", &self.agree_to_terms)
            .field("experience", &self.experience)
            .field("expertise", &self.expertise)
            .field("license", &self.license)
            .field("bio", &self.bio)
            .field("org_name", &self.org_name)
            .field("admin_name", &self.admin_name)
            .field("website", &self.website)
            .finish()
    }
}

impl FormData {
    /// Write `value` into `field`, rejecting a value of the wrong kind.
    pub fn set(&mut self, field: Field, value: FieldValue) -> Result<(), WizardError> {
        let expected = field.kind();
        if value.kind() != expected {
            return Err(WizardError::InvalidValue {
                field: field.as_str(),
                expected: expected.name(),
            });
        }

        match (field, value) {
            (Field::AgreeToTerms, FieldValue::Flag(b)) => self.agree_to_terms = b,
            (Field::Expertise, FieldValue::Tags(tags)) => self.expertise = tags,
            (Field::License, FieldValue::File(file)) => self.license = file,
            (field, FieldValue::Text(text)) => {
                if let Some(slot) = self.text_mut(field) {
                    *slot = text;
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Read the current value of `field`.
    pub fn get(&self, field: Field) -> FieldValue {
        match field {
            Field::AgreeToTerms => FieldValue::Flag(self.agree_to_terms),
            Field::Expertise => FieldValue::Tags(self.expertise.clone()),
            Field::License => FieldValue::File(self.license.clone()),
            other => FieldValue::Text(self.text(other).unwrap_or_default().to_string()),
        }
    }

    /// Borrow a text field. `None` for non-text fields.
    pub fn text(&self, field: Field) -> Option<&str> {
        let s = match field {
            Field::FullName => &self.full_name,
            Field::Email => &self.email,
            Field::Password => &self.password,
            Field::ConfirmPassword => &self.confirm_password,
            Field::Phone => &self.phone,
            Field::Experience => &self.experience,
            Field::Bio => &self.bio,
            Field::OrgName => &self.org_name,
            Field::AdminName => &self.admin_name,
            Field::Website => &self.website,
            Field::AgreeToTerms | Field::Expertise | Field::License => return None,
        };
        Some(s.as_str())
    }

    fn text_mut(&mut self, field: Field) -> Option<&mut String> {
        let s = match field {
            Field::FullName => &mut self.full_name,
            Field::Email => &mut self.email,
            Field::Password => &mut self.password,
            Field::ConfirmPassword => &mut self.confirm_password,
            Field::Phone => &mut self.phone,
            Field::Experience => &mut self.experience,
            Field::Bio => &mut self.bio,
            Field::OrgName => &mut self.org_name,
            Field::AdminName => &mut self.admin_name,
            Field::Website => &mut self.website,
            Field::AgreeToTerms | Field::Expertise | Field::License => return None,
        };
        Some(s)
    }
}

/// Services an agent can list as areas of expertise.
pub const EXPERTISE_OPTIONS: &[&str] = &[
    "Canada PR",
    "Study Visa",
    "Work Permit",
    "Business Immigration",
    "Family Sponsorship",
    "Tourist Visa",
    "Asylum & Refugee",
    "Express Entry",
];

/// Organization accounts must register with an address on this domain.
pub const ORGANIZATION_EMAIL_DOMAIN: &str = "@vmvisa.com";

/// Storage key for an actor type's draft, e.g. `signup-draft:agent`.
pub fn draft_key(prefix: &str, actor: ActorType) -> String {
    format!("{prefix}:{actor}")
}
