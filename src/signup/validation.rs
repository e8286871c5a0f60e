//! Step validation.
//!
//! `validate_step` evaluates only the rules attached to the requested step
//! in the catalog. Fields belonging to other steps are never looked at.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use super::catalog::{self, Rule};
use super::model::{ActorType, Field, FormData};

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern is a valid regex"));

/// Field → message for every invalid field on the current step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<Field, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    /// Record an error unless the field already has one.
    fn insert_first(&mut self, field: Field, message: String) {
        self.0.entry(field).or_insert(message);
    }

    /// Drop one field's error. Returns whether an entry was removed.
    pub fn remove(&mut self, field: Field) -> bool {
        self.0.remove(&field).is_some()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }
}

/// Validate one step of an actor type's flow.
///
/// Pure: the same inputs always give the same map. An index past the end of
/// the flow has no rules and therefore no errors.
pub fn validate_step(actor: ActorType, step_index: usize, data: &FormData) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    let Some(step) = catalog::step(actor, step_index) else {
        return errors;
    };

    for rule in step.rules {
        let field = rule.field();
        if errors.contains(field) {
            continue;
        }
        if let Some(message) = check(rule, data) {
            errors.insert_first(field, message);
        }
    }

    if !errors.is_empty() {
        debug!(
            actor = %actor,
            step = step_index,
            invalid = errors.len(),
            "Step validation failed"
        );
    }
    errors
}

/// Evaluate a single rule. `None` means it passed.
fn check(rule: &Rule, data: &FormData) -> Option<String> {
    fn text(data: &FormData, field: Field) -> &str {
        data.text(field).unwrap_or_default()
    }

    match *rule {
        Rule::Required(field) => {
            let blank = match field {
                Field::Expertise => data.expertise.is_empty(),
                Field::License => data.license.is_none(),
                Field::AgreeToTerms => !data.agree_to_terms,
                _ => text(data, field).trim().is_empty(),
            };
            blank.then(|| format!("{} is required", field.label()))
        }
        Rule::Email(field) => {
            (!EMAIL_PATTERN.is_match(text(data, field))).then(|| "Invalid email format".to_string())
        }
        Rule::Contains {
            field,
            fragment,
            message,
        } => (!text(data, field).contains(fragment)).then(|| message.to_string()),
        Rule::MinChars { field, min } => (text(data, field).chars().count() < min)
            .then(|| format!("{} must be at least {min} characters", field.label())),
        Rule::Equals {
            field,
            other,
            message,
        } => (text(data, field) != text(data, other)).then(|| message.to_string()),
        Rule::NonEmpty { field, message } => {
            let empty = match field {
                Field::Expertise => data.expertise.is_empty(),
                _ => text(data, field).is_empty(),
            };
            empty.then(|| message.to_string())
        }
        Rule::Checked { field, message } => {
            let checked = match field {
                Field::AgreeToTerms => data.agree_to_terms,
                _ => false,
            };
            (!checked).then(|| message.to_string())
        }
    }
}
