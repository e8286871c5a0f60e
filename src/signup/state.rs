//! Wizard session state: which step the user is on and what they've typed.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::catalog;
use super::model::{ActorType, Field, FieldValue, FormData};
use super::validation::ValidationErrors;
use crate::error::WizardError;

/// Where a step sits relative to the current one, for progress display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Completed,
    Current,
    Upcoming,
}

/// In-memory state of one registration attempt.
///
/// The step index always stays within `0..step_count(actor_type)`.
#[derive(Debug, Clone)]
pub struct WizardSession {
    /// Correlates log lines for one attempt.
    pub id: Uuid,
    pub actor_type: ActorType,
    step_index: usize,
    pub form_data: FormData,
    /// Errors for the current step only.
    pub errors: ValidationErrors,
    completed: bool,
}

impl WizardSession {
    pub fn new(actor_type: ActorType, form_data: FormData) -> Self {
        Self {
            id: Uuid::new_v4(),
            actor_type,
            step_index: 0,
            form_data,
            errors: ValidationErrors::new(),
            completed: false,
        }
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn step_count(&self) -> usize {
        catalog::step_count(self.actor_type)
    }

    pub fn is_last_step(&self) -> bool {
        self.step_index + 1 >= self.step_count()
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Merge one field edit. Returns whether a pending error on that field
    /// was cleared. Other fields' errors are left as they are.
    pub fn apply_edit(&mut self, field: Field, value: FieldValue) -> Result<bool, WizardError> {
        self.ensure_open()?;
        self.form_data.set(field, value)?;
        Ok(self.errors.remove(field))
    }

    /// Move to the next step and clear errors. `None` on the last step.
    pub fn advance(&mut self) -> Option<usize> {
        if self.is_last_step() {
            return None;
        }
        self.step_index += 1;
        self.errors.clear();
        Some(self.step_index)
    }

    /// Move to the previous step. `None` on the first step.
    pub fn retreat(&mut self) -> Option<usize> {
        if self.step_index == 0 {
            return None;
        }
        self.step_index -= 1;
        Some(self.step_index)
    }

    /// Mark the session finished. No further transitions are accepted.
    pub fn complete(&mut self) {
        self.completed = true;
    }

    pub fn ensure_open(&self) -> Result<(), WizardError> {
        if self.completed {
            Err(WizardError::SessionCompleted)
        } else {
            Ok(())
        }
    }

    /// Status of every step in order.
    pub fn step_statuses(&self) -> Vec<StepStatus> {
        (0..self.step_count())
            .map(|i| match i.cmp(&self.step_index) {
                std::cmp::Ordering::Less => StepStatus::Completed,
                std::cmp::Ordering::Equal => StepStatus::Current,
                std::cmp::Ordering::Greater => StepStatus::Upcoming,
            })
            .collect()
    }
}
