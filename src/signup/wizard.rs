//! Wizard: drives a signup session through its steps, keeping the draft
//! store in sync and handing off to the submit/back collaborators.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::WizardError;
use crate::store::DraftStore;

use super::catalog::{self, StepDescriptor};
use super::handlers::{BackHandler, SubmitHandler};
use super::model::{ActorType, Field, FieldValue, FormData};
use super::state::{StepStatus, WizardSession};
use super::validation::{validate_step, ValidationErrors};

/// Result of pressing "Next".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextOutcome {
    /// The current step has invalid fields; the index did not change.
    Blocked(ValidationErrors),
    /// Moved forward to `step`.
    Advanced { step: usize },
    /// The last step was valid and the form went to the submit handler.
    Submitted,
}

/// Result of pressing "Previous".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviousOutcome {
    MovedBack { step: usize },
    /// Already on the first step; the back handler was notified.
    Cancelled,
}

/// Multi-step signup controller for one actor type.
pub struct Wizard {
    session: WizardSession,
    store: Arc<dyn DraftStore>,
    on_submit: Arc<dyn SubmitHandler>,
    on_back: Option<Arc<dyn BackHandler>>,
}

impl Wizard {
    /// Start a session, resuming any saved draft for `actor`.
    pub fn new(
        actor: ActorType,
        store: Arc<dyn DraftStore>,
        on_submit: impl SubmitHandler + 'static,
    ) -> Self {
        let form_data = match store.load(actor) {
            Ok(Some(draft)) => {
                info!(actor = %actor, "Resuming signup draft");
                draft
            }
            Ok(None) => FormData::default(),
            Err(e) => {
                warn!(actor = %actor, error = %e, "Failed to load signup draft");
                FormData::default()
            }
        };

        let session = WizardSession::new(actor, form_data);
        debug!(session = %session.id, actor = %actor, "Signup wizard started");

        Self {
            session,
            store,
            on_submit: Arc::new(on_submit),
            on_back: None,
        }
    }

    /// Set the handler invoked by `previous()` on the first step.
    pub fn with_back_handler(mut self, on_back: impl BackHandler + 'static) -> Self {
        self.on_back = Some(Arc::new(on_back));
        self
    }

    pub fn session_id(&self) -> Uuid {
        self.session.id
    }

    pub fn actor_type(&self) -> ActorType {
        self.session.actor_type
    }

    pub fn step_index(&self) -> usize {
        self.session.step_index()
    }

    pub fn step_count(&self) -> usize {
        self.session.step_count()
    }

    pub fn current_step(&self) -> &'static StepDescriptor {
        &catalog::steps(self.session.actor_type)[self.session.step_index()]
    }

    pub fn is_last_step(&self) -> bool {
        self.session.is_last_step()
    }

    pub fn is_completed(&self) -> bool {
        self.session.is_completed()
    }

    pub fn form_data(&self) -> &FormData {
        &self.session.form_data
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.session.errors
    }

    pub fn step_statuses(&self) -> Vec<StepStatus> {
        self.session.step_statuses()
    }

    /// Write one field, drop that field's error, and save the draft.
    pub fn edit_field(
        &mut self,
        field: Field,
        value: impl Into<FieldValue>,
    ) -> Result<(), WizardError> {
        let cleared = self.session.apply_edit(field, value.into())?;
        debug!(
            session = %self.session.id,
            field = %field,
            cleared_error = cleared,
            "Signup field edited"
        );
        self.persist_draft();
        Ok(())
    }

    /// Select `tag` as an area of expertise, or deselect it if already
    /// selected. Returns whether the tag is now selected.
    pub fn toggle_expertise(&mut self, tag: &str) -> Result<bool, WizardError> {
        let mut tags = self.session.form_data.expertise.clone();
        let selected = match tags.iter().position(|t| t == tag) {
            Some(pos) => {
                tags.remove(pos);
                false
            }
            None => {
                tags.push(tag.to_string());
                true
            }
        };
        self.edit_field(Field::Expertise, tags)?;
        Ok(selected)
    }

    /// Validate the current step, then advance or submit.
    pub fn next(&mut self) -> Result<NextOutcome, WizardError> {
        self.session.ensure_open()?;

        let step = self.session.step_index();
        let errors = validate_step(self.session.actor_type, step, &self.session.form_data);
        if !errors.is_empty() {
            self.session.errors = errors.clone();
            return Ok(NextOutcome::Blocked(errors));
        }

        match self.session.advance() {
            Some(step) => {
                info!(
                    session = %self.session.id,
                    actor = %self.session.actor_type,
                    step,
                    "Signup step advanced"
                );
                Ok(NextOutcome::Advanced { step })
            }
            None => {
                self.submit();
                Ok(NextOutcome::Submitted)
            }
        }
    }

    /// Go back one step, or hand off to the back handler from the first.
    pub fn previous(&mut self) -> Result<PreviousOutcome, WizardError> {
        self.session.ensure_open()?;

        match self.session.retreat() {
            Some(step) => Ok(PreviousOutcome::MovedBack { step }),
            None => {
                debug!(session = %self.session.id, "Signup cancelled from first step");
                if let Some(on_back) = &self.on_back {
                    on_back.back();
                }
                Ok(PreviousOutcome::Cancelled)
            }
        }
    }

    /// Labelled values shown on the final review step.
    pub fn review_summary(&self) -> Vec<(&'static str, String)> {
        let data = &self.session.form_data;
        match self.session.actor_type {
            ActorType::Client => vec![
                ("Name", data.full_name.clone()),
                ("Email", data.email.clone()),
                ("Phone", data.phone.clone()),
            ],
            ActorType::Agent => vec![
                ("Name", data.full_name.clone()),
                ("Email", data.email.clone()),
                ("Phone", data.phone.clone()),
                ("Experience", data.experience.clone()),
                ("Expertise", data.expertise.join(", ")),
            ],
            ActorType::Organization => {
                let mut summary = vec![
                    ("Organization", data.org_name.clone()),
                    ("Administrator", data.admin_name.clone()),
                    ("Email", data.email.clone()),
                    ("Phone", data.phone.clone()),
                ];
                if !data.website.trim().is_empty() {
                    summary.push(("Website", data.website.clone()));
                }
                summary
            }
        }
    }

    /// Clear the draft, hand the form to the submit handler, end the session.
    fn submit(&mut self) {
        let actor = self.session.actor_type;
        if let Err(e) = self.store.clear(actor) {
            warn!(session = %self.session.id, error = %e, "Failed to clear signup draft");
        }
        self.session.complete();
        info!(session = %self.session.id, actor = %actor, "Signup submitted");
        self.on_submit.submit(self.session.form_data.clone());
    }

    fn persist_draft(&self) {
        if let Err(e) = self
            .store
            .save(self.session.actor_type, &self.session.form_data)
        {
            warn!(session = %self.session.id, error = %e, "Failed to persist signup draft");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;
    use crate::error::DraftStoreError;
    use crate::store::MemoryDraftStore;

    fn new_wizard(actor: ActorType) -> (Wizard, Arc<MemoryDraftStore>, Arc<Mutex<Vec<FormData>>>) {
        let store = Arc::new(MemoryDraftStore::new());
        let submitted = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&submitted);
        let wizard = Wizard::new(actor, store.clone(), move |data: FormData| {
            sink.lock().unwrap().push(data)
        });
        (wizard, store, submitted)
    }

    #[test]
    fn next_blocks_on_invalid_step() {
        let (mut wizard, _, _) = new_wizard(ActorType::Client);
        let outcome = wizard.next().unwrap();
        let NextOutcome::Blocked(errors) = outcome else {
            panic!("expected Blocked, got {outcome:?}");
        };
        assert!(errors.contains(Field::FullName));
        assert_eq!(wizard.step_index(), 0);
        assert_eq!(wizard.errors(), &errors);
    }

    #[test]
    fn errors_are_replaced_not_merged() {
        let (mut wizard, _, _) = new_wizard(ActorType::Organization);
        wizard.next().unwrap();
        assert_eq!(wizard.errors().len(), 2);

        wizard.edit_field(Field::OrgName, "Acme").unwrap();
        assert_eq!(wizard.errors().len(), 1);

        // Re-validation recomputes from scratch.
        wizard.edit_field(Field::OrgName, "").unwrap();
        wizard.next().unwrap();
        assert_eq!(wizard.errors().len(), 2);
    }

    #[test]
    fn edit_leaves_other_errors_even_if_still_invalid() {
        let (mut wizard, _, _) = new_wizard(ActorType::Organization);
        wizard.next().unwrap();
        wizard.edit_field(Field::AdminName, "   ").unwrap();
        // Cleared on edit even though whitespace is still blank.
        assert!(!wizard.errors().contains(Field::AdminName));
        assert!(wizard.errors().contains(Field::OrgName));
    }

    #[test]
    fn advancing_clears_errors() {
        let (mut wizard, _, _) = new_wizard(ActorType::Client);
        wizard.next().unwrap();
        wizard.edit_field(Field::FullName, "Jane Doe").unwrap();
        wizard.edit_field(Field::Phone, "123").unwrap();
        assert_eq!(wizard.next().unwrap(), NextOutcome::Advanced { step: 1 });
        assert!(wizard.errors().is_empty());
    }

    #[test]
    fn every_edit_saves_full_form() {
        let (mut wizard, store, _) = new_wizard(ActorType::Agent);
        wizard.edit_field(Field::FullName, "Sam").unwrap();
        wizard.edit_field(Field::Bio, "Consultant").unwrap();
        let draft = store.load(ActorType::Agent).unwrap().unwrap();
        assert_eq!(draft.full_name, "Sam");
        assert_eq!(draft.bio, "Consultant");
    }

    #[test]
    fn invalid_edit_is_rejected_and_not_saved() {
        let (mut wizard, store, _) = new_wizard(ActorType::Client);
        let err = wizard.edit_field(Field::AgreeToTerms, "yes").unwrap_err();
        assert!(matches!(err, WizardError::InvalidValue { .. }));
        assert!(store.is_empty());
    }

    #[test]
    fn previous_moves_back_without_validation() {
        let (mut wizard, _, _) = new_wizard(ActorType::Client);
        wizard.edit_field(Field::FullName, "Jane").unwrap();
        wizard.next().unwrap();
        wizard.next().unwrap(); // blocked on step 1
        assert!(!wizard.errors().is_empty());

        assert_eq!(
            wizard.previous().unwrap(),
            PreviousOutcome::MovedBack { step: 0 }
        );
        assert_eq!(wizard.step_index(), 0);
    }

    #[test]
    fn previous_on_first_step_calls_back_handler() {
        let backs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&backs);
        let mut wizard = Wizard::new(
            ActorType::Agent,
            Arc::new(MemoryDraftStore::new()),
            |_: FormData| {},
        )
        .with_back_handler(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(wizard.previous().unwrap(), PreviousOutcome::Cancelled);
        assert_eq!(wizard.step_index(), 0);
        assert_eq!(backs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn previous_on_first_step_without_handler_is_noop() {
        let (mut wizard, _, _) = new_wizard(ActorType::Client);
        assert_eq!(wizard.previous().unwrap(), PreviousOutcome::Cancelled);
        assert_eq!(wizard.step_index(), 0);
    }

    #[test]
    fn final_step_submits_once_and_locks_session() {
        let (mut wizard, store, submitted) = new_wizard(ActorType::Organization);
        wizard.edit_field(Field::OrgName, "Acme").unwrap();
        wizard.edit_field(Field::AdminName, "Ada").unwrap();
        wizard.next().unwrap();
        wizard.edit_field(Field::Email, "ada@vmvisa.com").unwrap();
        wizard.edit_field(Field::Phone, "555").unwrap();
        wizard.next().unwrap();
        wizard.edit_field(Field::Password, "longpass1").unwrap();
        wizard.edit_field(Field::ConfirmPassword, "longpass1").unwrap();
        wizard.next().unwrap();
        assert!(wizard.is_last_step());

        assert!(matches!(wizard.next().unwrap(), NextOutcome::Blocked(_)));
        wizard.edit_field(Field::AgreeToTerms, true).unwrap();
        assert_eq!(wizard.next().unwrap(), NextOutcome::Submitted);

        assert_eq!(wizard.step_index(), 3);
        assert!(wizard.is_completed());
        assert!(store.load(ActorType::Organization).unwrap().is_none());
        assert_eq!(submitted.lock().unwrap().len(), 1);

        assert!(matches!(wizard.next(), Err(WizardError::SessionCompleted)));
        assert!(matches!(wizard.previous(), Err(WizardError::SessionCompleted)));
        assert!(matches!(
            wizard.edit_field(Field::Bio, "late"),
            Err(WizardError::SessionCompleted)
        ));
        assert_eq!(submitted.lock().unwrap().len(), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn toggle_expertise_adds_and_removes() {
        let (mut wizard, _, _) = new_wizard(ActorType::Agent);
        assert!(wizard.toggle_expertise("Study Visa").unwrap());
        assert!(wizard.toggle_expertise("Work Permit").unwrap());
        assert!(!wizard.toggle_expertise("Study Visa").unwrap());
        assert_eq!(wizard.form_data().expertise, vec!["Work Permit".to_string()]);
    }

    #[test]
    fn review_summary_per_actor() {
        let (mut wizard, _, _) = new_wizard(ActorType::Organization);
        wizard.edit_field(Field::OrgName, "Acme").unwrap();
        let labels: Vec<&str> = wizard.review_summary().iter().map(|(l, _)| *l).collect();
        assert_eq!(labels, vec!["Organization", "Administrator", "Email", "Phone"]);

        wizard.edit_field(Field::Website, "https://acme.io").unwrap();
        assert_eq!(wizard.review_summary().len(), 5);

        let (mut agent, _, _) = new_wizard(ActorType::Agent);
        agent.toggle_expertise("Canada PR").unwrap();
        agent.toggle_expertise("Express Entry").unwrap();
        let summary = agent.review_summary();
        assert_eq!(summary[4], ("Expertise", "Canada PR, Express Entry".to_string()));
    }

    #[test]
    fn current_step_tracks_index() {
        let (mut wizard, _, _) = new_wizard(ActorType::Agent);
        assert_eq!(wizard.current_step().title, "Personal Information");
        wizard.edit_field(Field::FullName, "Sam").unwrap();
        wizard.next().unwrap();
        assert_eq!(wizard.current_step().title, "Account Details");
        assert_eq!(wizard.step_statuses()[0], StepStatus::Completed);
    }

    struct FailingStore;

    impl DraftStore for FailingStore {
        fn prefix(&self) -> &str {
            "signup-draft"
        }
        fn get(&self, _key: &str) -> Result<Option<String>, DraftStoreError> {
            Err(DraftStoreError::Query("disk on fire".into()))
        }
        fn set(&self, _key: &str, _value: &str) -> Result<(), DraftStoreError> {
            Err(DraftStoreError::Query("disk on fire".into()))
        }
        fn delete(&self, _key: &str) -> Result<bool, DraftStoreError> {
            Err(DraftStoreError::Query("disk on fire".into()))
        }
    }

    #[test]
    fn store_failures_do_not_block_the_flow() {
        let submitted = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&submitted);
        let mut wizard = Wizard::new(ActorType::Client, Arc::new(FailingStore), move |_: FormData| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        wizard.edit_field(Field::FullName, "Jane").unwrap();
        wizard.next().unwrap();
        wizard.edit_field(Field::Email, "jane@x.com").unwrap();
        wizard.edit_field(Field::Password, "longpass1").unwrap();
        wizard.edit_field(Field::ConfirmPassword, "longpass1").unwrap();
        wizard.next().unwrap();
        wizard.edit_field(Field::Phone, "555").unwrap();
        wizard.next().unwrap();
        wizard.edit_field(Field::AgreeToTerms, true).unwrap();
        assert_eq!(wizard.next().unwrap(), NextOutcome::Submitted);
        assert_eq!(submitted.load(Ordering::SeqCst), 1);
    }
}
