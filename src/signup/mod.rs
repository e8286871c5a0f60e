//! Signup wizard: multi-step registration for clients, agents, and
//! organizations.
//!
//! Each actor type walks an ordered list of steps from the catalog. "Next"
//! validates only the current step; every edit is saved as a draft so an
//! abandoned signup can be resumed, and the draft is cleared on submit.

pub mod catalog;
pub mod handlers;
pub mod model;
pub mod state;
pub mod validation;
pub mod wizard;

pub use catalog::{step, step_count, steps, Rule, StepDescriptor, StepKind};
pub use handlers::{BackHandler, ChannelSubmitter, Registration, SubmitHandler};
pub use model::{ActorType, Field, FieldValue, FileRef, FormData, EXPERTISE_OPTIONS};
pub use state::{StepStatus, WizardSession};
pub use validation::{validate_step, ValidationErrors};
pub use wizard::{NextOutcome, PreviousOutcome, Wizard};
