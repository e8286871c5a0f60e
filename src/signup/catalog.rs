//! Step catalog: the ordered steps each actor type walks through.
//!
//! Each step is data: a title for display plus the validation rules that
//! gate leaving it. Steps shared between actor types are shared constants,
//! so adding an actor type means adding a table, not a branch.

use serde::Serialize;

use super::model::{ActorType, Field, ORGANIZATION_EMAIL_DOMAIN};

/// What a step collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    PersonalInfo,
    AccountDetails,
    ContactInfo,
    ProfessionalExperience,
    AreasOfExpertise,
    ProfessionalProfile,
    OrganizationDetails,
    OrganizationContact,
    AdditionalDetails,
    ReviewSubmit,
}

/// A single validation rule attached to a step.
///
/// Rules for the same field are checked in declared order and the first
/// failure is the one reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Text must be non-blank after trimming.
    Required(Field),
    /// Text must look like `local@domain.tld`.
    Email(Field),
    /// Text must contain a literal fragment.
    Contains {
        field: Field,
        fragment: &'static str,
        message: &'static str,
    },
    /// Text must have at least `min` characters.
    MinChars { field: Field, min: usize },
    /// Text must equal another field's text.
    Equals {
        field: Field,
        other: Field,
        message: &'static str,
    },
    /// Tag list must have at least one entry.
    NonEmpty {
        field: Field,
        message: &'static str,
    },
    /// Flag must be set.
    Checked {
        field: Field,
        message: &'static str,
    },
}

impl Rule {
    /// The field an error from this rule is reported against.
    pub fn field(&self) -> Field {
        match *self {
            Self::Required(field) | Self::Email(field) => field,
            Self::Contains { field, .. }
            | Self::MinChars { field, .. }
            | Self::Equals { field, .. }
            | Self::NonEmpty { field, .. }
            | Self::Checked { field, .. } => field,
        }
    }
}

/// One screen of the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepDescriptor {
    pub kind: StepKind,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub rules: &'static [Rule],
    /// Fields shown on the step that no rule checks.
    pub optional: &'static [Field],
}

impl StepDescriptor {
    /// Fields edited on this step, validated ones first.
    pub fn fields(&self) -> Vec<Field> {
        let mut fields: Vec<Field> = Vec::new();
        for field in self
            .rules
            .iter()
            .map(Rule::field)
            .chain(self.optional.iter().copied())
        {
            if !fields.contains(&field) {
                fields.push(field);
            }
        }
        fields
    }
}

/// Minimum password length for every actor type.
pub const MIN_PASSWORD_CHARS: usize = 8;

const PASSWORD_RULES: [Rule; 3] = [
    Rule::Required(Field::Password),
    Rule::MinChars {
        field: Field::Password,
        min: MIN_PASSWORD_CHARS,
    },
    Rule::Equals {
        field: Field::ConfirmPassword,
        other: Field::Password,
        message: "Passwords don't match",
    },
];

const PERSONAL_INFO: StepDescriptor = StepDescriptor {
    kind: StepKind::PersonalInfo,
    title: "Personal Information",
    subtitle: "Let's start with your name",
    rules: &[Rule::Required(Field::FullName)],
    optional: &[],
};

const ACCOUNT_DETAILS: StepDescriptor = StepDescriptor {
    kind: StepKind::AccountDetails,
    title: "Account Details",
    subtitle: "Create your secure account",
    rules: &[
        Rule::Required(Field::Email),
        Rule::Email(Field::Email),
        PASSWORD_RULES[0],
        PASSWORD_RULES[1],
        PASSWORD_RULES[2],
    ],
    optional: &[],
};

const CONTACT_INFO: StepDescriptor = StepDescriptor {
    kind: StepKind::ContactInfo,
    title: "Contact Information",
    subtitle: "How can we reach you?",
    rules: &[Rule::Required(Field::Phone)],
    optional: &[],
};

const PROFESSIONAL_EXPERIENCE: StepDescriptor = StepDescriptor {
    kind: StepKind::ProfessionalExperience,
    title: "Professional Experience",
    subtitle: "Tell us about your expertise",
    rules: &[Rule::Required(Field::Experience)],
    optional: &[],
};

const AREAS_OF_EXPERTISE: StepDescriptor = StepDescriptor {
    kind: StepKind::AreasOfExpertise,
    title: "Areas of Expertise",
    subtitle: "What services do you specialize in?",
    rules: &[Rule::NonEmpty {
        field: Field::Expertise,
        message: "Please select at least one area of expertise",
    }],
    optional: &[],
};

const PROFESSIONAL_PROFILE: StepDescriptor = StepDescriptor {
    kind: StepKind::ProfessionalProfile,
    title: "Professional Profile",
    subtitle: "Complete your profile",
    rules: &[],
    optional: &[Field::License, Field::Bio],
};

const ORGANIZATION_DETAILS: StepDescriptor = StepDescriptor {
    kind: StepKind::OrganizationDetails,
    title: "Organization Details",
    subtitle: "Tell us about your organization",
    rules: &[
        Rule::Required(Field::OrgName),
        Rule::Required(Field::AdminName),
    ],
    optional: &[],
};

const ORGANIZATION_CONTACT: StepDescriptor = StepDescriptor {
    kind: StepKind::OrganizationContact,
    title: "Contact Information",
    subtitle: "How can we reach you?",
    rules: &[
        Rule::Required(Field::Email),
        Rule::Email(Field::Email),
        Rule::Contains {
            field: Field::Email,
            fragment: ORGANIZATION_EMAIL_DOMAIN,
            message: "Must be a @vmvisa.com email",
        },
        Rule::Required(Field::Phone),
    ],
    optional: &[],
};

const ADDITIONAL_DETAILS: StepDescriptor = StepDescriptor {
    kind: StepKind::AdditionalDetails,
    title: "Additional Details",
    subtitle: "Complete your setup",
    rules: &[PASSWORD_RULES[0], PASSWORD_RULES[1], PASSWORD_RULES[2]],
    optional: &[Field::Website],
};

const REVIEW_SUBMIT: StepDescriptor = StepDescriptor {
    kind: StepKind::ReviewSubmit,
    title: "Complete Setup",
    subtitle: "Review and submit",
    rules: &[Rule::Checked {
        field: Field::AgreeToTerms,
        message: "You must agree to the terms",
    }],
    optional: &[],
};

static CLIENT_STEPS: [StepDescriptor; 4] =
    [PERSONAL_INFO, ACCOUNT_DETAILS, CONTACT_INFO, REVIEW_SUBMIT];

static AGENT_STEPS: [StepDescriptor; 7] = [
    PERSONAL_INFO,
    ACCOUNT_DETAILS,
    CONTACT_INFO,
    PROFESSIONAL_EXPERIENCE,
    AREAS_OF_EXPERTISE,
    PROFESSIONAL_PROFILE,
    REVIEW_SUBMIT,
];

static ORGANIZATION_STEPS: [StepDescriptor; 4] = [
    ORGANIZATION_DETAILS,
    ORGANIZATION_CONTACT,
    ADDITIONAL_DETAILS,
    REVIEW_SUBMIT,
];

/// Ordered steps for an actor type.
pub fn steps(actor: ActorType) -> &'static [StepDescriptor] {
    match actor {
        ActorType::Client => &CLIENT_STEPS,
        ActorType::Agent => &AGENT_STEPS,
        ActorType::Organization => &ORGANIZATION_STEPS,
    }
}

pub fn step_count(actor: ActorType) -> usize {
    steps(actor).len()
}

/// Step at `index`, if in range.
pub fn step(actor: ActorType, index: usize) -> Option<&'static StepDescriptor> {
    steps(actor).get(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_counts_per_actor() {
        assert_eq!(step_count(ActorType::Client), 4);
        assert_eq!(step_count(ActorType::Agent), 7);
        assert_eq!(step_count(ActorType::Organization), 4);
    }

    #[test]
    fn every_flow_ends_with_review() {
        for actor in ActorType::ALL {
            let last = steps(actor).last().unwrap();
            assert_eq!(last.kind, StepKind::ReviewSubmit, "{actor}");
            assert_eq!(last.fields(), vec![Field::AgreeToTerms]);
        }
    }

    #[test]
    fn agent_shares_client_opening_steps() {
        let client = steps(ActorType::Client);
        let agent = steps(ActorType::Agent);
        assert_eq!(&client[..3], &agent[..3]);
    }

    #[test]
    fn agent_step_order() {
        let kinds: Vec<StepKind> = steps(ActorType::Agent).iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                StepKind::PersonalInfo,
                StepKind::AccountDetails,
                StepKind::ContactInfo,
                StepKind::ProfessionalExperience,
                StepKind::AreasOfExpertise,
                StepKind::ProfessionalProfile,
                StepKind::ReviewSubmit,
            ]
        );
    }

    #[test]
    fn organization_titles() {
        let titles: Vec<&str> = steps(ActorType::Organization)
            .iter()
            .map(|s| s.title)
            .collect();
        assert_eq!(
            titles,
            vec![
                "Organization Details",
                "Contact Information",
                "Additional Details",
                "Complete Setup"
            ]
        );
    }

    #[test]
    fn fields_are_deduplicated_and_include_optional() {
        let account = step(ActorType::Client, 1).unwrap();
        assert_eq!(
            account.fields(),
            vec![Field::Email, Field::Password, Field::ConfirmPassword]
        );

        let profile = step(ActorType::Agent, 5).unwrap();
        assert!(profile.rules.is_empty());
        assert_eq!(profile.fields(), vec![Field::License, Field::Bio]);
    }

    #[test]
    fn out_of_range_step_is_none() {
        assert!(step(ActorType::Client, 4).is_none());
        assert!(step(ActorType::Agent, 6).is_some());
    }
}
