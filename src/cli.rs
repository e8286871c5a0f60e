//! Terminal front end: walks a wizard over a line-oriented reader/writer.
//!
//! Every field of the current step is prompted with its current value in
//! brackets; an empty answer keeps it. After the fields, a command line
//! chooses next / previous / quit.

use std::io::{BufRead, Write};

use crate::error::Result;
use crate::signup::model::ValueKind;
use crate::signup::{
    Field, FieldValue, FileRef, FormData, NextOutcome, PreviousOutcome, Wizard,
    EXPERTISE_OPTIONS,
};

/// How a terminal session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliOutcome {
    Submitted,
    /// User backed out of the first step.
    Cancelled,
    /// User quit or input ended; the draft is kept.
    Abandoned,
}

/// Line-oriented prompt driving a [`Wizard`].
pub struct WizardPrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> WizardPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Run until the wizard is submitted, cancelled, or abandoned.
    pub fn run(&mut self, wizard: &mut Wizard) -> Result<CliOutcome> {
        loop {
            let step = wizard.current_step();
            writeln!(
                self.output,
                "\nStep {}/{}: {} - {}",
                wizard.step_index() + 1,
                wizard.step_count(),
                step.title,
                step.subtitle
            )?;

            if wizard.is_last_step() {
                writeln!(self.output, "  Review your information:")?;
                for (label, value) in wizard.review_summary() {
                    writeln!(self.output, "    {label}: {value}")?;
                }
            }

            for field in step.fields() {
                if let Some(message) = wizard.errors().get(field) {
                    writeln!(self.output, "  ! {message}")?;
                }
                if !self.prompt_field(wizard, field)? {
                    return Ok(CliOutcome::Abandoned);
                }
            }

            let label = if wizard.is_last_step() {
                "complete signup"
            } else {
                "next step"
            };
            let back = if wizard.step_index() == 0 {
                "back to selection"
            } else {
                "previous"
            };
            write!(self.output, "[n] {label}, [p] {back}, [q] quit: ")?;
            self.output.flush()?;

            let Some(command) = self.read_line()? else {
                return Ok(CliOutcome::Abandoned);
            };
            match command.trim().to_ascii_lowercase().as_str() {
                "" | "n" | "next" => match wizard.next()? {
                    NextOutcome::Blocked(errors) => {
                        writeln!(self.output, "  Please fix the following:")?;
                        for (field, message) in errors.iter() {
                            writeln!(self.output, "    {}: {message}", field.label())?;
                        }
                    }
                    NextOutcome::Advanced { .. } => {}
                    NextOutcome::Submitted => return Ok(CliOutcome::Submitted),
                },
                "p" | "previous" | "back" => match wizard.previous()? {
                    PreviousOutcome::MovedBack { .. } => {}
                    PreviousOutcome::Cancelled => return Ok(CliOutcome::Cancelled),
                },
                "q" | "quit" => return Ok(CliOutcome::Abandoned),
                other => writeln!(self.output, "  Unknown command: {other}")?,
            }
        }
    }

    /// Prompt for one field. Returns `false` when input is exhausted.
    fn prompt_field(&mut self, wizard: &mut Wizard, field: Field) -> Result<bool> {
        let current = display_value(wizard.form_data(), field);
        match field.kind() {
            ValueKind::Flag => write!(self.output, "  {} (y/n) [{current}]: ", field.label())?,
            ValueKind::Tags => {
                for (i, option) in EXPERTISE_OPTIONS.iter().enumerate() {
                    writeln!(self.output, "    {}. {option}", i + 1)?;
                }
                write!(
                    self.output,
                    "  {} (numbers or names, comma separated; - to clear) [{current}]: ",
                    field.label()
                )?;
            }
            ValueKind::File => write!(
                self.output,
                "  {} (file reference; - to clear) [{current}]: ",
                field.label()
            )?,
            ValueKind::Text => write!(self.output, "  {} [{current}]: ", field.label())?,
        }
        self.output.flush()?;

        let Some(line) = self.read_line()? else {
            return Ok(false);
        };
        let answer = line.trim();
        if answer.is_empty() {
            return Ok(true);
        }

        let value = match field.kind() {
            ValueKind::Text => FieldValue::Text(answer.to_string()),
            ValueKind::Flag => match parse_yes_no(answer) {
                Some(b) => FieldValue::Flag(b),
                None => {
                    writeln!(self.output, "  Please answer y or n")?;
                    return Ok(true);
                }
            },
            ValueKind::Tags => FieldValue::Tags(parse_tags(answer)),
            ValueKind::File => {
                FieldValue::File((answer != "-").then(|| FileRef(answer.to_string())))
            }
        };
        wizard.edit_field(field, value)?;
        Ok(true)
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(buf.trim_end_matches(['\r', '\n']).to_string()))
    }
}

fn display_value(data: &FormData, field: Field) -> String {
    match (field, data.get(field)) {
        (Field::Password | Field::ConfirmPassword, FieldValue::Text(s)) => {
            if s.is_empty() {
                String::new()
            } else {
                "********".to_string()
            }
        }
        (_, FieldValue::Text(s)) => s,
        (_, FieldValue::Flag(b)) => (if b { "y" } else { "n" }).to_string(),
        (_, FieldValue::Tags(tags)) => tags.join(", "),
        (_, FieldValue::File(file)) => file.map(|f| f.0).unwrap_or_default(),
    }
}

fn parse_yes_no(answer: &str) -> Option<bool> {
    match answer.to_ascii_lowercase().as_str() {
        "y" | "yes" | "true" => Some(true),
        "n" | "no" | "false" => Some(false),
        _ => None,
    }
}

/// Parse a comma-separated selection of option numbers or free-form names.
fn parse_tags(answer: &str) -> Vec<String> {
    if answer == "-" {
        return Vec::new();
    }
    let mut tags: Vec<String> = Vec::new();
    for part in answer.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let tag = part
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| EXPERTISE_OPTIONS.get(i))
            .map(|s| s.to_string())
            .unwrap_or_else(|| part.to_string());
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::signup::ActorType;
    use crate::store::{DraftStore, MemoryDraftStore};

    fn run_script(
        actor: ActorType,
        store: Arc<MemoryDraftStore>,
        script: &str,
    ) -> (CliOutcome, String, Vec<FormData>) {
        let submitted = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&submitted);
        let mut wizard = Wizard::new(actor, store, move |data: FormData| {
            sink.lock().unwrap().push(data)
        });

        let mut output = Vec::new();
        let outcome = WizardPrompt::new(Cursor::new(script.to_string()), &mut output)
            .run(&mut wizard)
            .unwrap();
        let submitted = submitted.lock().unwrap().clone();
        (outcome, String::from_utf8(output).unwrap(), submitted)
    }

    #[test]
    fn client_signup_end_to_end() {
        let store = Arc::new(MemoryDraftStore::new());
        let script = "Jane Doe\nn\n\
                      jane@x.com\nlongpass1\nlongpass1\nn\n\
                      +15551234567\nn\n\
                      y\nn\n";
        let (outcome, output, submitted) = run_script(ActorType::Client, store.clone(), script);

        assert_eq!(outcome, CliOutcome::Submitted);
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].full_name, "Jane Doe");
        assert!(submitted[0].agree_to_terms);
        assert!(output.contains("Step 4/4: Complete Setup"));
        assert!(output.contains("Name: Jane Doe"));
        assert!(!output.contains("longpass1"));
        assert!(store.is_empty());
    }

    #[test]
    fn blocked_step_prints_errors_and_retries() {
        let store = Arc::new(MemoryDraftStore::new());
        let script = "\nn\nJane\nq\n";
        let (outcome, output, submitted) = run_script(ActorType::Client, store.clone(), script);

        assert_eq!(outcome, CliOutcome::Abandoned);
        assert!(output.contains("Full name: Full name is required"));
        assert!(output.contains("! Full name is required"));
        assert!(submitted.is_empty());
        let draft = store.load(ActorType::Client).unwrap().unwrap();
        assert_eq!(draft.full_name, "Jane");
    }

    #[test]
    fn previous_on_first_step_cancels() {
        let store = Arc::new(MemoryDraftStore::new());
        let (outcome, output, _) = run_script(ActorType::Organization, store, "\n\np\n");
        assert_eq!(outcome, CliOutcome::Cancelled);
        assert!(output.contains("back to selection"));
    }

    #[test]
    fn eof_abandons() {
        let store = Arc::new(MemoryDraftStore::new());
        let (outcome, _, _) = run_script(ActorType::Agent, store, "Sam");
        assert_eq!(outcome, CliOutcome::Abandoned);
    }

    #[test]
    fn tags_accept_numbers_and_names() {
        assert_eq!(
            parse_tags("1, 3,Custom Service, 1"),
            vec![
                "Canada PR".to_string(),
                "Work Permit".to_string(),
                "Custom Service".to_string()
            ]
        );
        assert_eq!(parse_tags("99"), vec!["99".to_string()]);
        assert!(parse_tags("-").is_empty());
    }

    #[test]
    fn yes_no_parsing() {
        assert_eq!(parse_yes_no("Yes"), Some(true));
        assert_eq!(parse_yes_no("n"), Some(false));
        assert_eq!(parse_yes_no("maybe"), None);
    }

    #[test]
    fn passwords_are_masked_in_prompts() {
        let data = FormData {
            password: "secret123".into(),
            ..Default::default()
        };
        assert_eq!(display_value(&data, Field::Password), "********");
        assert_eq!(display_value(&data, Field::ConfirmPassword), "");
    }
}
