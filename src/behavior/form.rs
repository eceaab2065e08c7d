use std::collections::HashMap;
use std::sync::OnceLock;

use crate::consts;
use crate::dom::NodeId;
use crate::page::{Page, TimerAction};
use crate::pattern::Pattern;
use crate::Result;

const NAME_REQUIRED: &str = "Name is required";
const NAME_TOO_SHORT: &str = "Name must be at least 2 characters";
const EMAIL_REQUIRED: &str = "Email is required";
const EMAIL_INVALID: &str = "Please enter a valid email address";

const PENDING_LABEL: &str = "Sending...";
const SUCCESS_MESSAGE: &str = "Thank you! Your message has been sent.";

/// Simple email shape check: something that is not whitespace or `@`, an
/// `@`, more of the same, a dot, and more of the same. Deliberately loose;
/// the real gate is the server.
pub fn is_valid_email(input: &str) -> bool {
    static EMAIL: OnceLock<Option<Pattern>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Pattern::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok())
        .as_ref()
        .and_then(|pattern| pattern.is_match(input).ok())
        .unwrap_or(false)
}

fn validate_name(value: &str) -> Option<&'static str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Some(NAME_REQUIRED)
    } else if trimmed.chars().count() < 2 {
        Some(NAME_TOO_SHORT)
    } else {
        None
    }
}

fn validate_email(value: &str) -> Option<&'static str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Some(EMAIL_REQUIRED)
    } else if !is_valid_email(trimmed) {
        Some(EMAIL_INVALID)
    } else {
        None
    }
}

/// Contact form controller. Field references resolve once at init; a page
/// without the form markup leaves the whole controller inert.
#[derive(Debug, Default)]
pub(crate) struct FormState {
    pub(crate) form: Option<NodeId>,
    pub(crate) name_field: Option<NodeId>,
    pub(crate) email_field: Option<NodeId>,
    pub(crate) message_field: Option<NodeId>,
    pub(crate) submit_control: Option<NodeId>,
    pub(crate) submit_label: String,
    pub(crate) pending_timer: Option<i64>,
}

impl Page {
    pub(crate) fn form_init(&mut self) -> Result<()> {
        let form = match self.dom.query_selector("#contact-form")? {
            Some(form) => Some(form),
            None => self.dom.query_selector("form")?,
        };
        let Some(form) = form else {
            return Ok(());
        };
        self.form.form = Some(form);
        self.form.name_field = self
            .dom
            .query_selector_from(form, "#name, [name='name']")?;
        self.form.email_field = self
            .dom
            .query_selector_from(form, "#email, [name='email']")?;
        self.form.message_field = self
            .dom
            .query_selector_from(form, "#message, [name='message']")?;
        self.form.submit_control = self
            .dom
            .query_selector_from(form, "button[type='submit'], input[type='submit']")?;
        if let Some(submit) = self.form.submit_control {
            self.form.submit_label = self.dom.text_content(submit).trim().to_string();
        }
        Ok(())
    }

    /// Submit handling. The default submission is always suppressed; there
    /// is no network call behind this form. Validation failures render
    /// inline; success starts the simulated submission.
    pub(crate) fn form_submit(&mut self, target: NodeId) -> Result<()> {
        let Some(form) = self.form.form else {
            return Ok(());
        };
        if !self.dom.contains(form, target) && target != form {
            return Ok(());
        }

        // A pending submission must never overlap with a second one.
        if self.form.pending_timer.is_some() {
            return Ok(());
        }
        if self
            .form
            .submit_control
            .is_some_and(|submit| self.dom.disabled(submit))
        {
            return Ok(());
        }

        self.form_clear_errors()?;

        let mut errors: Vec<(NodeId, &'static str)> = Vec::new();
        if let Some(field) = self.form.name_field {
            let value = self.dom.value(field).unwrap_or_default().to_string();
            if let Some(message) = validate_name(&value) {
                errors.push((field, message));
            }
        }
        if let Some(field) = self.form.email_field {
            let value = self.dom.value(field).unwrap_or_default().to_string();
            if let Some(message) = validate_email(&value) {
                errors.push((field, message));
            }
        }

        if errors.is_empty() {
            if let Some(submit) = self.form.submit_control {
                self.dom.set_disabled(submit, true)?;
                self.dom.set_text_content(submit, PENDING_LABEL)?;
            }
            let id = self.schedule(consts::SUBMIT_DELAY_MS, TimerAction::FinishSubmission);
            self.form.pending_timer = Some(id);
        } else {
            for (field, message) in errors {
                self.show_field_error(field, message)?;
            }
        }
        Ok(())
    }

    /// The simulated submission completing after its fixed delay.
    pub(crate) fn form_finish_submission(&mut self) -> Result<()> {
        self.form.pending_timer = None;

        self.toast_show(SUCCESS_MESSAGE, "success")?;

        for field in [
            self.form.name_field,
            self.form.email_field,
            self.form.message_field,
        ]
        .into_iter()
        .flatten()
        {
            self.dom.set_value(field, "")?;
        }

        if let Some(submit) = self.form.submit_control {
            self.dom.set_disabled(submit, false)?;
            let label = self.form.submit_label.clone();
            self.dom.set_text_content(submit, &label)?;
        }

        self.form_clear_errors()?;
        Ok(())
    }

    /// Blur re-validates just the blurred field for responsive feedback.
    pub(crate) fn field_blur(&mut self, field: NodeId) -> Result<()> {
        let rule: Option<fn(&str) -> Option<&'static str>> =
            if self.form.name_field == Some(field) {
                Some(validate_name)
            } else if self.form.email_field == Some(field) {
                Some(validate_email)
            } else {
                None
            };
        let Some(rule) = rule else {
            return Ok(());
        };

        self.clear_field_error(field)?;
        let value = self.dom.value(field).unwrap_or_default().to_string();
        if let Some(message) = rule(&value) {
            self.show_field_error(field, message)?;
        }
        Ok(())
    }

    /// Typing clears the field's error optimistically without re-validating.
    pub(crate) fn field_input(&mut self, field: NodeId) -> Result<()> {
        if [
            self.form.name_field,
            self.form.email_field,
            self.form.message_field,
        ]
        .contains(&Some(field))
        {
            self.clear_field_error(field)?;
        }
        Ok(())
    }

    /// Each invalid field carries at most one error annotation; showing a
    /// new one always clears the old one first.
    pub(crate) fn show_field_error(&mut self, field: NodeId, message: &str) -> Result<()> {
        self.clear_field_error(field)?;
        let error = self.dom.create_detached_element(
            "span".into(),
            HashMap::from([
                ("class".to_string(), "field-error".to_string()),
                ("role".to_string(), "alert".to_string()),
            ]),
        );
        self.dom.create_text(error, message.to_string());
        self.dom.insert_after(field, error)?;
        self.dom.set_attr(field, "aria-invalid", "true")?;
        Ok(())
    }

    pub(crate) fn clear_field_error(&mut self, field: NodeId) -> Result<()> {
        self.dom.remove_attr(field, "aria-invalid")?;
        let Some(parent) = self.dom.parent(field) else {
            return Ok(());
        };
        let siblings = self.dom.children(parent).to_vec();
        let Some(at) = siblings.iter().position(|child| *child == field) else {
            return Ok(());
        };
        // Only the annotation directly following the field belongs to it.
        if let Some(next) = siblings.get(at + 1).copied() {
            if self.dom.class_contains(next, "field-error") {
                self.dom.detach(next);
            }
        }
        Ok(())
    }

    pub(crate) fn form_clear_errors(&mut self) -> Result<()> {
        for field in [
            self.form.name_field,
            self.form.email_field,
            self.form.message_field,
        ]
        .into_iter()
        .flatten()
        {
            self.clear_field_error(field)?;
        }
        Ok(())
    }
}
