// File: src/controller.rs
// Purpose: Form controller tracking values, errors, touched flags and the submitting flag

use crate::field::{Field, FormValues};
use crate::schema::{FormErrors, ValidationSchema};
use crate::submit::{SubmitError, SubmitHandler};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, error};

/// What the error region of a field shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "lowercase")]
pub enum FieldState {
    /// Never blurred; no feedback yet
    Untouched,
    /// Touched and passing its rule
    Valid,
    /// Touched and failing its rule
    Invalid(String),
}

impl FieldState {
    pub fn is_invalid(&self) -> bool {
        matches!(self, FieldState::Invalid(_))
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            FieldState::Invalid(message) => Some(message),
            _ => None,
        }
    }
}

/// State of a single contact form
///
/// Errors are always derived from the current values through the schema;
/// the touched flags only decide whether they are shown.
#[derive(Debug, Clone)]
pub struct FormController {
    schema: ValidationSchema,
    values: FormValues,
    errors: FormErrors,
    touched: BTreeSet<Field>,
    submitting: bool,
}

impl FormController {
    /// Create a controller with empty values, as on mount
    pub fn new(schema: ValidationSchema) -> Self {
        let values = FormValues::new();
        let errors = schema.errors(&values);
        Self {
            schema,
            values,
            errors,
            touched: BTreeSet::new(),
            submitting: false,
        }
    }

    pub fn schema(&self) -> &ValidationSchema {
        &self.schema
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    /// All current errors, shown or not
    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn is_touched(&self, field: Field) -> bool {
        self.touched.contains(&field)
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Change event: store the new value and re-validate
    pub fn handle_change(&mut self, field: Field, value: impl Into<String>) {
        self.values.set(field, value);
        self.revalidate();
        debug!(field = %field, valid = !self.errors.has_error(field), "Field changed");
    }

    /// Blur event: the field becomes touched
    pub fn handle_blur(&mut self, field: Field) {
        if self.touched.insert(field) {
            debug!(field = %field, "Field touched");
        }
        self.revalidate();
    }

    /// Error display state of a field
    pub fn field_state(&self, field: Field) -> FieldState {
        if !self.is_touched(field) {
            return FieldState::Untouched;
        }
        match self.errors.get(field) {
            Some(message) => FieldState::Invalid(message.to_string()),
            None => FieldState::Valid,
        }
    }

    /// The error shown for a field: only when touched and invalid
    pub fn visible_error(&self, field: Field) -> Option<&str> {
        if self.is_touched(field) {
            self.errors.get(field)
        } else {
            None
        }
    }

    /// Start a submit
    ///
    /// Every field is marked touched so that all failures become visible.
    /// On success the submitting flag is raised and a copy of the values is
    /// returned for the completion handler; call [`finish_submit`] with the
    /// handler's outcome afterwards.
    ///
    /// [`finish_submit`]: FormController::finish_submit
    pub fn begin_submit(&mut self) -> Result<FormValues, SubmitError> {
        if self.submitting {
            return Err(SubmitError::InProgress);
        }

        self.touched.extend(self.schema.fields());
        self.revalidate();

        if !self.errors.is_empty() {
            debug!(invalid = self.errors.len(), "Submit blocked by validation");
            return Err(SubmitError::Invalid(self.errors.clone()));
        }

        self.submitting = true;
        Ok(self.values.clone())
    }

    /// Complete a submit started with [`begin_submit`]
    ///
    /// A successful outcome resets the form; a failed one keeps the values
    /// so the user can retry.
    ///
    /// [`begin_submit`]: FormController::begin_submit
    pub fn finish_submit(&mut self, outcome: anyhow::Result<()>) -> Result<(), SubmitError> {
        self.submitting = false;
        match outcome {
            Ok(()) => {
                self.reset();
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Submit handler failed");
                Err(SubmitError::Handler(e))
            }
        }
    }

    /// Validate, hand the values to `handler`, then reset on success
    pub async fn submit(&mut self, handler: &dyn SubmitHandler) -> Result<(), SubmitError> {
        let values = self.begin_submit()?;
        let outcome = handler.submit(values).await;
        self.finish_submit(outcome)
    }

    /// Back to empty, untouched values
    pub fn reset(&mut self) {
        self.values = FormValues::new();
        self.touched.clear();
        self.revalidate();
    }

    fn revalidate(&mut self) {
        self.errors = self.schema.errors(&self.values);
    }
}

impl Default for FormController {
    fn default() -> Self {
        Self::new(ValidationSchema::default())
    }
}

/// Serializable view of the controller for JSON consumers
#[derive(Debug, Clone, Serialize)]
pub struct FormSnapshot {
    pub values: FormValues,
    pub fields: Vec<(Field, FieldState)>,
    pub submitting: bool,
    pub valid: bool,
}

impl From<&FormController> for FormSnapshot {
    fn from(form: &FormController) -> Self {
        Self {
            values: form.values.clone(),
            fields: form.schema.fields().map(|f| (f, form.field_state(f))).collect(),
            submitting: form.submitting,
            valid: form.is_valid(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{COUNTRY_REQUIRED, EMAIL_INVALID, NAME_REQUIRED};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSubmit {
        received: Mutex<Vec<FormValues>>,
        fail: bool,
    }

    #[async_trait]
    impl SubmitHandler for RecordingSubmit {
        async fn submit(&self, values: FormValues) -> anyhow::Result<()> {
            self.received.lock().unwrap().push(values);
            if self.fail {
                anyhow::bail!("backend unavailable");
            }
            Ok(())
        }
    }

    fn filled() -> FormController {
        let mut form = FormController::default();
        form.handle_change(Field::Name, "Ada");
        form.handle_change(Field::Email, "ada@example.com");
        form
    }

    #[test]
    fn test_initially_untouched() {
        let form = FormController::default();
        for field in Field::ALL {
            assert_eq!(form.field_state(field), FieldState::Untouched);
            assert_eq!(form.visible_error(field), None);
        }
        // Errors exist but are hidden
        assert!(!form.is_valid());
        assert!(!form.is_submitting());
    }

    #[test]
    fn test_blur_reveals_error() {
        let mut form = FormController::default();
        form.handle_blur(Field::Name);

        assert_eq!(form.field_state(Field::Name), FieldState::Invalid(NAME_REQUIRED.into()));
        assert_eq!(form.visible_error(Field::Name), Some(NAME_REQUIRED));
        assert_eq!(form.visible_error(Field::Email), None);
    }

    #[test]
    fn test_change_before_touch_stays_hidden() {
        let mut form = FormController::default();
        form.handle_change(Field::Email, "nope");
        assert_eq!(form.field_state(Field::Email), FieldState::Untouched);
        assert_eq!(form.errors().get(Field::Email), Some(EMAIL_INVALID));
    }

    #[test]
    fn test_touched_field_toggles_with_changes() {
        let mut form = FormController::default();
        form.handle_blur(Field::Email);
        assert!(form.field_state(Field::Email).is_invalid());

        form.handle_change(Field::Email, "ada@example.com");
        assert_eq!(form.field_state(Field::Email), FieldState::Valid);

        form.handle_change(Field::Email, "ada@");
        assert_eq!(form.field_state(Field::Email), FieldState::Invalid(EMAIL_INVALID.into()));
    }

    #[tokio::test]
    async fn test_valid_submit_resets_form() {
        let handler = RecordingSubmit::default();
        let mut form = filled();
        form.handle_blur(Field::Name);

        form.submit(&handler).await.unwrap();

        let received = handler.received.lock().unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].name, "Ada");
        assert_eq!(form.values(), &FormValues::new());
        assert!(!form.is_touched(Field::Name));
        assert!(!form.is_submitting());
    }

    #[tokio::test]
    async fn test_invalid_submit_keeps_values_and_skips_handler() {
        let handler = RecordingSubmit::default();
        let mut form = FormController::default();
        form.handle_change(Field::Name, "Ada");

        let err = form.submit(&handler).await.unwrap_err();

        assert!(matches!(err, SubmitError::Invalid(ref e) if e.has_error(Field::Email)));
        assert!(handler.received.lock().unwrap().is_empty());
        assert_eq!(form.values().name, "Ada");
        // Submit touches every field so the email error is now shown
        assert!(form.visible_error(Field::Email).is_some());
        assert!(!form.is_submitting());
    }

    #[test]
    fn test_submitting_flag_covers_pending_window() {
        let mut form = filled();

        let values = form.begin_submit().unwrap();
        assert_eq!(values.email, "ada@example.com");
        assert!(form.is_submitting());
        assert!(matches!(form.begin_submit(), Err(SubmitError::InProgress)));

        form.finish_submit(Ok(())).unwrap();
        assert!(!form.is_submitting());
        assert_eq!(form.values(), &FormValues::new());
    }

    #[tokio::test]
    async fn test_failed_handler_keeps_values() {
        let handler = RecordingSubmit { fail: true, ..Default::default() };
        let mut form = filled();

        let err = form.submit(&handler).await.unwrap_err();

        assert!(matches!(err, SubmitError::Handler(_)));
        assert_eq!(form.values().name, "Ada");
        assert!(!form.is_submitting());
    }

    #[test]
    fn test_country_required_in_country_variant() {
        let mut form = FormController::new(ValidationSchema::with_country());
        form.handle_change(Field::Name, "Ada");
        form.handle_change(Field::Email, "ada@example.com");

        match form.begin_submit() {
            Err(SubmitError::Invalid(errors)) => {
                assert_eq!(errors.get(Field::Country), Some(COUNTRY_REQUIRED));
            }
            other => panic!("expected invalid submit, got {:?}", other),
        }

        form.handle_change(Field::Country, "France");
        assert_eq!(form.field_state(Field::Country), FieldState::Valid);
        assert!(form.begin_submit().is_ok());
    }

    #[test]
    fn test_snapshot_lists_schema_fields() {
        let mut form = FormController::default();
        form.handle_blur(Field::Name);
        let snapshot = FormSnapshot::from(&form);
        assert_eq!(snapshot.fields.len(), 2);
        assert_eq!(snapshot.fields[0], (Field::Name, FieldState::Invalid(NAME_REQUIRED.into())));
        assert!(!snapshot.valid);
    }
}
