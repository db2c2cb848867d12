use crate::core::field::FieldId;
use crate::core::form_store::FormStore;
use crate::core::validation::{Validation, Validator, ValidatorArgs};
use crate::core::value::Value;
use crate::runtime::event::FormEvent;

/// Binds one field id to a form store: seeds the initial value once, runs
/// the configured validator chain and republishes results into the store
/// only when they actually changed.
pub struct FieldBinding {
    id: FieldId,
    validator: Option<Box<dyn Validator>>,
    secondary: Vec<Box<dyn Validator>>,
    required: bool,
    initial_value: Option<Value>,
    last_run_key: Option<String>,
}

impl FieldBinding {
    pub fn new(id: impl Into<FieldId>) -> Self {
        Self {
            id: id.into(),
            validator: None,
            secondary: Vec::new(),
            required: false,
            initial_value: None,
            last_run_key: None,
        }
    }

    pub fn with_validator(mut self, validator: Box<dyn Validator>) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn with_secondary(mut self, validator: Box<dyn Validator>) -> Self {
        self.secondary.push(validator);
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_initial_value(mut self, value: Value) -> Self {
        self.initial_value = Some(value);
        self
    }

    pub fn id(&self) -> &FieldId {
        &self.id
    }

    /// Seeds the supplied initial value into the store, once: a field that
    /// is already touched or non-blank keeps what it has.
    pub fn mount(&self, store: &mut FormStore) -> Vec<FormEvent> {
        let Some(initial) = &self.initial_value else {
            return vec![];
        };

        let untouched = !store.is_touched(self.id.as_str());
        let blank = store
            .field(self.id.as_str())
            .is_none_or(Value::is_blank);

        if untouched && blank {
            store.set_field(self.id.clone(), initial.clone())
        } else {
            vec![]
        }
    }

    /// The value validation runs against: the store's entry, falling back
    /// to the configured initial value.
    pub fn current_value(&self, store: &FormStore) -> Value {
        store
            .field(self.id.as_str())
            .cloned()
            .or_else(|| self.initial_value.clone())
            .unwrap_or(Value::None)
    }

    /// Recomputes and publishes validation for this field. The run is
    /// keyed off a stable serialization of `(value, args)` so callers that
    /// rebuild args on every refresh do not cause validation thrashing,
    /// and the store itself drops identical publishes.
    pub fn refresh(&mut self, store: &mut FormStore, args: &ValidatorArgs) -> Vec<FormEvent> {
        if self.validator.is_none() && !self.required && self.secondary.is_empty() {
            return vec![];
        }

        let value = self.current_value(store);
        let run_key = format!(
            "{}|{}",
            serde_json::to_string(&value).unwrap_or_default(),
            args.memo_key()
        );
        if self.last_run_key.as_deref() == Some(run_key.as_str()) {
            return vec![];
        }
        self.last_run_key = Some(run_key);

        let mut validation = match &self.validator {
            Some(validator) => validator.validate(&value, args),
            None => Validation::valid(),
        };

        if self.required && value.is_blank() && !validation.has_rule("isRequired") {
            validation = validation.with_leading_rule("isRequired", self.required_message());
        }

        for validator in &self.secondary {
            validation = validation.merge(validator.validate(&value, args));
        }

        store.set_field_validation(self.id.clone(), Some(validation))
    }

    /// Inline errors appear only after the field was touched or the form
    /// was submit-attempted.
    pub fn show_errors(&self, store: &FormStore) -> bool {
        if !store.is_submitted() && !store.is_touched(self.id.as_str()) {
            return false;
        }
        store
            .validation(self.id.as_str())
            .is_some_and(|validation| !validation.messages().is_empty())
    }

    fn required_message(&self) -> String {
        let label = self
            .validator
            .as_ref()
            .map(|validator| validator.label())
            .unwrap_or_default();
        if label.is_empty() {
            "This field is required.".to_string()
        } else {
            format!("{label} is required.")
        }
    }
}
