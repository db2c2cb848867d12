use crate::core::value::Value;
use indexmap::IndexMap;
use serde::Serialize;

/// Failed rules only. A key maps to `true` when the rule failed; passing
/// rules are never inserted.
pub type ErrorMap = IndexMap<String, bool>;

/// Immutable result of one validator evaluation.
///
/// Invariant: `errors` is `None` exactly when `messages` is empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Validation {
    errors: Option<ErrorMap>,
    messages: Vec<String>,
}

impl Validation {
    pub fn valid() -> Self {
        Self::default()
    }

    pub fn new(errors: Option<ErrorMap>, messages: Vec<String>) -> Self {
        match errors {
            Some(map) if !map.is_empty() => Self {
                errors: Some(map),
                messages,
            },
            _ => Self::valid(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_none()
    }

    pub fn errors(&self) -> Option<&ErrorMap> {
        self.errors.as_ref()
    }

    pub fn messages(&self) -> &[String] {
        self.messages.as_slice()
    }

    pub fn has_rule(&self, rule: &str) -> bool {
        self.errors
            .as_ref()
            .is_some_and(|map| map.contains_key(rule))
    }

    /// Shallow-merge `other` into `self`: later error keys overwrite earlier
    /// ones of the same name, messages are concatenated after `self`'s.
    pub fn merge(self, other: Validation) -> Validation {
        if other.is_valid() {
            return self;
        }
        if self.is_valid() {
            return other;
        }

        let mut errors = self.errors.unwrap_or_default();
        for (rule, failed) in other.errors.unwrap_or_default() {
            errors.insert(rule, failed);
        }

        let mut messages = self.messages;
        messages.extend(other.messages);

        Validation::new(Some(errors), messages)
    }

    /// Prepends a failed rule so its message is reported first. Used to
    /// inject the synthetic required failure ahead of validator messages.
    pub fn with_leading_rule(self, rule: impl Into<String>, message: impl Into<String>) -> Validation {
        let mut errors = ErrorMap::new();
        errors.insert(rule.into(), true);
        for (key, failed) in self.errors.unwrap_or_default() {
            errors.insert(key, failed);
        }

        let mut messages = vec![message.into()];
        messages.extend(self.messages);

        Validation::new(Some(errors), messages)
    }
}

/// Contextual arguments handed to validators alongside the value. The memo
/// key is a deterministic serialization so callers can detect that freshly
/// rebuilt args are in fact unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidatorArgs {
    /// Counterpart value for matching-field rules (confirm password).
    pub compare_to: Option<Value>,
    /// Values already taken, for uniqueness rules.
    pub existing: Vec<String>,
    /// The field's own original value, exempt from uniqueness when editing.
    pub original: Option<String>,
}

impl ValidatorArgs {
    pub fn memo_key(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// A stateless validation unit: an ordered table of named rules, a check
/// that reports the failed ones, and a label used to phrase messages.
pub trait Validator: Send {
    fn label(&self) -> &str;

    /// Declared rules as `(rule key, message)` pairs. Message emission
    /// follows this declaration order, not failure order.
    fn rules(&self) -> &[(&'static str, &'static str)];

    /// Evaluates the rules against a non-blank value, returning the failed
    /// ones, or `None` when everything passed.
    fn check(&self, value: &Value, args: &ValidatorArgs) -> Option<ErrorMap>;

    fn message_for(&self, rule: &str) -> String {
        self.rules()
            .iter()
            .find(|(key, _)| *key == rule)
            .map(|(_, message)| (*message).to_string())
            .unwrap_or_else(|| format!("Invalid input: {rule}."))
    }

    /// Full evaluation: blank values short-circuit to valid (the required
    /// rule is the caller's concern), then failed rules are rendered into
    /// messages in declaration order, unmapped keys last.
    fn validate(&self, value: &Value, args: &ValidatorArgs) -> Validation {
        if value.is_blank() {
            return Validation::valid();
        }

        let Some(errors) = self.check(value, args) else {
            return Validation::valid();
        };
        if errors.is_empty() {
            return Validation::valid();
        }

        let mut messages = Vec::with_capacity(errors.len());
        for (rule, _) in self.rules() {
            if errors.contains_key(*rule) {
                messages.push(self.message_for(rule));
            }
        }
        for rule in errors.keys() {
            if !self.rules().iter().any(|(key, _)| *key == rule.as_str()) {
                messages.push(self.message_for(rule));
            }
        }

        Validation::new(Some(errors), messages)
    }
}

/// Validator for fields that only carry the required flag.
pub struct NoopValidator {
    label: String,
}

impl NoopValidator {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl Validator for NoopValidator {
    fn label(&self) -> &str {
        &self.label
    }

    fn rules(&self) -> &[(&'static str, &'static str)] {
        &[]
    }

    fn check(&self, _value: &Value, _args: &ValidatorArgs) -> Option<ErrorMap> {
        None
    }
}

pub(crate) fn failed(rules: &[&str]) -> ErrorMap {
    rules.iter().map(|rule| (rule.to_string(), true)).collect()
}
