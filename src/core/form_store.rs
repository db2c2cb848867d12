use crate::core::field::FieldId;
use crate::core::validation::Validation;
use crate::core::value::Value;
use crate::runtime::event::FormEvent;
use indexmap::IndexMap;

/// State of one active form instance: values, first-seen initial values,
/// touched flags, per-field validation results and the submission flags.
///
/// The store has no schema; unknown ids are created on demand and none of
/// the operations fail. Every mutation returns the events it produced, and
/// an operation that changes nothing returns none, which is what makes
/// validation republication safe to run on every refresh.
#[derive(Default)]
pub struct FormStore {
    fields: IndexMap<FieldId, Value>,
    initial_fields: IndexMap<FieldId, Value>,
    touched: IndexMap<FieldId, bool>,
    field_validation: IndexMap<FieldId, Validation>,
    submitted: bool,
    saving: bool,
}

impl FormStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(&self, id: &str) -> Option<&Value> {
        self.fields.get(id)
    }

    pub fn is_touched(&self, id: &str) -> bool {
        self.touched.get(id).copied().unwrap_or(false)
    }

    pub fn validation(&self, id: &str) -> Option<&Validation> {
        self.field_validation.get(id)
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Upserts one field value. The first write for an id also captures the
    /// initial value used for dirty comparison; later writes never touch it.
    pub fn set_field(&mut self, id: impl Into<FieldId>, value: Value) -> Vec<FormEvent> {
        let id = id.into();
        if self.fields.get(&id) == Some(&value) {
            return vec![];
        }

        if !self.initial_fields.contains_key(&id) {
            self.initial_fields.insert(id.clone(), value.clone());
        }
        self.fields.insert(id.clone(), value.clone());

        vec![FormEvent::FieldChanged { id, value }]
    }

    /// Bulk upsert merge; initial values are captured only for ids not
    /// already initialized.
    pub fn set_fields(&mut self, values: IndexMap<FieldId, Value>) -> Vec<FormEvent> {
        let mut events = Vec::new();
        for (id, value) in values {
            events.extend(self.set_field(id, value));
        }
        events
    }

    /// Snapshot of the fields that currently hold a defined value.
    pub fn form_fields(&self) -> IndexMap<FieldId, Value> {
        self.fields
            .iter()
            .filter(|(_, value)| !matches!(value, Value::None))
            .map(|(id, value)| (id.clone(), value.clone()))
            .collect()
    }

    /// A form is dirty when any tracked id's current value differs
    /// structurally from its captured initial value.
    pub fn is_form_dirty(&self) -> bool {
        let ids = self
            .fields
            .keys()
            .chain(self.initial_fields.keys())
            .collect::<indexmap::IndexSet<_>>();

        ids.into_iter().any(|id| {
            let current = self.fields.get(id).unwrap_or(&Value::None);
            let initial = self.initial_fields.get(id).unwrap_or(&Value::None);
            current != initial
        })
    }

    /// A form is valid when every published validation entry is valid.
    /// Fields without an entry are unvalidated and count as valid.
    pub fn is_form_valid(&self) -> bool {
        self.field_validation.values().all(Validation::is_valid)
    }

    pub fn set_touched(&mut self, id: impl Into<FieldId>, touched: bool) -> Vec<FormEvent> {
        let id = id.into();
        if self.is_touched(id.as_str()) == touched {
            return vec![];
        }
        self.touched.insert(id.clone(), touched);
        vec![FormEvent::TouchedChanged { id, touched }]
    }

    /// Publishes a validation result for a field. Structurally identical
    /// results are dropped so downstream observers are not re-notified;
    /// `None` removes the entry entirely.
    pub fn set_field_validation(
        &mut self,
        id: impl Into<FieldId>,
        validation: Option<Validation>,
    ) -> Vec<FormEvent> {
        let id = id.into();
        match validation {
            Some(validation) => {
                if self.field_validation.get(&id) == Some(&validation) {
                    return vec![];
                }
                self.field_validation.insert(id.clone(), validation);
                vec![FormEvent::ValidationChanged { id }]
            }
            None => {
                if self.field_validation.shift_remove(&id).is_none() {
                    return vec![];
                }
                vec![FormEvent::ValidationChanged { id }]
            }
        }
    }

    /// Every published validation entry, in field registration order.
    pub fn validation_entries(&self) -> impl Iterator<Item = (&FieldId, &Validation)> {
        self.field_validation.iter()
    }

    pub fn set_submitted(&mut self, submitted: bool) -> Vec<FormEvent> {
        if self.submitted == submitted {
            return vec![];
        }
        self.submitted = submitted;
        vec![FormEvent::SubmittedChanged { submitted }]
    }

    pub fn set_saving(&mut self, saving: bool) -> Vec<FormEvent> {
        if self.saving == saving {
            return vec![];
        }
        self.saving = saving;
        vec![FormEvent::SavingChanged { saving }]
    }

    /// Clears values and initial captures. Touched, validation and the
    /// submission flags survive a reset.
    pub fn reset_fields(&mut self) -> Vec<FormEvent> {
        if self.fields.is_empty() && self.initial_fields.is_empty() {
            return vec![];
        }
        self.fields.clear();
        self.initial_fields.clear();
        vec![FormEvent::FieldsReset]
    }
}

#[cfg(test)]
mod tests {
    use super::FormStore;
    use crate::core::validation::{ErrorMap, Validation};
    use crate::core::value::Value;
    use crate::runtime::event::FormEvent;

    fn failing_validation() -> Validation {
        let mut errors = ErrorMap::new();
        errors.insert("rule".to_string(), true);
        Validation::new(Some(errors), vec!["Broken.".to_string()])
    }

    #[test]
    fn first_write_captures_initial_value() {
        let mut store = FormStore::new();
        store.set_field("name", Value::text("Banjo"));
        store.set_field("name", Value::text("Mr. Floof"));

        assert!(store.is_form_dirty());
        assert_eq!(store.field("name"), Some(&Value::text("Mr. Floof")));
    }

    #[test]
    fn set_field_is_idempotent() {
        let mut store = FormStore::new();
        let first = store.set_field("a", Value::Number(1));
        let second = store.set_field("a", Value::Number(1));

        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
        assert!(!store.is_form_dirty());
    }

    #[test]
    fn dirty_round_trips_back_to_clean() {
        let mut store = FormStore::new();
        store.set_field("a", Value::Number(1));
        store.set_field("a", Value::Number(2));
        assert!(store.is_form_dirty());

        store.set_field("a", Value::Number(1));
        assert!(!store.is_form_dirty());
    }

    #[test]
    fn bulk_set_only_initializes_new_ids() {
        let mut store = FormStore::new();
        store.set_field("kept", Value::text("original"));
        store.set_field("kept", Value::text("edited"));

        let mut batch = indexmap::IndexMap::new();
        batch.insert("kept".into(), Value::text("edited"));
        batch.insert("fresh".into(), Value::text("seed"));
        store.set_fields(batch);

        // "kept" still compares against its first capture.
        assert!(store.is_form_dirty());
        store.set_field("kept", Value::text("original"));
        assert!(!store.is_form_dirty());
    }

    #[test]
    fn form_fields_filters_undefined_values() {
        let mut store = FormStore::new();
        store.set_field("a", Value::text("x"));
        store.set_field("b", Value::None);

        let snapshot = store.form_fields();
        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.contains_key("a"));
    }

    #[test]
    fn identical_validation_publish_is_a_no_op() {
        let mut store = FormStore::new();
        let first = store.set_field_validation("a", Some(failing_validation()));
        let second = store.set_field_validation("a", Some(failing_validation()));

        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
        assert!(!store.is_form_valid());
    }

    #[test]
    fn removing_validation_restores_validity() {
        let mut store = FormStore::new();
        store.set_field_validation("a", Some(failing_validation()));
        let removed = store.set_field_validation("a", None);
        let removed_again = store.set_field_validation("a", None);

        assert_eq!(removed, vec![FormEvent::ValidationChanged { id: "a".into() }]);
        assert!(removed_again.is_empty());
        assert!(store.is_form_valid());
    }

    #[test]
    fn unvalidated_fields_count_as_valid() {
        let mut store = FormStore::new();
        store.set_field("free_text", Value::text("anything"));
        assert!(store.is_form_valid());
    }

    #[test]
    fn reset_clears_values_but_not_flags() {
        let mut store = FormStore::new();
        store.set_field("a", Value::text("x"));
        store.set_touched("a", true);
        store.set_submitted(true);

        store.reset_fields();

        assert!(store.field("a").is_none());
        assert!(!store.is_form_dirty());
        assert!(store.is_touched("a"));
        assert!(store.is_submitted());
    }

    #[test]
    fn saving_flag_events_fire_on_change_only() {
        let mut store = FormStore::new();
        assert_eq!(store.set_saving(true).len(), 1);
        assert!(store.set_saving(true).is_empty());
        assert_eq!(store.set_saving(false).len(), 1);
    }
}
