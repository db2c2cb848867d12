use crate::core::form_store::FormStore;
use crate::runtime::event::FormEvent;

/// Proof that a submission was started. Not `Copy` and not constructible
/// outside this module, so a finish without a begin cannot be written.
#[derive(Debug)]
pub struct SubmitTicket {
    _private: (),
}

#[derive(Debug)]
pub enum SubmitAttempt {
    /// The save may proceed; hand the ticket back to `finish`.
    Started(SubmitTicket),
    /// The form has failing validation entries; nothing was started.
    Invalid,
    /// A save is already in flight; the attempt was dropped.
    AlreadySaving,
}

/// Submission boundary for one form. Catches submit failures in exactly one
/// place and guarantees the saving flag is cleared whatever the outcome.
pub struct FormOutlet<E> {
    on_failure: Option<Box<dyn FnMut(E) + Send>>,
}

impl<E> Default for FormOutlet<E> {
    fn default() -> Self {
        Self { on_failure: None }
    }
}

impl<E: std::fmt::Debug> FormOutlet<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_failure(mut self, callback: impl FnMut(E) + Send + 'static) -> Self {
        self.on_failure = Some(Box::new(callback));
        self
    }

    /// Marks the form submit-attempted and, when it is valid and no save is
    /// in flight, flips the saving flag and returns a ticket.
    pub fn begin(&mut self, store: &mut FormStore, events: &mut Vec<FormEvent>) -> SubmitAttempt {
        if store.is_saving() {
            return SubmitAttempt::AlreadySaving;
        }

        events.extend(store.set_submitted(true));

        if !store.is_form_valid() {
            return SubmitAttempt::Invalid;
        }

        events.extend(store.set_saving(true));
        SubmitAttempt::Started(SubmitTicket { _private: () })
    }

    /// Completes a submission. The saving flag is always cleared; an error
    /// goes to the registered failure callback and is never swallowed.
    pub fn finish(
        &mut self,
        store: &mut FormStore,
        ticket: SubmitTicket,
        result: Result<(), E>,
        events: &mut Vec<FormEvent>,
    ) {
        drop(ticket);
        events.extend(store.set_saving(false));

        if let Err(error) = result {
            match &mut self.on_failure {
                Some(callback) => callback(error),
                None => tracing::error!(?error, "form submission failed with no failure handler"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FormOutlet, SubmitAttempt};
    use crate::core::form_store::FormStore;
    use crate::core::validation::{ErrorMap, Validation};
    use std::sync::{Arc, Mutex};

    fn failing_validation() -> Validation {
        let mut errors = ErrorMap::new();
        errors.insert("rule".to_string(), true);
        Validation::new(Some(errors), vec!["Broken.".to_string()])
    }

    #[test]
    fn begin_refuses_while_saving() {
        let mut store = FormStore::new();
        let mut outlet = FormOutlet::<String>::new();
        let mut events = Vec::new();

        let first = outlet.begin(&mut store, &mut events);
        assert!(matches!(first, SubmitAttempt::Started(_)));
        assert!(store.is_saving());

        let second = outlet.begin(&mut store, &mut events);
        assert!(matches!(second, SubmitAttempt::AlreadySaving));
    }

    #[test]
    fn invalid_form_marks_submitted_but_does_not_save() {
        let mut store = FormStore::new();
        store.set_field_validation("email", Some(failing_validation()));
        let mut outlet = FormOutlet::<String>::new();
        let mut events = Vec::new();

        let attempt = outlet.begin(&mut store, &mut events);

        assert!(matches!(attempt, SubmitAttempt::Invalid));
        assert!(store.is_submitted());
        assert!(!store.is_saving());
    }

    #[test]
    fn finish_clears_saving_and_routes_failure() {
        let failures = Arc::new(Mutex::new(Vec::<String>::new()));
        let sink = Arc::clone(&failures);

        let mut store = FormStore::new();
        let mut outlet = FormOutlet::new().on_failure(move |error| {
            sink.lock().expect("lock").push(error);
        });
        let mut events = Vec::new();

        let SubmitAttempt::Started(ticket) = outlet.begin(&mut store, &mut events) else {
            panic!("submission should start");
        };
        outlet.finish(&mut store, ticket, Err("boom".to_string()), &mut events);

        assert!(!store.is_saving());
        assert_eq!(failures.lock().expect("lock").as_slice(), &["boom".to_string()]);
    }

    #[test]
    fn finish_on_success_just_clears_saving() {
        let mut store = FormStore::new();
        let mut outlet = FormOutlet::<String>::new();
        let mut events = Vec::new();

        let SubmitAttempt::Started(ticket) = outlet.begin(&mut store, &mut events) else {
            panic!("submission should start");
        };
        outlet.finish(&mut store, ticket, Ok(()), &mut events);

        assert!(!store.is_saving());
        assert!(store.is_submitted());
    }
}
