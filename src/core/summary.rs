use crate::core::field::FieldId;
use crate::core::form_store::FormStore;

/// One failing field in a page-level validation summary. The field id is
/// kept so the page can scroll to and focus the offending input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryEntry {
    pub field: FieldId,
    pub messages: Vec<String>,
}

/// Collects every failing field's messages in field registration order.
/// Callers turn a non-empty summary into an error alert.
pub fn validation_summary(store: &FormStore) -> Vec<SummaryEntry> {
    store
        .validation_entries()
        .filter(|(_, validation)| !validation.is_valid())
        .map(|(id, validation)| SummaryEntry {
            field: id.clone(),
            messages: validation.messages().to_vec(),
        })
        .collect()
}
