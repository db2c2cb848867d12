use crate::core::field::FieldId;
use crate::core::value::Value;

/// Emitted by the form store when its state actually changes. No-op
/// mutations emit nothing, so hosts can re-render on every event without
/// looping.
#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    FieldChanged { id: FieldId, value: Value },
    ValidationChanged { id: FieldId },
    TouchedChanged { id: FieldId, touched: bool },
    FieldsReset,
    SubmittedChanged { submitted: bool },
    SavingChanged { saving: bool },
}

/// Emitted by the alert center as entries move through their lifecycle.
/// `Exiting` starts the removal animation window; `Removed` follows once
/// it elapses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertEvent {
    Added { id: String },
    Entered { id: String },
    Exiting { id: String },
    Removed { id: String },
    Cleared,
}

/// Emitted by the dialog orchestrators. Hosts react to these to mount and
/// unmount the dialog surface; backdrop state is derived separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogEvent {
    Opened,
    Replaced,
    Confirmed,
    Closed,
    CloseRefused,
    DiscardPrompted { message: String },
}

/// Emitted by the loading screen controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadingEvent {
    Shown,
    MessageChanged { message: Option<String> },
    Hidden,
}
