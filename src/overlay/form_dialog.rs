use crate::core::form_store::FormStore;
use crate::overlay::dialog::ConfirmVariant;
use crate::runtime::event::DialogEvent;

const DEFAULT_DISCARD_MESSAGE: &str =
    "You have unsaved changes. Are you sure you want to discard them?";

type Callback = Box<dyn FnOnce() + Send>;

pub struct FormDialogConfig {
    pub title: String,
    pub confirm_label: String,
    pub cancel_label: String,
    pub variant: ConfirmVariant,
    pub disable_backdrop_close: bool,
    pub disable_close_when_invalid: bool,
    discard_message: Option<String>,
    on_confirm: Option<Callback>,
    on_close: Option<Callback>,
}

impl FormDialogConfig {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            confirm_label: "Save".to_string(),
            cancel_label: "Cancel".to_string(),
            variant: ConfirmVariant::Primary,
            disable_backdrop_close: false,
            disable_close_when_invalid: false,
            discard_message: None,
            on_confirm: None,
            on_close: None,
        }
    }

    pub fn with_labels(mut self, confirm: impl Into<String>, cancel: impl Into<String>) -> Self {
        self.confirm_label = confirm.into();
        self.cancel_label = cancel.into();
        self
    }

    pub fn with_variant(mut self, variant: ConfirmVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_discard_message(mut self, message: impl Into<String>) -> Self {
        self.discard_message = Some(message.into());
        self
    }

    pub fn disable_backdrop_close(mut self) -> Self {
        self.disable_backdrop_close = true;
        self
    }

    pub fn disable_close_when_invalid(mut self) -> Self {
        self.disable_close_when_invalid = true;
        self
    }

    pub fn on_confirm(mut self, callback: impl FnOnce() + Send + 'static) -> Self {
        self.on_confirm = Some(Box::new(callback));
        self
    }

    pub fn on_close(mut self, callback: impl FnOnce() + Send + 'static) -> Self {
        self.on_close = Some(Box::new(callback));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseOutcome {
    /// The dialog closed; `on_close` has run.
    Closed,
    /// The embedded form is invalid and the config forbids closing.
    Blocked,
    /// The form is dirty: the caller must show a blocking confirm prompt
    /// and resolve it via `confirm_discard` / `keep_editing`.
    ConfirmDiscard { message: String },
    NotOpen,
}

/// Single-slot dialog wrapping an embedded form. Closing is gated on the
/// form's validity and dirtiness, which the form pushes in via
/// `sync_form_state` whenever its store changes; the dialog shell never
/// reaches into form internals.
#[derive(Default)]
pub struct FormDialogController {
    active: Option<FormDialogConfig>,
    dirty: bool,
    invalid: bool,
    pending_discard: bool,
    saving: bool,
}

impl FormDialogController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&FormDialogConfig> {
        self.active.as_ref()
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn discard_prompt_pending(&self) -> bool {
        self.pending_discard
    }

    pub fn open(&mut self, config: FormDialogConfig) -> Vec<DialogEvent> {
        let replaced = self.active.is_some();
        self.active = Some(config);
        self.dirty = false;
        self.invalid = false;
        self.pending_discard = false;
        self.saving = false;

        if replaced {
            vec![DialogEvent::Replaced]
        } else {
            vec![DialogEvent::Opened]
        }
    }

    /// Mirror of the embedded form's dirtiness/validity, refreshed by the
    /// form whenever its store emits events.
    pub fn sync_form_state(&mut self, store: &FormStore) {
        self.dirty = store.is_form_dirty();
        self.invalid = !store.is_form_valid();
        self.saving = store.is_saving();
    }

    /// Fires the confirm callback. The dialog stays open: submission is
    /// asynchronous and the caller force-closes after a successful save.
    pub fn confirm(&mut self) -> Vec<DialogEvent> {
        let Some(config) = self.active.as_mut() else {
            return vec![];
        };
        if let Some(callback) = config.on_confirm.take() {
            callback();
        }
        vec![DialogEvent::Confirmed]
    }

    /// Applies the close guard. Force-closing (after a successful submit)
    /// skips every check.
    pub fn close(&mut self, force: bool) -> (CloseOutcome, Vec<DialogEvent>) {
        let Some(config) = self.active.as_ref() else {
            return (CloseOutcome::NotOpen, vec![]);
        };

        if force {
            return (CloseOutcome::Closed, self.do_close());
        }

        if config.disable_close_when_invalid && self.invalid {
            return (CloseOutcome::Blocked, vec![DialogEvent::CloseRefused]);
        }

        if self.dirty {
            let message = config
                .discard_message
                .clone()
                .unwrap_or_else(|| DEFAULT_DISCARD_MESSAGE.to_string());
            self.pending_discard = true;
            return (
                CloseOutcome::ConfirmDiscard {
                    message: message.clone(),
                },
                vec![DialogEvent::DiscardPrompted { message }],
            );
        }

        (CloseOutcome::Closed, self.do_close())
    }

    /// Resolves a pending discard prompt by abandoning the form.
    pub fn confirm_discard(&mut self) -> Vec<DialogEvent> {
        if !self.pending_discard {
            return vec![];
        }
        self.pending_discard = false;
        self.do_close()
    }

    /// Resolves a pending discard prompt by keeping the dialog open.
    pub fn keep_editing(&mut self) {
        self.pending_discard = false;
    }

    pub fn backdrop_clicked(&mut self) -> (CloseOutcome, Vec<DialogEvent>) {
        let closable = self
            .active
            .as_ref()
            .is_some_and(|config| !config.disable_backdrop_close);
        if closable {
            self.close(false)
        } else {
            (CloseOutcome::NotOpen, vec![])
        }
    }

    fn do_close(&mut self) -> Vec<DialogEvent> {
        let Some(mut config) = self.active.take() else {
            return vec![];
        };
        self.dirty = false;
        self.invalid = false;
        self.pending_discard = false;
        self.saving = false;

        if let Some(callback) = config.on_close.take() {
            callback();
        }
        vec![DialogEvent::Closed]
    }
}
