use crate::runtime::event::DialogEvent;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfirmVariant {
    #[default]
    Primary,
    Danger,
}

type Callback = Box<dyn FnOnce() + Send>;

/// Configuration of one confirm dialog. Built by the caller, consumed by
/// the controller when the dialog resolves.
pub struct DialogConfig {
    pub title: String,
    pub message: String,
    pub confirm_label: String,
    pub cancel_label: String,
    pub variant: ConfirmVariant,
    pub disable_backdrop_close: bool,
    on_confirm: Option<Callback>,
    on_close: Option<Callback>,
}

impl DialogConfig {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            confirm_label: "OK".to_string(),
            cancel_label: "Cancel".to_string(),
            variant: ConfirmVariant::Primary,
            disable_backdrop_close: false,
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

    pub fn disable_backdrop_close(mut self) -> Self {
        self.disable_backdrop_close = true;
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

/// Single-slot confirm-dialog state machine: at most one dialog is open,
/// opening over it replaces the config, and the callbacks of the replaced
/// dialog are dropped unfired.
#[derive(Default)]
pub struct DialogController {
    active: Option<DialogConfig>,
    loading: bool,
}

impl DialogController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&DialogConfig> {
        self.active.as_ref()
    }

    /// Loading flag shown while an async confirm handler runs.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn open(&mut self, config: DialogConfig) -> Vec<DialogEvent> {
        let replaced = self.active.is_some();
        self.active = Some(config);
        self.loading = false;

        if replaced {
            vec![DialogEvent::Replaced]
        } else {
            vec![DialogEvent::Opened]
        }
    }

    /// Fires `on_confirm` exactly once and closes. `on_close` is reserved
    /// for the cancel path.
    pub fn confirm(&mut self) -> Vec<DialogEvent> {
        let Some(mut config) = self.active.take() else {
            return vec![];
        };
        self.loading = false;

        if let Some(callback) = config.on_confirm.take() {
            callback();
        }
        vec![DialogEvent::Confirmed, DialogEvent::Closed]
    }

    /// Closes without confirming, firing `on_close` exactly once.
    pub fn close(&mut self) -> Vec<DialogEvent> {
        let Some(mut config) = self.active.take() else {
            return vec![];
        };
        self.loading = false;

        if let Some(callback) = config.on_close.take() {
            callback();
        }
        vec![DialogEvent::Closed]
    }

    /// Routed from the shared backdrop while this dialog is open.
    pub fn backdrop_clicked(&mut self) -> Vec<DialogEvent> {
        let closable = self
            .active
            .as_ref()
            .is_some_and(|config| !config.disable_backdrop_close);
        if closable { self.close() } else { vec![] }
    }
}
