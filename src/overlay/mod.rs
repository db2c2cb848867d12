pub mod alert;
pub mod backdrop;
pub mod dialog;
pub mod form_dialog;
pub mod loading;

pub use alert::{Alert, AlertCenter, AlertPatch, AlertVariant};
pub use backdrop::{Backdrop, BackdropHost};
pub use dialog::{ConfirmVariant, DialogConfig, DialogController};
pub use form_dialog::{CloseOutcome, FormDialogConfig, FormDialogController};
pub use loading::LoadingScreen;
