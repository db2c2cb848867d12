pub mod client;
pub mod config;
pub mod core;
pub mod overlay;
pub mod runtime;

pub use crate::core::field;
pub use crate::core::field_binding;
pub use crate::core::form_store;
pub use crate::core::outlet;
pub use crate::core::summary;
pub use crate::core::validation;
pub use crate::core::validators;
pub use crate::core::value;

pub use crate::overlay::alert;
pub use crate::overlay::backdrop;
pub use crate::overlay::dialog;
pub use crate::overlay::form_dialog;
pub use crate::overlay::loading;

pub use crate::runtime::event;
pub use crate::runtime::scheduler;

pub use crate::client::auth;
pub use crate::client::http;
