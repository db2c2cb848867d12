pub mod field;
pub mod field_binding;
pub mod form_store;
pub mod outlet;
pub mod summary;
pub mod validation;
pub mod validators;
pub mod value;

pub use field::FieldId;
pub use value::Value;
