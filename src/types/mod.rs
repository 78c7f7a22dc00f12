mod error;
mod field;
mod form;
mod rule;
mod value;

pub use error::FormError;
pub use field::{Field, FieldBuilder, FieldKind, FieldOptions};
pub use form::{
    add_form_class, control_name, find_fields, Form, FormBuilder, FormId, Group, GroupBuilder,
};
pub use rule::{CallbackTarget, Operation, Rule, Rules};
pub use value::Value;
