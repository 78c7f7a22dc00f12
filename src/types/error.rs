use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormError {
    #[error("duplicate field name '{name}'")]
    DuplicateField { name: String },

    #[error("undefined control '{control}' referenced by rules of field '{field}'")]
    UndefinedControl { field: String, control: String },

    #[error("empty field name")]
    EmptyName,
}
