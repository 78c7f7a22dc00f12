mod config;
mod error;
mod export;
pub mod literal;
mod render;
mod stack;
mod types;

pub use config::{RendererConfig, TemplateStyle};
pub use error::NestrapsError;
pub use export::{export_payload, export_rules, format_message};
pub use render::{FormView, GroupView, Renderer, Translator};
pub use stack::{RenderStackBuilder, RenderUnit, BUTTON_STACK_TEMPLATE};
pub use types::{
    add_form_class, control_name, find_fields, CallbackTarget, Field, FieldBuilder, FieldKind,
    FieldOptions, Form, FormBuilder, FormError, FormId, Group, GroupBuilder, Operation, Rule,
    Rules, Value,
};
