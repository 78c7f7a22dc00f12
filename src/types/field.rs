use std::cell::Cell;
use std::collections::BTreeMap;
use std::fmt;

use super::form::FormId;
use super::{Rules, Value};

/// The kind of control a field renders as.
///
/// Each kind maps to its own template block; buttons are additionally
/// collected into button stacks by [`RenderStackBuilder`](crate::RenderStackBuilder).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    TextInput,
    TextArea,
    Password,
    Checkbox,
    RadioList,
    SelectBox,
    MultiSelectBox,
    Upload,
    Hidden,
    SubmitButton,
    Button,
    ImageButton,
}

impl FieldKind {
    #[must_use]
    pub fn is_button(self) -> bool {
        matches!(
            self,
            FieldKind::SubmitButton | FieldKind::Button | FieldKind::ImageButton
        )
    }

    /// Name of the template block rendering this kind.
    #[must_use]
    pub fn block_name(self) -> &'static str {
        match self {
            FieldKind::TextInput => "TextInput",
            FieldKind::TextArea => "TextArea",
            FieldKind::Password => "Password",
            FieldKind::Checkbox => "Checkbox",
            FieldKind::RadioList => "RadioList",
            FieldKind::SelectBox => "SelectBox",
            FieldKind::MultiSelectBox => "MultiSelectBox",
            FieldKind::Upload => "UploadControl",
            FieldKind::Hidden => "HiddenField",
            FieldKind::SubmitButton => "SubmitButton",
            FieldKind::Button => "Button",
            FieldKind::ImageButton => "ImageButton",
        }
    }

    /// Default template file for this kind, relative to the template directory.
    #[must_use]
    pub fn template(self) -> String {
        format!("controls/{}.latte", self.block_name())
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.block_name())
    }
}

/// Rendering options of a field.
///
/// The keys the render pass reads are explicit; everything purely
/// presentational (`help`, `status`, `placeholder`, ...) lives in `extra`
/// and is handed to templates untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldOptions {
    /// Replaces the kind's default template.
    pub template: Option<String>,
    /// Template for the button stack this button ends up in.
    pub stack_template: Option<String>,
    /// Index of the group the field belongs to.
    pub group: Option<usize>,
    pub extra: BTreeMap<String, Value>,
}

impl FieldOptions {
    #[must_use]
    pub fn option(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    #[must_use]
    pub fn option_or<'a>(&'a self, key: &str, default: &'a Value) -> &'a Value {
        self.extra.get(key).unwrap_or(default)
    }
}

/// One control of a form.
#[derive(Debug, PartialEq)]
pub struct Field {
    pub(crate) name: String,
    pub(crate) kind: FieldKind,
    pub(crate) label: Option<String>,
    pub(crate) form: FormId,
    pub(crate) rules: Rules,
    pub(crate) errors: Vec<String>,
    pub(crate) options: FieldOptions,
    rendered: Cell<bool>,
}

impl Field {
    pub(crate) fn new(name: &str, kind: FieldKind, form: FormId) -> Self {
        Self {
            name: name.to_owned(),
            kind,
            label: None,
            form,
            rules: Rules::new(),
            errors: Vec::new(),
            options: FieldOptions::default(),
            rendered: Cell::new(false),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    #[must_use]
    pub fn is_button(&self) -> bool {
        self.kind.is_button()
    }

    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Identity of the form this field belongs to.
    #[must_use]
    pub fn form(&self) -> FormId {
        self.form
    }

    #[must_use]
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    #[must_use]
    pub fn options(&self) -> &FieldOptions {
        &self.options
    }

    /// Template used when this field is rendered on its own.
    #[must_use]
    pub fn template(&self) -> String {
        self.options
            .template
            .clone()
            .unwrap_or_else(|| self.kind.template())
    }

    /// Whether the field was already placed during the current render pass.
    #[must_use]
    pub fn is_rendered(&self) -> bool {
        self.rendered.get()
    }

    pub fn set_rendered(&self, rendered: bool) {
        self.rendered.set(rendered);
    }
}

/// Builder passed to the field definition closure of
/// [`FormBuilder::field()`](super::FormBuilder::field).
#[derive(Debug)]
pub struct FieldBuilder {
    pub(crate) field: Field,
}

impl FieldBuilder {
    #[must_use]
    pub fn label(mut self, label: &str) -> Self {
        self.field.label = Some(label.to_owned());
        self
    }

    /// Shorthand for a `filled` validator.
    #[must_use]
    pub fn required(self, message: &str) -> Self {
        self.rule(super::Rule::validator(":filled", message))
    }

    #[must_use]
    pub fn rule(mut self, rule: super::Rule) -> Self {
        self.field.rules.push(rule);
        self
    }

    /// Replace the whole rule list, including its toggles.
    #[must_use]
    pub fn rules(mut self, rules: Rules) -> Self {
        self.field.rules = rules;
        self
    }

    #[must_use]
    pub fn error(mut self, message: &str) -> Self {
        self.field.errors.push(message.to_owned());
        self
    }

    #[must_use]
    pub fn template(mut self, template: &str) -> Self {
        self.field.options.template = Some(template.to_owned());
        self
    }

    #[must_use]
    pub fn stack_template(mut self, template: &str) -> Self {
        self.field.options.stack_template = Some(template.to_owned());
        self
    }

    /// Set a presentation option templates may read.
    #[must_use]
    pub fn option(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.field.options.extra.insert(key.to_owned(), value.into());
        self
    }
}
