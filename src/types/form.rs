use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use super::error::FormError;
use super::field::{Field, FieldBuilder, FieldKind};

static NEXT_FORM_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a [`Form`] instance. Two forms never share an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormId(u64);

impl FormId {
    pub(crate) fn next() -> Self {
        Self(NEXT_FORM_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "form#{}", self.0)
    }
}

/// A labelled partition of a form's fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub(crate) label: String,
    pub(crate) description: Option<String>,
    pub(crate) visual: bool,
    pub(crate) members: Vec<usize>,
}

impl Group {
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Non-visual groups are not rendered as sections of their own.
    #[must_use]
    pub fn is_visual(&self) -> bool {
        self.visual
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Builder passed to the closure of [`FormBuilder::group()`].
#[derive(Debug)]
pub struct GroupBuilder {
    group: Group,
}

impl GroupBuilder {
    #[must_use]
    pub fn description(mut self, description: &str) -> Self {
        self.group.description = Some(description.to_owned());
        self
    }

    #[must_use]
    pub fn visual(mut self, visual: bool) -> Self {
        self.group.visual = visual;
        self
    }
}

/// A form definition: ordered fields, groups and form-level errors.
#[derive(Debug)]
pub struct Form {
    pub(crate) id: FormId,
    pub(crate) name: String,
    pub(crate) method: String,
    pub(crate) action: String,
    pub(crate) class: Option<String>,
    pub(crate) errors: Vec<String>,
    pub(crate) fields: Vec<Field>,
    pub(crate) groups: Vec<Group>,
}

impl Form {
    #[must_use]
    pub fn builder(name: &str) -> FormBuilder {
        FormBuilder::new(name)
    }

    #[must_use]
    pub fn id(&self) -> FormId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    #[must_use]
    pub fn action(&self) -> &str {
        &self.action
    }

    /// The `class` attribute of the form element.
    #[must_use]
    pub fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    #[must_use]
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Fields of `group`, in the order they were added.
    pub fn group_fields<'a>(&'a self, group: &'a Group) -> impl Iterator<Item = &'a Field> + 'a {
        group.members.iter().filter_map(|&idx| self.fields.get(idx))
    }

    /// Clear every field's rendered flag ahead of a new render pass.
    pub fn reset_rendered(&self) {
        for field in &self.fields {
            field.set_rendered(false);
        }
    }
}

/// Builder for constructing a [`Form`].
///
/// Fields added after [`group()`](Self::group) join that group until the
/// next group is opened or [`no_group()`](Self::no_group) is called.
///
/// # Example
///
/// ```
/// use nestraps::{FieldKind, FormBuilder};
///
/// let form = FormBuilder::new("sign")
///     .group("Credentials", |g| g)
///     .text("username", |f| f.label("Username").required("Please enter your username."))
///     .field(FieldKind::Password, "password", |f| f.label("Password"))
///     .no_group()
///     .submit("send", |f| f.label("Sign in"))
///     .build()
///     .unwrap();
/// assert_eq!(form.fields().len(), 3);
/// ```
#[derive(Debug)]
pub struct FormBuilder {
    form: Form,
    current_group: Option<usize>,
}

impl FormBuilder {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            form: Form {
                id: FormId::next(),
                name: name.to_owned(),
                method: "post".to_owned(),
                action: String::new(),
                class: None,
                errors: Vec::new(),
                fields: Vec::new(),
                groups: Vec::new(),
            },
            current_group: None,
        }
    }

    /// Define a field of the given kind.
    #[must_use]
    pub fn field(
        mut self,
        kind: FieldKind,
        name: &str,
        f: impl FnOnce(FieldBuilder) -> FieldBuilder,
    ) -> Self {
        let mut field = f(FieldBuilder {
            field: Field::new(name, kind, self.form.id),
        })
        .field;
        if let Some(group) = self.current_group {
            field.options.group = Some(group);
            self.form.groups[group].members.push(self.form.fields.len());
        }
        self.form.fields.push(field);
        self
    }

    #[must_use]
    pub fn text(self, name: &str, f: impl FnOnce(FieldBuilder) -> FieldBuilder) -> Self {
        self.field(FieldKind::TextInput, name, f)
    }

    #[must_use]
    pub fn textarea(self, name: &str, f: impl FnOnce(FieldBuilder) -> FieldBuilder) -> Self {
        self.field(FieldKind::TextArea, name, f)
    }

    #[must_use]
    pub fn checkbox(self, name: &str, f: impl FnOnce(FieldBuilder) -> FieldBuilder) -> Self {
        self.field(FieldKind::Checkbox, name, f)
    }

    #[must_use]
    pub fn select(self, name: &str, f: impl FnOnce(FieldBuilder) -> FieldBuilder) -> Self {
        self.field(FieldKind::SelectBox, name, f)
    }

    #[must_use]
    pub fn submit(self, name: &str, f: impl FnOnce(FieldBuilder) -> FieldBuilder) -> Self {
        self.field(FieldKind::SubmitButton, name, f)
    }

    #[must_use]
    pub fn button(self, name: &str, f: impl FnOnce(FieldBuilder) -> FieldBuilder) -> Self {
        self.field(FieldKind::Button, name, f)
    }

    /// Open a new group; subsequent fields become its members.
    #[must_use]
    pub fn group(mut self, label: &str, f: impl FnOnce(GroupBuilder) -> GroupBuilder) -> Self {
        let group = f(GroupBuilder {
            group: Group {
                label: label.to_owned(),
                description: None,
                visual: true,
                members: Vec::new(),
            },
        })
        .group;
        self.current_group = Some(self.form.groups.len());
        self.form.groups.push(group);
        self
    }

    /// Stop adding fields to the current group.
    #[must_use]
    pub fn no_group(mut self) -> Self {
        self.current_group = None;
        self
    }

    /// Add a form-level error message.
    #[must_use]
    pub fn error(mut self, message: &str) -> Self {
        self.form.errors.push(message.to_owned());
        self
    }

    #[must_use]
    pub fn method(mut self, method: &str) -> Self {
        self.form.method = method.to_owned();
        self
    }

    #[must_use]
    pub fn action(mut self, action: &str) -> Self {
        self.form.action = action.to_owned();
        self
    }

    #[must_use]
    pub fn class(mut self, class: &str) -> Self {
        self.form.class = Some(class.to_owned());
        self
    }

    /// Validate and finish the form.
    ///
    /// # Errors
    ///
    /// Returns [`FormError`] for empty or duplicate field names, or when a
    /// rule references a control the form does not define.
    pub fn build(self) -> Result<Form, FormError> {
        check_names(&self.form.fields)?;
        check_references(&self.form.fields)?;
        Ok(self.form)
    }
}

fn check_names(fields: &[Field]) -> Result<(), FormError> {
    let mut seen = HashSet::new();
    for field in fields {
        if field.name.is_empty() {
            return Err(FormError::EmptyName);
        }
        if !seen.insert(field.name.as_str()) {
            return Err(FormError::DuplicateField {
                name: field.name.clone(),
            });
        }
    }
    Ok(())
}

fn check_references(fields: &[Field]) -> Result<(), FormError> {
    let names: HashSet<&str> = fields.iter().map(|f| f.name.as_str()).collect();
    for field in fields {
        if let Some(control) = field
            .rules
            .referenced_controls()
            .into_iter()
            .find(|c| !names.contains(c))
        {
            return Err(FormError::UndefinedControl {
                field: field.name.clone(),
                control: control.to_owned(),
            });
        }
    }
    Ok(())
}

/// Name under which `field` is known within `form`, or `None` when the
/// field belongs to another form.
#[must_use]
pub fn control_name<'a>(form: &Form, field: &'a Field) -> Option<&'a str> {
    (field.form == form.id).then_some(field.name.as_str())
}

/// Fields of `form` with the given kind, optionally skipping those already
/// rendered in the current pass.
#[must_use]
pub fn find_fields(form: &Form, kind: FieldKind, skip_rendered: bool) -> Vec<&Field> {
    form.fields
        .iter()
        .filter(|f| !(skip_rendered && f.is_rendered()))
        .filter(|f| f.kind == kind)
        .collect()
}

/// Add `class` to the form element's class attribute.
///
/// An unset attribute is simply set. Otherwise the class is appended unless
/// the attribute already mentions (case-insensitively) any of `exclude`.
pub fn add_form_class(form: &mut Form, class: &str, exclude: &[&str]) {
    let Some(defined) = form.class.as_deref() else {
        form.class = Some(class.to_owned());
        return;
    };
    let lowered = defined.to_lowercase();
    if exclude
        .iter()
        .any(|one| lowered.contains(&one.to_lowercase()))
    {
        return;
    }
    form.class = Some(format!("{defined} {class}"));
}
