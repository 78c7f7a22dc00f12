use tracing::trace;

use crate::{Field, FormId};

/// Template used for a button stack without an override.
pub const BUTTON_STACK_TEMPLATE: &str = "controls/ButtonStack.latte";

/// One renderable chunk of a form section.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderUnit<'f> {
    /// A non-button field rendered with its own template.
    Single(&'f Field),
    /// A run of adjacent buttons rendered together.
    ButtonStack {
        buttons: Vec<&'f Field>,
        template_override: Option<String>,
    },
}

impl<'f> RenderUnit<'f> {
    /// The fields placed in this unit, in input order.
    #[must_use]
    pub fn fields(&self) -> Vec<&'f Field> {
        match self {
            RenderUnit::Single(field) => vec![*field],
            RenderUnit::ButtonStack { buttons, .. } => buttons.clone(),
        }
    }

    /// Number of fields in this unit.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            RenderUnit::Single(_) => 1,
            RenderUnit::ButtonStack { buttons, .. } => buttons.len(),
        }
    }

    /// Always false: units are never built empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn is_button_stack(&self) -> bool {
        matches!(self, RenderUnit::ButtonStack { .. })
    }

    /// Template the unit is rendered with.
    #[must_use]
    pub fn template(&self) -> String {
        match self {
            RenderUnit::Single(field) => field.template(),
            RenderUnit::ButtonStack {
                template_override, ..
            } => template_override
                .clone()
                .unwrap_or_else(|| BUTTON_STACK_TEMPLATE.to_owned()),
        }
    }
}

/// Turns the fields of one form section into [`RenderUnit`]s.
///
/// Fields are fed one by one with [`add()`](Self::add). Non-button fields
/// become [`RenderUnit::Single`] immediately; buttons wait in a buffer until
/// a non-button field or [`flush()`](Self::flush) closes the run, which then
/// becomes one [`RenderUnit::ButtonStack`]. Fields are never reordered.
///
/// Fields already rendered in this pass, and fields of other forms, are
/// skipped silently.
///
/// # Example
///
/// ```
/// use nestraps::{FormBuilder, RenderStackBuilder, RenderUnit};
///
/// let form = FormBuilder::new("f")
///     .text("a", |f| f)
///     .submit("b1", |f| f)
///     .submit("b2", |f| f)
///     .build()
///     .unwrap();
///
/// let mut builder = RenderStackBuilder::new(form.id());
/// let units = builder.section(form.fields());
/// assert_eq!(units.len(), 2);
/// assert!(matches!(&units[1], RenderUnit::ButtonStack { buttons, .. } if buttons.len() == 2));
/// ```
#[derive(Debug)]
pub struct RenderStackBuilder<'f> {
    form: FormId,
    pending: Vec<&'f Field>,
    stack: Vec<RenderUnit<'f>>,
}

impl<'f> RenderStackBuilder<'f> {
    /// A builder for the form identified by `form`.
    #[must_use]
    pub fn new(form: FormId) -> Self {
        Self {
            form,
            pending: Vec::new(),
            stack: Vec::new(),
        }
    }

    /// Place one field.
    pub fn add(&mut self, field: &'f Field) {
        if field.is_rendered() {
            trace!(field = field.name(), "skipping already rendered field");
            return;
        }
        if field.form() != self.form {
            trace!(field = field.name(), form = %field.form(), "skipping field of another form");
            return;
        }

        if field.is_button() {
            if !self.pending.iter().any(|b| std::ptr::eq(*b, field)) {
                self.pending.push(field);
            }
            return;
        }

        self.flush();
        self.stack.push(RenderUnit::Single(field));
        field.set_rendered(true);
    }

    /// Add every field of `fields`, in order.
    pub fn extend<I>(&mut self, fields: I)
    where
        I: IntoIterator<Item = &'f Field>,
    {
        for field in fields {
            self.add(field);
        }
    }

    /// Close the open button run, if any, into one button stack.
    ///
    /// The stack's template override is the last override set on any of its
    /// buttons.
    pub fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }

        let buttons = std::mem::take(&mut self.pending);
        let template_override = buttons
            .iter()
            .filter_map(|b| b.options().stack_template.as_deref())
            .filter(|t| !t.is_empty())
            .last()
            .map(str::to_owned);
        for button in &buttons {
            button.set_rendered(true);
        }
        trace!(buttons = buttons.len(), "closing button stack");
        self.stack.push(RenderUnit::ButtonStack {
            buttons,
            template_override,
        });
    }

    /// Take the units built so far. Buttons still pending stay pending; call
    /// [`flush()`](Self::flush) first to include them.
    #[must_use]
    pub fn drain(&mut self) -> Vec<RenderUnit<'f>> {
        std::mem::take(&mut self.stack)
    }

    /// Build one complete section: add all `fields`, flush, drain.
    #[must_use]
    pub fn section<I>(&mut self, fields: I) -> Vec<RenderUnit<'f>>
    where
        I: IntoIterator<Item = &'f Field>,
    {
        self.extend(fields);
        self.flush();
        self.drain()
    }

    /// Number of buttons waiting for the next flush.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Form, FormBuilder};

    fn names(units: &[RenderUnit<'_>]) -> Vec<Vec<String>> {
        units
            .iter()
            .map(|u| u.fields().iter().map(|f| f.name().to_owned()).collect())
            .collect()
    }

    fn text_button_text() -> Form {
        FormBuilder::new("f")
            .text("a", |f| f)
            .submit("b1", |f| f)
            .submit("b2", |f| f)
            .text("c", |f| f)
            .build()
            .unwrap()
    }

    #[test]
    fn buttons_between_fields_form_one_stack() {
        let form = text_button_text();
        let mut builder = RenderStackBuilder::new(form.id());
        let units = builder.section(form.fields());

        assert_eq!(names(&units), vec![vec!["a"], vec!["b1", "b2"], vec!["c"]]);
        assert!(!units[0].is_button_stack());
        assert!(units[1].is_button_stack());
    }

    #[test]
    fn non_button_closes_run() {
        let form = FormBuilder::new("f")
            .submit("b1", |f| f)
            .text("a", |f| f)
            .submit("b2", |f| f)
            .build()
            .unwrap();
        let mut builder = RenderStackBuilder::new(form.id());
        let units = builder.section(form.fields());

        assert_eq!(names(&units), vec![vec!["b1"], vec!["a"], vec!["b2"]]);
        assert!(units[0].is_button_stack());
        assert!(units[2].is_button_stack());
    }

    #[test]
    fn add_marks_rendered() {
        let form = text_button_text();
        let mut builder = RenderStackBuilder::new(form.id());
        builder.add(&form.fields()[0]);
        assert!(form.fields()[0].is_rendered());

        builder.add(&form.fields()[1]);
        assert!(!form.fields()[1].is_rendered(), "buttons wait for flush");
        builder.flush();
        assert!(form.fields()[1].is_rendered());
    }

    #[test]
    fn second_add_is_noop() {
        let form = text_button_text();
        let mut builder = RenderStackBuilder::new(form.id());
        builder.add(&form.fields()[0]);
        builder.add(&form.fields()[0]);
        assert_eq!(builder.drain().len(), 1);
    }

    #[test]
    fn pending_button_not_buffered_twice() {
        let form = text_button_text();
        let mut builder = RenderStackBuilder::new(form.id());
        builder.add(&form.fields()[1]);
        builder.add(&form.fields()[1]);
        assert_eq!(builder.pending(), 1);
    }

    #[test]
    fn foreign_field_skipped() {
        let form = text_button_text();
        let other = FormBuilder::new("other").text("x", |f| f).build().unwrap();
        let mut builder = RenderStackBuilder::new(form.id());
        builder.add(&other.fields()[0]);
        builder.flush();
        assert!(builder.drain().is_empty());
        assert!(!other.fields()[0].is_rendered());
    }

    #[test]
    fn drain_does_not_flush() {
        let form = text_button_text();
        let mut builder = RenderStackBuilder::new(form.id());
        builder.add(&form.fields()[1]);
        assert!(builder.drain().is_empty());
        assert_eq!(builder.pending(), 1);
        builder.flush();
        assert_eq!(builder.drain().len(), 1);
    }

    #[test]
    fn flush_on_empty_buffer_is_noop() {
        let form = text_button_text();
        let mut builder = RenderStackBuilder::new(form.id());
        builder.flush();
        assert!(builder.drain().is_empty());
    }

    #[test]
    fn last_override_wins() {
        let form = FormBuilder::new("f")
            .submit("b1", |f| f)
            .submit("b2", |f| f.stack_template("X"))
            .submit("b3", |f| f)
            .build()
            .unwrap();
        let mut builder = RenderStackBuilder::new(form.id());
        let units = builder.section(form.fields());
        assert_eq!(
            units[0],
            RenderUnit::ButtonStack {
                buttons: form.fields().iter().collect(),
                template_override: Some("X".to_owned()),
            }
        );
        assert_eq!(units[0].template(), "X");
    }

    #[test]
    fn later_override_replaces_earlier() {
        let form = FormBuilder::new("f")
            .submit("b1", |f| f.stack_template("first"))
            .submit("b2", |f| f.stack_template("second"))
            .build()
            .unwrap();
        let mut builder = RenderStackBuilder::new(form.id());
        let units = builder.section(form.fields());
        assert_eq!(units[0].template(), "second");
    }

    #[test]
    fn default_templates() {
        let form = text_button_text();
        let mut builder = RenderStackBuilder::new(form.id());
        let units = builder.section(form.fields());
        assert_eq!(units[0].template(), "controls/TextInput.latte");
        assert_eq!(units[1].template(), BUTTON_STACK_TEMPLATE);
    }

    #[test]
    fn second_section_skips_placed_fields() {
        let form = text_button_text();
        let mut builder = RenderStackBuilder::new(form.id());
        let first = builder.section(form.fields().iter().take(2));
        let rest = builder.section(form.fields());

        assert_eq!(names(&first), vec![vec!["a"], vec!["b1"]]);
        assert_eq!(names(&rest), vec![vec!["b2"], vec!["c"]]);
    }
}
