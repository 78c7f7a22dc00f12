use std::fmt;
use std::path::PathBuf;

use tracing::debug;

use crate::{Form, NestrapsError, RenderStackBuilder, RenderUnit, RendererConfig};

/// Translates user-facing strings: errors, group labels and descriptions.
pub trait Translator {
    fn translate(&self, message: &str) -> String;
}

impl<F> Translator for F
where
    F: Fn(&str) -> String,
{
    fn translate(&self, message: &str) -> String {
        self(message)
    }
}

/// One visual group of a rendered form.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupView<'f> {
    pub label: String,
    pub description: Option<String>,
    pub units: Vec<RenderUnit<'f>>,
}

/// Everything a master template needs to draw a form.
#[derive(Debug, Clone, PartialEq)]
pub struct FormView<'f> {
    /// Master template the view is drawn with.
    pub master: PathBuf,
    pub name: String,
    pub class: Option<String>,
    pub method: String,
    pub action: String,
    /// Query parameters of a GET action, carried as hidden inputs.
    pub hiddens: Vec<(String, String)>,
    pub errors: Vec<String>,
    pub groups: Vec<GroupView<'f>>,
    /// Fields outside any visual group.
    pub units: Vec<RenderUnit<'f>>,
}

impl FormView<'_> {
    /// Total number of units across groups and the trailing section.
    #[must_use]
    pub fn unit_count(&self) -> usize {
        self.units.len() + self.groups.iter().map(|g| g.units.len()).sum::<usize>()
    }
}

/// Drives render passes over forms.
///
/// # Example
///
/// ```
/// use nestraps::{FormBuilder, Renderer, RendererConfig};
///
/// let form = FormBuilder::new("contact")
///     .group("Message", |g| g)
///     .text("subject", |f| f)
///     .no_group()
///     .submit("send", |f| f)
///     .build()
///     .unwrap();
///
/// let view = Renderer::new(RendererConfig::default()).render(&form);
/// assert_eq!(view.groups.len(), 1);
/// assert_eq!(view.units.len(), 1);
/// ```
pub struct Renderer {
    config: RendererConfig,
    translator: Option<Box<dyn Translator>>,
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer")
            .field("config", &self.config)
            .field("translator", &self.translator.is_some())
            .finish()
    }
}

impl Renderer {
    #[must_use]
    pub fn new(config: RendererConfig) -> Self {
        Self {
            config,
            translator: None,
        }
    }

    /// Like [`new()`](Self::new), but verify the master template exists.
    ///
    /// # Errors
    ///
    /// Returns [`NestrapsError::TemplateNotFound`] when the master template
    /// is not a file.
    pub fn checked(config: RendererConfig) -> Result<Self, NestrapsError> {
        let path = config.master_template();
        if !path.is_file() {
            return Err(NestrapsError::TemplateNotFound { path });
        }
        Ok(Self::new(config))
    }

    #[must_use]
    pub fn with_translator(mut self, translator: Box<dyn Translator>) -> Self {
        self.translator = Some(translator);
        self
    }

    #[must_use]
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Run one render pass over `form`.
    ///
    /// Rendered flags are reset first, so a form can be rendered again.
    #[must_use]
    pub fn render<'f>(&self, form: &'f Form) -> FormView<'f> {
        form.reset_rendered();

        let method = form.method().to_lowercase();
        let (action, hiddens) = if method == "get" {
            split_query(form)
        } else {
            (form.action().to_owned(), Vec::new())
        };

        let mut builder = RenderStackBuilder::new(form.id());
        let groups: Vec<GroupView<'f>> = form
            .groups()
            .iter()
            .filter(|g| g.is_visual() && !g.is_empty())
            .map(|group| GroupView {
                label: self.translate(group.label()),
                description: group.description().map(|d| self.translate(d)),
                units: builder.section(form.group_fields(group)),
            })
            .collect();
        let units = builder.section(form.fields());

        let view = FormView {
            master: self.config.master_template(),
            name: form.name().to_owned(),
            class: form.class().map(str::to_owned),
            method,
            action,
            hiddens,
            errors: self.errors(form),
            groups,
            units,
        };
        debug!(
            form = form.name(),
            groups = view.groups.len(),
            units = view.unit_count(),
            errors = view.errors.len(),
            "rendered form"
        );
        view
    }

    fn errors(&self, form: &Form) -> Vec<String> {
        let mut errors: Vec<&str> = form.errors().iter().map(String::as_str).collect();
        for field in form.fields() {
            for error in field.errors() {
                if !errors.contains(&error.as_str()) {
                    errors.push(error);
                }
            }
        }
        if !self.config.show_field_errors_globally {
            errors.retain(|e| {
                !form
                    .fields()
                    .iter()
                    .any(|f| f.errors().iter().any(|fe| fe.as_str() == *e))
            });
        }
        errors.into_iter().map(|e| self.translate(e)).collect()
    }

    fn translate(&self, message: &str) -> String {
        match &self.translator {
            Some(translator) => translator.translate(message),
            None => message.to_owned(),
        }
    }
}

/// Strip the query of a GET action into hidden inputs. Browsers drop the
/// action's query on GET submission, so it has to travel as form data.
///
/// Both `&` and `;` separate parameters.
fn split_query(form: &Form) -> (String, Vec<(String, String)>) {
    let Some((action, query)) = form.action().split_once('?') else {
        return (form.action().to_owned(), Vec::new());
    };
    let hiddens = query
        .split(['&', ';'])
        .flat_map(|pair| url::form_urlencoded::parse(pair.as_bytes()))
        .filter(|(name, _)| !name.is_empty() && form.field(name).is_none())
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect();
    (action.to_owned(), hiddens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FormBuilder;

    fn names(units: &[RenderUnit<'_>]) -> Vec<Vec<String>> {
        units
            .iter()
            .map(|u| u.fields().iter().map(|f| f.name().to_owned()).collect())
            .collect()
    }

    #[test]
    fn groups_then_remaining_fields() {
        let form = FormBuilder::new("f")
            .text("loose", |f| f)
            .group("Account", |g| g.description("Who you are"))
            .text("user", |f| f)
            .submit("check", |f| f)
            .no_group()
            .submit("send", |f| f)
            .submit("cancel", |f| f)
            .build()
            .unwrap();

        let view = Renderer::new(RendererConfig::default()).render(&form);
        assert_eq!(view.groups.len(), 1);
        assert_eq!(view.groups[0].label, "Account");
        assert_eq!(view.groups[0].description.as_deref(), Some("Who you are"));
        assert_eq!(names(&view.groups[0].units), vec![vec!["user"], vec!["check"]]);
        assert_eq!(names(&view.units), vec![vec!["loose"], vec!["send", "cancel"]]);
        assert_eq!(view.unit_count(), 4);
    }

    #[test]
    fn non_visual_and_empty_groups_skipped() {
        let form = FormBuilder::new("f")
            .group("Hidden", |g| g.visual(false))
            .text("a", |f| f)
            .group("Empty", |g| g)
            .no_group()
            .text("b", |f| f)
            .build()
            .unwrap();

        let view = Renderer::new(RendererConfig::default()).render(&form);
        assert!(view.groups.is_empty());
        assert_eq!(names(&view.units), vec![vec!["a"], vec!["b"]]);
    }

    #[test]
    fn render_twice_gives_same_view() {
        let form = FormBuilder::new("f")
            .text("a", |f| f)
            .submit("b", |f| f)
            .build()
            .unwrap();
        let renderer = Renderer::new(RendererConfig::default());
        let first = renderer.render(&form);
        let second = renderer.render(&form);
        assert_eq!(first, second);
    }

    #[test]
    fn get_action_query_becomes_hiddens() {
        let form = FormBuilder::new("search")
            .method("GET")
            .action("/search?lang=en&q=old&do=search-submit")
            .text("q", |f| f)
            .build()
            .unwrap();

        let view = Renderer::new(RendererConfig::default()).render(&form);
        assert_eq!(view.method, "get");
        assert_eq!(view.action, "/search");
        assert_eq!(
            view.hiddens,
            vec![
                ("lang".to_owned(), "en".to_owned()),
                ("do".to_owned(), "search-submit".to_owned()),
            ]
        );
    }

    #[test]
    fn get_action_query_split_on_semicolons() {
        let form = FormBuilder::new("search")
            .method("get")
            .action("/search?lang=en;q=old;do=go&page=2")
            .text("q", |f| f)
            .build()
            .unwrap();

        let view = Renderer::new(RendererConfig::default()).render(&form);
        assert_eq!(view.action, "/search");
        assert_eq!(
            view.hiddens,
            vec![
                ("lang".to_owned(), "en".to_owned()),
                ("do".to_owned(), "go".to_owned()),
                ("page".to_owned(), "2".to_owned()),
            ]
        );
    }

    #[test]
    fn get_action_query_is_decoded() {
        let form = FormBuilder::new("search")
            .method("get")
            .action("/search?term=caf%C3%A9+bar;;empty=")
            .build()
            .unwrap();

        let view = Renderer::new(RendererConfig::default()).render(&form);
        assert_eq!(
            view.hiddens,
            vec![
                ("term".to_owned(), "caf\u{e9} bar".to_owned()),
                ("empty".to_owned(), String::new()),
            ]
        );
    }

    #[test]
    fn post_action_untouched() {
        let form = FormBuilder::new("f").action("/save?id=3").build().unwrap();
        let view = Renderer::new(RendererConfig::default()).render(&form);
        assert_eq!(view.action, "/save?id=3");
        assert!(view.hiddens.is_empty());
    }

    #[test]
    fn field_errors_hidden_unless_global() {
        let form = FormBuilder::new("f")
            .error("Something failed")
            .error("Name taken")
            .text("name", |f| f.error("Name taken"))
            .text("mail", |f| f.error("Bad mail"))
            .build()
            .unwrap();

        let view = Renderer::new(RendererConfig::default()).render(&form);
        assert_eq!(view.errors, vec!["Something failed"]);

        let config = RendererConfig {
            show_field_errors_globally: true,
            ..RendererConfig::default()
        };
        let view = Renderer::new(config).render(&form);
        assert_eq!(view.errors, vec!["Something failed", "Name taken", "Bad mail"]);
    }

    #[test]
    fn translator_applied() {
        let form = FormBuilder::new("f")
            .error("failed")
            .group("account", |g| g.description("details"))
            .text("a", |f| f)
            .build()
            .unwrap();

        let renderer = Renderer::new(RendererConfig::default())
            .with_translator(Box::new(|m: &str| m.to_uppercase()));
        let view = renderer.render(&form);
        assert_eq!(view.errors, vec!["FAILED"]);
        assert_eq!(view.groups[0].label, "ACCOUNT");
        assert_eq!(view.groups[0].description.as_deref(), Some("DETAILS"));
    }

    #[test]
    fn checked_requires_master_template() {
        let dir = tempfile::tempdir().unwrap();
        let config = RendererConfig {
            template_dir: dir.path().to_path_buf(),
            ..RendererConfig::default()
        };

        let err = Renderer::checked(config.clone()).unwrap_err();
        assert!(matches!(err, NestrapsError::TemplateNotFound { path } if path.ends_with("bootstrap-v2.latte")));

        std::fs::write(dir.path().join("bootstrap-v2.latte"), "{block form}{/block}").unwrap();
        let renderer = Renderer::checked(config).unwrap();
        assert_eq!(
            renderer.render(&FormBuilder::new("f").build().unwrap()).master,
            dir.path().join("bootstrap-v2.latte")
        );
    }
}
