use std::fmt;

use super::Value;

/// What a rule checks.
///
/// Client-side scripts only understand plain operation names, so a rule is
/// exportable when its operation is [`Operation::Named`] or a callback that
/// can be reached without a bound instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// A plain named operation such as `filled` or `:email`.
    Named(String),
    /// A callable reference.
    Callback {
        target: CallbackTarget,
        method: String,
    },
}

/// The receiver of a [`Operation::Callback`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackTarget {
    /// A type-level function, `Class::method`.
    Static(String),
    /// A method bound to an instance. The string only describes the instance.
    Bound(String),
    /// An anonymous closure.
    Closure,
}

impl Operation {
    /// A static callback `class::method`.
    #[must_use]
    pub fn static_callback(class: &str, method: &str) -> Self {
        Operation::Callback {
            target: CallbackTarget::Static(class.to_owned()),
            method: method.to_owned(),
        }
    }

    /// A callback bound to an instance described by `instance`.
    #[must_use]
    pub fn bound_callback(instance: &str, method: &str) -> Self {
        Operation::Callback {
            target: CallbackTarget::Bound(instance.to_owned()),
            method: method.to_owned(),
        }
    }

    /// An anonymous closure.
    #[must_use]
    pub fn closure() -> Self {
        Operation::Callback {
            target: CallbackTarget::Closure,
            method: "{closure}".to_owned(),
        }
    }

    /// The name this operation is known by on the client, if it has one.
    ///
    /// Bound methods and closures have no such name and return `None`.
    #[must_use]
    pub fn resolve(&self) -> Option<String> {
        match self {
            Operation::Named(name) => Some(name.clone()),
            Operation::Callback {
                target: CallbackTarget::Static(class),
                method,
            } => Some(format!("{class}::{method}")),
            Operation::Callback { .. } => None,
        }
    }
}

impl From<&str> for Operation {
    fn from(name: &str) -> Self {
        Operation::Named(name.to_owned())
    }
}

impl From<String> for Operation {
    fn from(name: String) -> Self {
        Operation::Named(name)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Named(name) => write!(f, "{name}"),
            Operation::Callback { target, method } => match target {
                CallbackTarget::Static(class) => write!(f, "{class}::{method}"),
                CallbackTarget::Bound(instance) => write!(f, "{instance}->{method}"),
                CallbackTarget::Closure => write!(f, "{method}"),
            },
        }
    }
}

/// A validation rule attached to a field.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// Checks the field and reports `message` on failure.
    Validator {
        operation: Operation,
        negated: bool,
        arg: Option<Value>,
        message: String,
    },
    /// Applies the nested `rules` only while the condition holds.
    ///
    /// `control` names the field under test; `None` means the field the rule
    /// is attached to.
    Condition {
        operation: Operation,
        negated: bool,
        arg: Option<Value>,
        control: Option<String>,
        rules: Rules,
    },
}

impl Rule {
    #[must_use]
    pub fn validator(operation: impl Into<Operation>, message: &str) -> Self {
        Rule::Validator {
            operation: operation.into(),
            negated: false,
            arg: None,
            message: message.to_owned(),
        }
    }

    /// A condition on the field the rule is attached to.
    #[must_use]
    pub fn condition(operation: impl Into<Operation>, rules: Rules) -> Self {
        Rule::Condition {
            operation: operation.into(),
            negated: false,
            arg: None,
            control: None,
            rules,
        }
    }

    /// A condition testing another field of the form.
    #[must_use]
    pub fn condition_on(control: &str, operation: impl Into<Operation>, rules: Rules) -> Self {
        Rule::Condition {
            operation: operation.into(),
            negated: false,
            arg: None,
            control: Some(control.to_owned()),
            rules,
        }
    }

    /// Flip the negation flag.
    #[must_use]
    pub fn negate(mut self) -> Self {
        match &mut self {
            Rule::Validator { negated, .. } | Rule::Condition { negated, .. } => {
                *negated = !*negated;
            }
        }
        self
    }

    #[must_use]
    pub fn with_arg(mut self, value: impl Into<Value>) -> Self {
        match &mut self {
            Rule::Validator { arg, .. } | Rule::Condition { arg, .. } => {
                *arg = Some(value.into());
            }
        }
        self
    }

    #[must_use]
    pub fn operation(&self) -> &Operation {
        match self {
            Rule::Validator { operation, .. } | Rule::Condition { operation, .. } => operation,
        }
    }

    #[must_use]
    pub fn is_negated(&self) -> bool {
        match self {
            Rule::Validator { negated, .. } | Rule::Condition { negated, .. } => *negated,
        }
    }

    #[must_use]
    pub fn arg(&self) -> Option<&Value> {
        match self {
            Rule::Validator { arg, .. } | Rule::Condition { arg, .. } => arg.as_ref(),
        }
    }
}

/// An ordered list of rules plus the element ids they toggle on the client.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rules {
    rules: Vec<Rule>,
    toggles: Vec<(String, bool)>,
}

impl Rules {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn rule(mut self, rule: Rule) -> Self {
        self.push(rule);
        self
    }

    /// Show (`visible = true`) or hide the element `id` while these rules apply.
    /// Toggling the same id twice keeps the latest state.
    #[must_use]
    pub fn toggle(mut self, id: &str, visible: bool) -> Self {
        match self.toggles.iter_mut().find(|(existing, _)| existing == id) {
            Some(entry) => entry.1 = visible,
            None => self.toggles.push((id.to_owned(), visible)),
        }
        self
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    #[must_use]
    pub fn toggles(&self) -> &[(String, bool)] {
        &self.toggles
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Names of every control referenced by conditions or arguments, at any depth.
    pub(crate) fn referenced_controls(&self) -> Vec<&str> {
        let mut out = Vec::new();
        for rule in &self.rules {
            if let Some(arg) = rule.arg() {
                arg.collect_controls(&mut out);
            }
            if let Rule::Condition { control, rules, .. } = rule {
                if let Some(name) = control {
                    out.push(name.as_str());
                }
                out.extend(rules.referenced_controls());
            }
        }
        out
    }
}

impl<'a> IntoIterator for &'a Rules {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
