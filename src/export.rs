//! Export of field rules for client-side validation.
//!
//! A field's rule tree is turned into a list of plain objects:
//!
//! ```text
//! validator   {op, msg, arg?}
//! condition   {op, rules, control, toggle?, arg?}
//! ```
//!
//! `op` carries a `~` prefix when the rule is negated. The list is encoded
//! as JSON, rewritten into the compact literal form (see [`crate::literal`])
//! and returned without its outer brackets so templates can splice it into a
//! larger literal.
//!
//! Export is best effort: rules whose operation has no client-side name are
//! left out, and nothing here ever fails.

use tracing::debug;

use crate::literal::normalize;
use crate::{Field, Rule, Rules, Value};

const NEGATION_PREFIX: char = '~';

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Export the rules of `field` as a client-side validation payload.
///
/// Returns `None` when no rule of the field can be exported.
///
/// # Example
///
/// ```
/// use nestraps::{export_rules, FormBuilder, Rule};
///
/// let form = FormBuilder::new("f")
///     .text("name", |f| f.rule(Rule::validator("filled", "Required")))
///     .build()
///     .unwrap();
/// assert_eq!(
///     export_rules(&form.fields()[0]).as_deref(),
///     Some("{op:'filled',msg:'Required'}")
/// );
/// ```
#[must_use]
pub fn export_rules(field: &Field) -> Option<String> {
    let payload = export_payload(field, field.rules());
    if payload.is_empty() {
        return None;
    }

    let json = match serde_json::to_string(&payload) {
        Ok(json) => json,
        Err(err) => {
            debug!(field = field.name(), error = %err, "failed to encode rule payload");
            return None;
        }
    };

    let literal = normalize(&json);
    literal
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .map(str::to_owned)
}

/// Build the payload objects for `rules`, which belong to `field`.
///
/// Nested condition branches are exported recursively into the `rules`
/// entry of their condition.
#[must_use]
pub fn export_payload(field: &Field, rules: &Rules) -> Vec<Value> {
    let mut payload = Vec::with_capacity(rules.len());

    for rule in rules {
        let Some(op) = rule.operation().resolve() else {
            debug!(
                field = field.name(),
                operation = %rule.operation(),
                "dropping rule without a client-side operation name"
            );
            continue;
        };
        let op = if rule.is_negated() {
            format!("{NEGATION_PREFIX}{op}")
        } else {
            op
        };

        let mut item: Vec<(String, Value)> = vec![("op".to_owned(), Value::String(op))];
        match rule {
            Rule::Validator { message, arg, .. } => {
                item.push((
                    "msg".to_owned(),
                    Value::String(format_message(field, message, arg.as_ref())),
                ));
            }
            Rule::Condition { control, rules, .. } => {
                item.push((
                    "rules".to_owned(),
                    Value::List(export_payload(field, rules)),
                ));
                item.push((
                    "control".to_owned(),
                    Value::from(control.as_deref().unwrap_or(field.name())),
                ));
                if !rules.toggles().is_empty() {
                    item.push(("toggle".to_owned(), toggles(rules)));
                }
            }
        }

        if let Some(arg) = rule.arg() {
            item.push(("arg".to_owned(), arg.resolve_controls()));
        }
        payload.push(Value::Map(item));
    }

    payload
}

fn toggles(rules: &Rules) -> Value {
    Value::Map(
        rules
            .toggles()
            .iter()
            .map(|(id, visible)| (id.clone(), Value::Bool(*visible)))
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// Message formatting
// ---------------------------------------------------------------------------

/// Expand placeholders in a validator message.
///
/// `%label` and `%name` become the field's label (falling back to its name)
/// and name. `%d` and `%s` take the next argument item in order; a list or
/// map argument supplies its items, a scalar supplies itself once. `%%` is a
/// literal percent sign. `%value` and unknown sequences are kept, as are
/// placeholders left without an argument.
#[must_use]
pub fn format_message(field: &Field, message: &str, arg: Option<&Value>) -> String {
    let params: Vec<&Value> = match arg {
        Some(Value::List(items)) => items.iter().collect(),
        Some(Value::Map(entries)) => entries.iter().map(|(_, v)| v).collect(),
        Some(other) => vec![other],
        None => Vec::new(),
    };
    let mut params = params.into_iter();

    let mut out = String::with_capacity(message.len());
    let mut rest = message;
    while let Some(idx) = rest.find('%') {
        out.push_str(&rest[..idx]);
        let tail = &rest[idx + 1..];

        if let Some(after) = tail.strip_prefix("label") {
            out.push_str(field.label().unwrap_or(field.name()));
            rest = after;
        } else if let Some(after) = tail.strip_prefix("name") {
            out.push_str(field.name());
            rest = after;
        } else if let Some(after) = tail.strip_prefix('%') {
            out.push('%');
            rest = after;
        } else if let Some(after) = tail.strip_prefix(['d', 's']) {
            match params.next() {
                Some(value) => out.push_str(&value.to_string()),
                None => out.push_str(&rest[idx..idx + 2]),
            }
            rest = after;
        } else {
            out.push('%');
            rest = tail;
        }
    }
    out.push_str(rest);
    out
}
