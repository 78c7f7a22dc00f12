use nestraps::{Field, FieldKind, Form, FormBuilder, Rule, Rules, Value};
use proptest::prelude::*;

// --- Generated forms ---
// Fields are named f0, f1, ... in definition order. Each is either a text
// input or a submit button; buttons may carry a stack template override.

const OVERRIDES: &[&str] = &["", "controls/Toolbar.latte", "controls/Inline.latte"];

#[derive(Debug, Clone)]
pub struct GenField {
    pub button: bool,
    pub stack_template: Option<String>,
}

/// One step of a generated `add()` sequence.
#[derive(Debug, Clone, Copy)]
pub enum Feed {
    /// A field of the generated form, by index.
    Own(usize),
    /// A field of an unrelated form; `true` picks its button.
    Foreign(bool),
}

fn arb_field() -> impl Strategy<Value = GenField> {
    (
        any::<bool>(),
        prop::option::weighted(0.3, prop::sample::select(OVERRIDES)),
    )
        .prop_map(|(button, stack_template)| GenField {
            button,
            stack_template: stack_template.map(str::to_owned),
        })
}

/// Generate the field layout of a form.
pub fn arb_fields() -> impl Strategy<Value = Vec<GenField>> {
    prop::collection::vec(arb_field(), 1..16)
}

/// Generate a layout together with an `add()` sequence over it that may
/// repeat fields and mix in fields of another form.
pub fn arb_feed() -> impl Strategy<Value = (Vec<GenField>, Vec<Feed>)> {
    arb_fields().prop_flat_map(|fields| {
        let n = fields.len();
        let step = prop_oneof![
            4 => (0..n).prop_map(Feed::Own),
            1 => any::<bool>().prop_map(Feed::Foreign),
        ];
        (Just(fields), prop::collection::vec(step, 0..40))
    })
}

pub fn build_form(fields: &[GenField]) -> Form {
    fields
        .iter()
        .enumerate()
        .fold(FormBuilder::new("generated"), |builder, (i, gen)| {
            let kind = if gen.button {
                FieldKind::SubmitButton
            } else {
                FieldKind::TextInput
            };
            let template = gen.stack_template.clone();
            builder.field(kind, &format!("f{i}"), move |f| match template {
                Some(t) => f.stack_template(&t),
                None => f,
            })
        })
        .build()
        .expect("generated form is valid")
}

/// A form unrelated to any generated one, holding one text input `x` and one
/// button `y`.
pub fn foreign_form() -> Form {
    FormBuilder::new("foreign")
        .text("x", |f| f)
        .submit("y", |f| f)
        .build()
        .expect("foreign form is valid")
}

pub fn resolve_feed<'f>(form: &'f Form, foreign: &'f Form, feed: &[Feed]) -> Vec<&'f Field> {
    feed.iter()
        .map(|step| match *step {
            Feed::Own(i) => &form.fields()[i],
            Feed::Foreign(button) => &foreign.fields()[usize::from(button)],
        })
        .collect()
}

// --- Generated rules ---
// Rule trees for a form with fields `a`, `b` and `c`, rules attached to `c`.
// Messages avoid `%` so formatting leaves them unchanged, but may carry
// quotes, backslashes and tabs that the literal has to escape.

pub const CONTROLS: &[&str] = &["a", "b", "c"];
const OPS: &[&str] = &[":filled", ":equal", ":minLength", ":email", "Validators::isZip"];

fn arb_arg() -> impl Strategy<Value = Option<Value>> {
    prop::option::of(prop_oneof![
        any::<i32>().prop_map(|i| Value::Int(i64::from(i))),
        any::<bool>().prop_map(Value::Bool),
        "[a-z]{0,6}".prop_map(Value::String),
        prop::sample::select(CONTROLS).prop_map(|c| Value::Control(c.to_owned())),
        prop::collection::vec(0_i64..100, 0..3).prop_map(Value::from),
    ])
}

fn with_options(rule: Rule, negated: bool, arg: Option<Value>) -> Rule {
    let rule = if negated { rule.negate() } else { rule };
    match arg {
        Some(arg) => rule.with_arg(arg),
        None => rule,
    }
}

fn arb_validator() -> impl Strategy<Value = Rule> {
    (
        prop::sample::select(OPS),
        "[A-Za-z ,.!\"\\\\\t]{0,16}",
        any::<bool>(),
        arb_arg(),
    )
        .prop_map(|(op, message, negated, arg)| {
            with_options(Rule::validator(op, &message), negated, arg)
        })
}

fn arb_rule() -> impl Strategy<Value = Rule> {
    arb_validator().prop_recursive(3, 24, 4, |inner| {
        (
            prop::sample::select(OPS),
            any::<bool>(),
            prop::option::of(prop::sample::select(CONTROLS)),
            prop::collection::vec(inner, 0..4),
            prop::collection::vec(("[a-z]{1,5}", any::<bool>()), 0..3),
            arb_arg(),
        )
            .prop_map(|(op, negated, control, children, toggles, arg)| {
                let mut rules = children.into_iter().fold(Rules::new(), Rules::rule);
                for (id, visible) in toggles {
                    rules = rules.toggle(&id, visible);
                }
                let rule = match control {
                    Some(control) => Rule::condition_on(control, op, rules),
                    None => Rule::condition(op, rules),
                };
                with_options(rule, negated, arg)
            })
    })
}

pub fn arb_rules() -> impl Strategy<Value = Rules> {
    prop::collection::vec(arb_rule(), 0..5)
        .prop_map(|rules| rules.into_iter().fold(Rules::new(), Rules::rule))
}

pub fn rules_form(rules: Rules) -> Form {
    FormBuilder::new("rules")
        .text("a", |f| f.label("Alpha"))
        .text("b", |f| f)
        .text("c", move |f| f.rules(rules))
        .build()
        .expect("rule controls are defined")
}
