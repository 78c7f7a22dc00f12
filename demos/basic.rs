use nestraps::{export_rules, FormBuilder, RenderUnit, Renderer, RendererConfig, Rule, Value};

fn main() {
    // Define a form
    let form = FormBuilder::new("signUp")
        .text("email", |f| {
            f.label("E-mail")
                .required("Please enter your e-mail.")
                .rule(Rule::validator(":email", "%label is not a valid address"))
        })
        .field(nestraps::FieldKind::Password, "password", |f| {
            f.label("Password")
                .rule(Rule::validator(":minLength", "At least %d characters").with_arg(8_i64))
        })
        .field(nestraps::FieldKind::Password, "again", |f| {
            f.label("Password again").rule(
                Rule::validator(":equal", "Passwords do not match")
                    .with_arg(Value::Control("password".into())),
            )
        })
        .submit("send", |f| f.label("Sign up"))
        .submit("cancel", |f| f.label("Cancel"))
        .build()
        .expect("failed to build form");

    // Render it
    let view = Renderer::new(RendererConfig::default()).render(&form);
    println!("master template: {}", view.master.display());

    for unit in &view.units {
        match unit {
            RenderUnit::Single(field) => {
                let rules = export_rules(field).unwrap_or_default();
                println!("{:<28} {} data-nette-rules=\"{rules}\"", unit.template(), field.name());
            }
            RenderUnit::ButtonStack { buttons, .. } => {
                let names: Vec<&str> = buttons.iter().map(|b| b.name()).collect();
                println!("{:<28} [{}]", unit.template(), names.join(", "));
            }
        }
    }
}
