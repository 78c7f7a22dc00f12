use std::env;

use nestraps::{
    add_form_class, FieldKind, Form, FormBuilder, FormView, RenderUnit, Renderer, RendererConfig,
    TemplateStyle,
};
use tracing_subscriber::EnvFilter;

/// Controls shared by every style of the showcase.
fn controls(builder: FormBuilder) -> FormBuilder {
    builder
        .error("This is a generic form error.")
        .text("simple", |f| f.label("Simple input"))
        .text("placeholder", |f| {
            f.label("Input with placeholder")
                .option("placeholder", "This is a placeholder value")
        })
        .text("help", |f| {
            f.label("Simple input with help")
                .option("help", "This is some help text")
        })
        .text("status_warning", |f| {
            f.label("Simple input with warning").option("status", "warning")
        })
        .text("prepend_append", |f| {
            f.label("Prepend and append")
                .option("prepend", "$")
                .option("append", ".00")
        })
        .textarea("textarea", |f| f.label("Some textarea"))
        .checkbox("chks1", |f| f.label("Standard checkbox 1"))
        .checkbox("chks2", |f| f.label("Standard checkbox 2"))
        .checkbox("chki1", |f| f.label("first").option("inline", true))
        .checkbox("chki2", |f| f.label("second").option("inline", true))
        .field(FieldKind::RadioList, "radiolist", |f| f.label("Radio lists"))
        .select("select", |f| f.label("Simple select"))
        .field(FieldKind::MultiSelectBox, "multiselect", |f| {
            f.label("Multiselect")
                .option("help", "Style the size yourself")
                .option("help-style", "block")
        })
        .text("required", |f| {
            f.label("Required input")
                .required("This input is required")
        })
        .text("error", |f| {
            f.label("Error showcase").error("Field cannot be empty")
        })
}

fn submits(builder: FormBuilder) -> FormBuilder {
    [
        ("btn", "Default", None),
        ("btnprimary", "Primary", Some("btn-primary")),
        ("btninfo", "Info", Some("btn-info")),
        ("btnsucc", "Success", Some("btn-success")),
        ("btnwarn", "Warning", Some("btn-warning")),
        ("btndang", "Danger", Some("btn-danger")),
        ("btnlink", "Link", Some("btn-link")),
    ]
    .into_iter()
    .fold(builder, |builder, (name, label, class)| {
        builder.submit(name, move |f| match class {
            Some(class) => f.label(label).option("class", class),
            None => f.label(label),
        })
    })
}

fn showcase(style: TemplateStyle) -> Form {
    let builder = FormBuilder::new(&format!("{style:?}").to_lowercase())
        .group("Default styles", |g| g);
    let builder = submits(controls(builder).group("Buttons", |g| g));
    let mut form = builder.build().expect("showcase form is valid");
    if matches!(style, TemplateStyle::Bootstrap2 | TemplateStyle::Bootstrap3) {
        add_form_class(&mut form, "form-horizontal", &["form-inline", "form-search"]);
    }
    form
}

fn print_view(view: &FormView<'_>) {
    println!("{} ({})", view.name, view.master.display());
    for error in &view.errors {
        println!("  ! {error}");
    }
    for group in &view.groups {
        println!("  [{}]", group.label);
        for unit in &group.units {
            let names: Vec<&str> = unit.fields().into_iter().map(|f| f.name()).collect();
            let kind = match unit {
                RenderUnit::Single(_) => "single",
                RenderUnit::ButtonStack { .. } => "stack",
            };
            println!("    {kind:<6} {:<34} {}", unit.template(), names.join(" "));
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = match env::args().nth(1) {
        Some(path) => RendererConfig::from_file(path).expect("failed to read configuration"),
        None => RendererConfig::default(),
    };

    for style in [
        TemplateStyle::Bootstrap2,
        TemplateStyle::Bootstrap3,
        TemplateStyle::Foundation5,
    ] {
        let form = showcase(style);
        let renderer = Renderer::new(RendererConfig {
            style,
            ..config.clone()
        });
        print_view(&renderer.render(&form));
    }
}
