//! MiniJinja rendering of a single chart template.
//!
//! Missing data is never an error: attribute access on an absent value is
//! chainable and renders as the empty string. A syntax error or a call to
//! an unknown helper fails and names the template.
//!
//! Free text lands in YAML through the `quote` filter, which always emits a
//! double-quoted scalar.

use minijinja::{AutoEscape, Environment, ErrorKind, UndefinedBehavior, Value};

/// Render `source` (registered as `name`) against `context`.
pub fn render(name: &str, source: &str, context: &Value) -> Result<String, TemplateError> {
    let env = environment();
    let template = env
        .template_from_named_str(name, source)
        .map_err(|e| TemplateError::Compile {
            template: name.to_owned(),
            source: e,
        })?;
    template.render(context).map_err(|e| TemplateError::Render {
        template: name.to_owned(),
        source: e,
    })
}

fn environment<'source>() -> Environment<'source> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Chainable);
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.set_keep_trailing_newline(true);

    env.add_function("eq", |a: Value, b: Value| -> bool { a == b });
    env.add_function("helm", |expr: &str| -> String { helm_expr(expr) });
    env.add_filter("quote", yaml_quote);
    env
}

/// A JSON string literal is also a valid YAML double-quoted scalar.
fn yaml_quote(value: Value) -> Result<String, minijinja::Error> {
    let text = if value.is_undefined() || value.is_none() {
        String::new()
    } else {
        value.to_string()
    };
    serde_json::to_string(&text)
        .map_err(|e| minijinja::Error::new(ErrorKind::InvalidOperation, e.to_string()))
}

/// Emit a Helm expression verbatim.
/// Usage in template: {{ helm(".Release.Namespace") }} → {{ .Release.Namespace }}
fn helm_expr(expr: &str) -> String {
    format!("{{{{ {expr} }}}}")
}

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("template {template} failed to compile")]
    Compile {
        template: String,
        source: minijinja::Error,
    },
    #[error("template {template} failed to render")]
    Render {
        template: String,
        source: minijinja::Error,
    },
}

impl TemplateError {
    pub fn template(&self) -> &str {
        match self {
            Self::Compile { template, .. } | Self::Render { template, .. } => template,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn missing_paths_render_empty() {
        let ctx = context! { metadata => context! { name => "app" } };
        let out = render("t", "[{{ metadata.descriptionLong }}][{{ a.b.c }}]", &ctx).unwrap();
        assert_eq!(out, "[][]");
    }

    #[test]
    fn eq_helper_compares_values() {
        let ctx = context! { kind => "httpGet" };
        let src = "{% if eq(kind, \"httpGet\") %}http{% else %}tcp{% endif %}";
        assert_eq!(render("t", src, &ctx).unwrap(), "http");

        let ctx = context! { kind => "tcpSocket" };
        assert_eq!(render("t", src, &ctx).unwrap(), "tcp");
    }

    #[test]
    fn loops_expose_element_and_index() {
        let ctx = context! { ports => vec!["http", "smtp"] };
        let src = "{% for p in ports %}{{ loop.index0 }}={{ p }};{% endfor %}";
        assert_eq!(render("t", src, &ctx).unwrap(), "0=http;1=smtp;");
    }

    #[test]
    fn helm_expressions_pass_through() {
        let out = render("t", "ns: {{ helm(\".Release.Namespace\") }}\n", &context! {}).unwrap();
        assert_eq!(out, "ns: {{ .Release.Namespace }}\n");
    }

    #[test]
    fn block_tags_do_not_leave_blank_lines() {
        let ctx = context! { items => vec![1, 2] };
        let src = "list:\n  {% for i in items %}\n  - {{ i }}\n  {% endfor %}\nend\n";
        assert_eq!(render("t", src, &ctx).unwrap(), "list:\n  - 1\n  - 2\nend\n");
    }

    #[test]
    fn syntax_error_is_a_compile_error() {
        let err = render("broken.yaml", "{% if %}", &context! {}).unwrap_err();
        assert!(matches!(err, TemplateError::Compile { .. }));
        assert_eq!(err.template(), "broken.yaml");
    }

    #[test]
    fn unknown_helper_is_a_render_error() {
        let err = render("helpers.yaml", "{{ nope(1) }}", &context! {}).unwrap_err();
        assert!(matches!(err, TemplateError::Render { .. }));
        assert!(err.to_string().contains("helpers.yaml"));
    }

    #[test]
    fn error_display_keeps_engine_detail_in_source() {
        let err = render("helpers.yaml", "{{ nope(1) }}", &context! {}).unwrap_err();
        assert_eq!(err.to_string(), "template helpers.yaml failed to render");
        let source = std::error::Error::source(&err).unwrap().to_string();
        assert!(source.contains("nope"), "{source}");
    }

    #[test]
    fn quote_filter_emits_double_quoted_scalars() {
        let ctx = context! {
            text => "Fast: reliable, it's \"great\"\nsecond line",
            port => 8080,
        };
        let src = "a: {{ text | quote }}\nb: {{ missing | quote }}\nc: {{ port | quote }}\n";
        let out = render("t", src, &ctx).unwrap();
        assert_eq!(
            out,
            "a: \"Fast: reliable, it's \\\"great\\\"\\nsecond line\"\nb: \"\"\nc: \"8080\"\n"
        );
    }
}
