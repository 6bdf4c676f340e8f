use tera::{Context, Tera};

use crate::error::AppError;

/// Server-rendered pages, compiled into the binary.
#[derive(Clone)]
pub struct Views {
    tera: Tera,
}

impl Views {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("layout.html", include_str!("../templates/layout.html")),
            ("index.html", include_str!("../templates/index.html")),
            ("urls.html", include_str!("../templates/urls.html")),
            ("url.html", include_str!("../templates/url.html")),
            ("error.html", include_str!("../templates/error.html")),
        ])?;
        tera.register_filter("or_dash", or_dash_filter);

        Ok(Self { tera })
    }

    pub fn render(&self, template: &str, context: &Context) -> Result<String, AppError> {
        Ok(self.tera.render(template, context)?)
    }
}

/// Tera filter printing `-` for missing values
fn or_dash_filter(
    value: &tera::Value,
    _args: &std::collections::HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    match value {
        tera::Value::Null => Ok(tera::Value::String("-".to_string())),
        tera::Value::String(s) if s.is_empty() => Ok(tera::Value::String("-".to_string())),
        _ => Ok(value.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn escapes_page_content() {
        let views = Views::new().unwrap();
        let mut context = Context::new();
        context.insert("status", &404);
        context.insert("message", "<script>alert(1)</script>");

        let html = views.render("error.html", &context).unwrap();
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>alert(1)</script>"));
    }

    #[test]
    fn or_dash_fills_missing_values() {
        let args = Default::default();
        assert_eq!(or_dash_filter(&json!(null), &args).unwrap(), json!("-"));
        assert_eq!(or_dash_filter(&json!(""), &args).unwrap(), json!("-"));
        assert_eq!(or_dash_filter(&json!("Title"), &args).unwrap(), json!("Title"));
    }
}
