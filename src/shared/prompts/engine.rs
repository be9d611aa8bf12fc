//! Template engine for prompt rendering using Jinja2 syntax.
//!
//! Templates live under `templates/prompts/` and are compiled into the
//! binary, so rendering never touches the filesystem at runtime.

use minijinja::{Environment, Value};
use std::sync::OnceLock;
use thiserror::Error;

static TEMPLATE_ENV: OnceLock<Environment<'static>> = OnceLock::new();

const TEMPLATES: &[(&str, &str)] = &[
    (
        "study_materials/system.jinja",
        include_str!("../../../templates/prompts/study_materials/system.jinja"),
    ),
    (
        "study_materials/user.jinja",
        include_str!("../../../templates/prompts/study_materials/user.jinja"),
    ),
    (
        "essay_feedback/system.jinja",
        include_str!("../../../templates/prompts/essay_feedback/system.jinja"),
    ),
    (
        "essay_feedback/user.jinja",
        include_str!("../../../templates/prompts/essay_feedback/user.jinja"),
    ),
];

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{0}' not found")]
    NotFound(String),

    #[error("Failed to render template: {0}")]
    RenderError(String),
}

fn init_environment() -> Environment<'static> {
    let mut env = Environment::new();
    for (name, source) in TEMPLATES {
        if let Err(e) = env.add_template(name, source) {
            tracing::warn!("Failed to load template {}: {}", name, e);
        }
    }
    env
}

fn get_environment() -> &'static Environment<'static> {
    TEMPLATE_ENV.get_or_init(init_environment)
}

/// Render a template by its path relative to `templates/prompts/`
pub fn render_template(template_name: &str, ctx: Value) -> Result<String, TemplateError> {
    let template = get_environment()
        .get_template(template_name)
        .map_err(|_| TemplateError::NotFound(template_name.to_string()))?;

    template
        .render(ctx)
        .map_err(|e| TemplateError::RenderError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn test_missing_template_is_not_found() {
        let result = render_template("nonexistent.jinja", context! {});
        assert!(matches!(result, Err(TemplateError::NotFound(_))));
    }

    #[test]
    fn test_all_embedded_templates_load() {
        for (name, _) in TEMPLATES {
            assert!(get_environment().get_template(name).is_ok(), "{}", name);
        }
    }
}
