//! Template renderer.

use super::{PullRequestMessage, TemplateError};
use crate::config::PullRequestFormats;
use crate::ecosystem::Dependency;
use handlebars::{no_escape, Handlebars};
use serde_json::{json, Value};

/// Creates a configured Handlebars registry.
///
/// The registry is configured with:
/// - No HTML escaping (for markdown output)
/// - Strict mode (catches missing variables)
#[must_use]
pub fn create_handlebars_registry() -> Handlebars<'static> {
    let mut hbs = Handlebars::new();

    // Disable HTML escaping for markdown output
    hbs.register_escape_fn(no_escape);

    // Enable strict mode to catch missing variables
    hbs.set_strict_mode(true);

    hbs
}

/// Renders pull request titles, bodies, branch names and commit titles.
pub struct TemplateRenderer {
    handlebars: Handlebars<'static>,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer {
    /// Creates a new template renderer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlebars: create_handlebars_registry(),
        }
    }

    /// Renders every part of a new pull request for `dependencies`.
    ///
    /// The first dependency is the one the pull request is named after.
    ///
    /// # Errors
    ///
    /// Returns an error if `dependencies` is empty, a format fails to render,
    /// or the branch name isn't a valid git reference.
    pub fn render_message(
        &self,
        formats: &PullRequestFormats,
        dependencies: &[Dependency],
        package_manager: &str,
        directory: &str,
    ) -> Result<PullRequestMessage, TemplateError> {
        let data = template_data(dependencies, package_manager, directory)?;

        let branch_name = self.render_template(&formats.branch_name_format, &data)?;
        super::validate_branch_name(&branch_name)?;

        Ok(PullRequestMessage {
            title: self.render_template(&formats.title_format, &data)?,
            body: self.render_template(&formats.body_format, &data)?,
            commit_title: self.render_template(&formats.commit_title_format, &data)?,
            branch_name,
        })
    }

    fn render_template(&self, template: &str, data: &Value) -> Result<String, TemplateError> {
        Ok(self.handlebars.render_template(template, data)?)
    }
}

fn template_data(
    dependencies: &[Dependency],
    package_manager: &str,
    directory: &str,
) -> Result<Value, TemplateError> {
    let lead = dependencies.first().ok_or(TemplateError::NoDependencies)?;

    let entries: Vec<Value> = dependencies
        .iter()
        .map(|dependency| {
            json!({
                "name": dependency.name,
                "version": dependency.display_version().unwrap_or_default(),
                "previous_version": dependency.display_previous_version().unwrap_or_default(),
            })
        })
        .collect();

    Ok(json!({
        "name": lead.name,
        "version": lead.display_version().unwrap_or_default(),
        "previous_version": lead.display_previous_version().unwrap_or_default(),
        "package_manager": package_manager,
        "directory": directory,
        "dependencies": entries,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn updated(name: &str, from: &str, to: &str) -> Dependency {
        Dependency {
            name: name.to_string(),
            version: Some(to.to_string()),
            requirements: vec![],
            previous_version: Some(from.to_string()),
            previous_requirements: None,
            package_manager: "bundler".to_string(),
        }
    }

    #[test]
    fn test_render_default_message() {
        let renderer = TemplateRenderer::new();
        let message = renderer
            .render_message(
                &PullRequestFormats::default(),
                &[updated("rack-ssl", "1.3.2", "1.4.0")],
                "bundler",
                "/",
            )
            .unwrap();

        assert_eq!(message.title, "Bump rack-ssl from 1.3.2 to 1.4.0");
        assert_eq!(message.commit_title, "Bump rack-ssl from 1.3.2 to 1.4.0");
        assert_eq!(message.branch_name, "dependabot/bundler/rack-ssl-1.4.0");
        assert!(message.body.contains("- `rack-ssl`: 1.3.2 -> 1.4.0"));
    }

    #[test]
    fn test_body_lists_every_dependency() {
        let renderer = TemplateRenderer::new();
        let message = renderer
            .render_message(
                &PullRequestFormats::default(),
                &[
                    updated("rails", "7.0.8", "7.1.0"),
                    updated("activesupport", "7.0.8", "7.1.0"),
                ],
                "bundler",
                "/",
            )
            .unwrap();

        assert!(message.title.starts_with("Bump rails from"));
        assert!(message.body.contains("`activesupport`"));
    }

    #[test]
    fn test_no_html_escaping() {
        let renderer = TemplateRenderer::new();
        let formats = PullRequestFormats {
            body_format: "{{name}} <{{version}}>".to_string(),
            ..PullRequestFormats::default()
        };
        let message = renderer
            .render_message(&formats, &[updated("a&b", "1", "2")], "pip", "/")
            .unwrap();

        // Should NOT escape HTML entities
        assert_eq!(message.body, "a&b <2>");
    }

    #[test]
    fn test_strict_mode_rejects_unknown_variables() {
        let renderer = TemplateRenderer::new();
        let formats = PullRequestFormats {
            title_format: "{{nonexistent}}".to_string(),
            ..PullRequestFormats::default()
        };
        let result =
            renderer.render_message(&formats, &[updated("rack", "1", "2")], "bundler", "/");
        assert!(matches!(result, Err(TemplateError::RenderError(_))));
    }

    #[test]
    fn test_empty_dependencies_rejected() {
        let renderer = TemplateRenderer::new();
        let result = renderer.render_message(&PullRequestFormats::default(), &[], "bundler", "/");
        assert!(matches!(result, Err(TemplateError::NoDependencies)));
    }
}
