//! Template engine for the generated module skeleton.
//!
//! Wraps Handlebars with the built-in module template registered. Method
//! bodies and literals arrive already rendered by the
//! [`python`](crate::python) emitter, so HTML escaping is disabled and the
//! template only decides layout.
//!
//! # Examples
//!
//! ```
//! use apigen_codegen::template_engine::TemplateEngine;
//! use serde_json::json;
//!
//! let mut engine = TemplateEngine::new().unwrap();
//! engine.register_template_string("greeting", "class {{name}}: pass").unwrap();
//! let out = engine.render("greeting", &json!({"name": "A<B>"})).unwrap();
//! assert_eq!(out, "class A<B>: pass");
//! ```

use apigen_core::{Error, Result};
use handlebars::Handlebars;
use serde::Serialize;

/// Name of the Python client module template.
pub const PYTHON_CLIENT: &str = "python/client";

/// Template engine for code generation.
#[derive(Debug)]
pub struct TemplateEngine<'a> {
    handlebars: Handlebars<'a>,
}

impl TemplateEngine<'_> {
    /// Creates a new template engine with the built-in templates registered.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TemplateError`] if a built-in template fails to
    /// parse.
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();

        // Strict mode: fail on missing variables
        handlebars.set_strict_mode(true);
        handlebars.register_escape_fn(handlebars::no_escape);

        let mut engine = Self { handlebars };
        engine.register_template_string(
            PYTHON_CLIENT,
            include_str!("../templates/python/client.py.hbs"),
        )?;
        Ok(engine)
    }

    /// Renders a template with the given context.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TemplateError`] if the template is not registered,
    /// references a missing variable, or fails to render.
    pub fn render<T: Serialize>(&self, template_name: &str, context: &T) -> Result<String> {
        self.handlebars
            .render(template_name, context)
            .map_err(|e| Error::TemplateError {
                message: format!("rendering '{template_name}' failed: {e}"),
            })
    }

    /// Registers an additional template.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TemplateError`] if the template string is invalid.
    pub fn register_template_string(&mut self, name: &str, template: &str) -> Result<()> {
        self.handlebars
            .register_template_string(name, template)
            .map_err(|e| Error::TemplateError {
                message: format!("failed to register template '{name}': {e}"),
            })
    }

    /// Returns `true` if a template with `name` is registered.
    #[must_use]
    pub fn has_template(&self, name: &str) -> bool {
        self.handlebars.has_template(name)
    }
}
