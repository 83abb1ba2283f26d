//! Page templates for SupportLab
//!
//! The built-in Tera templates are compiled into the binary. A directory of
//! `*.html` files may replace any of them by name, so a deployment can restyle
//! pages without rebuilding.

use crate::error::{Result, SupportLabError};
use std::path::Path;
use tera::{Context, Tera};

/// Built-in templates, keyed by the name handlers render
const BUILTIN_TEMPLATES: [(&str, &str); 8] = [
    ("base.html", include_str!("html/base.html")),
    ("tickets_list.html", include_str!("html/tickets_list.html")),
    ("ticket_new.html", include_str!("html/ticket_new.html")),
    ("ticket_details.html", include_str!("html/ticket_details.html")),
    ("reports.html", include_str!("html/reports.html")),
    ("settings.html", include_str!("html/settings.html")),
    ("404.html", include_str!("html/404.html")),
    ("500.html", include_str!("html/500.html")),
];

/// Renders pages from a plain data context
///
/// Handlers never build markup themselves; they hand a serializable context
/// to [`Renderer::render`] and get the finished document back.
pub struct Renderer {
    tera: Tera,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("templates", &self.template_names())
            .finish()
    }
}

impl Renderer {
    /// Create a renderer with the built-in templates
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(BUILTIN_TEMPLATES.to_vec())?;
        Ok(Self { tera })
    }

    /// Create a renderer whose built-ins are replaced by the `*.html` files
    /// found directly in `dir`
    pub fn with_overrides(dir: &Path) -> Result<Self> {
        let mut renderer = Self::new()?;
        renderer.load_custom_templates(dir)?;
        Ok(renderer)
    }

    /// Load custom templates from a directory
    pub fn load_custom_templates(&mut self, dir: &Path) -> Result<()> {
        let mut custom = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("html") {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            custom.push((name.to_string(), std::fs::read_to_string(&path)?));
        }

        tracing::debug!(dir = %dir.display(), count = custom.len(), "Loading custom templates");
        self.tera.add_raw_templates(custom)?;
        Ok(())
    }

    /// Render a template by name
    pub fn render(&self, name: &str, context: &Context) -> Result<String> {
        self.tera.render(name, context).map_err(|e| {
            tracing::error!(template = name, error = ?e, "Template rendering failed");
            SupportLabError::Template(e)
        })
    }

    /// List all available templates
    pub fn template_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.tera.get_template_names().collect();
        names.sort_unstable();
        names
    }
}
