//! Rendering of composed documents.

mod html;

pub use html::{html_escape, is_renderable_url, HtmlRenderer, IMAGE_ERROR_TEXT};

use crate::error::Result;
use crate::pages::DocumentModel;
use std::path::Path;
use tracing::debug;

/// Turns a [`DocumentModel`] into an output artifact.
pub trait Renderer {
    /// Rendered artifact type.
    type Output;

    /// Render the whole document.
    fn render(&self, document: &DocumentModel) -> Result<Self::Output>;

    /// File extension for the artifact, without the dot.
    fn extension(&self) -> &'static str;

    /// Render and write the artifact to `path`.
    fn render_to_file(&self, document: &DocumentModel, path: &Path) -> Result<()>
    where
        Self::Output: AsRef<[u8]>,
    {
        let output = self.render(document)?;
        std::fs::write(path, output.as_ref())?;
        debug!(path = %path.display(), "Wrote rendered report");
        Ok(())
    }
}
