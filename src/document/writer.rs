//! Serializing layout documents

use std::path::{Path, PathBuf};

use crate::error::DocumentError;

use super::model::{DocumentFormat, LayoutDocument};

impl LayoutDocument {
    /// Render the document as TOML, attribute keys in sorted order
    pub fn to_toml(&self) -> Result<String, DocumentError> {
        Ok(toml::to_string(self)?)
    }

    pub fn render(&self, format: DocumentFormat) -> Result<String, DocumentError> {
        match format {
            DocumentFormat::Xml => self.to_xml(),
            DocumentFormat::Toml => self.to_toml(),
        }
    }

    /// Write the document to `path` in `format`
    pub fn write_to(&self, path: &Path, format: DocumentFormat) -> Result<(), DocumentError> {
        std::fs::write(path, self.render(format)?)?;
        Ok(())
    }
}

/// Output path next to `input`: `layout.toml` becomes `layout_flat.toml`
pub fn derived_output_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match input.extension() {
        Some(ext) => format!("{}{}.{}", stem, suffix, ext.to_string_lossy()),
        None => format!("{}{}", stem, suffix),
    };
    input.with_file_name(name)
}
