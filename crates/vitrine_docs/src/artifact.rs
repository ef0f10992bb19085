use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

use vitrine_core::config::{DEFAULT_EXPORT_FILENAME, DEFAULT_EXPORT_TITLE};
use vitrine_core::{BuilderConfig, Element, PageBuilder};

use crate::html::export_to_html;

pub const HTML_MIME_TYPE: &str = "text/html";

/// A rendered page ready to be downloaded or written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HtmlArtifact {
    pub filename: String,
    pub mime_type: &'static str,
    pub contents: String,
}

impl HtmlArtifact {
    /// Writes the artifact into `dir` and returns the file path. Any existing
    /// file with the same name is overwritten.
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create export directory: {}", dir.display()))?;
        let path = dir.join(&self.filename);
        std::fs::write(&path, &self.contents)
            .with_context(|| format!("Failed to write export: {}", path.display()))?;
        info!("Exported {} bytes to {}", self.contents.len(), path.display());
        Ok(path)
    }

    pub fn size(&self) -> usize {
        self.contents.len()
    }
}

/// Renders `elements` into an artifact. A blank title falls back to the
/// default export title and a blank filename to `produto-page.html`.
pub fn export_artifact(elements: &[Element], title: &str, filename: &str) -> HtmlArtifact {
    let title = if title.trim().is_empty() {
        DEFAULT_EXPORT_TITLE
    } else {
        title
    };
    HtmlArtifact {
        filename: normalize_filename(filename, DEFAULT_EXPORT_FILENAME),
        mime_type: HTML_MIME_TYPE,
        contents: export_to_html(elements, title),
    }
}

/// Exports the builder's current document using the configured filename and
/// fallback title.
pub fn export_page(builder: &PageBuilder, config: &BuilderConfig) -> HtmlArtifact {
    let title = if builder.title().trim().is_empty() {
        config.export_title.as_str()
    } else {
        builder.title()
    };
    HtmlArtifact {
        filename: normalize_filename(&config.export_filename, DEFAULT_EXPORT_FILENAME),
        mime_type: HTML_MIME_TYPE,
        contents: export_to_html(builder.elements(), title),
    }
}

/// Keeps only the final path component and ensures an `.html` extension.
fn normalize_filename(filename: &str, fallback: &str) -> String {
    let name = Path::new(filename.trim())
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(fallback);

    let lower = name.to_ascii_lowercase();
    if lower.ends_with(".html") || lower.ends_with(".htm") {
        name.to_string()
    } else {
        format!("{name}.html")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_filename_defaults_and_extension() {
        assert_eq!(normalize_filename("", DEFAULT_EXPORT_FILENAME), "produto-page.html");
        assert_eq!(normalize_filename("   ", DEFAULT_EXPORT_FILENAME), "produto-page.html");
        assert_eq!(normalize_filename("monitor", DEFAULT_EXPORT_FILENAME), "monitor.html");
        assert_eq!(normalize_filename("Fone.HTML", DEFAULT_EXPORT_FILENAME), "Fone.HTML");
        assert_eq!(normalize_filename("page.htm", DEFAULT_EXPORT_FILENAME), "page.htm");
    }

    #[test]
    fn test_filename_strips_directories() {
        assert_eq!(
            normalize_filename("../../etc/page.html", DEFAULT_EXPORT_FILENAME),
            "page.html"
        );
    }

    #[test]
    fn test_artifact_blank_title_uses_default() {
        let artifact = export_artifact(&[], "  ", "");
        assert_eq!(artifact.filename, "produto-page.html");
        assert_eq!(artifact.mime_type, "text/html");
        assert!(artifact.contents.contains("<title>Descrição do Produto</title>"));
    }

    #[test]
    fn test_export_page_uses_builder_title() {
        let mut builder = PageBuilder::new();
        builder.set_title("Monitor Gamer");
        builder.add_element("cta-button", None).unwrap();

        let artifact = export_page(&builder, &BuilderConfig::default());
        assert_eq!(artifact.filename, "produto-page.html");
        assert!(artifact.contents.contains("<title>Monitor Gamer</title>"));
        assert!(artifact.contents.contains("Ver Mais Detalhes"));
        assert_eq!(artifact.size(), artifact.contents.len());
    }

    #[test]
    fn test_write_to_dir() {
        let tmp = TempDir::new().unwrap();
        let artifact = export_artifact(&[], "Vazio", "vazio");
        let path = artifact.write_to_dir(&tmp.path().join("out")).unwrap();

        assert_eq!(path, tmp.path().join("out").join("vazio.html"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), artifact.contents);
    }
}
