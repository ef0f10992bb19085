// Static HTML export of builder pages

pub mod artifact;
pub mod html;

pub use artifact::{export_artifact, export_page, HtmlArtifact, HTML_MIME_TYPE};
pub use html::{escape_html, export_to_html, render_element};
