//! Rendering module for converting extraction results to output formats.

mod html;
mod json;
mod options;
mod result;

pub use html::{escape_html, role_tag, to_html, to_html_with_stats, HtmlRenderer};
pub use json::{to_json, JsonFormat};
pub use options::RenderOptions;
pub use result::{ExtractionStats, RenderResult};
