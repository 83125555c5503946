//! Semantic HTML rendering for extraction results.
//!
//! Rendering is a pure function of the assembled model: roles, table
//! shapes, and order come from the result, never re-derived.

use crate::error::{Error, Result};
use crate::model::{BlockRef, ExtractionResult, ImageRecord, Paragraph, Role, Table};
use crate::parser::verify_references;

use super::{ExtractionStats, RenderOptions, RenderResult};

/// Convert a result to HTML.
pub fn to_html(result: &ExtractionResult, options: &RenderOptions) -> Result<String> {
    let renderer = HtmlRenderer::new(options.clone());
    renderer.render(result)
}

/// Convert a result to HTML with statistics.
pub fn to_html_with_stats(result: &ExtractionResult, options: &RenderOptions) -> Result<RenderResult> {
    let renderer = HtmlRenderer::new(options.clone());
    let content = renderer.render(result)?;
    Ok(RenderResult::new(content, ExtractionStats::from_result(result)))
}

/// HTML renderer.
pub struct HtmlRenderer {
    options: RenderOptions,
}

impl HtmlRenderer {
    /// Create a new HTML renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render a result to HTML.
    ///
    /// Fails with [`Error::Render`] if any content block does not resolve to
    /// exactly one paragraph, table, or image.
    pub fn render(&self, result: &ExtractionResult) -> Result<String> {
        verify_references(result).map_err(|e| Error::Render(e.to_string()))?;

        let mut output = String::new();

        if self.options.standalone {
            output.push_str("<html><head><meta charset=\"utf-8\"></head><body>");
        } else {
            output.push_str("<article>");
        }
        self.newline(&mut output);

        // Every block resolves after verification.
        for block in result.resolve_blocks().into_iter().flatten() {
            match block {
                BlockRef::Paragraph(p) => self.render_paragraph(&mut output, p),
                BlockRef::Table(t) => self.render_table(&mut output, t),
                BlockRef::Image(i) => {
                    if !self.render_image(&mut output, i) {
                        continue;
                    }
                }
            }
            self.newline(&mut output);
        }

        if self.options.standalone {
            output.push_str("</body></html>");
        } else {
            output.push_str("</article>");
        }

        Ok(output)
    }

    fn newline(&self, output: &mut String) {
        if self.options.newline_between_blocks {
            output.push('\n');
        }
    }

    fn render_paragraph(&self, output: &mut String, paragraph: &Paragraph) {
        let tag = role_tag(paragraph.role);
        output.push('<');
        output.push_str(tag);
        if self.options.paragraph_ids {
            output.push_str(&format!(" id=\"{}\"", escape_html(&paragraph.id)));
        }
        output.push('>');
        output.push_str(&escape_html(&paragraph.content));
        output.push_str(&format!("</{}>", tag));
    }

    fn render_table(&self, output: &mut String, table: &Table) {
        output.push_str(&format!(
            "<table border=\"1\" id=\"{}\"><tbody>",
            escape_html(&table.id)
        ));

        for row in 0..table.rows {
            output.push_str("<tr>");
            for column in 0..table.columns {
                match table.cell(row, column) {
                    Some(cell) => {
                        let tag = if cell.is_header() { "th" } else { "td" };
                        output.push_str(&format!(
                            "<{tag}>{}</{tag}>",
                            escape_html(&cell.content),
                            tag = tag
                        ));
                    }
                    None => output.push_str("<td></td>"),
                }
            }
            output.push_str("</tr>");
        }

        output.push_str("</tbody></table>");
    }

    /// Returns false if nothing was written.
    fn render_image(&self, output: &mut String, image: &ImageRecord) -> bool {
        match image.data_uri() {
            Some(uri) => {
                output.push_str(&format!(
                    "<img id=\"{}\" src=\"{}\" alt=\"\" />",
                    escape_html(&image.id),
                    escape_html(&uri)
                ));
                true
            }
            None if self.options.image_placeholders => {
                output.push_str(&format!("<img id=\"{}\" alt=\"\" />", escape_html(&image.id)));
                true
            }
            None => false,
        }
    }
}

/// Element name for a paragraph role.
pub fn role_tag(role: Role) -> &'static str {
    match role {
        Role::Title => "h1",
        Role::SectionHeading => "h2",
        Role::Body => "p",
    }
}

/// Escape HTML special characters in text.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#039;")
}
