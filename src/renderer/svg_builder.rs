//! SVG builder — accumulates keyboard elements into a standalone document.

// ═══════════════════════════════════════════════════════════════════════
// SvgBuilder
// ═══════════════════════════════════════════════════════════════════════

pub(super) struct SvgBuilder {
    elements: Vec<String>,
    stylesheet: Option<String>,
    depth: usize,
    width: f64,
    height: f64,
}

impl SvgBuilder {
    pub(super) fn new(width: f64, height: f64) -> Self {
        Self {
            elements: Vec::new(),
            stylesheet: None,
            depth: 0,
            width,
            height,
        }
    }

    pub(super) fn build(self) -> String {
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.1" viewBox="0 0 {w} {h}" width="{w}" height="{h}">"#,
            w = num(self.width),
            h = num(self.height),
        );
        svg.push('\n');
        if let Some(css) = &self.stylesheet {
            svg.push_str("  <defs><style type=\"text/css\"><![CDATA[");
            svg.push_str(css);
            svg.push_str("]]></style></defs>\n");
        }
        for el in &self.elements {
            svg.push_str(el);
            svg.push('\n');
        }
        svg.push_str("</svg>\n");
        svg
    }

    /// Embed a stylesheet so the document is self-contained.
    pub(super) fn embed_stylesheet(&mut self, css: &str) {
        self.stylesheet = Some(css.to_string());
    }

    fn push(&mut self, element: String) {
        let indent = "  ".repeat(self.depth + 1);
        self.elements.push(format!("{indent}{element}"));
    }

    pub(super) fn begin_group(&mut self, class: Option<&str>) {
        match class {
            Some(class) => self.push(format!(r#"<g class="{}">"#, escape_xml(class))),
            None => self.push("<g>".to_string()),
        }
        self.depth += 1;
    }

    pub(super) fn end_group(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.push("</g>".to_string());
    }

    pub(super) fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, class: &str) {
        self.push(format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" class="{}"/>"#,
            num(x),
            num(y),
            num(w),
            num(h),
            escape_xml(class)
        ));
    }

    pub(super) fn text(&mut self, x: f64, y: f64, content: &str, class: &str) {
        self.push(format!(
            r#"<text x="{}" y="{}" class="{}">{}</text>"#,
            num(x),
            num(y),
            escape_xml(class),
            escape_xml(content)
        ));
    }

    /// A single text element made of classed `<tspan>` runs.
    pub(super) fn spans(&mut self, x: f64, y: f64, runs: &[(&str, &str)], class: &str) {
        let body: String = runs
            .iter()
            .map(|(content, span_class)| {
                format!(
                    r#"<tspan class="{}">{}</tspan>"#,
                    escape_xml(span_class),
                    escape_xml(content)
                )
            })
            .collect();
        self.push(format!(
            r#"<text x="{}" y="{}" class="{}">{}</text>"#,
            num(x),
            num(y),
            escape_xml(class),
            body
        ));
    }
}

/// Format a coordinate with at most three decimals and no trailing zeros.
fn num(value: f64) -> String {
    let s = format!("{value:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// Escape text for element content and double-quoted attributes.
pub(crate) fn escape_xml(content: &str) -> String {
    content
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
