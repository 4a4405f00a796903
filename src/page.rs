//! Index page: a navigation bar of one dropdown per mode, then one section
//! per mode listing every spelled scale with its diagram and notes.

use crate::config::{ExternalResource, PageConfig};
use crate::generator::{Catalog, DiagramEntry};
use crate::naming::{pretty_mode, pretty_note, slug_mode, url_quote};
use crate::renderer::constants::CAPTION_SEPARATOR;
use crate::renderer::escape_xml;

// ═══════════════════════════════════════════════════════════════════════
// HtmlBuilder
// ═══════════════════════════════════════════════════════════════════════

/// Indented markup writer. Void elements are self-closed so the output is
/// also well-formed XML.
pub struct HtmlBuilder {
    out: String,
    depth: usize,
}

type Attrs<'a> = &'a [(&'a str, &'a str)];

impl HtmlBuilder {
    pub fn new() -> Self {
        Self {
            out: String::new(),
            depth: 0,
        }
    }

    pub fn build(self) -> String {
        self.out
    }

    fn line(&mut self, content: &str) {
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
        self.out.push_str(content);
        self.out.push('\n');
    }

    fn open_tag(tag: &str, attrs: Attrs) -> String {
        let mut s = format!("<{tag}");
        for (name, value) in attrs {
            s.push_str(&format!(" {}=\"{}\"", name, escape_xml(value)));
        }
        s
    }

    pub fn raw(&mut self, content: &str) {
        self.line(content);
    }

    /// `<tag attrs/>`
    pub fn void(&mut self, tag: &str, attrs: Attrs) {
        let open = Self::open_tag(tag, attrs);
        self.line(&format!("{open} />"));
    }

    /// `<tag attrs>text</tag>` on one line.
    pub fn text_element(&mut self, tag: &str, attrs: Attrs, text: &str) {
        let open = Self::open_tag(tag, attrs);
        self.line(&format!("{open}>{}</{tag}>", escape_xml(text)));
    }

    /// `<tag attrs>` … children … `</tag>`
    pub fn element(&mut self, tag: &str, attrs: Attrs, body: impl FnOnce(&mut Self)) {
        let open = Self::open_tag(tag, attrs);
        self.line(&format!("{open}>"));
        self.depth += 1;
        body(self);
        self.depth -= 1;
        self.line(&format!("</{tag}>"));
    }
}

impl Default for HtmlBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Index page
// ═══════════════════════════════════════════════════════════════════════

fn resource_attrs<'a>(first: (&'a str, &'a str), res: &'a ExternalResource) -> Vec<(&'a str, &'a str)> {
    let mut attrs = vec![first];
    if let Some(ref integrity) = res.integrity {
        attrs.push(("integrity", integrity.as_str()));
    }
    if let Some(ref crossorigin) = res.crossorigin {
        attrs.push(("crossorigin", crossorigin.as_str()));
    }
    attrs
}

fn render_head(html: &mut HtmlBuilder, page: &PageConfig) {
    html.element("head", &[], |html| {
        html.text_element("title", &[], &page.title);
        if let Some(ref local) = page.local_stylesheet {
            html.void("link", &[("rel", "stylesheet"), ("href", local.as_str())]);
        }
        for sheet in &page.stylesheets {
            let mut attrs = vec![("rel", "stylesheet")];
            attrs.extend(resource_attrs(("href", sheet.url.as_str()), sheet));
            html.void("link", &attrs);
        }
        html.void(
            "meta",
            &[("name", "viewport"), ("content", "width=device-width, initial-scale=1")],
        );
        for script in &page.scripts {
            html.text_element("script", &resource_attrs(("src", script.url.as_str()), script), "");
        }
    });
}

fn render_nav(html: &mut HtmlBuilder, catalog: &Catalog) {
    html.element("nav", &[], |html| {
        html.element("ul", &[("class", "nav nav-pills")], |html| {
            for mode in catalog.modes() {
                html.element("li", &[("class", "dropdown"), ("role", "presentation")], |html| {
                    html.element(
                        "a",
                        &[
                            ("class", "dropdown-toggle"),
                            ("role", "button"),
                            ("data-target", "#"),
                            ("data-toggle", "dropdown"),
                            ("aria-haspopup", "true"),
                            ("aria-expanded", "false"),
                        ],
                        |html| {
                            html.raw(&escape_xml(pretty_mode(mode)));
                            html.text_element("span", &[("class", "caret")], "");
                        },
                    );
                    html.element("ul", &[("class", "dropdown-menu")], |html| {
                        for entry in catalog.for_mode(mode).filter(|e| e.scale.is_some()) {
                            let href = format!("#{}", entry.slug);
                            html.element("li", &[], |html| {
                                html.text_element("a", &[("href", href.as_str())], &entry.title);
                            });
                        }
                    });
                });
            }
        });
    });
}

fn render_scale_section(html: &mut HtmlBuilder, entry: &DiagramEntry) {
    let Some(ref scale) = entry.scale else {
        return;
    };
    html.element("section", &[("class", "scale"), ("id", entry.slug.as_str())], |html| {
        html.text_element("h3", &[], &entry.title);
        html.element("div", &[("class", "contents")], |html| {
            let src = url_quote(&entry.path);
            html.void("img", &[("class", "keyboard"), ("src", src.as_str())]);
            html.element("div", &[("class", "notes")], |html| {
                html.element("div", &[], |html| {
                    for (i, note) in scale.notes.iter().enumerate() {
                        if i > 0 {
                            html.text_element("span", &[("class", "separator")], CAPTION_SEPARATOR);
                        }
                        html.text_element("span", &[("class", "note")], &pretty_note(note));
                    }
                });
            });
        });
    });
}

/// Render the index page linking every diagram in the catalog.
///
/// Mode sections follow catalog order, scales within a mode follow root
/// order. Scales that could not be spelled have a diagram but no section.
pub fn render_index(catalog: &Catalog, page: &PageConfig) -> String {
    let mut html = HtmlBuilder::new();
    html.raw("<!DOCTYPE html>");
    html.element("html", &[], |html| {
        render_head(html, page);
        html.element("body", &[], |html| {
            html.element("div", &[("class", "container")], |html| {
                html.element("header", &[], |html| {
                    html.text_element("h1", &[], &page.title);
                });
                render_nav(html, catalog);
                for mode in catalog.modes() {
                    html.element("section", &[("id", slug_mode(mode))], |html| {
                        html.text_element("h2", &[], pretty_mode(mode));
                        for entry in catalog.for_mode(mode) {
                            render_scale_section(html, entry);
                        }
                    });
                }
            });
        });
    });
    html.build()
}
