//! Full HTML document around a rendered page.

use std::fmt::Write;

use folio_markup::escape_html;

use crate::RenderedPage;

/// Entry of the navigation bar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavLink {
    /// Link target.
    pub href: String,
    /// Link text.
    pub label: String,
}

impl NavLink {
    /// Link to a top-level page slug. `home` links to `/`.
    #[must_use]
    pub fn for_page(slug: &str) -> Self {
        let href = if slug == "home" {
            "/".to_owned()
        } else {
            format!("/{slug}")
        };
        let mut chars = slug.chars();
        let label = chars
            .next()
            .map(|first| first.to_uppercase().chain(chars).collect())
            .unwrap_or_default();
        Self { href, label }
    }
}

/// Site chrome shared by every page.
#[derive(Clone, Debug, Default)]
pub struct Layout {
    /// Site name shown in the navigation bar.
    pub site_title: String,
    /// Navigation links.
    pub nav: Vec<NavLink>,
    /// Footer text.
    pub footer: Option<String>,
    /// Stylesheet inlined into `<style>`.
    pub styles: String,
}

impl Layout {
    /// Wrap a rendered page into a complete HTML document.
    #[must_use]
    pub fn render(&self, page: &RenderedPage) -> String {
        let title = escape_html(&page.title);
        let mut out = String::with_capacity(page.html.len() + self.styles.len() + 1024);

        out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        out.push_str("<meta charset=\"utf-8\">\n");
        out.push_str("<meta name=\"theme-color\" content=\"#ffffff\">\n");
        out.push_str(
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
        );
        writeln!(out, r#"<meta name="description" content="{title}">"#).unwrap();
        writeln!(out, "<title>{title}</title>").unwrap();
        if !self.styles.is_empty() {
            writeln!(out, "<style>{}</style>", self.styles).unwrap();
        }
        out.push_str("</head>\n<body>\n");

        out.push_str("<header class=\"navbar\">\n");
        writeln!(out, "<p>{}</p>", escape_html(&self.site_title)).unwrap();
        out.push_str("<nav class=\"contents\" aria-label=\"Site Sections\"><ul role=\"list\">");
        for link in &self.nav {
            write!(
                out,
                r#"<li><a href="{}">{}</a></li>"#,
                escape_html(&link.href),
                escape_html(&link.label)
            )
            .unwrap();
        }
        out.push_str("</ul></nav>\n</header>\n");

        writeln!(out, "<main>\n{}</main>", page.html).unwrap();
        if let Some(footer) = &self.footer {
            writeln!(out, "<footer>{}</footer>", escape_html(footer)).unwrap();
        }
        out.push_str("</body>\n</html>\n");
        out
    }
}
