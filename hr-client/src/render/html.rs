//! HTML builder
//!
//! Every piece of text and every attribute value goes through [`escape`];
//! the only way to insert unescaped markup is [`HtmlBuilder::fragment`],
//! which takes an already built [`Html`].

use std::fmt;

/// Escape text for HTML content and double-quoted attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// A server-supplied URL usable in `href`/`src`: site-relative, `http:` or
/// `https:` only. Anything else (`javascript:`, `data:`, ...) is refused.
pub fn safe_url(raw: &str) -> Option<&str> {
    let url = raw.trim();
    let scheme_ok = ["http:", "https:"].iter().any(|scheme| {
        url.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    });
    (url.starts_with('/') || scheme_ok).then_some(url)
}

/// Markup produced by [`HtmlBuilder`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Html(String);

impl Html {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Escaped text as a fragment
    pub fn text(text: &str) -> Self {
        Html(escape(text))
    }

    /// Concatenate fragments
    pub fn concat(parts: impl IntoIterator<Item = Html>) -> Self {
        Html(parts.into_iter().map(|p| p.0).collect())
    }
}

impl fmt::Display for Html {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fluent HTML builder
///
/// # Example
/// ```
/// use hr_client::render::HtmlBuilder;
///
/// let html = HtmlBuilder::new()
///     .open("span", &[("class", "badge bg-success")])
///     .text("<b>paid</b>")
///     .close()
///     .build();
/// assert_eq!(
///     html.as_str(),
///     r#"<span class="badge bg-success">&lt;b&gt;paid&lt;/b&gt;</span>"#
/// );
/// ```
#[derive(Debug, Default)]
pub struct HtmlBuilder {
    buffer: String,
    open: Vec<&'static str>,
}

impl HtmlBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn start_tag(&mut self, tag: &'static str, attrs: &[(&str, &str)]) {
        self.buffer.push('<');
        self.buffer.push_str(tag);
        for (name, value) in attrs {
            self.buffer.push(' ');
            self.buffer.push_str(name);
            self.buffer.push_str("=\"");
            self.buffer.push_str(&escape(value));
            self.buffer.push('"');
        }
        self.buffer.push('>');
    }

    /// Open a tag; it stays open until [`close`](Self::close) or [`build`](Self::build)
    pub fn open(&mut self, tag: &'static str, attrs: &[(&str, &str)]) -> &mut Self {
        self.start_tag(tag, attrs);
        self.open.push(tag);
        self
    }

    /// Close the innermost open tag
    pub fn close(&mut self) -> &mut Self {
        if let Some(tag) = self.open.pop() {
            self.buffer.push_str("</");
            self.buffer.push_str(tag);
            self.buffer.push('>');
        }
        self
    }

    /// Escaped text
    pub fn text(&mut self, text: &str) -> &mut Self {
        self.buffer.push_str(&escape(text));
        self
    }

    /// `<tag attrs>text</tag>`
    pub fn element(&mut self, tag: &'static str, attrs: &[(&str, &str)], text: &str) -> &mut Self {
        self.open(tag, attrs).text(text).close()
    }

    /// Tag without content or closing tag (`<img>`, `<source>`, `<br>`)
    pub fn void(&mut self, tag: &'static str, attrs: &[(&str, &str)]) -> &mut Self {
        self.start_tag(tag, attrs);
        self
    }

    /// Insert a previously built fragment
    pub fn fragment(&mut self, html: &Html) -> &mut Self {
        self.buffer.push_str(html.as_str());
        self
    }

    /// Close anything still open and return the markup
    pub fn build(&mut self) -> Html {
        while !self.open.is_empty() {
            self.close();
        }
        Html(std::mem::take(&mut self.buffer))
    }
}
