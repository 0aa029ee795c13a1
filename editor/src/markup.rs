//! Markup scanning over section content and server pages.
//!
//! Section content is user HTML that must survive persistence byte-for-byte,
//! so nothing here builds a DOM and serializes it back. Instead a tag scanner
//! locates elements by name, class or id and edits exact byte ranges: image
//! `src` values are rewritten in place and elements are cut out whole, while
//! every other byte stays as it was.
//!
//! The scanner understands quoted attribute values (including `>` inside
//! them), void and self-closing elements, and nesting of same-named elements.
//! Comments are opaque, and so is the raw text of `<script>` and `<style>`:
//! tags written inside them are not tags and never shift nesting depth.

#[cfg(test)]
#[path = "markup_test.rs"]
mod markup_test;

use std::ops::Range;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::section::Section;

static TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<(/?)([A-Za-z][A-Za-z0-9-]*)((?:[^>"']|"[^"]*"|'[^']*')*)>"#).expect("tag pattern is valid")
});

static ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
        .expect("attribute pattern is valid")
});

static ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[A-Za-z]+);").expect("entity pattern is valid"));

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

const COMMENT_OPEN: &str = "<!--";
const COMMENT_CLOSE: &str = "-->";

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track", "wbr",
];

/// One opening or closing tag found in a markup string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tag {
    /// Byte offset of `<`.
    pub start: usize,
    /// Byte offset just past `>`.
    pub end: usize,
    /// Lowercased element name.
    pub name: String,
    /// `</name>` rather than `<name ...>`.
    pub closing: bool,
    /// Written as `<name ... />`.
    pub self_closing: bool,
    attrs: Range<usize>,
}

/// One attribute of a [`Tag`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attr {
    /// Lowercased attribute name.
    pub name: String,
    /// Unescaped value; `None` for a bare attribute such as `contenteditable`.
    pub value: Option<String>,
    /// Byte range of the raw value inside the scanned markup.
    pub value_range: Option<Range<usize>>,
    /// The raw value was wrapped in quotes.
    pub quoted: bool,
}

impl Tag {
    /// Whether the element has no closing tag.
    #[must_use]
    pub fn is_void(&self) -> bool {
        self.self_closing || VOID_ELEMENTS.contains(&self.name.as_str())
    }

    /// All attributes, in source order.
    #[must_use]
    pub fn attrs(&self, html: &str) -> Vec<Attr> {
        let offset = self.attrs.start;
        let raw = &html[self.attrs.clone()];
        ATTR.captures_iter(raw)
            .filter_map(|caps| {
                let name = caps.get(1)?.as_str().to_ascii_lowercase();
                let (value, quoted) = match (caps.get(2), caps.get(3), caps.get(4)) {
                    (Some(m), _, _) | (_, Some(m), _) => (Some(m), true),
                    (_, _, Some(m)) => (Some(m), false),
                    _ => (None, false),
                };
                Some(Attr {
                    name,
                    value: value.map(|m| unescape(m.as_str())),
                    value_range: value.map(|m| offset + m.start()..offset + m.end()),
                    quoted,
                })
            })
            .collect()
    }

    /// The attribute called `name`, if present.
    #[must_use]
    pub fn attr(&self, html: &str, name: &str) -> Option<Attr> {
        self.attrs(html).into_iter().find(|a| a.name.eq_ignore_ascii_case(name))
    }

    /// Unescaped value of attribute `name`.
    #[must_use]
    pub fn attr_value(&self, html: &str, name: &str) -> Option<String> {
        self.attr(html, name).and_then(|a| a.value)
    }

    /// Whether the `class` attribute lists `class`.
    #[must_use]
    pub fn has_class(&self, html: &str, class: &str) -> bool {
        self.attr_value(html, "class")
            .is_some_and(|v| v.split_ascii_whitespace().any(|c| c == class))
    }
}

/// Byte ranges of a whole element and of its children.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ElementSpan {
    pub start: usize,
    pub inner_start: usize,
    pub inner_end: usize,
    pub end: usize,
}

impl ElementSpan {
    /// Markup between the opening and closing tags.
    #[must_use]
    pub fn inner<'h>(&self, html: &'h str) -> &'h str {
        &html[self.inner_start..self.inner_end]
    }

    /// Markup of the whole element.
    #[must_use]
    pub fn outer<'h>(&self, html: &'h str) -> &'h str {
        &html[self.start..self.end]
    }
}

/// Every tag in `html`, in source order.
pub fn tags(html: &str) -> impl Iterator<Item = Tag> + '_ {
    tags_from(html, 0)
}

fn tags_from(html: &str, from: usize) -> TagScanner<'_> {
    TagScanner { html, pos: from }
}

/// Tags from a byte offset onward, stepping over comments and raw text.
struct TagScanner<'h> {
    html: &'h str,
    pos: usize,
}

impl Iterator for TagScanner<'_> {
    type Item = Tag;

    fn next(&mut self) -> Option<Tag> {
        loop {
            let rest = self.html.get(self.pos..)?;
            let caps = TAG.captures(rest);
            let tag_start = caps.as_ref().and_then(|c| c.get(0)).map_or(rest.len(), |m| m.start());
            if let Some(at) = rest[..tag_start].find(COMMENT_OPEN) {
                let body = self.pos + at + COMMENT_OPEN.len();
                self.pos = self.html[body..]
                    .find(COMMENT_CLOSE)
                    .map_or(self.html.len(), |end| body + end + COMMENT_CLOSE.len());
                continue;
            }
            let tag = tag_from_captures(&caps?, self.pos)?;
            self.pos = tag.end;
            if !tag.closing && !tag.self_closing && RAW_TEXT_ELEMENTS.contains(&tag.name.as_str()) {
                self.pos = raw_text_end(self.html, tag.end, &tag.name);
            }
            return Some(tag);
        }
    }
}

/// Offset of the `</name` that ends raw text starting at `from`.
fn raw_text_end(html: &str, from: usize, name: &str) -> usize {
    html[from..]
        .match_indices("</")
        .map(|(at, _)| from + at)
        .find(|at| html.get(at + 2..at + 2 + name.len()).is_some_and(|n| n.eq_ignore_ascii_case(name)))
        .unwrap_or(html.len())
}

fn tag_from_captures(caps: &Captures<'_>, offset: usize) -> Option<Tag> {
    let whole = caps.get(0)?;
    let name = caps.get(2)?;
    let attrs = caps.get(3)?;
    Some(Tag {
        start: offset + whole.start(),
        end: offset + whole.end(),
        name: name.as_str().to_ascii_lowercase(),
        closing: caps.get(1).is_some_and(|m| !m.as_str().is_empty()),
        self_closing: attrs.as_str().trim_end().ends_with('/'),
        attrs: offset + attrs.start()..offset + attrs.end(),
    })
}

/// Locate the extent of the element opened by `open`.
///
/// An element that is never closed extends to the end of the input.
#[must_use]
pub fn element_span(html: &str, open: &Tag) -> Option<ElementSpan> {
    if open.closing {
        return None;
    }
    if open.is_void() {
        return Some(ElementSpan { start: open.start, inner_start: open.end, inner_end: open.end, end: open.end });
    }
    let mut depth = 1usize;
    for tag in tags_from(html, open.start).skip(1).filter(|t| t.name == open.name) {
        if tag.closing {
            depth -= 1;
            if depth == 0 {
                return Some(ElementSpan {
                    start: open.start,
                    inner_start: open.end,
                    inner_end: tag.start,
                    end: tag.end,
                });
            }
        } else if !tag.self_closing {
            depth += 1;
        }
    }
    Some(ElementSpan { start: open.start, inner_start: open.end, inner_end: html.len(), end: html.len() })
}

/// Outermost elements whose opening tag satisfies `pred`, in source order.
///
/// Matches nested inside an earlier match are skipped.
pub fn find_elements<P>(html: &str, mut pred: P) -> Vec<(Tag, ElementSpan)>
where
    P: FnMut(&Tag) -> bool,
{
    let mut found = Vec::new();
    let mut pos = 0;
    while let Some(tag) = tags_from(html, pos).find(|t| !t.closing && pred(t)) {
        let Some(span) = element_span(html, &tag) else {
            break;
        };
        pos = span.end;
        found.push((tag, span));
    }
    found
}

/// First element whose opening tag satisfies `pred`.
pub fn find_element<P>(html: &str, mut pred: P) -> Option<(Tag, ElementSpan)>
where
    P: FnMut(&Tag) -> bool,
{
    let tag = tags(html).find(|t| !t.closing && pred(t))?;
    let span = element_span(html, &tag)?;
    Some((tag, span))
}

/// Outermost `name` elements carrying `class`.
#[must_use]
pub fn elements_with_class(html: &str, name: &str, class: &str) -> Vec<ElementSpan> {
    find_elements(html, |t| t.name == name && t.has_class(html, class))
        .into_iter()
        .map(|(_, span)| span)
        .collect()
}

/// The element whose `id` is `id`.
#[must_use]
pub fn element_by_id(html: &str, id: &str) -> Option<ElementSpan> {
    find_element(html, |t| t.attr_value(html, "id").as_deref() == Some(id)).map(|(_, span)| span)
}

/// The first element carrying `attr="value"`.
#[must_use]
pub fn element_by_attr(html: &str, attr: &str, value: &str) -> Option<ElementSpan> {
    find_element(html, |t| t.attr_value(html, attr).as_deref() == Some(value)).map(|(_, span)| span)
}

/// Text of a markup fragment: tags dropped, entities decoded.
#[must_use]
pub fn text_content(fragment: &str) -> String {
    unescape(&TAG.replace_all(fragment, ""))
}

/// Text content of the element with the given `id`.
#[must_use]
pub fn extract_element_text(html: &str, id: &str) -> Option<String> {
    element_by_id(html, id).map(|span| text_content(span.inner(html)))
}

/// Children of `<body>`, or the whole input when there is no body element.
#[must_use]
pub fn body_inner(html: &str) -> &str {
    find_element(html, |t| t.name == "body").map_or(html, |(_, span)| span.inner(html))
}

/// Unescaped `src` values of every `<img>`, in source order.
#[must_use]
pub fn image_sources(html: &str) -> Vec<String> {
    tags(html)
        .filter(|t| !t.closing && t.name == "img")
        .filter_map(|t| t.attr_value(html, "src"))
        .collect()
}

/// Rewrite `<img>` sources in place.
///
/// `rewrite` receives each unescaped `src` and returns the replacement, or
/// `None` to leave it untouched. All other bytes are preserved.
pub fn rewrite_image_sources<F>(html: &str, mut rewrite: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    let mut edits: Vec<(Range<usize>, String)> = Vec::new();
    for tag in tags(html).filter(|t| !t.closing && t.name == "img") {
        let Some(Attr { value: Some(value), value_range: Some(range), quoted, .. }) = tag.attr(html, "src") else {
            continue;
        };
        if let Some(next) = rewrite(&value) {
            let escaped = escape_attr(&next);
            edits.push((range, if quoted { escaped } else { format!("\"{escaped}\"") }));
        }
    }
    apply_edits(html, edits)
}

/// Replace the whole element `span` with `replacement`.
#[must_use]
pub fn replace_span(html: &str, span: ElementSpan, replacement: &str) -> String {
    apply_edits(html, vec![(span.start..span.end, replacement.to_owned())])
}

/// Cut the whole element `span` out of `html`.
#[must_use]
pub fn remove_span(html: &str, span: ElementSpan) -> String {
    replace_span(html, span, "")
}

fn apply_edits(html: &str, edits: Vec<(Range<usize>, String)>) -> String {
    let mut out = String::with_capacity(html.len());
    let mut cursor = 0;
    for (range, text) in edits {
        out.push_str(&html[cursor..range.start]);
        out.push_str(&text);
        cursor = range.end;
    }
    out.push_str(&html[cursor..]);
    out
}

/// Sections found in `html`: every `div.section-wrapper` contributes its
/// `.section-title` text and the verbatim children of its `div.editor`.
#[must_use]
pub fn parse_sections(html: &str) -> Vec<Section> {
    elements_with_class(html, "div", "section-wrapper")
        .into_iter()
        .map(|wrapper| {
            let inner = wrapper.inner(html);
            let title = find_element(inner, |t| t.has_class(inner, "section-title"))
                .map(|(_, span)| text_content(span.inner(inner)))
                .unwrap_or_default();
            let content = find_element(inner, |t| t.name == "div" && t.has_class(inner, "editor"))
                .map(|(_, span)| span.inner(inner))
                .unwrap_or_default();
            Section::new(&title, content)
        })
        .collect()
}

/// Escape text for use between tags.
#[must_use]
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape text for use inside a double-quoted attribute value.
#[must_use]
pub fn escape_attr(text: &str) -> String {
    escape_text(text).replace('"', "&quot;")
}

/// Decode character references.
///
/// Unknown named references are left as written.
#[must_use]
pub fn unescape(text: &str) -> String {
    if !text.contains('&') {
        return text.to_owned();
    }
    ENTITY
        .replace_all(text, |caps: &Captures<'_>| {
            let whole = &caps[0];
            decode_entity(&caps[1]).map_or_else(|| whole.to_owned(), String::from)
        })
        .into_owned()
}

fn decode_entity(body: &str) -> Option<char> {
    if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
        return u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
    }
    if let Some(dec) = body.strip_prefix('#') {
        return dec.parse::<u32>().ok().and_then(char::from_u32);
    }
    match body {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => None,
    }
}
