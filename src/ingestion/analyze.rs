/// Read-only structural inspection of a source XML file
///
/// Used by `--analyze-only` to preview a document before uploading it.
/// This is a tag scan, not a parser: it reports which elements occur and
/// how often, plus a preview of the first article.

use std::collections::BTreeMap;
use std::fmt::Write;
use std::path::Path;

use regex::Regex;

use crate::ingestion::IngestionError;

/// Characters of element text shown in the sample article preview
pub const PREVIEW_CHARS: usize = 50;

/// Element names tried, in order, when picking the sample article
const ARTICLE_ELEMENTS: [&str; 2] = ["article", "item"];

const NAME: &str = r"[A-Za-z_][\w:.\-]*";

/// Structural summary of an XML document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlOutline {
    pub root_element: Option<String>,
    pub root_attributes: Vec<(String, String)>,
    /// Occurrences of each element name
    pub element_counts: BTreeMap<String, usize>,
    /// Child elements of the first article with a text preview
    pub sample_article: Vec<(String, String)>,
}

/// Read and analyze an XML file
pub async fn analyze_xml_file(path: &Path) -> Result<XmlOutline, IngestionError> {
    let content = tokio::fs::read_to_string(path).await.map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            IngestionError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestionError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    analyze_xml(&content)
}

fn compile(pattern: &str) -> Result<Regex, IngestionError> {
    Regex::new(pattern).map_err(|e| IngestionError::Analysis(e.to_string()))
}

/// Analyze XML text
pub fn analyze_xml(content: &str) -> Result<XmlOutline, IngestionError> {
    // Comments and CDATA can hold anything that looks like markup
    let opaque = compile(r"(?s)<!--.*?-->|<!\[CDATA\[.*?\]\]>")?;
    let content = opaque.replace_all(content, "");

    let start_tag = compile(&format!(r"<({NAME})((?:\s[^<>]*?)?)/?>"))?;
    let attribute = compile(&format!(r#"({NAME})\s*=\s*(?:"([^"]*)"|'([^']*)')"#))?;

    let mut outline = XmlOutline::default();

    for (index, caps) in start_tag.captures_iter(&content).enumerate() {
        let name = caps[1].to_string();
        if index == 0 {
            let attrs = caps.get(2).map_or("", |m| m.as_str());
            outline.root_attributes = attribute
                .captures_iter(attrs)
                .map(|a| {
                    let value = a.get(2).or_else(|| a.get(3)).map_or("", |m| m.as_str());
                    (a[1].to_string(), value.to_string())
                })
                .collect();
            outline.root_element = Some(name.clone());
        }
        *outline.element_counts.entry(name).or_insert(0) += 1;
    }

    for element in ARTICLE_ELEMENTS {
        if let Some(body) = first_element_body(&content, element)? {
            let child = compile(&format!(r"<({NAME})[^<>]*>([^<]*)"))?;
            outline.sample_article = child
                .captures_iter(body)
                .map(|c| (c[1].to_string(), preview(&c[2])))
                .collect();
            break;
        }
    }

    Ok(outline)
}

/// Inner markup of the first `<element>` that has a closing tag
fn first_element_body<'a>(content: &'a str, element: &str) -> Result<Option<&'a str>, IngestionError> {
    let open = compile(&format!(r"<{}(?:\s[^<>]*)?>", regex::escape(element)))?;
    let close = format!("</{}>", element);

    let Some(start) = open.find(content) else {
        return Ok(None);
    };
    let body = &content[start.end()..];
    Ok(body.find(&close).map(|end| &body[..end]))
}

fn preview(text: &str) -> String {
    text.chars()
        .take(PREVIEW_CHARS)
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect()
}

/// Render an outline as a printable report
pub fn render_outline(outline: &XmlOutline) -> String {
    let mut out = String::new();

    // Writing to a String cannot fail
    match &outline.root_element {
        Some(root) => {
            let _ = writeln!(out, "📄 Root element: <{}>", root);
            let attrs = outline
                .root_attributes
                .iter()
                .map(|(k, v)| format!("{}=\"{}\"", k, v))
                .collect::<Vec<_>>()
                .join(", ");
            let _ = writeln!(out, "   Attributes: {{{}}}", attrs);
        }
        None => {
            let _ = writeln!(out, "📄 No elements found");
        }
    }

    let _ = writeln!(out, "\n📋 All element types ({}):", outline.element_counts.len());
    for (name, count) in &outline.element_counts {
        let _ = writeln!(out, "   {:30} ({} occurrences)", name, count);
    }

    if !outline.sample_article.is_empty() {
        let _ = writeln!(out, "\n📰 Sample article structure:");
        for (tag, text) in &outline.sample_article {
            let _ = writeln!(out, "   <{}>: {}...", tag, text);
        }
    }

    out
}
