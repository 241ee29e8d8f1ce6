// Indented serialization of a Page

use crate::page::{ElementNamespace, NodeData, NodeId, Page};

/// Elements that never have content or an end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "bgsound", "br", "col", "embed", "frame", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// HTML elements whose text content is written without entity escaping.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

/// Elements whose content is whitespace-significant and must be written verbatim.
const PRESERVE_WHITESPACE_ELEMENTS: &[&str] = &["pre", "textarea", "listing"];

impl Page {
    /// Render the page with one node per line, indented one space per level.
    ///
    /// Whitespace-only text is dropped and remaining text is trimmed, so the
    /// output is not byte-identical to the fetched markup. Contents of
    /// `pre`/`textarea` are the exception and are kept as-is. Rendering the
    /// same page always yields the same text.
    pub fn prettify(&self) -> String {
        let mut out = String::new();
        for child in self.children(self.root()) {
            self.write_pretty(*child, 0, &mut out);
        }
        out
    }

    fn write_pretty(&self, id: NodeId, depth: usize, out: &mut String) {
        let Some(node) = self.node(id) else {
            return;
        };
        let indent = " ".repeat(depth);

        match &node.data {
            NodeData::Document => {
                for child in node.children() {
                    self.write_pretty(*child, depth, out);
                }
            }
            NodeData::Doctype { .. } | NodeData::Comment(_) => {
                out.push_str(&indent);
                self.write_compact(id, out);
                out.push('\n');
            }
            NodeData::Text(text) => {
                let trimmed = text.trim_matches(|c: char| c.is_ascii_whitespace());
                if trimmed.is_empty() {
                    return;
                }
                out.push_str(&indent);
                if self.in_raw_text(id) {
                    out.push_str(trimmed);
                } else {
                    out.push_str(&escape_text(trimmed));
                }
                out.push('\n');
            }
            NodeData::Element { name, attrs, .. } => {
                out.push_str(&indent);

                if PRESERVE_WHITESPACE_ELEMENTS.contains(&name.as_str()) {
                    self.write_compact(id, out);
                    out.push('\n');
                    return;
                }

                write_start_tag(name, attrs, out);
                out.push('\n');
                if VOID_ELEMENTS.contains(&name.as_str()) {
                    return;
                }

                for child in node.children() {
                    self.write_pretty(*child, depth + 1, out);
                }

                out.push_str(&indent);
                write_end_tag(name, out);
                out.push('\n');
            }
        }
    }

    /// Serialize a subtree exactly as stored, with no added whitespace.
    fn write_compact(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.node(id) else {
            return;
        };

        match &node.data {
            NodeData::Document => {
                for child in node.children() {
                    self.write_compact(*child, out);
                }
            }
            NodeData::Doctype {
                name,
                public_id,
                system_id,
            } => {
                out.push_str("<!DOCTYPE ");
                out.push_str(name);
                if !public_id.is_empty() {
                    out.push_str(&format!(" PUBLIC \"{}\"", public_id));
                    if !system_id.is_empty() {
                        out.push_str(&format!(" \"{}\"", system_id));
                    }
                } else if !system_id.is_empty() {
                    out.push_str(&format!(" SYSTEM \"{}\"", system_id));
                }
                out.push('>');
            }
            NodeData::Comment(comment) => {
                out.push_str("<!--");
                out.push_str(comment);
                out.push_str("-->");
            }
            NodeData::Text(text) => {
                if self.in_raw_text(id) {
                    out.push_str(text);
                } else {
                    out.push_str(&escape_text(text));
                }
            }
            NodeData::Element { name, attrs, .. } => {
                write_start_tag(name, attrs, out);
                if VOID_ELEMENTS.contains(&name.as_str()) {
                    return;
                }

                // The parser drops one newline right after these start tags
                if PRESERVE_WHITESPACE_ELEMENTS.contains(&name.as_str())
                    && let Some(NodeData::Text(text)) = node
                        .children()
                        .first()
                        .and_then(|first| self.node(*first))
                        .map(|n| &n.data)
                    && text.starts_with('\n')
                {
                    out.push('\n');
                }

                for child in node.children() {
                    self.write_compact(*child, out);
                }
                write_end_tag(name, out);
            }
        }
    }

    /// Raw text only exists inside HTML elements; `<svg><style>` and the
    /// like hold ordinary, escaped text.
    fn in_raw_text(&self, id: NodeId) -> bool {
        let Some(parent) = self.node(id).and_then(|n| n.parent()) else {
            return false;
        };
        self.namespace(parent) == Some(ElementNamespace::Html)
            && self
                .tag_name(parent)
                .is_some_and(|tag| RAW_TEXT_ELEMENTS.contains(&tag))
    }
}

fn write_start_tag(name: &str, attrs: &[(String, String)], out: &mut String) {
    out.push('<');
    out.push_str(name);
    for (key, value) in attrs {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&escape_attr(value));
        out.push('"');
    }
    if VOID_ELEMENTS.contains(&name) {
        out.push('/');
    }
    out.push('>');
}

fn write_end_tag(name: &str, out: &mut String) {
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\u{a0}' => escaped.push_str("&nbsp;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\u{a0}' => escaped.push_str("&nbsp;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prettify_indents_one_space_per_level() {
        let page = Page::parse("<!DOCTYPE html><html><head><title>Demo</title></head><body><p>Hello</p></body></html>");

        let expected = "\
<!DOCTYPE html>
<html>
 <head>
  <title>
   Demo
  </title>
 </head>
 <body>
  <p>
   Hello
  </p>
 </body>
</html>
";
        assert_eq!(page.prettify(), expected);
    }

    #[test]
    fn test_prettify_void_elements_self_close() {
        let page = Page::parse(r#"<body><img src="assets/cat.png"><br></body>"#);
        let output = page.prettify();

        assert!(output.contains("  <img src=\"assets/cat.png\"/>\n"));
        assert!(output.contains("  <br/>\n"));
        assert!(!output.contains("</img>"));
        assert!(!output.contains("</br>"));
    }

    #[test]
    fn test_prettify_drops_whitespace_only_text() {
        let page = Page::parse("<body>\n\n   <p>  padded  </p>\n   \n</body>");
        let output = page.prettify();

        assert!(output.contains("  <p>\n   padded\n  </p>\n"));
        assert!(!output.contains("\n\n"));
    }

    #[test]
    fn test_prettify_escapes_text_and_attributes() {
        let page = Page::parse(r#"<body><p title="a &quot;b&quot; &amp; c">1 &lt; 2 &amp;&amp; 3 &gt; 2</p></body>"#);
        let output = page.prettify();

        assert!(output.contains(r#"<p title="a &quot;b&quot; &amp; c">"#));
        assert!(output.contains("1 &lt; 2 &amp;&amp; 3 &gt; 2"));
    }

    #[test]
    fn test_prettify_keeps_non_breaking_space() {
        let page = Page::parse("<body><p>&nbsp;x&nbsp;</p></body>");
        let output = page.prettify();

        assert!(output.contains("&nbsp;x&nbsp;"));
    }

    #[test]
    fn test_prettify_script_not_escaped() {
        let page = Page::parse("<head><script>if (a < b && c > d) { run(); }</script></head>");
        let output = page.prettify();

        assert!(output.contains("if (a < b && c > d) { run(); }"));
        assert!(!output.contains("&lt;"));
    }

    #[test]
    fn test_prettify_escapes_text_in_svg_style() {
        let page = Page::parse("<body><svg><style>&lt;b&gt;x</style></svg></body>");
        let output = page.prettify();

        assert!(output.contains("&lt;b&gt;x"));
        assert!(Page::parse(&output).elements_by_tag(&["b"]).is_empty());
        assert_eq!(Page::parse(&output).prettify(), output);
    }

    #[test]
    fn test_prettify_noscript_children_are_markup() {
        let page = Page::parse(r#"<body><noscript><img src="fallback.png"></noscript></body>"#);
        let output = page.prettify();

        assert!(output.contains("  <noscript>\n   <img src=\"fallback.png\"/>\n  </noscript>\n"));
        assert_eq!(Page::parse(&output).prettify(), output);
    }

    #[test]
    fn test_prettify_pre_kept_verbatim() {
        let page = Page::parse("<body><pre>  line one\n    line two</pre></body>");
        let output = page.prettify();

        assert!(output.contains("  <pre>  line one\n    line two</pre>\n"));
    }

    #[test]
    fn test_prettify_pre_leading_newline_survives_reparse() {
        let page = Page::parse("<body><pre>\n\nfirst</pre></body>");
        let output = page.prettify();

        assert!(output.contains("<pre>\n\nfirst</pre>"));
        assert_eq!(Page::parse(&output).prettify(), output);
    }

    #[test]
    fn test_prettify_comments() {
        let page = Page::parse("<body><!-- scene assets --><p>x</p></body>");
        let output = page.prettify();

        assert!(output.contains("  <!-- scene assets -->\n"));
    }

    #[test]
    fn test_prettify_reflects_rewritten_attribute() {
        let mut page = Page::parse(r#"<body><img src="https://host/img/cat.png"></body>"#);
        let img = page.elements_by_tag(&["img"])[0];
        page.set_attr(img, "src", "assets/cat.png");

        let output = page.prettify();
        assert!(output.contains(r#"src="assets/cat.png""#));
        assert!(!output.contains("https://host/img/cat.png"));
    }

    #[test]
    fn test_prettify_is_deterministic() {
        let source = r#"<body><a-asset-item id="m" src="model.glb"></a-asset-item><audio src="a.mp3" controls autoplay></audio></body>"#;

        assert_eq!(Page::parse(source).prettify(), Page::parse(source).prettify());
    }

    #[test]
    fn test_prettify_reparse_is_stable() {
        let source = "<html><body><div><p>one</p><img src='x.png'></div></body></html>";
        let once = Page::parse(source).prettify();
        let twice = Page::parse(&once).prettify();

        assert_eq!(once, twice);
    }

    #[test]
    fn test_doctype_with_public_id() {
        let page = Page::parse(
            r#"<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01//EN" "http://www.w3.org/TR/html4/strict.dtd"><p>x</p>"#,
        );
        let output = page.prettify();

        assert!(output.starts_with(
            "<!DOCTYPE html PUBLIC \"-//W3C//DTD HTML 4.01//EN\" \"http://www.w3.org/TR/html4/strict.dtd\">\n"
        ));
    }
}
