//! A small, tolerant HTML fragment parser for the in-memory tree.
//!
//! Handles elements, quoted/unquoted/bare attributes, text, comments,
//! void elements and raw-text `<style>`/`<script>` bodies. Unclosed
//! elements are closed at the end of input; stray end tags are dropped.

use super::tree::{NodeId, Tree};
use crate::error::HostError;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

pub(crate) fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// Parse `html` into detached nodes of `tree`, returning the top-level ones.
pub(crate) fn parse_fragment(tree: &mut Tree, html: &str) -> Result<Vec<NodeId>, HostError> {
    let mut parser = Parser {
        src: html,
        pos: 0,
        tree,
        roots: Vec::new(),
        open: Vec::new(),
    };
    parser.run()?;
    Ok(parser.roots)
}

struct Parser<'a, 't> {
    src: &'a str,
    pos: usize,
    tree: &'t mut Tree,
    roots: Vec<NodeId>,
    /// Open elements with their lowercase tag names.
    open: Vec<(NodeId, String)>,
}

impl<'a> Parser<'a, '_> {
    fn run(&mut self) -> Result<(), HostError> {
        let src = self.src;
        while self.pos < src.len() {
            let rest = &src[self.pos..];
            if rest.starts_with("<!--") {
                self.comment()?;
            } else if rest.starts_with("</") {
                self.end_tag()?;
            } else if rest.starts_with('<') && rest[1..].starts_with(|c: char| c.is_ascii_alphabetic()) {
                self.start_tag()?;
            } else {
                self.text();
            }
        }
        Ok(())
    }

    fn attach(&mut self, node: NodeId) {
        match self.open.last() {
            Some(&(parent, _)) => self.tree.append_child(parent, node),
            None => self.roots.push(node),
        }
    }

    fn error(&self, reason: &'static str) -> HostError {
        HostError::Parse {
            offset: self.pos,
            reason,
        }
    }

    fn text(&mut self) {
        let src = self.src;
        let rest = &src[self.pos..];
        // A `<` that does not open markup is plain text.
        let skip = usize::from(rest.starts_with('<'));
        let len = rest[skip..].find('<').map_or(rest.len(), |i| i + skip);
        let node = self.tree.create_text(&rest[..len]);
        self.attach(node);
        self.pos += len;
    }

    fn comment(&mut self) -> Result<(), HostError> {
        let src = self.src;
        let body_start = self.pos + "<!--".len();
        let Some(len) = src[body_start..].find("-->") else {
            return Err(self.error("unterminated comment"));
        };
        let node = self.tree.create_comment(&src[body_start..body_start + len]);
        self.attach(node);
        self.pos = body_start + len + "-->".len();
        Ok(())
    }

    fn end_tag(&mut self) -> Result<(), HostError> {
        let src = self.src;
        let Some(len) = src[self.pos..].find('>') else {
            return Err(self.error("unterminated end tag"));
        };
        let name = src[self.pos + 2..self.pos + len].trim().to_ascii_lowercase();
        self.pos += len + 1;
        if let Some(depth) = self.open.iter().rposition(|(_, tag)| *tag == name) {
            self.open.truncate(depth);
        }
        Ok(())
    }

    fn start_tag(&mut self) -> Result<(), HostError> {
        self.pos += 1;
        let tag = self.take_while(|c| !c.is_whitespace() && c != '/' && c != '>');
        let tag = tag.to_ascii_lowercase();
        let node = self.tree.create_element(&tag);

        let src = self.src;
        let self_closing = loop {
            self.skip_whitespace();
            let rest = &src[self.pos..];
            if rest.is_empty() {
                return Err(self.error("unterminated start tag"));
            }
            if rest.starts_with("/>") {
                self.pos += 2;
                break true;
            }
            if rest.starts_with('>') {
                self.pos += 1;
                break false;
            }
            if rest.starts_with('/') {
                self.pos += 1;
                continue;
            }
            let (name, value) = self.attribute()?;
            self.tree.set_attribute(node, &name, &value);
        };

        self.attach(node);
        if self_closing || is_void(&tag) {
            return Ok(());
        }
        if RAW_TEXT_ELEMENTS.contains(&tag.as_str()) {
            return self.raw_text(node, &tag);
        }
        self.open.push((node, tag));
        Ok(())
    }

    fn attribute(&mut self) -> Result<(String, String), HostError> {
        let name = self
            .take_while(|c| !c.is_whitespace() && c != '=' && c != '>' && c != '/')
            .to_ascii_lowercase();
        self.skip_whitespace();
        if !self.src[self.pos..].starts_with('=') {
            return Ok((name, String::new()));
        }
        self.pos += 1;
        self.skip_whitespace();
        let src = self.src;
        let rest = &src[self.pos..];
        let value = match rest.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let Some(len) = rest[1..].find(quote) else {
                    return Err(self.error("unterminated attribute value"));
                };
                self.pos += len + 2;
                rest[1..=len].to_owned()
            }
            _ => self.take_while(|c| !c.is_whitespace() && c != '>').to_owned(),
        };
        Ok((name, value))
    }

    fn raw_text(&mut self, node: NodeId, tag: &str) -> Result<(), HostError> {
        let close = format!("</{tag}");
        let src = self.src;
        let rest = &src[self.pos..];
        let Some(len) = rest.to_ascii_lowercase().find(&close) else {
            return Err(self.error("unterminated raw text element"));
        };
        if len > 0 {
            let text = self.tree.create_text(&rest[..len]);
            self.tree.append_child(node, text);
        }
        self.pos += len;
        self.end_tag()
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let src = self.src;
        let rest = &src[self.pos..];
        let len = rest.find(|c: char| !pred(c)).unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn skip_whitespace(&mut self) {
        self.take_while(char::is_whitespace);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(html: &str) -> String {
        let mut tree = Tree::default();
        let roots = parse_fragment(&mut tree, html).unwrap();
        roots.iter().map(|&n| tree.outer_html(n)).collect()
    }

    #[test]
    fn test_nested_elements_and_text() {
        assert_eq!(render("<p class=\"a\">hi <b>there</b></p>tail"), "<p class=\"a\">hi <b>there</b></p>tail");
    }

    #[test]
    fn test_attribute_forms() {
        assert_eq!(
            render("<input id=box type=checkbox checked data-x='1'>"),
            "<input id=\"box\" type=\"checkbox\" checked=\"\" data-x=\"1\">"
        );
    }

    #[test]
    fn test_void_and_self_closing() {
        assert_eq!(render("<br><path d=\"M0\"/><i></i>"), "<br><path d=\"M0\"></path><i></i>");
    }

    #[test]
    fn test_style_body_is_raw() {
        assert_eq!(render("<style>a > b { x: 1 }</style>"), "<style>a > b { x: 1 }</style>");
    }

    #[test]
    fn test_unclosed_and_stray_tags() {
        assert_eq!(render("<div><span>x</div></em>"), "<div><span>x</span></div>");
        assert_eq!(render("1 < 2"), "1 < 2");
    }

    #[test]
    fn test_unterminated_tag_is_an_error() {
        let mut tree = Tree::default();
        let err = parse_fragment(&mut tree, "<div class=\"x").unwrap_err();
        assert!(matches!(err, HostError::Parse { .. }));
    }
}
