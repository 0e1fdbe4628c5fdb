//! Compound selectors without combinators: `tag#id.class[attr="value"]`.

use super::tree::{NodeId, NodeKind, Tree};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<(String, Option<String>)>,
}

impl Selector {
    /// `None` when `source` uses syntax outside the supported subset.
    pub fn parse(source: &str) -> Option<Self> {
        let mut selector = Selector::default();
        let mut rest = source.trim();
        if rest.is_empty() {
            return None;
        }

        let ident_len = |s: &str| s.find(|c: char| !(c.is_alphanumeric() || c == '-' || c == '_')).unwrap_or(s.len());

        let tag_len = ident_len(rest);
        if tag_len > 0 {
            selector.tag = Some(rest[..tag_len].to_ascii_lowercase());
            rest = &rest[tag_len..];
        } else if let Some(after) = rest.strip_prefix('*') {
            rest = after;
        }

        while let Some(c) = rest.chars().next() {
            match c {
                '#' | '.' => {
                    let len = ident_len(&rest[1..]);
                    if len == 0 {
                        return None;
                    }
                    let name = rest[1..=len].to_owned();
                    if c == '#' {
                        selector.id = Some(name);
                    } else {
                        selector.classes.push(name);
                    }
                    rest = &rest[len + 1..];
                }
                '[' => {
                    let close = rest.find(']')?;
                    let body = &rest[1..close];
                    let attribute = match body.split_once('=') {
                        Some((name, value)) => {
                            let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
                            (name.trim().to_ascii_lowercase(), Some(value.to_owned()))
                        }
                        None => (body.trim().to_ascii_lowercase(), None),
                    };
                    selector.attributes.push(attribute);
                    rest = &rest[close + 1..];
                }
                _ => return None,
            }
        }
        Some(selector)
    }

    pub fn matches(&self, tree: &Tree, node: NodeId) -> bool {
        let NodeKind::Element { tag, .. } = tree.kind(node) else {
            return false;
        };
        if self.tag.as_ref().is_some_and(|wanted| wanted != tag) {
            return false;
        }
        if let Some(id) = &self.id {
            if tree.attribute(node, "id") != Some(id.as_str()) {
                return false;
            }
        }
        let classes = tree.attribute(node, "class").unwrap_or_default();
        if !self
            .classes
            .iter()
            .all(|wanted| classes.split_whitespace().any(|class| class == wanted))
        {
            return false;
        }
        self.attributes.iter().all(|(name, value)| match (tree.attribute(node, name), value) {
            (Some(actual), Some(wanted)) => actual == wanted,
            (Some(_), None) => true,
            (None, _) => false,
        })
    }

    /// First matching descendant of `root`.
    pub fn find(&self, tree: &Tree, root: NodeId) -> Option<NodeId> {
        tree.descendants(root).into_iter().find(|&node| self.matches(tree, node))
    }

    pub fn find_all(&self, tree: &Tree, root: NodeId) -> Vec<NodeId> {
        tree.descendants(root)
            .into_iter()
            .filter(|&node| self.matches(tree, node))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse::parse_fragment;

    fn tree_of(html: &str) -> (Tree, NodeId) {
        let mut tree = Tree::default();
        let root = tree.create_fragment();
        for node in parse_fragment(&mut tree, html).unwrap() {
            tree.append_child(root, node);
        }
        (tree, root)
    }

    #[test]
    fn test_id_tag_and_class() {
        let (tree, root) = tree_of("<div id=\"a\" class=\"x y\"><canvas></canvas></div>");
        let div = Selector::parse("#a").unwrap().find(&tree, root).unwrap();
        assert_eq!(tree.tag(div), Some("div"));
        assert!(Selector::parse("div.y#a").unwrap().matches(&tree, div));
        assert!(!Selector::parse("div.z").unwrap().matches(&tree, div));
        assert!(Selector::parse("canvas").unwrap().find(&tree, root).is_some());
    }

    #[test]
    fn test_attribute_selectors() {
        let (tree, root) = tree_of("<p slot=\"title\">a</p><p>b</p><p slot=\"title\">c</p>");
        assert_eq!(Selector::parse("[slot=\"title\"]").unwrap().find_all(&tree, root).len(), 2);
        assert_eq!(Selector::parse("p[slot]").unwrap().find_all(&tree, root).len(), 2);
    }

    #[test]
    fn test_unsupported_syntax() {
        assert!(Selector::parse("div > p").is_none());
        assert!(Selector::parse("").is_none());
        assert!(Selector::parse("#").is_none());
    }
}
