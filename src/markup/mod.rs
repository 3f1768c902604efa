//! A small, forgiving HTML tree.
//!
//! Pages from the two sources are parsed into an arena of nodes and queried
//! by tag, attribute, class or text pattern. Nesting follows the tags as
//! written: apart from void elements nothing is closed implicitly, and a
//! stray end tag without a matching open element is ignored.

pub mod entities;

use regex::Regex;

pub use entities::decode_entities;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

const ROOT: usize = 0;

#[derive(Debug)]
enum NodeData {
    Root,
    Element { name: String, attrs: Vec<(String, String)> },
    Text(String),
}

#[derive(Debug)]
struct Node {
    parent: Option<usize>,
    children: Vec<usize>,
    data: NodeData,
}

#[derive(Debug)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    pub fn parse(html: &str) -> Self {
        Parser::new(html).run()
    }

    pub fn root(&self) -> Element<'_> {
        Element { doc: self, id: ROOT }
    }

    fn push(&mut self, parent: usize, data: NodeData) -> usize {
        let id = self.nodes.len();
        self.nodes.push(Node { parent: Some(parent), children: Vec::new(), data });
        self.nodes[parent].children.push(id);
        id
    }

    fn is_element_named(&self, id: usize, tag: &str) -> bool {
        matches!(&self.nodes[id].data, NodeData::Element { name, .. } if name == tag)
    }

    /// Appends every text node under `id` in document order. Walks an
    /// explicit stack since unclosed tags can nest arbitrarily deep.
    fn collect_text(&self, id: usize, out: &mut String) {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            match &node.data {
                NodeData::Text(text) => out.push_str(text),
                _ => stack.extend(node.children.iter().rev()),
            }
        }
    }
}

/// A borrowed handle to an element (or the document root).
#[derive(Debug, Clone, Copy)]
pub struct Element<'a> {
    doc: &'a Document,
    id: usize,
}

impl<'a> Element<'a> {
    /// Lowercase tag name; empty for the document root.
    pub fn name(&self) -> &'a str {
        match &self.doc.nodes[self.id].data {
            NodeData::Element { name, .. } => name,
            _ => "",
        }
    }

    pub fn attr(&self, key: &str) -> Option<&'a str> {
        match &self.doc.nodes[self.id].data {
            NodeData::Element { attrs, .. } => {
                attrs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
            }
            _ => None,
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class").is_some_and(|value| value.split_whitespace().any(|c| c == class))
    }

    /// True when every class in `classes` is present.
    pub fn has_classes(&self, classes: &[&str]) -> bool {
        classes.iter().all(|class| self.has_class(class))
    }

    /// Concatenated text of every descendant text node.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.doc.collect_text(self.id, &mut out);
        out
    }

    /// Descendant elements in document order.
    pub fn descendants(&self) -> Descendants<'a> {
        let mut stack = self.doc.nodes[self.id].children.clone();
        stack.reverse();
        Descendants { doc: self.doc, stack }
    }

    pub fn find<P>(&self, predicate: P) -> Option<Element<'a>>
    where
        P: Fn(&Element<'a>) -> bool,
    {
        self.descendants().find(|el| predicate(el))
    }

    pub fn find_all<P>(&self, predicate: P) -> impl Iterator<Item = Element<'a>>
    where
        P: Fn(&Element<'a>) -> bool,
    {
        self.descendants().filter(move |el| predicate(el))
    }

    pub fn find_tag(&self, tag: &'a str) -> impl Iterator<Item = Element<'a>> {
        self.find_all(move |el| el.name() == tag)
    }

    pub fn find_class(&self, class: &str) -> Option<Element<'a>> {
        self.find(|el| el.has_class(class))
    }

    pub fn find_id(&self, id: &str) -> Option<Element<'a>> {
        self.find(|el| el.attr("id") == Some(id))
    }

    /// Parent element of the first descendant text node matching `pattern`.
    pub fn find_text_parent(&self, pattern: &Regex) -> Option<Element<'a>> {
        let mut stack = vec![self.id];
        while let Some(id) = stack.pop() {
            let node = &self.doc.nodes[id];
            if let NodeData::Text(text) = &node.data {
                if pattern.is_match(text) {
                    return node.parent.map(|parent| Element { doc: self.doc, id: parent });
                }
            }
            stack.extend(node.children.iter().rev());
        }
        None
    }

    /// Text of the next sibling node, skipping whitespace-only text.
    pub fn next_sibling_text(&self) -> Option<String> {
        let parent = self.doc.nodes[self.id].parent?;
        let siblings = &self.doc.nodes[parent].children;
        let position = siblings.iter().position(|&id| id == self.id)?;

        siblings[position + 1..]
            .iter()
            .map(|&id| {
                let mut out = String::new();
                self.doc.collect_text(id, &mut out);
                (id, out)
            })
            .find(|(id, text)| {
                !matches!(self.doc.nodes[*id].data, NodeData::Text(_)) || !text.trim().is_empty()
            })
            .map(|(_, text)| text)
    }
}

pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<usize>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = Element<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            let node = &self.doc.nodes[id];
            self.stack.extend(node.children.iter().rev());
            if matches!(node.data, NodeData::Element { .. }) {
                return Some(Element { doc: self.doc, id });
            }
        }
        None
    }
}

struct StartTag {
    name: String,
    attrs: Vec<(String, String)>,
    self_closing: bool,
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    doc: Document,
    open: Vec<usize>,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        let root = Node { parent: None, children: Vec::new(), data: NodeData::Root };
        Self { src, pos: 0, doc: Document { nodes: vec![root] }, open: vec![ROOT] }
    }

    fn run(mut self) -> Document {
        while self.pos < self.src.len() {
            let rest = &self.src[self.pos..];
            if rest.starts_with("<!--") {
                self.pos += rest.find("-->").map_or(rest.len(), |i| i + 3);
            } else if rest.starts_with("</") {
                self.end_tag();
            } else if rest.starts_with("<!") || rest.starts_with("<?") {
                self.pos += rest.find('>').map_or(rest.len(), |i| i + 1);
            } else if rest.starts_with('<')
                && rest[1..].starts_with(|c: char| c.is_ascii_alphabetic())
            {
                self.start_tag();
            } else {
                self.text();
            }
        }
        self.doc
    }

    fn current(&self) -> usize {
        self.open.last().copied().unwrap_or(ROOT)
    }

    fn text(&mut self) {
        let rest = &self.src[self.pos..];
        // A '<' that does not open a tag is plain text
        let end = rest
            .char_indices()
            .skip(1)
            .find(|&(_, c)| c == '<')
            .map_or(rest.len(), |(i, _)| i);
        let text = decode_entities(&rest[..end]).into_owned();
        let parent = self.current();
        self.doc.push(parent, NodeData::Text(text));
        self.pos += end;
    }

    fn end_tag(&mut self) {
        let rest = &self.src[self.pos..];
        let end = rest.find('>').map_or(rest.len(), |i| i + 1);
        let name: String = rest[2..]
            .chars()
            .take_while(|c| !c.is_whitespace() && *c != '>' && *c != '/')
            .collect::<String>()
            .to_ascii_lowercase();
        self.pos += end;

        if let Some(depth) = self.open.iter().rposition(|&id| self.doc.is_element_named(id, &name))
        {
            self.open.truncate(depth);
        }
    }

    fn start_tag(&mut self) {
        let tag = self.read_start_tag();
        let parent = self.current();
        let name = tag.name.clone();
        let id = self.doc.push(parent, NodeData::Element { name: tag.name, attrs: tag.attrs });

        if RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
            self.skip_raw_text(&name);
        } else if !tag.self_closing && !VOID_ELEMENTS.contains(&name.as_str()) {
            self.open.push(id);
        }
    }

    fn skip_raw_text(&mut self, name: &str) {
        let closing = format!("</{name}");
        let rest = &self.src[self.pos..];
        let lower = rest.to_ascii_lowercase();
        self.pos += match lower.find(&closing) {
            Some(start) => rest[start..].find('>').map_or(rest.len(), |i| start + i + 1),
            None => rest.len(),
        };
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat_while(&mut self, keep: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !keep(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        let src = self.src;
        &src[start..self.pos]
    }

    fn skip_ws(&mut self) {
        self.eat_while(char::is_whitespace);
    }

    fn read_start_tag(&mut self) -> StartTag {
        self.bump(); // '<'
        let name = self
            .eat_while(|c| !c.is_whitespace() && c != '>' && c != '/')
            .to_ascii_lowercase();
        let mut attrs = Vec::new();
        let mut self_closing = false;

        loop {
            self.skip_ws();
            match self.peek() {
                None => break,
                Some('>') => {
                    self.bump();
                    break;
                }
                Some('/') => {
                    self.bump();
                    if self.peek() == Some('>') {
                        self.bump();
                        self_closing = true;
                        break;
                    }
                }
                Some(_) => {
                    let key = self
                        .eat_while(|c| !c.is_whitespace() && c != '=' && c != '>' && c != '/')
                        .to_ascii_lowercase();
                    self.skip_ws();
                    let value = if self.peek() == Some('=') {
                        self.bump();
                        self.skip_ws();
                        self.read_attr_value()
                    } else {
                        String::new()
                    };
                    if key.is_empty() {
                        // Unparseable byte, skip it rather than loop forever
                        self.bump();
                    } else {
                        attrs.push((key, value));
                    }
                }
            }
        }

        StartTag { name, attrs, self_closing }
    }

    fn read_attr_value(&mut self) -> String {
        let raw = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.bump();
                let value = self.eat_while(|c| c != quote);
                self.bump();
                value
            }
            _ => self.eat_while(|c| !c.is_whitespace() && c != '>'),
        };
        decode_entities(raw).into_owned()
    }
}
