use regex::Regex;
use std::fmt::{Display, Formatter, Write};
use std::sync::LazyLock;
use strum_macros::Display as StrumDisplay;

/// A named tree of scalar key/value pairs with a human-readable text form.
///
/// Values keep their insertion order and keys may repeat. Child nodes are
/// kept in insertion order as well.
///
/// ```text
/// BodyData
/// {
///     GlobalBodyData
///     {
///         inner_visible = True
///         index = 3
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigNode {
    /// Name of the node, empty for a parsed root.
    name: String,
    /// Scalar entries in insertion order.
    values: Vec<(String, String)>,
    /// Child nodes in insertion order.
    nodes: Vec<ConfigNode>,
}

/// Errors produced while reading persisted text or values.
#[derive(Debug, StrumDisplay, Clone, PartialEq, Eq)]
pub enum PersistenceFormatError {
    /// A closing brace without an open node, or a node left open at the end of input.
    #[strum(to_string = "unbalanced brace on line {0}")]
    UnbalancedBrace(usize),
    /// An opening brace that does not follow a node name.
    #[strum(to_string = "opening brace without node name on line {0}")]
    MissingNodeName(usize),
    /// A line that is neither a value, a node name nor a brace.
    #[strum(to_string = "unexpected content on line {0}")]
    UnexpectedLine(usize),
    /// A value that is present but cannot be read as the requested type.
    #[strum(to_string = "malformed value for key {0}")]
    MalformedValue(String),
}

impl std::error::Error for PersistenceFormatError {}

/// Conversion between scalar types and their text representation inside a [`ConfigNode`].
pub trait NodeValue: Sized {
    fn from_node_value(raw: &str) -> Option<Self>;
    fn to_node_value(&self) -> String;
}

impl NodeValue for bool {
    fn from_node_value(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        }
    }

    fn to_node_value(&self) -> String {
        if *self { String::from("True") } else { String::from("False") }
    }
}

impl NodeValue for String {
    fn from_node_value(raw: &str) -> Option<Self> { Some(raw.trim().to_string()) }

    fn to_node_value(&self) -> String { self.clone() }
}

macro_rules! numeric_node_value {
    ($($t:ty),*) => {
        $(
            impl NodeValue for $t {
                fn from_node_value(raw: &str) -> Option<Self> { raw.trim().parse().ok() }

                fn to_node_value(&self) -> String { self.to_string() }
            }
        )*
    };
}

numeric_node_value!(i32, i64, u32, u64, usize, f32, f64);

/// `key = value` entry.
static VALUE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^=]+?)\s*=\s*(.*)$").unwrap());
/// Start of a `//` comment: at the beginning of a line or after whitespace.
static COMMENT_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?:^|\s)//").unwrap());
/// A bare node name, optionally followed by its opening brace.
static NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z_][\w\-.]*)\s*(\{)?$").unwrap());

impl ConfigNode {
    /// Creates an empty node with the given name.
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string(), values: Vec::new(), nodes: Vec::new() }
    }

    pub fn name(&self) -> &str { &self.name }

    /// Appends a value. Existing entries with the same key are kept.
    pub fn add_value<V: NodeValue>(&mut self, key: &str, value: V) {
        self.values.push((key.to_string(), value.to_node_value()));
    }

    /// Raw text of the first value stored under `key`.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn has_value(&self, key: &str) -> bool { self.value(key).is_some() }

    /// Reads and converts the first value stored under `key`.
    ///
    /// # Returns
    /// * `Ok(None)` if the key is absent.
    /// * `Err(PersistenceFormatError::MalformedValue)` if it cannot be converted.
    pub fn read_value<V: NodeValue>(&self, key: &str) -> Result<Option<V>, PersistenceFormatError> {
        match self.value(key) {
            None => Ok(None),
            Some(raw) => V::from_node_value(raw)
                .map(Some)
                .ok_or_else(|| PersistenceFormatError::MalformedValue(key.to_string())),
        }
    }

    /// Reads a value, falling back to `default` if it is absent or malformed.
    pub fn value_or<V: NodeValue>(&self, key: &str, default: V) -> V {
        self.read_value(key).ok().flatten().unwrap_or(default)
    }

    /// Appends an empty child node and returns it for filling.
    pub fn add_node(&mut self, name: &str) -> &mut ConfigNode {
        self.nodes.push(ConfigNode::new(name));
        let last = self.nodes.len() - 1;
        &mut self.nodes[last]
    }

    /// First child node with the given name.
    pub fn node(&self, name: &str) -> Option<&ConfigNode> { self.nodes.iter().find(|n| n.name == name) }

    /// All child nodes regardless of their name.
    pub fn nodes(&self) -> &[ConfigNode] { &self.nodes }

    /// All child nodes with the given name.
    pub fn nodes_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ConfigNode> + 'a {
        self.nodes.iter().filter(move |n| n.name == name)
    }

    /// All stored key/value pairs.
    pub fn values(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parses the text form of a node's content into a nameless root node.
    ///
    /// Blank lines and `//` comments are skipped. A comment starts at `//`
    /// at the beginning of a line or after whitespace, so values may contain
    /// `//` as long as it does not follow a space. Node names may be followed
    /// by their opening brace on the same line.
    ///
    /// # Errors
    /// Returns a [`PersistenceFormatError`] carrying the 1-based line number
    /// of the first structural problem.
    pub fn parse(text: &str) -> Result<ConfigNode, PersistenceFormatError> {
        let mut stack = vec![ConfigNode::default()];
        let mut pending_name: Option<(String, usize)> = None;
        let mut last_line = 0;

        for (i, raw_line) in text.lines().enumerate() {
            let line_no = i + 1;
            last_line = line_no;
            let line = COMMENT_REGEX.find(raw_line).map_or(raw_line, |m| &raw_line[..m.start()]).trim();
            if line.is_empty() {
                continue;
            }

            if line == "{" {
                let (name, _) = pending_name.take().ok_or(PersistenceFormatError::MissingNodeName(line_no))?;
                stack.push(ConfigNode::new(&name));
                continue;
            }
            if let Some((_, name_line)) = &pending_name {
                return Err(PersistenceFormatError::UnexpectedLine(*name_line));
            }

            if line == "}" {
                if stack.len() < 2 {
                    return Err(PersistenceFormatError::UnbalancedBrace(line_no));
                }
                if let Some(done) = stack.pop() {
                    if let Some(parent) = stack.last_mut() {
                        parent.nodes.push(done);
                    }
                }
            } else if let Some(caps) = VALUE_REGEX.captures(line) {
                let key = caps[1].trim().to_string();
                let value = caps[2].trim().to_string();
                if let Some(current) = stack.last_mut() {
                    current.values.push((key, value));
                }
            } else if let Some(caps) = NAME_REGEX.captures(line) {
                let name = caps[1].to_string();
                if caps.get(2).is_some() {
                    stack.push(ConfigNode::new(&name));
                } else {
                    pending_name = Some((name, line_no));
                }
            } else {
                return Err(PersistenceFormatError::UnexpectedLine(line_no));
            }
        }

        if let Some((_, name_line)) = pending_name {
            return Err(PersistenceFormatError::UnexpectedLine(name_line));
        }
        if stack.len() != 1 {
            return Err(PersistenceFormatError::UnbalancedBrace(last_line));
        }
        Ok(stack.pop().unwrap_or_default())
    }

    /// Renders the content of this node (values, then children) without its
    /// own name and braces. This is the inverse of [`ConfigNode::parse`].
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        self.write_content(&mut out, 0);
        out
    }

    fn write_content(&self, out: &mut String, depth: usize) {
        let indent = "\t".repeat(depth);
        for (key, value) in &self.values {
            let _ = writeln!(out, "{indent}{key} = {value}");
        }
        for node in &self.nodes {
            let _ = writeln!(out, "{indent}{}", node.name);
            let _ = writeln!(out, "{indent}{{");
            node.write_content(out, depth + 1);
            let _ = writeln!(out, "{indent}}}");
        }
    }
}

impl Display for ConfigNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "{{")?;
        let mut content = String::new();
        self.write_content(&mut content, 1);
        write!(f, "{content}")?;
        writeln!(f, "}}")
    }
}
