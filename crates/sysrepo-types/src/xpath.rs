//! XPath splitting for change values.
//!
//! Only the subset sysrepo reports in change notifications is understood:
//! absolute paths made of `[ns:]name` steps, each followed by zero or more
//! key predicates `[key='value']` or `[key="value"]`.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{TypesError, TypesResult};

/// One step of an xpath.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XPathNode {
    /// Module namespace prefix, if the step carried one.
    pub ns: Option<String>,
    /// Node name.
    pub name: String,
    /// Key predicates.
    pub attrs: BTreeMap<String, String>,
}

impl XPathNode {
    /// Creates a node.
    pub fn new(ns: Option<String>, name: impl Into<String>, attrs: BTreeMap<String, String>) -> Self {
        Self {
            ns,
            name: name.into(),
            attrs,
        }
    }

    /// Returns `ns:name`, or just `name` without a namespace.
    pub fn node_name(&self) -> String {
        match &self.ns {
            Some(ns) => format!("{}:{}", ns, self.name),
            None => self.name.clone(),
        }
    }

    /// Returns the key value for `name`, or `default` if absent.
    pub fn attr<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.attrs.get(name).map(String::as_str).unwrap_or(default)
    }
}

impl fmt::Display for XPathNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.node_name())?;
        for (key, value) in &self.attrs {
            write!(f, "[{}='{}']", key, value)?;
        }
        Ok(())
    }
}

/// Splits `ns:name` into its namespace and name.
pub fn parse_xpath_name(s: &str) -> (Option<String>, String) {
    match s.split_once(':') {
        Some((ns, name)) => (Some(ns.to_string()), name.to_string()),
        None => (None, s.to_string()),
    }
}

/// Parses an xpath into its steps.
pub fn parse_xpath(xpath: &str) -> TypesResult<Vec<XPathNode>> {
    split_steps(xpath)?
        .into_iter()
        .filter(|step| !step.trim().is_empty())
        .map(|step| parse_step(xpath, step))
        .collect()
}

/// Splits on `/` outside predicates and quoted values.
fn split_steps(xpath: &str) -> TypesResult<Vec<&str>> {
    let mut steps = Vec::new();
    let mut start = 0;
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for (i, c) in xpath.char_indices() {
        match quote {
            Some(q) => {
                if c == q {
                    quote = None;
                }
            }
            None => match c {
                '\'' | '"' if depth > 0 => quote = Some(c),
                '[' => depth += 1,
                ']' => {
                    depth = depth
                        .checked_sub(1)
                        .ok_or_else(|| TypesError::invalid_xpath(xpath, "unbalanced ']'"))?;
                }
                '/' if depth == 0 => {
                    steps.push(&xpath[start..i]);
                    start = i + 1;
                }
                _ => {}
            },
        }
    }

    if quote.is_some() {
        return Err(TypesError::invalid_xpath(xpath, "unterminated quote"));
    }
    if depth != 0 {
        return Err(TypesError::invalid_xpath(xpath, "unterminated predicate"));
    }
    steps.push(&xpath[start..]);
    Ok(steps)
}

fn parse_step(xpath: &str, step: &str) -> TypesResult<XPathNode> {
    let (head, mut rest) = match step.find('[') {
        Some(idx) => step.split_at(idx),
        None => (step, ""),
    };

    let (ns, name) = parse_xpath_name(head.trim());
    if name.is_empty() {
        return Err(TypesError::invalid_xpath(xpath, "empty node name"));
    }

    let mut attrs = BTreeMap::new();
    while !rest.is_empty() {
        let body = rest
            .trim_start()
            .strip_prefix('[')
            .ok_or_else(|| TypesError::invalid_xpath(xpath, "expected '['"))?;

        let close = body.find(']').unwrap_or(body.len());
        let eq = match body.find('=') {
            Some(eq) if eq < close => eq,
            _ => return Err(TypesError::invalid_xpath(xpath, "predicate without '='")),
        };

        let key = body[..eq].trim();
        if key.is_empty() {
            return Err(TypesError::invalid_xpath(xpath, "empty predicate key"));
        }

        let after = body[eq + 1..].trim_start();
        let (value, tail) = match after.chars().next() {
            Some(q @ ('\'' | '"')) => {
                let inner = &after[1..];
                let end = inner
                    .find(q)
                    .ok_or_else(|| TypesError::invalid_xpath(xpath, "unterminated quote"))?;
                (&inner[..end], inner[end + 1..].trim_start())
            }
            _ => {
                let end = after
                    .find(']')
                    .ok_or_else(|| TypesError::invalid_xpath(xpath, "unterminated predicate"))?;
                (after[..end].trim(), &after[end..])
            }
        };

        rest = tail
            .strip_prefix(']')
            .ok_or_else(|| TypesError::invalid_xpath(xpath, "expected ']'"))?;
        attrs.insert(key.to_string(), value.to_string());
    }

    Ok(XPathNode::new(ns, name, attrs))
}

/// Returns the node names without namespaces.
pub fn node_names(nodes: &[XPathNode]) -> Vec<&str> {
    nodes.iter().map(|node| node.name.as_str()).collect()
}

/// Returns the node names with namespaces where present.
pub fn node_names_with_ns(nodes: &[XPathNode]) -> Vec<String> {
    nodes.iter().map(XPathNode::node_name).collect()
}

/// Builds `/a/b/c` from the node names, dropping namespaces and keys.
pub fn xpath_from_nodes(nodes: &[XPathNode]) -> String {
    format!("/{}", node_names(nodes).join("/"))
}

/// Builds `/ns:a/b/c`, keeping namespaces but dropping keys.
pub fn xpath_from_nodes_with_ns(nodes: &[XPathNode]) -> String {
    format!("/{}", node_names_with_ns(nodes).join("/"))
}

/// Finds the first node named `name` at or after `start`.
pub fn index_of_node(name: &str, nodes: &[XPathNode], start: usize) -> Option<usize> {
    nodes
        .iter()
        .enumerate()
        .skip(start)
        .find(|(_, node)| node.name == name)
        .map(|(idx, _)| idx)
}

/// Finds the first node matching both `ns` and `name` at or after `start`.
pub fn index_of_node_with_ns(
    ns: Option<&str>,
    name: &str,
    nodes: &[XPathNode],
    start: usize,
) -> Option<usize> {
    nodes
        .iter()
        .enumerate()
        .skip(start)
        .find(|(_, node)| node.name == name && node.ns.as_deref() == ns)
        .map(|(idx, _)| idx)
}
