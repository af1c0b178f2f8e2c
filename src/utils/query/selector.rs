use super::projection::{Attribute, Projection, Step};
use crate::error::{Error, Result};
use crate::utils::changelog::HeadingKind;

/// one element of a compiled selector, matching headings of a single kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryNode {
    pub kind: HeadingKind,
    /// positional index among the siblings, releases only
    pub index: Option<usize>,
    /// the node contributes a collection of values, `name[]`
    pub collection: bool,
    pub enter: Projection,
    pub exit: Projection,
    occurrences: usize,
    opened: bool,
}

impl QueryNode {
    pub fn new(kind: HeadingKind) -> Self {
        Self {
            kind,
            index: None,
            collection: false,
            enter: Projection::default(),
            exit: Projection::default(),
            occurrences: 0,
            opened: false,
        }
    }

    pub(crate) fn reset(&mut self) {
        self.occurrences = 0;
    }

    /// count one more occurrence of the node's kind, true when it is the
    /// one the index asks for
    pub(crate) fn select(&mut self) -> bool {
        match self.index {
            None => true,
            Some(index) => {
                let selected = self.occurrences == index;
                self.occurrences += 1;
                selected
            }
        }
    }

    pub(crate) fn is_opened(&self) -> bool {
        self.opened
    }

    pub(crate) fn set_opened(&mut self, opened: bool) {
        self.opened = opened;
    }
}

/// a dotted selector such as `releases[1].changes[].title`, compiled into a
/// chain of query nodes starting at the introduction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    nodes: Vec<QueryNode>,
}

#[derive(Debug, PartialEq, Eq)]
struct Element<'q> {
    name: &'q str,
    selector: Option<&'q str>,
    recursive: bool,
}

impl Element<'_> {
    fn is_scalar(&self) -> bool {
        self.selector.is_none()
    }
}

#[derive(Debug, Clone, Copy)]
enum Expected {
    Scalar(Attribute),
    Collection(HeadingKind),
}

// attributes each kind of heading exposes to the query language
fn expected(kind: HeadingKind, name: &str) -> Option<Expected> {
    use Expected::{Collection, Scalar};
    match (kind, name) {
        (HeadingKind::Introduction, "title") => Some(Scalar(Attribute::Title)),
        (HeadingKind::Introduction, "releases") => Some(Collection(HeadingKind::Release)),
        (HeadingKind::Release, "title") => Some(Scalar(Attribute::Title)),
        (HeadingKind::Release, "date") => Some(Scalar(Attribute::Date)),
        (HeadingKind::Release, "label") => Some(Scalar(Attribute::Label)),
        (HeadingKind::Release, "status") => Some(Scalar(Attribute::Status)),
        (HeadingKind::Release, "version") => Some(Scalar(Attribute::Version)),
        (HeadingKind::Release, "changes") => Some(Collection(HeadingKind::Change)),
        (HeadingKind::Change, "title") => Some(Scalar(Attribute::Title)),
        (HeadingKind::Change, "descriptions") => {
            Some(Collection(HeadingKind::ChangeDescription))
        }
        _ => None,
    }
}

fn parse_element(element: &str) -> Result<Element<'_>> {
    let open = element.find('[');
    let close = element.find(']');
    match (open, close) {
        (Some(open), Some(close)) if open < close => {
            let rest = &element[close + 1..];
            let recursive = match rest {
                "" => false,
                "/" => true,
                _ => {
                    return Err(Error::query(format!(
                        "unexpected {:?} after the closing bracket in {:?}",
                        rest, element
                    )));
                }
            };
            Ok(Element {
                name: &element[..open],
                selector: Some(&element[open + 1..close]),
                recursive,
            })
        }
        (Some(_), _) => Err(Error::query(format!(
            "missing closing bracket in {:?}",
            element
        ))),
        (None, Some(_)) => Err(Error::query(format!(
            "missing opening bracket in {:?}",
            element
        ))),
        (None, None) if element.ends_with('/') => Err(Error::query(format!(
            "recursion '/' not supported for scalar {:?}",
            element
        ))),
        (None, None) => Ok(Element {
            name: element,
            selector: None,
            recursive: false,
        }),
    }
}

fn parse_index(kind: HeadingKind, selector: &str) -> Result<Option<usize>> {
    if selector.is_empty() {
        return Ok(None);
    }
    if kind != HeadingKind::Release {
        return Err(Error::query(format!(
            "{} selector {:?} not supported",
            kind, selector
        )));
    }
    selector
        .parse::<usize>()
        .map(Some)
        .map_err(|source| Error::QueryIndexError {
            selector: selector.to_string(),
            source,
        })
}

// the projection of a collection element named without any attribute
fn default_projection(nodes: &mut Vec<QueryNode>, kind: HeadingKind, recursive: bool) {
    let steps = match kind {
        HeadingKind::Introduction => vec![Step::Field(Attribute::Title)],
        HeadingKind::Release => vec![
            Step::Field(Attribute::Title),
            Step::Field(Attribute::Version),
            Step::Field(Attribute::Date),
            Step::Field(Attribute::Label),
        ],
        HeadingKind::Change => vec![Step::Field(Attribute::Title)],
        HeadingKind::ChangeDescription => vec![Step::Set(Attribute::Title)],
    };
    if let Some(node) = nodes.last_mut() {
        node.enter = Projection::new(steps);
    }
    if !recursive {
        return;
    }

    let child = match kind {
        HeadingKind::Release => (HeadingKind::Change, "changes"),
        HeadingKind::Change => (HeadingKind::ChangeDescription, "descriptions"),
        _ => return,
    };
    if let Some(node) = nodes.last_mut() {
        node.enter.push(Step::Array(child.1));
    }
    nodes.push(QueryNode::new(child.0));
    default_projection(nodes, child.0, true);
}

impl Selector {
    /// compile `query`; the empty query compiles to an empty chain
    pub fn parse(query: &str) -> Result<Self> {
        if query.is_empty() {
            return Ok(Self::default());
        }

        let mut nodes = vec![QueryNode::new(HeadingKind::Introduction)];
        let mut kind = HeadingKind::Introduction;
        let mut elements = query.split('.').peekable();
        while let Some(raw) = elements.next() {
            let element = parse_element(raw)?;
            let last = elements.peek().is_none();
            let Some(expected) = expected(kind, element.name) else {
                return Err(Error::query(format!(
                    "query attribute not recognized {:?} for a {:?}",
                    element.name,
                    kind.to_string()
                )));
            };

            match expected {
                Expected::Scalar(attribute) => {
                    if !element.is_scalar() {
                        return Err(Error::query(format!(
                            "{:?} is a scalar attribute",
                            element.name
                        )));
                    }
                    if !last {
                        return Err(Error::query(format!(
                            "no further query element allowed after {:?}",
                            element.name
                        )));
                    }
                    if let Some(node) = nodes.last_mut() {
                        node.enter = Projection::new(vec![Step::Set(attribute)]);
                    }
                }
                Expected::Collection(child) => {
                    let Some(selector) = element.selector else {
                        return Err(Error::query(format!(
                            "{:?} is a collection attribute",
                            element.name
                        )));
                    };
                    if element.recursive && !last {
                        return Err(Error::query(format!(
                            "recursion '/' only supported on the last query element, not on {:?}",
                            raw
                        )));
                    }
                    let mut node = QueryNode::new(child);
                    node.index = parse_index(child, selector)?;
                    node.collection = selector.is_empty();
                    nodes.push(node);
                    if last {
                        default_projection(&mut nodes, child, element.recursive);
                    }
                    kind = child;
                }
            }
        }

        tracing::debug!("compiled query {:?} into {} nodes", query, nodes.len());
        Ok(Self { nodes })
    }

    pub fn nodes(&self) -> &[QueryNode] {
        &self.nodes
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [QueryNode] {
        &mut self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// true when the result is a collection of values
    pub fn is_collection(&self) -> bool {
        self.nodes.iter().any(|node| node.collection)
    }
}
