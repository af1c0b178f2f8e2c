use super::selector::Selector;
use crate::error::Result;
use crate::utils::changelog::{Heading, Listener};
use crate::utils::output::{OutputFormat, ResultSink};

/// evaluates a compiled selector against the enter/exit stream of a changelog
pub struct QueryEngine {
    selector: Selector,
    current: usize,
    sink: Box<dyn ResultSink>,
}

impl QueryEngine {
    pub fn new(selector: Selector, mut sink: Box<dyn ResultSink>) -> Self {
        if selector.is_collection() {
            sink.set_collection();
        }
        Self {
            selector,
            current: 0,
            sink,
        }
    }

    /// compile `query` and pair it with a fresh sink for `format`
    pub fn parse(query: &str, format: OutputFormat) -> Result<Self> {
        Ok(Self::new(Selector::parse(query)?, format.sink()))
    }

    /// an engine without a query is a no-op and can be skipped
    pub fn has_query(&self) -> bool {
        !self.selector.is_empty()
    }

    pub fn result(&self) -> String {
        self.sink.result()
    }

    // nearest node at or before the cursor that accepts the heading's kind
    fn locate(&self, heading: &Heading) -> Option<usize> {
        let nodes = self.selector.nodes();
        if nodes.is_empty() {
            return None;
        }
        let start = self.current.min(nodes.len() - 1);
        (0..=start).rev().find(|&i| nodes[i].kind == heading.kind())
    }
}

impl Listener for QueryEngine {
    fn enter(&mut self, heading: &Heading) {
        let Some(index) = self.locate(heading) else {
            return;
        };
        self.current = index;

        let nodes = self.selector.nodes_mut();
        let node = &mut nodes[index];
        if !node.select() {
            return;
        }
        if !node.enter.is_empty() {
            self.sink.open(heading.kind());
            node.enter.apply(self.sink.as_mut(), heading);
            node.set_opened(true);
        }

        if index + 1 < nodes.len() {
            self.current = index + 1;
            nodes[index + 1].reset();
        }
    }

    fn exit(&mut self, heading: &Heading) {
        let Some(index) = self.locate(heading) else {
            return;
        };
        self.current = index;

        let node = &mut self.selector.nodes_mut()[index];
        if !node.is_opened() && node.exit.is_empty() {
            return;
        }
        if !node.is_opened() {
            self.sink.open(heading.kind());
        }
        node.exit.apply(self.sink.as_mut(), heading);
        self.sink.close(heading.kind());
        node.set_opened(false);
    }
}
