// changelog path tracker

use super::parser::HeadingsFactory;
use super::types::{Heading, HeadingKind};
use crate::error::{Error, Result};
use std::fmt;

/// receives enter/exit notifications as sections are opened and closed
pub trait Listener {
    fn enter(&mut self, heading: &Heading);
    fn exit(&mut self, heading: &Heading);
}

/// logs every section boundary at trace level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingListener;

impl Listener for TracingListener {
    fn enter(&mut self, heading: &Heading) {
        tracing::trace!("Entering {}", heading);
    }

    fn exit(&mut self, heading: &Heading) {
        tracing::trace!("Exiting {}", heading);
    }
}

/// the sections currently open while a changelog is traversed, one per
/// depth, with the listeners notified as they change
pub struct Changelog<'a> {
    factory: HeadingsFactory<'a>,
    headings: Vec<Heading>,
    listeners: Vec<&'a mut dyn Listener>,
}

impl<'a> Changelog<'a> {
    pub fn new(factory: HeadingsFactory<'a>) -> Self {
        Self {
            factory,
            headings: Vec::new(),
            listeners: Vec::new(),
        }
    }

    /// register a listener; listeners are notified in registration order
    pub fn listener(&mut self, listener: &'a mut dyn Listener) {
        self.listeners.push(listener);
    }

    pub fn introduction(&self) -> bool {
        self.active() == Some(HeadingKind::Introduction)
    }

    pub fn release(&self) -> bool {
        self.active() == Some(HeadingKind::Release)
    }

    /// true within a change section, including its descriptions
    pub fn change(&self) -> bool {
        matches!(
            self.active(),
            Some(HeadingKind::Change | HeadingKind::ChangeDescription)
        )
    }

    pub fn depth(&self) -> usize {
        self.headings.len()
    }

    pub fn headings(&self) -> &[Heading] {
        &self.headings
    }

    fn active(&self) -> Option<HeadingKind> {
        self.headings.last().map(Heading::kind)
    }

    /// the open sections rendered as `{title}{title}...`
    pub fn path(&self) -> String {
        self.to_string()
    }

    /// open a section of the given kind
    ///
    /// the tracker can go down a single level or back up any number of
    /// levels. sections at or below the new one are exited, deepest first,
    /// before the new heading is entered.
    pub fn section(&mut self, kind: HeadingKind, title: &str) -> Result<&Heading> {
        let depth = kind.depth();
        if depth > self.headings.len() {
            return Err(Error::validation(
                format!(
                    "attempting to roll-back a changelog at {} to {}",
                    self.headings.len(),
                    kind
                ),
                self.path(),
            ));
        }

        let heading = self.factory.new_heading(kind, title)?;
        self.exit_to(depth);
        self.headings.push(heading);

        let heading = &self.headings[depth];
        for listener in self.listeners.iter_mut() {
            listener.enter(heading);
        }
        Ok(heading)
    }

    /// exit every open section, deepest first
    pub fn close(&mut self) {
        self.exit_to(0);
    }

    fn exit_to(&mut self, depth: usize) {
        while self.headings.len() > depth {
            if let Some(heading) = self.headings.pop() {
                for listener in self.listeners.iter_mut() {
                    listener.exit(&heading);
                }
            }
        }
    }
}

impl fmt::Display for Changelog<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for heading in &self.headings {
            write!(f, "{}", heading)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Changelog<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Changelog")
            .field("headings", &self.headings)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
