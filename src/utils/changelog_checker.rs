use crate::error::{Error, Result};
use crate::utils::changelog::{ChangeKind, TracingListener};
use crate::utils::markdown::walk;
use crate::utils::output::OutputFormat;
use crate::utils::query::{QueryEngine, Selector};
use crate::utils::validator::{Validator, ValidatorOptions};
use std::path::Path;

/// validates changelog documents and evaluates a query against them
///
/// the registry and the compiled query are shared by every document
/// checked; each document gets its own tracker, validator and query engine.
#[derive(Debug, Clone)]
pub struct ChangelogChecker<'a> {
    change_kind: &'a ChangeKind,
    options: ValidatorOptions,
    output: OutputFormat,
    selector: Selector,
}

impl<'a> ChangelogChecker<'a> {
    pub fn new(change_kind: &'a ChangeKind) -> Self {
        Self {
            change_kind,
            options: ValidatorOptions::default(),
            output: OutputFormat::default(),
            selector: Selector::default(),
        }
    }

    pub fn release(mut self, release: bool) -> Self {
        self.options.release = release;
        self
    }

    pub fn output(mut self, output: OutputFormat) -> Self {
        self.output = output;
        self
    }

    /// compile the query; an empty query only validates
    pub fn query(mut self, query: &str) -> Result<Self> {
        self.selector = Selector::parse(query)?;
        Ok(self)
    }

    pub fn has_query(&self) -> bool {
        !self.selector.is_empty()
    }

    /// validate `source`, returning the query result
    pub fn check(&self, source: &str) -> Result<String> {
        let mut engine = QueryEngine::new(self.selector.clone(), self.output.sink());
        let mut tracing_listener = TracingListener;
        {
            let mut validator = Validator::new(self.change_kind).options(self.options);
            validator.listener(&mut tracing_listener);
            if engine.has_query() {
                validator.listener(&mut engine);
            }
            walk(source, &mut validator)?;
        }
        Ok(engine.result())
    }

    pub fn check_file<P: AsRef<Path>>(&self, path: P) -> Result<String> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| Error::FileReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        tracing::debug!("checking {}", path.display());
        self.check(&source)
    }
}
