use super::format::ResultSink;
use crate::utils::changelog::HeadingKind;

/// builds a markdown representation of the query result, one line per
/// value, prefixed according to the kind of heading it comes from
#[derive(Debug, Default)]
pub struct MarkdownCollector {
    result: String,
    prefix: &'static str,
}

fn line_start(kind: HeadingKind) -> &'static str {
    match kind {
        HeadingKind::Introduction => "# ",
        HeadingKind::Release => "## ",
        HeadingKind::Change => "### ",
        HeadingKind::ChangeDescription => "- ",
    }
}

impl MarkdownCollector {
    fn line(&mut self, value: &str) {
        self.result.push_str(self.prefix);
        self.result.push_str(value);
        self.result.push('\n');
        self.prefix = "";
    }
}

impl ResultSink for MarkdownCollector {
    fn open(&mut self, kind: HeadingKind) {
        self.prefix = line_start(kind);
    }

    fn close(&mut self, _kind: HeadingKind) {}

    fn set_collection(&mut self) {}

    // values missing from the heading leave no line
    fn set(&mut self, value: &str) {
        if !value.is_empty() {
            self.line(value);
        }
    }

    // only titles make it to the markdown output
    fn set_field(&mut self, name: &str, value: &str) {
        if name == "title" {
            self.line(value);
        }
    }

    fn array(&mut self, _name: &str) {}

    fn result(&self) -> String {
        self.result
            .strip_suffix('\n')
            .unwrap_or(&self.result)
            .to_string()
    }
}
