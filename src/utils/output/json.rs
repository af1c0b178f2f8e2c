use super::format::ResultSink;
use crate::utils::changelog::HeadingKind;
use serde_json::{Map, Value};

#[derive(Debug)]
struct Frame {
    kind: HeadingKind,
    scalar: Option<String>,
    fields: Option<Map<String, Value>>,
    array_field: Option<String>,
}

impl Frame {
    fn new(kind: HeadingKind) -> Self {
        Self {
            kind,
            scalar: None,
            fields: None,
            array_field: None,
        }
    }

    fn fields(&mut self) -> &mut Map<String, Value> {
        self.fields.get_or_insert_with(Map::new)
    }

    // fields win over a scalar set on the same heading
    fn into_value(self) -> Option<Value> {
        match (self.fields, self.scalar) {
            (Some(fields), _) => Some(Value::Object(fields)),
            (None, Some(scalar)) => Some(Value::String(scalar)),
            (None, None) => None,
        }
    }
}

/// builds a json representation of the query result
///
/// a scalar result is returned without quotes so it can be used as is in
/// scripts, objects and arrays are returned as compact json.
#[derive(Debug, Default)]
pub struct JsonCollector {
    frames: Vec<Frame>,
    results: Vec<Value>,
    collection: bool,
}

impl ResultSink for JsonCollector {
    fn open(&mut self, kind: HeadingKind) {
        self.frames.push(Frame::new(kind));
    }

    fn close(&mut self, kind: HeadingKind) {
        let Some(frame) = self.frames.pop() else {
            return;
        };
        debug_assert_eq!(frame.kind, kind);
        let Some(value) = frame.into_value() else {
            return;
        };

        match self.frames.last_mut() {
            None => self.results.push(value),
            Some(parent) => {
                if let Some(field) = parent.array_field.clone()
                    && let Some(Value::Array(items)) = parent.fields().get_mut(&field)
                {
                    items.push(value);
                }
            }
        }
    }

    fn set_collection(&mut self) {
        self.collection = true;
    }

    fn set(&mut self, value: &str) {
        if let Some(frame) = self.frames.last_mut() {
            frame.scalar = Some(value.to_string());
        }
    }

    fn set_field(&mut self, name: &str, value: &str) {
        if let Some(frame) = self.frames.last_mut() {
            frame
                .fields()
                .insert(name.to_string(), Value::String(value.to_string()));
        }
    }

    fn array(&mut self, name: &str) {
        if let Some(frame) = self.frames.last_mut() {
            frame
                .fields()
                .insert(name.to_string(), Value::Array(Vec::new()));
            frame.array_field = Some(name.to_string());
        }
    }

    fn result(&self) -> String {
        if self.collection {
            return Value::Array(self.results.clone()).to_string();
        }
        match self.results.first() {
            None => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(value) => value.to_string(),
        }
    }
}
