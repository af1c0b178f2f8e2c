// changelog query language

pub mod engine;
pub mod projection;
pub mod selector;

pub use engine::QueryEngine;
pub use projection::{Attribute, Projection, Step};
pub use selector::{QueryNode, Selector};
