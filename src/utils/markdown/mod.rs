// markdown document walker

pub mod walker;

pub use walker::{DocumentHandler, walk};
