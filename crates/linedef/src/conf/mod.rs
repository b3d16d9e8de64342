//! Conf module: parser configuration model and loading.

pub mod model;
pub mod load;

pub use model::{FormatSelection, ParserConfig};
