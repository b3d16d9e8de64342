/// Access log line matching and typed field extraction
///
/// A log dialect is declared as data: a [`FormatDefinition`] lists the
/// line shapes it can recognize, each shape a whole-line pattern whose
/// capture groups map one-to-one onto typed fields. Parsing a line finds
/// the first shape that matches and converts every captured token into a
/// [`Value`].
///
/// # Architecture
///
/// - `shape.rs`: Line shapes and format definitions, with schema checks
/// - `matcher.rs`: Structural matching of a line against a definition
/// - `convert.rs`: Semantic field types and token conversion
/// - `timestamp.rs`: Timestamp layouts and the canonical encoding
/// - `assemble.rs`: Building request records from a structural match
/// - `line_parser.rs`: The per-line entry point
/// - `detector.rs`: Auto-detection over a sample of lines
/// - `formats/`: Built-in haproxy and apache dialects
/// - `metrics.rs`: Parsing counters
///
/// # Guarantees
///
/// - A malformed field never rejects the line: it becomes absent and is
///   reported as an anomaly
/// - A line no shape recognizes is returned verbatim
/// - Line size limits (oversized lines are never matched)

pub mod assemble;
pub mod convert;
pub mod detector;
pub mod formats;
pub mod line_parser;
pub mod matcher;
pub mod metrics;
pub mod model;
pub mod shape;
pub mod timestamp;
mod serde_utils;

// Re-export commonly used types
pub use convert::{EmptyList, FieldType};
pub use detector::{DetectionResult, FormatDetector};
pub use formats::BuiltinFormat;
pub use line_parser::LineParser;
pub use model::{ConversionError, ParseOutcome, Request, SchemaError, Value};
pub use shape::{FormatDefinition, LineShape};
pub use timestamp::TimestampLayout;

// Constants
pub const MAX_LINE_SIZE: usize = 1_048_576; // 1MB
pub const DETECTION_SAMPLE_SIZE: usize = 5; // Lines to sample for detection
pub const HIGH_CONFIDENCE_THRESHOLD: f32 = 0.95;
pub const MEDIUM_CONFIDENCE_THRESHOLD: f32 = 0.70;
