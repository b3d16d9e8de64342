use std::sync::Arc;
use std::time::Instant;
use super::assemble::assemble;
use super::matcher::match_line;
use super::metrics::ParsingMetrics;
use super::model::{ParseOutcome, Unmatched, UnmatchedReason};
use super::shape::FormatDefinition;
use super::MAX_LINE_SIZE;

/// Turns raw lines into request records for one format definition.
///
/// Holds no state between calls: every line is matched and converted on
/// its own, so one parser can be shared by any number of threads.
#[derive(Debug, Clone)]
pub struct LineParser {
    format: Arc<FormatDefinition>,
    max_line_size: usize,
    metrics: Option<Arc<ParsingMetrics>>,
}

impl LineParser {
    pub fn new(format: Arc<FormatDefinition>) -> Self {
        Self {
            format,
            max_line_size: MAX_LINE_SIZE,
            metrics: None,
        }
    }

    /// Lines longer than `max_line_size` bytes are reported unmatched
    /// without being examined.
    pub fn with_max_line_size(mut self, max_line_size: usize) -> Self {
        self.max_line_size = max_line_size;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<ParsingMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn format(&self) -> &FormatDefinition {
        &self.format
    }

    /// Parse one line. `line_number` is its 1-based position in the source.
    pub fn parse_next(&self, raw: &str, line_number: usize) -> ParseOutcome {
        if raw.len() > self.max_line_size {
            if let Some(metrics) = &self.metrics {
                metrics.record_too_long();
            }
            return ParseOutcome::Unmatched(Unmatched {
                line_number,
                raw: raw.to_string(),
                reason: UnmatchedReason::TooLong,
            });
        }

        let started = Instant::now();
        let outcome = match match_line(&self.format, raw) {
            Some(matched) => ParseOutcome::Request(assemble(self.format.name(), &matched, line_number)),
            None => ParseOutcome::Unmatched(Unmatched {
                line_number,
                raw: raw.to_string(),
                reason: UnmatchedReason::NoShape,
            }),
        };

        if let Some(metrics) = &self.metrics {
            let elapsed = started.elapsed().as_nanos() as u64;
            match &outcome {
                ParseOutcome::Request(r) => metrics.record_match(r.anomalies.len(), elapsed),
                ParseOutcome::Unmatched(_) => metrics.record_unmatched(elapsed),
            }
        }

        outcome
    }

    /// Parse a sequence of lines lazily, numbering them from 1.
    pub fn parse_lines<'p, I>(&'p self, lines: I) -> impl Iterator<Item = ParseOutcome> + 'p
    where
        I: IntoIterator,
        I::IntoIter: 'p,
        I::Item: AsRef<str>,
    {
        lines
            .into_iter()
            .enumerate()
            .map(move |(i, line)| self.parse_next(line.as_ref(), i + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::convert::FieldType;
    use crate::parser::shape::LineShape;

    fn parser() -> LineParser {
        let shape = LineShape::new(
            "pair",
            r"(\w+)=(\S+)",
            &[("key", FieldType::String), ("value", FieldType::Integer)],
        )
        .unwrap();
        let def = FormatDefinition::new("kv", vec![shape]).unwrap();
        LineParser::new(Arc::new(def))
    }

    #[test]
    fn test_match_yields_request() {
        let outcome = parser().parse_next("answer=42", 1);
        let req = outcome.into_request().expect("line should match");
        assert_eq!(req.format, "kv");
        assert_eq!(req.shape, "pair");
        assert_eq!(req.line_number, 1);
        assert_eq!(req.integer("value"), Some(42));
    }

    #[test]
    fn test_no_match_carries_line_verbatim() {
        let outcome = parser().parse_next("  nonsense\r\n", 9);
        let notice = outcome.into_unmatched().expect("line should not match");
        assert_eq!(notice.raw, "  nonsense\r\n");
        assert_eq!(notice.line_number, 9);
        assert_eq!(notice.reason, UnmatchedReason::NoShape);
    }

    #[test]
    fn test_parse_lines_keeps_order_and_numbers_from_one() {
        let p = parser();
        let lines = vec!["a=1", "garbage", "b=2", "c=oops"];
        let outcomes: Vec<ParseOutcome> = p.parse_lines(lines).collect();

        assert_eq!(outcomes.len(), 4);
        let numbers: Vec<usize> = outcomes.iter().map(ParseOutcome::line_number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
        assert!(outcomes[0].is_match());
        assert!(!outcomes[1].is_match());
        assert!(outcomes[2].is_match());

        // Malformed value still produces a record
        let req = outcomes[3].as_request().unwrap();
        assert_eq!(req.text("key"), Some("c"));
        assert!(req.is_absent("value"));
        assert_eq!(req.anomalies.len(), 1);
    }

    #[test]
    fn test_oversized_line_is_not_examined() {
        let p = parser().with_max_line_size(8);
        let notice = p.parse_next("key=123456", 1).into_unmatched().unwrap();
        assert_eq!(notice.reason, UnmatchedReason::TooLong);

        // At the limit is still parsed
        assert!(p.parse_next("key=1234", 2).is_match());
    }

    #[test]
    fn test_metrics_are_updated() {
        let metrics = Arc::new(ParsingMetrics::new());
        let p = parser().with_max_line_size(16).with_metrics(Arc::clone(&metrics));

        p.parse_next("a=1", 1);
        p.parse_next("b=x", 2);
        p.parse_next("nonsense", 3);
        p.parse_next("waytoolongforthelimit=1", 4);

        let snap = metrics.snapshot();
        assert_eq!(snap.total_lines, 4);
        assert_eq!(snap.matched, 2);
        assert_eq!(snap.unmatched, 1);
        assert_eq!(snap.too_long, 1);
        assert_eq!(snap.field_anomalies, 1);
    }

    #[test]
    fn test_parser_is_shareable_across_threads() {
        let p = Arc::new(parser());
        let handles: Vec<_> = (0..4)
            .map(|n| {
                let p = Arc::clone(&p);
                std::thread::spawn(move || p.parse_next(&format!("k{}={}", n, n), n + 1).is_match())
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }
}
