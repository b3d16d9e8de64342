use super::shape::{FormatDefinition, LineShape};

/// The shape that recognized a line, with one token per declared field.
///
/// A `None` token is a capture group that did not take part in the match
/// (an optional section of the pattern that was missing from the line).
#[derive(Debug, Clone)]
pub struct StructuralMatch<'f, 'l> {
    pub shape: &'f LineShape,
    pub shape_index: usize,
    pub tokens: Vec<Option<&'l str>>,
}

/// Try each shape of `format` in order and return the first whole-line match.
///
/// A trailing `\n` or `\r\n` is not part of the line. Returns `None`
/// without any side effect when nothing matches.
pub fn match_line<'f, 'l>(format: &'f FormatDefinition, line: &'l str) -> Option<StructuralMatch<'f, 'l>> {
    let line = line.trim_end_matches(['\n', '\r']);

    format
        .shapes()
        .iter()
        .enumerate()
        .find_map(|(shape_index, shape)| match_shape(shape, line).map(|tokens| StructuralMatch {
            shape,
            shape_index,
            tokens,
        }))
}

fn match_shape<'l>(shape: &LineShape, line: &'l str) -> Option<Vec<Option<&'l str>>> {
    if let Some(teaser) = shape.teaser() {
        if !teaser.is_match(line) {
            return None;
        }
    }

    let caps = shape.pattern().captures(line)?;
    Some(
        (1..=shape.fields().len())
            .map(|i| caps.get(i).map(|m| m.as_str()))
            .collect(),
    )
}
