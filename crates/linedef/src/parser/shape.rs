use std::collections::HashSet;
use regex::Regex;
use super::convert::FieldType;
use super::model::SchemaError;

/// One named, typed capture of a line shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub field_type: FieldType,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }
}

/// Declarative description of one recognizable line layout.
///
/// The pattern is matched against the whole line: it is compiled
/// anchored at both ends, so a match on a substring never counts.
/// Capture group `i` feeds field `i`.
#[derive(Debug, Clone)]
pub struct LineShape {
    name: String,
    source: String,
    pattern: Regex,
    teaser: Option<Regex>,
    fields: Vec<FieldSpec>,
}

impl LineShape {
    /// Compile a shape. Only the pattern syntax is checked here; the
    /// field list is checked against it by [`LineShape::check`].
    pub fn new(
        name: impl Into<String>,
        pattern: &str,
        fields: &[(&str, FieldType)],
    ) -> Result<Self, SchemaError> {
        let name = name.into();
        let anchored = format!("^(?:{})$", pattern);
        let compiled = Regex::new(&anchored).map_err(|e| SchemaError::InvalidPattern {
            shape: name.clone(),
            message: e.to_string(),
        })?;

        Ok(Self {
            name,
            source: pattern.to_string(),
            pattern: compiled,
            teaser: None,
            fields: fields
                .iter()
                .map(|(field, field_type)| FieldSpec::new(*field, *field_type))
                .collect(),
        })
    }

    /// Attach a cheap pre-filter that must be found somewhere in a line
    /// before the full pattern is attempted.
    pub fn with_teaser(mut self, teaser: &str) -> Result<Self, SchemaError> {
        let compiled = Regex::new(teaser).map_err(|e| SchemaError::InvalidPattern {
            shape: self.name.clone(),
            message: e.to_string(),
        })?;
        self.teaser = Some(compiled);
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The pattern as written, without the anchoring wrapper
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub(crate) fn pattern(&self) -> &Regex {
        &self.pattern
    }

    pub(crate) fn teaser(&self) -> Option<&Regex> {
        self.teaser.as_ref()
    }

    /// Number of capture groups the pattern defines (group 0 excluded)
    pub fn capture_count(&self) -> usize {
        self.pattern.captures_len() - 1
    }

    /// Verify the declared fields line up with the pattern's capture groups.
    pub fn check(&self) -> Result<(), SchemaError> {
        let captures = self.capture_count();
        if captures != self.fields.len() {
            return Err(SchemaError::FieldCountMismatch {
                shape: self.name.clone(),
                declared: self.fields.len(),
                captures,
            });
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    shape: self.name.clone(),
                    field: field.name.clone(),
                });
            }
        }

        // Group names skip the implicit whole-match group
        for (position, (group, field)) in self
            .pattern
            .capture_names()
            .skip(1)
            .zip(&self.fields)
            .enumerate()
        {
            if let Some(group) = group {
                if group != field.name {
                    return Err(SchemaError::GroupNameMismatch {
                        shape: self.name.clone(),
                        position: position + 1,
                        group: group.to_string(),
                        field: field.name.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}

/// An ordered set of line shapes describing one log dialect.
///
/// Construction validates every shape, so a `FormatDefinition` that
/// exists is always consistent. Shapes are tried in order and the first
/// structural match wins.
#[derive(Debug, Clone)]
pub struct FormatDefinition {
    name: String,
    shapes: Vec<LineShape>,
}

impl FormatDefinition {
    pub fn new(name: impl Into<String>, shapes: Vec<LineShape>) -> Result<Self, SchemaError> {
        let definition = Self {
            name: name.into(),
            shapes,
        };
        definition.validate()?;
        Ok(definition)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shapes(&self) -> &[LineShape] {
        &self.shapes
    }

    pub fn shape(&self, name: &str) -> Option<&LineShape> {
        self.shapes.iter().find(|s| s.name == name)
    }

    /// Check every shape's field list against its pattern.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.shapes.is_empty() {
            return Err(SchemaError::EmptyFormat(self.name.clone()));
        }
        for shape in &self.shapes {
            shape.check()?;
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}
