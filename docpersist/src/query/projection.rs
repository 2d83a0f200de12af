use crate::common::Document;
use crate::errors::PersistenceResult;

/// A native projection: the fields to keep and the fields to drop.
///
/// When `include` is empty every field is kept except the excluded ones;
/// otherwise only the included fields are kept. Exclusion always wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Projection {
    include: Vec<String>,
    exclude: Vec<String>,
}

impl Projection {
    pub fn new() -> Self {
        Projection::default()
    }

    pub fn include(mut self, field: &str) -> Self {
        if !self.include.iter().any(|it| it == field) {
            self.include.push(field.to_string());
        }
        self
    }

    pub fn exclude(mut self, field: &str) -> Self {
        if !self.exclude.iter().any(|it| it == field) {
            self.exclude.push(field.to_string());
        }
        self
    }

    pub fn included(&self) -> &[String] {
        &self.include
    }

    pub fn excluded(&self) -> &[String] {
        &self.exclude
    }

    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    pub fn is_excluded(&self, field: &str) -> bool {
        self.exclude.iter().any(|it| it == field)
    }

    /// Projects a document. Embedded keys keep their nesting in the result.
    pub fn apply(&self, document: &Document) -> PersistenceResult<Document> {
        let mut projected = if self.include.is_empty() {
            document.clone()
        } else {
            let mut projected = Document::new();
            for field in &self.include {
                if let Some(value) = document.get(field) {
                    projected.put(field.as_str(), value)?;
                }
            }
            projected
        };

        for field in &self.exclude {
            projected.remove(field);
        }
        Ok(projected)
    }
}
