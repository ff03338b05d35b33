//! Producer seam: anything that can yield the element sequence of one
//! optimization unit (a paragraph or a page flow).

use folio_types::Element;
use std::fmt::Debug;
use thiserror::Error;

/// Error type for element producers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    #[error("Unit '{0}' produced no content")]
    Empty(String),

    #[error("Cannot measure '{text}': {message}")]
    Measure { text: String, message: String },

    #[error("Malformed unit: {0}")]
    Malformed(String),
}

/// Yields the element sequence for one optimization unit.
///
/// The breaking engine does not know how the elements were derived; it only
/// reads the returned slice for the duration of a run.
pub trait ElementSource: Debug {
    fn elements(&self) -> Result<Vec<Element>, SourceError>;

    /// Short description used in log messages.
    fn label(&self) -> String {
        "unit".to_string()
    }
}

impl ElementSource for Vec<Element> {
    fn elements(&self) -> Result<Vec<Element>, SourceError> {
        Ok(self.clone())
    }

    fn label(&self) -> String {
        format!("{} elements", self.len())
    }
}

impl ElementSource for [Element] {
    fn elements(&self) -> Result<Vec<Element>, SourceError> {
        Ok(self.to_vec())
    }
}

impl<S: ElementSource + ?Sized> ElementSource for Box<S> {
    fn elements(&self) -> Result<Vec<Element>, SourceError> {
        (**self).elements()
    }

    fn label(&self) -> String {
        (**self).label()
    }
}
