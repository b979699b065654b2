/// A notice failed validation against the bundled schema.
///
/// `line` and `column` are 1-based positions into the validated XML text.
/// The column points at the element name, one past the `<` of a start tag or
/// two past the `<` of an end tag.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} Line {line}, position {column}.")]
pub struct SchemaValidationError {
    /// Human-readable description naming the containing element and the
    /// missing or invalid child.
    pub message: String,

    /// 1-based line of the violation.
    pub line: u64,

    /// 1-based column of the violation.
    pub column: u64,
}

/// Errors that occurred while producing or validating notice XML.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The notice failed to serialize to XML.
    ///
    /// Note: This is an error in this crate. If you spot this, please open an
    /// issue.
    #[error("writing notice XML failed with {0}")]
    Xml(#[from] quick_xml::Error),

    /// The underlying writer failed. Serialization targets an in-memory
    /// buffer, so this does not come up in practice.
    #[error("writing notice XML failed with {0}")]
    Io(#[from] std::io::Error),

    /// The produced XML does not conform to the notice schema. This is the
    /// failure callers are expected to catch and act on, e.g. by logging and
    /// not submitting the notice.
    #[error(transparent)]
    Validation(#[from] SchemaValidationError),
}
