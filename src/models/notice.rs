use crate::models::{ErrorDetails, Notifier, Request, ServerEnvironment};
use crate::{serializer, Error};

/// Version of the notice schema this crate produces and validates.
pub const NOTICE_VERSION: &str = "2.0";

/// One error-report submission unit.
///
/// Constructed fresh per reportable event, serialized with
/// [`Notice::to_xml`] and discarded once the XML has been submitted.
#[derive(Debug, Clone)]
pub struct Notice {
    /// API key identifying the project on the error-tracking service.
    pub api_key: String,

    /// The reported error. The schema requires it; a notice serialized
    /// without one still produces well-formed XML but fails
    /// [`crate::validate_schema`].
    pub error: Option<ErrorDetails>,

    /// The HTTP request during which the error occurred, if any.
    pub request: Option<Request>,

    /// Identification of the client library producing this notice.
    pub notifier: Notifier,

    /// The environment the reporting application runs in.
    pub server_environment: ServerEnvironment,
}

impl Notice {
    /// Creates a notice with the required identification fields. The error
    /// and request are attached afterwards via the public fields.
    pub fn new(
        api_key: impl Into<String>,
        notifier: Notifier,
        server_environment: ServerEnvironment,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            error: None,
            request: None,
            notifier,
            server_environment,
        }
    }

    /// Serializes this notice to schema-ordered, indented XML.
    ///
    /// Serializing the same notice twice yields byte-identical output. See
    /// [`crate::to_xml`] for the clean-serialization rules.
    pub fn to_xml(&self) -> Result<String, Error> {
        serializer::to_xml(self)
    }
}
