//! An [Airbrake] notice client core: build structured error reports, encode
//! them as XML and check them against the notice schema before submission.
//!
//! [Airbrake]: https://airbrake.io
//!
//! # Usage
//!
//! Populate a [`Notice`], serialize it and validate the result:
//!
//! ```rust
//! use airbrake_notice::{ErrorDetails, Notice, Notifier, ServerEnvironment, TraceLine};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut error = ErrorDetails::new("TestError", "something blew up");
//! error.backtrace.push(TraceLine::new("unknown.cs", 0).with_method("unknown"));
//!
//! let mut notice = Notice::new(
//!     "123456",
//!     Notifier::default(),
//!     ServerEnvironment::new("staging"),
//! );
//! notice.error = Some(error);
//!
//! let xml = notice.to_xml()?;
//! airbrake_notice::validate_schema(&xml)?;
//! # Ok(())
//! # }
//! ```
//!
//! Submitting the validated XML to the service's ingestion endpoint is a
//! transport concern and stays outside this crate.
//!
//! # Clean serialization
//!
//! Optional data that was never set produces no XML at all: no `request`
//! element for a notice without a request, no `method` attribute for a trace
//! line without a method, no empty `<cgi-data/>` placeholder for an empty
//! collection. Serialization is deterministic, so the same notice always
//! yields byte-identical XML.
//!
//! # Validation
//!
//! [`validate_schema`] checks a document against the bundled notice schema
//! (version 2.0) and reports the first violation with a message naming the
//! containing element and the missing or invalid child, plus the 1-based
//! line and column in the input text. Serialization deliberately never
//! rejects incomplete domain data — a notice without its required `error`
//! still serializes, and the validator is what catches it:
//!
//! ```rust
//! use airbrake_notice::{Notice, Notifier, ServerEnvironment};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let notice = Notice::new(
//!     "123456",
//!     Notifier::default(),
//!     ServerEnvironment::new("staging"),
//! );
//!
//! let xml = notice.to_xml()?;
//! let failure = airbrake_notice::validate_schema(&xml).unwrap_err();
//! assert!(failure.message.contains("'error'"));
//! # Ok(())
//! # }
//! ```
#![deny(missing_docs, unreachable_pub, missing_debug_implementations)]
#![cfg_attr(test, deny(warnings))]

mod error;
mod models;
mod schema;
mod serializer;
mod validator;

pub use error::{Error, SchemaValidationError};
pub use models::{
    ErrorDetails, Notice, Notifier, Request, ServerEnvironment, TraceLine, Var, NOTICE_VERSION,
};
pub use serializer::to_xml;
pub use validator::validate_schema;
