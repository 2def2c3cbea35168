//! A JSON-schema-like validator (§4.A): build a schema tree with [`spec::Schema`],
//! then check values against it with [`validator::SchemaValidator`].

mod error;
mod formats;
mod spec;
mod validator;

pub use error::SchemaError;
pub use formats::{default_formats, FormatFn};
pub use spec::{AdditionalProperties, Schema};
pub use validator::{SchemaFetcher, SchemaValidator};
