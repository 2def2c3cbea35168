//! Cross-cutting types shared by every other crate in this workspace: the
//! top-level error kind, the CLI-populated options context, object-graph
//! navigation helpers, and the small process/temp-file utilities language
//! backends lean on.

mod data_helper;
mod error;
mod home;
mod options;
mod process;
mod scoped_file;

pub use data_helper::{
    find_value, find_value_in, is_array, is_boolean, is_integer, is_number, is_object, is_string,
    PathPiece,
};
pub use error::BuilderError;
pub use home::default_cache_root;
pub use options::{substitute_with, GlobalOptions};
pub use process::{checked_run, format_command, CommandOutput};
pub use scoped_file::ScopedTextFile;
