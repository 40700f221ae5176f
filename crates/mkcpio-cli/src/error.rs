//! Error conversion utilities for CLI.
//!
//! Converts mkcpio-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) and maps them to process exit codes.

use anyhow::Result;
use mkcpio_core::CpioError;
use std::path::Path;

/// Wrong number of arguments or an unknown flag.
pub const EXIT_USAGE: u8 = 64;

/// The archive could not be set up or was left incomplete.
pub const EXIT_SOFTWARE: u8 = 70;

/// The destination could not be opened for writing.
pub const EXIT_CANNOT_OPEN: u8 = 1;

/// Converts `CpioError` to user-friendly anyhow error with context
pub fn convert_creation_error(err: CpioError, output: &Path) -> anyhow::Error {
    let context = match &err {
        CpioError::DestinationOpen { .. } => format!(
            "Cannot create archive '{}'\n\
             HINT: Check that the parent directory exists and is writable.",
            output.display()
        ),
        CpioError::InvalidConfig(_) => "Invalid settings\n\
             HINT: --buffer-size accepts values from 512 to 16M."
            .to_string(),
        CpioError::Io(_) | CpioError::WriterPoisoned => format!(
            "Archive '{}' is incomplete and has no trailer\n\
             HINT: Writing to the destination failed. Check free space and permissions.",
            output.display()
        ),
        _ => format!("Error writing archive '{}'", output.display()),
    };
    anyhow::Error::new(err).context(context)
}

/// Adds context to a creation result
pub fn add_archive_context<T>(result: Result<T, CpioError>, output: &Path) -> anyhow::Result<T> {
    result.map_err(|e| convert_creation_error(e, output))
}

/// Exit status for an error that ended the run
pub fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<CpioError>() {
        Some(CpioError::DestinationOpen { .. }) => EXIT_CANNOT_OPEN,
        _ => EXIT_SOFTWARE,
    }
}
