//! Field, update, and export error types.
//!
//! Every failure that can reach a remote caller is expressed as a dotted
//! D-Bus error name plus a human-readable detail string; the `From` chain
//! here ([`FieldError`] → [`UpdateError`] → [`dbus::MethodErr`]) is how a
//! failed set request turns into an error reply on the wire.

use dbus::MethodErr;
use dbus::strings::ErrorName;
use thiserror::Error;

/// Bus error name for a change that names no exposed field.
pub const UNKNOWN_FIELD_ERROR: &str = "org.confbus.Error.UnknownField";

/// Bus error name for a change whose value type differs from the field's.
pub const TYPE_MISMATCH_ERROR: &str = "org.confbus.Error.TypeMismatch";

/// Generic bus error name for update hooks that do not pick their own.
pub const UPDATE_FAILED_ERROR: &str = "org.confbus.Error.UpdateFailed";

/// Failure to write a change into a record field.
///
/// Both variants leave the record untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The change names a property with no field table entry.
    #[error("no property field named `{name}`")]
    UnknownField {
        /// Property name the change carried.
        name: String,
    },

    /// The change value's D-Bus type differs from the field's declared type.
    #[error("property `{name}` expects D-Bus type `{expected}`, change carries `{found}`")]
    TypeMismatch {
        /// Property name the change carried.
        name: String,
        /// D-Bus type signature of the field.
        expected: String,
        /// D-Bus type signature of the change value.
        found: String,
    },
}

/// A failed update, reported back to the remote caller as a bus error.
///
/// `name` is a dotted D-Bus error name (for example
/// `org.confbus.Error.Validation`) chosen by the update hook. A name the
/// bus would reject is replaced with [`UPDATE_FAILED_ERROR`] when the
/// error reply is built; the chosen name is folded into the detail
/// string instead, so the reply still goes out.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{name}: {message}")]
pub struct UpdateError {
    /// Dotted D-Bus error name sent on the wire.
    pub name: String,
    /// Detail string shown to the remote caller.
    pub message: String,
}

impl UpdateError {
    /// Creates an error with a caller-chosen bus error name.
    #[must_use]
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates an error under the generic [`UPDATE_FAILED_ERROR`] name.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(UPDATE_FAILED_ERROR, message)
    }
}

impl From<FieldError> for UpdateError {
    fn from(err: FieldError) -> Self {
        let name = match &err {
            FieldError::UnknownField { .. } => UNKNOWN_FIELD_ERROR,
            FieldError::TypeMismatch { .. } => TYPE_MISMATCH_ERROR,
        };
        Self::new(name, err.to_string())
    }
}

impl From<UpdateError> for MethodErr {
    fn from(err: UpdateError) -> Self {
        // ErrorName::from panics on invalid names
        match ErrorName::new(err.name.as_str()) {
            Ok(name) => MethodErr::from((name, err.message)),
            Err(_) => MethodErr::from((
                UPDATE_FAILED_ERROR,
                format!("{}: {}", err.name, err.message),
            )),
        }
    }
}

/// Failure to register a record on the bus.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExportError {
    /// The object path is not a valid D-Bus object path.
    #[error("invalid object path `{0}`")]
    InvalidPath(String),

    /// The interface name is not a valid D-Bus interface name.
    #[error("invalid interface name `{0}`")]
    InvalidInterface(String),
}
