//! # confbus
//!
//! Expose an application's configuration struct as remotely readable and
//! writable D-Bus properties.
//!
//! A config struct lists its exposed fields once with [`record_fields!`];
//! that gives it a compile-time field table ([`Record`]) covering
//! projection into a property map and mutation from an incoming change.
//! The struct's [`Updatable`] hook decides what an accepted change means,
//! and [`export`] publishes the record at an object path on an existing
//! bus connection, with `Get`/`Set`/`GetAll`, change signals, and
//! introspection served by [`dbus_crossroads`].
//!
//! This crate provides:
//!
//! - [`record_fields!`] — field table derivation for a config struct.
//! - [`Record`] — projection and mutation over the field table.
//! - [`Updatable`] — the hook invoked for every remotely requested change.
//! - [`node`] — registration of records on a bus object tree.
//! - [`error`] — field, update, and export error types.
//!
//! ```no_run
//! use confbus::{record_fields, Change, Record, Updatable, UpdateError};
//! use dbus::blocking::Connection;
//! use dbus::blocking::stdintf::org_freedesktop_dbus::RequestNameReply;
//! use dbus_crossroads::Crossroads;
//!
//! struct Config {
//!     some_int: i32,
//!     some_string: String,
//! }
//!
//! record_fields!(Config { some_int: i32, some_string: String });
//!
//! impl Updatable for Config {
//!     fn update(&mut self, change: &Change) -> Result<(), UpdateError> {
//!         self.apply(change)?;
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let conn = Connection::new_session()?;
//!     let reply = conn.request_name("org.confbus", false, true, true)?;
//!     if !matches!(reply, RequestNameReply::PrimaryOwner) {
//!         return Err("bus name org.confbus is already taken".into());
//!     }
//!
//!     let mut cr = Crossroads::new();
//!     confbus::export(
//!         &mut cr,
//!         "/config",
//!         "org.confbus.Config",
//!         Config { some_int: 42, some_string: "egg".into() },
//!     )?;
//!
//!     cr.serve(&conn)?;
//!     unreachable!()
//! }
//! ```

pub mod change;
pub mod error;
mod macros;
pub mod node;
pub mod record;
pub mod value;

pub use change::Change;
pub use error::{ExportError, FieldError, UpdateError};
pub use node::{export, register_iface};
pub use record::{Field, Record, Updatable};
pub use value::PropValue;

#[doc(hidden)]
pub mod __exports {
    pub use dbus;
    pub use paste;
}
