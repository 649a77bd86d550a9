//! Publishing records on a message bus.
//!
//! The `org.freedesktop.DBus.Properties` protocol, introspection XML and
//! the `PropertiesChanged` signal are all served by
//! [`dbus_crossroads::Crossroads`]. This module only turns a record's
//! field table into a crossroads interface and places records into the
//! object tree; the embedding application owns the connection and the
//! dispatch loop.

use dbus::Path;
use dbus::strings::Interface;
use dbus_crossroads::{Crossroads, IfaceToken};
use tracing::{debug, info};

use crate::error::ExportError;
use crate::record::Updatable;

/// Registers a record type's field table as a bus interface.
///
/// Every field becomes a readable, writable property with change
/// notification enabled; writes are routed through
/// [`Updatable::update`]. One registration can back any number of
/// records inserted at different paths.
///
/// # Errors
///
/// Fails if `iface` is not a valid D-Bus interface name.
pub fn register_iface<R: Updatable>(
    cr: &mut Crossroads,
    iface: &str,
) -> Result<IfaceToken<R>, ExportError> {
    Interface::new(iface).map_err(|_| ExportError::InvalidInterface(iface.to_string()))?;

    let token = cr.register(iface.to_string(), |builder| {
        for field in R::FIELDS {
            (field.register)(builder);
            debug!(property = field.name, "registered property");
        }
    });
    Ok(token)
}

/// Publishes a record at an object path on an existing bus router.
///
/// The record moves into the router: remote `Get`/`GetAll` read it
/// through its field table, remote `Set` goes through
/// [`Updatable::update`], and successful sets raise `PropertiesChanged`
/// with the post-update value. Call once at startup, then drive the
/// router with [`Crossroads::serve`] or your own dispatch loop.
///
/// # Errors
///
/// Fails if `path` is not a valid D-Bus object path or `iface` is not a
/// valid interface name.
pub fn export<R: Updatable>(
    cr: &mut Crossroads,
    path: &str,
    iface: &str,
    record: R,
) -> Result<(), ExportError> {
    let object_path = Path::new(path).map_err(|_| ExportError::InvalidPath(path.to_string()))?;
    let token = register_iface(cr, iface)?;
    cr.insert(object_path, &[token], record);

    info!(path, iface, properties = R::FIELDS.len(), "record exported");
    Ok(())
}
