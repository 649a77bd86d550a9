//! The change notification handed to update hooks.

use dbus::arg::RefArg;

/// A single requested property change.
///
/// Produced by the bus layer when a remote caller sets a property, and
/// consumed once by [`Updatable::update`](crate::Updatable::update). The
/// value is dynamically typed; [`Record::apply`](crate::Record::apply)
/// checks its D-Bus type against the target field's declared type before
/// writing.
#[derive(Debug)]
pub struct Change {
    /// Property name as exposed on the bus, e.g. `"SomeInt"`.
    pub name: String,
    /// The new value carried by the change.
    pub value: Box<dyn RefArg + 'static>,
}

impl Change {
    /// Creates a change for the named property.
    #[must_use]
    pub fn new(name: impl Into<String>, value: Box<dyn RefArg + 'static>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}
