//! The compile-time field table: projector, mutator, and update hook.

use std::mem;

use dbus::arg::{Arg, PropMap, RefArg, Variant};
use dbus_crossroads::IfaceBuilder;

use crate::change::Change;
use crate::error::{FieldError, UpdateError};
use crate::value::PropValue;

/// One exposed field of a configuration record.
///
/// Entries are normally produced by
/// [`record_fields!`](crate::record_fields) and looked up by property
/// name; plain function pointers keep the table buildable in `const`
/// context. `R` carries the same `Send + 'static` bound as
/// [`IfaceBuilder`], which the registrar targets.
pub struct Field<R: Send + 'static> {
    /// Property name as exposed on the bus.
    pub name: &'static str,
    /// Reads the field into a boxed bus value.
    pub get: fn(&R) -> Box<dyn RefArg + 'static>,
    /// Writes a dynamically typed value into the field, returning the
    /// displaced previous value.
    pub set: fn(&mut R, &dyn RefArg) -> Result<Box<dyn RefArg + 'static>, FieldError>,
    /// Registers the field as a property on an interface under
    /// construction.
    pub register: fn(&mut IfaceBuilder<R>),
}

/// Replaces a field's value after checking the incoming argument against
/// the field's D-Bus type.
///
/// Returns the displaced previous value on success. Generated setters go
/// through here; hand-written [`Field`] tables can use it too.
///
/// # Errors
///
/// Returns [`FieldError::TypeMismatch`] (and leaves the field untouched)
/// when the argument's D-Bus type differs from `T`'s.
pub fn replace_field<T: PropValue>(
    slot: &mut T,
    name: &'static str,
    value: &dyn RefArg,
) -> Result<Box<dyn RefArg + 'static>, FieldError> {
    match T::from_ref_arg(value) {
        Some(new) => {
            let previous: Box<dyn RefArg + 'static> = Box::new(mem::replace(slot, new));
            Ok(previous)
        }
        None => Err(FieldError::TypeMismatch {
            name: name.to_string(),
            expected: <T as Arg>::signature().to_string(),
            found: value.signature().to_string(),
        }),
    }
}

/// A configuration record with a compile-time table of exposed fields.
///
/// Implemented via [`record_fields!`](crate::record_fields). The provided
/// methods are the two halves of the property protocol: [`project`]
/// (record → name-to-value map) and [`apply`] (change → field write).
///
/// [`project`]: Record::project
/// [`apply`]: Record::apply
pub trait Record: Sized + Send + 'static {
    /// The exposed fields, one entry per bus property.
    const FIELDS: &'static [Field<Self>];

    /// Projects the record into a property-name-to-value map.
    ///
    /// The map is recomputed from the live record on every call. Fields
    /// without a table entry never appear in it.
    #[must_use]
    fn project(&self) -> PropMap {
        let mut map = PropMap::new();
        for field in Self::FIELDS {
            map.insert(field.name.to_string(), Variant((field.get)(self)));
        }
        map
    }

    /// Looks up a field by its exposed property name.
    ///
    /// Names are matched exactly; lookup is case-sensitive.
    #[must_use]
    fn field(name: &str) -> Option<&'static Field<Self>> {
        Self::FIELDS.iter().find(|field| field.name == name)
    }

    /// Applies a change to the matching field, returning the displaced
    /// previous value.
    ///
    /// Applying the same change twice writes the same value twice; the
    /// record state is identical either way.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::UnknownField`] when no field table entry
    /// matches the change's name and [`FieldError::TypeMismatch`] when
    /// the change value's D-Bus type differs from the field's declared
    /// type. On failure the record is left untouched.
    fn apply(&mut self, change: &Change) -> Result<Box<dyn RefArg + 'static>, FieldError> {
        let field = Self::field(&change.name).ok_or_else(|| FieldError::UnknownField {
            name: change.name.clone(),
        })?;
        (field.set)(self, &*change.value)
    }
}

/// A record that reacts to remotely requested changes.
///
/// Projection needs no hook of its own: the bus layer reads the record
/// through [`Record::FIELDS`], so implementors supply `update` only.
///
/// [`update`](Updatable::update) runs synchronously, one call at a time,
/// on the thread driving bus dispatch. If it fails after
/// [`Record::apply`] has already written the field, the written value
/// stays in place: this library never rolls a change back. A hook that
/// wants atomic sets can restore the displaced value `apply` returned.
pub trait Updatable: Record {
    /// Reacts to one requested change.
    ///
    /// The typical implementation applies the change, then validates or
    /// propagates the new state:
    ///
    /// ```
    /// use confbus::{record_fields, Change, Record, Updatable, UpdateError};
    ///
    /// struct Config {
    ///     some_int: i32,
    /// }
    ///
    /// record_fields!(Config { some_int: i32 });
    ///
    /// impl Updatable for Config {
    ///     fn update(&mut self, change: &Change) -> Result<(), UpdateError> {
    ///         self.apply(change)?;
    ///         Ok(())
    ///     }
    /// }
    ///
    /// let mut config = Config { some_int: 42 };
    /// config.update(&Change::new("SomeInt", Box::new(7i32))).unwrap();
    /// assert_eq!(config.some_int, 7);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an [`UpdateError`] that reaches the remote caller under
    /// its dotted bus error name.
    fn update(&mut self, change: &Change) -> Result<(), UpdateError>;
}

#[cfg(test)]
mod tests {
    use dbus_crossroads::{Crossroads, IfaceToken};

    use super::*;

    struct Sample {
        count: i32,
        label: String,
        hidden: u8,
    }

    impl Sample {
        fn new() -> Self {
            Self {
                count: 42,
                label: "egg".into(),
                hidden: 7,
            }
        }
    }

    impl Record for Sample {
        const FIELDS: &'static [Field<Self>] = &[
            Field {
                name: "Count",
                get: |r| Box::new(r.count),
                set: |r, v| replace_field(&mut r.count, "Count", v),
                register: |_| {},
            },
            Field {
                name: "Label",
                get: |r| Box::new(r.label.clone()),
                set: |r, v| replace_field(&mut r.label, "Label", v),
                register: |_| {},
            },
        ];
    }

    #[test]
    fn test_project_lists_exposed_fields() {
        let sample = Sample::new();
        let props = sample.project();

        assert_eq!(props.len(), 2);
        assert_eq!(props.get("Count").unwrap().0.as_i64(), Some(42));
        assert_eq!(props.get("Label").unwrap().0.as_str(), Some("egg"));
    }

    #[test]
    fn test_project_skips_unlisted_fields() {
        let props = Sample::new().project();
        assert!(!props.contains_key("Hidden"));
        assert!(!props.contains_key("hidden"));
    }

    #[test]
    fn test_project_reads_live_state() {
        let mut sample = Sample::new();
        sample.count = 7;
        let props = sample.project();
        assert_eq!(props.get("Count").unwrap().0.as_i64(), Some(7));
    }

    #[test]
    fn test_apply_overwrites_matching_field() {
        let mut sample = Sample::new();
        let previous = sample
            .apply(&Change::new("Count", Box::new(7i32)))
            .unwrap();

        assert_eq!(previous.as_i64(), Some(42));
        assert_eq!(sample.count, 7);
        assert_eq!(sample.label, "egg");
        assert_eq!(sample.hidden, 7);
    }

    #[test]
    fn test_apply_twice_is_idempotent() {
        let mut sample = Sample::new();
        let change = Change::new("Count", Box::new(7i32));

        sample.apply(&change).unwrap();
        let previous = sample.apply(&change).unwrap();

        assert_eq!(previous.as_i64(), Some(7));
        assert_eq!(sample.count, 7);
    }

    #[test]
    fn test_apply_unknown_field_leaves_record_untouched() {
        let mut sample = Sample::new();
        let err = sample
            .apply(&Change::new("Missing", Box::new(1i32)))
            .unwrap_err();

        assert_eq!(
            err,
            FieldError::UnknownField {
                name: "Missing".into()
            }
        );
        assert_eq!(sample.count, 42);
        assert_eq!(sample.label, "egg");
    }

    #[test]
    fn test_apply_type_mismatch_leaves_record_untouched() {
        let mut sample = Sample::new();
        let err = sample
            .apply(&Change::new("Count", Box::new(true)))
            .unwrap_err();

        assert_eq!(
            err,
            FieldError::TypeMismatch {
                name: "Count".into(),
                expected: "i".into(),
                found: "b".into(),
            }
        );
        assert_eq!(sample.count, 42);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert!(Sample::field("Count").is_some());
        assert!(Sample::field("count").is_none());
        assert!(Sample::field("COUNT").is_none());
    }

    #[test]
    fn test_field_table_registers_on_a_bus_interface() {
        let mut cr = Crossroads::new();
        let token: IfaceToken<Sample> = cr.register("org.confbus.Sample", |builder| {
            for field in Sample::FIELDS {
                (field.register)(builder);
            }
        });
        cr.insert("/sample", &[token], Sample::new());
    }
}
