//! Field table generation for configuration records.

/// Implements [`Record`](crate::Record) for a struct from a list of its
/// exposed fields.
///
/// Each listed field becomes one [`Field`](crate::Field) entry whose
/// property name is the PascalCase form of the field name: `some_int` is
/// exposed as `"SomeInt"`. Struct fields not listed here stay private to
/// the process; they are never projected and cannot be set from the bus.
///
/// The struct must also implement [`Updatable`](crate::Updatable) — the
/// generated bus setter routes every remote write through its `update`
/// hook.
///
/// ```
/// use confbus::{record_fields, Change, Record, Updatable, UpdateError};
///
/// struct Config {
///     some_int: i32,
///     some_string: String,
///     attempts: u32,
/// }
///
/// record_fields!(Config { some_int: i32, some_string: String });
///
/// impl Updatable for Config {
///     fn update(&mut self, change: &Change) -> Result<(), UpdateError> {
///         self.apply(change)?;
///         Ok(())
///     }
/// }
///
/// let config = Config {
///     some_int: 42,
///     some_string: "egg".into(),
///     attempts: 0,
/// };
/// let props = config.project();
/// assert!(props.contains_key("SomeInt"));
/// assert!(props.contains_key("SomeString"));
/// assert!(!props.contains_key("Attempts"));
/// ```
#[macro_export]
macro_rules! record_fields {
    ($record:ty { $($field:ident : $ty:ty),+ $(,)? }) => {
        $crate::__exports::paste::paste! {
            impl $crate::Record for $record {
                const FIELDS: &'static [$crate::Field<Self>] = &[
                    $(
                        $crate::Field {
                            name: stringify!([<$field:camel>]),
                            get: |record| ::std::boxed::Box::new(record.$field.clone()),
                            set: |record, value| $crate::record::replace_field(
                                &mut record.$field,
                                stringify!([<$field:camel>]),
                                value,
                            ),
                            register: |builder| {
                                builder
                                    .property(stringify!([<$field:camel>]))
                                    .get(|_, record: &mut $record| {
                                        ::std::result::Result::Ok(record.$field.clone())
                                    })
                                    .set(|_, record: &mut $record, value: $ty| {
                                        let change = $crate::Change::new(
                                            stringify!([<$field:camel>]),
                                            ::std::boxed::Box::new(value),
                                        );
                                        $crate::Updatable::update(record, &change)
                                            .map_err($crate::__exports::dbus::MethodErr::from)?;
                                        ::std::result::Result::Ok(::std::option::Option::Some(
                                            record.$field.clone(),
                                        ))
                                    });
                            },
                        },
                    )+
                ];
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use dbus::arg::RefArg;

    use crate::change::Change;
    use crate::error::{TYPE_MISMATCH_ERROR, UNKNOWN_FIELD_ERROR, UpdateError};
    use crate::record::{Record, Updatable};

    struct Config {
        some_int: i32,
        some_long_name: String,
        attempts: u32,
    }

    record_fields!(Config { some_int: i32, some_long_name: String });

    impl Updatable for Config {
        fn update(&mut self, change: &Change) -> Result<(), UpdateError> {
            self.apply(change)?;
            Ok(())
        }
    }

    fn config() -> Config {
        Config {
            some_int: 42,
            some_long_name: "egg".into(),
            attempts: 0,
        }
    }

    #[test]
    fn test_property_names_are_pascal_case() {
        assert!(Config::field("SomeInt").is_some());
        assert!(Config::field("SomeLongName").is_some());
        assert!(Config::field("some_int").is_none());
        assert!(Config::field("someInt").is_none());
    }

    #[test]
    fn test_project_exposes_listed_fields_only() {
        let props = config().project();

        assert_eq!(props.len(), 2);
        assert_eq!(props.get("SomeInt").unwrap().0.as_i64(), Some(42));
        assert_eq!(props.get("SomeLongName").unwrap().0.as_str(), Some("egg"));
        assert!(!props.contains_key("Attempts"));
    }

    #[test]
    fn test_update_applies_change() {
        let mut config = config();
        config
            .update(&Change::new("SomeInt", Box::new(7i32)))
            .unwrap();

        assert_eq!(config.some_int, 7);
        assert_eq!(config.project().get("SomeInt").unwrap().0.as_i64(), Some(7));
    }

    #[test]
    fn test_update_rejects_unknown_property() {
        let mut config = config();
        let err = config
            .update(&Change::new("Attempts", Box::new(1u32)))
            .unwrap_err();

        assert_eq!(err.name, UNKNOWN_FIELD_ERROR);
        assert_eq!(config.attempts, 0);
    }

    #[test]
    fn test_update_rejects_mismatched_type() {
        let mut config = config();
        let err = config
            .update(&Change::new("SomeInt", Box::new(String::from("seven"))))
            .unwrap_err();

        assert_eq!(err.name, TYPE_MISMATCH_ERROR);
        assert!(err.message.contains("SomeInt"));
        assert_eq!(config.some_int, 42);
    }

    #[test]
    fn test_apply_returns_displaced_value() {
        let mut config = config();
        let previous = config
            .apply(&Change::new("SomeLongName", Box::new(String::from("fog"))))
            .unwrap();

        assert_eq!(previous.as_str(), Some("egg"));
        assert_eq!(config.some_long_name, "fog");
    }

    struct Guarded {
        some_int: i32,
        max: i32,
    }

    record_fields!(Guarded { some_int: i32 });

    impl Updatable for Guarded {
        fn update(&mut self, change: &Change) -> Result<(), UpdateError> {
            self.apply(change)?;
            if self.some_int > self.max {
                return Err(UpdateError::new(
                    "org.confbus.Error.Validation",
                    format!("SomeInt[max={}] <> {}", self.max, self.some_int),
                ));
            }
            Ok(())
        }
    }

    #[test]
    fn test_failed_update_keeps_written_value() {
        let mut guarded = Guarded {
            some_int: 42,
            max: 50,
        };
        let err = guarded
            .update(&Change::new("SomeInt", Box::new(51i32)))
            .unwrap_err();

        assert_eq!(err.name, "org.confbus.Error.Validation");
        assert_eq!(err.message, "SomeInt[max=50] <> 51");
        // rejected writes are not rolled back
        assert_eq!(guarded.some_int, 51);
    }
}
