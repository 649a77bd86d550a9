//! Typed boundary between record fields and dynamically typed bus values.

use dbus::arg::{Append, Arg, ArgType, Get, RefArg};

/// Types a record field may have to be exposed as a bus property.
///
/// The set is closed over the D-Bus basic value types. Extraction is
/// type-exact at the D-Bus level: an `i32` field never accepts a `bool`
/// or a differently sized integer, while a `String` field accepts any
/// string-typed argument regardless of how it is boxed. There is no
/// coercion; a mismatch is an error at the call site.
pub trait PropValue: Arg + RefArg + Append + for<'a> Get<'a> + Clone + Send + 'static {
    /// Extracts a value of this type from a dynamically typed argument.
    ///
    /// Returns `None` unless the argument's D-Bus type matches exactly.
    fn from_ref_arg(arg: &dyn RefArg) -> Option<Self>;
}

macro_rules! impl_prop_value {
    ($ty:ty, $arg_type:ident, |$arg:ident| $extract:expr) => {
        impl PropValue for $ty {
            fn from_ref_arg($arg: &dyn RefArg) -> Option<Self> {
                if $arg.arg_type() != ArgType::$arg_type {
                    return None;
                }
                $extract
            }
        }
    };
}

impl_prop_value!(bool, Boolean, |arg| arg.as_i64().map(|v| v != 0));
impl_prop_value!(u8, Byte, |arg| arg.as_i64().map(|v| v as u8));
impl_prop_value!(i16, Int16, |arg| arg.as_i64().map(|v| v as i16));
impl_prop_value!(u16, UInt16, |arg| arg.as_i64().map(|v| v as u16));
impl_prop_value!(i32, Int32, |arg| arg.as_i64().map(|v| v as i32));
impl_prop_value!(u32, UInt32, |arg| arg.as_i64().map(|v| v as u32));
impl_prop_value!(i64, Int64, |arg| arg.as_i64());
impl_prop_value!(u64, UInt64, |arg| arg.as_u64());
impl_prop_value!(f64, Double, |arg| arg.as_f64());
impl_prop_value!(String, String, |arg| arg.as_str().map(ToOwned::to_owned));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_type_extracts() {
        assert_eq!(i32::from_ref_arg(&7i32), Some(7));
        assert_eq!(bool::from_ref_arg(&true), Some(true));
        assert_eq!(f64::from_ref_arg(&1.5f64), Some(1.5));
        assert_eq!(u64::from_ref_arg(&u64::MAX), Some(u64::MAX));
        assert_eq!(
            String::from_ref_arg(&String::from("egg")),
            Some(String::from("egg"))
        );
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        assert_eq!(i32::from_ref_arg(&true), None);
        assert_eq!(bool::from_ref_arg(&1u8), None);
        assert_eq!(String::from_ref_arg(&42i32), None);
        assert_eq!(f64::from_ref_arg(&42i32), None);
    }

    #[test]
    fn test_integer_widths_do_not_cross() {
        assert_eq!(i32::from_ref_arg(&7i64), None);
        assert_eq!(i32::from_ref_arg(&7u32), None);
        assert_eq!(i32::from_ref_arg(&7i16), None);
        assert_eq!(u8::from_ref_arg(&7u16), None);
        assert_eq!(i64::from_ref_arg(&7i32), None);
    }

    #[test]
    fn test_extraction_reads_through_boxes() {
        let boxed: Box<dyn RefArg> = Box::new(7i32);
        assert_eq!(i32::from_ref_arg(&*boxed), Some(7));

        let boxed: Box<dyn RefArg> = Box::new(String::from("egg"));
        assert_eq!(String::from_ref_arg(&*boxed), Some(String::from("egg")));
    }
}
