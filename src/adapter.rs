//! Default conversions from host types into [`Value`].
//!
//! Mirrors `lang_pt::TokenImpl`/`NodeImpl`: a single required method other
//! crates implement for their own types, with blanket implementations
//! supplied here for the primitives and containers that come up most often.

use crate::Value;
use std::collections::{BTreeMap, HashMap};

/// A type that can be converted to a [`Value`] before encoding.
///
/// This is a `toJSON`-style hook: a collaborator-supplied object is
/// converted by invoking this method, then the result is encoded from
/// scratch. [`crate::encode_from`] is the entry point that performs this
/// conversion once up front; the codec itself only ever sees the
/// resulting [`Value`].
pub trait ToTsionValue {
    fn to_tsion_value(&self) -> Value;
}

impl ToTsionValue for Value {
    fn to_tsion_value(&self) -> Value {
        self.clone()
    }
}

impl ToTsionValue for bool {
    fn to_tsion_value(&self) -> Value {
        Value::Bool(*self)
    }
}

macro_rules! impl_number {
    ($($t:ty),*) => {
        $(
            impl ToTsionValue for $t {
                fn to_tsion_value(&self) -> Value {
                    Value::Number(*self as f64)
                }
            }
        )*
    };
}

impl_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl ToTsionValue for num_bigint::BigInt {
    fn to_tsion_value(&self) -> Value {
        Value::BigInt(self.clone())
    }
}

impl ToTsionValue for str {
    fn to_tsion_value(&self) -> Value {
        Value::String(self.to_string())
    }
}

impl ToTsionValue for String {
    fn to_tsion_value(&self) -> Value {
        Value::String(self.clone())
    }
}

impl<T: ToTsionValue> ToTsionValue for Option<T> {
    fn to_tsion_value(&self) -> Value {
        match self {
            Some(value) => value.to_tsion_value(),
            None => Value::Null,
        }
    }
}

impl<T: ToTsionValue> ToTsionValue for Vec<T> {
    fn to_tsion_value(&self) -> Value {
        Value::Array(self.iter().map(ToTsionValue::to_tsion_value).collect())
    }
}

impl<T: ToTsionValue> ToTsionValue for [T] {
    fn to_tsion_value(&self) -> Value {
        Value::Array(self.iter().map(ToTsionValue::to_tsion_value).collect())
    }
}

impl<T: ToTsionValue> ToTsionValue for BTreeMap<String, T> {
    fn to_tsion_value(&self) -> Value {
        Value::Object(
            self.iter()
                .map(|(k, v)| (k.clone(), v.to_tsion_value()))
                .collect(),
        )
    }
}

impl<T: ToTsionValue> ToTsionValue for HashMap<String, T> {
    fn to_tsion_value(&self) -> Value {
        Value::Object(
            self.iter()
                .map(|(k, v)| (k.clone(), v.to_tsion_value()))
                .collect(),
        )
    }
}

impl<T: ToTsionValue> ToTsionValue for &T {
    fn to_tsion_value(&self) -> Value {
        (*self).to_tsion_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode_from;

    #[test]
    fn converts_primitives_before_encoding() {
        assert_eq!(encode_from(&true), ":t");
        assert_eq!(encode_from(&42_i64), "#42");
        assert_eq!(encode_from(&"hi"), "&hi");
    }

    #[test]
    fn converts_option_and_vec() {
        let none: Option<i64> = None;
        assert_eq!(encode_from(&none), ":n");
        assert_eq!(encode_from(&vec![1_i64, 2_i64]), "[#1#2]");
    }
}
