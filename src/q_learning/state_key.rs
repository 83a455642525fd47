//! Canonical encoding of game states into table keys
//!
//! Every state is first lowered into a [`StateValue`] tree and then written
//! out as compact JSON with object keys sorted. The text is the key, so two
//! states that compare equal as values always land in the same table row no
//! matter how their fields were ordered in memory.

use std::{
    collections::{BTreeMap, HashMap},
    fmt::Write,
};

use serde::Serialize;
use serde_json::Value;

use crate::{Result, error::Error, types::StateKey};

/// Tagged representation of a state before it is turned into a key.
#[derive(Debug, Clone, PartialEq)]
pub enum StateValue {
    Unit,
    Bool(bool),
    Int(i64),
    /// Only for integers above `i64::MAX`; see [`StateValue::integer`].
    UInt(u64),
    Float(f64),
    Str(String),
    Seq(Vec<StateValue>),
    Map(BTreeMap<String, StateValue>),
}

impl StateValue {
    pub fn str(value: impl Into<String>) -> Self {
        StateValue::Str(value.into())
    }

    /// Integer in its one canonical variant: `Int` whenever the value fits
    /// in `i64`, `UInt` above that.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`] below `i64::MIN` or above `u64::MAX`.
    pub fn integer(value: i128) -> Result<Self> {
        if let Ok(value) = i64::try_from(value) {
            Ok(StateValue::Int(value))
        } else if let Ok(value) = u64::try_from(value) {
            Ok(StateValue::UInt(value))
        } else {
            Err(Error::Encoding {
                message: format!("integer {value} is out of range"),
            })
        }
    }

    fn write_canonical(&self, out: &mut String) -> Result<()> {
        match self {
            StateValue::Unit => out.push_str("null"),
            StateValue::Bool(value) => out.push_str(if *value { "true" } else { "false" }),
            StateValue::Int(value) => {
                let _ = write!(out, "{value}");
            }
            StateValue::UInt(value) => {
                let _ = write!(out, "{value}");
            }
            StateValue::Float(value) => {
                if !value.is_finite() {
                    return Err(Error::Encoding {
                        message: format!("non-finite float {value}"),
                    });
                }
                // -0.0 and 0.0 are the same state
                let value = if *value == 0.0 { 0.0 } else { *value };
                out.push_str(&serde_json::to_string(&value)?);
            }
            StateValue::Str(value) => out.push_str(&serde_json::to_string(value)?),
            StateValue::Seq(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    item.write_canonical(out)?;
                }
                out.push(']');
            }
            StateValue::Map(entries) => {
                out.push('{');
                for (i, (key, item)) in entries.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    out.push_str(&serde_json::to_string(key)?);
                    out.push(':');
                    item.write_canonical(out)?;
                }
                out.push('}');
            }
        }
        Ok(())
    }
}

impl TryFrom<Value> for StateValue {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        Ok(match value {
            Value::Null => StateValue::Unit,
            Value::Bool(value) => StateValue::Bool(value),
            Value::Number(number) => {
                if let Some(value) = number.as_i64() {
                    StateValue::Int(value)
                } else if let Some(value) = number.as_u64() {
                    StateValue::UInt(value)
                } else {
                    let value = number.as_f64().ok_or_else(|| Error::Encoding {
                        message: format!("unrepresentable number {number}"),
                    })?;
                    StateValue::Float(value)
                }
            }
            Value::String(value) => StateValue::Str(value),
            Value::Array(items) => StateValue::Seq(
                items
                    .into_iter()
                    .map(StateValue::try_from)
                    .collect::<Result<_>>()?,
            ),
            Value::Object(entries) => StateValue::Map(
                entries
                    .into_iter()
                    .map(|(key, item)| Ok((key, StateValue::try_from(item)?)))
                    .collect::<Result<_>>()?,
            ),
        })
    }
}

/// Anything that can be turned into a table key.
///
/// Game drivers implement this for their own state types; the common
/// primitive and container types are covered here.
pub trait Encodable {
    fn state_value(&self) -> Result<StateValue>;
}

/// Encode a state into its canonical key.
///
/// # Errors
///
/// Returns [`Error::Encoding`] if the state holds something that has no
/// canonical form (a non-finite float).
pub fn encode<S: Encodable + ?Sized>(state: &S) -> Result<StateKey> {
    let value = state.state_value()?;
    let mut out = String::new();
    value.write_canonical(&mut out)?;
    Ok(StateKey::from_raw(out))
}

/// Encode any serde-serializable state.
///
/// Structs become maps keyed by field name, so field order never matters.
///
/// # Errors
///
/// Returns [`Error::Encoding`] if serde cannot represent the value as JSON
/// (for example a map whose keys are not strings).
pub fn encode_serialize<T: Serialize + ?Sized>(state: &T) -> Result<StateKey> {
    let value = serde_json::to_value(state).map_err(|e| Error::Encoding {
        message: e.to_string(),
    })?;
    encode(&StateValue::try_from(value)?)
}

impl Encodable for StateValue {
    fn state_value(&self) -> Result<StateValue> {
        Ok(self.clone())
    }
}

impl<T: Encodable + ?Sized> Encodable for &T {
    fn state_value(&self) -> Result<StateValue> {
        (**self).state_value()
    }
}

impl Encodable for str {
    fn state_value(&self) -> Result<StateValue> {
        Ok(StateValue::str(self))
    }
}

impl Encodable for String {
    fn state_value(&self) -> Result<StateValue> {
        Ok(StateValue::str(self.as_str()))
    }
}

impl Encodable for bool {
    fn state_value(&self) -> Result<StateValue> {
        Ok(StateValue::Bool(*self))
    }
}

impl Encodable for f64 {
    fn state_value(&self) -> Result<StateValue> {
        Ok(StateValue::Float(*self))
    }
}

macro_rules! encodable_int {
    ($($ty:ty),*) => {
        $(
            impl Encodable for $ty {
                fn state_value(&self) -> Result<StateValue> {
                    let value = i128::try_from(*self).map_err(|_| Error::Encoding {
                        message: format!("integer {} is out of range", self),
                    })?;
                    StateValue::integer(value)
                }
            }
        )*
    };
}

encodable_int!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

impl<T: Encodable> Encodable for Option<T> {
    fn state_value(&self) -> Result<StateValue> {
        match self {
            Some(value) => value.state_value(),
            None => Ok(StateValue::Unit),
        }
    }
}

impl<T: Encodable> Encodable for [T] {
    fn state_value(&self) -> Result<StateValue> {
        Ok(StateValue::Seq(
            self.iter()
                .map(Encodable::state_value)
                .collect::<Result<_>>()?,
        ))
    }
}

impl<T: Encodable> Encodable for Vec<T> {
    fn state_value(&self) -> Result<StateValue> {
        self.as_slice().state_value()
    }
}

impl<T: Encodable, const N: usize> Encodable for [T; N] {
    fn state_value(&self) -> Result<StateValue> {
        self.as_slice().state_value()
    }
}

impl<A: Encodable, B: Encodable> Encodable for (A, B) {
    fn state_value(&self) -> Result<StateValue> {
        Ok(StateValue::Seq(vec![
            self.0.state_value()?,
            self.1.state_value()?,
        ]))
    }
}

impl<A: Encodable, B: Encodable, C: Encodable> Encodable for (A, B, C) {
    fn state_value(&self) -> Result<StateValue> {
        Ok(StateValue::Seq(vec![
            self.0.state_value()?,
            self.1.state_value()?,
            self.2.state_value()?,
        ]))
    }
}

impl<T: Encodable> Encodable for BTreeMap<String, T> {
    fn state_value(&self) -> Result<StateValue> {
        Ok(StateValue::Map(
            self.iter()
                .map(|(key, value)| Ok((key.clone(), value.state_value()?)))
                .collect::<Result<_>>()?,
        ))
    }
}

impl<T: Encodable, H: std::hash::BuildHasher> Encodable for HashMap<String, T, H> {
    fn state_value(&self) -> Result<StateValue> {
        Ok(StateValue::Map(
            self.iter()
                .map(|(key, value)| Ok((key.clone(), value.state_value()?)))
                .collect::<Result<_>>()?,
        ))
    }
}
