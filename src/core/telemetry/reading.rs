//! Two-state result for metrics that may have no backing source.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A metric reading that is either present or unavailable on this host.
///
/// Absence is an expected outcome (no sensor, no permission, no utility
/// installed), so it is modelled as a value rather than an error. Serializes
/// as the bare value, or `null` when unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SensorReading<T> {
    Value(T),
    #[default]
    Unavailable,
}

impl<T> SensorReading<T> {
    pub fn is_available(&self) -> bool {
        matches!(self, SensorReading::Value(_))
    }

    pub fn as_ref(&self) -> SensorReading<&T> {
        match self {
            SensorReading::Value(v) => SensorReading::Value(v),
            SensorReading::Unavailable => SensorReading::Unavailable,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> SensorReading<U> {
        match self {
            SensorReading::Value(v) => SensorReading::Value(f(v)),
            SensorReading::Unavailable => SensorReading::Unavailable,
        }
    }

    pub fn value(self) -> Option<T> {
        self.into()
    }

    /// Render the value with `f`, or "N/A" when unavailable
    pub fn display_with<F: FnOnce(&T) -> String>(&self, f: F) -> String {
        match self {
            SensorReading::Value(v) => f(v),
            SensorReading::Unavailable => "N/A".to_string(),
        }
    }
}

impl<T> From<Option<T>> for SensorReading<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => SensorReading::Value(v),
            None => SensorReading::Unavailable,
        }
    }
}

impl<T> From<SensorReading<T>> for Option<T> {
    fn from(reading: SensorReading<T>) -> Self {
        match reading {
            SensorReading::Value(v) => Some(v),
            SensorReading::Unavailable => None,
        }
    }
}

impl<T: fmt::Display> fmt::Display for SensorReading<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorReading::Value(v) => v.fmt(f),
            SensorReading::Unavailable => f.write_str("N/A"),
        }
    }
}

impl<T: Serialize> Serialize for SensorReading<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SensorReading::Value(v) => serializer.serialize_some(v),
            SensorReading::Unavailable => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for SensorReading<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(SensorReading::from)
    }
}
