use std::cmp::Ordering;
use std::fmt;

use allocative::Allocative;

use crate::data_type::DataType;

/// Represents a single data value stored in the database.
///
/// This enum wraps all supported Rust types into a single type that can be
/// passed around the engine. An absent value is the explicit [Value::Null],
/// never an empty string.
#[derive(Debug, Clone, Allocative)]
pub enum Value {
    /// A signed integer value.
    Integer(i64),
    /// A UTF-8 string value.
    Text(String),
    /// A 64-bit floating-point value.
    Real(f64),
    /// A boolean value.
    Boolean(bool),
    /// An absent value.
    Null,
}

impl Value {
    /// Returns `true` if the value is [Value::Null].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` when the value counts as missing for a `NOT NULL`
    /// column: an explicit null, or anything that renders as empty text.
    pub fn is_missing(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Returns the inner integer value if this is a [Value::Integer].
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the inner float value if this is a [Value::Real].
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Self::Real(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns a reference to the inner string slice if this is a [Value::Text].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the inner boolean value if this is a [Value::Boolean].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the logical [DataType] corresponding to this value, or `None`
    /// for [Value::Null].
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Self::Null => None,
            Self::Integer(_) => Some(DataType::Integer),
            Self::Text(_) => Some(DataType::Text),
            Self::Real(_) => Some(DataType::Real),
            Self::Boolean(_) => Some(DataType::Boolean),
        }
    }

    /// Sort rank of the value's kind. Follows the on-disk type tags so that
    /// null sorts last.
    fn rank(&self) -> u32 {
        self.data_type().map_or(4, DataType::tag)
    }
}

fn unsigned_zero(real: f64) -> f64 {
    if real == 0.0 { 0.0 } else { real }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    /// Values of the same kind compare by payload, reals by IEEE total order
    /// with `-0.0` folded into `0.0`. Different kinds never compare equal;
    /// they order by kind.
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Integer(l), Self::Integer(r)) => l.cmp(r),
            (Self::Text(l), Self::Text(r)) => l.cmp(r),
            (Self::Real(l), Self::Real(r)) => unsigned_zero(*l).total_cmp(&unsigned_zero(*r)),
            (Self::Boolean(l), Self::Boolean(r)) => l.cmp(r),
            (Self::Null, Self::Null) => Ordering::Equal,
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::Text(s) => f.write_str(s),
            // keep a fractional digit so reals never read as integers
            Self::Real(r) if r.is_finite() && r.fract() == 0.0 => write!(f, "{r:.1}"),
            Self::Real(r) => write!(f, "{r}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Null => f.write_str("NULL"),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_null_and_missing() {
        assert!(Value::Null.is_null());
        assert!(!Value::Text(String::new()).is_null());

        assert!(Value::Null.is_missing());
        assert!(Value::Text(String::new()).is_missing());
        assert!(!Value::Text("x".into()).is_missing());
        assert!(!Value::Integer(0).is_missing());
        assert!(!Value::Boolean(false).is_missing());
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::Integer(42).as_int(), Some(42));
        assert_eq!(Value::Real(1.0).as_int(), None);
        assert_eq!(Value::Real(2.5).as_real(), Some(2.5));
        assert_eq!(Value::Text("hi".into()).as_str(), Some("hi"));
        assert_eq!(Value::Boolean(true).as_bool(), Some(true));
        assert_eq!(Value::Null.as_bool(), None);
    }

    #[test]
    fn test_data_type() {
        assert_eq!(Value::Null.data_type(), None);
        assert_eq!(Value::Integer(1).data_type(), Some(DataType::Integer));
        assert_eq!(Value::Real(1.0).data_type(), Some(DataType::Real));
        assert_eq!(Value::Text("x".into()).data_type(), Some(DataType::Text));
        assert_eq!(Value::Boolean(true).data_type(), Some(DataType::Boolean));
    }

    #[test]
    fn test_equality_requires_same_kind() {
        assert_eq!(Value::Integer(10), Value::Integer(10));
        assert_ne!(Value::Integer(10), Value::Integer(20));
        assert_ne!(Value::Integer(1), Value::Real(1.0));
        assert_ne!(Value::Text("1".into()), Value::Integer(1));
        assert_ne!(Value::Boolean(true), Value::Integer(1));
        assert_eq!(Value::Null, Value::Null);
    }

    #[test]
    fn test_signed_zero_is_one_value() {
        assert_eq!(Value::Real(-0.0), Value::Real(0.0));
        assert!(Value::Real(-0.0) > Value::Real(-1e-300));
        assert_ne!(Value::Real(f64::NAN), Value::Real(0.0));
    }

    #[test]
    fn test_ordering() {
        assert!(Value::Integer(-3) < Value::Integer(2));
        assert!(Value::Text("apple".into()) < Value::Text("banana".into()));
        assert!(Value::Real(-0.5) < Value::Real(0.25));
        assert!(Value::Boolean(false) < Value::Boolean(true));

        // kinds order by tag
        assert!(Value::Integer(i64::MAX) < Value::Text(String::new()));
        assert!(Value::Boolean(true) < Value::Null);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Integer(-7).to_string(), "-7");
        assert_eq!(Value::Text("Ann".into()).to_string(), "Ann");
        assert_eq!(Value::Real(3.25).to_string(), "3.25");
        assert_eq!(Value::Real(2.0).to_string(), "2.0");
        assert_eq!(Value::Boolean(true).to_string(), "true");
        assert_eq!(Value::Boolean(false).to_string(), "false");
        assert_eq!(Value::Null.to_string(), "NULL");
    }

    #[test]
    fn test_conversions() {
        assert_eq!(Value::from(5i64), Value::Integer(5));
        assert_eq!(Value::from("a"), Value::Text("a".into()));
        assert_eq!(Value::from(String::from("b")), Value::Text("b".into()));
        assert_eq!(Value::from(0.5), Value::Real(0.5));
        assert_eq!(Value::from(false), Value::Boolean(false));
    }
}
