//! Value types.
//!
//! A value is a closed sum type: one variant per kind, each holding exactly
//! one immutable payload.

use std::hash::{Hash, Hasher};

use num_bigint::BigInt;

use crate::expression::Expression;
use crate::model::BigDecimal;

/// Value kinds and their wire tag bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Kind {
    BigDecimal = b'd',
    BigInteger = b'i',
    Boolean = b'Z',
    Bytes = b'b',
    Double = b'D',
    Expression = b'e',
    Int = b'I',
    List = b'l',
    Long = b'J',
    Object = b'o',
    Property = b'p',
    String = b's',
    Undefined = b'u',
}

impl Kind {
    /// Creates a Kind from its wire tag.
    pub fn from_u8(v: u8) -> Option<Kind> {
        match v {
            b'd' => Some(Kind::BigDecimal),
            b'i' => Some(Kind::BigInteger),
            b'Z' => Some(Kind::Boolean),
            b'b' => Some(Kind::Bytes),
            b'D' => Some(Kind::Double),
            b'e' => Some(Kind::Expression),
            b'I' => Some(Kind::Int),
            b'l' => Some(Kind::List),
            b'J' => Some(Kind::Long),
            b'o' => Some(Kind::Object),
            b'p' => Some(Kind::Property),
            b's' => Some(Kind::String),
            b'u' => Some(Kind::Undefined),
            _ => None,
        }
    }

    /// Returns the wire tag.
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Returns the upper-case kind name (e.g. `BIG_DECIMAL`).
    pub fn name(self) -> &'static str {
        match self {
            Kind::BigDecimal => "BIG_DECIMAL",
            Kind::BigInteger => "BIG_INTEGER",
            Kind::Boolean => "BOOLEAN",
            Kind::Bytes => "BYTES",
            Kind::Double => "DOUBLE",
            Kind::Expression => "EXPRESSION",
            Kind::Int => "INT",
            Kind::List => "LIST",
            Kind::Long => "LONG",
            Kind::Object => "OBJECT",
            Kind::Property => "PROPERTY",
            Kind::String => "STRING",
            Kind::Undefined => "UNDEFINED",
        }
    }

    /// Per-kind salt mixed into value hashes.
    fn hash_salt(self) -> u32 {
        match self {
            Kind::BigDecimal => 0x5bd1_e995,
            Kind::BigInteger => 0x27d4_eb2f,
            Kind::Boolean => 0x1656_67b1,
            Kind::Bytes => 71,
            Kind::Double => 0x85eb_ca6b,
            Kind::Expression => 0xc2b2_ae35,
            Kind::Int => 0x9e37_79b9,
            Kind::List => 0x7f4a_7c15,
            Kind::Long => 0x94d0_49bb,
            Kind::Object => 0xbf58_476d,
            Kind::Property => 0x2545_f491,
            Kind::String => 0x6c8e_9cf5,
            Kind::Undefined => 0x3c6e_f372,
        }
    }
}

/// Immutable byte payload.
///
/// The bytes are never handed out by mutable reference, and every owned read
/// ([`Blob::to_vec`]) returns a fresh copy the caller may modify freely.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Blob(Box<[u8]>);

impl Blob {
    /// Copies `bytes` into a new blob.
    pub fn new(bytes: &[u8]) -> Self {
        Self(bytes.into())
    }

    /// Returns the number of bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the blob holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a fresh, independently owned copy of the bytes.
    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    pub(crate) fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Blob {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes.into_boxed_slice())
    }
}

/// A typed value.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// Boolean value.
    Boolean(bool),

    /// 32-bit signed integer.
    Int(i32),

    /// 64-bit signed integer.
    Long(i64),

    /// 64-bit IEEE 754 float. NaN is allowed; equality compares bit patterns.
    Double(f64),

    /// Arbitrary-precision decimal.
    BigDecimal(BigDecimal),

    /// Arbitrary-precision integer.
    BigInteger(BigInt),

    /// Opaque byte array.
    Bytes(Blob),

    /// UTF-8 text.
    String(String),

    /// Ordered sequence of values.
    List(Vec<Value>),

    /// Ordered key/value entries. Insertion order is kept and keys may repeat.
    Object(Vec<(String, Value)>),

    /// Single named value.
    Property { name: String, value: Box<Value> },

    /// Unresolved `${...}` expression.
    Expression(Expression),

    /// Absence of a value.
    #[default]
    Undefined,
}

impl Value {
    /// Returns the kind of this value.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Boolean(_) => Kind::Boolean,
            Value::Int(_) => Kind::Int,
            Value::Long(_) => Kind::Long,
            Value::Double(_) => Kind::Double,
            Value::BigDecimal(_) => Kind::BigDecimal,
            Value::BigInteger(_) => Kind::BigInteger,
            Value::Bytes(_) => Kind::Bytes,
            Value::String(_) => Kind::String,
            Value::List(_) => Kind::List,
            Value::Object(_) => Kind::Object,
            Value::Property { .. } => Kind::Property,
            Value::Expression(_) => Kind::Expression,
            Value::Undefined => Kind::Undefined,
        }
    }

    /// Returns true for every kind except undefined.
    pub fn is_defined(&self) -> bool {
        !matches!(self, Value::Undefined)
    }

    /// Builds a property value.
    pub fn property(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Value::Property {
            name: name.into(),
            value: Box::new(value.into()),
        }
    }

    /// Builds an object from `(key, value)` entries, keeping their order.
    pub fn object<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Value::Object(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Builds a list.
    pub fn list<V, I>(items: I) -> Self
    where
        V: Into<Value>,
        I: IntoIterator<Item = V>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    /// Builds an expression value from its raw text.
    pub fn expression(raw: impl Into<String>) -> Self {
        Value::Expression(Expression::new(raw))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a.to_bits() == b.to_bits(),
            (Value::BigDecimal(a), Value::BigDecimal(b)) => a == b,
            (Value::BigInteger(a), Value::BigInteger(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (
                Value::Property { name: n1, value: v1 },
                Value::Property { name: n2, value: v2 },
            ) => n1 == n2 && v1 == v2,
            (Value::Expression(a), Value::Expression(b)) => a == b,
            (Value::Undefined, Value::Undefined) => true,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.kind().hash_salt());
        match self {
            Value::Boolean(v) => v.hash(state),
            Value::Int(v) => v.hash(state),
            Value::Long(v) => v.hash(state),
            Value::Double(v) => v.to_bits().hash(state),
            Value::BigDecimal(v) => v.hash(state),
            Value::BigInteger(v) => v.hash(state),
            Value::Bytes(v) => v.hash(state),
            Value::String(v) => v.hash(state),
            Value::List(v) => v.hash(state),
            Value::Object(v) => v.hash(state),
            Value::Property { name, value } => {
                name.hash(state);
                value.hash(state);
            }
            Value::Expression(v) => v.hash(state),
            Value::Undefined => {}
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Long(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<BigDecimal> for Value {
    fn from(v: BigDecimal) -> Self {
        Value::BigDecimal(v)
    }
}

impl From<BigInt> for Value {
    fn from(v: BigInt) -> Self {
        Value::BigInteger(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(Blob::from(v))
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(Blob::new(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Expression> for Value {
    fn from(v: Expression) -> Self {
        Value::Expression(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}
