use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A cell value.
///
/// Collections are stored whole: a set or map cell holds its elements sorted
/// and deduplicated, so two cells with the same logical contents compare equal.
/// Deserialized sets and maps are normalized the same way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
    Boolean(bool),
    Blob(Vec<u8>),
    List(Vec<Value>),
    #[serde(deserialize_with = "deserialize_set")]
    Set(Vec<Value>),
    #[serde(deserialize_with = "deserialize_map")]
    Map(Vec<(Value, Value)>),
}

impl Value {
    pub fn set(elements: impl IntoIterator<Item = Value>) -> Self {
        Self::Set(sorted_elements(elements))
    }

    pub fn list(elements: impl IntoIterator<Item = Value>) -> Self {
        Self::List(elements.into_iter().collect())
    }

    /// Builds a map; a repeated key keeps the last entry given.
    pub fn map(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        Self::Map(sorted_entries(entries))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "NULL",
            Self::Integer(_) => "INTEGER",
            Self::Float(_) => "FLOAT",
            Self::Text(_) => "TEXT",
            Self::Boolean(_) => "BOOLEAN",
            Self::Blob(_) => "BLOB",
            Self::List(_) => "LIST",
            Self::Set(_) => "SET",
            Self::Map(_) => "MAP",
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, Self::List(_) | Self::Set(_) | Self::Map(_))
    }

    fn type_rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Boolean(_) => 1,
            Self::Integer(_) => 2,
            Self::Float(_) => 3,
            Self::Text(_) => 4,
            Self::Blob(_) => 5,
            Self::List(_) => 6,
            Self::Set(_) => 7,
            Self::Map(_) => 8,
        }
    }
}

fn sorted_elements(elements: impl IntoIterator<Item = Value>) -> Vec<Value> {
    let mut elements: Vec<Value> = elements.into_iter().collect();
    elements.sort();
    elements.dedup();
    elements
}

fn sorted_entries(entries: impl IntoIterator<Item = (Value, Value)>) -> Vec<(Value, Value)> {
    let mut sorted: Vec<(Value, Value)> = Vec::new();
    for (key, value) in entries {
        match sorted.binary_search_by(|(k, _)| k.cmp(&key)) {
            Ok(pos) => sorted[pos].1 = value,
            Err(pos) => sorted.insert(pos, (key, value)),
        }
    }
    sorted
}

fn deserialize_set<'de, D>(deserializer: D) -> std::result::Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<Value>::deserialize(deserializer).map(sorted_elements)
}

fn deserialize_map<'de, D>(deserializer: D) -> std::result::Result<Vec<(Value, Value)>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<(Value, Value)>::deserialize(deserializer).map(sorted_entries)
}

// Total order: NULL first, then by type, then by payload. Floats use IEEE
// total ordering so row keys and tie-breaks never see an incomparable pair.
impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Null, Self::Null) => Ordering::Equal,
            (Self::Integer(a), Self::Integer(b)) => a.cmp(b),
            (Self::Float(a), Self::Float(b)) => a.total_cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Boolean(a), Self::Boolean(b)) => a.cmp(b),
            (Self::Blob(a), Self::Blob(b)) => a.cmp(b),
            (Self::List(a), Self::List(b)) | (Self::Set(a), Self::Set(b)) => a.cmp(b),
            (Self::Map(a), Self::Map(b)) => a.cmp(b),
            _ => self.type_rank().cmp(&other.type_rank()),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_rank().hash(state);
        match self {
            Self::Null => {}
            Self::Integer(i) => i.hash(state),
            Self::Float(f) => f.to_bits().hash(state),
            Self::Text(s) => s.hash(state),
            Self::Boolean(b) => b.hash(state),
            Self::Blob(bytes) => bytes.hash(state),
            Self::List(items) | Self::Set(items) => items.hash(state),
            Self::Map(entries) => entries.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Float(fl) => write!(f, "{}", fl),
            Self::Text(s) => write!(f, "{}", s),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Blob(bytes) => {
                write!(f, "0x")?;
                for byte in bytes {
                    write!(f, "{:02x}", byte)?;
                }
                Ok(())
            }
            Self::List(items) => write_joined(f, "[", items.iter(), "]"),
            Self::Set(items) => write_joined(f, "{", items.iter(), "}"),
            Self::Map(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
        }
    }
}

fn write_joined<'a>(
    f: &mut fmt::Formatter<'_>,
    open: &str,
    items: impl Iterator<Item = &'a Value>,
    close: &str,
) -> fmt::Result {
    write!(f, "{}", open)?;
    for (i, item) in items.enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    write!(f, "{}", close)
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Blob(bytes)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Integer,
    Float,
    Text,
    Boolean,
    Blob,
    List(Box<DataType>),
    Set(Box<DataType>),
    Map(Box<DataType>, Box<DataType>),
}

impl DataType {
    pub fn list(element: DataType) -> Self {
        Self::List(Box::new(element))
    }

    pub fn set(element: DataType) -> Self {
        Self::Set(Box::new(element))
    }

    pub fn map(key: DataType, value: DataType) -> Self {
        Self::Map(Box::new(key), Box::new(value))
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, Self::List(_) | Self::Set(_) | Self::Map(_, _))
    }

    pub fn is_compatible(&self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) => true,
            (Self::Integer, Value::Integer(_)) => true,
            (Self::Float, Value::Float(_)) => true,
            (Self::Float, Value::Integer(_)) => true,
            (Self::Text, Value::Text(_)) => true,
            (Self::Boolean, Value::Boolean(_)) => true,
            (Self::Blob, Value::Blob(_)) => true,
            (Self::List(element), Value::List(items)) | (Self::Set(element), Value::Set(items)) => {
                items.iter().all(|item| !item.is_null() && element.is_compatible(item))
            }
            (Self::Map(key, val), Value::Map(entries)) => entries
                .iter()
                .all(|(k, v)| !k.is_null() && key.is_compatible(k) && val.is_compatible(v)),
            _ => false,
        }
    }

    /// Converts a compatible value into this type's stored form: integers
    /// widen to floats in float positions, and sets and maps are re-sorted
    /// afterwards since widening can merge elements.
    pub fn coerce(&self, value: Value) -> Value {
        match (self, value) {
            (Self::Float, Value::Integer(i)) => Value::Float(i as f64),
            (Self::List(element), Value::List(items)) => {
                Value::list(items.into_iter().map(|item| element.coerce(item)))
            }
            (Self::Set(element), Value::Set(items)) => {
                Value::set(items.into_iter().map(|item| element.coerce(item)))
            }
            (Self::Map(key, val), Value::Map(entries)) => Value::map(
                entries
                    .into_iter()
                    .map(|(k, v)| (key.coerce(k), val.coerce(v))),
            ),
            (_, value) => value,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer => write!(f, "INTEGER"),
            Self::Float => write!(f, "FLOAT"),
            Self::Text => write!(f, "TEXT"),
            Self::Boolean => write!(f, "BOOLEAN"),
            Self::Blob => write!(f, "BLOB"),
            Self::List(element) => write!(f, "LIST<{}>", element),
            Self::Set(element) => write!(f, "SET<{}>", element),
            Self::Map(key, value) => write!(f, "MAP<{}, {}>", key, value),
        }
    }
}
