use crate::error::LoadError;
use crate::field::{FieldSlot, Record};
use crate::keys::EnvPair;
use crate::schema::{Kind, Schema};
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use tracing::trace;

/// A location that can be populated from a tokenized environment variable
pub trait EnvDecode {
    /// Layout of the implementing type
    fn schema() -> Schema
    where
        Self: Sized;

    /// Structural kind of the implementing type, without building its schema
    fn kind() -> Kind
    where
        Self: Sized,
    {
        Self::schema().kind()
    }

    /// Routes the cursor's value to the location its remaining path names
    ///
    /// Returns `Ok(true)` when a value was stored and `Ok(false)` when the
    /// path ended at an unknown record tag and nothing changed.
    fn decode(&mut self, cursor: Cursor<'_>) -> Result<bool, LoadError>;
}

/// Remaining path of one environment variable on its way to a scalar
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    key: &'a str,
    tokens: &'a [String],
    value: &'a str,
}

impl<'a> Cursor<'a> {
    pub fn new(key: &'a str, tokens: &'a [String], value: &'a str) -> Self {
        Self { key, tokens, value }
    }

    /// Cursor at the start of a selected pair's path
    pub fn from_pair(pair: &'a EnvPair) -> Self {
        Self::new(&pair.name, &pair.tokens, &pair.value)
    }

    /// Name of the variable being decoded
    pub fn key(&self) -> &'a str {
        self.key
    }

    pub fn tokens(&self) -> &'a [String] {
        self.tokens
    }

    pub fn value(&self) -> &'a str {
        self.value
    }

    pub fn is_leaf(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Takes the next token, failing when the path ends before `expected`
    pub fn next_token(self, expected: &str) -> Result<(&'a str, Cursor<'a>), LoadError> {
        match self.tokens.split_first() {
            Some((token, rest)) => Ok((token.as_str(), Self { tokens: rest, ..self })),
            None => Err(LoadError::ShapeMismatch {
                key: self.key.to_string(),
                description: format!("path ends before reaching a {}", expected),
            }),
        }
    }

    /// Returns the value, failing when tokens remain below a scalar
    pub fn leaf(self, type_name: &str) -> Result<&'a str, LoadError> {
        match self.tokens.first() {
            None => Ok(self.value),
            Some(token) => Err(LoadError::ShapeMismatch {
                key: self.key.to_string(),
                description: format!("{} value cannot be indexed by '{}'", type_name, token),
            }),
        }
    }

    pub(crate) fn invalid_value(&self, expected: impl Into<String>) -> LoadError {
        LoadError::InvalidValue {
            key: self.key.to_string(),
            value: self.value.to_string(),
            expected: expected.into(),
        }
    }

    fn invalid_index(&self, index: &str) -> LoadError {
        LoadError::InvalidIndex {
            key: self.key.to_string(),
            index: index.to_string(),
        }
    }
}

/// Decodes one pair into a record through its declared tags
///
/// Tokens that match no tag are ignored so a prefix may select variables
/// meant for something else.
pub fn decode_record<R: Record>(record: &mut R, cursor: Cursor<'_>) -> Result<bool, LoadError> {
    let key = cursor.key();
    let (tag, rest) = cursor.next_token("record field")?;
    match record.field(tag) {
        Some(FieldSlot::Decode(slot)) => slot.decode(rest),
        Some(FieldSlot::Opaque(type_name)) => Err(LoadError::UnsupportedKind {
            key: key.to_string(),
            type_name: type_name.to_string(),
        }),
        None => {
            trace!(key, tag, "no field declared for tag, ignoring");
            Ok(false)
        }
    }
}

// Records already stored under a key are updated field by field so
// separate variables can fill in sibling fields. Every other kind is
// decoded into a fresh value that replaces the entry. Nothing is inserted
// unless a value was stored.
macro_rules! decode_mapping_entry {
    ($map:expr, $value_ty:ty, $cursor:expr) => {{
        let (token, rest) = $cursor.next_token("mapping key")?;
        let key = token.to_lowercase();
        if <$value_ty>::kind() == Kind::Record {
            if let Some(slot) = $map.get_mut(&key) {
                return slot.decode(rest);
            }
        }
        let mut slot = <$value_ty>::default();
        if !slot.decode(rest)? {
            return Ok(false);
        }
        $map.insert(key, slot);
        Ok(true)
    }};
}

impl<V, S> EnvDecode for HashMap<String, V, S>
where
    V: EnvDecode + Default,
    S: BuildHasher,
{
    fn schema() -> Schema {
        Schema::Mapping(Box::new(V::schema()))
    }

    fn kind() -> Kind {
        Kind::Mapping
    }

    fn decode(&mut self, cursor: Cursor<'_>) -> Result<bool, LoadError> {
        decode_mapping_entry!(self, V, cursor)
    }
}

impl<V> EnvDecode for BTreeMap<String, V>
where
    V: EnvDecode + Default,
{
    fn schema() -> Schema {
        Schema::Mapping(Box::new(V::schema()))
    }

    fn kind() -> Kind {
        Kind::Mapping
    }

    fn decode(&mut self, cursor: Cursor<'_>) -> Result<bool, LoadError> {
        decode_mapping_entry!(self, V, cursor)
    }
}

impl<T> EnvDecode for Vec<T>
where
    T: EnvDecode + Default,
{
    fn schema() -> Schema {
        Schema::Sequence(Box::new(T::schema()))
    }

    fn kind() -> Kind {
        Kind::Sequence
    }

    fn decode(&mut self, cursor: Cursor<'_>) -> Result<bool, LoadError> {
        let (token, rest) = cursor.next_token("sequence index")?;
        let index: usize = token.parse().map_err(|_| cursor.invalid_index(token))?;

        if index < self.len() {
            return self[index].decode(rest);
        }

        // an index past what can be reserved is rejected, not allocated
        let len = index.checked_add(1).ok_or_else(|| cursor.invalid_index(token))?;
        self.try_reserve(len - self.len())
            .map_err(|_| cursor.invalid_index(token))?;
        let mut element = T::default();
        if !element.decode(rest)? {
            return Ok(false);
        }
        self.resize_with(index, T::default);
        self.push(element);
        Ok(true)
    }
}

impl<T> EnvDecode for Option<T>
where
    T: EnvDecode + Default,
{
    fn schema() -> Schema {
        T::schema()
    }

    fn kind() -> Kind {
        T::kind()
    }

    fn decode(&mut self, cursor: Cursor<'_>) -> Result<bool, LoadError> {
        match self {
            Some(inner) => inner.decode(cursor),
            None => {
                let mut inner = T::default();
                if !inner.decode(cursor)? {
                    return Ok(false);
                }
                *self = Some(inner);
                Ok(true)
            }
        }
    }
}

impl<T> EnvDecode for Box<T>
where
    T: EnvDecode,
{
    fn schema() -> Schema {
        T::schema()
    }

    fn kind() -> Kind {
        T::kind()
    }

    fn decode(&mut self, cursor: Cursor<'_>) -> Result<bool, LoadError> {
        (**self).decode(cursor)
    }
}
