use crate::field::{FieldSchema, Record};
use std::fmt;

/// Scalar types a value string can be coerced into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ScalarKind {
    String,
    Bool,
    Int { bits: u32 },
    Uint { bits: u32 },
    Float { bits: u32 },
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Bool => write!(f, "bool"),
            Self::Int { bits } => write!(f, "i{}", bits),
            Self::Uint { bits } => write!(f, "u{}", bits),
            Self::Float { bits } => write!(f, "f{}", bits),
        }
    }
}

/// Structural kind of a target location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Kind {
    Record,
    Mapping,
    Sequence,
    Scalar(ScalarKind),
    Opaque,
}

/// Static description of a target type's layout
#[derive(Debug, Clone)]
pub enum Schema {
    /// Named fields reachable through their tags. Fields are listed on
    /// demand so a record may contain itself through a container.
    Record {
        name: &'static str,
        fields: fn() -> Vec<FieldSchema>,
    },
    /// String keys to a uniform value layout
    Mapping(Box<Schema>),
    /// Indexed, growable elements of a uniform layout
    Sequence(Box<Schema>),
    Scalar(ScalarKind),
    /// A type the decoder does not model
    Opaque(&'static str),
}

impl Schema {
    /// Schema of a record type
    pub fn record<R: Record>() -> Self {
        Schema::Record {
            name: std::any::type_name::<R>(),
            fields: R::fields,
        }
    }

    pub fn kind(&self) -> Kind {
        match self {
            Schema::Record { .. } => Kind::Record,
            Schema::Mapping(_) => Kind::Mapping,
            Schema::Sequence(_) => Kind::Sequence,
            Schema::Scalar(scalar) => Kind::Scalar(*scalar),
            Schema::Opaque(_) => Kind::Opaque,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_display() {
        assert_eq!(ScalarKind::String.to_string(), "string");
        assert_eq!(ScalarKind::Bool.to_string(), "bool");
        assert_eq!(ScalarKind::Int { bits: 8 }.to_string(), "i8");
        assert_eq!(ScalarKind::Uint { bits: 64 }.to_string(), "u64");
        assert_eq!(ScalarKind::Float { bits: 32 }.to_string(), "f32");
    }

    #[test]
    fn test_kind_of_containers() {
        let schema = Schema::Mapping(Box::new(Schema::Sequence(Box::new(Schema::Scalar(
            ScalarKind::Bool,
        )))));
        assert_eq!(schema.kind(), Kind::Mapping);

        if let Schema::Mapping(inner) = schema {
            assert_eq!(inner.kind(), Kind::Sequence);
        }

        assert_eq!(Schema::Opaque("Sender<u8>").kind(), Kind::Opaque);
    }
}
