use crate::decode::{Cursor, EnvDecode};
use crate::error::LoadError;
use crate::schema::{ScalarKind, Schema};

const BOOL_EXPECTED: &str = "bool (true, t, 1, yes, y, false, f, 0, no, n)";

/// Parses the accepted boolean spellings, ignoring case
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "y" => Some(true),
        "false" | "f" | "0" | "no" | "n" => Some(false),
        _ => None,
    }
}

fn is_infinity_literal(value: &str) -> bool {
    let unsigned = value.trim_start_matches(['+', '-']);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

impl EnvDecode for String {
    fn schema() -> Schema {
        Schema::Scalar(ScalarKind::String)
    }

    fn decode(&mut self, cursor: Cursor<'_>) -> Result<bool, LoadError> {
        *self = cursor.leaf("string")?.to_string();
        Ok(true)
    }
}

impl EnvDecode for bool {
    fn schema() -> Schema {
        Schema::Scalar(ScalarKind::Bool)
    }

    fn decode(&mut self, cursor: Cursor<'_>) -> Result<bool, LoadError> {
        let value = cursor.leaf("bool")?;
        *self = parse_bool(value).ok_or_else(|| cursor.invalid_value(BOOL_EXPECTED))?;
        Ok(true)
    }
}

macro_rules! impl_signed {
    ($($ty:ty),*) => {$(
        impl EnvDecode for $ty {
            fn schema() -> Schema {
                Schema::Scalar(ScalarKind::Int { bits: <$ty>::BITS })
            }

            fn decode(&mut self, cursor: Cursor<'_>) -> Result<bool, LoadError> {
                let value = cursor.leaf(stringify!($ty))?;
                *self = value
                    .parse()
                    .map_err(|_| cursor.invalid_value(stringify!($ty)))?;
                Ok(true)
            }
        }
    )*};
}

// Rust's integer parsing tolerates a leading '+', unsigned values take no sign.
macro_rules! impl_unsigned {
    ($($ty:ty),*) => {$(
        impl EnvDecode for $ty {
            fn schema() -> Schema {
                Schema::Scalar(ScalarKind::Uint { bits: <$ty>::BITS })
            }

            fn decode(&mut self, cursor: Cursor<'_>) -> Result<bool, LoadError> {
                let value = cursor.leaf(stringify!($ty))?;
                if value.starts_with(['+', '-']) {
                    return Err(cursor.invalid_value(stringify!($ty)));
                }
                *self = value
                    .parse()
                    .map_err(|_| cursor.invalid_value(stringify!($ty)))?;
                Ok(true)
            }
        }
    )*};
}

macro_rules! impl_float {
    ($($ty:ty => $bits:expr),*) => {$(
        impl EnvDecode for $ty {
            fn schema() -> Schema {
                Schema::Scalar(ScalarKind::Float { bits: $bits })
            }

            fn decode(&mut self, cursor: Cursor<'_>) -> Result<bool, LoadError> {
                let value = cursor.leaf(stringify!($ty))?;
                let parsed: $ty = value
                    .parse()
                    .map_err(|_| cursor.invalid_value(stringify!($ty)))?;
                // finite literals out of range parse as infinity
                if parsed.is_infinite() && !is_infinity_literal(value) {
                    return Err(cursor.invalid_value(stringify!($ty)));
                }
                *self = parsed;
                Ok(true)
            }
        }
    )*};
}

impl_signed!(i8, i16, i32, i64, isize);
impl_unsigned!(u8, u16, u32, u64, usize);
impl_float!(f32 => 32, f64 => 64);
