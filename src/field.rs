use crate::decode::EnvDecode;
use crate::schema::Schema;

/// A record with fields addressed by explicit tags
///
/// Usually implemented by [`define_config!`](crate::define_config), but a hand
/// written table works the same way:
///
/// ```rust
/// use envtree::{Cursor, EnvDecode, FieldSchema, FieldSlot, LoadError, Record, Schema};
///
/// #[derive(Default)]
/// struct Server {
///     port: u16,
/// }
///
/// impl Record for Server {
///     fn field(&mut self, tag: &str) -> Option<FieldSlot<'_>> {
///         match tag {
///             "PORT" => Some(FieldSlot::Decode(&mut self.port)),
///             _ => None,
///         }
///     }
///
///     fn fields() -> Vec<FieldSchema> {
///         vec![FieldSchema::new("PORT", "Listen port", u16::schema())]
///     }
/// }
///
/// impl EnvDecode for Server {
///     fn schema() -> Schema {
///         Schema::record::<Self>()
///     }
///
///     fn decode(&mut self, cursor: Cursor<'_>) -> Result<bool, LoadError> {
///         envtree::decode_record(self, cursor)
///     }
/// }
///
/// let mut server = Server::default();
/// envtree::load_pairs("app", [("APP_PORT", "8080")], &mut server).unwrap();
/// assert_eq!(server.port, 8080);
/// ```
pub trait Record {
    /// Looks up the field declared with `tag`, matched case-sensitively
    fn field(&mut self, tag: &str) -> Option<FieldSlot<'_>>;

    /// Describes every declared field
    fn fields() -> Vec<FieldSchema>;
}

/// Access to a single record field
pub enum FieldSlot<'a> {
    Decode(&'a mut dyn EnvDecode),
    /// The field exists but its type cannot be loaded from the environment
    Opaque(&'static str),
}

/// Description of a declared record field
#[derive(Debug, Clone)]
pub struct FieldSchema {
    /// Tag matched against the path token
    pub tag: &'static str,
    /// Human-readable description of what this field configures
    pub description: &'static str,
    pub schema: Schema,
}

impl FieldSchema {
    pub fn new(tag: &'static str, description: &'static str, schema: Schema) -> Self {
        Self {
            tag,
            description,
            schema,
        }
    }
}
