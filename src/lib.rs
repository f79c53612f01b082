//! Populate nested, strongly-typed configuration from prefixed environment variables.
//!
//! A variable named `PREFIX_A_B_C` is split into the path `A`, `B`, `C` below the
//! prefix. Each token walks one level into the target: a record field by its
//! declared tag, a mapping entry by its lower-cased key, or a sequence element
//! by its index. The value is coerced into the scalar at the end of the path.
//!
//! ```rust
//! use std::collections::HashMap;
//! use envtree::define_config;
//!
//! define_config! {
//!     #[derive(Debug, Default)]
//!     pub struct Upstream {
//!         #[field(env = "URL", doc = "Base URL of the upstream")]
//!         pub url: String,
//!
//!         #[field(env = "RETRIES", doc = "Retry budget per request")]
//!         pub retries: u8,
//!     }
//! }
//!
//! define_config! {
//!     #[derive(Debug, Default)]
//!     pub struct Proxy {
//!         #[field(env = "DEBUG", doc = "Verbose request logging")]
//!         pub debug: bool,
//!
//!         #[field(env = "UPSTREAMS", doc = "Upstreams by name")]
//!         pub upstreams: HashMap<String, Upstream>,
//!     }
//! }
//!
//! let mut proxy = Proxy::default();
//! envtree::load_entries(
//!     "proxy",
//!     [
//!         "PROXY_DEBUG=yes",
//!         "PROXY_UPSTREAMS_AUTH_URL=http://auth:8080",
//!         "PROXY_UPSTREAMS_AUTH_RETRIES=3",
//!     ],
//!     &mut proxy,
//! )
//! .unwrap();
//!
//! assert!(proxy.debug);
//! assert_eq!(proxy.upstreams["auth"].url, "http://auth:8080");
//! assert_eq!(proxy.upstreams["auth"].retries, 3);
//! ```

extern crate self as envtree;

pub mod decode;
pub mod docs;
pub mod error;
pub mod field;
pub mod keys;
pub mod loader;
pub mod scalar;
pub mod schema;

// Re-export main types
pub use decode::{Cursor, EnvDecode, decode_record};
pub use docs::{KeyDoc, describe, render_markdown, write_docs};
pub use error::{LoadError, format_load_error};
pub use field::{FieldSchema, FieldSlot, Record};
pub use keys::{ENV_ASSIGNER, ENV_DELIMITER, EnvPair};
pub use loader::{Load, Loader, get_env, load, load_entries, load_pairs};
pub use scalar::parse_bool;
pub use schema::{Kind, ScalarKind, Schema};

// Re-export macro
pub use envtree_macros::define_config;
