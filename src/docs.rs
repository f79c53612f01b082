use crate::decode::EnvDecode;
use crate::keys::ENV_DELIMITER;
use crate::schema::Schema;
use std::{fs, path::Path};

/// One documented environment variable pattern
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct KeyDoc {
    /// Variable name with placeholders, e.g. `APP_HOSTS_<N>_PORT`
    pub pattern: String,
    /// Scalar type the value is coerced into
    pub kind: String,
    /// Description of the closest documented field
    pub description: String,
}

/// Lists every variable pattern that reaches a scalar of `T`
///
/// # Example
/// ```rust
/// use std::collections::HashMap;
///
/// let docs = envtree::describe::<HashMap<String, Vec<u16>>>("app");
/// assert_eq!(docs[0].pattern, "APP_<KEY>_<N>");
/// assert_eq!(docs[0].kind, "u16");
/// ```
pub fn describe<T: EnvDecode>(prefix: &str) -> Vec<KeyDoc> {
    let mut docs = Vec::new();
    let mut records = Vec::new();
    walk(
        &T::schema(),
        prefix.to_uppercase(),
        "",
        &mut records,
        &mut docs,
    );
    docs
}

fn walk(
    schema: &Schema,
    pattern: String,
    description: &str,
    records: &mut Vec<&'static str>,
    docs: &mut Vec<KeyDoc>,
) {
    match schema {
        Schema::Record { name, fields } => {
            // a record reachable from itself is documented once
            if records.contains(name) {
                return;
            }
            records.push(*name);
            for field in fields() {
                let description = if field.description.is_empty() {
                    description
                } else {
                    field.description
                };
                walk(
                    &field.schema,
                    format!("{}{}{}", pattern, ENV_DELIMITER, field.tag),
                    description,
                    records,
                    docs,
                );
            }
            records.pop();
        }
        Schema::Mapping(inner) => walk(
            inner,
            format!("{}{}<KEY>", pattern, ENV_DELIMITER),
            description,
            records,
            docs,
        ),
        Schema::Sequence(inner) => walk(
            inner,
            format!("{}{}<N>", pattern, ENV_DELIMITER),
            description,
            records,
            docs,
        ),
        Schema::Scalar(kind) => docs.push(KeyDoc {
            pattern,
            kind: kind.to_string(),
            description: description.to_string(),
        }),
        Schema::Opaque(_) => {}
    }
}

/// Renders documented patterns as a markdown summary table
pub fn render_markdown(docs: &[KeyDoc]) -> String {
    let mut md = String::new();

    md.push_str("## Environment Variables Summary\n\n");
    md.push_str("| Variable | Type | Description |\n");
    md.push_str("|----------|------|-------------|\n");
    for doc in docs {
        let description = if doc.description.is_empty() {
            "-"
        } else {
            doc.description.as_str()
        };
        md.push_str(&format!(
            "| `{}` | {} | {} |\n",
            doc.pattern, doc.kind, description
        ));
    }

    md
}

/// Write configuration documentation for `T` to a markdown file
///
/// # Example
/// ```no_run
/// use std::collections::HashMap;
///
/// envtree::write_docs::<HashMap<String, String>>("app", "CONFIG.md").unwrap();
/// ```
pub fn write_docs<T: EnvDecode>(prefix: &str, path: impl AsRef<Path>) -> std::io::Result<()> {
    fs::write(path, render_markdown(&describe::<T>(prefix)))
}
