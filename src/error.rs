use colored::Colorize;
use std::fmt;

/// Errors that can occur while loading configuration from the environment
///
/// Every error is fatal for the load call that produced it. Pairs decoded
/// before the failing one stay applied to the target.
#[derive(Debug, Clone)]
pub enum LoadError {
    /// The configuration prefix cannot select any variable
    InvalidPrefix { prefix: String },
    /// The variable addresses a field whose type the decoder does not model
    UnsupportedKind { key: String, type_name: String },
    /// The variable's path is longer or shorter than the target's nesting
    ShapeMismatch { key: String, description: String },
    /// A sequence index in the variable's path is not a non-negative integer
    /// or is too large to grow the sequence to
    InvalidIndex { key: String, index: String },
    /// The value cannot be coerced into the scalar type at the end of the path
    InvalidValue {
        key: String,
        value: String,
        expected: String,
    },
}

impl LoadError {
    /// Name of the environment variable that caused the error, if any
    pub fn key(&self) -> Option<&str> {
        match self {
            LoadError::InvalidPrefix { .. } => None,
            LoadError::UnsupportedKind { key, .. }
            | LoadError::ShapeMismatch { key, .. }
            | LoadError::InvalidIndex { key, .. }
            | LoadError::InvalidValue { key, .. } => Some(key.as_str()),
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::InvalidPrefix { prefix } => {
                writeln!(
                    f,
                    "{}: Is not a valid configuration prefix",
                    format!("'{}'", prefix).magenta().bold()
                )?;
                writeln!(f, "\tDescription: prefix must be non-empty and must not contain '='")
            }
            LoadError::UnsupportedKind { key, type_name } => {
                writeln!(
                    f,
                    "{}: Targets a field of unsupported type {}",
                    key.magenta().bold(),
                    type_name.red()
                )
            }
            LoadError::ShapeMismatch { key, description } => {
                writeln!(
                    f,
                    "{}: Does not match the configuration layout",
                    key.magenta().bold()
                )?;
                writeln!(f, "\tDescription: {}", description)
            }
            LoadError::InvalidIndex { key, index } => {
                writeln!(
                    f,
                    "{}: Invalid sequence index {}",
                    key.magenta().bold(),
                    format!("'{}'", index).red(),
                )?;
                writeln!(f, "\tExpected: a non-negative integer within memory limits")
            }
            LoadError::InvalidValue {
                key,
                value,
                expected,
            } => {
                writeln!(
                    f,
                    "{}: Invalid value {}",
                    key.magenta().bold(),
                    format!("'{}'", value).red(),
                )?;
                writeln!(f, "\tExpected: {}", expected.cyan())
            }
        }
    }
}

impl std::error::Error for LoadError {}

/// Helper to format a load error into a panic message
pub fn format_load_error(error: &LoadError) -> String {
    format!("{} {}", "Configuration failed:".yellow().bold(), error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_value_display() {
        colored::control::set_override(false);

        let error = LoadError::InvalidValue {
            key: "APP_PORT".to_string(),
            value: "not-a-number".to_string(),
            expected: "u16".to_string(),
        };

        let output = error.to_string();
        assert!(output.contains("APP_PORT:"));
        assert!(output.contains("Invalid value 'not-a-number'"));
        assert!(output.contains("Expected: u16"));
    }

    #[test]
    fn test_invalid_index_display() {
        colored::control::set_override(false);

        let error = LoadError::InvalidIndex {
            key: "APP_HOSTS_FIRST".to_string(),
            index: "FIRST".to_string(),
        };

        let output = error.to_string();
        assert!(output.contains("APP_HOSTS_FIRST:"));
        assert!(output.contains("Invalid sequence index 'FIRST'"));
    }

    #[test]
    fn test_shape_mismatch_display() {
        colored::control::set_override(false);

        let error = LoadError::ShapeMismatch {
            key: "APP_NAME_EXTRA".to_string(),
            description: "string value cannot be indexed by 'EXTRA'".to_string(),
        };

        let output = error.to_string();
        assert!(output.contains("APP_NAME_EXTRA: Does not match"));
        assert!(output.contains("Description: string value cannot be indexed by 'EXTRA'"));
    }

    #[test]
    fn test_unsupported_kind_display() {
        colored::control::set_override(false);

        let error = LoadError::UnsupportedKind {
            key: "APP_TX".to_string(),
            type_name: "Sender<String>".to_string(),
        };

        assert!(error.to_string().contains("unsupported type Sender<String>"));
    }

    #[test]
    fn test_invalid_prefix_display() {
        colored::control::set_override(false);

        let error = LoadError::InvalidPrefix {
            prefix: String::new(),
        };

        let output = error.to_string();
        assert!(output.contains("'': Is not a valid configuration prefix"));
    }

    #[test]
    fn test_key_accessor() {
        let error = LoadError::InvalidIndex {
            key: "APP_LIST_X".to_string(),
            index: "X".to_string(),
        };
        assert_eq!(error.key(), Some("APP_LIST_X"));

        let error = LoadError::InvalidPrefix {
            prefix: "A=B".to_string(),
        };
        assert_eq!(error.key(), None);
    }

    #[test]
    fn test_format_load_error() {
        colored::control::set_override(false);

        let error = LoadError::UnsupportedKind {
            key: "APP_TX".to_string(),
            type_name: "Sender<String>".to_string(),
        };

        let formatted = format_load_error(&error);
        assert!(formatted.starts_with("Configuration failed:"));
        assert!(formatted.contains("APP_TX"));
    }

    #[test]
    fn test_clone() {
        let error1 = LoadError::ShapeMismatch {
            key: "TEST".to_string(),
            description: "Test".to_string(),
        };

        let error2 = error1.clone();

        assert_eq!(error1.to_string(), error2.to_string());
    }
}
