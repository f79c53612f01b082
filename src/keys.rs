use tracing::trace;

/// Separator between the prefix and each path token of a variable name
pub const ENV_DELIMITER: char = '_';
/// Separator between a variable name and its value in a raw entry
pub const ENV_ASSIGNER: char = '=';

/// A selected environment variable, ready to be decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvPair {
    /// Variable name as it appeared in the input
    pub name: String,
    /// Path below the prefix, taken from the upper-cased name
    pub tokens: Vec<String>,
    /// Raw value, casing preserved
    pub value: String,
}

/// Splits a raw `NAME=VALUE` entry at the first assigner
pub fn split_entry(entry: &str) -> Option<(&str, &str)> {
    entry.split_once(ENV_ASSIGNER)
}

/// Selects a single variable if its name falls under `prefix`
///
/// The name matches when, upper-cased, it equals the upper-cased prefix or
/// starts with the upper-cased prefix followed by [`ENV_DELIMITER`].
/// Whatever follows is split into tokens; nothing following gives an empty
/// path, which addresses the root itself.
pub fn select_pair(prefix: &str, name: &str, value: &str) -> Option<EnvPair> {
    let upper_prefix = prefix.to_uppercase();
    let upper_name = name.to_uppercase();

    let rest = upper_name.strip_prefix(upper_prefix.as_str())?;
    let tokens = if rest.is_empty() {
        Vec::new()
    } else {
        let rest = rest.strip_prefix(ENV_DELIMITER)?;
        if rest.is_empty() {
            Vec::new()
        } else {
            rest.split(ENV_DELIMITER).map(str::to_string).collect()
        }
    };

    Some(EnvPair {
        name: name.to_string(),
        tokens,
        value: value.to_string(),
    })
}

/// Selects every `(name, value)` pair under `prefix`, keeping input order
pub fn select_pairs<I, K, V>(prefix: &str, pairs: I) -> Vec<EnvPair>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    pairs
        .into_iter()
        .filter_map(|(name, value)| select_pair(prefix, name.as_ref(), value.as_ref()))
        .collect()
}

/// Selects every raw `NAME=VALUE` entry under `prefix`, keeping input order
///
/// Entries without an assigner are skipped.
pub fn select_entries<I, S>(prefix: &str, entries: I) -> Vec<EnvPair>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut selected = Vec::new();
    for entry in entries {
        let entry = entry.as_ref();
        match split_entry(entry) {
            Some((name, value)) => selected.extend(select_pair(prefix, name, value)),
            None => trace!(entry, "skipping environment entry without '='"),
        }
    }
    selected
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(pair: &EnvPair) -> Vec<&str> {
        pair.tokens.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_split_entry_at_first_assigner() {
        assert_eq!(split_entry("A=B=C"), Some(("A", "B=C")));
        assert_eq!(split_entry("A="), Some(("A", "")));
        assert_eq!(split_entry("A"), None);
    }

    #[test]
    fn test_select_nested_name() {
        let pair = select_pair("prefix", "PREFIX_SLICE_5_STR", "xyz").unwrap();
        assert_eq!(pair.name, "PREFIX_SLICE_5_STR");
        assert_eq!(tokens(&pair), vec!["SLICE", "5", "STR"]);
        assert_eq!(pair.value, "xyz");
    }

    #[test]
    fn test_select_is_case_insensitive_but_keeps_value_case() {
        let pair = select_pair("Prefix", "prefix_mint_Item1", "MiXeD").unwrap();
        assert_eq!(tokens(&pair), vec!["MINT", "ITEM1"]);
        assert_eq!(pair.value, "MiXeD");
        assert_eq!(pair.name, "prefix_mint_Item1");
    }

    #[test]
    fn test_select_exact_prefix_gives_empty_path() {
        let pair = select_pair("P", "P", "f").unwrap();
        assert!(pair.tokens.is_empty());

        let pair = select_pair("P", "P_", "f").unwrap();
        assert!(pair.tokens.is_empty());
    }

    #[test]
    fn test_select_requires_delimiter_after_prefix() {
        assert!(select_pair("PREFIX", "PREFIXED_STR", "abc").is_none());
        assert!(select_pair("PREFIX", "OTHER_STR", "abc").is_none());
        assert!(select_pair("PREFIX", "PRE", "abc").is_none());
    }

    #[test]
    fn test_select_keeps_empty_tokens() {
        let pair = select_pair("P", "P_A__B", "x").unwrap();
        assert_eq!(tokens(&pair), vec!["A", "", "B"]);
    }

    #[test]
    fn test_select_entries_filters_and_preserves_order() {
        let entries = [
            "PREFIX_B=2",
            "HOME=/root",
            "NO_ASSIGNER",
            "prefix_a=1",
            "PREFIX_C=x=y",
        ];

        let pairs = select_entries("PREFIX", entries);
        let names: Vec<&str> = pairs.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["PREFIX_B", "prefix_a", "PREFIX_C"]);
        assert_eq!(pairs[2].value, "x=y");
    }

    #[test]
    fn test_select_pairs() {
        let pairs = select_pairs(
            "app",
            vec![("APP_PORT", "8080"), ("PATH", "/bin"), ("APP_DB_URL", "pg://")],
        );
        assert_eq!(pairs.len(), 2);
        assert_eq!(tokens(&pairs[1]), vec!["DB", "URL"]);
    }
}
