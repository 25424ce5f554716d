//! Key-name synonyms and normalized lookups for object shorthands.
use crate::value::{Map, Value};

pub const MIN: &[&str] = &["min", "min_inclusive", "from"];
pub const MAX: &[&str] = &["max", "max_inclusive", "max_exclusive", "to"];
pub const VALUE: &[&str] = &["value", "constant"];
pub const WEIGHT: &[&str] = &["weight"];
pub const ENTRY_DATA: &[&str] = &["data", "value", "provider", "state"];
pub const LIST: &[&str] = &["values", "distribution", "entries", "providers"];
pub const PREDICATE: &[&str] = &["predicate", "value"];
pub const BLOCK_ID: &[&str] = &["Name", "name", "id", "block"];
pub const PROPERTIES: &[&str] = &["Properties", "properties"];
pub const FIRST_OCTAVE: &[&str] = &["firstOctave", "first_octave", "octave"];

/// Lowercase with `_` and `-` removed: `minInclusive`, `min_inclusive` and
/// `Min-Inclusive` all normalize to `mininclusive`.
pub fn normalize(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// First synonym present, trying exact names before normalized ones.
pub fn get_any<'m>(map: &'m Map, synonyms: &[&str]) -> Option<&'m Value> {
    if let Some(v) = synonyms.iter().find_map(|s| map.get(*s)) {
        return Some(v);
    }
    let wanted: Vec<String> = synonyms.iter().map(|s| normalize(s)).collect();
    map.iter()
        .find(|(k, _)| wanted.contains(&normalize(k)))
        .map(|(_, v)| v)
}

pub fn has_any(map: &Map, synonyms: &[&str]) -> bool {
    get_any(map, synonyms).is_some()
}

/// The normalized `"type"` of an object, `minecraft:` stripped.
pub fn discriminator(map: &Map) -> Option<String> {
    let raw = get_any(map, &["type"])?.as_str()?;
    let raw = raw.trim();
    Some(normalize(raw.strip_prefix("minecraft:").unwrap_or(raw)))
}

/// Maps a normalized discriminator onto one of `names`.
pub fn select(discriminator: &str, names: &[&'static str]) -> Option<&'static str> {
    names
        .iter()
        .copied()
        .find(|name| normalize(name) == discriminator)
}

/// [`select`], then `(alias, name)` pairs for spellings that differ from the canonical name.
pub fn select_with(
    discriminator: &str,
    names: &[&'static str],
    aliases: &[(&str, &'static str)],
) -> Option<&'static str> {
    select(discriminator, names).or_else(|| {
        aliases
            .iter()
            .find(|(alias, _)| normalize(alias) == discriminator)
            .map(|(_, name)| *name)
    })
}

/// A number, or a string holding one.
pub fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => Some(*n),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

/// An integral number in `i32` range, or a string holding one.
pub fn int(value: &Value) -> Option<i32> {
    let n = number(value)?;
    if n.fract() != 0.0 || n < i32::MIN as f64 || n > i32::MAX as f64 {
        return None;
    }
    Some(n as i32)
}

pub fn number_at(map: &Map, synonyms: &[&str]) -> Option<f64> {
    get_any(map, synonyms).and_then(number)
}

pub fn int_at(map: &Map, synonyms: &[&str]) -> Option<i32> {
    get_any(map, synonyms).and_then(int)
}

/// Absent keys yield `default`; present but malformed ones yield `None`.
pub fn int_or(map: &Map, synonyms: &[&str], default: i32) -> Option<i32> {
    match get_any(map, synonyms) {
        Some(v) => int(v),
        None => Some(default),
    }
}

pub fn number_or(map: &Map, synonyms: &[&str], default: f64) -> Option<f64> {
    match get_any(map, synonyms) {
        Some(v) => number(v),
        None => Some(default),
    }
}

/// A list, or a single element standing in for a one-element list.
pub fn one_or_many(value: &Value) -> &[Value] {
    match value {
        Value::Array(xs) => xs,
        other => std::slice::from_ref(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(v: serde_json::Value) -> Map {
        match Value::from(v) {
            Value::Object(m) => m,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn synonyms_match_after_normalizing() {
        for key in ["min", "min_inclusive", "minInclusive", "MinInclusive", "Min", "from"] {
            let m = map(json!({ key: 3 }));
            assert_eq!(number_at(&m, MIN), Some(3.0), "key {key}");
        }
        assert_eq!(number_at(&map(json!({"Max": 9})), MAX), Some(9.0));
    }

    #[test]
    fn exact_synonym_wins_over_normalized_match() {
        let m = map(json!({"MIN": 1, "from": 2}));
        assert_eq!(number_at(&m, MIN), Some(2.0));
    }

    #[test]
    fn discriminators_drop_namespace_and_case() {
        let m = map(json!({"type": "minecraft:Biased_To_Bottom"}));
        let d = discriminator(&m).unwrap();
        assert_eq!(select(&d, &["uniform", "biased_to_bottom"]), Some("biased_to_bottom"));
    }

    #[test]
    fn aliases_resolve_after_canonical_names() {
        let aliases = [("list", "weighted_list"), ("uniform", "constant")];
        let names = &["uniform", "weighted_list"];
        assert_eq!(select_with("list", names, &aliases), Some("weighted_list"));
        assert_eq!(select_with("uniform", names, &aliases), Some("uniform"));
        assert_eq!(select_with("weightedlist", names, &aliases), Some("weighted_list"));
        assert_eq!(select_with("spiral", names, &aliases), None);
    }

    #[test]
    fn integer_reads_reject_fractions() {
        assert_eq!(int(&Value::from(4.0)), Some(4));
        assert_eq!(int(&Value::from("12")), Some(12));
        assert_eq!(int(&Value::from(2.5)), None);
    }
}
