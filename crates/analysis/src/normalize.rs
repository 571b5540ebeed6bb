//! Field-level normalization of loosely structured analysis JSON
//!
//! Every helper is total: wrong-typed scalars fall back to a default,
//! wrong-typed lists become empty, and list entries missing their required
//! key are dropped rather than failing the record.

use codescribe_core::{
    CodeExample, DependencyInfo, ExternalDependency, InternalDependency, KeyConcept, LineRange,
    PublicApiEntry,
};
use serde_json::Value;

/// Returns the value only when it is already a JSON string, else the default.
pub fn ensure_string(value: Option<&Value>, default: &str) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        _ => default.to_string(),
    }
}

/// Returns the array contents, or an empty slice for anything else.
pub fn ensure_array(value: Option<&Value>) -> &[Value] {
    match value {
        Some(Value::Array(items)) => items,
        _ => &[],
    }
}

/// Maps each raw array element through `normalize`, silently dropping the
/// elements it rejects.
pub fn normalize_entries<T>(
    value: Option<&Value>,
    normalize: impl Fn(&Value) -> Option<T>,
) -> Vec<T> {
    ensure_array(value).iter().filter_map(normalize).collect()
}

/// Keeps only non-empty string entries.
pub fn normalize_patterns(value: Option<&Value>) -> Vec<String> {
    ensure_array(value)
        .iter()
        .filter_map(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn normalize_key_concept(value: &Value) -> Option<KeyConcept> {
    let obj = value.as_object()?;
    let name = obj.get("name")?.as_str()?;
    Some(KeyConcept {
        name: name.to_string(),
        description: ensure_string(obj.get("description"), ""),
        code_ref: obj
            .get("codeRef")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

pub fn normalize_public_api_entry(value: &Value) -> Option<PublicApiEntry> {
    let obj = value.as_object()?;
    let name = obj.get("name")?.as_str()?;
    Some(PublicApiEntry {
        name: name.to_string(),
        signature: ensure_string(obj.get("signature"), ""),
        description: ensure_string(obj.get("description"), ""),
    })
}

pub fn normalize_code_example(value: &Value) -> Option<CodeExample> {
    let obj = value.as_object()?;
    let title = obj.get("title")?.as_str()?;
    Some(CodeExample {
        title: title.to_string(),
        code: ensure_string(obj.get("code"), ""),
        file: obj
            .get("file")
            .and_then(Value::as_str)
            .map(normalize_file_path),
        lines: obj.get("lines").and_then(normalize_line_range),
    })
}

pub fn normalize_internal_dependency(value: &Value) -> Option<InternalDependency> {
    let obj = value.as_object()?;
    let module = obj.get("module")?.as_str()?;
    Some(InternalDependency {
        module: module.to_string(),
        usage: ensure_string(obj.get("usage"), ""),
    })
}

pub fn normalize_external_dependency(value: &Value) -> Option<ExternalDependency> {
    let obj = value.as_object()?;
    let package = obj.get("package")?.as_str()?;
    Some(ExternalDependency {
        package: package.to_string(),
        usage: ensure_string(obj.get("usage"), ""),
    })
}

/// Internal/external dependency lists from a raw `dependencies` object;
/// anything other than an object yields two empty lists.
pub fn normalize_dependencies(value: Option<&Value>) -> DependencyInfo {
    let Some(Value::Object(obj)) = value else {
        return DependencyInfo::default();
    };
    DependencyInfo {
        internal: normalize_entries(obj.get("internal"), normalize_internal_dependency),
        external: normalize_entries(obj.get("external"), normalize_external_dependency),
    }
}

fn normalize_file_path(path: &str) -> String {
    let forward = path.replace('\\', "/");
    forward
        .strip_prefix("./")
        .or_else(|| forward.strip_prefix('/'))
        .unwrap_or(&forward)
        .to_string()
}

/// A `[start, end]` pair is kept only when both bounds are integers,
/// `start >= 0` and `end >= start`; anything else drops the range without
/// touching the rest of the example.
fn normalize_line_range(value: &Value) -> Option<LineRange> {
    let bounds = value.as_array()?;
    if bounds.len() != 2 {
        return None;
    }
    let start = bounds[0].as_i64()?;
    let end = bounds[1].as_i64()?;
    if start < 0 || end < start {
        return None;
    }
    Some(LineRange {
        start: start as u32,
        end: end as u32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ensure_string_rejects_non_strings() {
        assert_eq!(ensure_string(Some(&json!("text")), "d"), "text");
        assert_eq!(ensure_string(Some(&json!(42)), "d"), "d");
        assert_eq!(ensure_string(Some(&json!(null)), "d"), "d");
        assert_eq!(ensure_string(None, "d"), "d");
    }

    #[test]
    fn drops_invalid_key_concepts() {
        let raw = json!([
            {"name": "Cache", "description": "LRU store"},
            {"description": "missing name"},
            {"name": 42},
            null
        ]);
        let concepts = normalize_entries(Some(&raw), normalize_key_concept);
        assert_eq!(concepts.len(), 1);
        assert_eq!(concepts[0].name, "Cache");
    }

    #[test]
    fn patterns_keep_only_non_empty_strings() {
        let raw = json!(["Builder", "", 3, null, "Observer"]);
        assert_eq!(normalize_patterns(Some(&raw)), vec!["Builder", "Observer"]);
    }

    #[test]
    fn normalizes_example_file_paths() {
        for (input, expected) in [
            ("./src/lib.rs", "src/lib.rs"),
            ("/src/lib.rs", "src/lib.rs"),
            (r"src\utils\mod.rs", "src/utils/mod.rs"),
            ("src/lib.rs", "src/lib.rs"),
        ] {
            let raw = json!({"title": "t", "code": "c", "file": input});
            let example = normalize_code_example(&raw).unwrap();
            assert_eq!(example.file.as_deref(), Some(expected));
        }
    }

    #[test]
    fn keeps_only_valid_line_ranges() {
        let valid = json!({"title": "t", "lines": [3, 10]});
        assert_eq!(
            normalize_code_example(&valid).unwrap().lines,
            Some(LineRange { start: 3, end: 10 })
        );

        for bad in [
            json!({"title": "t", "lines": [-1, 10]}),
            json!({"title": "t", "lines": [10, 3]}),
            json!({"title": "t", "lines": ["3", "10"]}),
            json!({"title": "t", "lines": [3]}),
            json!({"title": "t", "lines": "3-10"}),
        ] {
            let example = normalize_code_example(&bad).unwrap();
            assert_eq!(example.lines, None, "range should be dropped: {bad}");
        }
    }

    #[test]
    fn dependencies_default_when_not_an_object() {
        let info = normalize_dependencies(Some(&json!("nope")));
        assert!(info.internal.is_empty());
        assert!(info.external.is_empty());

        let info = normalize_dependencies(Some(&json!({
            "internal": [{"module": "db", "usage": "queries"}, {"usage": "no module"}],
            "external": [{"package": "serde"}, 7]
        })));
        assert_eq!(info.internal.len(), 1);
        assert_eq!(info.external.len(), 1);
        assert_eq!(info.external[0].package, "serde");
        assert_eq!(info.external[0].usage, "");
    }
}
