//! Local blob codec.
//!
//! The whole registry is stored as one JSON object:
//!
//! ```json
//! {
//!   "students":    [{"id", "name", "age", "gender", "department", "courses", "grades"}],
//!   "faculty":     [{"id", "name", "department", "coursesTaught"}],
//!   "courses":     [{"id", "name", "creditHours", "assignedFaculty", "enrolledStudents"}],
//!   "departments": [{"id", "name", "headOfDepartment", "courses"}],
//!   "university":  {"name", "address"}
//! }
//! ```
//!
//! The blob has no version field. Decoding is lenient: each collection is
//! re-hydrated on its own, a missing collection is empty, and a collection
//! that does not decode is left empty and reported.

use crate::entity::{Course, Department, Faculty, Student, University};
use crate::error::{CoreError, CoreResult};
use crate::registry::{Collection, Registry};
use campus_codec::{CodecError, TableName};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

#[derive(Serialize)]
struct Blob<'a> {
    students: &'a [Student],
    faculty: &'a [Faculty],
    courses: &'a [Course],
    departments: &'a [Department],
    university: &'a University,
}

/// Result of decoding a blob.
#[derive(Debug, Default)]
pub struct Decoded {
    /// Collections that decoded, in table order.
    pub collections: Vec<Collection>,
    /// Problems recovered from, as `MalformedPersistedState` errors.
    pub issues: Vec<CoreError>,
}

/// Encodes the registry as a JSON blob.
///
/// # Errors
///
/// Returns a codec error if serialization fails.
pub fn encode(registry: &Registry) -> CoreResult<String> {
    let blob = Blob {
        students: registry.students(),
        faculty: registry.faculty(),
        courses: registry.courses(),
        departments: registry.departments(),
        university: registry.university(),
    };
    serde_json::to_string(&blob).map_err(|e| CodecError::encoding(e.to_string()).into())
}

/// Decodes a JSON blob into whole collections.
///
/// Never fails. Applying every returned collection to an empty registry
/// yields the stored state, minus any collection listed in `issues`.
#[must_use]
pub fn decode(text: &str) -> Decoded {
    let mut decoded = Decoded::default();

    let root: Map<String, Value> = match serde_json::from_str(text) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            decoded.issue(format!("blob is not an object but {}", type_name(&other)));
            return decoded;
        }
        Err(e) => {
            decoded.issue(format!("blob is not valid JSON: {e}"));
            return decoded;
        }
    };

    for table in TableName::ALL {
        let key = blob_key(table);
        let Some(value) = root.get(key) else {
            continue;
        };
        let collection = match table {
            TableName::Students => field(key, value).map(Collection::Students),
            TableName::Faculty => field(key, value).map(Collection::Faculty),
            TableName::Courses => field(key, value).map(Collection::Courses),
            TableName::Departments => field(key, value).map(Collection::Departments),
            TableName::University => field(key, value).map(Collection::University),
        };
        match collection {
            Ok(collection) => decoded.collections.push(collection),
            Err(message) => decoded.issue(message),
        }
    }

    decoded
}

/// Decodes a blob straight into a fresh registry.
#[must_use]
pub fn decode_registry(text: &str) -> (Registry, Vec<CoreError>) {
    let Decoded { collections, issues } = decode(text);
    let mut registry = Registry::new();
    for collection in collections {
        registry.restore(collection);
    }
    (registry, issues)
}

impl Decoded {
    fn issue(&mut self, message: String) {
        warn!(%message, "recovered from malformed local state");
        self.issues.push(CoreError::malformed_state(message));
    }
}

fn blob_key(table: TableName) -> &'static str {
    match table {
        TableName::Students => "students",
        TableName::Faculty => "faculty",
        TableName::Courses => "courses",
        TableName::Departments => "departments",
        TableName::University => "university",
    }
}

fn field<T: DeserializeOwned>(key: &str, value: &Value) -> Result<T, String> {
    T::deserialize(value).map_err(|e| format!("{key}: {e}"))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::sample_registry;

    #[test]
    fn blob_round_trip() {
        let registry = sample_registry();
        let text = encode(&registry).unwrap();
        let (decoded, issues) = decode_registry(&text);
        assert!(issues.is_empty());
        assert_eq!(decoded, registry);
    }

    #[test]
    fn uses_browser_field_names() {
        let text = encode(&sample_registry()).unwrap();
        for key in ["\"students\"", "\"creditHours\"", "\"assignedFaculty\"", "\"headOfDepartment\"", "\"coursesTaught\""] {
            assert!(text.contains(key), "missing {key}");
        }
    }

    #[test]
    fn unparsable_blob_yields_empty_registry() {
        let (registry, issues) = decode_registry("{not json");
        assert!(registry.is_empty());
        assert_eq!(issues.len(), 1);
        assert!(matches!(issues[0], CoreError::MalformedPersistedState { .. }));
    }

    #[test]
    fn non_object_blob_is_reported() {
        let (registry, issues) = decode_registry("[1, 2, 3]");
        assert!(registry.is_empty());
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn malformed_collection_is_isolated() {
        let text = r#"{
            "students": [{"id": "STU001", "name": "Alice", "age": "twenty"}],
            "courses": [{"id": "CS101", "name": "Intro", "creditHours": 3}],
            "university": {"name": "Lincoln University"}
        }"#;
        let (registry, issues) = decode_registry(text);

        assert!(registry.students().is_empty());
        assert_eq!(registry.courses().len(), 1);
        assert!(registry.course("CS101").unwrap().assigned_faculty.is_none());
        assert_eq!(registry.university().name, "Lincoln University");
        assert_eq!(registry.university().address, "");
        assert_eq!(issues.len(), 1);
        assert!(issues[0].to_string().contains("students"));
    }

    #[test]
    fn missing_collections_are_empty_not_errors() {
        let (registry, issues) = decode_registry("{}");
        assert!(registry.is_empty());
        assert!(issues.is_empty());
    }
}
