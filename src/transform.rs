//! Maps OCI Monitoring raw metric records to the MoogSoft metric datum format.
//!
//! One input record produces one output record per datapoint. The interesting
//! parts are the depth-first attribute lookup (OCI nests attributes at varying
//! depths depending on the emitting service), the camel-case split used to
//! build a dotted source identifier, and tag assembly from configured keys.

use fancy_regex::Regex;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::Error;

// One uppercase letter starting a lowercase run, or an uppercase run not
// followed by a lowercase letter (acronyms). A leading lowercase run is never
// captured; that quirk is inherited behavior and pinned by tests.
static CAMEL_CASE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Z](?:[a-z]+|[A-Z]*(?=[A-Z]|$))").expect("camel-case pattern"));

/// One MoogSoft metric datum, serialized as the POST body per datapoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputRecord {
    pub metric: String,
    pub source: String,
    pub time: Option<Value>,
    pub data: Option<Value>,
    pub tags: Vec<String>,
}

/// One `{timestamp, value}` sample lifted out of a record's `datapoints` list.
#[derive(Debug, Clone)]
pub struct DataPoint {
    pub timestamp: Option<Value>,
    pub value: Option<Value>,
}

/// Depth-first search for `target_key` anywhere in the record tree.
///
/// The direct key at the current object wins; otherwise the object's entries
/// are walked in order, recursing into object values and into object elements
/// of list values as they appear. A value only counts as found when it is
/// present (non-null, non-zero, non-empty); the search continues past empty
/// values.
///
/// A null record is an error; a key that exists nowhere is `Ok(None)`.
pub fn lookup<'a>(record: &'a Value, target_key: &str) -> Result<Option<&'a Value>, Error> {
    if record.is_null() {
        return Err(Error::InvalidInput(format!(
            "record is null searching for '{}'",
            target_key
        )));
    }
    Ok(find(record, target_key))
}

fn find<'a>(node: &'a Value, target_key: &str) -> Option<&'a Value> {
    let map = node.as_object()?;

    if let Some(value) = map.get(target_key) {
        if is_present(value) {
            return Some(value);
        }
    }

    for value in map.values() {
        match value {
            Value::Object(_) => {
                if let Some(found) = find(value, target_key) {
                    return Some(found);
                }
            }
            Value::Array(entries) => {
                for entry in entries {
                    if entry.is_object() {
                        if let Some(found) = find(entry, target_key) {
                            return Some(found);
                        }
                    }
                }
            }
            _ => {}
        }
    }

    None
}

// Presence mirrors the upstream truthiness rule: null, false, zero and empty
// containers are all treated as absent.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(entries) => !entries.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn require<'a>(record: &'a Value, target_key: &str) -> Result<&'a Value, Error> {
    lookup(record, target_key)?
        .ok_or_else(|| Error::InvalidInput(format!("record has no '{}' attribute", target_key)))
}

fn require_str<'a>(record: &'a Value, target_key: &str) -> Result<&'a str, Error> {
    require(record, target_key)?
        .as_str()
        .ok_or_else(|| Error::InvalidInput(format!("'{}' attribute is not a string", target_key)))
}

/// Splits a camel-case identifier into its uppercase-initiated segments.
pub fn camel_case_split(input: &str) -> Vec<&str> {
    CAMEL_CASE
        .find_iter(input)
        .filter_map(|m| m.ok())
        .map(|m| m.as_str())
        .collect()
}

/// Assembles the dotted lowercase source identifier from `namespace` + `name`,
/// e.g. `oci_computeagent` / `CPUUtilization` -> `oci.computeagent.cpu.utilization`.
pub fn source(record: &Value) -> Result<String, Error> {
    let namespace = require_str(record, "namespace")?;
    let name = require_str(record, "name")?;

    let elements: Vec<String> = namespace
        .split('_')
        .chain(camel_case_split(name))
        .map(str::to_lowercase)
        .collect();

    Ok(elements.join("."))
}

/// Builds `key:value` tags from the configured tag keys, in configured order.
/// Keys with no present value are skipped; string values containing `:` are
/// dropped with a warning since they would corrupt the tag format.
pub fn tags(record: &Value, config: &Config) -> Result<Vec<String>, Error> {
    let mut result = Vec::new();

    for key in &config.tag_keys {
        let Some(value) = lookup(record, key)? else {
            continue;
        };

        if let Some(s) = value.as_str() {
            if s.contains(':') {
                warn!("tag contains a ':' / ignoring {} ({})", key, s);
                continue;
            }
        }

        result.push(format!("{}:{}", key, render(value)));
    }

    Ok(result)
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Lifts the record's `datapoints` list. `timestamp`/`value` are expected as
/// direct keys of each entry; a missing key passes through as absent rather
/// than failing here.
pub fn data_points(record: &Value) -> Result<Vec<DataPoint>, Error> {
    let datapoints = require(record, "datapoints")?
        .as_array()
        .ok_or_else(|| Error::InvalidInput("'datapoints' attribute is not a list".to_string()))?;

    Ok(datapoints
        .iter()
        .map(|point| DataPoint {
            timestamp: point.get("timestamp").cloned(),
            value: point.get("value").cloned(),
        })
        .collect())
}

/// Transforms one raw metric record into one [`OutputRecord`] per datapoint.
pub fn transform_record(record: &Value, config: &Config) -> Result<Vec<OutputRecord>, Error> {
    let metric = require_str(record, "displayName")?.to_string();
    let source = source(record)?;
    let tags = tags(record, config)?;

    let mut payload = Vec::new();
    for point in data_points(record)? {
        payload.push(OutputRecord {
            metric: metric.clone(),
            source: source.clone(),
            time: point.timestamp,
            data: point.value,
            tags: tags.clone(),
        });
    }

    Ok(payload)
}

/// Transforms a batch in order, one output group per input record. The first
/// failing record aborts the whole batch; there is no partial success.
pub fn transform_batch(
    records: &[Value],
    config: &Config,
) -> Result<Vec<Vec<OutputRecord>>, Error> {
    let mut result = Vec::with_capacity(records.len());
    for record in records {
        let transformed = transform_record(record, config)?;
        debug!("transformed record: {:?}", transformed);
        result.push(transformed);
    }
    Ok(result)
}
