use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use tracing::debug;

/// One meal row as the canteen service sends it. Every field is optional and loosely typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawMealRecord {
    #[serde(default, deserialize_with = "loose_string")]
    pub datum: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub druh: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub nazev: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub cena: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub databaze: Option<String>,
    #[serde(rename = "casOdhlaseni", default, deserialize_with = "loose_string")]
    pub cas_odhlaseni: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub pocet: Option<String>,
}

// Strings, numbers and booleans become text; anything else counts as absent.
fn loose_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

/// Flatten the vendor's `table0`, `table1`, ... groups into one record sequence.
///
/// The groups are looked up on the payload itself first and, when it has none,
/// on its `data` object. Groups keep their key order and rows keep their order
/// within a group. Payloads of any other shape give an empty result.
pub fn flatten(payload: &Value) -> Vec<RawMealRecord> {
    let Some(root) = payload.as_object() else {
        return Vec::new();
    };

    let groups = table_groups(root).or_else(|| {
        root.get("data")
            .and_then(Value::as_object)
            .and_then(table_groups)
    });

    groups
        .unwrap_or_default()
        .into_iter()
        .flatten()
        .filter_map(|row| match RawMealRecord::deserialize(row) {
            Ok(record) => Some(record),
            Err(e) => {
                debug!(error = %e, "skipping non-object table row");
                None
            }
        })
        .collect()
}

fn table_groups(object: &Map<String, Value>) -> Option<Vec<&Vec<Value>>> {
    let groups: Vec<&Vec<Value>> = object
        .iter()
        .filter(|(key, _)| key.starts_with("table"))
        .filter_map(|(_, value)| value.as_array())
        .collect();
    (!groups.is_empty()).then_some(groups)
}
