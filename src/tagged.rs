//! Renders a resolved `Value` tree into the BurntSushi toml-test tagged
//! JSON shape the `decode` CLI prints: every scalar becomes
//! `{"type": T, "value": S}`, tables and arrays recurse untagged.

use serde_json::{json, Map, Value as Json};

use crate::value::{Table, Value};

pub fn table_to_tagged_json(table: &Table) -> Json {
    let mut map = Map::with_capacity(table.len());
    for (key, value) in table {
        map.insert(key.clone(), value_to_tagged_json(value));
    }
    Json::Object(map)
}

fn value_to_tagged_json(value: &Value) -> Json {
    match value {
        Value::Table(t) => table_to_tagged_json(t),
        Value::Array(items) => Json::Array(items.iter().map(value_to_tagged_json).collect()),
        Value::Integer(i) => tagged("integer", i.to_string()),
        Value::Float(f) => tagged("float", format_float(*f)),
        Value::Bool(b) => tagged("bool", b.to_string()),
        Value::String(s) => tagged("string", s.clone()),
        Value::TimeOfDay(t) => tagged("time-local", t.format("%H:%M:%S%.f").to_string()),
        Value::ZonedTime(t) => tagged("datetime", t.to_rfc3339()),
        Value::LocalDateTime(t) => tagged("datetime-local", t.format("%Y-%m-%dT%H:%M:%S%.f").to_string()),
        Value::LocalDate(d) => tagged("date-local", d.format("%Y-%m-%d").to_string()),
    }
}

fn tagged(type_name: &str, value: String) -> Json {
    json!({ "type": type_name, "value": value })
}

fn format_float(f: f64) -> String {
    if f.is_nan() {
        "nan".to_string()
    } else if f.is_infinite() {
        if f.is_sign_negative() { "-inf" } else { "inf" }.to_string()
    } else {
        f.to_string()
    }
}
