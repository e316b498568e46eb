use serde_json::{Map, Value};
use std::io;

use super::format_number;

/// Write output as CSV to stdout.
///
/// Scalar result fields go out first as `field,value` rows. An array of
/// records (terminal nodes, lattice nodes) follows as its own table, so the
/// writer is flexible about record length.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = flexible_writer(stdout.lock());
    write_csv(&mut wtr, value);
    let _ = wtr.flush();
}

fn flexible_writer<W: io::Write>(inner: W) -> csv::Writer<W> {
    csv::WriterBuilder::new().flexible(true).from_writer(inner)
}

fn write_csv<W: io::Write>(wtr: &mut csv::Writer<W>, value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => write_result_csv(wtr, result),
            _ => write_fields_csv(wtr, map),
        },
        Value::Array(arr) => write_array_csv(wtr, arr),
        _ => {
            let _ = wtr.write_record([&format_csv_value(value)]);
        }
    }
}

fn write_result_csv<W: io::Write>(wtr: &mut csv::Writer<W>, result: &Map<String, Value>) {
    let mut fields = Map::new();
    let mut records = None;
    for (key, val) in result {
        match val {
            Value::Array(arr) if matches!(arr.first(), Some(Value::Object(_))) => {
                if records.is_none() {
                    records = Some(arr);
                }
            }
            _ => {
                fields.insert(key.clone(), val.clone());
            }
        }
    }

    write_fields_csv(wtr, &fields);
    if let Some(arr) = records {
        write_array_csv(wtr, arr);
    }
}

fn write_fields_csv<W: io::Write>(wtr: &mut csv::Writer<W>, map: &Map<String, Value>) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in map {
        let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
    }
}

fn write_array_csv<W: io::Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&format_csv_value(item)]);
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => format_number(n),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
