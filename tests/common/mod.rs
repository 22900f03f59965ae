use serde_json::Value;
use std::io::{Error, Write};
use tempfile::NamedTempFile;

pub fn write_scenario(scenario: &Value) -> Result<NamedTempFile, Error> {
    let mut file = NamedTempFile::new()?;
    serde_json::to_writer(&mut file, scenario)?;
    file.flush()?;
    Ok(file)
}

pub fn checkout_config() -> Value {
    serde_json::json!({ "publishableKey": "pk_test_123" })
}
