use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One register reading as reported by the register API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Register {
    pub tag: String,
    pub description: String,
    /// Holding register number, or `<register>_<bit>` for digital points.
    pub address: String,
    pub datatype: String,
    pub value: Option<f64>,
    pub last_update: Option<String>,
}

impl Register {
    /// The API reports a register it could not read with value -1 and no
    /// update time.
    pub fn is_unread(&self) -> bool {
        self.last_update.is_none() && self.value.map_or(true, |v| v == -1.0)
    }

    pub fn is_digital(&self) -> bool {
        self.datatype.starts_with("digital")
    }
}

/// Lenient typed view over a loaded payload. Entries without a `tag` are
/// skipped; anything that is not a list of readings yields nothing.
pub fn parse_registers(data: &Value) -> Vec<Register> {
    let list = match data {
        Value::Array(arr) => arr,
        Value::Object(obj) => match obj.get("registers").and_then(|v| v.as_array()) {
            Some(arr) => arr,
            None => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    let mut registers: Vec<Register> = list.iter().filter_map(parse_register).collect();
    registers.sort_by(|a, b| a.tag.cmp(&b.tag));
    registers
}

/// Parse one reading object.
pub fn parse_register(data: &Value) -> Option<Register> {
    let tag = data.get("tag")?.as_str()?.to_string();
    let description = data
        .get("description")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();
    let address = match data.get("address") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };
    let datatype = data
        .get("datatype")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();
    let value = data.get("value").and_then(|v| v.as_f64());
    let last_update = data
        .get("last_update")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(String::from);

    Some(Register {
        tag,
        description,
        address,
        datatype,
        value,
        last_update,
    })
}
