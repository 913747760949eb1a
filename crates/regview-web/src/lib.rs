use serde::Serialize;
use wasm_bindgen::prelude::*;

use regview_core::config::RenderContext;
use regview_core::fetch::FetchResponse;
use regview_core::loader::classify;
use regview_core::register;
use regview_core::{LoadResult, LoaderConfig};

// ---------------------------------------------------------------------------
// Page loader
// ---------------------------------------------------------------------------

/// URL the page should fetch for a render context ("client" or "server").
/// Unknown contexts fall back to the client URL, since this runs in the browser.
#[wasm_bindgen]
pub fn registers_url(context: &str) -> String {
    let ctx = context.parse().unwrap_or(RenderContext::Client);
    LoaderConfig::for_context(ctx).endpoint()
}

/// Turn the page's own fetch response into the object the page renders:
/// `{data}` on success, `{status, error}` otherwise.
#[wasm_bindgen]
pub fn page_load(url: &str, status: u16, body: &str, verbose: bool) -> JsValue {
    to_js(&load_result(url, status, body, verbose))
}

/// For a page whose fetch itself rejected (network down, CORS).
#[wasm_bindgen]
pub fn page_load_failed(reason: &str) -> JsValue {
    to_js(&LoadResult::transport_failure(reason))
}

// ---------------------------------------------------------------------------
// Register view
// ---------------------------------------------------------------------------

/// Typed register list for a loaded payload. Returns [] for anything else.
#[wasm_bindgen]
pub fn registers(data: JsValue) -> JsValue {
    let data: serde_json::Value = match serde_wasm_bindgen::from_value(data) {
        Ok(d) => d,
        Err(_) => return empty_array(),
    };
    let regs = register::parse_registers(&data);
    to_js(&regs)
}

fn empty_array() -> JsValue {
    to_js(&Vec::<()>::new())
}

/// JSON objects must reach JS as plain objects, not `Map`s, so pages can read
/// `result.data.registers` directly.
fn to_js<T: Serialize + ?Sized>(value: &T) -> JsValue {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap_or(JsValue::NULL)
}

fn load_result(url: &str, status: u16, body: &str, verbose: bool) -> LoadResult {
    classify(url, FetchResponse::new(status, body.as_bytes()), verbose)
}

#[cfg(test)]
mod tests {
    use super::*;
    use regview_core::result::FETCH_FAILED;
    use serde_json::json;

    #[test]
    fn browser_defaults_to_localhost() {
        assert_eq!(registers_url("client"), "http://localhost:8081/all_registers");
        assert_eq!(registers_url("server"), "http://127.0.0.1:8081/all_registers");
        assert_eq!(registers_url("?"), "http://localhost:8081/all_registers");
    }

    #[test]
    fn load_result_shapes() {
        let url = registers_url("client");
        let ok = serde_json::to_value(load_result(&url, 200, "[]", false)).unwrap();
        assert_eq!(ok, json!({"data": []}));

        let failed = serde_json::to_value(load_result(&url, 404, "not found", false)).unwrap();
        assert_eq!(failed, json!({"status": 404, "error": {"message": FETCH_FAILED}}));
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use js_sys::{Array, Map, Reflect};
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::wasm_bindgen_test;

    fn field(obj: &JsValue, key: &str) -> JsValue {
        Reflect::get(obj, &JsValue::from_str(key)).expect("field")
    }

    #[wasm_bindgen_test]
    fn page_load_data_is_a_plain_object() {
        let url = registers_url("client");
        let result = page_load(&url, 200, r#"{"registers": [1, 2, 3]}"#, false);
        let data = field(&result, "data");
        assert!(!data.is_instance_of::<Map>());
        let regs = field(&data, "registers");
        assert!(Array::is_array(&regs));
        assert_eq!(Array::from(&regs).length(), 3);
    }

    #[wasm_bindgen_test]
    fn register_rows_keep_their_fields() {
        let url = registers_url("client");
        let body = r#"[{"tag": "FlowRate", "address": 4, "datatype": "float32", "value": 2.5}]"#;
        let result = page_load(&url, 200, body, false);
        let row = Array::from(&field(&result, "data")).get(0);
        assert!(!row.is_instance_of::<Map>());
        assert_eq!(field(&row, "tag").as_string().as_deref(), Some("FlowRate"));

        let typed = Array::from(&registers(field(&result, "data"))).get(0);
        assert_eq!(field(&typed, "address").as_string().as_deref(), Some("4"));
    }

    #[wasm_bindgen_test]
    fn failures_carry_status_and_message() {
        let result = page_load(&registers_url("client"), 404, "not found", false);
        assert_eq!(field(&result, "status").as_f64(), Some(404.0));
        let error = field(&result, "error");
        assert!(!error.is_instance_of::<Map>());
        assert_eq!(
            field(&error, "message").as_string().as_deref(),
            Some("Failed to fetch data")
        );

        let failed = page_load_failed("TypeError: Failed to fetch");
        assert_eq!(
            field(&failed, "detail").as_string().as_deref(),
            Some("TypeError: Failed to fetch")
        );
    }
}
