//! Reading the JS options object.
//!
//! DOM handles and callbacks are pulled out here. Only the JSON-able keys
//! are copied into a fresh object and handed to `ScratchOptions::from_json`,
//! so whatever frameworks hang off the container never reaches
//! `JSON.stringify`.

use js_sys::{Array, Function, Object, Reflect, JSON};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::HtmlElement;

use scratch_card::{Result, ScratchError, ScratchOptions};

const MSG_CONTAINER: &str = "Param [container] must be given and must be a dom element.";

/// Keys forwarded to the core as JSON.
pub const DATA_KEYS: [&str; 12] = [
    "imgSrc",
    "size",
    "validArea",
    "percentage",
    "text",
    "background",
    "color",
    "font",
    "notSupportText",
    "brush",
    "forceRepaint",
    "logLevel",
];

pub struct JsOptions {
    pub container: HtmlElement,
    pub options: ScratchOptions,
    pub on_complete: Option<Function>,
    pub on_error: Option<Function>,
}

/// Validate and split the caller's options. Nothing touches the DOM here.
pub fn read(value: &JsValue) -> Result<JsOptions> {
    if !value.is_object() {
        return Err(ScratchError::invalid("Options must be an object."));
    }

    let container = field(value, "container")
        .and_then(|v| v.dyn_into::<HtmlElement>().ok())
        .ok_or_else(|| ScratchError::invalid(MSG_CONTAINER))?;
    let on_complete = callback(value, "onComplete")?;
    let on_error = callback(value, "onError")?;

    let data = data_object(value)?;
    let json = JSON::stringify(&data)
        .map_err(|e| ScratchError::invalid(format!("options are not serializable: {e:?}")))?;
    let options = ScratchOptions::from_json(&String::from(json))?;

    Ok(JsOptions {
        container,
        options,
        on_complete,
        on_error,
    })
}

/// Copy of the JSON-able keys. `JSON.stringify` writes NaN and Infinity
/// as `null`, which would read as "absent", so they are rejected here.
fn data_object(value: &JsValue) -> Result<Object> {
    let data = Object::new();
    for key in DATA_KEYS {
        let Some(v) = field(value, key) else {
            continue;
        };
        if has_non_finite(&v, 2) {
            return Err(ScratchError::invalid(format!(
                "Param [{key}] must not contain NaN or Infinity."
            )));
        }
        Reflect::set(&data, &JsValue::from_str(key), &v)
            .map_err(|e| ScratchError::invalid(format!("Param [{key}] could not be read: {e:?}")))?;
    }
    Ok(data)
}

/// Non-finite number in `value` or, up to `depth` levels down, in its
/// array items and own properties.
fn has_non_finite(value: &JsValue, depth: u32) -> bool {
    if let Some(n) = value.as_f64() {
        return !n.is_finite();
    }
    if depth == 0 || !value.is_object() {
        return false;
    }
    let children = if Array::is_array(value) {
        Array::from(value)
    } else {
        Object::values(value.unchecked_ref())
    };
    children.iter().any(|child| has_non_finite(&child, depth - 1))
}

/// A present, non-null property.
fn field(object: &JsValue, key: &str) -> Option<JsValue> {
    Reflect::get(object, &JsValue::from_str(key))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
}

fn callback(object: &JsValue, key: &str) -> Result<Option<Function>> {
    match field(object, key) {
        None => Ok(None),
        Some(v) => v
            .dyn_into::<Function>()
            .map(Some)
            .map_err(|_| ScratchError::invalid(format!("Param [{key}] must be a function."))),
    }
}
