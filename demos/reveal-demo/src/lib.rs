use std::cell::RefCell;

use serde_json::json;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use scratch_card::ScratchOptions;
use scratch_web::options::JsOptions;
use scratch_web::CardRunner;

thread_local! {
    static RUNNER: RefCell<Option<CardRunner>> = RefCell::new(None);
}

fn with_runner<R>(f: impl FnOnce(&CardRunner) -> R) -> Option<R> {
    RUNNER.with(|cell| cell.borrow().as_ref().map(f))
}

/// Mount a card over `img_src` inside the element with id `container_id`.
/// Replaces any card mounted earlier.
#[wasm_bindgen]
pub fn demo_init(container_id: &str, img_src: &str) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let container = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(container_id))
        .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok())
        .ok_or_else(|| JsValue::from_str(&format!("no element #{container_id}")))?;

    let options = ScratchOptions::from_value(&json!({
        "imgSrc": img_src,
        "size": [320, 200],
        "percentage": 0.5,
        "text": "Scratch to win",
        "brush": { "width": 40 }
    }))
    .map_err(|e| JsValue::from_str(&e.to_string()))?;

    let runner = CardRunner::start(JsOptions {
        container,
        options,
        on_complete: None,
        on_error: None,
    })
    .map_err(|e| JsValue::from_str(&e.to_string()))?;

    RUNNER.with(|cell| {
        if let Some(old) = cell.borrow_mut().replace(runner) {
            old.destroy();
        }
    });
    log::info!("reveal-demo: initialized");
    Ok(())
}

#[wasm_bindgen]
pub fn demo_percentage() -> f64 {
    with_runner(|r| r.percentage()).unwrap_or(0.0)
}

#[wasm_bindgen]
pub fn demo_state() -> String {
    with_runner(|r| r.state().to_string()).unwrap_or_else(|| "uninitialized".to_string())
}

#[wasm_bindgen]
pub fn demo_destroy() {
    with_runner(|r| r.destroy());
}
