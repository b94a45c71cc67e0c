pub mod canvas;
pub mod dom;
pub mod listeners;
pub mod options;
pub mod runner;

pub use runner::CardRunner;

use wasm_bindgen::prelude::*;

use scratch_card::ScratchError;

/// Convert a rejected DOM call into a card error.
pub(crate) fn host_error(value: JsValue) -> ScratchError {
    ScratchError::host(format!("{value:?}"))
}

fn to_js_error(err: ScratchError) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

/// The widget as JavaScript sees it: `new ScratchCard({ container, imgSrc, ... })`.
///
/// Construction validates the options synchronously and throws on bad input.
/// Everything else happens after the image loads; failures from then on go
/// to `onError` and the console.
#[wasm_bindgen(js_name = ScratchCard)]
pub struct WebScratchCard {
    runner: CardRunner,
}

#[wasm_bindgen(js_class = ScratchCard)]
impl WebScratchCard {
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<WebScratchCard, JsValue> {
        console_error_panic_hook::set_once();

        let js = options::read(&options).map_err(to_js_error)?;
        // Already initialised by an earlier card is fine.
        let _ = console_log::init_with_level(js.options.log_level);

        let runner = CardRunner::start(js).map_err(to_js_error)?;
        Ok(Self { runner })
    }

    /// Detach every listener the card registered.
    pub fn destroy(&self) {
        self.runner.destroy();
    }

    /// Scratched fraction of the valid area, 0 before the image loads.
    pub fn percentage(&self) -> f64 {
        self.runner.percentage()
    }

    #[wasm_bindgen(js_name = isRevealed)]
    pub fn is_revealed(&self) -> bool {
        self.runner.is_revealed()
    }

    /// `"loading"`, `"ready"`, `"revealed"`, `"degraded"`, `"failed"` or `"destroyed"`.
    pub fn state(&self) -> String {
        self.runner.state().to_string()
    }

    /// Failure message once the card is `"failed"`.
    pub fn error(&self) -> Option<String> {
        self.runner.error()
    }
}
