//! `fetch()`-backed [`SourceLoader`] for URL sources.
//!
//! Requests use CORS mode with same-origin credentials, the equivalent of an
//! `<img crossOrigin="anonymous">`. Works from both the main thread and a
//! worker.

use async_trait::async_trait;
use js_sys::{ArrayBuffer, Promise, Uint8Array};
use quillcrop_core::decode::{DecodeError, SourceLoader};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestCredentials, RequestInit, RequestMode, Response};

/// Loader that fetches image bytes over the network.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserLoader;

fn fetch_error(value: JsValue) -> DecodeError {
    DecodeError::Fetch(format!("{value:?}"))
}

/// Start `fetch(request)` on whichever global scope is present.
fn global_fetch(request: &Request) -> Result<Promise, DecodeError> {
    let global = js_sys::global();
    if let Some(window) = global.dyn_ref::<web_sys::Window>() {
        return Ok(window.fetch_with_request(request));
    }
    if let Some(worker) = global.dyn_ref::<web_sys::WorkerGlobalScope>() {
        return Ok(worker.fetch_with_request(request));
    }
    Err(DecodeError::Fetch("no global fetch available".into()))
}

#[async_trait(?Send)]
impl SourceLoader for BrowserLoader {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, DecodeError> {
        let init = RequestInit::new();
        init.set_method("GET");
        init.set_mode(RequestMode::Cors);
        init.set_credentials(RequestCredentials::SameOrigin);

        let request = Request::new_with_str_and_init(url, &init).map_err(fetch_error)?;
        let response: Response = JsFuture::from(global_fetch(&request)?)
            .await
            .map_err(fetch_error)?
            .dyn_into()
            .map_err(fetch_error)?;

        if !response.ok() {
            return Err(DecodeError::Fetch(format!(
                "{url}: HTTP {} {}",
                response.status(),
                response.status_text()
            )));
        }

        let buffer: ArrayBuffer = JsFuture::from(response.array_buffer().map_err(fetch_error)?)
            .await
            .map_err(fetch_error)?
            .dyn_into()
            .map_err(fetch_error)?;
        let bytes = Uint8Array::new(&buffer).to_vec();
        tracing::debug!(%url, size = bytes.len(), "fetched source image");
        Ok(bytes)
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    async fn test_unreachable_url_is_fetch_error() {
        let err = BrowserLoader
            .fetch("http://127.0.0.1:9/missing.png")
            .await
            .unwrap_err();
        assert!(matches!(err, DecodeError::Fetch(_)));
    }
}
