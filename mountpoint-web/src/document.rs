use mountpoint_nodes::{Host, MountError};
use wasm_bindgen::{intern, prelude::*};

use crate::DomNode;

type ReadyClosure = Closure<dyn FnMut() -> Result<(), JsValue>>;

/// The browser document.
#[derive(Clone, Debug)]
pub struct WebDocument(web_sys::Document);

impl WebDocument {
    pub fn new(document: web_sys::Document) -> Self {
        Self(document)
    }

    pub fn current() -> Result<Self, MountError> {
        crate::document()
            .map(Self)
            .ok_or(MountError::NoDocument)
    }

    pub fn native(&self) -> &web_sys::Document {
        &self.0
    }

    /// Whether `DOMContentLoaded` is still pending.
    pub fn is_loading(&self) -> bool {
        self.0.ready_state() == "loading"
    }
}

impl Host for WebDocument {
    type Node = DomNode;

    fn element_by_id(&self, id: &str) -> Option<DomNode> {
        self.0.get_element_by_id(id).map(DomNode::from_element)
    }

    fn on_ready<F>(&self, f: F) -> Result<(), MountError>
    where
        F: FnOnce() -> Result<(), MountError> + 'static,
    {
        // wasm modules often finish instantiating after the event has already fired
        if !self.is_loading() {
            tracing::trace!(
                ready_state = %self.0.ready_state(),
                "document already parsed, running ready callback now"
            );
            return f();
        }

        let closure = ReadyClosure::once(move || into_js_result(f()));

        let options = web_sys::AddEventListenerOptions::new();
        options.set_once(true);

        self.0
            .add_event_listener_with_callback_and_add_event_listener_options(
                intern("DOMContentLoaded"),
                closure.as_ref().unchecked_ref(),
                &options,
            )
            .map_err(|err| MountError::Listener(format!("{err:?}")))?;

        // the listener lives for the rest of the page
        closure.forget();
        tracing::trace!("waiting for DOMContentLoaded");
        Ok(())
    }
}

/// Listener errors are thrown to the page as JS `Error`s.
fn into_js_result(res: Result<(), MountError>) -> Result<(), JsValue> {
    res.map_err(|err| js_sys::Error::new(&err.to_string()).into())
}

#[cfg(all(test, target_family = "wasm"))]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use mountpoint_nodes::{Host, MountError, Node};
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::*;

    use super::{into_js_result, WebDocument};

    wasm_bindgen_test_configure!(run_in_browser);

    /// A same-origin frame document reopened with `document.open()`, which puts it back into
    /// the `loading` state.
    fn loading_document() -> (web_sys::HtmlIFrameElement, web_sys::Document) {
        let doc = WebDocument::current().unwrap();
        let iframe: web_sys::HtmlIFrameElement = doc
            .native()
            .create_element("iframe")
            .unwrap()
            .unchecked_into();
        doc.native().body().unwrap().append_child(&iframe).unwrap();

        let native = iframe.content_document().unwrap().open().unwrap();
        (iframe, native)
    }

    fn fire_content_loaded(native: &web_sys::Document) {
        let event = web_sys::Event::new("DOMContentLoaded").unwrap();
        native.dispatch_event(&event).unwrap();
    }

    #[wasm_bindgen_test]
    fn element_by_id_wraps_existing_element() {
        let doc = WebDocument::current().unwrap();
        let native = doc.native().create_element("div").unwrap();
        native.set_id("web-lookup");
        doc.native().body().unwrap().append_child(&native).unwrap();

        let node = doc.element_by_id("web-lookup").unwrap();
        assert_eq!(node.attr("id").as_deref(), Some("web-lookup"));
        assert!(doc.element_by_id("web-missing").is_none());

        native.remove();
    }

    #[wasm_bindgen_test]
    fn parsed_document_runs_callback_immediately() {
        let doc = WebDocument::current().unwrap();
        assert!(!doc.is_loading());

        let ran = Rc::new(Cell::new(false));
        let r = ran.clone();
        doc.on_ready(move || {
            r.set(true);
            Ok(())
        })
        .unwrap();
        assert!(ran.get());

        let err = doc.on_ready(|| Err(MountError::NoDocument)).unwrap_err();
        assert_eq!(err, MountError::NoDocument);
    }

    #[wasm_bindgen_test]
    fn loading_document_waits_for_content_loaded() {
        let (iframe, native) = loading_document();
        let doc = WebDocument::new(native.clone());
        assert!(doc.is_loading());

        let calls = Rc::new(Cell::new(0));
        let c = calls.clone();
        doc.on_ready(move || {
            c.set(c.get() + 1);
            Ok(())
        })
        .unwrap();
        assert_eq!(calls.get(), 0);

        fire_content_loaded(&native);
        assert_eq!(calls.get(), 1);

        fire_content_loaded(&native);
        assert_eq!(calls.get(), 1);

        native.close().unwrap();
        iframe.remove();
    }

    #[wasm_bindgen_test]
    fn listener_errors_become_js_errors() {
        assert!(into_js_result(Ok(())).is_ok());

        let err = into_js_result(Err(MountError::MissingMountNode {
            id: "react-node".to_string(),
        }))
        .unwrap_err()
        .dyn_into::<js_sys::Error>()
        .unwrap();

        assert_eq!(
            String::from(err.message()),
            "no element with id `react-node` to mount into"
        );
    }
}
