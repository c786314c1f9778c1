use crate::error::{Result, UiError};
use wasm_bindgen::JsCast;

/// Elements currently matching `selector`, in document order.
pub(crate) fn query_all(document: &web_sys::Document, selector: &str) -> Result<Vec<web_sys::Element>> {
    let list = document
        .query_selector_all(selector)
        .map_err(|e| UiError::Selector {
            selector: selector.to_string(),
            reason: UiError::from_js(e).to_string(),
        })?;

    let mut out = Vec::with_capacity(list.length() as usize);
    for i in 0..list.length() {
        if let Some(el) = list.get(i).and_then(|n| n.dyn_into::<web_sys::Element>().ok()) {
            out.push(el);
        }
    }
    Ok(out)
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_query_all_returns_matches_in_document_order() {
        let doc = web_sys::window()
            .and_then(|w| w.document())
            .expect("test runs in a browser");
        let holder = doc.create_element("div").expect("create holder");
        holder.set_inner_html(
            r#"<p class="util-q" id="util-q-1"></p><span></span><p class="util-q" id="util-q-2"></p>"#,
        );
        doc.body().expect("body").append_child(&holder).expect("append");

        let ids: Vec<String> = query_all(&doc, ".util-q")
            .expect("query")
            .iter()
            .map(|el| el.id())
            .collect();
        assert_eq!(ids, vec!["util-q-1".to_string(), "util-q-2".to_string()]);
    }

    #[wasm_bindgen_test]
    fn test_query_all_rejects_bad_selector() {
        let doc = web_sys::window()
            .and_then(|w| w.document())
            .expect("test runs in a browser");
        assert!(matches!(query_all(&doc, "[["), Err(UiError::Selector { .. })));
    }
}
