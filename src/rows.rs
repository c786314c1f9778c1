use crate::error::{Result, UiError};
use crate::util::query_all;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

/// Destination of a clickable row, given the raw attribute value.
///
/// A missing or blank attribute means the click does nothing.
pub fn row_target(href: Option<String>) -> Option<String> {
    let href = href?;
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    Some(href.to_string())
}

/// Full page navigation, same as assigning `window.location`.
pub fn navigate_to(url: &str) -> Result<()> {
    let window = web_sys::window().ok_or(UiError::NoWindow)?;
    window.location().set_href(url)?;
    Ok(())
}

/// Attaches a click listener to every row matching `selector` that exists right
/// now. Rows added later are not picked up.
///
/// Returns the number of rows bound.
pub fn bind_clickable_rows(
    document: &web_sys::Document,
    selector: &str,
    href_attr: &str,
) -> Result<usize> {
    bind_clickable_rows_with(document, selector, href_attr, |url: &str| {
        if let Err(e) = navigate_to(url) {
            log::error!("row navigation to {url:?} failed: {e}");
        }
    })
}

/// Same as [`bind_clickable_rows`] with a caller-supplied navigator.
pub fn bind_clickable_rows_with<F>(
    document: &web_sys::Document,
    selector: &str,
    href_attr: &str,
    navigate: F,
) -> Result<usize>
where
    F: Fn(&str) + 'static,
{
    let rows = query_all(document, selector)?;
    let navigate: Rc<dyn Fn(&str)> = Rc::new(navigate);

    for row in rows.iter() {
        let row_el = row.clone();
        let attr = href_attr.to_string();
        let navigate = navigate.clone();

        // The attribute is read at click time so markup edits after binding still apply.
        let cb = Closure::<dyn FnMut(web_sys::Event)>::new(move |_ev: web_sys::Event| {
            let Some(url) = row_target(row_el.get_attribute(&attr)) else {
                log::debug!("clickable row without {attr}, ignoring click");
                return;
            };
            log::debug!("row click -> {url}");
            navigate(&url);
        });

        row.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;

        // Rows live for the page lifetime; no cleanup needed.
        cb.forget();
    }

    log::debug!("bound {} clickable rows ({selector})", rows.len());
    Ok(rows.len())
}
