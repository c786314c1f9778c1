use crate::config::UiConfig;
use crate::dnd::{self, DragBoard};
use crate::error::{Result, UiError};
use crate::guard::PageGuard;
use crate::page::{self, Page};
use std::cell::RefCell;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

thread_local! {
    static CURRENT_PAGE: RefCell<Option<Page>> = RefCell::new(None);
}

/// Makes `page` the one the exported handlers act on and keeps it alive for
/// the rest of the page. Returns the page it replaces.
pub fn install(page: Page) -> Option<Page> {
    CURRENT_PAGE.with(|slot| slot.borrow_mut().replace(page))
}

/// Handles of the installed page, or of a detached default page when nothing
/// has been installed yet.
fn handles() -> (DragBoard, PageGuard) {
    CURRENT_PAGE.with(|slot| {
        let mut slot = slot.borrow_mut();
        let page = slot.get_or_insert_with(|| page::detached(UiConfig::default()));
        (page.board().clone(), page.guard())
    })
}

fn event_element(ev: &web_sys::Event) -> Option<web_sys::Element> {
    ev.current_target()
        .or_else(|| ev.target())
        .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
}

fn to_js(e: UiError) -> JsValue {
    js_sys::Error::new(&e.to_string()).into()
}

#[wasm_bindgen(js_name = allowDrop)]
pub fn allow_drop_handler(ev: web_sys::DragEvent) {
    let (board, _) = handles();
    dnd::allow_drop(&ev, board.debug_alert());
}

#[wasm_bindgen(js_name = drag)]
pub fn drag_handler(ev: web_sys::DragEvent) -> std::result::Result<(), JsValue> {
    let (board, _) = handles();
    if let Some(source) = event_element(&ev) {
        board.track(&source);
    }
    dnd::drag(&ev, board.format()).map(|_| ()).map_err(to_js)
}

/// Throws on an unknown id, so the failure shows up as an uncaught error in
/// the console like any other inline handler error.
#[wasm_bindgen(js_name = drop)]
pub fn drop_handler(ev: web_sys::DragEvent) -> std::result::Result<(), JsValue> {
    let (board, _) = handles();
    ev.prevent_default();

    let target = event_element(&ev)
        .ok_or_else(|| to_js(UiError::Dom("drop event has no target".to_string())))?;
    board.handle_drop(&ev, &target).map(|_| ()).map_err(|e| {
        log::error!("drop failed: {e}");
        to_js(e)
    })
}

#[wasm_bindgen(js_name = savePage)]
pub fn save_page_handler() {
    handles().1.save_page();
}

/// `undefined` once saved, the warning text otherwise.
#[wasm_bindgen(js_name = leavePage)]
pub fn leave_page_handler() -> Option<String> {
    handles().1.leave_page()
}

fn set_global(window: &JsValue, name: &str, f: JsValue) -> Result<()> {
    js_sys::Reflect::set(window, &JsValue::from_str(name), &f)?;
    Ok(())
}

/// Puts the handlers on `window` so markup like `ondrop="drop(event)"` or
/// `onbeforeunload="return leavePage()"` resolves them as globals.
pub fn publish_globals() -> Result<()> {
    let window = web_sys::window().ok_or(UiError::NoWindow)?;
    let window: &JsValue = window.as_ref();

    set_global(
        window,
        "allowDrop",
        Closure::<dyn Fn(web_sys::DragEvent)>::new(allow_drop_handler).into_js_value(),
    )?;
    set_global(
        window,
        "drag",
        Closure::<dyn Fn(web_sys::DragEvent) -> std::result::Result<(), JsValue>>::new(drag_handler)
            .into_js_value(),
    )?;
    set_global(
        window,
        "drop",
        Closure::<dyn Fn(web_sys::DragEvent) -> std::result::Result<(), JsValue>>::new(drop_handler)
            .into_js_value(),
    )?;
    set_global(
        window,
        "savePage",
        Closure::<dyn Fn()>::new(save_page_handler).into_js_value(),
    )?;
    set_global(
        window,
        "leavePage",
        Closure::<dyn Fn() -> Option<String>>::new(leave_page_handler).into_js_value(),
    )?;
    Ok(())
}
