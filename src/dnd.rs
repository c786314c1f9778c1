use crate::config::UiConfig;
use crate::error::{Result, UiError};
use crate::util::query_all;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

/// Id -> element map owned by whoever owns both drag sources and drop targets.
///
/// Drops resolve the dragged id here instead of searching the whole document.
#[derive(Clone, Debug)]
pub struct Registry<E> {
    elements: HashMap<String, E>,
}

pub type ElementRegistry = Registry<web_sys::Element>;

impl<E> Default for Registry<E> {
    fn default() -> Self {
        Self {
            elements: HashMap::new(),
        }
    }
}

impl<E: Clone> Registry<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the element previously registered under `id`, if any.
    pub fn register(&mut self, id: impl Into<String>, element: E) -> Option<E> {
        self.elements.insert(id.into(), element)
    }

    pub fn unregister(&mut self, id: &str) -> Option<E> {
        self.elements.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&E> {
        self.elements.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    pub fn resolve(&self, id: &str) -> Result<E> {
        self.elements
            .get(id)
            .cloned()
            .ok_or_else(|| UiError::UnknownElement(id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// `dragover` handler: lets the target accept a drop.
pub fn allow_drop(ev: &web_sys::DragEvent, debug_alert: bool) {
    if debug_alert {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message("test");
        }
    }
    ev.prevent_default();
}

/// `dragstart` handler: puts the dragged element's id into the transfer medium.
///
/// Returns the id that was stored.
pub fn drag(ev: &web_sys::DragEvent, format: &str) -> Result<String> {
    let id = ev
        .current_target()
        .or_else(|| ev.target())
        .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
        .map(|el| el.id())
        .unwrap_or_default();

    let dt = ev.data_transfer().ok_or(UiError::NoDataTransfer)?;
    dt.set_data(format, &id)?;
    dt.set_effect_allowed("move");
    Ok(id)
}

/// `drop` handler: moves the dragged element to the end of `target`.
///
/// The default action is always prevented. On a lookup failure nothing in the
/// DOM changes.
pub fn drop(
    ev: &web_sys::DragEvent,
    format: &str,
    registry: &ElementRegistry,
    target: &web_sys::Element,
) -> Result<web_sys::Element> {
    ev.prevent_default();

    let dt = ev.data_transfer().ok_or(UiError::NoDataTransfer)?;
    let id = dt.get_data(format)?;
    relocate(registry, &id, target)
}

/// Appends the element registered under `id` as the last child of `target`.
pub fn relocate(
    registry: &ElementRegistry,
    id: &str,
    target: &web_sys::Element,
) -> Result<web_sys::Element> {
    let element = registry.resolve(id)?;
    target.append_child(&element)?;
    log::debug!("moved #{id} into drop target");
    Ok(element)
}

struct BoardInner {
    registry: RefCell<ElementRegistry>,
    format: String,
    debug_alert: bool,
}

/// Owns a set of drag sources and drop targets and wires their listeners.
#[derive(Clone)]
pub struct DragBoard {
    inner: Rc<BoardInner>,
}

impl DragBoard {
    pub fn new(format: impl Into<String>, debug_alert: bool) -> Self {
        Self {
            inner: Rc::new(BoardInner {
                registry: RefCell::new(ElementRegistry::new()),
                format: format.into(),
                debug_alert,
            }),
        }
    }

    pub fn from_config(cfg: &UiConfig) -> Self {
        Self::new(cfg.drag_format.clone(), cfg.debug_alert)
    }

    /// Registers everything matching the configured selectors in `document`.
    pub fn attach(document: &web_sys::Document, cfg: &UiConfig) -> Result<Self> {
        let board = Self::from_config(cfg);

        for el in query_all(document, &cfg.drag_source_selector)? {
            board.register_source(&el)?;
        }
        for el in query_all(document, &cfg.drop_target_selector)? {
            board.register_target(&el)?;
        }

        log::debug!(
            "drag board: {} sources registered",
            board.inner.registry.borrow().len()
        );
        Ok(board)
    }

    pub fn format(&self) -> &str {
        &self.inner.format
    }

    pub fn debug_alert(&self) -> bool {
        self.inner.debug_alert
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.inner.registry.borrow().contains(id)
    }

    pub fn source_count(&self) -> usize {
        self.inner.registry.borrow().len()
    }

    /// Makes `element` draggable and resolvable on drop. Elements without an id
    /// are skipped.
    pub fn register_source(&self, element: &web_sys::Element) -> Result<()> {
        let id = element.id();
        if id.trim().is_empty() {
            log::warn!("drag source without id, skipping");
            return Ok(());
        }

        element.set_attribute("draggable", "true")?;
        self.inner
            .registry
            .borrow_mut()
            .register(id, element.clone());

        let board = self.clone();
        let cb = Closure::<dyn FnMut(web_sys::DragEvent)>::new(move |ev: web_sys::DragEvent| {
            match drag(&ev, board.format()) {
                Ok(id) => log::debug!("drag start #{id}"),
                Err(e) => log::error!("drag start failed: {e}"),
            }
        });
        element.add_event_listener_with_callback("dragstart", cb.as_ref().unchecked_ref())?;
        cb.forget();
        Ok(())
    }

    /// Adds `element` to the registry only. For sources whose `dragstart` is
    /// wired by the markup itself (`ondragstart="drag(event)"`).
    pub fn track(&self, element: &web_sys::Element) -> bool {
        let id = element.id();
        if id.trim().is_empty() {
            return false;
        }
        self.inner
            .registry
            .borrow_mut()
            .register(id, element.clone());
        true
    }

    pub fn unregister_source(&self, id: &str) -> Option<web_sys::Element> {
        self.inner.registry.borrow_mut().unregister(id)
    }

    /// Wires `dragover` and `drop` on `element`.
    pub fn register_target(&self, element: &web_sys::Element) -> Result<()> {
        let debug_alert = self.inner.debug_alert;
        let over = Closure::<dyn FnMut(web_sys::DragEvent)>::new(move |ev: web_sys::DragEvent| {
            allow_drop(&ev, debug_alert);
        });
        element.add_event_listener_with_callback("dragover", over.as_ref().unchecked_ref())?;
        over.forget();

        let board = self.clone();
        let target = element.clone();
        let on_drop = Closure::<dyn FnMut(web_sys::DragEvent)>::new(move |ev: web_sys::DragEvent| {
            if let Err(e) = board.handle_drop(&ev, &target) {
                log::error!("drop failed: {e}");
            }
        });
        element.add_event_listener_with_callback("drop", on_drop.as_ref().unchecked_ref())?;
        on_drop.forget();
        Ok(())
    }

    pub fn handle_drop(
        &self,
        ev: &web_sys::DragEvent,
        target: &web_sys::Element,
    ) -> Result<web_sys::Element> {
        let registry = self.inner.registry.borrow();
        drop(ev, &self.inner.format, &registry, target)
    }
}


// WASM-only tests (run with `cargo test --target wasm32-unknown-unknown` + wasm-bindgen-test-runner)
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn document() -> web_sys::Document {
        web_sys::window()
            .and_then(|w| w.document())
            .expect("test runs in a browser")
    }

    fn element(doc: &web_sys::Document, id: &str) -> web_sys::Element {
        let el = doc.create_element("div").expect("create element");
        if !id.is_empty() {
            el.set_id(id);
        }
        doc.body().expect("body").append_child(&el).expect("append");
        el
    }

    fn drag_event(kind: &str, dt: &web_sys::DataTransfer) -> web_sys::DragEvent {
        let init = web_sys::DragEventInit::new();
        init.set_bubbles(true);
        init.set_cancelable(true);
        init.set_data_transfer(Some(dt));
        web_sys::DragEvent::new_with_event_init_dict(kind, &init).expect("create drag event")
    }

    fn transfer() -> web_sys::DataTransfer {
        web_sys::DataTransfer::new().expect("create DataTransfer")
    }

    #[wasm_bindgen_test]
    fn test_drag_then_drop_moves_element_to_end_of_target() {
        let doc = document();
        let board = DragBoard::new("text", false);

        let src = element(&doc, "dnd-src-x");
        let target = element(&doc, "dnd-target-1");
        let existing = doc.create_element("span").expect("span");
        target.append_child(&existing).expect("seed child");

        board.register_source(&src).expect("register source");
        board.register_target(&target).expect("register target");

        let dt = transfer();
        src.dispatch_event(&drag_event("dragstart", &dt)).expect("dragstart");
        assert_eq!(dt.get_data("text").expect("get data"), "dnd-src-x");

        let drop_ev = drag_event("drop", &dt);
        target.dispatch_event(&drop_ev).expect("drop");

        assert!(drop_ev.default_prevented());
        let last = target.last_element_child().expect("target has children");
        assert_eq!(last.id(), "dnd-src-x");
        assert_eq!(target.child_element_count(), 2);
    }

    #[wasm_bindgen_test]
    fn test_allow_drop_prevents_default() {
        let dt = transfer();
        let ev = drag_event("dragover", &dt);
        allow_drop(&ev, false);
        assert!(ev.default_prevented());
    }

    #[wasm_bindgen_test]
    fn test_dragover_on_registered_target_is_cancelled() {
        let doc = document();
        let board = DragBoard::new("text", false);
        let target = element(&doc, "dnd-target-over");
        board.register_target(&target).expect("register target");

        let ev = drag_event("dragover", &transfer());
        let not_cancelled = target.dispatch_event(&ev).expect("dragover");
        assert!(!not_cancelled);
    }

    #[wasm_bindgen_test]
    fn test_drop_unknown_id_fails_without_mutation() {
        let doc = document();
        let board = DragBoard::new("text", false);
        let target = element(&doc, "dnd-target-2");
        let stray = element(&doc, "dnd-unregistered");

        let dt = transfer();
        dt.set_data("text", "dnd-unregistered").expect("set data");
        let ev = drag_event("drop", &dt);

        let err = board.handle_drop(&ev, &target).expect_err("lookup should fail");
        assert_eq!(err, UiError::UnknownElement("dnd-unregistered".to_string()));
        assert!(ev.default_prevented());
        assert_eq!(target.child_element_count(), 0);
        assert_eq!(
            stray.parent_element().map(|p| p.tag_name().to_lowercase()),
            Some("body".to_string())
        );
    }

    #[wasm_bindgen_test]
    fn test_tracked_source_resolves_on_drop_without_listener() {
        let doc = document();
        let board = DragBoard::new("text", false);
        let src = element(&doc, "dnd-tracked");
        let target = element(&doc, "dnd-tracked-target");

        assert!(board.track(&src));
        assert!(!board.track(&element(&doc, "")));
        assert_eq!(board.source_count(), 1);

        let dt = transfer();
        dt.set_data("text", "dnd-tracked").expect("set data");
        let moved = board
            .handle_drop(&drag_event("drop", &dt), &target)
            .expect("tracked id resolves");
        assert_eq!(moved.id(), "dnd-tracked");
        assert_eq!(target.child_element_count(), 1);
    }

    #[wasm_bindgen_test]
    fn test_source_without_id_is_skipped() {
        let doc = document();
        let board = DragBoard::new("text", false);
        let anon = element(&doc, "");
        board.register_source(&anon).expect("register source");
        assert_eq!(board.source_count(), 0);
    }

    #[wasm_bindgen_test]
    fn test_attach_registers_sources_from_markup() {
        let doc = document();
        let holder = element(&doc, "dnd-attach-holder");
        holder.set_inner_html(
            r#"<div class="dnd-attach-src" draggable="true" id="dnd-attach-a"></div>
               <div class="dnd-attach-src" draggable="true" id="dnd-attach-b"></div>
               <div class="dnd-attach-target" data-drop-target></div>"#,
        );

        let cfg = UiConfig {
            drag_source_selector: ".dnd-attach-src".to_string(),
            drop_target_selector: ".dnd-attach-target".to_string(),
            ..UiConfig::default()
        };
        let board = DragBoard::attach(&doc, &cfg).expect("attach");
        assert_eq!(board.source_count(), 2);
        assert!(board.is_registered("dnd-attach-a"));

        let target = doc
            .query_selector(".dnd-attach-target")
            .expect("query")
            .expect("target exists");
        let dt = transfer();
        dt.set_data("text", "dnd-attach-b").expect("set data");
        target.dispatch_event(&drag_event("drop", &dt)).expect("drop");

        let last = target.last_element_child().expect("moved child");
        assert_eq!(last.id(), "dnd-attach-b");
    }
}
