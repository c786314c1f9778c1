use crate::config::UiConfig;
use crate::dnd::DragBoard;
use crate::error::{Result, UiError};
use crate::guard::PageGuard;
use crate::rows::bind_clickable_rows;
use leptos_dom::helpers::WindowListenerHandle;
use wasm_bindgen::JsCast;

/// Everything wired onto one server-rendered page.
pub struct Page {
    config: UiConfig,
    board: DragBoard,
    guard: PageGuard,
    rows_bound: usize,
    save_buttons_bound: usize,
    unload_hook: Option<WindowListenerHandle>,
}

impl Page {
    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    pub fn board(&self) -> &DragBoard {
        &self.board
    }

    pub fn guard(&self) -> PageGuard {
        self.guard
    }

    pub fn rows_bound(&self) -> usize {
        self.rows_bound
    }

    pub fn save_buttons_bound(&self) -> usize {
        self.save_buttons_bound
    }

    /// Stops warning on unload. The saved flag itself is untouched.
    pub fn release_unload_hook(&mut self) {
        if let Some(handle) = self.unload_hook.take() {
            handle.remove();
        }
    }

}

/// A page with its board and guard but nothing bound yet. Inline handlers use
/// this until `enhance` has run.
pub fn detached(config: UiConfig) -> Page {
    let board = DragBoard::from_config(&config);
    let guard = PageGuard::new(config.unsaved_message.clone());
    Page {
        config,
        board,
        guard,
        rows_bound: 0,
        save_buttons_bound: 0,
        unload_hook: None,
    }
}

pub fn enhance_document(config: UiConfig) -> Result<Page> {
    let window = web_sys::window().ok_or(UiError::NoWindow)?;
    let document = window.document().ok_or(UiError::NoDocument)?;
    enhance(&document, config)
}

/// Binds rows, drag sources/targets, save actions and the unload hook.
pub fn enhance(document: &web_sys::Document, config: UiConfig) -> Result<Page> {
    let rows_bound = bind_clickable_rows(document, &config.row_selector, &config.row_href_attr)?;
    let board = DragBoard::attach(document, &config)?;

    let guard = PageGuard::new(config.unsaved_message.clone());
    let save_buttons_bound = guard.bind_save_buttons(document, &config.save_selector)?;
    let unload_hook = Some(guard.install_before_unload());

    log::info!(
        "enhanced page: {rows_bound} rows, {} drag sources, {save_buttons_bound} save actions",
        board.source_count()
    );

    Ok(Page {
        config,
        board,
        guard,
        rows_bound,
        save_buttons_bound,
        unload_hook,
    })
}

/// Runs `f` once the document has been parsed, like jQuery's `ready`.
pub fn when_ready(f: impl FnOnce() + 'static) -> Result<()> {
    let window = web_sys::window().ok_or(UiError::NoWindow)?;
    let document = window.document().ok_or(UiError::NoDocument)?;

    if document.ready_state() != "loading" {
        f();
        return Ok(());
    }

    let cb = wasm_bindgen::closure::Closure::once_into_js(f);
    document.add_event_listener_with_callback("DOMContentLoaded", cb.unchecked_ref())?;
    Ok(())
}
