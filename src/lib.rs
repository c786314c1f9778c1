//! Progressive enhancement for server-rendered admin pages: clickable table
//! rows, drag-and-drop relocation between registered containers, and an
//! unsaved-changes warning on unload.

pub mod bindings;
pub mod components;
pub mod config;
pub mod dnd;
pub mod error;
pub mod guard;
pub mod logging;
pub mod page;
pub mod rows;
mod util;

pub use config::UiConfig;
pub use dnd::{allow_drop, drag, drop, DragBoard, ElementRegistry, Registry};
pub use error::{Result, UiError};
pub use guard::{provide_page_guard, use_page_guard, PageGuard, SaveState};
pub use page::{enhance_document, Page};
pub use bindings::{install, publish_globals};
pub use rows::{bind_clickable_rows, bind_clickable_rows_with, row_target};

// Needed for `#[wasm_bindgen(start)]` on the wasm entrypoint.
#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;

// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();
    logging::init(log::LevelFilter::Warn);

    // Inline markup may call the handlers before the document is parsed.
    if let Err(e) = publish_globals() {
        log::error!("could not publish page handlers: {e}");
    }

    let booted = page::when_ready(|| {
        let config = UiConfig::load();
        logging::init(config.level_filter());

        match enhance_document(config) {
            Ok(page) => {
                // A save made through the inline handlers before load still counts.
                let guard = page.guard();
                if install(page).is_some_and(|early| early.guard().is_saved_untracked()) {
                    guard.save_page();
                }
            }
            Err(e) => log::error!("page enhancement failed: {e}"),
        }
    });

    if let Err(e) = booted {
        log::error!("could not schedule page enhancement: {e}");
    }
}
