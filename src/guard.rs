use crate::config::DEFAULT_UNSAVED_MESSAGE;
use crate::error::Result;
use crate::util::query_all;
use leptos::ev;
use leptos::prelude::*;
use leptos_dom::helpers::{window_event_listener, WindowListenerHandle};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

/// Whether the page's edits have been saved. Starts unsaved and never goes back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SaveState {
    saved: bool,
}

impl SaveState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save(&mut self) {
        self.saved = true;
    }

    pub fn is_saved(&self) -> bool {
        self.saved
    }

    /// Warning to hand to `beforeunload`, or `None` to let the page go quietly.
    pub fn leave_message<'a>(&self, message: &'a str) -> Option<&'a str> {
        if self.saved {
            None
        } else {
            Some(message)
        }
    }
}

/// Page-level owner of the saved flag, shared by handle between the save action
/// and the unload hook.
#[derive(Clone, Copy)]
pub struct PageGuard {
    state: RwSignal<SaveState>,
    message: StoredValue<String>,
}

impl PageGuard {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            state: RwSignal::new(SaveState::new()),
            message: StoredValue::new(message.into()),
        }
    }

    pub fn save_page(&self) {
        if !self.state.get_untracked().is_saved() {
            log::debug!("page marked as saved");
        }
        self.state.update(|s| s.save());
    }

    pub fn leave_page(&self) -> Option<String> {
        let state = self.state.get_untracked();
        let message = self.message.get_value();
        state.leave_message(&message).map(str::to_string)
    }

    pub fn is_saved_untracked(&self) -> bool {
        self.state.get_untracked().is_saved()
    }

    /// Reactive view of the flag for components.
    pub fn saved(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.get().is_saved())
    }

    /// `beforeunload` consumer: asks the browser to confirm only while unsaved.
    pub fn handle_before_unload(&self, ev: &web_sys::BeforeUnloadEvent) {
        if let Some(msg) = self.leave_page() {
            ev.prevent_default();
            ev.set_return_value(&msg);
        }
    }

    pub fn install_before_unload(&self) -> WindowListenerHandle {
        let guard = *self;
        window_event_listener(ev::beforeunload, move |ev: web_sys::BeforeUnloadEvent| {
            guard.handle_before_unload(&ev);
        })
    }

    /// Every element matching `selector` becomes a save action. Returns how many
    /// were bound.
    pub fn bind_save_buttons(&self, document: &web_sys::Document, selector: &str) -> Result<usize> {
        let buttons = query_all(document, selector)?;
        for button in buttons.iter() {
            let guard = *self;
            let cb = Closure::<dyn FnMut(web_sys::Event)>::new(move |_ev: web_sys::Event| {
                guard.save_page();
            });
            button.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
            cb.forget();
        }
        Ok(buttons.len())
    }
}

impl Default for PageGuard {
    fn default() -> Self {
        Self::new(DEFAULT_UNSAVED_MESSAGE)
    }
}

pub fn provide_page_guard(message: impl Into<String>) -> PageGuard {
    let guard = PageGuard::new(message);
    provide_context(guard);
    guard
}

pub fn use_page_guard() -> PageGuard {
    expect_context::<PageGuard>()
}
