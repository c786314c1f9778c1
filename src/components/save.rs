use crate::components::ui::{Button, ButtonSize, ButtonVariant};
use crate::guard::use_page_guard;
use leptos::prelude::*;
use tw_merge::tw_merge;

/// Marks the page as saved. Needs a guard from `provide_page_guard` above it.
#[component]
pub fn SaveButton(
    #[prop(into, optional)] class: String,
    #[prop(optional)] on_save: Option<Callback<()>>,
    children: Children,
) -> impl IntoView {
    let guard = use_page_guard();

    let on_click = move |_ev: web_sys::MouseEvent| {
        guard.save_page();
        if let Some(cb) = on_save {
            cb.run(());
        }
    };

    view! {
        <Button
            class=class
            variant=ButtonVariant::Default
            size=ButtonSize::Sm
            attr:data-save-page=""
            on:click=on_click
        >
            {children()}
        </Button>
    }
}

#[component]
pub fn SaveStatus(#[prop(into, optional)] class: String) -> impl IntoView {
    let saved = use_page_guard().saved();
    let merged_class = tw_merge!("text-xs text-muted-foreground", class);

    view! {
        <span class=merged_class>
            {move || if saved.get() { "Saved" } else { "Unsaved changes" }}
        </span>
    }
}
