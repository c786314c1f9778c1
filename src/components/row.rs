use crate::rows::{navigate_to, row_target};
use leptos::prelude::*;
use tw_merge::tw_merge;

/// Table row that navigates to `href` when clicked.
///
/// Renders the same `clickable-row` / `data-href` markup the server templates
/// use, so `bind_clickable_rows` and this component agree on the contract.
#[component]
pub fn ClickableRow(
    #[prop(into)] href: String,
    #[prop(into, optional)] class: String,
    children: Children,
) -> impl IntoView {
    let merged_class = tw_merge!(
        "clickable-row cursor-pointer hover:bg-muted/50",
        class
    );
    let target = row_target(Some(href.clone()));

    let on_click = move |_ev: web_sys::MouseEvent| {
        let Some(url) = target.as_deref() else {
            return;
        };
        if let Err(e) = navigate_to(url) {
            log::error!("row navigation to {url:?} failed: {e}");
        }
    };

    view! {
        <tr class=merged_class data-href=href on:click=on_click>
            {children()}
        </tr>
    }
}
