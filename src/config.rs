use serde::{Deserialize, Serialize};

/// Name of the page global the hosting markup may define to override defaults,
/// e.g. `<script>window.HESTIA_UI = { debug_alert: true }</script>`.
pub const CONFIG_GLOBAL: &str = "HESTIA_UI";

pub const DEFAULT_ROW_SELECTOR: &str = ".clickable-row";
pub const DEFAULT_ROW_HREF_ATTR: &str = "data-href";
pub const DEFAULT_DRAG_SOURCE_SELECTOR: &str = "[draggable=true][id]";
pub const DEFAULT_DROP_TARGET_SELECTOR: &str = "[data-drop-target]";
pub const DEFAULT_SAVE_SELECTOR: &str = "[data-save-page]";
pub const DEFAULT_DRAG_FORMAT: &str = "text";
pub const DEFAULT_UNSAVED_MESSAGE: &str = "Page Not Saved!";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct UiConfig {
    pub row_selector: String,
    pub row_href_attr: String,
    pub drag_source_selector: String,
    pub drop_target_selector: String,
    pub save_selector: String,
    pub drag_format: String,
    pub unsaved_message: String,

    /// Blocking `alert("test")` on every dragover. Leftover instrumentation, off unless asked for.
    pub debug_alert: bool,

    /// One of `off|error|warn|info|debug|trace`.
    pub log_level: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            row_selector: DEFAULT_ROW_SELECTOR.to_string(),
            row_href_attr: DEFAULT_ROW_HREF_ATTR.to_string(),
            drag_source_selector: DEFAULT_DRAG_SOURCE_SELECTOR.to_string(),
            drop_target_selector: DEFAULT_DROP_TARGET_SELECTOR.to_string(),
            save_selector: DEFAULT_SAVE_SELECTOR.to_string(),
            drag_format: DEFAULT_DRAG_FORMAT.to_string(),
            unsaved_message: DEFAULT_UNSAVED_MESSAGE.to_string(),
            debug_alert: false,
            log_level: "warn".to_string(),
        }
    }
}

impl UiConfig {
    /// Reads `window.HESTIA_UI`. Absent or unparsable config yields the defaults.
    pub fn load() -> Self {
        let Some(window) = web_sys::window() else {
            return Self::default();
        };
        let Some(raw) = window.get(CONFIG_GLOBAL) else {
            return Self::default();
        };
        if raw.is_undefined() || raw.is_null() || !raw.is_object() {
            return Self::default();
        }

        let json = js_sys::JSON::stringify(&raw)
            .ok()
            .and_then(|s| s.as_string())
            .unwrap_or_default();

        match Self::from_json(&json) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!("ignoring malformed window.{CONFIG_GLOBAL}: {e}");
                Self::default()
            }
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let cfg: Self = serde_json::from_str(json)?;
        Ok(cfg.normalized())
    }

    /// Blank strings fall back to their defaults so a half-filled global cannot
    /// produce an empty selector.
    pub fn normalized(mut self) -> Self {
        let defaults = Self::default();

        fn fill(field: &mut String, default: String) {
            if field.trim().is_empty() {
                *field = default;
            }
        }

        fill(&mut self.row_selector, defaults.row_selector);
        fill(&mut self.row_href_attr, defaults.row_href_attr);
        fill(&mut self.drag_source_selector, defaults.drag_source_selector);
        fill(&mut self.drop_target_selector, defaults.drop_target_selector);
        fill(&mut self.save_selector, defaults.save_selector);
        fill(&mut self.drag_format, defaults.drag_format);
        fill(&mut self.unsaved_message, defaults.unsaved_message);
        fill(&mut self.log_level, defaults.log_level);
        self
    }

    pub fn level_filter(&self) -> log::LevelFilter {
        crate::logging::parse_level(&self.log_level)
    }
}
