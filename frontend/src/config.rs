use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";
pub const TOKEN_KEY: &str = "accessToken";
const SETTINGS_KEY: &str = "settings";

/// Backend origin. Override at build time with `MPSU_API_BASE_URL`.
pub fn api_base_url() -> String {
    option_env!("MPSU_API_BASE_URL")
        .unwrap_or(DEFAULT_API_BASE_URL)
        .trim_end_matches('/')
        .to_string()
}

/// Optional parts of the payment schedule screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    #[serde(default = "enabled")]
    pub breakdown_editing: bool,
    #[serde(default = "enabled")]
    pub receipt_printing: bool,
}

fn enabled() -> bool {
    true
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            breakdown_editing: true,
            receipt_printing: true,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub capabilities: Capabilities,
}

pub fn parse_settings(raw: &str) -> AppSettings {
    match serde_json::from_str::<AppSettings>(raw) {
        Ok(settings) => settings,
        Err(err) => {
            log::warn!("ignoring unreadable stored settings: {}", err);
            AppSettings::default()
        }
    }
}

pub fn load_settings() -> AppSettings {
    if let Some(window) = web_sys::window() {
        if let Ok(Some(storage)) = window.local_storage() {
            if let Ok(Some(raw)) = storage.get_item(SETTINGS_KEY) {
                return parse_settings(&raw);
            }
        }
    }
    AppSettings::default()
}

pub fn save_settings(settings: &AppSettings) {
    if let Some(window) = web_sys::window() {
        if let Ok(Some(storage)) = window.local_storage() {
            if let Ok(raw) = serde_json::to_string(settings) {
                if storage.set_item(SETTINGS_KEY, &raw).is_err() {
                    log::warn!("could not persist settings");
                }
            }
        }
    }
}

/// Bearer token left in local storage by the login screen.
pub fn read_token() -> Option<String> {
    let window = web_sys::window()?;
    let storage = window.local_storage().ok()??;
    storage
        .get_item(TOKEN_KEY)
        .ok()
        .flatten()
        .filter(|token| !token.is_empty())
}
