use thpace_core::{Settings, SettingsPatch};
use wasm_bindgen::JsValue;

pub fn patch_from_js(value: &JsValue) -> Option<SettingsPatch> {
    if value.is_undefined() || value.is_null() {
        return Some(SettingsPatch::default());
    }
    #[allow(deprecated)]
    match value.into_serde::<SettingsPatch>() {
        Ok(patch) => Some(patch),
        Err(e) => {
            log::warn!("ignoring invalid settings: {}", e);
            None
        }
    }
}

pub fn settings_to_js(settings: &Settings) -> JsValue {
    #[allow(deprecated)]
    JsValue::from_serde(settings).unwrap_or(JsValue::NULL)
}
