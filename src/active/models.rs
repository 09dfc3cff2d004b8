//! Normalisation of `customModels` lists for the merge apply mode.
//!
//! Configurations may describe models in a loose snake_case shape
//! (`model_display_name`, `base_url`, `api_key`, ...). The tool reading the
//! active settings file expects camelCase objects carrying an `id` and an
//! `index`; models already in that shape pass through untouched.

use serde::Serialize;
use serde_json::{Map, Value};

/// Default output token limit when a model does not specify one.
pub const DEFAULT_MAX_OUTPUT_TOKENS: i64 = 8192;

/// Default provider when a model does not specify one.
pub const DEFAULT_PROVIDER: &str = "anthropic";

/// Key holding the model list in both entries and the active file.
pub const MODELS_KEY: &str = "customModels";

const LEGACY_MODELS_KEY: &str = "custom_models";

/// A model in the shape the active settings file expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomModel {
    pub model: String,
    pub id: String,
    pub index: usize,
    pub base_url: String,
    pub api_key: String,
    pub display_name: String,
    pub max_output_tokens: i64,
    pub no_image_support: bool,
    pub provider: String,
}

/// Whether a model object already carries the normalised identity fields.
pub fn is_normalized(model: &Value) -> bool {
    model.get("id").is_some() && model.get("index").is_some() && model.get("displayName").is_some()
}

fn str_field<'a>(model: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|k| model.get(*k)).and_then(Value::as_str)
}

impl CustomModel {
    /// Build the normalised form of a loosely shaped model at `index`.
    pub fn from_loose(model: &Value, index: usize) -> Self {
        let display_name = str_field(model, &["model_display_name", "displayName"])
            .unwrap_or("Unknown")
            .to_string();

        let max_output_tokens = ["max_tokens", "maxOutputTokens"]
            .iter()
            .find_map(|k| model.get(*k))
            .and_then(Value::as_i64)
            .unwrap_or(DEFAULT_MAX_OUTPUT_TOKENS);

        // supports_images takes precedence and is inverted.
        let no_image_support = model
            .get("supports_images")
            .and_then(Value::as_bool)
            .map(|supported| !supported)
            .or_else(|| model.get("noImageSupport").and_then(Value::as_bool))
            .unwrap_or(false);

        Self {
            model: str_field(model, &["model"]).unwrap_or_default().to_string(),
            id: format!("custom:{}-{}", display_name.replace(' ', "-"), index),
            index,
            base_url: str_field(model, &["base_url", "baseUrl"])
                .unwrap_or_default()
                .to_string(),
            api_key: str_field(model, &["api_key", "apiKey"])
                .unwrap_or_default()
                .to_string(),
            display_name,
            max_output_tokens,
            no_image_support,
            provider: str_field(model, &["provider"])
                .unwrap_or(DEFAULT_PROVIDER)
                .to_string(),
        }
    }
}

/// Normalise a single model.
pub fn normalize_model(model: &Value, index: usize) -> Value {
    if is_normalized(model) {
        return model.clone();
    }
    serde_json::to_value(CustomModel::from_loose(model, index)).unwrap_or(Value::Null)
}

/// Normalised model list of a configuration document.
///
/// Reads `customModels`, falling back to `custom_models`. Anything else
/// yields an empty list.
pub fn normalize_models(config: &Value) -> Vec<Value> {
    config
        .get(MODELS_KEY)
        .or_else(|| config.get(LEGACY_MODELS_KEY))
        .and_then(Value::as_array)
        .map(|models| {
            models
                .iter()
                .enumerate()
                .map(|(i, m)| normalize_model(m, i))
                .collect()
        })
        .unwrap_or_default()
}

/// Replace the model list of `target` (or of a fresh document) with `models`.
///
/// Other keys of the target are kept in place.
pub fn merge_models(target: Option<Value>, models: Vec<Value>) -> Value {
    let mut doc = match target {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };
    doc.insert(MODELS_KEY.to_string(), Value::Array(models));
    Value::Object(doc)
}

/// Document holding only the model list of `settings`, as stored by import.
pub fn extract_models(settings: &Value) -> Value {
    let models = settings
        .get(MODELS_KEY)
        .cloned()
        .unwrap_or_else(|| Value::Array(Vec::new()));
    let mut doc = Map::new();
    doc.insert(MODELS_KEY.to_string(), models);
    Value::Object(doc)
}
