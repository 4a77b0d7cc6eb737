//! LLM Interpreter Adapter
//!
//! Delegates intent and item extraction to an OpenAI-compatible chat
//! endpoint. The model is asked for a single JSON object matching the
//! keyword interpreter's output shape; the reply is validated against the
//! catalog index before anything reaches the state machine.
//!
//! Contract with the engine: this adapter never errors. A failed request,
//! a timeout, or an unparsable reply all degrade to the empty
//! interpretation, which the engine answers with its generic prompt.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::domain::catalog::{normalize, CatalogIndex, StoreSettings};
use crate::domain::dialogue::{Intent, Interpretation};
use crate::domain::order::{ItemKind, LineItem, OrderType, Size, SpiceLevel};
use crate::ports::UtteranceInterpreter;

/// Configuration for the LLM interpreter.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    api_key: Secret<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl LlmConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com".to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// `UtteranceInterpreter` implementation backed by a chat-completion model.
pub struct LlmInterpreter {
    config: LlmConfig,
    client: Client,
    index: Arc<CatalogIndex>,
    settings: Arc<StoreSettings>,
}

impl LlmInterpreter {
    pub fn new(config: LlmConfig, index: Arc<CatalogIndex>, settings: Arc<StoreSettings>) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");
        Self {
            config,
            client,
            index,
            settings,
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.config.base_url)
    }

    fn system_prompt(&self) -> String {
        let menu: Vec<&str> = self.index.entries().iter().map(|e| e.name.as_str()).collect();
        format!(
            "You classify one customer utterance for a food-ordering system. \
             Menu items: {}. Reply with a single JSON object: \
             {{\"intent\": null|\"menu_question\"|\"category_question\"|\"affirm\"|\"negate\"|\"done\"|\"order_type\", \
             \"category\": null|\"pizza\"|\"wings\"|\"pasta\"|\"salad\"|\"side\"|\"beverage\", \
             \"order_type\": null|\"pickup\"|\"delivery\", \
             \"change_cue\": bool, \
             \"items\": [{{\"name\": menu item name, \"qty\": int, \"size\": null|\"small\"|\"medium\"|\"large\", \
             \"spice\": null|\"mild\"|\"medium\"|\"hot\"|\"conflicting\", \"options\": {{}}}}]}}. \
             Use exact menu item names. Use \"conflicting\" when the customer names more than one spice level. \
             No prose, JSON only.",
            menu.join(", ")
        )
    }

    async fn request_completion(&self, text: &str) -> Result<String, String> {
        let body = json!({
            "model": self.config.model,
            "temperature": 0,
            "messages": [
                {"role": "system", "content": self.system_prompt()},
                {"role": "user", "content": text},
            ],
        });

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(self.config.api_key())
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;

        if !response.status().is_success() {
            return Err(format!("status {}", response.status()));
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| format!("bad response body: {}", e))?;
        completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| "no choices in response".to_string())
    }

    /// Validates the model's reply against the catalog; anything the
    /// catalog does not know is dropped rather than invented.
    fn to_interpretation(&self, raw: &str) -> Result<Interpretation, String> {
        let reply: LlmReply = serde_json::from_str(extract_json(raw))
            .map_err(|e| format!("unparsable reply: {}", e))?;

        let intent = match reply.intent.as_deref() {
            Some("menu_question") => Some(Intent::MenuQuestion),
            Some("category_question") => reply
                .category
                .as_deref()
                .and_then(parse_kind)
                .map(Intent::CategoryQuestion),
            Some("affirm") => Some(Intent::Affirm),
            Some("negate") => Some(Intent::Negate),
            Some("done") => Some(Intent::Done),
            Some("order_type") => match reply.order_type.as_deref() {
                Some("pickup") => Some(Intent::OrderTypeStatement(OrderType::Pickup)),
                Some("delivery") => Some(Intent::OrderTypeStatement(OrderType::Delivery)),
                _ => None,
            },
            _ => None,
        };

        let mut interpretation = Interpretation {
            intent,
            items: Vec::new(),
            change_cue: reply.change_cue,
            spice_conflict: false,
        };

        for raw_item in reply.items {
            let key = normalize(&raw_item.name);
            let Some(entry) = self
                .index
                .entries()
                .iter()
                .find(|e| e.normalized_name() == key || e.aliases.contains(&key))
            else {
                warn!(item = %raw_item.name, "LLM named an unknown item, dropping");
                continue;
            };

            let mut item = LineItem::new(entry.kind, entry.name.clone(), raw_item.qty.unwrap_or(1));
            if entry.kind == ItemKind::Pizza {
                item.size = raw_item
                    .size
                    .as_deref()
                    .and_then(parse_size)
                    .filter(|s| self.settings.supports_size(*s));
            }
            if entry.requires_spice {
                match raw_item.spice.as_deref() {
                    Some("conflicting") => interpretation.spice_conflict = true,
                    Some(level) => item.spice = parse_spice(level),
                    None => {}
                }
            }
            let mut options = BTreeMap::new();
            for (name, value) in raw_item.options {
                let value = normalize(&value);
                if entry
                    .options
                    .iter()
                    .any(|spec| spec.name == name && spec.values.contains(&value))
                {
                    options.insert(name, value);
                }
            }
            item.options = options;
            interpretation.items.push(item);
        }

        Ok(interpretation)
    }
}

#[async_trait]
impl UtteranceInterpreter for LlmInterpreter {
    async fn interpret(&self, text: &str) -> Interpretation {
        let raw = match self.request_completion(text).await {
            Ok(raw) => raw,
            Err(reason) => {
                warn!(%reason, "LLM interpreter call failed, using empty interpretation");
                return Interpretation::empty();
            }
        };
        match self.to_interpretation(&raw) {
            Ok(interpretation) => interpretation,
            Err(reason) => {
                warn!(%reason, "LLM reply rejected, using empty interpretation");
                Interpretation::empty()
            }
        }
    }
}

/// Strips a markdown code fence if the model wrapped its JSON in one.
fn extract_json(raw: &str) -> &str {
    let trimmed = raw.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open.strip_suffix("```").unwrap_or(without_open).trim()
}

fn parse_kind(s: &str) -> Option<ItemKind> {
    match s {
        "pizza" => Some(ItemKind::Pizza),
        "side" => Some(ItemKind::Side),
        "beverage" => Some(ItemKind::Beverage),
        "pasta" => Some(ItemKind::Pasta),
        "salad" => Some(ItemKind::Salad),
        "wings" => Some(ItemKind::Wings),
        _ => None,
    }
}

fn parse_size(s: &str) -> Option<Size> {
    match s {
        "small" => Some(Size::Small),
        "medium" => Some(Size::Medium),
        "large" => Some(Size::Large),
        _ => None,
    }
}

fn parse_spice(s: &str) -> Option<SpiceLevel> {
    match s {
        "mild" => Some(SpiceLevel::Mild),
        "medium" => Some(SpiceLevel::Medium),
        "hot" => Some(SpiceLevel::Hot),
        _ => None,
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct LlmReply {
    #[serde(default)]
    intent: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    order_type: Option<String>,
    #[serde(default)]
    change_cue: bool,
    #[serde(default)]
    items: Vec<LlmItem>,
}

#[derive(Debug, Deserialize)]
struct LlmItem {
    name: String,
    #[serde(default)]
    qty: Option<u32>,
    #[serde(default)]
    size: Option<String>,
    #[serde(default)]
    spice: Option<String>,
    #[serde(default)]
    options: BTreeMap<String, String>,
}
