//! This module contains the keys record edited in the Settings panel and the
//! typed merge that fills it from defaults.

use phf::phf_map;
use serde::{Deserialize, Serialize};

/// The placeholder edit key every fresh record starts with.
pub const DEFAULT_EDIT_MODE_KEY: &str = "1234";

/// Identifies one field of a [`KeysRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyField {
    OpenaiKey,
    GithubToken,
    TtsKey,
    WebhooksUrl,
    OcrKey,
    WebIntegrationKey,
    WhatsappKey,
    EmailSmtp,
    GithubRepo,
    RenderApiKey,
    EditModeKey,
}

static FIELD_BY_NAME: phf::Map<&'static str, KeyField> = phf_map! {
    "openaiKey" => KeyField::OpenaiKey,
    "githubToken" => KeyField::GithubToken,
    "ttsKey" => KeyField::TtsKey,
    "webhooksUrl" => KeyField::WebhooksUrl,
    "ocrKey" => KeyField::OcrKey,
    "webIntegrationKey" => KeyField::WebIntegrationKey,
    "whatsappKey" => KeyField::WhatsappKey,
    "emailSmtp" => KeyField::EmailSmtp,
    "githubRepo" => KeyField::GithubRepo,
    "renderApiKey" => KeyField::RenderApiKey,
    "editModeKey" => KeyField::EditModeKey,
};

impl KeyField {
    /// Every field, in the order the Settings panel lists them.
    pub const ALL: [KeyField; 11] = [
        KeyField::OpenaiKey,
        KeyField::GithubToken,
        KeyField::TtsKey,
        KeyField::WebhooksUrl,
        KeyField::OcrKey,
        KeyField::WebIntegrationKey,
        KeyField::WhatsappKey,
        KeyField::EmailSmtp,
        KeyField::GithubRepo,
        KeyField::RenderApiKey,
        KeyField::EditModeKey,
    ];

    /// The serialized field name.
    pub fn name(self) -> &'static str {
        match self {
            KeyField::OpenaiKey => "openaiKey",
            KeyField::GithubToken => "githubToken",
            KeyField::TtsKey => "ttsKey",
            KeyField::WebhooksUrl => "webhooksUrl",
            KeyField::OcrKey => "ocrKey",
            KeyField::WebIntegrationKey => "webIntegrationKey",
            KeyField::WhatsappKey => "whatsappKey",
            KeyField::EmailSmtp => "emailSmtp",
            KeyField::GithubRepo => "githubRepo",
            KeyField::RenderApiKey => "renderApiKey",
            KeyField::EditModeKey => "editModeKey",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            KeyField::OpenaiKey => "OpenAI API Key",
            KeyField::GithubToken => "GitHub Token",
            KeyField::TtsKey => "TTS Key",
            KeyField::WebhooksUrl => "Webhooks URL",
            KeyField::OcrKey => "OCR Key",
            KeyField::WebIntegrationKey => "Web Integration Key",
            KeyField::WhatsappKey => "WhatsApp Key",
            KeyField::EmailSmtp => "Email SMTP (string)",
            KeyField::GithubRepo => "GitHub Repo (owner/repo)",
            KeyField::RenderApiKey => "Render API Key",
            KeyField::EditModeKey => "Edit Mode Key (required for Ops)",
        }
    }

    /// Looks a field up by its serialized name. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<KeyField> {
        FIELD_BY_NAME.get(name).copied()
    }
}

/// The flat set of secrets and config strings a user edits.
///
/// Every field always holds a string; absent values are represented by `""`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct KeysRecord {
    pub openai_key: String,
    pub github_token: String,
    pub tts_key: String,
    pub webhooks_url: String,
    pub ocr_key: String,
    pub web_integration_key: String,
    pub whatsapp_key: String,
    pub email_smtp: String,
    pub github_repo: String,
    pub render_api_key: String,
    pub edit_mode_key: String,
}

impl Default for KeysRecord {
    /// The default record: every field empty except the placeholder edit key.
    fn default() -> Self {
        Self {
            edit_mode_key: DEFAULT_EDIT_MODE_KEY.to_string(),
            ..Self::blank()
        }
    }
}

impl KeysRecord {
    /// A record with every field empty, the edit key included.
    pub fn blank() -> Self {
        Self {
            openai_key: String::new(),
            github_token: String::new(),
            tts_key: String::new(),
            webhooks_url: String::new(),
            ocr_key: String::new(),
            web_integration_key: String::new(),
            whatsapp_key: String::new(),
            email_smtp: String::new(),
            github_repo: String::new(),
            render_api_key: String::new(),
            edit_mode_key: String::new(),
        }
    }

    pub fn get(&self, field: KeyField) -> &str {
        self.slot(field)
    }

    pub fn set(&mut self, field: KeyField, value: impl Into<String>) {
        *self.slot_mut(field) = value.into();
    }

    /// True when the field holds nothing but whitespace.
    pub fn is_blank(&self, field: KeyField) -> bool {
        self.get(field).trim().is_empty()
    }

    fn slot(&self, field: KeyField) -> &String {
        match field {
            KeyField::OpenaiKey => &self.openai_key,
            KeyField::GithubToken => &self.github_token,
            KeyField::TtsKey => &self.tts_key,
            KeyField::WebhooksUrl => &self.webhooks_url,
            KeyField::OcrKey => &self.ocr_key,
            KeyField::WebIntegrationKey => &self.web_integration_key,
            KeyField::WhatsappKey => &self.whatsapp_key,
            KeyField::EmailSmtp => &self.email_smtp,
            KeyField::GithubRepo => &self.github_repo,
            KeyField::RenderApiKey => &self.render_api_key,
            KeyField::EditModeKey => &self.edit_mode_key,
        }
    }

    fn slot_mut(&mut self, field: KeyField) -> &mut String {
        match field {
            KeyField::OpenaiKey => &mut self.openai_key,
            KeyField::GithubToken => &mut self.github_token,
            KeyField::TtsKey => &mut self.tts_key,
            KeyField::WebhooksUrl => &mut self.webhooks_url,
            KeyField::OcrKey => &mut self.ocr_key,
            KeyField::WebIntegrationKey => &mut self.web_integration_key,
            KeyField::WhatsappKey => &mut self.whatsapp_key,
            KeyField::EmailSmtp => &mut self.email_smtp,
            KeyField::GithubRepo => &mut self.github_repo,
            KeyField::RenderApiKey => &mut self.render_api_key,
            KeyField::EditModeKey => &mut self.edit_mode_key,
        }
    }
}

/// A parsed payload in which any subset of the known fields may be present.
///
/// Fields outside the known set are ignored by deserialization. The
/// snake_case names the backend's config store uses are read as aliases.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialKeys {
    #[serde(skip_serializing_if = "Option::is_none", alias = "openai_key", alias = "openai_api_key")]
    pub openai_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", alias = "github_token")]
    pub github_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", alias = "tts_key")]
    pub tts_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", alias = "webhooks_url")]
    pub webhooks_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", alias = "ocr_key")]
    pub ocr_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", alias = "web_integration_key")]
    pub web_integration_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", alias = "whatsapp_key")]
    pub whatsapp_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", alias = "email_smtp")]
    pub email_smtp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", alias = "github_repo")]
    pub github_repo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", alias = "render_api_key")]
    pub render_api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", alias = "edit_mode_key")]
    pub edit_mode_key: Option<String>,
}

impl PartialKeys {
    pub fn with(mut self, field: KeyField, value: impl Into<String>) -> Self {
        *self.slot_mut(field) = Some(value.into());
        self
    }

    /// True when no known field is present.
    pub fn is_empty(&self) -> bool {
        KeyField::ALL.iter().all(|&field| self.get(field).is_none())
    }

    pub fn get(&self, field: KeyField) -> Option<&str> {
        let slot = match field {
            KeyField::OpenaiKey => &self.openai_key,
            KeyField::GithubToken => &self.github_token,
            KeyField::TtsKey => &self.tts_key,
            KeyField::WebhooksUrl => &self.webhooks_url,
            KeyField::OcrKey => &self.ocr_key,
            KeyField::WebIntegrationKey => &self.web_integration_key,
            KeyField::WhatsappKey => &self.whatsapp_key,
            KeyField::EmailSmtp => &self.email_smtp,
            KeyField::GithubRepo => &self.github_repo,
            KeyField::RenderApiKey => &self.render_api_key,
            KeyField::EditModeKey => &self.edit_mode_key,
        };
        slot.as_deref()
    }

    fn slot_mut(&mut self, field: KeyField) -> &mut Option<String> {
        match field {
            KeyField::OpenaiKey => &mut self.openai_key,
            KeyField::GithubToken => &mut self.github_token,
            KeyField::TtsKey => &mut self.tts_key,
            KeyField::WebhooksUrl => &mut self.webhooks_url,
            KeyField::OcrKey => &mut self.ocr_key,
            KeyField::WebIntegrationKey => &mut self.web_integration_key,
            KeyField::WhatsappKey => &mut self.whatsapp_key,
            KeyField::EmailSmtp => &mut self.email_smtp,
            KeyField::GithubRepo => &mut self.github_repo,
            KeyField::RenderApiKey => &mut self.render_api_key,
            KeyField::EditModeKey => &mut self.edit_mode_key,
        }
    }
}

impl From<KeysRecord> for PartialKeys {
    fn from(record: KeysRecord) -> Self {
        KeyField::ALL
            .iter()
            .fold(PartialKeys::default(), |partial, &field| {
                partial.with(field, record.get(field))
            })
    }
}

/// Overlays `partial` on `defaults`: a present field wins, an absent one keeps
/// the default.
pub fn merge(defaults: &KeysRecord, partial: &PartialKeys) -> KeysRecord {
    let mut merged = defaults.clone();
    for field in KeyField::ALL {
        if let Some(value) = partial.get(field) {
            merged.set(field, value);
        }
    }
    merged
}

/// Parses a serialized record and merges it over the defaults.
///
/// Returns `None` for anything that is not a JSON object of string fields.
pub fn parse_merged(raw: &str) -> Option<KeysRecord> {
    let partial: PartialKeys = serde_json::from_str(raw).ok()?;
    Some(merge(&KeysRecord::default(), &partial))
}
