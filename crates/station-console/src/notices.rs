//! Missing-key notices shown above every panel.

use crate::keys::{KeyField, KeysRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: &'static str,
    pub field: KeyField,
    pub title: &'static str,
    pub desc: &'static str,
}

const CHECKS: [Notice; 3] = [
    Notice {
        id: "need_openai",
        field: KeyField::OpenaiKey,
        title: "OpenAI key missing",
        desc: "Set OpenAI key to activate AI features.",
    },
    Notice {
        id: "need_github",
        field: KeyField::GithubToken,
        title: "GitHub token missing",
        desc: "Set token to enable Git ops.",
    },
    Notice {
        id: "need_render",
        field: KeyField::RenderApiKey,
        title: "Render API key missing",
        desc: "Set key if you want one-click deploy.",
    },
];

pub fn notices(record: &KeysRecord) -> Vec<Notice> {
    CHECKS
        .iter()
        .filter(|notice| record.is_blank(notice.field))
        .cloned()
        .collect()
}
