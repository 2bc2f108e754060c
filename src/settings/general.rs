use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// App-wide settings that are not tied to an account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneralAppSettings {
    /// First launch. Set once.
    pub installation_date: Option<DateTime<Utc>>,

    /// Announcement identifier → whether the user dismissed it.
    pub announcement_dismissals: BTreeMap<String, bool>,

    /// Last event page stored by a completed sync. 0 before the first one.
    pub last_synced_event_page: u32,

    /// Whether the push notification prompt was presented.
    pub is_push_prompt_shown: bool,
}

impl GeneralAppSettings {
    /// Copy with `installation_date` set, unless it already is.
    pub fn with_installation_date_if_necessary(&self, date: DateTime<Utc>) -> Self {
        let mut settings = self.clone();
        if settings.installation_date.is_none() {
            settings.installation_date = Some(date);
        }
        settings
    }

    pub fn is_announcement_dismissed(&self, identifier: &str) -> bool {
        self.announcement_dismissals
            .get(identifier)
            .copied()
            .unwrap_or(false)
    }

    pub fn with_announcement_dismissed(&self, identifier: &str, dismissed: bool) -> Self {
        let mut settings = self.clone();
        settings
            .announcement_dismissals
            .insert(identifier.to_string(), dismissed);
        settings
    }

    pub fn with_push_prompt_shown(&self) -> Self {
        Self {
            is_push_prompt_shown: true,
            ..self.clone()
        }
    }

    pub fn with_last_synced_event_page(&self, page_number: u32) -> Self {
        Self {
            last_synced_event_page: page_number,
            ..self.clone()
        }
    }
}
