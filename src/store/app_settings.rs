use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::action::{Action, Completion};
use crate::dispatcher::{Dispatcher, Processor};
use crate::settings::{GeneralAppSettings, GeneralAppSettingsStorage, SettingsError};

#[derive(Debug, Clone)]
pub enum AppSettingsAction {
    /// Record the first launch. Later dates are ignored.
    SetInstallationDateIfNecessary {
        date: DateTime<Utc>,
        on_completion: Completion<Result<(), SettingsError>>,
    },

    UpdateAnnouncementDismissed {
        identifier: String,
        dismissed: bool,
        on_completion: Completion<Result<(), SettingsError>>,
    },

    /// Completes with `false` when the announcement is unknown or the file
    /// cannot be read.
    LoadAnnouncementDismissed {
        identifier: String,
        on_completion: Completion<bool>,
    },

    /// Remember that the push notification prompt was presented.
    MarkPushPromptShown {
        on_completion: Completion<Result<(), SettingsError>>,
    },

    /// Completes with `false` when the file cannot be read.
    LoadPushPromptShown { on_completion: Completion<bool> },

    /// Record the last event page a sync stored, so paging can resume there.
    UpdateLastSyncedEventPage {
        page_number: u32,
        on_completion: Completion<Result<(), SettingsError>>,
    },

    /// Completes with 0 when nothing was synced or the file cannot be read.
    LoadLastSyncedEventPage { on_completion: Completion<u32> },

    /// Delete the settings file. The next read yields the defaults.
    ResetGeneralSettings {
        on_completion: Completion<Result<(), SettingsError>>,
    },
}

impl Action for AppSettingsAction {}

/// Deauthenticated store: survives logout and never touches the network.
pub struct AppSettingsStore {
    storage: GeneralAppSettingsStorage,
    // Serializes read-modify-write of the file.
    write_lock: Mutex<()>,
}

impl AppSettingsStore {
    pub fn new(dispatcher: &Dispatcher, settings_path: impl Into<PathBuf>) -> Arc<Self> {
        let store = Arc::new(Self {
            storage: GeneralAppSettingsStorage::new(settings_path),
            write_lock: Mutex::new(()),
        });
        dispatcher.register::<AppSettingsAction, _>(&store);
        store
    }

    fn update<F>(&self, change: F) -> Result<(), SettingsError>
    where
        F: FnOnce(&GeneralAppSettings) -> GeneralAppSettings,
    {
        let _guard = self.write_lock.lock();
        let current = self.storage.load()?;
        let updated = change(&current);
        if updated == current {
            return Ok(());
        }
        self.storage.save(&updated)
    }

    /// Read one value, falling back to the default when the file is unreadable.
    fn read<T: Default>(&self, value: impl FnOnce(&GeneralAppSettings) -> T) -> T {
        match self.storage.load() {
            Ok(settings) => value(&settings),
            Err(error) => {
                tracing::warn!(%error, "failed to read settings");
                T::default()
            }
        }
    }
}

impl Processor<AppSettingsAction> for AppSettingsStore {
    fn on_action(&self, action: AppSettingsAction) {
        match action {
            AppSettingsAction::SetInstallationDateIfNecessary {
                date,
                on_completion,
            } => on_completion.complete(
                self.update(|settings| settings.with_installation_date_if_necessary(date)),
            ),
            AppSettingsAction::UpdateAnnouncementDismissed {
                identifier,
                dismissed,
                on_completion,
            } => on_completion.complete(self.update(|settings| {
                settings.with_announcement_dismissed(&identifier, dismissed)
            })),
            AppSettingsAction::LoadAnnouncementDismissed {
                identifier,
                on_completion,
            } => on_completion.complete(
                self.read(|settings| settings.is_announcement_dismissed(&identifier)),
            ),
            AppSettingsAction::MarkPushPromptShown { on_completion } => {
                on_completion.complete(self.update(GeneralAppSettings::with_push_prompt_shown))
            }
            AppSettingsAction::LoadPushPromptShown { on_completion } => {
                on_completion.complete(self.read(|settings| settings.is_push_prompt_shown))
            }
            AppSettingsAction::UpdateLastSyncedEventPage {
                page_number,
                on_completion,
            } => on_completion.complete(
                self.update(|settings| settings.with_last_synced_event_page(page_number)),
            ),
            AppSettingsAction::LoadLastSyncedEventPage { on_completion } => {
                on_completion.complete(self.read(|settings| settings.last_synced_event_page))
            }
            AppSettingsAction::ResetGeneralSettings { on_completion } => {
                let _guard = self.write_lock.lock();
                on_completion.complete(self.storage.remove())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::mpsc;

    fn dismissed(dispatcher: &Dispatcher, identifier: &str) -> bool {
        let (tx, rx) = mpsc::channel();
        dispatcher.dispatch(AppSettingsAction::LoadAnnouncementDismissed {
            identifier: identifier.into(),
            on_completion: Completion::new(move |value| tx.send(value).unwrap()),
        });
        rx.recv().unwrap()
    }

    #[test]
    fn announcement_dismissal_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let dispatcher = Dispatcher::new();
        let _store = AppSettingsStore::new(&dispatcher, dir.path().join("settings.json"));

        assert!(!dismissed(&dispatcher, "welcome"));

        let (tx, rx) = mpsc::channel();
        dispatcher.dispatch(AppSettingsAction::UpdateAnnouncementDismissed {
            identifier: "welcome".into(),
            dismissed: true,
            on_completion: Completion::new(move |result: Result<(), SettingsError>| {
                tx.send(result.is_ok()).unwrap()
            }),
        });
        assert!(rx.recv().unwrap());
        assert!(dismissed(&dispatcher, "welcome"));
        assert!(!dismissed(&dispatcher, "other"));
    }

    #[test]
    fn installation_date_is_kept_and_reset_clears_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let dispatcher = Dispatcher::new();
        let _store = AppSettingsStore::new(&dispatcher, &path);

        let first = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        for date in [first, Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()] {
            dispatcher.dispatch(AppSettingsAction::SetInstallationDateIfNecessary {
                date,
                on_completion: Completion::noop(),
            });
        }

        let storage = GeneralAppSettingsStorage::new(&path);
        assert_eq!(storage.load().unwrap().installation_date, Some(first));

        dispatcher.dispatch(AppSettingsAction::ResetGeneralSettings {
            on_completion: Completion::noop(),
        });
        assert_eq!(storage.load().unwrap(), GeneralAppSettings::default());
    }

    #[test]
    fn push_prompt_and_last_synced_page_persist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let dispatcher = Dispatcher::new();
        let _store = AppSettingsStore::new(&dispatcher, &path);

        let (shown_tx, shown_rx) = mpsc::channel();
        let (page_tx, page_rx) = mpsc::channel();
        let load = |shown_tx: mpsc::Sender<bool>, page_tx: mpsc::Sender<u32>| {
            dispatcher.dispatch(AppSettingsAction::LoadPushPromptShown {
                on_completion: Completion::new(move |shown| shown_tx.send(shown).unwrap()),
            });
            dispatcher.dispatch(AppSettingsAction::LoadLastSyncedEventPage {
                on_completion: Completion::new(move |page| page_tx.send(page).unwrap()),
            });
        };

        load(shown_tx.clone(), page_tx.clone());
        assert!(!shown_rx.recv().unwrap());
        assert_eq!(page_rx.recv().unwrap(), 0);

        dispatcher.dispatch(AppSettingsAction::MarkPushPromptShown {
            on_completion: Completion::noop(),
        });
        dispatcher.dispatch(AppSettingsAction::UpdateLastSyncedEventPage {
            page_number: 3,
            on_completion: Completion::noop(),
        });

        load(shown_tx, page_tx);
        assert!(shown_rx.recv().unwrap());
        assert_eq!(page_rx.recv().unwrap(), 3);

        let stored = GeneralAppSettingsStorage::new(&path).load().unwrap();
        assert!(stored.is_push_prompt_shown);
        assert_eq!(stored.last_synced_event_page, 3);
        assert!(stored.installation_date.is_none());
    }
}
