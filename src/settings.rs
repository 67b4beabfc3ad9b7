//! Settings ownership, persistence and list editing.
//!
//! `Settings` is the only place a `Config` is mutated. Every change goes
//! through [`Settings::update`], which validates the candidate, writes it to
//! the backing [`ConfigStore`] and only then makes it current. Whitelist and
//! blacklist edits keep a short undo history per list.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::policy::list_contains;

/// Undo entries kept per list.
pub const MAX_UNDO_HISTORY: usize = 10;

/// Backing storage for the serialized configuration.
pub trait ConfigStore {
    /// Returns the saved JSON blob, or `None` when nothing was saved yet.
    fn load(&self) -> Result<Option<String>>;

    /// Replaces the saved JSON blob.
    fn save(&mut self, json: &str) -> Result<()>;
}

/// In-process store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blob: Option<String>,
}

impl MemoryStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a saved blob.
    #[must_use]
    pub fn with_json(json: impl Into<String>) -> Self {
        Self {
            blob: Some(json.into()),
        }
    }

    /// Last saved blob.
    #[must_use]
    pub fn contents(&self) -> Option<&str> {
        self.blob.as_deref()
    }
}

impl ConfigStore for MemoryStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.blob.clone())
    }

    fn save(&mut self, json: &str) -> Result<()> {
        self.blob = Some(json.to_string());
        Ok(())
    }
}

/// Which channel list an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Whitelist,
    Blacklist,
}

/// Kind of list edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListAction {
    Add,
    Remove,
}

/// One recorded list edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListChange {
    pub action: ListAction,
    pub entry: String,
    pub timestamp: DateTime<Utc>,
}

/// Current configuration plus its store and list-edit history.
pub struct Settings {
    config: Config,
    store: Box<dyn ConfigStore>,
    whitelist_history: VecDeque<ListChange>,
    blacklist_history: VecDeque<ListChange>,
}

impl Settings {
    /// Loads the saved configuration, merged over defaults.
    ///
    /// A blob that no longer parses or validates is ignored in favour of the
    /// defaults; a failing store is an error.
    pub fn load(store: Box<dyn ConfigStore>) -> Result<Self> {
        let config = match store.load()? {
            Some(json) => Config::from_json(&json).unwrap_or_else(|err| {
                warn!(error = %err, "saved configuration rejected, using defaults");
                Config::default()
            }),
            None => Config::default(),
        };
        Ok(Self::with_config(config, store))
    }

    /// Wraps an already-built configuration without touching the store.
    #[must_use]
    pub fn with_config(config: Config, store: Box<dyn ConfigStore>) -> Self {
        Self {
            config,
            store,
            whitelist_history: VecDeque::new(),
            blacklist_history: VecDeque::new(),
        }
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Applies `f` to a copy of the configuration, validates and saves it,
    /// then makes it current. On error the current configuration is unchanged.
    pub fn update<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Config),
    {
        let mut candidate = self.config.clone();
        f(&mut candidate);
        candidate.validate()?;
        self.store.save(&candidate.to_json()?)?;
        debug!("configuration updated");
        self.config = candidate;
        Ok(())
    }

    /// Edit history for a list, newest first.
    #[must_use]
    pub fn history(&self, kind: ListKind) -> &VecDeque<ListChange> {
        match kind {
            ListKind::Whitelist => &self.whitelist_history,
            ListKind::Blacklist => &self.blacklist_history,
        }
    }

    /// Adds `entry` to a list. Returns `false` if it was already present.
    pub fn add_to_list(&mut self, kind: ListKind, entry: &str) -> Result<bool> {
        let entry = entry.trim();
        if entry.is_empty() {
            return Err(Error::InvalidConfig("list entry is blank".to_string()));
        }
        let case_insensitive = self.config.case_insensitive_lists;
        if list_contains(list(&self.config, kind), entry, case_insensitive) {
            return Ok(false);
        }

        let owned = entry.to_string();
        self.update(|config| list_mut(config, kind).push(owned))?;
        self.record(kind, ListAction::Add, entry);
        Ok(true)
    }

    /// Removes the first entry equal to `entry`. Returns `false` if none matched.
    pub fn remove_from_list(&mut self, kind: ListKind, entry: &str) -> Result<bool> {
        let entry = entry.trim();
        let Some(index) = position(&self.config, kind, entry) else {
            return Ok(false);
        };

        let removed = list(&self.config, kind)[index].clone();
        self.update(|config| {
            list_mut(config, kind).remove(index);
        })?;
        self.record(kind, ListAction::Remove, &removed);
        Ok(true)
    }

    /// Reverts the most recent edit of a list.
    ///
    /// Returns the reverted change, or `None` when the history is empty.
    pub fn undo(&mut self, kind: ListKind) -> Result<Option<ListChange>> {
        let Some(change) = self.history_mut(kind).pop_front() else {
            return Ok(None);
        };

        let result = match change.action {
            ListAction::Add => match position(&self.config, kind, &change.entry) {
                Some(index) => self.update(|config| {
                    list_mut(config, kind).remove(index);
                }),
                None => Ok(()),
            },
            ListAction::Remove => {
                let entry = change.entry.clone();
                self.update(|config| list_mut(config, kind).push(entry))
            }
        };

        if let Err(err) = result {
            self.history_mut(kind).push_front(change);
            return Err(err);
        }
        debug!(?kind, entry = %change.entry, "undid list change");
        Ok(Some(change))
    }

    fn record(&mut self, kind: ListKind, action: ListAction, entry: &str) {
        let history = self.history_mut(kind);
        history.push_front(ListChange {
            action,
            entry: entry.to_string(),
            timestamp: Utc::now(),
        });
        history.truncate(MAX_UNDO_HISTORY);
    }

    fn history_mut(&mut self, kind: ListKind) -> &mut VecDeque<ListChange> {
        match kind {
            ListKind::Whitelist => &mut self.whitelist_history,
            ListKind::Blacklist => &mut self.blacklist_history,
        }
    }
}

fn list(config: &Config, kind: ListKind) -> &Vec<String> {
    match kind {
        ListKind::Whitelist => &config.whitelist,
        ListKind::Blacklist => &config.blacklist,
    }
}

fn list_mut(config: &mut Config, kind: ListKind) -> &mut Vec<String> {
    match kind {
        ListKind::Whitelist => &mut config.whitelist,
        ListKind::Blacklist => &mut config.blacklist,
    }
}

fn position(config: &Config, kind: ListKind, entry: &str) -> Option<usize> {
    let case_insensitive = config.case_insensitive_lists;
    list(config, kind).iter().position(|item| {
        if case_insensitive {
            item.to_lowercase() == entry.to_lowercase()
        } else {
            item == entry
        }
    })
}
