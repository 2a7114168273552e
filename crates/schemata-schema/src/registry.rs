//! Process-wide environment registry

use crate::drafts::{DEFAULT_ENVIRONMENT_ID, Draft};
use crate::environment::Environment;
use crate::{Error, Result};
use dashmap::DashMap;
use std::sync::RwLock;
use tracing::{debug, info};

/// Pristine environments keyed by id
///
/// Draft environments are built on first request. Callers receive clones,
/// so the stored environments are never mutated after registration.
#[derive(Debug)]
pub struct EnvironmentRegistry {
    environments: DashMap<String, Environment>,
    default_id: RwLock<String>,
}

impl EnvironmentRegistry {
    /// Create a registry with the built-in drafts available on demand
    #[must_use]
    pub fn new() -> Self {
        Self {
            environments: DashMap::new(),
            default_id: RwLock::new(DEFAULT_ENVIRONMENT_ID.to_string()),
        }
    }

    /// Register (or replace) an environment under `id`
    pub fn register(&self, id: impl Into<String>, env: Environment) {
        let id = id.into();
        debug!(id = %id, "registering environment");
        self.environments.insert(id, env);
    }

    /// A fresh copy of the environment registered as `id`
    ///
    /// # Errors
    ///
    /// [`Error::UnknownDraft`] when `id` is neither registered nor a
    /// built-in draft; construction errors of the draft otherwise.
    pub fn create_environment(&self, id: &str) -> Result<Environment> {
        if let Some(env) = self.environments.get(id) {
            debug!(id, "environment cache hit");
            return Ok(env.clone());
        }

        let draft = Draft::from_id(id).ok_or_else(|| Error::UnknownDraft(id.to_string()))?;
        info!(id, "building draft environment");
        let env = draft.environment()?;
        // A concurrent caller may have built it too; keep whichever landed first.
        let entry = self.environments.entry(id.to_string()).or_insert(env);
        Ok(entry.clone())
    }

    /// A fresh copy of the default environment
    ///
    /// # Errors
    ///
    /// As [`EnvironmentRegistry::create_environment`].
    pub fn default_environment(&self) -> Result<Environment> {
        let id = self.default_id();
        self.create_environment(&id)
    }

    #[must_use]
    pub fn default_id(&self) -> String {
        self.default_id
            .read()
            .map_or_else(|poisoned| poisoned.into_inner().clone(), |id| id.clone())
    }

    /// Change the default environment id
    ///
    /// # Errors
    ///
    /// [`Error::UnknownDraft`] when `id` is neither registered nor a
    /// built-in draft.
    pub fn set_default_id(&self, id: &str) -> Result<()> {
        if !self.environments.contains_key(id) && Draft::from_id(id).is_none() {
            return Err(Error::UnknownDraft(id.to_string()));
        }
        match self.default_id.write() {
            Ok(mut current) => *current = id.to_string(),
            Err(poisoned) => *poisoned.into_inner() = id.to_string(),
        }
        Ok(())
    }

    /// Ids of every available environment, sorted
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = Draft::ALL.iter().map(|d| d.id().to_string()).collect();
        for entry in &self.environments {
            if !ids.contains(entry.key()) {
                ids.push(entry.key().clone());
            }
        }
        ids.sort();
        ids
    }

    /// Whether `id` has been built or registered
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.environments.contains_key(id)
    }
}

impl Default for EnvironmentRegistry {
    fn default() -> Self {
        Self::new()
    }
}
