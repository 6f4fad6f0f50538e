//! Account-scoped view over a [`SessionManager`].
//!
//! Callers with a single Alexa login use [`SessionManager::default_account`]
//! and never deal with account ids.

use crate::client::{DEFAULT_ACCOUNT, SessionManager};
use crate::error::Result;
use crate::session::Session;
use crate::types::{Device, Notification, Queue};

/// A [`SessionManager`] bound to one account id.
pub struct Account<'a> {
    manager: &'a mut SessionManager,
    id: String,
}

impl SessionManager {
    /// Bind operations to `id`.
    pub fn account(&mut self, id: impl Into<String>) -> Account<'_> {
        Account {
            manager: self,
            id: id.into(),
        }
    }

    /// Bind operations to [`DEFAULT_ACCOUNT`].
    pub fn default_account(&mut self) -> Account<'_> {
        self.account(DEFAULT_ACCOUNT)
    }
}

impl Account<'_> {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn session(&self) -> Option<&Session> {
        self.manager.session(&self.id)
    }

    /// See [`SessionManager::check_status`].
    pub fn check_status(&self) -> Result<bool> {
        self.manager.check_status(&self.id)
    }

    /// See [`SessionManager::login`].
    pub fn login(&mut self, source_token: &str) -> Result<bool> {
        self.manager.login(&self.id, source_token)
    }

    pub fn devices(&self) -> Result<Vec<Device>> {
        self.manager.devices(&self.id)
    }

    pub fn notifications(&self) -> Result<Vec<Notification>> {
        self.manager.notifications(&self.id)
    }

    pub fn queue(&self, device: &Device) -> Result<Queue> {
        self.manager.queue(&self.id, device)
    }
}
