//! Capability policy
//!
//! Every guarded handler asks [`can`] before running its body. Grants
//! are codenames of the form `<app>.<action>_<model>`, e.g.
//! `diary.change_diary`.

use std::fmt;

use crate::context::Actor;

/// What the actor wants to do with a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    View,
    Add,
    Change,
    Delete,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::View, Action::Add, Action::Change, Action::Delete];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Add => "add",
            Action::Change => "change",
            Action::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A kind of guarded record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resource {
    pub app_label: &'static str,
    pub model: &'static str,
}

impl Resource {
    pub const fn new(app_label: &'static str, model: &'static str) -> Self {
        Self { app_label, model }
    }

    /// Grant codename for `action` on this resource
    pub fn codename(&self, action: Action) -> String {
        format!("{}.{}_{}", self.app_label, action.as_str(), self.model)
    }
}

/// Pure capability check
///
/// Superusers hold every capability; everyone else needs the explicit
/// grant.
pub fn can(actor: &Actor, action: Action, resource: &Resource) -> bool {
    actor.is_superuser || actor.has_permission(&resource.codename(action))
}
