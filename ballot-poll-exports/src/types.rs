// Copyright (c) 2022 MASSA LABS <info@massa.net>

use ballot_session_exports::Role;
use serde::{Deserialize, Serialize};

/// Which panel the view-model feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewKind {
    /// poll management and whitelist administration
    Admin,
    /// voting and results
    Voter,
}

impl ViewKind {
    /// Panel shown to a role, `None` when the account gets no panel
    pub fn for_role(role: Role) -> Option<ViewKind> {
        match role {
            Role::Admin => Some(ViewKind::Admin),
            Role::Voter => Some(ViewKind::Voter),
            Role::Disconnected | Role::Unauthorized => None,
        }
    }
}

/// Result of a `load_polls` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// the list was replaced by this many polls
    Loaded(usize),
    /// a more recent load started meanwhile, this result was dropped
    Superseded,
}
