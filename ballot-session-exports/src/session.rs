// Copyright (c) 2022 MASSA LABS <info@massa.net>

use crate::provider_traits::{VotingContract, WhitelistContract};
use ballot_models::address::Address;
use std::sync::Arc;

/// Contract handles of a connected session.
/// Read handles are bound to the provider, write handles to the signer.
#[derive(Clone)]
pub struct ContractHandles {
    /// whitelist, read-only
    pub whitelist_reader: Arc<dyn WhitelistContract>,
    /// whitelist, bound to the connected account
    pub whitelist: Arc<dyn WhitelistContract>,
    /// voting, read-only
    pub voting_reader: Arc<dyn VotingContract>,
    /// voting, bound to the connected account
    pub voting: Arc<dyn VotingContract>,
}

impl std::fmt::Debug for ContractHandles {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("ContractHandles")
            .field("whitelist", &self.whitelist.address())
            .field("voting", &self.voting.address())
            .finish()
    }
}

/// What the connected account is allowed to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// no wallet connected
    Disconnected,
    /// owner of the whitelist contract: manages polls and the whitelist
    Admin,
    /// whitelisted account: votes
    Voter,
    /// connected but neither owner nor whitelisted
    Unauthorized,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let label = match self {
            Role::Disconnected => "Disconnected",
            Role::Admin => "Admin",
            Role::Voter => "Whitelisted",
            Role::Unauthorized => "Not Whitelisted",
        };
        write!(f, "{}", label)
    }
}

/// Who is connected and what they can do.
///
/// A session is never mutated: connecting, reloading and disconnecting each
/// publish a new `Arc<Session>`. `Session::default()` is the disconnected state.
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// connected account
    pub account: Option<Address>,
    /// network the wallet was on when connecting
    pub chain_id: Option<u64>,
    /// account is the whitelist contract owner
    pub is_admin: bool,
    /// account is whitelisted
    pub is_whitelisted: bool,
    /// contract handles, `None` when disconnected
    pub contracts: Option<ContractHandles>,
}

impl Session {
    /// `true` once an account and its handles are available
    pub fn is_connected(&self) -> bool {
        self.account.is_some() && self.contracts.is_some()
    }

    /// `true` when every field holds its empty value
    pub fn is_empty(&self) -> bool {
        self.account.is_none()
            && self.chain_id.is_none()
            && !self.is_admin
            && !self.is_whitelisted
            && self.contracts.is_none()
    }

    /// Admin takes precedence over whitelisting
    pub fn role(&self) -> Role {
        if !self.is_connected() {
            Role::Disconnected
        } else if self.is_admin {
            Role::Admin
        } else if self.is_whitelisted {
            Role::Voter
        } else {
            Role::Unauthorized
        }
    }
}
