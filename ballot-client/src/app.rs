// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! Client state: the session, and the panel its role opens.

use crate::display::{PollEntry, PollListing, SessionStatus, UNAUTHORIZED_MESSAGE};
use anyhow::{bail, Result};
use ballot_models::address::Address;
use ballot_poll_exports::{
    PollConfig, PollController, PollDraft, PollResult, RefreshManager, ViewKind,
};
use ballot_poll_worker::{start_poll_controller, start_refresh_task};
use ballot_session_exports::{Role, Session, SessionController, SessionManager};
use ballot_time::BallotTime;
use tracing::{debug, info};

const NOT_CONNECTED: &str = "Wallet not connected, use 'connect' first";

/// View-model of the panel shown to the connected account
struct Panel {
    polls: Box<dyn PollController>,
    /// voter panel only
    refresh: Option<Box<dyn RefreshManager>>,
}

impl Panel {
    fn close(mut self) {
        if let Some(mut refresh) = self.refresh.take() {
            refresh.stop();
        }
    }
}

pub(crate) struct App {
    session_manager: Box<dyn SessionManager>,
    session: Box<dyn SessionController>,
    config: PollConfig,
    panel: Option<Panel>,
    /// account and role the panel was opened for
    routed: Option<(Address, Role)>,
    /// poll being written in the admin panel
    pub(crate) draft: PollDraft,
}

fn routing_key(session: &Session) -> Option<(Address, Role)> {
    session.account.map(|account| (account, session.role()))
}

impl App {
    pub(crate) fn new(
        session_manager: Box<dyn SessionManager>,
        session: Box<dyn SessionController>,
        config: PollConfig,
    ) -> Self {
        App {
            session_manager,
            session,
            config,
            panel: None,
            routed: None,
            draft: PollDraft::default(),
        }
    }

    /// Connect, then open the panel of the resulting role
    pub(crate) async fn connect(&mut self, account: Option<Address>) -> Result<SessionStatus> {
        let connected = self.session.connect(account).await;
        self.finish_connect(connected.map(|_| ())).await
    }

    /// Reconnect with the same account and reopen the panel
    pub(crate) async fn reload(&mut self) -> Result<SessionStatus> {
        let connected = self.session.reload().await;
        self.finish_connect(connected.map(|_| ())).await
    }

    async fn finish_connect<E>(&mut self, connected: Result<(), E>) -> Result<SessionStatus>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        if let Err(err) = connected {
            self.close_panel();
            return Err(err.into());
        }
        Ok(self.route().await)
    }

    pub(crate) fn disconnect(&mut self) -> SessionStatus {
        self.session.disconnect();
        self.close_panel();
        self.status(None)
    }

    pub(crate) fn status(&self, notice: Option<String>) -> SessionStatus {
        let session = self.session.session();
        let notice = notice.or_else(|| {
            (session.role() == Role::Unauthorized).then(|| UNAUTHORIZED_MESSAGE.to_string())
        });
        SessionStatus {
            account: session.account,
            chain_id: session.chain_id,
            role: session.role(),
            notice,
        }
    }

    /// Follow a session replaced behind our back, by a wallet event.
    /// Returns the new status when the panel changed.
    pub(crate) async fn sync(&mut self) -> Option<SessionStatus> {
        let session = self.session.session();
        if routing_key(&session) == self.routed {
            return None;
        }
        info!("session changed to {:?}, switching panel", routing_key(&session));
        Some(self.route().await)
    }

    /// Close the current panel and open the one of the current role
    async fn route(&mut self) -> SessionStatus {
        self.close_panel();
        let session = self.session.session();
        self.routed = routing_key(&session);
        let notice = match ViewKind::for_role(session.role()) {
            Some(view) => self
                .open_panel(view)
                .await
                .err()
                .map(|err| format!("Could not load the polls: {}", err)),
            None => None,
        };
        self.status(notice)
    }

    async fn open_panel(&mut self, view: ViewKind) -> PollResult<()> {
        debug!("opening the {:?} panel", view);
        let polls = start_poll_controller(self.config, view, self.session.clone());
        let refresh = match view {
            ViewKind::Voter => Some(start_refresh_task(
                polls.clone(),
                self.config.voter_refresh_interval,
            )),
            ViewKind::Admin => None,
        };
        let panel = self.panel.insert(Panel { polls, refresh });
        panel.polls.load_polls().await?;
        if view == ViewKind::Admin {
            panel.polls.load_whitelist().await?;
        }
        Ok(())
    }

    fn close_panel(&mut self) {
        if let Some(panel) = self.panel.take() {
            debug!("closing the {:?} panel", panel.polls.view());
            panel.close();
        }
        self.routed = None;
    }

    /// View-model of the open panel, if it is `expected`
    fn panel(&self, expected: Option<ViewKind>) -> Result<&dyn PollController> {
        let role = self.session.session().role();
        let polls = match (role, &self.panel) {
            (Role::Unauthorized, _) => bail!(UNAUTHORIZED_MESSAGE),
            (Role::Disconnected, _) | (_, None) => bail!(NOT_CONNECTED),
            (_, Some(panel)) => panel.polls.as_ref(),
        };
        match expected {
            Some(ViewKind::Admin) if polls.view() != ViewKind::Admin => {
                bail!("Only the admin can do this")
            }
            Some(ViewKind::Voter) if polls.view() != ViewKind::Voter => {
                bail!("Only whitelisted voters can do this")
            }
            _ => Ok(polls),
        }
    }

    pub(crate) fn polls(&self) -> Result<&dyn PollController> {
        self.panel(None)
    }

    pub(crate) fn admin(&self) -> Result<&dyn PollController> {
        self.panel(Some(ViewKind::Admin))
    }

    pub(crate) fn voter(&self) -> Result<&dyn PollController> {
        self.panel(Some(ViewKind::Voter))
    }

    /// Last loaded polls, as the open panel shows them
    pub(crate) fn listing(&self) -> Result<PollListing> {
        let polls = self.polls()?;
        let view = polls.view();
        let now = BallotTime::now()?;
        let entries = polls
            .polls()
            .into_iter()
            .map(|record| {
                let selected = polls.selected_option(record.id);
                PollEntry::new(record, view, now, selected)
            })
            .collect();
        Ok(PollListing {
            view,
            now,
            utc_offset: self.config.utc_offset,
            polls: entries,
        })
    }

    /// Manual refresh of the open panel
    pub(crate) async fn refresh(&self) -> Result<PollListing> {
        let polls = self.polls()?;
        polls.load_polls().await?;
        if polls.view() == ViewKind::Admin {
            polls.load_whitelist().await?;
        }
        self.listing()
    }

    /// Stop the panel and the session
    pub(crate) fn stop(&mut self) {
        self.close_panel();
        self.session_manager.stop();
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.stop();
    }
}
