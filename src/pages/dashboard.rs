//! Dashboard controller: identity summary, balance disclosure, and logout.
//!
//! SYSTEM CONTEXT
//! ==============
//! Mounting requires a persisted session; without one the user is sent to
//! login and no controller is created. Each mount owns a fresh
//! [`BalanceDisclosure`], so a remount always asks the server again.
//!
//! DISCLOSURE FLOW
//! ===============
//! `reveal` flips `Idle -> Loading` synchronously, which is what suppresses a
//! second press, then spawns the fetch. On success the amount is held while a
//! short pacing delay runs on the timer, after which the balance is revealed
//! and the celebration fires. Any failure ejects: the store is cleared and the
//! user lands on login. Nothing is cancelled if the dashboard goes away first.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use time::{Date, OffsetDateTime};
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::lock;
use crate::app::AppContext;
use crate::route::Route;
use crate::state::disclosure::{BalanceDisclosure, DisclosureStatus};
use crate::state::session::Session;
use crate::util::{auth, format};

pub const REVEAL_DELAY: Duration = Duration::from_millis(500);
pub const MASKED_BALANCE: &str = "₹ • • • • • •";
pub const RETRIEVED_NOTE: &str = "✅ Balance retrieved!";

/// What pressing the reveal control did.
#[derive(Debug)]
pub enum Reveal {
    /// Fetch spawned; the handle resolves once the machine settles.
    Started(JoinHandle<()>),
    /// Dropped: a fetch is in flight or already happened on this mount.
    Ignored,
}

/// What pressing the single balance button did.
#[derive(Debug)]
pub enum Press {
    Reveal(Reveal),
    Toggled(DisclosureStatus),
    /// Disabled while loading, or the machine has ended.
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceButton {
    pub label: &'static str,
    pub spinner: bool,
    pub disabled: bool,
}

/// Everything the dashboard renders, derived from controller state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardView {
    pub greeting: String,
    pub heading: String,
    pub initial: String,
    pub account_type: &'static str,
    pub member_since: String,
    pub balance: String,
    pub button: BalanceButton,
    pub note: Option<&'static str>,
}

pub struct DashboardPage {
    ctx: AppContext,
    identity: Session,
    member_since: Date,
    disclosure: Arc<Mutex<BalanceDisclosure>>,
    mount_id: Uuid,
}

impl DashboardPage {
    /// Mount the dashboard, or redirect to login when no session is stored.
    #[must_use]
    pub fn mount(ctx: AppContext) -> Option<Self> {
        Self::mount_on(ctx, OffsetDateTime::now_utc().date())
    }

    /// [`DashboardPage::mount`] with an explicit "member since" date.
    #[must_use]
    pub fn mount_on(ctx: AppContext, today: Date) -> Option<Self> {
        let identity = auth::require_session(&ctx)?;
        let mount_id = Uuid::new_v4();
        tracing::debug!(%mount_id, username = %identity.username, "dashboard mounted");
        Some(Self {
            ctx,
            identity,
            member_since: today,
            disclosure: Arc::new(Mutex::new(BalanceDisclosure::new())),
            mount_id,
        })
    }

    #[must_use]
    pub fn identity(&self) -> &Session {
        &self.identity
    }

    #[must_use]
    pub fn disclosure(&self) -> BalanceDisclosure {
        *lock(&self.disclosure)
    }

    /// Press "Reveal Balance". Only the first press on a mount does anything.
    pub fn reveal(&self) -> Reveal {
        if !lock(&self.disclosure).begin() {
            tracing::debug!(mount_id = %self.mount_id, "reveal ignored");
            return Reveal::Ignored;
        }
        let ctx = self.ctx.clone();
        let disclosure = Arc::clone(&self.disclosure);
        let mount_id = self.mount_id;
        Reveal::Started(tokio::spawn(async move { run_reveal(ctx, disclosure, mount_id).await }))
    }

    /// Press "Hide Balance" / "Show Balance". Never touches the network.
    pub fn toggle(&self) -> Option<DisclosureStatus> {
        let mut disclosure = lock(&self.disclosure);
        disclosure.toggle().then_some(disclosure.status)
    }

    /// Press the balance button, whichever label it currently shows.
    pub fn press(&self) -> Press {
        let status = lock(&self.disclosure).status;
        match status {
            DisclosureStatus::Idle => Press::Reveal(self.reveal()),
            DisclosureStatus::Revealed | DisclosureStatus::Hidden => {
                self.toggle().map_or(Press::Ignored, Press::Toggled)
            }
            DisclosureStatus::Loading | DisclosureStatus::Ejected => Press::Ignored,
        }
    }

    /// Log out. Local state is cleared whatever the server says.
    pub fn logout(&self) -> JoinHandle<()> {
        let ctx = self.ctx.clone();
        let username = self.identity.username.clone();
        tokio::spawn(async move {
            ctx.gateway.logout().await;
            ctx.session.clear();
            tracing::info!(%username, "logged out");
            ctx.navigator.navigate(Route::Login);
        })
    }

    #[must_use]
    pub fn view(&self) -> DashboardView {
        let disclosure = self.disclosure();
        let username = &self.identity.username;
        DashboardView {
            greeting: format!("Hey, {username}!"),
            heading: format!("Welcome back, {username}!"),
            initial: format::initial(username),
            account_type: self.identity.role.as_str(),
            member_since: format::month_year(self.member_since),
            balance: balance_text(&disclosure),
            button: balance_button(&disclosure),
            note: (disclosure.status == DisclosureStatus::Revealed).then_some(RETRIEVED_NOTE),
        }
    }
}

async fn run_reveal(ctx: AppContext, disclosure: Arc<Mutex<BalanceDisclosure>>, mount_id: Uuid) {
    match ctx.gateway.get_balance().await {
        Ok(amount) => {
            lock(&disclosure).record(amount);
            tokio::time::sleep(REVEAL_DELAY).await;
            let revealed = lock(&disclosure).complete();
            if revealed {
                tracing::debug!(%mount_id, "balance revealed");
                ctx.effects.celebrate();
            }
        }
        Err(err) => {
            tracing::warn!(%mount_id, error = %err, "balance fetch failed");
            lock(&disclosure).eject();
            auth::eject(&ctx, "balance fetch failed");
        }
    }
}

/// Masked unless revealed.
#[must_use]
pub fn balance_text(disclosure: &BalanceDisclosure) -> String {
    disclosure.visible_amount().map_or_else(|| MASKED_BALANCE.to_owned(), format::format_inr)
}

#[must_use]
pub fn balance_button(disclosure: &BalanceDisclosure) -> BalanceButton {
    match disclosure.status {
        DisclosureStatus::Loading => BalanceButton { label: "", spinner: true, disabled: true },
        DisclosureStatus::Revealed => BalanceButton { label: "Hide Balance", spinner: false, disabled: false },
        DisclosureStatus::Hidden => BalanceButton { label: "Show Balance →", spinner: false, disabled: false },
        DisclosureStatus::Idle => BalanceButton { label: "Reveal Balance →", spinner: false, disabled: false },
        DisclosureStatus::Ejected => BalanceButton { label: "Reveal Balance →", spinner: false, disabled: true },
    }
}
