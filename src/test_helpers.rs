//! Test doubles for the `AppContext` collaborators.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::app::AppContext;
use crate::net::api::{ApiError, Gateway};
use crate::net::types::{LoginCredentials, Registration};
use crate::route::{Navigator, Route};
use crate::state::session::{Role, Session, SessionStore};
use crate::util::confetti::Celebration;

// =========================================================================
// MockGateway
// =========================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Login(String),
    Register(String),
    Logout,
    GetBalance,
}

pub(crate) struct MockGateway {
    login: Mutex<Result<Session, ApiError>>,
    /// Per-call login replies, consumed before falling back to `login`.
    login_queue: Mutex<VecDeque<(Duration, Result<Session, ApiError>)>>,
    register: Mutex<Result<(), ApiError>>,
    balance: Mutex<Result<f64, ApiError>>,
    latency: Duration,
    calls: Mutex<Vec<Call>>,
}

impl MockGateway {
    pub(crate) fn new() -> Self {
        Self {
            login: Mutex::new(Ok(Session::new("alice", Role::Customer))),
            login_queue: Mutex::new(VecDeque::new()),
            register: Mutex::new(Ok(())),
            balance: Mutex::new(Ok(125_000.0)),
            latency: Duration::from_millis(50),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_login(self, result: Result<Session, ApiError>) -> Self {
        *self.login.lock().unwrap() = result;
        self
    }

    /// Queue login replies, each after its own latency.
    pub(crate) fn with_login_queue(self, replies: Vec<(Duration, Result<Session, ApiError>)>) -> Self {
        self.login_queue.lock().unwrap().extend(replies);
        self
    }

    pub(crate) fn with_register(self, result: Result<(), ApiError>) -> Self {
        *self.register.lock().unwrap() = result;
        self
    }

    pub(crate) fn with_balance(self, result: Result<f64, ApiError>) -> Self {
        *self.balance.lock().unwrap() = result;
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, call: &Call) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == call).count()
    }

    async fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
        tokio::time::sleep(self.latency).await;
    }
}

#[async_trait::async_trait]
impl Gateway for MockGateway {
    async fn login(&self, credentials: &LoginCredentials) -> Result<Session, ApiError> {
        let queued = self.login_queue.lock().unwrap().pop_front();
        if let Some((latency, reply)) = queued {
            self.calls.lock().unwrap().push(Call::Login(credentials.username.clone()));
            tokio::time::sleep(latency).await;
            return reply;
        }
        self.record(Call::Login(credentials.username.clone())).await;
        self.login.lock().unwrap().clone()
    }

    async fn register(&self, registration: &Registration) -> Result<(), ApiError> {
        self.record(Call::Register(registration.username.clone())).await;
        self.register.lock().unwrap().clone()
    }

    async fn logout(&self) {
        self.record(Call::Logout).await;
    }

    async fn get_balance(&self) -> Result<f64, ApiError> {
        self.record(Call::GetBalance).await;
        self.balance.lock().unwrap().clone()
    }
}

// =========================================================================
// RecordingNavigator / CountingCelebration
// =========================================================================

#[derive(Default)]
pub(crate) struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub(crate) fn routes(&self) -> Vec<Route> {
        self.routes.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes.lock().unwrap().push(route);
    }
}

#[derive(Default)]
pub(crate) struct CountingCelebration {
    count: AtomicUsize,
}

impl CountingCelebration {
    pub(crate) fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl Celebration for CountingCelebration {
    fn celebrate(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

// =========================================================================
// Harness
// =========================================================================

pub(crate) struct Harness {
    pub gateway: Arc<MockGateway>,
    pub navigator: Arc<RecordingNavigator>,
    pub effects: Arc<CountingCelebration>,
    pub ctx: AppContext,
}

pub(crate) fn harness(gateway: MockGateway) -> Harness {
    let gateway = Arc::new(gateway);
    let navigator = Arc::new(RecordingNavigator::default());
    let effects = Arc::new(CountingCelebration::default());
    let ctx = AppContext::new(
        gateway.clone(),
        SessionStore::in_memory(),
        navigator.clone(),
        effects.clone(),
    );
    Harness { gateway, navigator, effects, ctx }
}

/// Harness whose store already holds `alice`.
pub(crate) fn signed_in(gateway: MockGateway) -> Harness {
    let h = harness(gateway);
    h.ctx.session.set(&Session::new("alice", Role::Customer));
    h
}
