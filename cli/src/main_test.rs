use super::*;
use std::sync::Mutex;
use std::time::Duration;

use kodbank::net::api::Gateway;
use kodbank::net::types::{LoginCredentials, Registration};
use kodbank::state::disclosure::DisclosureStatus;
use kodbank::state::session::{Role, Session};

const LATENCY: Duration = Duration::from_millis(50);

/// Gateway that answers every call successfully after `LATENCY`.
#[derive(Default)]
struct SlowGateway {
    balance_calls: Mutex<usize>,
}

#[async_trait::async_trait]
impl Gateway for SlowGateway {
    async fn login(&self, credentials: &LoginCredentials) -> Result<Session, ApiError> {
        tokio::time::sleep(LATENCY).await;
        Ok(Session::new(credentials.username.clone(), Role::Customer))
    }

    async fn register(&self, _registration: &Registration) -> Result<(), ApiError> {
        tokio::time::sleep(LATENCY).await;
        Ok(())
    }

    async fn logout(&self) {
        tokio::time::sleep(LATENCY).await;
    }

    async fn get_balance(&self) -> Result<f64, ApiError> {
        *self.balance_calls.lock().unwrap() += 1;
        tokio::time::sleep(LATENCY).await;
        Ok(1_000.0)
    }
}

struct Quiet;

impl Celebration for Quiet {
    fn celebrate(&self) {}
}

fn context(gateway: Arc<SlowGateway>) -> (AppContext, UnboundedReceiver<Route>) {
    let (navigator, routes) = ChannelNavigator::channel();
    let ctx = AppContext::new(gateway, SessionStore::in_memory(), Arc::new(navigator), Arc::new(Quiet));
    (ctx, routes)
}

#[test]
fn parses_login() {
    assert_eq!(
        parse_command("login alice hunter2"),
        Ok(Command::Login { username: "alice".to_owned(), password: "hunter2".to_owned() })
    );
}

#[test]
fn register_phone_is_optional() {
    let Ok(Command::Register { phone, .. }) = parse_command("register bob bob@bank.test pw") else {
        panic!("expected register");
    };
    assert_eq!(phone, None);

    let Ok(Command::Register { phone, .. }) = parse_command("register bob bob@bank.test pw 5550100") else {
        panic!("expected register");
    };
    assert_eq!(phone.as_deref(), Some("5550100"));
}

#[test]
fn wrong_arity_returns_usage() {
    assert!(parse_command("login alice").unwrap_err().starts_with("usage: login"));
    assert!(parse_command("register a b c d e").unwrap_err().starts_with("usage: register"));
    assert!(parse_command("reveal now").is_err());
}

#[test]
fn bare_commands() {
    assert_eq!(parse_command("  reveal "), Ok(Command::Reveal));
    assert_eq!(parse_command("toggle"), Ok(Command::Toggle));
    assert_eq!(parse_command("exit"), Ok(Command::Quit));
    assert!(parse_command("dance").unwrap_err().contains("unknown command"));
}

#[test]
fn flags_override_environment_defaults() {
    let cli = Cli::parse_from(["kodbank-cli", "--origin", "http://bank.test/", "--store-dir", "/tmp/kb-cli"]);
    let config = build_config(&cli).unwrap();
    assert_eq!(config.origin, "http://bank.test");
    assert_eq!(config.store_dir, PathBuf::from("/tmp/kb-cli"));
}

#[tokio::test(start_paused = true)]
async fn reveal_returns_before_the_balance_arrives() {
    let gateway = Arc::new(SlowGateway::default());
    let (ctx, _routes) = context(gateway.clone());
    ctx.session.set(&Session::new("alice", Role::Customer));
    let mut view = View::Dashboard(DashboardPage::mount(ctx.clone()).unwrap());
    let (done, mut settled) = mpsc::unbounded_channel();

    execute(&ctx, &mut view, Command::Reveal, &done);
    execute(&ctx, &mut view, Command::Reveal, &done);

    let View::Dashboard(page) = &view else { panic!("left the dashboard") };
    assert!(page.disclosure().is_loading());
    assert!(settled.try_recv().is_err());

    assert_eq!(settled.recv().await, Some(Settled::Reveal));
    assert_eq!(page.disclosure().status, DisclosureStatus::Revealed);
    assert_eq!(*gateway.balance_calls.lock().unwrap(), 1);
}

#[tokio::test(start_paused = true)]
async fn login_reports_through_the_loop_channels() {
    let (ctx, mut routes) = context(Arc::new(SlowGateway::default()));
    let mut view = View::Register(RegisterPage::new(ctx.clone()));
    let (done, mut settled) = mpsc::unbounded_channel();

    execute(&ctx, &mut view, Command::Login { username: "alice".to_owned(), password: "pw".to_owned() }, &done);

    assert_eq!(view.route(), Route::Login);
    assert_eq!(ctx.session.current(), None);
    assert_eq!(routes.recv().await, Some(Route::Dashboard));
    assert_eq!(settled.recv().await, Some(Settled::Login));
    assert_eq!(ctx.session.current(), Some(Session::new("alice", Role::Customer)));
}
