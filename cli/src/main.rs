use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use kodbank::config::{ClientConfig, ConfigError};
use kodbank::net::api::{ApiError, HttpGateway};
use kodbank::pages::Submission;
use kodbank::pages::dashboard::{DashboardPage, Press, Reveal};
use kodbank::pages::login::LoginPage;
use kodbank::pages::register::{Field, RegisterPage};
use kodbank::route::{ChannelNavigator, Route};
use kodbank::state::forms::FormErrors;
use kodbank::state::session::{FileStore, SessionStore};
use kodbank::util::auth;
use kodbank::util::confetti::{Celebration, ConfettiBurst};
use kodbank::AppContext;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;

#[cfg(test)]
#[path = "main_test.rs"]
mod main_test;

const CONFETTI_WIDTH: usize = 48;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("gateway setup failed: {0}")]
    Gateway(#[from] ApiError),
    #[error("stdin read failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "kodbank-cli", about = "Interactive KodBank client")]
struct Cli {
    /// Origin the client talks to.
    #[arg(long, env = "KODBANK_ORIGIN")]
    origin: Option<String>,

    /// Separate base URL for registration.
    #[arg(long, env = "KODBANK_API_URL")]
    api_url: Option<String>,

    /// Directory for the persisted identity.
    #[arg(long, env = "KODBANK_STORE_DIR")]
    store_dir: Option<PathBuf>,

    /// Keep the identity in memory only.
    #[arg(long, default_value_t = false)]
    ephemeral: bool,
}

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Login { username: String, password: String },
    Register { username: String, email: String, password: String, phone: Option<String> },
    Reveal,
    Toggle,
    Logout,
    WhoAmI,
    View,
    Help,
    Quit,
}

enum View {
    Login(LoginPage),
    Register(RegisterPage),
    Dashboard(DashboardPage),
}

impl View {
    fn route(&self) -> Route {
        match self {
            Self::Login(_) => Route::Login,
            Self::Register(_) => Route::Register,
            Self::Dashboard(_) => Route::Dashboard,
        }
    }
}

/// Prints a confetti strip to the terminal.
struct TerminalConfetti {
    burst: ConfettiBurst,
}

impl Celebration for TerminalConfetti {
    fn celebrate(&self) {
        let strip = self.burst.render_strip(&mut rand::rng(), CONFETTI_WIDTH);
        println!("{strip}");
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = build_config(&cli)?;
    tracing::debug!(origin = %config.origin, api_url = ?config.api_url, "starting");

    let session = if cli.ephemeral {
        SessionStore::in_memory()
    } else {
        let store = FileStore::for_origin(&config.store_dir, &config.origin);
        tracing::debug!(path = %store.path().display(), "session store");
        SessionStore::new(Arc::new(store))
    };
    let gateway = HttpGateway::new(config)?;
    let (navigator, routes) = ChannelNavigator::channel();
    let ctx = AppContext::new(
        Arc::new(gateway),
        session,
        Arc::new(navigator),
        Arc::new(TerminalConfetti { burst: ConfettiBurst::default() }),
    );

    run(ctx, routes).await
}

fn build_config(cli: &Cli) -> Result<ClientConfig, CliError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(origin) = &cli.origin {
        config = config.with_origin(origin)?;
    }
    if let Some(api_url) = &cli.api_url {
        config = config.with_api_url(api_url)?;
    }
    if let Some(store_dir) = &cli.store_dir {
        config = config.with_store_dir(store_dir.clone());
    }
    Ok(config)
}

/// Background work that finished and may change what is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Settled {
    Login,
    Register,
    Reveal,
    Logout,
}

async fn run(ctx: AppContext, mut routes: UnboundedReceiver<Route>) -> Result<(), CliError> {
    let start = if auth::should_redirect_unauth(Route::Dashboard, &ctx.session) {
        Route::Login
    } else {
        Route::Dashboard
    };
    let mut view = enter(&ctx, start).unwrap_or_else(|| View::Login(LoginPage::new(ctx.clone())));
    render(&view);
    println!("type `help` for commands");

    let (done, mut settled) = mpsc::unbounded_channel();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            biased;
            Some(route) = routes.recv() => {
                if let Some(next) = enter(&ctx, route) {
                    view = next;
                    render(&view);
                }
            }
            Some(kind) = settled.recv() => report(&view, kind),
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match parse_command(&line) {
                    Ok(Command::Quit) => break,
                    Ok(command) => execute(&ctx, &mut view, command, &done),
                    Err(usage) => println!("{usage}"),
                }
            }
        }
    }
    Ok(())
}

/// Build the view for `route`. `None` when the dashboard guard redirected.
fn enter(ctx: &AppContext, route: Route) -> Option<View> {
    tracing::debug!(path = route.path(), "entering view");
    match route {
        Route::Login => Some(View::Login(LoginPage::new(ctx.clone()))),
        Route::Register => Some(View::Register(RegisterPage::new(ctx.clone()))),
        Route::Dashboard => DashboardPage::mount(ctx.clone()).map(View::Dashboard),
    }
}

/// Apply one command. Never waits on the network: spawned work reports back
/// through `done` and the loop keeps reading input meanwhile.
fn execute(ctx: &AppContext, view: &mut View, command: Command, done: &UnboundedSender<Settled>) {
    match command {
        Command::Login { username, password } => {
            if view.route() != Route::Login {
                *view = View::Login(LoginPage::new(ctx.clone()));
            }
            if let View::Login(page) = view {
                page.set_username(username);
                page.set_password(password);
                watch_submission(done, Settled::Login, page.submit());
            }
        }
        Command::Register { username, email, password, phone } => {
            if view.route() != Route::Register {
                *view = View::Register(RegisterPage::new(ctx.clone()));
            }
            if let View::Register(page) = view {
                page.set(Field::Username, username);
                page.set(Field::Email, email);
                page.set(Field::Password, password);
                page.set(Field::Phone, phone.unwrap_or_default());
                watch_submission(done, Settled::Register, page.submit());
                if page.is_loading() {
                    println!("creating account...");
                }
            }
        }
        Command::Reveal | Command::Toggle => {
            let View::Dashboard(page) = view else {
                println!("sign in first");
                return;
            };
            match page.press() {
                Press::Reveal(Reveal::Started(handle)) => watch(done, Settled::Reveal, handle),
                Press::Reveal(Reveal::Ignored) | Press::Ignored => println!("balance button is busy"),
                Press::Toggled(_) => {}
            }
            render(view);
        }
        Command::Logout => {
            let View::Dashboard(page) = view else {
                println!("not signed in");
                return;
            };
            watch(done, Settled::Logout, page.logout());
        }
        Command::WhoAmI => match ctx.session.current() {
            Some(session) => println!("{} ({})", session.username, session.role),
            None => println!("nobody"),
        },
        Command::View => render(view),
        Command::Help => print_help(),
        Command::Quit => {}
    }
}

fn watch(done: &UnboundedSender<Settled>, kind: Settled, handle: JoinHandle<()>) {
    let done = done.clone();
    tokio::spawn(async move {
        if let Err(e) = handle.await {
            tracing::warn!(?kind, error = %e, "background task failed");
        }
        notify(&done, kind);
    });
}

fn watch_submission(done: &UnboundedSender<Settled>, kind: Settled, submission: Submission) {
    let done = done.clone();
    tokio::spawn(async move {
        let outcome = submission.outcome().await;
        tracing::debug!(?kind, ?outcome, "submission settled");
        notify(&done, kind);
    });
}

fn notify(done: &UnboundedSender<Settled>, kind: Settled) {
    if done.send(kind).is_err() {
        tracing::debug!(?kind, "settled after the loop exited");
    }
}

/// Show the result of finished work, if its view is still on screen.
fn report(view: &View, kind: Settled) {
    match (kind, view) {
        (Settled::Login, View::Login(page)) => {
            let form = page.form();
            print_errors(&form.errors);
            if let Some(toast) = form.toast() {
                println!("! {toast}");
            }
        }
        (Settled::Register, View::Register(page)) => {
            let form = page.form();
            print_errors(&form.errors);
            if let Some(notice) = form.notice {
                println!("{notice}. Returning to login...");
            }
        }
        (Settled::Reveal, View::Dashboard(_)) => render(view),
        _ => {}
    }
}

fn parse_command(line: &str) -> Result<Command, String> {
    let mut words = line.split_whitespace();
    let name = words.next().unwrap_or_default();
    let args: Vec<String> = words.map(str::to_owned).collect();
    let command = match (name, args.as_slice()) {
        ("login", [username, password]) => {
            Command::Login { username: username.clone(), password: password.clone() }
        }
        ("register", [username, email, password, rest @ ..]) if rest.len() <= 1 => Command::Register {
            username: username.clone(),
            email: email.clone(),
            password: password.clone(),
            phone: rest.first().cloned(),
        },
        ("reveal", []) => Command::Reveal,
        ("toggle", []) => Command::Toggle,
        ("logout", []) => Command::Logout,
        ("whoami", []) => Command::WhoAmI,
        ("view", []) => Command::View,
        ("help", []) => Command::Help,
        ("quit" | "exit", []) => Command::Quit,
        ("login", _) => return Err("usage: login <username> <password>".to_owned()),
        ("register", _) => return Err("usage: register <username> <email> <password> [phone]".to_owned()),
        (other, _) => return Err(format!("unknown command `{other}`; type `help`")),
    };
    Ok(command)
}

fn render(view: &View) {
    match view {
        View::Login(page) => {
            let form = page.form();
            println!("== Sign in ({}) ==", Route::Login.path());
            println!("username: {}", form.credentials.username);
        }
        View::Register(page) => {
            let form = page.form();
            println!("== Create account ({}) ==", Route::Register.path());
            println!("role: {}", form.role());
            if page.is_loading() {
                println!("creating account...");
            }
        }
        View::Dashboard(page) => {
            let dash = page.view();
            println!("== {} ==", dash.greeting);
            println!("[{}] {}", dash.initial, dash.heading);
            println!("{} account, member since {}", dash.account_type, dash.member_since);
            println!("balance: {}", dash.balance);
            if dash.button.spinner {
                println!("[ ... ]");
            } else {
                println!("[ {} ]", dash.button.label);
            }
            if let Some(note) = dash.note {
                println!("{note}");
            }
        }
    }
}

fn print_errors(errors: &FormErrors) {
    if let Some(general) = errors.general() {
        println!("error: {general}");
    }
    for (field, message) in errors.fields() {
        println!("  {field}: {message}");
    }
}

fn print_help() {
    println!("commands:");
    println!("  login <username> <password>");
    println!("  register <username> <email> <password> [phone]");
    println!("  reveal | toggle      press the balance button");
    println!("  logout");
    println!("  whoami | view | help | quit");
}
