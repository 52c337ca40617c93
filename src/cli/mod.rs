//! Command-line front end for the yoga studio client.
//!
//! Every command drives the same view controllers a graphical front end
//! would, then prints what the view ends up holding:
//! - `register` / `login` - account creation and credential check
//! - `sessions ...` - list, inspect, join, leave and (admin) manage sessions
//! - `teachers list` - list teachers
//! - `me show|delete` - the logged-in account
//! - `config check` - validate the configuration file

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use futures::StreamExt;

use crate::api::ApiClient;
use crate::config::{ApiConfig, Config};
use crate::models::{format_timestamp, SessionInformation, YogaSession};
use crate::state::SessionStore;
use crate::views::detail::DetailView;
use crate::views::form::{FormMode, FormView, SessionForm};
use crate::views::list::ListView;
use crate::views::login::{LoginForm, LoginView};
use crate::views::me::MeView;
use crate::views::register::{RegisterForm, RegisterView};
use crate::views::shell::AppShell;
use crate::views::{Notifier, Route, Toast, ViewContext};

/// CLI arguments structure
#[derive(Parser, Debug)]
#[command(name = "yoga")]
#[command(author, version, about = "Book and manage yoga sessions", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "yoga.toml")]
    pub config: PathBuf,

    /// Override log level
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// API server URL, overrides `api.base_url` from the config file
    #[arg(long, env = "YOGA_API_URL")]
    pub api_url: Option<String>,

    /// Account email
    #[arg(long, env = "YOGA_EMAIL")]
    pub email: Option<String>,

    /// Account password
    #[arg(long, env = "YOGA_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an account with --email and --password
    Register {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
    },

    /// Check credentials and show the identity they map to
    Login,

    /// Session commands
    #[command(subcommand)]
    Sessions(SessionsCommands),

    /// Teacher commands
    #[command(subcommand)]
    Teachers(TeachersCommands),

    /// Account commands
    #[command(subcommand)]
    Me(MeCommands),

    /// Configuration management commands
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
pub enum SessionsCommands {
    /// List all sessions
    List,
    /// Show one session with its teacher and attendees
    Show { id: u64 },
    /// Join a session
    Participate { id: u64 },
    /// Leave a session
    Leave { id: u64 },
    /// Create a session (admin)
    Create {
        #[command(flatten)]
        fields: SessionFields,
    },
    /// Edit a session (admin). Omitted fields keep their current value
    Update {
        id: u64,
        #[command(flatten)]
        fields: SessionFields,
    },
    /// Delete a session (admin)
    Delete { id: u64 },
}

#[derive(Args, Debug, Default)]
pub struct SessionFields {
    #[arg(long)]
    pub name: Option<String>,
    /// Date as YYYY-MM-DD
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long)]
    pub teacher_id: Option<u64>,
    #[arg(long)]
    pub description: Option<String>,
}

impl SessionFields {
    fn apply(&self, form: &mut SessionForm) {
        if let Some(name) = &self.name {
            form.name = name.clone();
        }
        if let Some(date) = &self.date {
            form.date = date.clone();
        }
        if let Some(teacher_id) = self.teacher_id {
            form.teacher_id = Some(teacher_id);
        }
        if let Some(description) = &self.description {
            form.description = description.clone();
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum TeachersCommands {
    /// List all teachers
    List,
}

#[derive(Subcommand, Debug)]
pub enum MeCommands {
    /// Show the logged-in account
    Show,
    /// Delete the logged-in account
    Delete,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Validate configuration file
    Check,
}

/// Prints toasts to stdout
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn open(&self, toast: Toast) {
        println!(">> {}", toast.message);
    }
}

/// API settings from the config file with command-line overrides applied
fn api_config(cli: &Cli, config: &Config) -> ApiConfig {
    let mut api = config.api.clone();
    if let Some(url) = &cli.api_url {
        api.base_url = url.clone();
    }
    api
}

fn create_context(cli: &Cli, config: &Config, notifier: Arc<dyn Notifier>) -> Result<ViewContext> {
    let client = ApiClient::new(&api_config(cli, config), Arc::new(SessionStore::new()))
        .context("Failed to create HTTP client")?;
    Ok(ViewContext::new(client, notifier, config.toast_duration()))
}

/// Run a CLI command
pub async fn run_command(cli: &Cli, config: &Config) -> Result<()> {
    if let Commands::Config(ConfigCommands::Check) = &cli.command {
        return cmd_config_check(cli);
    }

    let ctx = create_context(cli, config, Arc::new(ConsoleNotifier))?;
    let shell = AppShell::new(ctx);

    match &cli.command {
        Commands::Register {
            first_name,
            last_name,
        } => cmd_register(cli, &shell, first_name, last_name).await,
        Commands::Login => cmd_login(cli, &shell).await,
        Commands::Sessions(command) => {
            log_in(cli, &shell).await?;
            match command {
                SessionsCommands::List => cmd_sessions_list(&shell).await,
                SessionsCommands::Show { id } => cmd_sessions_show(&shell, *id).await,
                SessionsCommands::Participate { id } => {
                    cmd_sessions_toggle(&shell, *id, true).await
                }
                SessionsCommands::Leave { id } => cmd_sessions_toggle(&shell, *id, false).await,
                SessionsCommands::Create { fields } => {
                    cmd_sessions_save(&shell, FormMode::Create, fields).await
                }
                SessionsCommands::Update { id, fields } => {
                    cmd_sessions_save(&shell, FormMode::Update(*id), fields).await
                }
                SessionsCommands::Delete { id } => cmd_sessions_delete(&shell, *id).await,
            }
        }
        Commands::Teachers(TeachersCommands::List) => {
            log_in(cli, &shell).await?;
            cmd_teachers_list(&shell).await
        }
        Commands::Me(command) => {
            log_in(cli, &shell).await?;
            match command {
                MeCommands::Show => cmd_me_show(&shell).await,
                MeCommands::Delete => cmd_me_delete(&shell).await,
            }
        }
        Commands::Config(ConfigCommands::Check) => Ok(()),
    }
}

fn credentials(cli: &Cli) -> Result<(String, String)> {
    let email = cli
        .email
        .clone()
        .context("Missing email. Use --email or set YOGA_EMAIL.")?;
    let password = cli
        .password
        .clone()
        .context("Missing password. Use --password or set YOGA_PASSWORD.")?;
    Ok((email, password))
}

/// Log in through the login page, leaving the shell on the sessions list
async fn log_in(cli: &Cli, shell: &AppShell) -> Result<SessionInformation> {
    let (email, password) = credentials(cli)?;

    shell.open(Route::Login);
    let view = LoginView::new(shell.context().clone());
    view.set_form(LoginForm::new(email, password));
    let information = view.submit().await.context("Login failed")?;

    tracing::debug!(user_id = information.id, route = %shell.context().navigator.current(), "Logged in");
    Ok(information)
}

async fn cmd_register(cli: &Cli, shell: &AppShell, first_name: &str, last_name: &str) -> Result<()> {
    let (email, password) = credentials(cli)?;

    shell.open(Route::Register);
    let view = RegisterView::new(shell.context().clone());
    view.set_form(RegisterForm {
        email: email.clone(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        password,
    });

    if let Err(e) = view.submit().await {
        match view.error_message() {
            Some(message) => bail!("Registration failed: {}", message),
            None => return Err(e).context("Registration failed"),
        }
    }

    println!("Account created for {}. You can now log in.", email);
    Ok(())
}

async fn cmd_login(cli: &Cli, shell: &AppShell) -> Result<()> {
    let information = log_in(cli, shell).await?;

    println!();
    println!("Logged in as {}", information.username);
    println!("  ID:    {}", information.id);
    println!("  Name:  {} {}", information.first_name, information.last_name);
    println!("  Admin: {}", if information.admin { "yes" } else { "no" });
    println!();
    Ok(())
}

async fn cmd_sessions_list(shell: &AppShell) -> Result<()> {
    let view = ListView::new(shell.context().clone());
    let sessions = view
        .sessions()
        .boxed()
        .next()
        .await
        .context("No response from session list")?
        .context("Failed to load sessions")?;

    if sessions.is_empty() {
        println!("No sessions found.");
        return Ok(());
    }

    println!();
    println!(
        "{:<6}  {:<30}  {:<10}  {:<8}  {:<9}",
        "ID", "NAME", "DATE", "TEACHER", "ATTENDEES"
    );
    println!("{}", "-".repeat(71));

    for session in sessions {
        println!(
            "{:<6}  {:<30}  {:<10}  {:<8}  {:<9}",
            session.id,
            truncate(&session.name, 30),
            session.form_date(),
            session.teacher_id,
            session.attendee_count()
        );
    }

    println!();
    if view.can_manage() {
        println!("You can create, edit and delete sessions.");
    }
    Ok(())
}

async fn load_detail(shell: &AppShell, id: u64) -> Result<DetailView> {
    shell.open(Route::SessionDetail(id));
    let view = DetailView::new(shell.context().clone(), id);
    view.init()
        .await
        .with_context(|| format!("Failed to load session {}", id))?;
    Ok(view)
}

fn print_session(view: &DetailView, session: &YogaSession) {
    println!();
    println!("=== Session: {} ===", session.name);
    println!();
    println!("ID:          {}", session.id);
    println!("Date:        {}", session.form_date());
    if let Some(teacher) = view.teacher() {
        println!("Teacher:     {}", teacher.display_name());
    }
    println!("Attendees:   {}", view.attendees_label());
    println!("Description: {}", session.description);
    if let Some(created) = &session.created_at {
        println!("Created:     {}", format_timestamp(created));
    }
    if let Some(updated) = &session.updated_at {
        println!("Updated:     {}", format_timestamp(updated));
    }
    println!();
    if view.is_participate() {
        println!("You take part in this session.");
    }
}

async fn cmd_sessions_show(shell: &AppShell, id: u64) -> Result<()> {
    let view = load_detail(shell, id).await?;
    let session = view.session().context("Session not loaded")?;
    print_session(&view, &session);
    Ok(())
}

async fn cmd_sessions_toggle(shell: &AppShell, id: u64, join: bool) -> Result<()> {
    let view = load_detail(shell, id).await?;
    if view.is_participate() == join {
        println!("Nothing to do: {}", view.participation_action());
        return Ok(());
    }

    if join {
        view.participate().await.context("Failed to join session")?;
    } else {
        view.un_participate().await.context("Failed to leave session")?;
    }

    println!(
        "{} session {}, now {}.",
        if join { "Joined" } else { "Left" },
        view.session_id(),
        view.attendees_label()
    );
    Ok(())
}

async fn cmd_sessions_save(shell: &AppShell, mode: FormMode, fields: &SessionFields) -> Result<()> {
    let view = FormView::new(shell.context().clone(), mode);
    shell.open(match view.mode() {
        FormMode::Create => Route::SessionCreate,
        FormMode::Update(id) => Route::SessionUpdate(id),
    });

    view.init().await.context("Cannot open the session form")?;
    view.edit(|form| fields.apply(form));

    if let Some(teacher_id) = view.form().teacher_id {
        let teachers = view.teachers();
        if !teachers.iter().any(|t| t.id == teacher_id) {
            let known: Vec<String> = teachers
                .iter()
                .map(|t| format!("{} ({})", t.id, t.option_label()))
                .collect();
            bail!(
                "Unknown teacher {}. Known teachers: {}",
                teacher_id,
                if known.is_empty() { "none".to_string() } else { known.join(", ") }
            );
        }
    }

    let errors = view.errors();
    if !errors.is_empty() {
        bail!("Invalid session: {}", errors);
    }

    let session = view.submit().await.context("Failed to save session")?;
    println!("Session {} saved ({}).", session.id, session.name);
    Ok(())
}

async fn cmd_sessions_delete(shell: &AppShell, id: u64) -> Result<()> {
    let view = load_detail(shell, id).await?;
    if !view.is_admin() {
        bail!("Only admins can delete sessions");
    }
    view.delete().await.context("Failed to delete session")?;
    Ok(())
}

async fn cmd_teachers_list(shell: &AppShell) -> Result<()> {
    let teachers = shell
        .context()
        .teachers
        .all()
        .await
        .context("Failed to load teachers")?;

    if teachers.is_empty() {
        println!("No teachers found.");
        return Ok(());
    }

    println!();
    println!("{:<6}  {:<30}", "ID", "NAME");
    println!("{}", "-".repeat(38));
    for teacher in teachers {
        println!("{:<6}  {:<30}", teacher.id, truncate(&teacher.display_name(), 30));
    }
    println!();
    Ok(())
}

async fn cmd_me_show(shell: &AppShell) -> Result<()> {
    shell.open(Route::Me);
    let view = MeView::new(shell.context().clone());
    view.init().await.context("Failed to load account")?;
    let user = view.user().context("Account not loaded")?;

    println!();
    println!("=== User information ===");
    println!();
    println!("Name:  {}", user.display_name());
    println!("Email: {}", user.email);
    if user.admin {
        println!("You are admin");
    }
    if let Some(created) = &user.created_at {
        println!("Create at:   {}", format_timestamp(created));
    }
    if let Some(updated) = &user.updated_at {
        println!("Last update: {}", format_timestamp(updated));
    }
    println!();
    Ok(())
}

async fn cmd_me_delete(shell: &AppShell) -> Result<()> {
    shell.open(Route::Me);
    let view = MeView::new(shell.context().clone());
    view.delete().await.context("Failed to delete account")?;
    Ok(())
}

fn cmd_config_check(cli: &Cli) -> Result<()> {
    let config_path = &cli.config;

    println!("Checking configuration file: {}", config_path.display());
    println!();

    if !config_path.exists() {
        println!(
            "[!!] Configuration file not found: {}",
            config_path.display()
        );
        println!("Defaults will be used.");
        println!();
    }

    let config = Config::load(config_path)?;
    config.validate()?;
    let api = api_config(cli, &config);

    println!("[OK] Configuration is valid!");
    println!();
    println!("API:");
    println!("  Base URL:  {}", api.base_url);
    match api.timeout_secs {
        Some(secs) => println!("  Timeout:   {}s", secs),
        None => println!("  Timeout:   none"),
    }
    println!("Logging:");
    println!("  Level:     {}", config.logging.level);
    println!("UI:");
    println!("  Toasts:    {} ms", config.ui.toast_duration_ms);
    println!();
    Ok(())
}

/// Truncate a string to max characters with ellipsis
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixtures, FakeApi};
    use serde_json::json;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["yoga", "--email", "yoga@studio.com", "--password", "test!1234"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    fn config_for(api: &FakeApi) -> Config {
        Config {
            api: api.config(),
            ..Config::default()
        }
    }

    #[test]
    fn test_parse_session_commands() {
        let cli = parse(&["sessions", "participate", "123"]);
        assert!(matches!(
            cli.command,
            Commands::Sessions(SessionsCommands::Participate { id: 123 })
        ));

        let cli = parse(&[
            "sessions",
            "update",
            "7",
            "--date",
            "2025-06-01",
            "--teacher-id",
            "2",
        ]);
        match cli.command {
            Commands::Sessions(SessionsCommands::Update { id, fields }) => {
                assert_eq!(id, 7);
                assert_eq!(fields.date.as_deref(), Some("2025-06-01"));
                assert_eq!(fields.teacher_id, Some(2));
                assert!(fields.name.is_none());
            }
            other => panic!("Unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_api_url_overrides_config() {
        let cli = Cli::parse_from(["yoga", "--api-url", "http://studio:9000", "login"]);
        let api = api_config(&cli, &Config::default());
        assert_eq!(api.base_url, "http://studio:9000");
    }

    #[test]
    fn test_fields_apply_only_given_values() {
        let mut form = SessionForm {
            name: "Morning flow".to_string(),
            date: "2025-04-25".to_string(),
            teacher_id: Some(1),
            description: "Gentle".to_string(),
        };
        let fields = SessionFields {
            name: Some("Evening flow".to_string()),
            ..SessionFields::default()
        };
        fields.apply(&mut form);

        assert_eq!(form.name, "Evening flow");
        assert_eq!(form.date, "2025-04-25");
        assert_eq!(form.teacher_id, Some(1));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Yoga", 10), "Yoga");
        assert_eq!(truncate("Vinyasa flow for beginners", 10), "Vinyasa...");
        assert_eq!(truncate("Séance découverte", 8), "Séanc...");
    }

    #[tokio::test]
    async fn test_participate_command() {
        let api = FakeApi::start().await;
        api.respond("POST", "/api/auth/login", 200, fixtures::identity_json(1, false));
        api.respond("GET", "/api/session/123", 200, fixtures::session_json(123, 1, &[]));
        api.respond("GET", "/api/session/123", 200, fixtures::session_json(123, 1, &[1]));
        api.respond("GET", "/api/teacher/1", 200, fixtures::teacher_json(1, "John", "Doe"));
        api.respond_empty("POST", "/api/session/123/participate/1", 200);

        let cli = parse(&["sessions", "participate", "123"]);
        run_command(&cli, &config_for(&api)).await.unwrap();

        assert_eq!(api.count("POST", "/api/session/123/participate/1"), 1);
        let authorization = api
            .requests()
            .into_iter()
            .find(|r| r.path == "/api/session/123/participate/1")
            .and_then(|r| r.authorization);
        assert_eq!(authorization.as_deref(), Some("Bearer abc123"));
    }

    #[tokio::test]
    async fn test_create_command_rejects_incomplete_form() {
        let api = FakeApi::start().await;
        api.respond("POST", "/api/auth/login", 200, fixtures::identity_json(1, true));
        api.respond("GET", "/api/teacher", 200, json!([]));

        let cli = parse(&["sessions", "create", "--name", "Morning flow"]);
        let err = run_command(&cli, &config_for(&api)).await.unwrap_err();

        assert!(err.to_string().contains("Invalid session"));
        assert_eq!(api.count("POST", "/api/session"), 0);
    }

    #[tokio::test]
    async fn test_create_command_rejects_unknown_teacher() {
        let api = FakeApi::start().await;
        api.respond("POST", "/api/auth/login", 200, fixtures::identity_json(1, true));
        api.respond("GET", "/api/teacher", 200, json!([fixtures::teacher_json(1, "John", "Doe")]));

        let cli = parse(&[
            "sessions",
            "create",
            "--name",
            "Morning flow",
            "--date",
            "2025-04-25",
            "--teacher-id",
            "9",
            "--description",
            "Gentle start",
        ]);
        let err = run_command(&cli, &config_for(&api)).await.unwrap_err();

        assert!(err.to_string().contains("Unknown teacher 9"));
        assert!(err.to_string().contains("1 (John Doe)"));
        assert_eq!(api.count("POST", "/api/session"), 0);
    }

    #[tokio::test]
    async fn test_bad_credentials_fail_the_command() {
        let api = FakeApi::start().await;
        api.respond("POST", "/api/auth/login", 401, json!({"message": "Bad credentials"}));

        let cli = parse(&["me", "show"]);
        let err = run_command(&cli, &config_for(&api)).await.unwrap_err();

        assert!(err.to_string().contains("Login failed"));
        assert_eq!(api.requests().len(), 1);
    }
}
