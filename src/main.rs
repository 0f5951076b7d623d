use adminpanel::app::App;
use adminpanel::config::{AppConfig, ConfigError};
use adminpanel::net::types::ApiError;
use adminpanel::pages::users::StatusFilter;
use adminpanel::pages::{self, PageError, dashboard, login, profile, register, settings, users};
use adminpanel::routes::{Route, Screen};
use clap::{Parser, Subcommand};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("{0}")]
    Page(#[from] PageError),
    #[error("{0}")]
    Form(&'static str),
}

#[derive(Parser, Debug)]
#[command(name = "adminpanel", about = "Admin dashboard for the user-management API")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and persist the session token.
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, env = "ADMINPANEL_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account. Sign in separately afterwards.
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "ADMINPANEL_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session token.
    Logout,
    /// Open a page: /dashboard, /users, /settings, /profile, /login, /register.
    Open {
        #[arg(default_value = "/")]
        path: String,
        /// Users page: match username or email.
        #[arg(long, default_value = "")]
        search: String,
        /// Users page: all, active or inactive.
        #[arg(long, default_value = "all")]
        status: StatusFilter,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let mut app = App::from_config(AppConfig::from_env()?)?;
    let mut router = app.router();
    app.initialized().await;

    match cli.command {
        Command::Login { username, password } => {
            router.navigate("/login");
            login::submit_login(app.auth(), &mut router, &username, &password)
                .await
                .map_err(CliError::Form)?;
            if let Some(user) = app.store().snapshot().user() {
                println!("Signed in as {}.", user.username);
            }
            Ok(())
        }
        Command::Register { username, email, password } => {
            router.navigate("/register");
            register::submit_register(app.auth(), &mut router, &username, &email, &password)
                .await
                .map_err(CliError::Form)?;
            println!("Account created. Sign in with `adminpanel login --username {username}`.");
            Ok(())
        }
        Command::Logout => {
            app.auth().logout();
            println!("Signed out.");
            Ok(())
        }
        Command::Open { path, search, status } => {
            let screen = router.settle(&path).await;
            render_screen(&app, screen, &search, status).await
        }
    }
}

async fn render_screen(app: &App, screen: Screen, search: &str, status: StatusFilter) -> Result<(), CliError> {
    match screen {
        Screen::Loading => println!("Loading..."),
        Screen::NotFound(path) => println!("No page at {path}."),
        Screen::Public(Route::Register) => {
            println!("Create an account with `adminpanel register --username <name> --email <email>`.");
        }
        Screen::Public(_) => println!("Sign in required. Run `adminpanel login --username <name>`."),
        Screen::Protected { route, user } => {
            println!("AdminPanel | {} | signed in as {}", route.path(), user.username);
            println!();
            match route {
                Route::Dashboard => {
                    let all = pages::fetch_users(app.api(), app.store()).await?;
                    print!("{}", dashboard::render(&dashboard::DashboardStats::from_users(&all)));
                }
                Route::Users => {
                    let all = pages::fetch_users(app.api(), app.store()).await?;
                    print!("{}", users::render(&users::filter_users(&all, search, status)));
                }
                Route::Settings => print!("{}", settings::render(app.config())),
                _ => print!("{}", profile::render(&user)),
            }
        }
    }
    Ok(())
}
