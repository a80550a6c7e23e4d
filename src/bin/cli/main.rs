mod app;
mod commands;
mod render;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tutorly-cli", about = "Tutorly LMS command-line client", version)]
struct Cli {
    /// API base URL (overrides config and TUTORLY_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

/// Resources reachable from the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ResourceKind {
    Lessons,
    Quizzes,
    Matrices,
    Units,
    Students,
    Teachers,
    Answers,
    LessonContents,
    MatrixDetails,
    QuizAttempts,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in with email and password
    Login {
        email: String,
        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Create an account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Confirm an email address with the code that was sent to it
    VerifyEmail { email: String, code: String },

    /// Send the verification code again
    ResendVerification { email: String },

    /// Sign out and forget stored tokens
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Exchange the refresh token for a new access token
    Refresh,

    /// List a resource, one page at a time
    List {
        resource: ResourceKind,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        size: Option<u32>,
        /// Field to filter on
        #[arg(long)]
        filter_on: Option<String>,
        #[arg(long)]
        filter_query: Option<String>,
        /// asc or desc
        #[arg(long)]
        sort: Option<String>,
        /// Starting query string, e.g. "pageNumber=2&filterOn=level"
        #[arg(long)]
        params: Option<String>,
        /// Only children of this parent (answers, lesson-contents, ...)
        #[arg(long)]
        parent: Option<String>,
    },

    /// Show one record
    Show { resource: ResourceKind, id: String },

    /// Delete one record
    Delete { resource: ResourceKind, id: String },

    /// Create a record from a JSON form ("-" reads stdin)
    Create {
        resource: ResourceKind,
        #[arg(long)]
        json: String,
    },

    /// Edit a record field by field
    Edit {
        resource: ResourceKind,
        id: String,
        /// field=value, using the API's camelCase field names
        #[arg(long = "set", value_name = "FIELD=VALUE", required = true)]
        set: Vec<String>,
    },

    /// Review a deck of cards with spaced repetition
    Review {
        deck: PathBuf,
        /// Include cards that are not due yet
        #[arg(long)]
        all: bool,
    },

    /// Take a quiz, resuming saved progress
    Quiz {
        quiz: PathBuf,
        /// Discard saved progress and start over
        #[arg(long)]
        restart: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && std::io::stdout().is_terminal();
    let app = app::App::new(cli.api_url.as_deref())?;
    let format = &cli.format;

    match cli.command {
        Command::Login { email, password } => {
            commands::auth::login(&app, &email, password, format, use_color).await?;
        }
        Command::Register { name, email, password } => {
            commands::auth::register(&app, name, email, password, use_color).await?;
        }
        Command::VerifyEmail { email, code } => {
            commands::auth::verify_email(&app, &email, &code, use_color).await?;
        }
        Command::ResendVerification { email } => {
            commands::auth::resend_verification(&app, &email, use_color).await?;
        }
        Command::Logout => commands::auth::logout(&app, use_color).await?,
        Command::Whoami => commands::auth::whoami(&app, format)?,
        Command::Refresh => commands::auth::refresh(&app, format, use_color).await?,
        Command::List {
            resource,
            page,
            size,
            filter_on,
            filter_query,
            sort,
            params,
            parent,
        } => {
            let args = commands::list::ListArgs {
                page,
                size,
                filter_on,
                filter_query,
                sort,
                params,
                parent,
            };
            commands::list::run(&app, resource, args, format, use_color).await?;
        }
        Command::Show { resource, id } => {
            commands::show::run(&app, resource, &id, format, use_color).await?;
        }
        Command::Delete { resource, id } => {
            commands::delete::run(&app, resource, &id, use_color).await?;
        }
        Command::Create { resource, json } => {
            let body = commands::form::read_json_arg(&json)?;
            commands::form::create(&app, resource, body, format, use_color).await?;
        }
        Command::Edit { resource, id, set } => {
            commands::form::edit(&app, resource, &id, &set, format, use_color).await?;
        }
        Command::Review { deck, all } => {
            commands::review::run(&app, &deck, all, use_color)?;
        }
        Command::Quiz { quiz, restart } => {
            commands::quiz::run(&app, &quiz, restart, use_color)?;
        }
    }

    Ok(())
}
