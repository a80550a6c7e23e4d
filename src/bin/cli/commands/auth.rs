use anyhow::{bail, Result};

use tutorly_lib::auth::{AuthError, Claims, LoginForm, RegisterForm};
use tutorly_lib::notice::Notice;

use super::prompt;
use crate::app::App;
use crate::render::terminal::print_notice;
use crate::OutputFormat;

/// Print the notice for an auth failure and turn it into an error exit
fn fail(err: AuthError, use_color: bool) -> anyhow::Error {
    print_notice(&Notice::error(err.user_message()), use_color);
    anyhow::Error::new(err)
}

fn print_claims(claims: &Claims, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(claims)?),
        OutputFormat::Plain => {
            println!("{}", claims.display_name());
            if let Some(email) = &claims.email {
                let verified = if claims.email_verified { "" } else { " (unverified)" };
                println!("  Email:   {}{}", email, verified);
            }
            if !claims.roles.is_empty() {
                println!("  Roles:   {}", claims.roles.join(", "));
            }
            if let Some(expires) = claims.expires_at() {
                println!("  Expires: {}", expires.format("%Y-%m-%d %H:%M UTC"));
            }
        }
    }
    Ok(())
}

fn acknowledge(message: Option<String>, fallback: &str, use_color: bool) {
    let message = message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string());
    print_notice(&Notice::success(message), use_color);
}

pub async fn login(
    app: &App,
    email: &str,
    password: Option<String>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => prompt("Password")?,
    };
    let form = LoginForm {
        email: email.to_string(),
        password,
    };

    let claims = app.auth.login(&form).await.map_err(|e| fail(e, use_color))?;
    print_notice(&Notice::success(format!("Signed in as {}", claims.display_name())), use_color);
    if matches!(format, OutputFormat::Json) {
        print_claims(&claims, format)?;
    }
    Ok(())
}

pub async fn register(
    app: &App,
    full_name: String,
    email: String,
    password: Option<String>,
    use_color: bool,
) -> Result<()> {
    let (password, confirm_password) = match password {
        Some(p) => (p.clone(), p),
        None => (prompt("Password")?, prompt("Confirm password")?),
    };
    let form = RegisterForm {
        full_name,
        email,
        password,
        confirm_password,
    };

    let message = app.auth.register(&form).await.map_err(|e| fail(e, use_color))?;
    acknowledge(
        message,
        "Registered. Check your email for a verification code.",
        use_color,
    );
    Ok(())
}

pub async fn verify_email(app: &App, email: &str, code: &str, use_color: bool) -> Result<()> {
    let message = app
        .auth
        .verify_email(email, code)
        .await
        .map_err(|e| fail(e, use_color))?;
    acknowledge(message, "Email verified. You can now sign in.", use_color);
    Ok(())
}

pub async fn resend_verification(app: &App, email: &str, use_color: bool) -> Result<()> {
    let message = app
        .auth
        .resend_verification(email)
        .await
        .map_err(|e| fail(e, use_color))?;
    acknowledge(message, "Verification code sent.", use_color);
    Ok(())
}

pub async fn logout(app: &App, use_color: bool) -> Result<()> {
    app.auth.logout().await.map_err(|e| fail(e, use_color))?;
    print_notice(&Notice::success("Signed out"), use_color);
    Ok(())
}

pub fn whoami(app: &App, format: &OutputFormat) -> Result<()> {
    match app.auth.current_user() {
        Some(claims) => print_claims(&claims, format),
        None => bail!("Not signed in"),
    }
}

pub async fn refresh(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let claims = app.auth.refresh().await.map_err(|e| fail(e, use_color))?;
    print_notice(&Notice::success("Session refreshed"), use_color);
    print_claims(&claims, format)
}
