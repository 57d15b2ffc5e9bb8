//! Auth CLI commands
//!
//! Sign up, sign in and out. The session is persisted by the context, so a
//! later invocation picks it up.

use clap::Subcommand;

use crate::config::Settings;
use crate::display::format_account;
use crate::error::{FinwiseError, FinwiseResult};
use crate::session::AppContext;

/// Auth subcommands
#[derive(Subcommand)]
pub enum AuthCommands {
    /// Create an account
    Signup {
        /// Email address
        email: String,
        /// Display name stored on the profile
        #[arg(short, long)]
        username: String,
        /// Password (prompted if omitted)
        #[arg(short, long, env = "FINWISE_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Sign in with email and password
    #[command(alias = "login")]
    Signin {
        /// Email address
        email: String,
        /// Password (prompted if omitted)
        #[arg(short, long, env = "FINWISE_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Sign out and forget the stored session
    #[command(alias = "logout")]
    Signout,
    /// Show the signed-in account
    Whoami,
}

/// Handle an auth command
pub fn handle_auth_command(
    ctx: &AppContext,
    settings: &Settings,
    cmd: AuthCommands,
) -> FinwiseResult<()> {
    match cmd {
        AuthCommands::Signup {
            email,
            username,
            password,
        } => {
            if username.trim().is_empty() {
                return Err(FinwiseError::Validation("Username cannot be empty".into()));
            }
            let password = password_or_prompt(password)?;

            match ctx.sign_up(&email, &password, username.trim())? {
                Some(session) => {
                    println!("Account created. Signed in as {}.", session.user.display_name());
                }
                None => {
                    println!("Account created for {}.", email);
                    println!("Confirm your email, then run 'finwise auth signin {}'.", email);
                }
            }
        }

        AuthCommands::Signin { email, password } => {
            let password = password_or_prompt(password)?;
            let session = ctx.sign_in(&email, &password)?;
            println!("Signed in as {}.", session.user.display_name());
        }

        AuthCommands::Signout => {
            if !ctx.is_signed_in() {
                println!("Not signed in.");
                return Ok(());
            }
            ctx.sign_out()?;
            println!("Signed out.");
        }

        AuthCommands::Whoami => {
            let user = ctx.require_user()?;
            let profile = match ctx.backend().fetch_profile(user.id) {
                Ok(profile) => Some(profile),
                Err(err) => {
                    tracing::warn!(error = %err, "profile unavailable");
                    None
                }
            };
            print!("{}", format_account(&user, profile.as_ref(), settings));
        }
    }

    Ok(())
}

fn password_or_prompt(password: Option<String>) -> FinwiseResult<String> {
    let password = match password {
        Some(password) => password,
        None => rpassword::prompt_password("Password: ")
            .map_err(|e| FinwiseError::Io(format!("Failed to read password: {}", e)))?,
    };

    if password.is_empty() {
        return Err(FinwiseError::Validation("Password cannot be empty".into()));
    }
    Ok(password)
}
