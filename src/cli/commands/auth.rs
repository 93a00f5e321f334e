use chrono::Utc;
use clap::Subcommand;
use serde_json::json;
use std::io::{self, BufRead, Write};

use crate::cli::utils::{format_timestamp, or_dash, output_record, output_success};
use crate::cli::{CliContext, OutputFormat};
use crate::policy::home_path;
use crate::session::token;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login with email and password")]
    Login {
        #[arg(help = "Email address")]
        email: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Logout and clear the cached session")]
    Logout,

    #[command(about = "Show current authentication status")]
    Status,

    #[command(about = "Show current user profile")]
    Whoami,
}

pub async fn handle(cmd: AuthCommands, ctx: &CliContext) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { email, password } => {
            let password = match password {
                Some(p) => p,
                None => prompt("Password: ")?,
            };

            let identity = ctx.client.login(&email, &password).await?;
            let home = home_path(identity.role());
            output_success(
                &ctx.output,
                &format!("Logged in as {} ({})", identity.name(), identity.role()),
                Some(json!({
                    "user": identity.profile,
                    "session": ctx.session_name(),
                    "redirect_to": home,
                })),
            )
        }
        AuthCommands::Logout => {
            ctx.client.logout()?;
            output_success(
                &ctx.output,
                "Logged out",
                Some(json!({ "session": ctx.session_name() })),
            )
        }
        AuthCommands::Status => status(ctx),
        AuthCommands::Whoami => {
            let identity = ctx.guard("/profile")?;
            let profile = &identity.profile;
            output_record(
                &ctx.output,
                "user",
                profile,
                &[
                    ("User ID", profile.user_id.to_string()),
                    ("Name", profile.name.clone()),
                    ("Email", or_dash(profile.email.as_deref()).to_string()),
                    ("Department", or_dash(profile.department.as_deref()).to_string()),
                    ("Role", profile.role.to_string()),
                ],
            )
        }
    }
}

fn status(ctx: &CliContext) -> anyhow::Result<()> {
    let identity = ctx.store().get()?;
    let last_role = ctx.store().last_login_role()?;
    let expires_at = identity.as_ref().and_then(|i| token::token_expiry(&i.token));
    let expired = identity
        .as_ref()
        .map(|i| token::is_expired(&i.token, Utc::now()))
        .unwrap_or(false);

    match ctx.output {
        OutputFormat::Json => {
            let body = json!({
                "session": ctx.session_name(),
                "authenticated": identity.is_some() && !expired,
                "expired": expired,
                "user": identity.as_ref().map(|i| &i.profile),
                "expires_at": expires_at,
                "last_login_role": last_role.as_ref().map(|r| r.as_str()),
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Text => {
            println!("Session: {}", ctx.session_name());
            match &identity {
                Some(i) if !expired => {
                    println!("Logged in as {} <{}> ({})", i.name(), or_dash(i.profile.email.as_deref()), i.role());
                    println!("Home: {}", home_path(i.role()));
                }
                Some(i) => println!("Token for {} has expired, please log in again", i.name()),
                None => println!("Not logged in"),
            }
            if expires_at.is_some() {
                println!("Token expires: {}", format_timestamp(expires_at));
            }
            if let Some(role) = last_role {
                println!("Last login role on this machine: {}", role);
            }
        }
    }
    Ok(())
}

fn prompt(label: &str) -> anyhow::Result<String> {
    eprint!("{}", label);
    io::stderr().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
