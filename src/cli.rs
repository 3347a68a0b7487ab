//! Command-line interface.
//!
//! Every command prints its result as pretty JSON on stdout. Diagnostics go
//! to stderr and the log.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};

use crate::api::{auth, JiraClient};
use crate::config::{Config, Profile, Settings};
use crate::error::{AppError, Result};

/// Administer JIRA projects, roles, users and groups.
#[derive(Debug, Parser)]
#[command(name = "jiradmin", version, about)]
pub struct Cli {
    /// Profile to use instead of the configured default.
    #[arg(long, global = true)]
    pub profile: Option<String>,

    /// Path of the configuration file.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log to stderr at debug level.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// List projects whose name contains SEARCH (case-insensitive).
    Projects { search: Option<String> },
    /// Show every role of a project with its members.
    Roles { key: String },
    /// Show a user.
    User {
        name: String,
        /// Include the groups the user belongs to.
        #[arg(long)]
        groups: bool,
    },
    /// Look up users by username.
    Users { name: String },
    /// Show a group with its members.
    Group { name: String },
    /// Add a user to a group.
    GroupAdd { group: String, user: String },
    /// Remove a user from a group.
    GroupRemove { group: String, user: String },
    /// Create a user.
    UserAdd {
        name: String,
        email: String,
        display_name: String,
    },
    /// Show the activity stream of a user.
    Activity { user: String },
    /// Read an API token from stdin and store it in the OS keyring.
    Login,
    /// Remove the stored API token.
    Logout,
}

/// How a successful command finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Complete,
    /// Output was printed but part of it could not be resolved.
    Partial,
}

impl Cli {
    /// Load the configuration and pick the profile to use.
    fn load_profile(&self) -> Result<(Profile, Settings)> {
        let config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };

        let profile = match &self.profile {
            Some(name) => config.profile(name)?,
            None => config.default_profile()?,
        };
        Ok((profile.clone(), config.settings))
    }
}

/// Run the parsed command.
pub async fn run(cli: Cli) -> Result<Outcome> {
    let (profile, settings) = cli.load_profile()?;
    info!(profile = %profile.name, command = ?cli.command, "Running command");

    match &cli.command {
        Command::Login => {
            let token = read_token(std::io::stdin().lock())?;
            auth::store_token(&profile.name, &token)?;
            eprintln!("Stored API token for profile '{}'.", profile.name);
            return Ok(Outcome::Complete);
        }
        Command::Logout => {
            auth::delete_token(&profile.name)?;
            eprintln!("Removed API token for profile '{}'.", profile.name);
            return Ok(Outcome::Complete);
        }
        _ => {}
    }

    let jira = JiraClient::from_profile(&profile, &settings)?;

    match cli.command {
        Command::Projects { search } => {
            let projects = jira.search_projects(search.as_deref().unwrap_or("")).await?;
            print_json(&projects)?;
        }
        Command::Roles { key } => {
            let (roles, last_error) = jira.project_roles(&key).await?.into_parts();
            print_json(&roles)?;
            if let Some(e) = last_error {
                warn!("Incomplete role list for {}: {}", key, e);
                eprintln!("warning: some roles could not be loaded: {}", e);
                return Ok(Outcome::Partial);
            }
        }
        Command::User { name, groups } => {
            let user = if groups {
                jira.user_with_groups(&name).await?
            } else {
                jira.user(&name).await?
            };
            print_json(&user)?;
        }
        Command::Users { name } => print_json(&jira.search_users(&name).await?)?,
        Command::Group { name } => print_json(&jira.users_in_group(&name).await?)?,
        Command::GroupAdd { group, user } => {
            jira.add_user_to_group(&group, &user).await?;
            eprintln!("Added '{}' to '{}'.", user, group);
        }
        Command::GroupRemove { group, user } => {
            jira.remove_user_from_group(&group, &user).await?;
            eprintln!("Removed '{}' from '{}'.", user, group);
        }
        Command::UserAdd {
            name,
            email,
            display_name,
        } => {
            jira.add_user(&name, &display_name, &email).await?;
            eprintln!("Created user '{}'.", name);
        }
        Command::Activity { user } => print_json(&jira.user_activity(&user).await?)?,
        Command::Login | Command::Logout => unreachable!("handled above"),
    }

    Ok(Outcome::Complete)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut out = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value).map_err(|e| AppError::other(e.to_string()))?;
    writeln!(out)?;
    Ok(())
}

/// Read the first line of `input` as a token.
fn read_token(mut input: impl BufRead) -> Result<String> {
    let mut line = String::new();
    input.read_line(&mut line)?;

    let token = line.trim();
    if token.is_empty() {
        return Err(AppError::other("No API token given on stdin."));
    }
    Ok(token.to_string())
}
