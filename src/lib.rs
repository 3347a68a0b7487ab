//! jiradmin - JIRA project, role, user and group administration.
//!
//! The [`api`] module is the client library: it builds request URLs, sends
//! them through a [`api::Transport`] and decodes JSON or Atom responses into
//! typed resources. [`config`], [`logging`] and [`cli`] wrap it into the
//! `jiradmin` command-line tool.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;

pub use api::{ApiConfig, ApiError, JiraClient, Partial};
pub use error::AppError;
