use clap::Parser;

/// Host of the hosted todo API.
pub const DEFAULT_BASE_URL: &str = "https://golang-mongodb-production.up.railway.app";

#[derive(Debug, Parser)]
#[command(name = "todolist", version, about = "Terminal client for the todo list API")]
pub struct Config {
    /// Base URL of the todo API.
    #[arg(long, env = "TODO_API_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Start from a route instead of the login view, e.g. `/todos?token=...`.
    #[arg(long)]
    pub route: Option<String>,
}
