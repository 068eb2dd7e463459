use clap::Parser;
use std::path::PathBuf;

/// authloop - login and signup forms over a SQLite user store
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Host address to bind to
    #[arg(long, env = "AL_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "AL_PORT", default_value = "3000")]
    pub port: String,

    /// Data directory for the database
    #[arg(long, env = "AL_DATA_DIR", default_value = "./data")]
    pub data_dir: PathBuf,

    /// Static files directory
    #[arg(long, env = "AL_STATIC_DIR", default_value = "./static")]
    pub static_dir: PathBuf,

    /// Only send the session cookie over HTTPS
    #[arg(long, env = "AL_SECURE_COOKIES", default_value = "false")]
    pub secure_cookies: bool,

    /// Days of inactivity before a session expires
    #[arg(long, env = "AL_SESSION_DAYS", default_value = "30")]
    pub session_days: i64,
}

impl Config {
    /// Get the database URL
    pub fn get_database_url(&self) -> String {
        let db_path = self.data_dir.join("authloop.db");
        format!("sqlite:{}", db_path.display())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
