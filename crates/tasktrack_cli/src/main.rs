//! Service entry point.
//!
//! # Responsibility
//! - Resolve configuration from flags and `TASKTRACK_*` environment variables.
//! - Initialize logging, open the database and serve the HTTP router.

use anyhow::Context;
use clap::Parser;
use log::info;
use std::net::SocketAddr;
use std::path::PathBuf;
use tasktrack_api::{router, AppState};
use tasktrack_core::config::{parse_listen_addr, ServiceConfig};
use tasktrack_core::{core_version, init_logging, open_db, SessionService};

#[derive(Debug, Parser)]
#[command(name = "tasktrack", version, about = "Employee task tracking service")]
struct Cli {
    /// SQLite database file.
    #[arg(long)]
    db_path: Option<PathBuf>,
    /// Listen address, e.g. 127.0.0.1:8000.
    #[arg(long, value_parser = parse_addr)]
    listen: Option<SocketAddr>,
    /// Session token lifetime in hours.
    #[arg(long)]
    token_ttl_hours: Option<u32>,
    #[arg(long)]
    log_level: Option<String>,
    /// Directory for rolling log files; stderr when absent.
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

impl Cli {
    fn apply(self, config: &mut ServiceConfig) {
        if let Some(db_path) = self.db_path {
            config.db_path = db_path;
        }
        if let Some(listen) = self.listen {
            config.listen_addr = listen;
        }
        if let Some(hours) = self.token_ttl_hours {
            config.token_ttl_hours = hours;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        if let Some(dir) = self.log_dir {
            config.log_dir = Some(dir);
        }
    }
}

fn parse_addr(value: &str) -> Result<SocketAddr, String> {
    parse_listen_addr(value).map_err(|err| err.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = ServiceConfig::from_env().context("invalid environment configuration")?;
    cli.apply(&mut config);
    config.validate().context("invalid configuration")?;

    init_logging(&config.log_level, config.log_dir.as_deref())
        .map_err(anyhow::Error::msg)
        .context("failed to initialize logging")?;

    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open database {}", config.db_path.display()))?;
    let sessions = SessionService::new(&config.token_secret, config.token_ttl_hours);
    let app = router(AppState::new(conn, sessions));

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    info!(
        "event=server_start module=cli status=ok version={} addr={} db={}",
        core_version(),
        config.listen_addr,
        config.db_path.display()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("event=server_stop module=cli status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::warn!("event=shutdown_signal module=cli status=error error={err}");
    }
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::Parser;
    use std::path::PathBuf;
    use tasktrack_core::config::ServiceConfig;

    fn base_config() -> ServiceConfig {
        ServiceConfig::from_lookup(|key| {
            (key == tasktrack_core::config::ENV_TOKEN_SECRET).then(|| "secret".to_string())
        })
        .unwrap()
    }

    #[test]
    fn flags_override_environment_values() {
        let mut config = base_config();
        let cli = Cli::try_parse_from([
            "tasktrack",
            "--db-path",
            "/tmp/tt.sqlite3",
            "--listen",
            "0.0.0.0:9100",
            "--token-ttl-hours",
            "2",
        ])
        .unwrap();
        cli.apply(&mut config);
        assert_eq!(config.db_path, PathBuf::from("/tmp/tt.sqlite3"));
        assert_eq!(config.listen_addr.port(), 9100);
        assert_eq!(config.token_ttl_hours, 2);
    }

    #[test]
    fn absent_flags_keep_environment_values() {
        let mut config = base_config();
        let before = config.clone();
        Cli::try_parse_from(["tasktrack"]).unwrap().apply(&mut config);
        assert_eq!(config, before);
    }

    #[test]
    fn bad_listen_flag_is_rejected() {
        assert!(Cli::try_parse_from(["tasktrack", "--listen", "nope"]).is_err());
    }
}
