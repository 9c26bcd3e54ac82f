use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt};

/// Настраивает логи консоли.
///
/// Уровень по умолчанию `warn`: stdout занят результатами команд, которые
/// читают скрипты, а диагностика HTTP-запросов нужна только по `RUST_LOG`
/// или `LOG_LEVEL`. Поэтому логи пишутся в stderr.
pub fn init_logging(default_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact()
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(())
}
