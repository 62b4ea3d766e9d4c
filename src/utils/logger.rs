use crate::domain::ports::IngestObserver;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init_cli_logger(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("subbud=debug,info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("subbud=info"))
    };

    // 已初始化過時忽略錯誤
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init();
}

/// Logs each settled commit at debug level.
pub struct ProgressLogger;

impl IngestObserver for ProgressLogger {
    fn on_commit(&self, domain: &str, succeeded: bool, settled: usize, total: usize) {
        if succeeded {
            tracing::debug!("committed {}/{}: {}", settled, total, domain);
        } else {
            tracing::debug!("failed {}/{}: {}", settled, total, domain);
        }
    }
}
