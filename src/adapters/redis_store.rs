use crate::domain::model::visible_project_keys;
use crate::domain::ports::{DomainStore, StoreSettings};
use crate::utils::error::{Result, SubbudError};
use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

const SCAN_BATCH: usize = 500;

/// Store adapter over a Redis server: one Redis set per project.
///
/// The multiplexed connection is cheap to clone and safe to drive from
/// many tasks at once, so every call works on its own clone.
#[derive(Clone)]
pub struct RedisStore {
    conn: MultiplexedConnection,
    reserved_prefix: String,
}

impl RedisStore {
    /// Connect and `PING` within the configured timeout. Connection, auth
    /// and timeout failures are reported as `StoreUnavailable`.
    pub async fn connect<C: StoreSettings + ?Sized>(settings: &C) -> Result<Self> {
        let url = connection_url(settings)?;
        let client = redis::Client::open(url.as_str()).map_err(|e| SubbudError::ConfigError {
            message: format!("invalid Redis connection parameters: {}", e),
        })?;

        let timeout = Duration::from_secs(settings.connect_timeout_secs());
        tracing::debug!(
            "Connecting to Redis at {}:{} (db {}, tls: {})",
            settings.host(),
            settings.port(),
            settings.db(),
            settings.tls()
        );

        let mut conn =
            match tokio::time::timeout(timeout, client.get_multiplexed_async_connection()).await {
                Ok(conn) => conn.map_err(unavailable)?,
                Err(_) => {
                    return Err(SubbudError::StoreUnavailable {
                        message: format!(
                            "timed out after {}s connecting to {}:{}",
                            settings.connect_timeout_secs(),
                            settings.host(),
                            settings.port()
                        ),
                    })
                }
            };

        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(unavailable)?;
        tracing::debug!("Redis answered {}", pong);

        Ok(Self {
            conn,
            reserved_prefix: settings.reserved_prefix().to_string(),
        })
    }
}

fn unavailable(err: redis::RedisError) -> SubbudError {
    SubbudError::StoreUnavailable {
        message: err.to_string(),
    }
}

/// `redis://` or `rediss://` URL with credentials percent-encoded.
pub fn connection_url<C: StoreSettings + ?Sized>(settings: &C) -> Result<Url> {
    let scheme = if settings.tls() { "rediss" } else { "redis" };
    let raw = format!(
        "{}://{}:{}/{}",
        scheme,
        settings.host(),
        settings.port(),
        settings.db()
    );

    let mut url = Url::parse(&raw).map_err(|e| SubbudError::InvalidConfigValueError {
        field: "store.host".to_string(),
        value: settings.host().to_string(),
        reason: e.to_string(),
    })?;

    if let Some(username) = settings.username() {
        url.set_username(username)
            .map_err(|_| SubbudError::InvalidConfigValueError {
                field: "store.username".to_string(),
                value: username.to_string(),
                reason: "cannot be encoded in a connection URL".to_string(),
            })?;
    }

    if let Some(password) = settings.password() {
        url.set_password(Some(password))
            .map_err(|_| SubbudError::ConfigError {
                message: "store.password cannot be encoded in a connection URL".to_string(),
            })?;
    }

    Ok(url)
}

#[async_trait]
impl DomainStore for RedisStore {
    async fn members_of(&self, project: &str) -> Result<HashSet<String>> {
        let mut conn = self.conn.clone();
        let members: HashSet<String> = conn.smembers(project).await?;
        Ok(members)
    }

    async fn add_all(&self, project: &str, domains: &[String]) -> Result<()> {
        if domains.is_empty() {
            return Ok(());
        }

        // 單一 SADD 指令，每個元素的插入由 Redis 原子處理
        let mut cmd = redis::cmd("SADD");
        cmd.arg(project);
        for domain in domains {
            cmd.arg(domain);
        }

        let mut conn = self.conn.clone();
        let _inserted: i64 = cmd.query_async(&mut conn).await?;
        Ok(())
    }

    async fn list_project_keys(&self) -> Result<Vec<String>> {
        let mut conn = self.conn.clone();
        let mut keys = Vec::new();
        let mut cursor: u64 = 0;

        // SCAN 而非 KEYS，避免大型資料庫上阻塞伺服器
        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await?;
            keys.extend(batch);

            if next == 0 {
                break;
            }
            cursor = next;
        }

        Ok(visible_project_keys(keys, &self.reserved_prefix))
    }

    async fn delete_project(&self, project: &str) -> Result<bool> {
        let mut conn = self.conn.clone();
        let removed: i64 = conn.del(project).await?;
        Ok(removed > 0)
    }
}
