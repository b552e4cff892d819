use crate::common::ApiResult;
use crate::services::{device, ping};
use sqlx::SqlitePool;

pub struct AdminService {
    pool: SqlitePool,
    vacuum_on_clear: bool,
}

impl AdminService {
    pub fn new(pool: SqlitePool, vacuum_on_clear: bool) -> Self {
        Self {
            pool,
            vacuum_on_clear,
        }
    }

    /// Drops every ping and device in one transaction, then reclaims the
    /// freed pages.
    pub async fn clear_all(&self) -> ApiResult<()> {
        let mut tx = self.pool.begin().await?;
        ping::clear(&mut tx).await?;
        device::clear(&mut tx).await?;
        tx.commit().await?;
        tracing::info!("all devices and pings cleared");

        if self.vacuum_on_clear {
            // VACUUM cannot run inside a transaction; the clear above is already durable.
            if let Err(err) = sqlx::query("VACUUM").execute(&self.pool).await {
                tracing::warn!(reason = ?err, "failed to vacuum database after clear");
            }
        }
        Ok(())
    }

    pub async fn list_devices(&self) -> ApiResult<Vec<String>> {
        let mut conn = self.pool.acquire().await?;
        Ok(device::list_all(&mut conn).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageConfig;
    use crate::models::{DeviceKey, NewPing, PingQuery, PingTimes};
    use crate::server::{connect_database, memory_pool};
    use crate::services::{PingService, QueryService};
    use std::collections::{HashMap, HashSet};

    #[tokio::test]
    async fn test_clear_then_query() {
        let pool = memory_pool().await;
        let pings = PingService::new(pool.clone());
        let queries = QueryService::new(pool.clone());
        let admin = AdminService::new(pool.clone(), true);

        let first_key = pings
            .record(&NewPing {
                device_id: "A".to_string(),
                time: 10,
            })
            .await
            .unwrap();
        pings
            .record(&NewPing {
                device_id: "B".to_string(),
                time: 20,
            })
            .await
            .unwrap();
        assert_eq!(admin.list_devices().await.unwrap(), vec!["A", "B"]);

        admin.clear_all().await.unwrap();
        assert!(admin.list_devices().await.unwrap().is_empty());
        assert!(queries.by_device_and_range("A", 0, 100).await.unwrap().is_empty());
        assert!(queries.all_devices_and_range(0, 100).await.unwrap().is_empty());

        let key = pings
            .record(&NewPing {
                device_id: "C".to_string(),
                time: 30,
            })
            .await
            .unwrap();
        assert_eq!(key, first_key);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_registration() {
        let dir = std::env::temp_dir().join(format!("pingd-{}", uuid::Uuid::new_v4()));
        let config = StorageConfig {
            path: dir.join("pings.db").to_string_lossy().into_owned(),
            ..StorageConfig::default()
        };
        let pool = connect_database(&config).await.unwrap();
        let identifiers = ["X", "Y", "Z"];
        let mut set = tokio::task::JoinSet::new();
        for time in 0..60 {
            for identifier in identifiers {
                let service = PingService::new(pool.clone());
                set.spawn(async move {
                    service
                        .record(&NewPing {
                            device_id: identifier.to_string(),
                            time,
                        })
                        .await
                        .map(|key| (identifier, key))
                        .map_err(|err| err.to_string())
                });
            }
        }
        let mut keys: HashMap<&str, HashSet<DeviceKey>> = HashMap::new();
        while let Some(res) = set.join_next().await {
            let (identifier, key) = res.unwrap().unwrap();
            keys.entry(identifier).or_default().insert(key);
        }
        assert_eq!(keys.len(), identifiers.len());
        assert!(keys.values().all(|it| it.len() == 1));

        let admin = AdminService::new(pool.clone(), false);
        let mut devices = admin.list_devices().await.unwrap();
        devices.sort();
        assert_eq!(devices, identifiers);

        let query = QueryService::new(pool.clone());
        let times = query
            .execute(PingQuery::by_range("Y", "0", "60").unwrap())
            .await
            .unwrap();
        assert_eq!(times, PingTimes::Device((0..60).collect()));

        pool.close().await;
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
