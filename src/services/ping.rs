use crate::common::ApiResult;
use crate::models::{DeviceKey, GroupedPingTimes, NewPing, PingRecord};
use crate::services::device;
use sqlx::{SqliteConnection, SqlitePool};

pub struct PingService {
    pool: SqlitePool,
}

impl PingService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Registers the device if needed and appends the ping, both in one
    /// transaction.
    pub async fn record(&self, ping: &NewPing) -> ApiResult<DeviceKey> {
        let mut tx = self.pool.begin().await?;
        let key = device::ensure(&mut tx, &ping.device_id).await?;
        append(
            &mut tx,
            PingRecord {
                device_id: key,
                time: ping.time,
            },
        )
        .await?;
        tx.commit().await?;
        tracing::debug!(device = %ping.device_id, key = %key, time = ping.time, "ping recorded");
        Ok(key)
    }
}

pub async fn append(conn: &mut SqliteConnection, record: PingRecord) -> sqlx::Result<()> {
    sqlx::query("INSERT INTO ping_times (device_id, time) VALUES (?, ?)")
        .bind(record.device_id)
        .bind(record.time)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Timestamps of `key` in `[from, to)`.
pub async fn range_for(
    conn: &mut SqliteConnection,
    key: DeviceKey,
    from: i64,
    to: i64,
) -> sqlx::Result<Vec<i64>> {
    sqlx::query_scalar::<_, i64>(
        "SELECT time FROM ping_times WHERE device_id = ? AND time >= ? AND time < ? ORDER BY time",
    )
    .bind(key)
    .bind(from)
    .bind(to)
    .fetch_all(&mut *conn)
    .await
}

/// Timestamps in `[from, to)` grouped by device identifier. A ping whose
/// device row is gone is grouped under the empty identifier.
pub async fn range_for_all(
    conn: &mut SqliteConnection,
    from: i64,
    to: i64,
) -> sqlx::Result<GroupedPingTimes> {
    let rows = sqlx::query_as::<_, (Option<String>, i64)>(
        r#"SELECT devices.identifier, ping_times.time
           FROM ping_times
           LEFT JOIN devices ON ping_times.device_id = devices.id
           WHERE ping_times.time >= ? AND ping_times.time < ?
           ORDER BY ping_times.time"#,
    )
    .bind(from)
    .bind(to)
    .fetch_all(&mut *conn)
    .await?;
    let mut grouped = GroupedPingTimes::new();
    for (identifier, time) in rows {
        grouped
            .entry(identifier.unwrap_or_default())
            .or_default()
            .push(time);
    }
    Ok(grouped)
}

pub async fn clear(conn: &mut SqliteConnection) -> sqlx::Result<()> {
    sqlx::query("DELETE FROM ping_times")
        .execute(&mut *conn)
        .await?;
    Ok(())
}
