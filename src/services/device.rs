//! Device registry: maps caller-supplied identifiers to storage keys.
//!
//! Every function runs on a connection handed in by the caller, so it can be
//! composed into a wider transaction.

use crate::models::DeviceKey;
use sqlx::SqliteConnection;

/// Returns the key of `identifier`, allocating one on first sighting.
///
/// The insert is conditional, so racing callers never create a second row.
pub async fn ensure(conn: &mut SqliteConnection, identifier: &str) -> sqlx::Result<DeviceKey> {
    sqlx::query("INSERT OR IGNORE INTO devices (identifier) VALUES (?)")
        .bind(identifier)
        .execute(&mut *conn)
        .await?;
    sqlx::query_scalar::<_, DeviceKey>("SELECT id FROM devices WHERE identifier = ?")
        .bind(identifier)
        .fetch_one(&mut *conn)
        .await
}

pub async fn resolve(
    conn: &mut SqliteConnection,
    identifier: &str,
) -> sqlx::Result<Option<DeviceKey>> {
    sqlx::query_scalar::<_, DeviceKey>("SELECT id FROM devices WHERE identifier = ?")
        .bind(identifier)
        .fetch_optional(&mut *conn)
        .await
}

/// Every known identifier, in key order.
pub async fn list_all(conn: &mut SqliteConnection) -> sqlx::Result<Vec<String>> {
    sqlx::query_scalar::<_, String>("SELECT identifier FROM devices ORDER BY id")
        .fetch_all(&mut *conn)
        .await
}

/// Removes every device and rewinds key allocation to its initial value.
pub async fn clear(conn: &mut SqliteConnection) -> sqlx::Result<()> {
    sqlx::query("DELETE FROM devices")
        .execute(&mut *conn)
        .await?;
    sqlx::query("UPDATE sqlite_sequence SET seq = 0 WHERE name = 'devices'")
        .execute(&mut *conn)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::memory_pool;

    #[tokio::test]
    async fn test_ensure_is_idempotent() {
        let pool = memory_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        let first = ensure(&mut conn, "X").await.unwrap();
        let second = ensure(&mut conn, "X").await.unwrap();
        assert_eq!(first, second);
        let other = ensure(&mut conn, "Y").await.unwrap();
        assert!(other > first);
        assert_eq!(list_all(&mut conn).await.unwrap(), vec!["X", "Y"]);
    }

    #[tokio::test]
    async fn test_resolve() {
        let pool = memory_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        assert_eq!(resolve(&mut conn, "missing").await.unwrap(), None);
        let key = ensure(&mut conn, "present").await.unwrap();
        assert_eq!(resolve(&mut conn, "present").await.unwrap(), Some(key));
    }

    #[tokio::test]
    async fn test_clear_resets_keys() {
        let pool = memory_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        let initial = ensure(&mut conn, "a").await.unwrap();
        ensure(&mut conn, "b").await.unwrap();
        clear(&mut conn).await.unwrap();
        assert!(list_all(&mut conn).await.unwrap().is_empty());
        assert_eq!(ensure(&mut conn, "c").await.unwrap(), initial);
    }

    #[tokio::test]
    async fn test_clear_on_fresh_registry() {
        let pool = memory_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        clear(&mut conn).await.unwrap();
        assert_eq!(i64::from(ensure(&mut conn, "a").await.unwrap()), 1);
    }
}
