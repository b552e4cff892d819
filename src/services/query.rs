use crate::common::ApiResult;
use crate::models::{DeviceTarget, GroupedPingTimes, PingQuery, PingTimes};
use crate::services::{device, ping};
use crate::utils::time_parser::DayWindow;
use sqlx::SqlitePool;

/// Answers range queries. Each call reads inside its own transaction so the
/// registry lookup and the range scan observe the same snapshot.
pub struct QueryService {
    pool: SqlitePool,
}

impl QueryService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn execute(&self, query: PingQuery) -> ApiResult<PingTimes> {
        let result = match query {
            PingQuery::ByDate {
                target: DeviceTarget::All,
                window,
            } => PingTimes::Grouped(self.all_devices_and_range(window.from, window.to).await?),
            PingQuery::ByDate {
                target: DeviceTarget::Device(identifier),
                window,
            } => PingTimes::Device(self.by_date_for_device(&identifier, window).await?),
            PingQuery::ByRange {
                target: DeviceTarget::All,
                from,
                to,
            } => PingTimes::Grouped(self.all_devices_and_range(from, to).await?),
            PingQuery::ByRange {
                target: DeviceTarget::Device(identifier),
                from,
                to,
            } => PingTimes::Device(self.by_device_and_range(&identifier, from, to).await?),
        };
        Ok(result)
    }

    /// An identifier that never pinged yields an empty list.
    pub async fn by_device_and_range(
        &self,
        identifier: &str,
        from: i64,
        to: i64,
    ) -> ApiResult<Vec<i64>> {
        let mut tx = self.pool.begin().await?;
        let times = match device::resolve(&mut tx, identifier).await? {
            Some(key) => ping::range_for(&mut tx, key, from, to).await?,
            None => Vec::new(),
        };
        tx.commit().await?;
        Ok(times)
    }

    pub async fn by_date_for_device(
        &self,
        identifier: &str,
        day: DayWindow,
    ) -> ApiResult<Vec<i64>> {
        self.by_device_and_range(identifier, day.from, day.to).await
    }

    pub async fn all_devices_and_range(&self, from: i64, to: i64) -> ApiResult<GroupedPingTimes> {
        let mut conn = self.pool.acquire().await?;
        Ok(ping::range_for_all(&mut conn, from, to).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewPing;
    use crate::server::memory_pool;
    use crate::services::PingService;
    use crate::utils::time_parser::{SECONDS_PER_DAY, parse_time_endpoint};

    async fn seed(pool: &SqlitePool, pings: &[(&str, i64)]) {
        let service = PingService::new(pool.clone());
        for (device_id, time) in pings {
            service
                .record(&NewPing {
                    device_id: device_id.to_string(),
                    time: *time,
                })
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_unknown_device_is_empty() {
        let pool = memory_pool().await;
        let service = QueryService::new(pool);
        let times = service
            .by_device_and_range("unknown-id", 0, 1_000_000)
            .await
            .unwrap();
        assert!(times.is_empty());
    }

    #[tokio::test]
    async fn test_append_then_query_point() {
        let pool = memory_pool().await;
        let t = 1_600_000_000;
        seed(&pool, &[("dev", t), ("dev", t - 1), ("other", t)]).await;
        let service = QueryService::new(pool);
        assert_eq!(
            service.by_device_and_range("dev", t, t + 1).await.unwrap(),
            vec![t]
        );
        assert!(service
            .by_device_and_range("dev", t - 100, t - 1)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_day_window_excludes_next_midnight() {
        let pool = memory_pool().await;
        let day = DayWindow::parse("2020-02-29").unwrap();
        seed(
            &pool,
            &[
                ("dev", day.from - 1),
                ("dev", day.from),
                ("dev", day.from + 3600),
                ("dev", day.to),
            ],
        )
        .await;
        let service = QueryService::new(pool);
        let by_date = service.by_date_for_device("dev", day).await.unwrap();
        assert_eq!(by_date, vec![day.from, day.from + 3600]);
        let from = parse_time_endpoint("2020-02-29T00:00:00").unwrap();
        let to = parse_time_endpoint("2020-03-01T00:00:00").unwrap();
        assert_eq!(to - from, SECONDS_PER_DAY);
        assert_eq!(
            service.by_device_and_range("dev", from, to).await.unwrap(),
            by_date
        );
    }

    #[tokio::test]
    async fn test_execute_dispatch() {
        let pool = memory_pool().await;
        seed(&pool, &[("A", 10), ("B", 20), ("all", 12)]).await;
        let service = QueryService::new(pool);

        let grouped = service
            .execute(PingQuery::by_range("all", "0", "15").unwrap())
            .await
            .unwrap();
        assert_eq!(
            grouped,
            PingTimes::Grouped(GroupedPingTimes::from([
                ("A".to_string(), vec![10]),
                ("all".to_string(), vec![12]),
            ]))
        );

        let single = service
            .execute(PingQuery::by_range("B", "0", "100").unwrap())
            .await
            .unwrap();
        assert_eq!(single, PingTimes::Device(vec![20]));
    }

    #[tokio::test]
    async fn test_execute_by_date_for_all() {
        let pool = memory_pool().await;
        let day = DayWindow::parse("2021-06-01").unwrap();
        seed(&pool, &[("A", day.from + 5), ("B", day.to)]).await;
        let service = QueryService::new(pool);
        let result = service
            .execute(PingQuery::by_date("all", "2021-06-01").unwrap())
            .await
            .unwrap();
        assert_eq!(
            result,
            PingTimes::Grouped(GroupedPingTimes::from([(
                "A".to_string(),
                vec![day.from + 5]
            )]))
        );
    }
}
