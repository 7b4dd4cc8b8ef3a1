// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

#[cfg(test)]
mod metrics_tests {
    use crate::common::{Error, MetricsSettings};
    use crate::log::RunLog;
    use crate::metrics::{
        decode_stored_metrics, MetricBucket, MetricSample, MetricsAggregator, MetricsQuery,
        PerformanceRecorder, ServiceCatalog, StoredMetric, TimeRange, UNKNOWN_SERVICE,
    };
    use crate::store::{MemoryStore, MetricsStore};
    use crate::time_id::UnixMillis;
    use async_trait::async_trait;
    use std::str::FromStr;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    const MINUTE: i64 = UnixMillis::MILLIS_PER_MINUTE;
    const HOUR: i64 = UnixMillis::MILLIS_PER_HOUR;

    /// Accepts `budget` writes, then fails every write.
    struct WriteBudget {
        inner: MemoryStore,
        budget: AtomicUsize,
    }

    impl WriteBudget {
        fn new(budget: usize) -> Self {
            Self {
                inner: MemoryStore::new(),
                budget: AtomicUsize::new(budget),
            }
        }
    }

    #[async_trait]
    impl MetricsStore for WriteBudget {
        async fn query_metrics(
            &self,
            function_name: Option<&str>,
            since: UnixMillis,
        ) -> Result<Vec<StoredMetric>, Error> {
            self.inner.query_metrics(function_name, since).await
        }

        async fn put_metric(&self, record: &StoredMetric) -> Result<(), Error> {
            self.budget
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |b| b.checked_sub(1))
                .map_err(|_| Error::String("write budget exhausted".to_string()))?;
            self.inner.put_metric(record).await
        }
    }

    fn now() -> UnixMillis {
        UnixMillis::from_rfc3339("2024-05-01T12:02:00.000Z").unwrap()
    }

    fn sample(
        function_name: &str,
        operation: &str,
        duration_seconds: f64,
        success: bool,
        timestamp: UnixMillis,
    ) -> MetricSample {
        MetricSample {
            function_name: function_name.to_string(),
            operation: operation.to_string(),
            duration_seconds,
            success,
            timestamp,
        }
    }

    #[test]
    fn time_ranges() {
        for range in TimeRange::ALL {
            assert_eq!(TimeRange::from_str(range.as_str()).unwrap(), range);
            assert_eq!(range.span_millis() % range.bucket_millis(), 0);
        }
        assert_eq!(TimeRange::default(), TimeRange::OneHour);
        assert_eq!(TimeRange::OneDay.to_string(), "24h");
        assert_eq!(TimeRange::SixHours.bucket_millis(), 30 * MINUTE);
        assert!(TimeRange::from_str("2h").is_err());
        assert!(TimeRange::from_str("").is_err());
        assert_eq!(serde_json::to_string(&TimeRange::SevenDays).unwrap(), "\"7d\"");
    }

    #[test]
    fn services() {
        let catalog = ServiceCatalog::default();
        assert_eq!(catalog.service_for("rekognition_detect_text"), "rekognition");
        assert_eq!(catalog.service_for("Translate_Text"), "translate");
        assert_eq!(catalog.service_for("dynamodb_put_item"), "dynamodb");
        assert_eq!(catalog.service_for("image_processor_resize"), "image_processor");
        assert_eq!(catalog.service_for("s3.get_object"), "s3");
        assert_eq!(catalog.service_for("custom-step"), "custom");
        assert_eq!(catalog.service_for("warmup"), "warmup");
        assert_eq!(catalog.service_for("_hidden"), UNKNOWN_SERVICE);
        assert_eq!(catalog.service_for(""), UNKNOWN_SERVICE);

        let catalog = ServiceCatalog::new(["image".to_string(), "Image_Processor".to_string()]);
        assert_eq!(catalog.service_for("image_processor_resize"), "image_processor");
        assert_eq!(catalog.service_for("image_crop"), "image");
        assert_eq!(catalog.service_for("translate_text"), "translate");

        let catalog =
            ServiceCatalog::new(["translate".to_string(), "translate_batch".to_string()]);
        assert_eq!(catalog.service_for("translate_batch_submit"), "translate_batch");
        assert_eq!(catalog.service_for("translate_text"), "translate");
    }

    #[test]
    fn buckets() {
        let width = 5 * MINUTE;
        let at = |s: &str| UnixMillis::from_rfc3339(s).unwrap();
        let bucket = MetricBucket::containing(at("2024-05-01T12:05:00.000Z"), width);
        assert_eq!(bucket.start(), at("2024-05-01T12:05:00.000Z"));
        assert_eq!(bucket.end(), at("2024-05-01T12:10:00.000Z"));
        assert!(!bucket.contains(at("2024-05-01T12:04:59.999Z")));
        assert!(bucket.contains(at("2024-05-01T12:09:59.999Z")));
        assert!(!bucket.contains(bucket.end()));

        let earlier = MetricBucket::containing(at("2024-05-01T12:04:59.999Z"), width);
        assert_eq!(earlier.start(), at("2024-05-01T12:00:00.000Z"));
        assert_eq!(earlier.avg_duration(), 0.0);
        assert_eq!(earlier.success_rate(), 100.0);
    }

    #[test]
    fn aggregate_totals() {
        let t = now().sub_millis(10 * MINUTE);
        let samples = [
            sample("translate", "translate_text", 0.5, true, t),
            sample("translate", "translate_text", 1.5, false, t),
        ];
        let report = MetricsAggregator::default().ingest_at(&samples, TimeRange::OneHour, now());

        let f = &report.functions["translate"];
        assert_eq!(f.total_calls, 2);
        assert_eq!(f.total_duration, 2.0);
        assert_eq!(f.total_failures, 1);
        assert_eq!(f.avg_response_time, 1.0);
        assert_eq!(f.success_rate, 50.0);
        assert_eq!(report.services["translate"].total_calls, 2);

        assert_eq!(report.summary.total_calls, 2);
        assert_eq!(report.summary.function_count, 1);
        assert_eq!(report.summary.service_count, 1);
        assert_eq!(report.window_start, "2024-05-01T11:02:00.000Z");
        assert_eq!(report.window_end, "2024-05-01T12:02:00.000Z");

        // Both samples land in the 11:50 bucket.
        let point = f
            .time_series
            .iter()
            .find(|p| p.calls > 0)
            .expect("non-empty point");
        assert_eq!(point.timestamp, "2024-05-01T11:50:00.000Z");
        assert_eq!(point.label, "11:50");
        assert_eq!(point.calls, 2);
        assert_eq!(point.failures, 1);
        assert_eq!(point.success_rate, 50.0);
        assert_eq!(f.time_series.iter().map(|p| p.calls).sum::<u64>(), 2);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["timeRange"], "1h");
        assert_eq!(json["summary"]["totalCalls"], 2);
        assert_eq!(json["functions"]["translate"]["timeSeries"][0]["successRate"], 100.0);
    }

    #[test]
    fn aggregate_empty() {
        let report = MetricsAggregator::default().ingest_at(&[], TimeRange::OneHour, now());
        assert!(report.functions.is_empty());
        assert!(report.services.is_empty());
        assert_eq!(report.summary.total_calls, 0);
        assert_eq!(report.summary.avg_response_time, 0.0);
        assert_eq!(report.summary.success_rate, 100.0);
    }

    #[test]
    fn aggregate_window_edges() {
        let span = TimeRange::OneHour.span_millis();
        let samples = [
            sample("f", "translate_text", 1.0, true, now().sub_millis(span + 1)),
            sample("f", "translate_text", 2.0, true, now().sub_millis(span)),
            sample("f", "translate_text", 4.0, true, now().sub_millis(span - 1)),
            sample("f", "translate_text", 8.0, true, now().sub_millis(1)),
            sample("f", "translate_text", 16.0, true, now()),
        ];
        let report = MetricsAggregator::default().ingest_at(&samples, TimeRange::OneHour, now());
        assert_eq!(report.window_start, "2024-05-01T11:02:00.000Z");
        assert_eq!(report.window_end, "2024-05-01T12:02:00.000Z");
        // Exactly `now - span` is out, one millisecond later is in.
        let f = &report.functions["f"];
        assert_eq!(f.total_calls, 2);
        assert_eq!(f.total_duration, 12.0);
        let first = &f.time_series[0];
        assert_eq!(first.timestamp, "2024-05-01T11:00:00.000Z");
        assert_eq!(first.calls, 1);
        let last = f.time_series.last().unwrap();
        assert_eq!(last.timestamp, "2024-05-01T12:00:00.000Z");
        assert_eq!(last.calls, 1);

        // An aligned `now` has no bucket of its own.
        let aligned = UnixMillis::from_rfc3339("2024-05-01T12:00:00.000Z").unwrap();
        let report = MetricsAggregator::default().ingest_at(&[], TimeRange::OneHour, aligned);
        assert_eq!(report.summary.total_calls, 0);
        let report = MetricsAggregator::default().ingest_at(
            &[sample("f", "s3_get", 0.1, true, aligned.sub_millis(1))],
            TimeRange::OneHour,
            aligned,
        );
        let series = &report.functions["f"].time_series;
        assert_eq!(series.len(), 12);
        assert_eq!(series[0].label, "11:00");
        assert_eq!(series[11].label, "11:55");
        assert_eq!(series[11].calls, 1);
    }

    #[test]
    fn aggregate_points_per_range() {
        let expected = [
            (TimeRange::OneHour, 13, "11:00"),
            (TimeRange::SixHours, 13, "06:00"),
            (TimeRange::OneDay, 13, "12:00"),
            (TimeRange::SevenDays, 8, "04-24"),
        ];
        for (range, points, first_label) in expected {
            let samples = [sample("f", "s3_get", 0.1, true, now().sub_millis(1))];
            let report = MetricsAggregator::default().ingest_at(&samples, range, now());
            let series = &report.functions["f"].time_series;
            assert_eq!(series.len(), points, "{range}");
            assert_eq!(series[0].label, first_label, "{range}");
            assert_eq!(report.services["s3"].time_series.len(), points);
            for pair in series.windows(2) {
                let a = UnixMillis::from_rfc3339(&pair[0].timestamp).unwrap();
                let b = UnixMillis::from_rfc3339(&pair[1].timestamp).unwrap();
                assert_eq!(b.0 - a.0, range.bucket_millis());
            }
        }
    }

    #[test]
    fn aggregate_per_service() {
        let t = now().sub_millis(MINUTE);
        let samples = [
            sample("ocr", "rekognition_detect_text", 2.0, true, t),
            sample("ocr", "translate_text", 0.5, true, t),
            sample("poller", "reddit_fetch", 1.0, false, t),
            sample("poller", "translate_text", 0.5, true, t),
        ];
        let report = MetricsAggregator::default().ingest_at(&samples, TimeRange::SixHours, now());
        assert_eq!(report.functions.len(), 2);
        assert_eq!(
            report.services.keys().collect::<Vec<_>>(),
            vec!["reddit", "rekognition", "translate"]
        );
        assert_eq!(report.services["translate"].total_calls, 2);
        assert_eq!(report.services["reddit"].success_rate, 0.0);
        assert_eq!(report.functions["poller"].success_rate, 50.0);
        assert_eq!(report.summary.total_failures, 1);
        assert_eq!(report.summary.success_rate, 75.0);
    }

    #[test]
    fn stored_records() {
        let log = RunLog::default();
        let good = sample("ocr", "translate_text", 0.25, true, now())
            .to_stored()
            .unwrap();
        assert!(good.timestamp.starts_with("2024-05-01T12:02:00.000Z#"));
        let records = vec![
            good.clone(),
            StoredMetric {
                payload: "not json".to_string(),
                ..good.clone()
            },
            StoredMetric {
                timestamp: "never#1".to_string(),
                ..good.clone()
            },
            StoredMetric {
                payload: r#"{"operation":"x","duration":-1.0,"success":true}"#.to_string(),
                ..good.clone()
            },
        ];
        let (samples, skipped) = decode_stored_metrics(&records, &log);
        assert_eq!(samples, vec![MetricSample::from_stored(&good).unwrap()]);
        assert_eq!(skipped, 3);
        assert_eq!(log.warning_count(), 3);
    }

    #[tokio::test]
    async fn recorder_totals() {
        let recorder = PerformanceRecorder::new("ocr", RunLog::default());
        assert_eq!(recorder.function_name(), "ocr");
        recorder.record("translate_text", 0.5, true);
        recorder.record("translate_text", 1.5, false);
        recorder.record("s3_get", f64::NAN, true);

        let ok = recorder
            .time("reddit_fetch", async { Ok::<_, Error>(3) })
            .await;
        assert_eq!(ok.unwrap(), 3);
        let err = recorder
            .time("reddit_fetch", async {
                Err::<u32, _>(Error::String("rate limited".to_string()))
            })
            .await;
        assert!(err.is_err());

        let current = recorder.current();
        let translate = &current["translate_text"];
        assert_eq!(translate.total_calls, 2);
        assert_eq!(translate.avg_duration, 1.0);
        assert_eq!(translate.success_rate, 50.0);
        assert_eq!(current["s3_get"].total_duration, 0.0);
        assert_eq!(current["reddit_fetch"].failures, 1);
        assert_eq!(recorder.pending(), 5);
    }

    #[tokio::test]
    async fn recorder_flush_retries() {
        let store = MemoryStore::new();
        let log = RunLog::default();
        let recorder = PerformanceRecorder::new("ocr", log.clone());
        let limit = Duration::from_secs(1);
        assert_eq!(recorder.flush(&store, limit).await.unwrap(), 0);

        recorder.record("translate_text", 0.5, true);
        store.set_available(false);
        assert!(recorder.flush(&store, limit).await.is_err());
        assert_eq!(recorder.pending(), 1);
        assert!(log.contains_warnings());

        recorder.record("translate_text", 0.5, true);
        store.set_available(true);
        assert_eq!(recorder.flush(&store, limit).await.unwrap(), 2);
        assert_eq!(recorder.pending(), 0);
    }

    #[tokio::test]
    async fn recorder_flush_partial_failure() {
        let store = WriteBudget::new(2);
        let log = RunLog::default();
        let recorder = PerformanceRecorder::new("ocr", log.clone());
        let limit = Duration::from_secs(1);
        for seconds in [1.0, 2.0, 3.0] {
            recorder.record_at("translate_text", seconds, true, now().sub_millis(MINUTE));
        }
        assert!(recorder.flush(&store, limit).await.is_err());
        assert_eq!(store.inner.metric_count(), 2);
        assert_eq!(recorder.pending(), 1);
        assert_eq!(log.warning_count(), 1);

        // Only the unwritten sample goes out again.
        store.budget.store(10, Ordering::SeqCst);
        assert_eq!(recorder.flush(&store, limit).await.unwrap(), 1);
        assert_eq!(store.inner.metric_count(), 3);
        let records = store
            .query_metrics(Some("ocr"), now().sub_millis(HOUR))
            .await
            .unwrap();
        let (samples, _) = decode_stored_metrics(&records, &log);
        let mut durations = samples.iter().map(|s| s.duration_seconds).collect::<Vec<_>>();
        durations.sort_by(f64::total_cmp);
        assert_eq!(durations, vec![1.0, 2.0, 3.0]);
    }

    #[tokio::test]
    async fn same_millisecond_samples() {
        let store = Arc::new(MemoryStore::new());
        let recorder = PerformanceRecorder::new("ocr", RunLog::default());
        let t = now().sub_millis(MINUTE);
        recorder.record_at("translate_text", 0.5, true, t);
        recorder.record_at("translate_text", 0.5, false, t);
        assert_eq!(
            recorder
                .flush(store.as_ref(), Duration::from_secs(1))
                .await
                .unwrap(),
            2
        );
        assert_eq!(store.metric_count(), 2);

        let query = MetricsQuery::new(store, &MetricsSettings::default(), RunLog::default());
        let report = query.report_at(TimeRange::OneHour, None, now()).await.unwrap();
        assert_eq!(report.summary.total_calls, 2);
        assert_eq!(report.summary.total_failures, 1);
    }

    #[tokio::test]
    async fn query_window_start_is_exclusive() {
        let store = Arc::new(MemoryStore::new());
        let recorder = PerformanceRecorder::new("ocr", RunLog::default());
        let span = TimeRange::OneHour.span_millis();
        recorder.record_at("translate_text", 1.0, true, now().sub_millis(span));
        recorder.record_at("translate_text", 2.0, true, now().sub_millis(span - 1));
        recorder
            .flush(store.as_ref(), Duration::from_secs(1))
            .await
            .unwrap();

        let since = now().sub_millis(span);
        assert_eq!(store.query_metrics(None, since).await.unwrap().len(), 1);
        assert_eq!(store.query_metrics(Some("ocr"), since).await.unwrap().len(), 1);

        let query = MetricsQuery::new(store, &MetricsSettings::default(), RunLog::default());
        let report = query.report_at(TimeRange::OneHour, None, now()).await.unwrap();
        assert_eq!(report.summary.total_calls, 1);
        assert_eq!(report.summary.total_duration, 2.0);
    }

    #[tokio::test]
    async fn repeated_queries_keep_log_bounded() {
        let store = Arc::new(MemoryStore::new());
        store.insert_metric(StoredMetric {
            function_name: "ocr".to_string(),
            timestamp: now().sub_millis(MINUTE).to_rfc3339(),
            payload: "{".to_string(),
        });
        let log = RunLog::with_limit(false, 16);
        let query = MetricsQuery::new(store, &MetricsSettings::default(), log.clone());
        for _ in 0..200 {
            query.report_at(TimeRange::OneHour, None, now()).await.unwrap();
        }
        assert!(log.lines().len() <= 16);
        assert_eq!(log.warning_count(), 200);
    }

    #[tokio::test]
    async fn query_reports() {
        let store = Arc::new(MemoryStore::new());
        let recorder = PerformanceRecorder::new("ocr", RunLog::default());
        recorder.record_at("translate_text", 0.5, true, now().sub_millis(10 * MINUTE));
        recorder.record_at("translate_text", 1.5, false, now().sub_millis(20 * MINUTE));
        recorder.record_at("translate_text", 9.0, true, now().sub_millis(2 * HOUR));
        recorder
            .flush(store.as_ref(), Duration::from_secs(1))
            .await
            .unwrap();
        let other = PerformanceRecorder::new("poller", RunLog::default());
        other.record_at("reddit_fetch", 1.0, true, now().sub_millis(MINUTE));
        other
            .flush(store.as_ref(), Duration::from_secs(1))
            .await
            .unwrap();
        store.insert_metric(StoredMetric {
            function_name: "ocr".to_string(),
            timestamp: now().sub_millis(MINUTE).to_rfc3339(),
            payload: "{".to_string(),
        });

        let log = RunLog::default();
        let query = MetricsQuery::new(store.clone(), &MetricsSettings::default(), log.clone());

        let report = query.report_at(TimeRange::OneHour, None, now()).await.unwrap();
        assert_eq!(report.summary.total_calls, 3);
        assert_eq!(report.summary.function_count, 2);
        assert_eq!(report.summary.skipped_records, 1);

        let report = query
            .report_at(TimeRange::OneHour, Some("ocr"), now())
            .await
            .unwrap();
        assert_eq!(report.functions.len(), 1);
        assert_eq!(report.functions["ocr"].total_duration, 2.0);

        let report = query
            .report_at(TimeRange::SixHours, Some("ocr"), now())
            .await
            .unwrap();
        assert_eq!(report.functions["ocr"].total_calls, 3);

        let report = query
            .report_at(TimeRange::OneHour, Some("missing"), now())
            .await
            .unwrap();
        assert!(report.functions.is_empty());
        assert_eq!(report.summary.success_rate, 100.0);
    }

    #[tokio::test]
    async fn query_fails_closed() {
        let store = Arc::new(MemoryStore::new());
        let log = RunLog::default();
        let query = MetricsQuery::new(store.clone(), &MetricsSettings::default(), log.clone());
        store.set_available(false);
        assert!(query.report(TimeRange::OneDay, None).await.is_err());
        assert!(log.contains_warnings());

        store.set_available(true);
        let settings = MetricsSettings {
            timeout_ms: 10,
            ..Default::default()
        };
        let query = MetricsQuery::new(store.clone(), &settings, log);
        store.set_latency(Duration::from_millis(300));
        assert!(matches!(
            query.report(TimeRange::OneHour, None).await,
            Err(Error::Timeout(_))
        ));
    }
}
