// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

#[cfg(test)]
mod aws_tests {
    use crate::aws::dynamo::key_condition_expression;
    use crate::aws::{to_dynamo_av, to_dynamo_item};
    use crate::cache::{CacheEntry, CacheKey, LanguagePair};
    use crate::dedup::{ProcessOutcome, ProcessedMarker};
    use crate::hash::ContentDigest;
    use crate::metrics::MetricSample;
    use crate::time_id::UnixMillis;
    use aws_sdk_dynamodb::types::AttributeValue;
    use serde::de::IgnoredAny;

    #[test]
    fn key_conditions() {
        let a = AttributeValue::S("a".to_string());
        let b = AttributeValue::S("b".to_string());
        assert_eq!(key_condition_expression(None, None), "#h = :hv");
        assert_eq!(
            key_condition_expression(Some(&a), Some(&a)),
            "#h = :hv AND #r = :lo"
        );
        assert_eq!(key_condition_expression(Some(&a), None), "#h = :hv AND #r >= :lo");
        assert_eq!(key_condition_expression(None, Some(&b)), "#h = :hv AND #r <= :hi");
        assert_eq!(
            key_condition_expression(Some(&a), Some(&b)),
            "#h = :hv AND #r BETWEEN :lo AND :hi"
        );
    }

    #[test]
    fn translation_items() {
        let digest = ContentDigest::of_text("Hello");
        let key = CacheKey::new(digest.clone(), LanguagePair::new("en", "es").unwrap());
        let entry = CacheEntry::new(&key, "Hola".to_string());
        let item = to_dynamo_item(&entry).unwrap();
        println!("{item:?}");
        assert!(matches!(item["translation_id"], AttributeValue::S(_)));
        assert!(matches!(item["created_at"], AttributeValue::N(_)));
        assert_eq!(
            item["content_hash"],
            AttributeValue::S(digest.as_str().to_string())
        );
        assert_eq!(item["language_pair"], AttributeValue::S("en:es".to_string()));
        assert_eq!(item["translated_text"], AttributeValue::S("Hola".to_string()));

        let back: CacheEntry = serde_dynamo::from_item(item.clone()).unwrap();
        assert_eq!(back, entry);
        let _: IgnoredAny = serde_dynamo::from_item(item).unwrap();
        assert_eq!(
            to_dynamo_av(&digest).unwrap(),
            AttributeValue::S(digest.to_string())
        );
    }

    #[test]
    fn marker_items() {
        let digest = ContentDigest::of_bytes(b"image");
        let marker = ProcessedMarker::new(digest.clone(), ProcessOutcome::Skipped).post_id("abc");
        let item = to_dynamo_item(&marker).unwrap();
        assert_eq!(item["language_pair"], AttributeValue::S("#processed".to_string()));
        assert_eq!(item["outcome"], AttributeValue::S("skipped".to_string()));
        assert_eq!(item["post_id"], AttributeValue::S("abc".to_string()));
        assert!(!item.contains_key("source_url"));

        // Markers are never mistaken for translations.
        let as_entry: Result<CacheEntry, _> = serde_dynamo::from_item(item.clone());
        assert!(as_entry.is_err());
        assert_eq!(item["content_hash"], AttributeValue::S(digest.to_string()));
        let _: IgnoredAny = serde_dynamo::from_item(item).unwrap();
    }

    #[test]
    fn metric_items() {
        let sample = MetricSample {
            function_name: "ocr".to_string(),
            operation: "translate_text".to_string(),
            duration_seconds: 0.5,
            success: true,
            timestamp: UnixMillis::from_rfc3339("2024-05-01T12:00:00Z").unwrap(),
        };
        let item = to_dynamo_item(sample.to_stored().unwrap()).unwrap();
        assert_eq!(item["function_name"], AttributeValue::S("ocr".to_string()));
        match &item["timestamp"] {
            AttributeValue::S(key) => {
                let (time, id) = key.split_once('#').unwrap();
                assert_eq!(time, "2024-05-01T12:00:00.000Z");
                assert!(id.parse::<u64>().unwrap() > 0);
            }
            other => panic!("timestamp {other:?}"),
        }
        // Same millisecond, distinct range keys.
        let again = to_dynamo_item(sample.to_stored().unwrap()).unwrap();
        assert_ne!(again["timestamp"], item["timestamp"]);
        match &item["payload"] {
            AttributeValue::S(payload) => assert!(payload.contains("\"duration\":0.5")),
            other => panic!("payload {other:?}"),
        }
    }
}
