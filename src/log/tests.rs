// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

#[cfg(test)]
mod log_tests {
    use crate::common::Error;
    use crate::log::RunLog;

    #[test]
    fn run_log_tests() {
        println!("Testing run log");
        let log1 = RunLog::default();
        let bar = 123;
        log1.trace(format!("foo {bar}"));
        log1.trace(format!("bar {bar}"));
        log1.trace(String::new());
        println!("Testing trace:\n{log1}");
        assert_eq!(log1.lines(), vec!["foo 123", "bar 123"]);
        assert!(!log1.contains_warnings());

        let shared = log1.clone();
        shared.warn("this is a warning".to_string());
        assert!(log1.contains_warnings());
        assert_eq!(log1.warning_count(), 1);

        let log2 = RunLog::new(true);
        log2.extend(&log1);
        log2.extend(&log2.clone());
        assert_eq!(log2.lines().len(), 3);
        assert_eq!(log2.warning_count(), 1);
        assert_eq!(log2.to_string(), "foo 123\nbar 123\nthis is a warning");
    }

    #[test]
    fn run_log_results() {
        let log = RunLog::default();
        let ok: Result<u32, Error> = Ok(7);
        assert_eq!(log.call("first".to_string(), ok).ok(), Some(7));
        let err: Result<u32, Error> = Err(Error::String("this is an error".to_string()));
        assert!(log.call("second".to_string(), err).is_err());
        let degraded: Option<u32> = log.degrade(
            "third".to_string(),
            Err(Error::Timeout("lookup".to_string())),
        );
        assert_eq!(degraded, None);
        println!("Testing call/degrade:\n{log}");
        assert_eq!(log.warning_count(), 2);
        assert_eq!(log.lines()[0], "first succeeded");
        assert!(log.lines()[2].contains("lookup: timed out"));
    }

    #[test]
    fn run_log_limit() {
        let log = RunLog::with_limit(false, 3);
        for i in 0..10 {
            log.warn(format!("warning {i}"));
        }
        assert_eq!(log.lines(), vec!["warning 7", "warning 8", "warning 9"]);
        assert_eq!(log.warning_count(), 10);

        let from = RunLog::default();
        from.trace("a".to_string());
        from.trace("b".to_string());
        log.extend(&from);
        assert_eq!(log.to_string(), "warning 9\na\nb");
        assert_eq!(log.warning_count(), 10);

        let long = RunLog::default();
        for i in 0..(RunLog::DEFAULT_LIMIT + 5) {
            long.trace(format!("line {i}"));
        }
        assert_eq!(long.lines().len(), RunLog::DEFAULT_LIMIT);
        assert_eq!(long.lines()[0], "line 5");
    }
}
