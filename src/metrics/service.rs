// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

/// Service prefixes recognized when none are configured.
pub const DEFAULT_KNOWN_SERVICES: &[&str] = &[
    "rekognition",
    "comprehend",
    "translate",
    "dynamodb",
    "s3",
    "reddit",
    "cognito",
    "lambda",
    "image_processor",
];

/// Characters that separate a service name from the rest of an operation name.
const SEPARATORS: &[char] = &['_', '.', ':', '-', '/'];

/// Service name used when an operation name yields nothing better.
pub const UNKNOWN_SERVICE: &str = "unknown";

/// Maps operation names to the service they call.
#[derive(Clone, Debug)]
pub struct ServiceCatalog {
    known: Vec<String>,
}

impl Default for ServiceCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_KNOWN_SERVICES.iter().map(|s| s.to_string()))
    }
}

impl ServiceCatalog {
    /// Catalog of the given prefixes.  Matching ignores ASCII case.
    pub fn new(known: impl IntoIterator<Item = String>) -> Self {
        let mut known: Vec<String> = known
            .into_iter()
            .map(|s| s.trim().to_ascii_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        // Longest first, so the first match is the longest match.
        known.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        known.dedup();
        Self { known }
    }

    /// The longest known prefix of `operation`; else the part before the first
    /// separator; else `UNKNOWN_SERVICE`.
    pub fn service_for(&self, operation: &str) -> String {
        let lowered = operation.trim().to_ascii_lowercase();
        if let Some(known) = self.known.iter().find(|k| lowered.starts_with(k.as_str())) {
            return known.clone();
        }
        match lowered.split(SEPARATORS).next() {
            Some(head) if !head.is_empty() => head.to_string(),
            _ => UNKNOWN_SERVICE.to_string(),
        }
    }
}
