//! history.rs: In-memory log of scored products with a rolling summary.
//!
//! Capacity-bounded (oldest entries dropped first). Product names are never
//! stored; records carry a short anonymized id instead.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Mutex, PoisonError};

use crate::grade::Grade;
use crate::result::HealthScoreResult;

const MAX_CAPACITY: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanRecord {
    pub ts: DateTime<Utc>,
    /// Hash prefix of the product name, or "anonymous".
    pub product_id: String,
    pub score: u8,
    pub grade: Option<Grade>,
    pub is_official: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistorySummary {
    pub window_secs: i64,
    pub count: usize,
    pub average_score: Option<f32>,
    /// Count per grade letter; ungraded records are listed under "none".
    pub grades: BTreeMap<String, usize>,
}

#[derive(Debug)]
pub struct ScanHistory {
    inner: Mutex<VecDeque<ScanRecord>>,
    cap: usize,
}

impl ScanHistory {
    pub fn with_capacity(cap: usize) -> Self {
        let cap = cap.clamp(1, MAX_CAPACITY);
        Self {
            inner: Mutex::new(VecDeque::with_capacity(cap)),
            cap,
        }
    }

    /// Record a result at the current time.
    pub fn record(&self, product: Option<&str>, result: &HealthScoreResult) -> ScanRecord {
        self.record_at(product, result, Utc::now())
    }

    pub fn record_at(
        &self,
        product: Option<&str>,
        result: &HealthScoreResult,
        ts: DateTime<Utc>,
    ) -> ScanRecord {
        let entry = ScanRecord {
            ts,
            product_id: product
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(anon_hash)
                .unwrap_or_else(|| "anonymous".to_string()),
            score: result.score,
            grade: result.grade,
            is_official: result.is_official,
        };

        let mut v = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        v.push_back(entry.clone());
        while v.len() > self.cap {
            v.pop_front();
        }
        entry
    }

    /// Up to `n` most recent records, oldest first.
    pub fn snapshot_last_n(&self, n: usize) -> Vec<ScanRecord> {
        let v = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let start = v.len().saturating_sub(n);
        v.iter().skip(start).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Average score and grade distribution over records newer than `now - window`.
    pub fn summary(&self, window: Duration, now: DateTime<Utc>) -> HistorySummary {
        let cutoff = now - window;
        let v = self.inner.lock().unwrap_or_else(PoisonError::into_inner);

        let mut sum: u64 = 0;
        let mut count = 0usize;
        let mut grades = BTreeMap::new();
        // Timestamps are caller-supplied and clocks can step back: no ordering assumed.
        for r in v.iter().filter(|r| r.ts >= cutoff) {
            sum += u64::from(r.score);
            count += 1;
            let key = r.grade.map(|g| g.to_string()).unwrap_or_else(|| "none".into());
            *grades.entry(key).or_insert(0) += 1;
        }

        HistorySummary {
            window_secs: window.num_seconds(),
            count,
            average_score: (count > 0).then(|| sum as f32 / count as f32),
            grades,
        }
    }
}

/// Short, stable, non-reversible id for a product name.
pub(crate) fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let digest = Sha256::digest(text.as_bytes());
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}
