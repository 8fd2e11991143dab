//! Satisfaction index over rating-class counts.

use crate::types::Bucket;

/// Net satisfaction in `[-100, 100]`.
///
/// Both positive tiers count for, both negative tiers against, as a share
/// of ALL responses (unclassified ones included), rounded half away from
/// zero. An empty bucket scores 0 rather than dividing by zero.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn satisfaction_index(bucket: &Bucket) -> i32 {
    if bucket.total == 0 {
        return 0;
    }
    let favorable = (bucket.very_positive + bucket.positive) as f64;
    let unfavorable = (bucket.negative + bucket.very_negative) as f64;
    let total = bucket.total as f64;
    (((favorable - unfavorable) / total) * 100.0).round() as i32
}
