//! Metric name normalizer
//!
//! Message-queue client libraries have encoded partition identity inside the
//! metric name using two different conventions across versions:
//!
//! ```text
//! Partition{host=kafka1:9092, partition=3}/fetchRate
//! partition_3/fetchRate
//! ```
//!
//! Both are rewritten into a canonical form with the partition id appended as
//! a trailing `partition=<id>` tag, so downstream queries can filter and group
//! by partition uniformly. Names matching neither convention pass through
//! unchanged.

use regex::Regex;
use std::sync::LazyLock;

static BRACKETED_PARTITION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Partition\{host=[^}]*, partition=(\d+)\}/").unwrap());

static UNDERSCORE_PARTITION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"partition_(\d+)/").unwrap());

/// Canonicalize partition-bearing metric names
///
/// The two rules are tried in fixed order and the first match wins. The
/// matched partition segment is stripped and ` partition=<id>` is appended to
/// the end of the string, which turns into a trailing tag once the line is on
/// the wire. Works on a bare metric name or on a whole line record.
pub fn normalize(line: &str) -> String {
    for pattern in [&*BRACKETED_PARTITION, &*UNDERSCORE_PARTITION] {
        if let Some(caps) = pattern.captures(line) {
            let matched = caps.get(0).expect("whole match");
            if line.len() == matched.len() {
                // Nothing besides the partition segment; no name to keep.
                continue;
            }
            let mut rewritten =
                String::with_capacity(line.len() + " partition=".len());
            rewritten.push_str(&line[..matched.start()]);
            rewritten.push_str(&line[matched.end()..]);
            rewritten.push_str(" partition=");
            rewritten.push_str(&caps[1]);
            return rewritten;
        }
    }
    line.to_string()
}
