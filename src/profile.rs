//! Opt-in timing of conversion phases.
//!
//! [`loads_with`](crate::loads_with) and [`dumps_with`](crate::dumps_with)
//! report how long each phase of a call took to a caller-supplied
//! [`Collector`]. The plain entry points pass `()`, which discards every
//! measurement.
//!
//! ```rust
//! use toml_native::profile::{Scope, Stats};
//! use toml_native::{loads_with, Options};
//!
//! let mut stats = Stats::new();
//! for _ in 0..3 {
//!     loads_with("a = 1", &Options::new(), &mut stats).unwrap();
//! }
//! assert_eq!(stats.get(Scope::LoadsTotal).unwrap().count, 3);
//! println!("{}", stats);
//! ```

use indexmap::IndexMap;
use std::fmt;
use std::time::{Duration, Instant};

/// A timed phase of a conversion call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scope {
    LoadsTotal,
    LoadsParse,
    LoadsConvert,
    DumpsTotal,
    DumpsConvert,
    DumpsEmit,
}

impl Scope {
    /// Every scope, in the order a summary lists them.
    pub const ALL: [Scope; 6] = [
        Scope::LoadsTotal,
        Scope::LoadsParse,
        Scope::LoadsConvert,
        Scope::DumpsTotal,
        Scope::DumpsConvert,
        Scope::DumpsEmit,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Scope::LoadsTotal => "loads.total",
            Scope::LoadsParse => "loads.parse",
            Scope::LoadsConvert => "loads.convert",
            Scope::DumpsTotal => "dumps.total",
            Scope::DumpsConvert => "dumps.convert",
            Scope::DumpsEmit => "dumps.emit",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receives one measurement per completed scope, whether or not the scope
/// succeeded.
pub trait Collector {
    fn record(&mut self, scope: Scope, elapsed: Duration);
}

/// The no-op collector.
impl Collector for () {
    #[inline]
    fn record(&mut self, _scope: Scope, _elapsed: Duration) {}
}

/// Call count and accumulated time for one scope.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Entry {
    pub count: u64,
    pub total: Duration,
}

impl Entry {
    /// Mean time per call. Zero when nothing was recorded.
    #[must_use]
    pub fn average(&self) -> Duration {
        match u32::try_from(self.count) {
            Ok(0) => Duration::ZERO,
            Ok(count) => self.total / count,
            Err(_) => Duration::from_nanos((self.total.as_nanos() / u128::from(self.count)) as u64),
        }
    }
}

/// A [`Collector`] that aggregates count and total time per scope.
#[derive(Clone, Debug, Default)]
pub struct Stats {
    entries: IndexMap<Scope, Entry>,
}

impl Stats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The aggregate for `scope`, if it was ever recorded.
    #[must_use]
    pub fn get(&self, scope: Scope) -> Option<&Entry> {
        self.entries.get(&scope)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Collector for Stats {
    fn record(&mut self, scope: Scope, elapsed: Duration) {
        let entry = self.entries.entry(scope).or_default();
        entry.count += 1;
        entry.total += elapsed;
    }
}

/// Renders one line per recorded scope, in [`Scope::ALL`] order.
impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "toml_native profiling summary:")?;
        if self.entries.is_empty() {
            return writeln!(f, "no profiling stats have been collected.");
        }
        for scope in Scope::ALL {
            if let Some(entry) = self.entries.get(&scope) {
                writeln!(
                    f,
                    "{:>15}: counter = {:>7}, total_time_in_ns = {:>12}, average_time_in_ns = {:>7}",
                    scope.as_str(),
                    entry.count,
                    entry.total.as_nanos(),
                    entry.average().as_nanos()
                )?;
            }
        }
        Ok(())
    }
}

/// Runs `f` and records its wall time under `scope`.
pub(crate) fn timed<C, T, F>(collector: &mut C, scope: Scope, f: F) -> T
where
    C: Collector + ?Sized,
    F: FnOnce(&mut C) -> T,
{
    let start = Instant::now();
    let out = f(collector);
    collector.record(scope, start.elapsed());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_aggregate() {
        let mut stats = Stats::new();
        stats.record(Scope::DumpsEmit, Duration::from_micros(10));
        stats.record(Scope::DumpsEmit, Duration::from_micros(30));
        let entry = stats.get(Scope::DumpsEmit).unwrap();
        assert_eq!(entry.count, 2);
        assert_eq!(entry.total, Duration::from_micros(40));
        assert_eq!(entry.average(), Duration::from_micros(20));
        assert!(stats.get(Scope::LoadsParse).is_none());
    }

    #[test]
    fn test_empty_summary() {
        let stats = Stats::new();
        assert!(stats.to_string().contains("no profiling stats"));
        assert_eq!(Entry::default().average(), Duration::ZERO);
    }

    #[test]
    fn test_summary_lists_scopes_in_order() {
        let mut stats = Stats::new();
        stats.record(Scope::LoadsParse, Duration::from_nanos(5));
        stats.record(Scope::LoadsTotal, Duration::from_nanos(9));
        let summary = stats.to_string();
        let total = summary.find("loads.total").unwrap();
        let parse = summary.find("loads.parse").unwrap();
        assert!(total < parse);
    }

    #[test]
    fn test_timed_records_once() {
        let mut stats = Stats::new();
        let value = timed(&mut stats, Scope::LoadsConvert, |_| 7);
        assert_eq!(value, 7);
        assert_eq!(stats.get(Scope::LoadsConvert).unwrap().count, 1);
    }
}
