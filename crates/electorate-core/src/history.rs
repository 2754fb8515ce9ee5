//! Rolling national history, the player's action log, and the per-turn
//! digest.

use std::collections::VecDeque;

/// History never keeps fewer points than this.
pub const MIN_HISTORY_WINDOW: usize = 10;

/// Rolling series of the four national readings.
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    window: usize,
    stability: VecDeque<f64>,
    turnout: VecDeque<f64>,
    treasury: VecDeque<f64>,
    capital: VecDeque<f64>,
}

/// One history sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryPoint {
    /// National stability.
    pub stability: f64,
    /// National turnout.
    pub turnout: f64,
    /// Treasury balance.
    pub treasury: f64,
    /// Political capital.
    pub capital: f64,
}

impl History {
    /// Empty history keeping at most `max(10, window)` points per series.
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(MIN_HISTORY_WINDOW),
            stability: VecDeque::new(),
            turnout: VecDeque::new(),
            treasury: VecDeque::new(),
            capital: VecDeque::new(),
        }
    }

    /// Effective window length.
    pub const fn window(&self) -> usize {
        self.window
    }

    /// Append a sample, dropping the oldest beyond the window.
    pub fn record(&mut self, point: HistoryPoint) {
        let window = self.window;
        push_bounded(&mut self.stability, point.stability, window);
        push_bounded(&mut self.turnout, point.turnout, window);
        push_bounded(&mut self.treasury, point.treasury, window);
        push_bounded(&mut self.capital, point.capital, window);
    }

    /// Stability series, oldest first.
    pub fn stability(&self) -> impl Iterator<Item = f64> + '_ {
        self.stability.iter().copied()
    }

    /// Turnout series, oldest first.
    pub fn turnout(&self) -> impl Iterator<Item = f64> + '_ {
        self.turnout.iter().copied()
    }

    /// Treasury series, oldest first.
    pub fn treasury(&self) -> impl Iterator<Item = f64> + '_ {
        self.treasury.iter().copied()
    }

    /// Capital series, oldest first.
    pub fn capital(&self) -> impl Iterator<Item = f64> + '_ {
        self.capital.iter().copied()
    }

    /// Replace all four series, keeping only the newest points that fit.
    pub fn restore(&mut self, stability: &[f64], turnout: &[f64], treasury: &[f64], capital: &[f64]) {
        let window = self.window;
        self.stability = tail(stability, window);
        self.turnout = tail(turnout, window);
        self.treasury = tail(treasury, window);
        self.capital = tail(capital, window);
    }
}

fn push_bounded(series: &mut VecDeque<f64>, value: f64, window: usize) {
    series.push_back(value);
    while series.len() > window {
        series.pop_front();
    }
}

fn tail(values: &[f64], window: usize) -> VecDeque<f64> {
    let skip = values.len().saturating_sub(window);
    values.iter().skip(skip).copied().filter(|v| v.is_finite()).collect()
}

/// Bounded log of player actions, each prefixed with its turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionLog {
    capacity: usize,
    entries: VecDeque<String>,
}

impl ActionLog {
    /// Empty log holding at most `capacity` entries (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: VecDeque::new(),
        }
    }

    /// Append `T{turn}: {entry}`; blank entries are ignored.
    pub fn push(&mut self, turn: u32, entry: &str) {
        if entry.trim().is_empty() {
            return;
        }
        self.entries.push_back(format!("T{turn}: {entry}"));
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Entries, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Replace with already-formatted entries, skipping blanks and keeping
    /// the newest that fit.
    pub fn restore(&mut self, entries: &[String]) {
        self.entries = entries
            .iter()
            .filter(|e| !e.trim().is_empty())
            .cloned()
            .collect();
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }
}

/// Signed rendering with `decimals` places; values that round to zero
/// print unsigned.
fn signed(value: f64, decimals: usize) -> String {
    let magnitude = format!("{:.decimals$}", value.abs());
    if magnitude.chars().all(|c| c == '0' || c == '.') {
        return magnitude;
    }
    if value < 0.0 {
        format!("-{magnitude}")
    } else {
        format!("+{magnitude}")
    }
}

/// One-line summary of how the nation moved over a turn.
pub fn turn_digest(before: &HistoryPoint, after: &HistoryPoint, top_demand: Option<&str>) -> String {
    let demand = top_demand.filter(|d| !d.trim().is_empty()).unwrap_or("None");
    format!(
        "Stability {}, Turnout {}%, Treasury {}, Capital {}. Top demand: {}",
        signed(after.stability - before.stability, 1),
        signed((after.turnout - before.turnout) * 100.0, 1),
        signed(after.treasury - before.treasury, 0),
        signed(after.capital - before.capital, 1),
        demand,
    )
}

/// Turns left until the next election; 0 when elections are disabled.
pub const fn ticks_until_election(turn: u32, interval: u32) -> u32 {
    if interval == 0 {
        return 0;
    }
    match turn.checked_rem(interval) {
        Some(0) | None => interval,
        Some(rem) => interval.saturating_sub(rem),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn point(stability: f64, turnout: f64, treasury: f64, capital: f64) -> HistoryPoint {
        HistoryPoint {
            stability,
            turnout,
            treasury,
            capital,
        }
    }

    #[test]
    fn history_window_has_a_floor() {
        let mut history = History::new(3);
        assert_eq!(history.window(), MIN_HISTORY_WINDOW);
        for i in 0..15_u32 {
            history.record(point(f64::from(i), 0.5, 0.0, 25.0));
        }
        let stability: Vec<f64> = history.stability().collect();
        assert_eq!(stability.len(), 10);
        assert!((stability.first().copied().unwrap_or_default() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn action_log_keeps_newest() {
        let mut log = ActionLog::new(2);
        log.push(1, "first");
        log.push(2, "  ");
        log.push(3, "second");
        log.push(4, "third");
        let entries: Vec<&str> = log.entries().collect();
        assert_eq!(entries, vec!["T3: second", "T4: third"]);
    }

    #[test]
    fn digest_signs_and_zeroes() {
        let before = point(50.0, 0.5, 100.0, 25.0);
        let after = point(52.34, 0.488, 100.2, 24.0);
        assert_eq!(
            turn_digest(&before, &after, Some("Clergy: Support community order and moral institutions.")),
            "Stability +2.3, Turnout -1.2%, Treasury 0, Capital -1.0. Top demand: Clergy: Support community order and moral institutions."
        );
        assert_eq!(
            turn_digest(&before, &before, None),
            "Stability 0.0, Turnout 0.0%, Treasury 0, Capital 0.0. Top demand: None"
        );
    }

    #[test]
    fn election_countdown() {
        assert_eq!(ticks_until_election(0, 48), 48);
        assert_eq!(ticks_until_election(47, 48), 1);
        assert_eq!(ticks_until_election(48, 48), 48);
        assert_eq!(ticks_until_election(5, 0), 0);
    }
}
