//! Reconstruction of every optimal allocation from the table's tie sets.
//!
//! Paths(0, 0) = {[]} and Paths(i, j) = { p + [k] : k in ties(i, j), p in Paths(i - 1, j - k) }.
//! The answer is Paths(n, m). Three ways to get at it:
//!
//! - [`AllocationEnumerator::enumerate`]: materialized, memoized by (i, j), deduplicated.
//! - [`AllocationEnumerator::count`]: number of optimal allocations, nothing materialized.
//! - [`AllocationEnumerator::iter`]: lazy depth-first stream, one allocation per `next()`.
//!
//! When dp[n][m] is 0 every split multiplies to 0, so every split is optimal:
//! the choices at company `i >= 2` widen from the tie set to all of `0..=j`.
//!
//! All three agree on order: ascending choice order of the last company first,
//! then of the one before it, and so on.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::allocation_table::AllocationTable;
use crate::types::Allocation;

/// Allocations taken from one capped enumeration.
#[derive(Clone, Debug, PartialEq)]
pub struct Enumeration {
    pub allocations: Vec<Allocation>,
    /// Total number of optimal allocations (saturating).
    pub total: u64,
    /// True when `allocations` holds fewer than `total` entries.
    pub truncated: bool,
}

/// Quantities company `i` may take at cell (i, j) on an optimal path.
#[derive(Clone, Copy)]
enum Choices<'a> {
    Ties(&'a [usize]),
    /// Every quantity `0..=j`.
    UpTo(usize),
}

impl Choices<'_> {
    fn of(table: &AllocationTable, every_split: bool, i: usize, j: usize) -> Choices<'_> {
        // Company 1 must absorb all remaining units either way
        if every_split && i >= 2 {
            Choices::UpTo(j)
        } else {
            Choices::Ties(table.ties(i, j))
        }
    }

    #[inline(always)]
    fn len(&self) -> usize {
        match self {
            Choices::Ties(ties) => ties.len(),
            Choices::UpTo(j) => j + 1,
        }
    }

    #[inline(always)]
    fn get(&self, pos: usize) -> usize {
        match self {
            Choices::Ties(ties) => ties[pos],
            Choices::UpTo(_) => pos,
        }
    }
}

pub struct AllocationEnumerator<'a> {
    table: &'a AllocationTable,
    /// dp[n][m] == 0: all splits tie.
    every_split: bool,
}

impl<'a> AllocationEnumerator<'a> {
    pub fn new(table: &'a AllocationTable) -> Self {
        Self {
            table,
            every_split: table.max_probability() == 0.0,
        }
    }

    fn choices(&self, i: usize, j: usize) -> Choices<'a> {
        Choices::of(self.table, self.every_split, i, j)
    }

    /// Every optimal allocation, deduplicated, in discovery order.
    pub fn enumerate(&self) -> Vec<Allocation> {
        self.enumerate_capped(None).allocations
    }

    /// Like [`Self::enumerate`] but keeps at most `limit` allocations.
    ///
    /// Memoized prefixes are cut at `limit` too, so memory stays bounded by
    /// `limit` per visited cell no matter how many ties the table holds.
    pub fn enumerate_capped(&self, limit: Option<usize>) -> Enumeration {
        let n = self.table.companies();
        let m = self.table.machines();
        let total = self.count();

        let mut memo: HashMap<(usize, usize), Vec<Vec<usize>>> = HashMap::new();
        let paths = self.paths(n, m, limit, &mut memo);

        let mut seen: HashSet<&[usize]> = HashSet::with_capacity(paths.len());
        let mut allocations = Vec::with_capacity(paths.len());
        for path in &paths {
            if seen.insert(path.as_slice()) {
                allocations.push(Allocation::new(path.clone()));
            }
        }

        let truncated = (allocations.len() as u64) < total;
        if truncated {
            warn!(
                kept = allocations.len(),
                total, "optimal allocations truncated"
            );
        }
        debug!(
            cells = memo.len(),
            allocations = allocations.len(),
            every_split = self.every_split,
            "enumerated optimal allocations"
        );

        Enumeration {
            allocations,
            total,
            truncated,
        }
    }

    fn paths(
        &self,
        i: usize,
        j: usize,
        limit: Option<usize>,
        memo: &mut HashMap<(usize, usize), Vec<Vec<usize>>>,
    ) -> Vec<Vec<usize>> {
        if i == 0 {
            // ties(0, j > 0) is empty, so only the empty prefix at j = 0 survives
            return if j == 0 { vec![Vec::new()] } else { Vec::new() };
        }
        if let Some(cached) = memo.get(&(i, j)) {
            return cached.clone();
        }

        let cap = limit.unwrap_or(usize::MAX);
        let choices = self.choices(i, j);
        let mut out: Vec<Vec<usize>> = Vec::new();
        'choices: for pos in 0..choices.len() {
            let k = choices.get(pos);
            for mut prefix in self.paths(i - 1, j - k, limit, memo) {
                if out.len() >= cap {
                    break 'choices;
                }
                prefix.push(k);
                out.push(prefix);
            }
        }

        memo.insert((i, j), out.clone());
        out
    }

    /// Number of optimal allocations, saturating at `u64::MAX`.
    ///
    /// With a zero optimum this is C(m + n - 1, n - 1).
    pub fn count(&self) -> u64 {
        let m = self.table.machines();
        // counts[j] for the previous layer; layer 0 has one empty split of 0 units
        let mut counts = vec![0u64; m + 1];
        counts[0] = 1;
        for i in 1..=self.table.companies() {
            let mut next = vec![0u64; m + 1];
            for (j, slot) in next.iter_mut().enumerate() {
                let choices = self.choices(i, j);
                *slot = (0..choices.len())
                    .fold(0u64, |acc, pos| acc.saturating_add(counts[j - choices.get(pos)]));
            }
            counts = next;
        }
        counts[m]
    }

    /// Lazily stream the optimal allocations.
    pub fn iter(&self) -> OptimalAllocations<'a> {
        OptimalAllocations::new(self.table, self.every_split)
    }
}

/// Depth-first stream over Paths(n, m).
///
/// Distinct choices always give distinct vectors (the vector is the
/// sequence of choices), so the stream never repeats an allocation and needs
/// no seen-set.
pub struct OptimalAllocations<'a> {
    table: &'a AllocationTable,
    every_split: bool,
    /// picks[d]: position inside the choices of company n - d at units[d].
    picks: Vec<usize>,
    /// units[d]: machines left for companies 1..=n - d.
    units: Vec<usize>,
    started: bool,
    done: bool,
}

impl<'a> OptimalAllocations<'a> {
    fn new(table: &'a AllocationTable, every_split: bool) -> Self {
        let n = table.companies();
        Self {
            table,
            every_split,
            picks: vec![0; n],
            units: vec![0; n],
            started: false,
            done: false,
        }
    }

    fn choices(&self, depth: usize) -> Choices<'a> {
        let actors = self.table.companies() - depth;
        Choices::of(self.table, self.every_split, actors, self.units[depth])
    }

    /// Take the first choice at every depth from `depth` down to company 1.
    fn descend(&mut self, depth: usize) {
        let n = self.table.companies();
        for d in depth..n {
            let remaining = if d == 0 {
                self.table.machines()
            } else {
                self.units[d - 1] - self.chosen(d - 1)
            };
            self.units[d] = remaining;
            self.picks[d] = 0;
        }
    }

    #[inline(always)]
    fn chosen(&self, depth: usize) -> usize {
        self.choices(depth).get(self.picks[depth])
    }

    fn current(&self) -> Allocation {
        let n = self.table.companies();
        let mut units = vec![0usize; n];
        for d in 0..n {
            units[n - 1 - d] = self.chosen(d);
        }
        Allocation::new(units)
    }
}

impl Iterator for OptimalAllocations<'_> {
    type Item = Allocation;

    fn next(&mut self) -> Option<Allocation> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            self.descend(0);
            return Some(self.current());
        }

        // Advance the deepest depth that still has an untried choice
        let mut depth = self.picks.len();
        while depth > 0 {
            depth -= 1;
            if self.picks[depth] + 1 < self.choices(depth).len() {
                self.picks[depth] += 1;
                self.descend(depth + 1);
                return Some(self.current());
            }
        }

        self.done = true;
        None
    }
}
