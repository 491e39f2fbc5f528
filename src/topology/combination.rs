//! Orientation enumerator: combinations of special axes.
//!
//! An orientation of entity class `k` on a `D`-dimensional mesh is the set of
//! `k` axes along which the entity sits on a cell boundary. Orientations are
//! ranked by the lexicographic order of their increasing axis tuples:
//!
//! ```text
//! D = 3, k = 2:   rank 0 -> (0, 1)   rank 1 -> (0, 2)   rank 2 -> (1, 2)
//! ```
//!
//! Three query modes share that order: [`enumerate`] / [`combinations`] list
//! all tuples, [`combination_to_rank`] ranks one tuple and
//! [`rank_to_combination`] unranks one rank. [`combination_table`] caches the
//! full listing per `(D, k)` for the lifetime of the process.

use std::sync::Arc;

use dashmap::DashMap;
use itertools::Itertools;
use once_cell::sync::Lazy;

use crate::mesh_error::MeshError;

/// Binomial coefficient `C(n, k)`, or `None` if it does not fit in `usize`.
///
/// Zero when `k > n`.
pub fn checked_binomial(n: usize, k: usize) -> Option<usize> {
    if k > n {
        return Some(0);
    }
    let k = k.min(n - k);
    // Partial products are C(n, i), increasing in i up to k <= n / 2, so once
    // one exceeds usize the result does too. Below that bound the u128
    // product cannot overflow.
    let c = (0..k).try_fold(1u128, |acc, i| {
        let next = acc * (n - i) as u128 / (i + 1) as u128;
        (next <= usize::MAX as u128).then_some(next)
    })?;
    usize::try_from(c).ok()
}

/// Binomial coefficient `C(n, k)`; zero when `k > n`, saturating at
/// `usize::MAX`.
pub fn binomial(n: usize, k: usize) -> usize {
    checked_binomial(n, k).unwrap_or(usize::MAX)
}

/// Validates `(D, k)` and returns `C(D, k)`.
fn check_arguments(num_dims: usize, num_directions: usize) -> Result<usize, MeshError> {
    if num_dims == 0 {
        return Err(MeshError::invalid("number of dimensions must be positive"));
    }
    if num_directions > num_dims {
        return Err(MeshError::invalid(format!(
            "number of directions ({num_directions}) cannot exceed number of dimensions ({num_dims})"
        )));
    }
    checked_binomial(num_dims, num_directions).ok_or_else(|| {
        MeshError::invalid(format!(
            "C({num_dims}, {num_directions}) does not fit in usize"
        ))
    })
}

/// Lazy iterator over all `k`-combinations of `0..D` in rank order.
///
/// Starts from `(0, 1, .., k-1)`; each step finds the right-most entry that
/// can still grow, increments it and resets everything to its right to
/// consecutive values.
#[derive(Clone, Debug)]
pub struct Combinations {
    num_dims: usize,
    current: Vec<usize>,
    exhausted: bool,
}

impl Combinations {
    fn new(num_dims: usize, num_directions: usize) -> Self {
        Self {
            num_dims,
            current: (0..num_directions).collect(),
            exhausted: false,
        }
    }

    fn advance(&mut self) {
        let k = self.current.len();
        let limit = self.num_dims - k;
        match (0..k).rev().find(|&i| self.current[i] < limit + i) {
            Some(i) => {
                self.current[i] += 1;
                for j in i + 1..k {
                    self.current[j] = self.current[j - 1] + 1;
                }
            }
            None => self.exhausted = true,
        }
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let out = self.current.clone();
        self.advance();
        Some(out)
    }
}

/// Lazily enumerate the `C(D,k)` combinations in rank order.
///
/// # Errors
/// `InvalidParameters` if `D == 0`, `k > D` or `C(D,k)` overflows `usize`.
pub fn combinations(num_dims: usize, num_directions: usize) -> Result<Combinations, MeshError> {
    check_arguments(num_dims, num_directions)?;
    Ok(Combinations::new(num_dims, num_directions))
}

/// Eagerly enumerate the `C(D,k)` combinations in rank order.
///
/// `k == 0` yields exactly one combination, the empty tuple.
pub fn enumerate(num_dims: usize, num_directions: usize) -> Result<Vec<Vec<usize>>, MeshError> {
    Ok(combinations(num_dims, num_directions)?.collect())
}

/// Rank of a combination of axes.
///
/// The axes may be given in any order; they are sorted before ranking.
///
/// # Errors
/// - `InvalidParameters` if `D == 0`, `k > D` or an axis is repeated.
/// - `ArityMismatch` if `combination.len() != k`.
/// - `AxisOutOfRange` if an axis is not in `[0, D)`.
pub fn combination_to_rank(
    num_dims: usize,
    num_directions: usize,
    combination: &[usize],
) -> Result<usize, MeshError> {
    check_arguments(num_dims, num_directions)?;
    if combination.len() != num_directions {
        return Err(MeshError::ArityMismatch {
            expected: num_directions,
            found: combination.len(),
        });
    }
    if let Some(&axis) = combination.iter().find(|&&a| a >= num_dims) {
        return Err(MeshError::AxisOutOfRange { axis, num_dims });
    }
    let sorted: Vec<usize> = combination.iter().copied().sorted_unstable().collect();
    if let Some((a, _)) = sorted.iter().tuple_windows().find(|(a, b)| a == b) {
        return Err(MeshError::invalid(format!("axis {a} appears more than once")));
    }

    let mut rank = 0;
    let mut start = 0;
    for (i, &axis) in sorted.iter().enumerate() {
        let remaining = num_directions - 1 - i;
        // Every tuple whose i-th entry is smaller comes first.
        for skipped in start..axis {
            rank += binomial(num_dims - 1 - skipped, remaining);
        }
        start = axis + 1;
    }
    Ok(rank)
}

/// The increasing axis tuple at `rank`.
///
/// # Errors
/// - `InvalidParameters` if `D == 0` or `k > D`.
/// - `RankOutOfRange` if `rank >= C(D,k)`.
pub fn rank_to_combination(
    num_dims: usize,
    num_directions: usize,
    rank: usize,
) -> Result<Vec<usize>, MeshError> {
    let count = check_arguments(num_dims, num_directions)?;
    if rank >= count {
        return Err(MeshError::RankOutOfRange { rank, count });
    }

    let mut remaining_rank = rank;
    let mut out = Vec::with_capacity(num_directions);
    let mut axis = 0;
    for i in 0..num_directions {
        let remaining = num_directions - 1 - i;
        loop {
            let block = binomial(num_dims - 1 - axis, remaining);
            if remaining_rank < block {
                break;
            }
            remaining_rank -= block;
            axis += 1;
        }
        out.push(axis);
        axis += 1;
    }
    Ok(out)
}

/// Immutable, rank-ordered listing of all combinations for one `(D, k)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CombinationTable {
    num_dims: usize,
    num_directions: usize,
    combinations: Vec<Vec<usize>>,
}

impl CombinationTable {
    /// Build the table for `(D, k)` without touching the shared cache.
    pub fn new(num_dims: usize, num_directions: usize) -> Result<Self, MeshError> {
        Ok(Self {
            num_dims,
            num_directions,
            combinations: enumerate(num_dims, num_directions)?,
        })
    }

    #[inline]
    pub fn num_dims(&self) -> usize {
        self.num_dims
    }

    #[inline]
    pub fn num_directions(&self) -> usize {
        self.num_directions
    }

    /// Number of combinations, `C(D,k)`.
    #[inline]
    pub fn len(&self) -> usize {
        self.combinations.len()
    }

    /// Never true: even `k == 0` has the empty combination.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.combinations.is_empty()
    }

    /// Combination at `rank`.
    pub fn get(&self, rank: usize) -> Result<&[usize], MeshError> {
        self.combinations
            .get(rank)
            .map(Vec::as_slice)
            .ok_or(MeshError::RankOutOfRange {
                rank,
                count: self.len(),
            })
    }

    /// Rank of `combination`, same contract as [`combination_to_rank`].
    pub fn rank_of(&self, combination: &[usize]) -> Result<usize, MeshError> {
        combination_to_rank(self.num_dims, self.num_directions, combination)
    }

    /// Combinations in rank order.
    pub fn iter(&self) -> impl Iterator<Item = &[usize]> + '_ {
        self.combinations.iter().map(Vec::as_slice)
    }
}

static TABLES: Lazy<DashMap<(usize, usize), Arc<CombinationTable>>> = Lazy::new(DashMap::new);

/// Shared table for `(D, k)`, built on first request and reused afterwards.
pub fn combination_table(
    num_dims: usize,
    num_directions: usize,
) -> Result<Arc<CombinationTable>, MeshError> {
    if let Some(table) = TABLES.get(&(num_dims, num_directions)) {
        return Ok(Arc::clone(table.value()));
    }
    let table = Arc::new(CombinationTable::new(num_dims, num_directions)?);
    log::trace!(
        "combination table D={num_dims} k={num_directions}: {} entries",
        table.len()
    );
    // A concurrent builder may have won the race; both tables are identical.
    let entry = TABLES
        .entry((num_dims, num_directions))
        .or_insert(table);
    Ok(Arc::clone(entry.value()))
}
