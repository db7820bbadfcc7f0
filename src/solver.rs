//! The mutable link store (C2), link primitives (C3), and search driver
//! (C4/C5) that together implement Algorithm M.
//!
//! Two flat arrays carry the whole structure: [`Solver::headers`] (one per
//! item; `0` is an unused root sentinel anchoring the active-item ring) and
//! [`Solver::cells`] (one per option/item incidence). All links between
//! them are `u32` indices rather than pointers, which is what lets the
//! integrity oracle (`checksum`) compare two states with a single hash
//! instead of a pointer-chasing walk.
//!
//! The search itself never recurses: [`Stage`] names each state of the
//! backtracking loop, and [`Solver::next`] resumes that loop exactly where
//! it left off, naming its stages after Knuth's own `X2,X3,X5,X6,X8` labels
//! but generalized for multiplicities (`tweak`) and colors (`commit`).

use crate::problem::Problem;
use crate::types::ColorId;
use crate::OptionId;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Errors raised while allocating a [`Solver`] for a [`Problem`].
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    /// The arena would need more than `u32::MAX` cells or headers.
    #[error("problem is too large: {0} exceeds the u32 index space")]
    SetupFailure(String),
}

/// Solve-time knobs gathered into one value, rather than positional
/// booleans, so call sites read as `Solver::with_options(&problem, opts)`.
#[derive(Debug, Clone, Copy)]
pub struct SolveOptions {
    /// Stop after this many solutions have been found. `usize::MAX` by
    /// default (search exhaustively).
    pub max_solutions: usize,
    /// Inflate the branching factor of any item whose name begins with `#`
    /// unless its branching factor is exactly 1. Used by the word-rectangle
    /// encoder to force ordinary grid cells to resolve before sentinel
    /// bookkeeping items; every other caller leaves this `false`.
    pub non_sharp_preference: bool,
}

impl Default for SolveOptions {
    fn default() -> Self {
        SolveOptions {
            max_solutions: usize::MAX,
            non_sharp_preference: false,
        }
    }
}

/// One item header: active-list links (primary items only), the head of
/// the item's vertical cell list, and multiplicity/color bookkeeping.
#[derive(Debug, Clone)]
struct ItemHeader {
    prev_active: u32,
    next_active: u32,
    first_cell: u32,
    is_primary: bool,
    min: u32,
    max: u32,
    used_count: u32,
    available: u32,
    color: Option<ColorId>,
}

/// One (option, item) incidence. `up`/`down` thread the item's vertical
/// list (`0` marks either end; it is not circular). `left`/`right` thread
/// the option's cyclic ring and never change after setup.
#[derive(Debug, Clone)]
struct Cell {
    up: u32,
    down: u32,
    left: u32,
    right: u32,
    item: u32,
    option: OptionId,
    color: Option<ColorId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Init,
    EnterLevel,
    TryX,
    Tweak,
    NextX,
    TweakNext,
    Restore,
    LeaveLevel,
    Done,
}

#[derive(Debug, Clone)]
struct LevelFrame {
    stage: Stage,
    item: u32,
    cur_cell: u32,
    starting_cell: u32,
    try_cell_count: u32,
}

impl LevelFrame {
    fn blank() -> Self {
        LevelFrame {
            stage: Stage::EnterLevel,
            item: 0,
            cur_cell: 0,
            starting_cell: 0,
            try_cell_count: 0,
        }
    }
}

/// A solution: the ordered list of option indices chosen, outermost level
/// first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    options: Vec<OptionId>,
}

impl Solution {
    /// The 0-based option indices making up this solution, in the order
    /// they were chosen (outermost search level first).
    pub fn option_numbers(&self) -> impl Iterator<Item = usize> + '_ {
        self.options.iter().map(|o| o.index())
    }

    /// Number of options used.
    #[must_use]
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Whether this solution uses no options at all (only possible for a
    /// problem with no primary items, which `Builder` rejects).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Looks up the caller-supplied meaning of every option in this
    /// solution.
    pub fn meanings<'p, T>(&self, problem: &'p Problem<T>) -> Vec<&'p T> {
        self.options
            .iter()
            .map(|o| problem.meaning(o.index()))
            .collect()
    }
}

/// The search engine (components C2-C5). Borrows a [`Problem`] for its
/// whole lifetime and is itself an [`Iterator`] of [`Solution`]s: each call
/// to `next` resumes the state machine until a solution is recorded or the
/// search is exhausted.
pub struct Solver<'p, T> {
    problem: &'p Problem<T>,
    headers: Vec<ItemHeader>,
    cells: Vec<Cell>,
    level: Vec<LevelFrame>,
    cur_level: usize,
    solutions_found: usize,
    options: SolveOptions,
    checksums: Vec<u64>,
}

impl<'p, T> Solver<'p, T> {
    /// Builds the link store for `problem` with default [`SolveOptions`].
    pub fn new(problem: &'p Problem<T>) -> Result<Self, SolverError> {
        Self::with_options(problem, SolveOptions::default())
    }

    /// Builds the link store for `problem` with explicit [`SolveOptions`].
    pub fn with_options(
        problem: &'p Problem<T>,
        options: SolveOptions,
    ) -> Result<Self, SolverError> {
        let num_primary = problem.num_primary_items();
        let num_items = problem.num_items();

        let total_cells: usize = problem.options_iter().map(|o| o.items.len()).sum();
        if num_items + 1 > u32::MAX as usize || total_cells + 1 > u32::MAX as usize {
            return Err(SolverError::SetupFailure(format!(
                "{num_items} items / {total_cells} cells"
            )));
        }

        let mut headers = Vec::with_capacity(num_items + 1);
        // index 0: root sentinel anchoring the primary active-item ring.
        headers.push(ItemHeader {
            prev_active: 0,
            next_active: 0,
            first_cell: 0,
            is_primary: false,
            min: 0,
            max: 0,
            used_count: 0,
            available: 0,
            color: None,
        });
        for spec in problem.primary_iter() {
            headers.push(ItemHeader {
                prev_active: 0,
                next_active: 0,
                first_cell: 0,
                is_primary: true,
                min: spec.bounds.u,
                max: spec.bounds.v,
                used_count: 0,
                available: 0,
                color: None,
            });
        }
        for _ in problem.secondary_iter() {
            headers.push(ItemHeader {
                prev_active: 0,
                next_active: 0,
                first_cell: 0,
                is_primary: false,
                min: 0,
                max: 0,
                used_count: 0,
                available: 0,
                color: None,
            });
        }
        // Wire the primary items into a circular ring anchored at 0, in
        // declaration order: this is the "append at the bottom" insertion
        // policy, reproducing Knuth's branching order (the alternate "top"
        // insertion some historical snapshots of the original used is not
        // reproduced).
        for i in 1..=num_primary as u32 {
            let prev = headers[0].prev_active;
            headers[prev as usize].next_active = i;
            headers[i as usize].prev_active = prev;
            headers[i as usize].next_active = 0;
            headers[0].prev_active = i;
        }

        let mut cells = Vec::with_capacity(total_cells + 1);
        cells.push(Cell {
            up: 0,
            down: 0,
            left: 0,
            right: 0,
            item: 0,
            option: OptionId::new(0),
            color: None,
        });

        for (option_number, option) in problem.options_iter().enumerate() {
            let first_index = cells.len() as u32;
            let n = option.items.len();
            for (k, colored) in option.items.iter().enumerate() {
                let item_index = colored.item().index() as u32 + 1;
                let cell_index = cells.len() as u32;

                let last = last_cell_in_column(&cells, &headers, item_index);
                if last == 0 {
                    headers[item_index as usize].first_cell = cell_index;
                } else {
                    cells[last as usize].down = cell_index;
                }
                headers[item_index as usize].available += 1;

                let left = if k == 0 { 0 } else { cell_index - 1 };
                let right = if k + 1 == n {
                    first_index
                } else {
                    cell_index + 1
                };

                cells.push(Cell {
                    up: last,
                    down: 0,
                    left,
                    right,
                    item: item_index,
                    option: OptionId::new(option_number as u32),
                    color: colored.color(),
                });
            }
            if n > 0 {
                cells[first_index as usize].left = cells.len() as u32 - 1;
            }
        }

        let max_depth = problem
            .primary_iter()
            .map(|spec| spec.bounds.v as usize)
            .sum::<usize>()
            + 1;
        let mut level = Vec::with_capacity(max_depth);
        level.push(LevelFrame::blank());
        level[0].stage = Stage::Init;

        Ok(Solver {
            problem,
            headers,
            cells,
            level,
            cur_level: 0,
            solutions_found: 0,
            options,
            checksums: Vec::with_capacity(max_depth),
        })
    }

    fn frame(&self) -> &LevelFrame {
        &self.level[self.cur_level]
    }

    fn frame_mut(&mut self) -> &mut LevelFrame {
        &mut self.level[self.cur_level]
    }

    fn push_level(&mut self) {
        self.cur_level += 1;
        if self.cur_level == self.level.len() {
            self.level.push(LevelFrame::blank());
        } else {
            self.level[self.cur_level] = LevelFrame::blank();
        }
        self.level[self.cur_level].stage = Stage::EnterLevel;
    }

    // --- C3: link primitives --------------------------------------------

    fn unlink_cell_vertically(&mut self, c: u32) {
        let item = self.cells[c as usize].item;
        self.headers[item as usize].available -= 1;
        let up = self.cells[c as usize].up;
        let down = self.cells[c as usize].down;
        if up != 0 {
            self.cells[up as usize].down = down;
        } else {
            self.headers[item as usize].first_cell = down;
        }
        if down != 0 {
            self.cells[down as usize].up = up;
        }
    }

    fn relink_cell_vertically(&mut self, c: u32) {
        let item = self.cells[c as usize].item;
        let up = self.cells[c as usize].up;
        let down = self.cells[c as usize].down;
        if up != 0 {
            self.cells[up as usize].down = c;
        } else {
            self.headers[item as usize].first_cell = c;
        }
        if down != 0 {
            self.cells[down as usize].up = c;
        }
        self.headers[item as usize].available += 1;
    }

    fn unlink_item(&mut self, i: u32) {
        let prev = self.headers[i as usize].prev_active;
        let next = self.headers[i as usize].next_active;
        self.headers[prev as usize].next_active = next;
        self.headers[next as usize].prev_active = prev;
    }

    fn relink_item(&mut self, i: u32) {
        let prev = self.headers[i as usize].prev_active;
        let next = self.headers[i as usize].next_active;
        self.headers[prev as usize].next_active = i;
        self.headers[next as usize].prev_active = i;
    }

    /// `hide(c)`: unlink every other cell in `c`'s option ring from its own
    /// vertical list, walking right. Does not touch `c` itself.
    fn hide(&mut self, c: u32) {
        let mut right = self.cells[c as usize].right;
        while right != c {
            self.unlink_cell_vertically(right);
            right = self.cells[right as usize].right;
        }
    }

    /// `unhide(c)`: the exact reverse of `hide`, walking left.
    fn unhide(&mut self, c: u32) {
        let mut left = self.cells[c as usize].left;
        while left != c {
            self.relink_cell_vertically(left);
            left = self.cells[left as usize].left;
        }
    }

    /// `cover(i)`: hide every live option referencing item `i`. Does not
    /// touch the active-item ring; callers decide separately whether `i`
    /// should also be unlinked (see `deactivate_or_cover`).
    fn cover(&mut self, i: u32) {
        let mut c = self.headers[i as usize].first_cell;
        while c != 0 {
            self.hide(c);
            c = self.cells[c as usize].down;
        }
    }

    /// `uncover(i)`: the exact reverse of `cover`.
    fn uncover(&mut self, i: u32) {
        let mut c = self.headers[i as usize].first_cell;
        while c != 0 {
            self.unhide(c);
            c = self.cells[c as usize].down;
        }
    }

    /// First assertion of a color on a secondary item: the cell's color
    /// becomes the item's color, every other live cell of that color is
    /// marked already-satisfied, and every cell of a different color has
    /// its option hidden elsewhere in the matrix.
    fn set_color(&mut self, c: u32) {
        let item = self.cells[c as usize].item;
        let color = self.cells[c as usize].color;
        debug_assert!(
            self.headers[item as usize].color.is_none(),
            "internal invariant violated: color reasserted on an already-colored item"
        );
        self.headers[item as usize].color = color;

        let mut linked = self.headers[item as usize].first_cell;
        while linked != 0 {
            if self.cells[linked as usize].color == color {
                self.cells[linked as usize].color = None;
            } else {
                self.hide(linked);
            }
            linked = self.cells[linked as usize].down;
        }
    }

    /// Exact inverse of `set_color`. Not a plain reverse walk: per-cell
    /// flag restores and hide/unhide pairs are independent of traversal
    /// direction, so this can walk the column forwards again.
    fn clear_color(&mut self, c: u32) {
        let item = self.cells[c as usize].item;
        let color = self.cells[c as usize].color;
        debug_assert_eq!(
            self.headers[item as usize].color, color,
            "internal invariant violated: clearing a color the item does not currently hold"
        );
        self.headers[item as usize].color = None;

        let mut linked = self.headers[item as usize].first_cell;
        while linked != 0 {
            if self.cells[linked as usize].color.is_none() {
                self.cells[linked as usize].color = color;
            } else {
                self.unhide(linked);
            }
            linked = self.cells[linked as usize].down;
        }
    }

    /// What happens to item `j` when some other cell in a just-chosen
    /// option touches it: deactivate it once its minimum is met, cover it
    /// once its maximum is met.
    fn deactivate_or_cover(&mut self, j: u32) {
        if !self.headers[j as usize].is_primary {
            return;
        }
        let used = self.headers[j as usize].used_count;
        if used == self.headers[j as usize].min {
            self.unlink_item(j);
        }
        if used == self.headers[j as usize].max {
            self.cover(j);
        }
    }

    /// Exact inverse of `deactivate_or_cover`.
    fn reactivate_or_uncover(&mut self, j: u32) {
        if !self.headers[j as usize].is_primary {
            return;
        }
        let used = self.headers[j as usize].used_count;
        if used + 1 == self.headers[j as usize].max {
            self.uncover(j);
        }
        if used + 1 == self.headers[j as usize].min {
            self.relink_item(j);
        }
    }

    /// The commit pass of `TryX`: mark every other item in the chosen
    /// option `c` as used once more.
    fn sequence_used(&mut self, c: u32) {
        let mut right = self.cells[c as usize].right;
        while right != c {
            let item = self.cells[right as usize].item;
            self.headers[item as usize].used_count += 1;
            if self.cells[right as usize].color.is_some() {
                self.set_color(right);
            } else {
                self.deactivate_or_cover(item);
            }
            right = self.cells[right as usize].right;
        }
    }

    /// Exact inverse of `sequence_used`, walking left.
    fn sequence_released(&mut self, c: u32) {
        let mut left = self.cells[c as usize].left;
        while left != c {
            let item = self.cells[left as usize].item;
            self.headers[item as usize].used_count -= 1;
            if self.cells[left as usize].color.is_some() {
                self.clear_color(left);
            } else {
                self.reactivate_or_uncover(item);
            }
            left = self.cells[left as usize].left;
        }
    }

    /// `tweak(c)`: remove `c` from the top of its item's list without
    /// covering the item; the item stays active with one fewer candidate.
    fn tweak(&mut self, c: u32) {
        debug_assert_eq!(
            self.headers[self.cells[c as usize].item as usize].first_cell, c,
            "internal invariant violated: tweaking a cell that is not at the top of its column"
        );
        self.hide(c);
        let item = self.cells[c as usize].item;
        let down = self.cells[c as usize].down;
        self.headers[item as usize].first_cell = down;
        self.headers[item as usize].available -= 1;
        if down != 0 {
            self.cells[down as usize].up = 0;
        }
    }

    /// Relinks every cell tweaked at the current level, from the saved
    /// starting cell down to the last-tried candidate, in one pass.
    fn untweak_all(&mut self) {
        let item = self.frame().item;
        let last = self.frame().cur_cell;
        let mut c = self.frame().starting_cell;
        self.headers[item as usize].first_cell = c;
        loop {
            self.unhide(c);
            self.headers[item as usize].available += 1;
            let down = self.cells[c as usize].down;
            if down != 0 {
                self.cells[down as usize].up = c;
            }
            if c == last {
                break;
            }
            c = down;
        }
    }

    // --- C4: branching heuristic -----------------------------------------

    fn branching_factor(&self, item: u32) -> i64 {
        let header = &self.headers[item as usize];
        let needed = header.min as i64 - header.used_count as i64;
        header.available as i64 - needed + 1
    }

    fn choose_item(&self) -> Option<(u32, i64)> {
        let mut best: Option<(u32, i64)> = None;
        let mut item = self.headers[0].next_active;
        while item != 0 {
            let mut bf = self.branching_factor(item);
            if self.options.non_sharp_preference && bf > 1 && self.item_is_non_sharp(item) {
                bf += 10_000;
            }
            if best.map_or(true, |(_, best_bf)| bf < best_bf) {
                best = Some((item, bf));
            }
            item = self.headers[item as usize].next_active;
        }
        best
    }

    fn item_is_non_sharp(&self, item: u32) -> bool {
        self.problem
            .primary_iter()
            .nth(item as usize - 1)
            .map(|spec| spec.name.starts_with('#'))
            .unwrap_or(false)
    }

    // --- C5: integrity oracle (debug only) -------------------------------

    /// A cheap structural checksum over every mutable field in the store.
    /// Used by the debug-only integrity oracle, and directly by the
    /// reversibility tests below.
    fn checksum(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        for h in &self.headers {
            (
                h.prev_active,
                h.next_active,
                h.first_cell,
                h.used_count,
                h.available,
                h.color,
            )
                .hash(&mut hasher);
        }
        for c in &self.cells {
            (c.up, c.down, c.item, c.color).hash(&mut hasher);
        }
        hasher.finish()
    }

    fn push_checksum(&mut self) {
        if cfg!(debug_assertions) {
            let sum = self.checksum();
            if self.checksums.len() <= self.cur_level {
                self.checksums.push(sum);
            } else {
                self.checksums[self.cur_level] = sum;
            }
        }
    }

    fn check_checksum(&self) {
        if cfg!(debug_assertions) {
            let expected = self.checksums[self.cur_level];
            let actual = self.checksum();
            if actual != expected {
                panic!(
                    "internal invariant violated: link store at level {} does not match its \
                     pre-descent snapshot after restore (stage {:?})",
                    self.cur_level,
                    self.frame().stage
                );
            }
        }
    }

    fn record_solution(&self) -> Solution {
        let mut options = Vec::with_capacity(self.cur_level);
        for lvl in &self.level[..self.cur_level] {
            let option = self.cells[lvl.cur_cell as usize].option;
            options.push(option);
        }
        Solution { options }
    }
}

fn last_cell_in_column(cells: &[Cell], headers: &[ItemHeader], item: u32) -> u32 {
    let mut c = headers[item as usize].first_cell;
    if c == 0 {
        return 0;
    }
    loop {
        let down = cells[c as usize].down;
        if down == 0 {
            return c;
        }
        c = down;
    }
}

impl<'p, T> Iterator for Solver<'p, T> {
    type Item = Solution;

    fn next(&mut self) -> Option<Solution> {
        loop {
            log::trace!("level {} stage {:?}", self.cur_level, self.frame().stage);
            match self.frame().stage {
                Stage::Init => {
                    self.frame_mut().stage = Stage::EnterLevel;
                }
                Stage::EnterLevel => {
                    if self.headers[0].next_active == 0 {
                        log::debug!("solution recorded at level {}", self.cur_level);
                        let solution = self.record_solution();
                        self.solutions_found += 1;
                        self.frame_mut().stage = if self.solutions_found < self.options.max_solutions {
                            Stage::LeaveLevel
                        } else {
                            Stage::Done
                        };
                        return Some(solution);
                    }

                    self.push_checksum();

                    let Some((item, bf)) = self.choose_item() else {
                        self.frame_mut().stage = Stage::LeaveLevel;
                        continue;
                    };
                    if bf <= 0 {
                        self.frame_mut().stage = Stage::LeaveLevel;
                        continue;
                    }

                    self.headers[item as usize].used_count += 1;
                    self.deactivate_or_cover(item);

                    let top_cell = self.headers[item as usize].first_cell;
                    let frame = self.frame_mut();
                    frame.item = item;
                    frame.cur_cell = top_cell;

                    if self.headers[item as usize].used_count == self.headers[item as usize].max {
                        let available = self.headers[item as usize].available;
                        let frame = self.frame_mut();
                        frame.stage = Stage::TryX;
                        frame.try_cell_count = available;
                    } else {
                        let frame = self.frame_mut();
                        frame.starting_cell = frame.cur_cell;
                        frame.stage = Stage::Tweak;
                        frame.try_cell_count = bf as u32;
                    }
                }
                Stage::TryX => {
                    let c = self.frame().cur_cell;
                    self.frame_mut().try_cell_count -= 1;
                    self.sequence_used(c);
                    self.push_level();
                }
                Stage::NextX => {
                    let c = self.frame().cur_cell;
                    self.sequence_released(c);
                    if self.frame().try_cell_count == 0 {
                        self.frame_mut().stage = Stage::Restore;
                    } else {
                        let next = self.cells[c as usize].down;
                        let frame = self.frame_mut();
                        frame.cur_cell = next;
                        frame.stage = Stage::TryX;
                    }
                }
                Stage::Tweak => {
                    let c = self.frame().cur_cell;
                    self.frame_mut().try_cell_count -= 1;
                    self.tweak(c);
                    self.push_level();
                }
                Stage::TweakNext => {
                    if self.frame().try_cell_count == 0 {
                        self.untweak_all();
                        self.frame_mut().stage = Stage::Restore;
                    } else {
                        let c = self.frame().cur_cell;
                        let next = self.cells[c as usize].down;
                        let frame = self.frame_mut();
                        frame.cur_cell = next;
                        frame.stage = Stage::Tweak;
                    }
                }
                Stage::Restore => {
                    let item = self.frame().item;
                    self.headers[item as usize].used_count -= 1;
                    self.reactivate_or_uncover(item);
                    self.check_checksum();
                    self.frame_mut().stage = Stage::LeaveLevel;
                }
                Stage::LeaveLevel => {
                    if self.cur_level == 0 {
                        self.frame_mut().stage = Stage::Done;
                    } else {
                        self.cur_level -= 1;
                        let parent_stage = self.frame().stage;
                        self.frame_mut().stage = match parent_stage {
                            Stage::TryX => Stage::NextX,
                            Stage::Tweak => Stage::TweakNext,
                            other => panic!(
                                "internal invariant violated: unexpected parent stage {other:?} \
                                 on LeaveLevel"
                            ),
                        };
                    }
                }
                Stage::Done => return None,
            }
        }
    }
}

impl<'p, T> Solver<'p, T> {
    /// Collects every solution (up to `max_solutions`).
    pub fn solve_all(mut self) -> Vec<Solution> {
        let mut out = Vec::new();
        while let Some(solution) = self.next() {
            out.push(solution);
        }
        out
    }

    /// Returns at most one solution.
    pub fn solve_once(mut self) -> Option<Solution> {
        self.next()
    }

    /// Finds a unique solution, if there is one; see [`crate::Unique`].
    pub fn solve_unique(mut self) -> crate::Unique<Solution> {
        match self.next() {
            None => crate::Unique::None,
            Some(first) => match self.next() {
                None => crate::Unique::One(first),
                Some(second) => crate::Unique::Ambiguous(first, second),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Problem;

    fn toy() -> Problem<usize> {
        let mut b = Problem::builder();
        b.add_primary_items(1..=7);
        for (i, opt) in [
            vec![3, 5],
            vec![1, 4, 7],
            vec![2, 3, 6],
            vec![1, 4, 6],
            vec![2, 7],
            vec![4, 5, 7],
        ]
        .into_iter()
        .enumerate()
        {
            b.add_option(i, opt);
        }
        b.build()
    }

    #[test]
    fn knuth_toy_has_one_solution() {
        let problem = toy();
        let solutions = Solver::new(&problem).unwrap().solve_all();
        assert_eq!(solutions.len(), 1);
        let mut numbers: Vec<usize> = solutions[0].option_numbers().collect();
        numbers.sort_unstable();
        assert_eq!(numbers, vec![0, 3, 4]);
    }

    #[test]
    fn colored_example_49() {
        let mut b = Problem::builder();
        b.add_primary_items(["p", "q", "r"]);
        b.add_secondary_items(["x", "y"]);
        b.add_colors(["A", "B", "C", "D"]);
        b.add_option(0, ["p", "q", "x:C", "y:A"]);
        b.add_option(1, ["p", "r", "x:A", "y:D"]);
        b.add_option(2, ["p", "x:B"]);
        b.add_option(3, ["q", "x:A"]);
        b.add_option(4, ["r", "y:B"]);
        let problem = b.build();

        let solutions = Solver::new(&problem).unwrap().solve_all();
        assert_eq!(solutions.len(), 1);
        let mut numbers: Vec<usize> = solutions[0].option_numbers().collect();
        numbers.sort_unstable();
        assert_eq!(numbers, vec![1, 3, 4]);
    }

    #[test]
    fn simple_multiplicity() {
        let mut b = Problem::builder();
        b.add_primary_item_with_bounds("A", 2, 2);
        b.add_option(0, ["A"]);
        b.add_option(1, ["A"]);
        let problem = b.build();

        let solutions = Solver::new(&problem).unwrap().solve_all();
        assert_eq!(solutions.len(), 1);
        let mut numbers: Vec<usize> = solutions[0].option_numbers().collect();
        numbers.sort_unstable();
        assert_eq!(numbers, vec![0, 1]);
    }

    #[test]
    fn slack_enumerates_every_admissible_subset() {
        let mut b = Problem::builder();
        b.add_primary_item_with_bounds("A", 2, 3);
        b.add_option(0, ["A"]);
        b.add_option(1, ["A"]);
        b.add_option(2, ["A"]);
        let problem = b.build();

        let solutions = Solver::new(&problem).unwrap().solve_all();
        let mut as_sets: Vec<Vec<usize>> = solutions
            .iter()
            .map(|s| {
                let mut v: Vec<usize> = s.option_numbers().collect();
                v.sort_unstable();
                v
            })
            .collect();
        as_sets.sort();
        assert_eq!(
            as_sets,
            vec![vec![0, 1], vec![0, 1, 2], vec![0, 2], vec![1, 2]]
        );
    }

    #[test]
    fn unsolvable_is_empty_not_an_error() {
        let mut b = Problem::builder();
        b.add_primary_item_with_bounds("A", 2, 2);
        b.add_option(0, ["A"]);
        let problem = b.build();

        let solutions = Solver::new(&problem).unwrap().solve_all();
        assert!(solutions.is_empty());
    }

    #[test]
    fn restores_to_construction_state_after_full_search() {
        let problem = toy();
        let mut solver = Solver::new(&problem).unwrap();
        let before = solver.checksum();
        assert!(solver.next().is_some());
        assert!(solver.next().is_none());
        assert_eq!(solver.checksum(), before);
    }

    #[test]
    fn reversibility_of_cover_uncover_on_every_item() {
        let problem = toy();
        let mut solver = Solver::new(&problem).unwrap();
        let num_primary = problem.num_primary_items() as u32;
        for item in 1..=num_primary {
            let before = solver.checksum();
            solver.cover(item);
            solver.uncover(item);
            assert_eq!(solver.checksum(), before, "item {item} did not round-trip");
        }
    }

    // Randomized invariant harness (spec.md §8.3): generate many small
    // random problems -- with multiplicities and colors, not just plain
    // exact cover -- and check that a full search always restores the
    // link store to its construction-time checksum (P6), and that every
    // primary item's cover/uncover round-trips byte-identically (P1) no
    // matter what the rest of the matrix looks like.
    fn random_problem(rng: &mut rand::rngs::StdRng) -> Problem<usize> {
        use rand::Rng;

        let num_primary = rng.gen_range(2..=5);
        let num_secondary = rng.gen_range(0..=3);
        let num_colors = rng.gen_range(1..=3);

        let mut b = Problem::builder();
        for p in 0..num_primary {
            let u = rng.gen_range(1..=2);
            let v = u + rng.gen_range(0..=2);
            b.add_primary_item_with_bounds(format!("p{p}"), u, v);
        }
        for s in 0..num_secondary {
            b.add_secondary_item(format!("s{s}"));
        }
        for col in 0..num_colors {
            b.add_color(format!("c{col}"));
        }

        let num_options = rng.gen_range(3..=10);
        for o in 0..num_options {
            // Every option touches at least one primary item, so the
            // search has something to branch on. Track chosen primary
            // indices in a set so an option never references the same
            // item twice.
            let mut primaries = std::collections::BTreeSet::new();
            primaries.insert(rng.gen_range(0..num_primary));
            for p in 0..num_primary {
                if rng.gen_bool(0.3) {
                    primaries.insert(p);
                }
            }
            let mut refs: Vec<String> = primaries.into_iter().map(|p| format!("p{p}")).collect();
            for s in 0..num_secondary {
                if rng.gen_bool(0.4) {
                    if rng.gen_bool(0.7) {
                        refs.push(format!("s{s}:c{}", rng.gen_range(0..num_colors)));
                    } else {
                        refs.push(format!("s{s}"));
                    }
                }
            }
            b.add_option(o, refs);
        }
        b.build()
    }

    #[test]
    fn randomized_full_search_always_restores_construction_state() {
        use rand::SeedableRng;
        let mut rng = rand::rngs::StdRng::seed_from_u64(0xD1A9_C0FE);
        for _ in 0..200 {
            let problem = random_problem(&mut rng);
            let mut solver = Solver::new(&problem).unwrap();
            let before = solver.checksum();
            let _ = solver.solve_all_for_test();
            assert_eq!(solver.checksum(), before);
        }
    }

    #[test]
    fn randomized_cover_uncover_round_trips_on_every_primary_item() {
        use rand::SeedableRng;
        let mut rng = rand::rngs::StdRng::seed_from_u64(0x5EED_F00D);
        for _ in 0..200 {
            let problem = random_problem(&mut rng);
            let mut solver = Solver::new(&problem).unwrap();
            let num_primary = problem.num_primary_items() as u32;
            for item in 1..=num_primary {
                let before = solver.checksum();
                solver.cover(item);
                solver.uncover(item);
                assert_eq!(solver.checksum(), before, "item {item} did not round-trip");
            }
        }
    }

    impl<'p, T> Solver<'p, T> {
        // Drains every solution without consuming `self`, for tests that
        // need to inspect the store afterward.
        fn solve_all_for_test(&mut self) -> Vec<Solution> {
            let mut out = Vec::new();
            while let Some(s) = self.next() {
                out.push(s);
            }
            out
        }
    }
}
