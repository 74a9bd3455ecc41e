//! Benchmark driver comparing heap-allocated trees against arena-backed ones.
//!
//! Every strategy runs the same schedule: a stretch tree one level deeper than
//! the maximum depth, a long-lived tree that stays alive across all rounds,
//! and rounds of many short-lived trees at increasing depths.

use std::fmt;
use std::time::Duration;

use indicatif::{ParallelProgressIterator, ProgressBar, ProgressIterator, ProgressStyle};
use log::{debug, info};
use rayon::prelude::*;
use serde::Serialize;

use crate::arena::Arena;
use crate::boxed;
use crate::error::ArenaError;
use crate::timer::Timer;
use crate::tree;

pub const MIN_DEPTH: u32 = 4;
pub const DEFAULT_MAX_DEPTH: u32 = 10;
pub const DEFAULT_TASKS: usize = 4;

/// Deepest tree the driver will build; keeps round sizes within `u64`.
pub const MAX_DEPTH: u32 = 30;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// One heap allocation per node.
    Boxed,
    /// Two reusable arenas, reset between trees.
    Pooled,
    /// Rounds fanned out over rayon, one private arena per task.
    Parallel,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Boxed, Strategy::Pooled, Strategy::Parallel];

    pub fn friendly_name(&self) -> &'static str {
        match self {
            Strategy::Boxed => "boxed",
            Strategy::Pooled => "pooled",
            Strategy::Parallel => "parallel",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.friendly_name())
    }
}

////////////////////////////////////////////////////////////////////////////////

#[derive(Clone, Debug)]
pub struct BenchConfig {
    pub min_depth: u32,
    pub max_depth: u32,
    pub tasks: usize,
    pub progress: bool,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            min_depth: MIN_DEPTH,
            max_depth: DEFAULT_MAX_DEPTH,
            tasks: DEFAULT_TASKS,
            progress: false,
        }
    }
}

impl BenchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_depth(mut self, min_depth: u32) -> Self {
        self.min_depth = min_depth;
        self
    }

    pub fn max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    // NOTE: zero is bumped to one
    pub fn tasks(mut self, tasks: usize) -> Self {
        self.tasks = tasks.max(1);
        self
    }

    pub fn progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// The requested maximum, raised so at least two rounds run and capped at
    /// [`MAX_DEPTH`].
    pub fn effective_max_depth(&self) -> u32 {
        self.max_depth
            .max(self.min_depth.saturating_add(2))
            .min(MAX_DEPTH)
    }

    fn effective_min_depth(&self) -> u32 {
        self.min_depth.min(MAX_DEPTH - 2)
    }

    pub fn depths(&self) -> Vec<u32> {
        (self.effective_min_depth()..=self.effective_max_depth())
            .step_by(2)
            .collect()
    }

    /// Trees built in the round at `depth`. Shallow rounds build more trees so
    /// every round allocates roughly the same number of nodes.
    pub fn iterations(&self, depth: u32) -> u64 {
        let max_depth = self.effective_max_depth();
        1 << (max_depth - depth.min(max_depth) + self.effective_min_depth())
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.progress {
            return ProgressBar::hidden();
        }
        let style = ProgressStyle::with_template("{msg} [{bar:40}] {pos}/{len} depths")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        ProgressBar::new(len as u64).with_style(style)
    }
}

////////////////////////////////////////////////////////////////////////////////

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Line {
    Stretch { depth: u32, check: u64 },
    Trees { iterations: u64, depth: u32, check: u64 },
    LongLived { depth: u32, check: u64 },
}

impl Line {
    pub fn check(&self) -> u64 {
        match *self {
            Line::Stretch { check, .. }
            | Line::Trees { check, .. }
            | Line::LongLived { check, .. } => check,
        }
    }

    pub fn expected(&self) -> u64 {
        match *self {
            Line::Stretch { depth, .. } | Line::LongLived { depth, .. } => {
                tree::checksum_for_depth(depth)
            }
            Line::Trees {
                iterations, depth, ..
            } => iterations * tree::checksum_for_depth(depth),
        }
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Line::Stretch { depth, check } => {
                write!(f, "stretch tree of depth {depth}\t check: {check}")
            }
            Line::Trees {
                iterations,
                depth,
                check,
            } => write!(f, "{iterations}\t trees of depth {depth}\t check: {check}"),
            Line::LongLived { depth, check } => {
                write!(f, "long lived tree of depth {depth}\t check: {check}")
            }
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Report {
    pub strategy: Strategy,
    pub lines: Vec<Line>,
    pub elapsed: Duration,
}

impl Report {
    /// Lines whose checksum disagrees with the closed form for their shape.
    pub fn mismatches(&self) -> impl Iterator<Item = &Line> {
        self.lines.iter().filter(|line| line.check() != line.expected())
    }

    pub fn is_valid(&self) -> bool {
        self.mismatches().next().is_none()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////

pub fn run(strategy: Strategy, config: &BenchConfig) -> Result<Report, ArenaError> {
    info!(
        "{strategy}: depths {}..={}, {} tasks",
        config.effective_min_depth(),
        config.effective_max_depth(),
        config.tasks
    );
    let timer = Timer::new();
    let lines = match strategy {
        Strategy::Boxed => run_boxed(config),
        Strategy::Pooled => run_pooled(config)?,
        Strategy::Parallel => run_parallel(config)?,
    };
    let elapsed = timer.elapsed();
    debug!("{strategy}: finished in {elapsed:?}");

    Ok(Report {
        strategy,
        lines,
        elapsed,
    })
}

fn run_boxed(config: &BenchConfig) -> Vec<Line> {
    let max_depth = config.effective_max_depth();
    let stretch_depth = max_depth + 1;

    let mut lines = vec![Line::Stretch {
        depth: stretch_depth,
        check: boxed::checksum(&boxed::build(stretch_depth)),
    }];

    let long_lived = boxed::build(max_depth);

    let depths = config.depths();
    let bar = config.progress_bar(depths.len());
    for depth in depths.into_iter().progress_with(bar) {
        let iterations = config.iterations(depth);
        let check = (0..iterations)
            .map(|_| boxed::checksum(&boxed::build(depth)))
            .sum();
        debug!("boxed: {iterations} trees of depth {depth}");
        lines.push(Line::Trees {
            iterations,
            depth,
            check,
        });
    }

    lines.push(Line::LongLived {
        depth: max_depth,
        check: boxed::checksum(&long_lived),
    });
    lines
}

/// Build and check `iterations` trees, resetting `arena` before each one.
fn check_trees(arena: &mut Arena, depth: u32, iterations: u64) -> Result<u64, ArenaError> {
    let mut check = 0;
    for _ in 0..iterations {
        arena.reset();
        let root = tree::build(arena, depth)?;
        check += tree::checksum(arena, root)?;
    }
    Ok(check)
}

fn run_pooled(config: &BenchConfig) -> Result<Vec<Line>, ArenaError> {
    let max_depth = config.effective_max_depth();
    let stretch_depth = max_depth + 1;

    let mut pool = Arena::for_depth(max_depth)?;
    let mut long_pool = Arena::for_depth(max_depth)?;

    let stretch_tree = tree::build(&mut long_pool, stretch_depth)?;
    let mut lines = vec![Line::Stretch {
        depth: stretch_depth,
        check: tree::checksum(&long_pool, stretch_tree)?,
    }];

    long_pool.reset();
    let long_lived = tree::build(&mut long_pool, max_depth)?;

    let depths = config.depths();
    let bar = config.progress_bar(depths.len());
    for depth in depths.into_iter().progress_with(bar) {
        let iterations = config.iterations(depth);
        let check = check_trees(&mut pool, depth, iterations)?;
        debug!("pooled: {iterations} trees of depth {depth}");
        lines.push(Line::Trees {
            iterations,
            depth,
            check,
        });
    }

    lines.push(Line::LongLived {
        depth: max_depth,
        check: tree::checksum(&long_pool, long_lived)?,
    });

    pool.destroy();
    long_pool.destroy();
    Ok(lines)
}

fn stretch_line(depth: u32) -> Result<Line, ArenaError> {
    let mut arena = Arena::for_depth(depth)?;
    let root = tree::build(&mut arena, depth)?;
    Ok(Line::Stretch {
        depth,
        check: tree::checksum(&arena, root)?,
    })
}

fn parallel_round(config: &BenchConfig, depth: u32) -> Result<Line, ArenaError> {
    let tasks = config.tasks.max(1);
    let per_task = config.iterations(depth) / tasks as u64;
    let check = (0..tasks)
        .into_par_iter()
        .map(|_| {
            let mut arena = Arena::for_depth(depth)?;
            check_trees(&mut arena, depth, per_task)
        })
        .try_reduce(|| 0, |a, b| Ok(a + b))?;
    debug!("parallel: {} trees of depth {depth}", per_task * tasks as u64);

    Ok(Line::Trees {
        iterations: per_task * tasks as u64,
        depth,
        check,
    })
}

fn run_parallel(config: &BenchConfig) -> Result<Vec<Line>, ArenaError> {
    let max_depth = config.effective_max_depth();

    let mut long_pool = Arena::for_depth(max_depth)?;
    let long_lived = tree::build(&mut long_pool, max_depth)?;

    let depths = config.depths();
    let bar = config.progress_bar(depths.len());
    let (stretch, rounds) = rayon::join(
        || stretch_line(max_depth + 1),
        || {
            depths
                .into_par_iter()
                .progress_with(bar)
                .map(|depth| parallel_round(config, depth))
                .collect::<Result<Vec<_>, _>>()
        },
    );

    let mut lines = vec![stretch?];
    lines.extend(rounds?);
    lines.push(Line::LongLived {
        depth: max_depth,
        check: tree::checksum(&long_pool, long_lived)?,
    });
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> BenchConfig {
        BenchConfig::new().max_depth(8)
    }

    #[test]
    fn depth_schedule() {
        let config = BenchConfig::new().max_depth(10);
        assert_eq!(config.depths(), vec![4, 6, 8, 10]);
        assert_eq!(config.iterations(4), 1024);
        assert_eq!(config.iterations(10), 16);
    }

    #[test]
    fn max_depth_is_raised() {
        let config = BenchConfig::new().max_depth(0);
        assert_eq!(config.effective_max_depth(), MIN_DEPTH + 2);
        assert_eq!(config.depths(), vec![4, 6]);
    }

    #[test]
    fn max_depth_is_capped() {
        let config = BenchConfig::new().max_depth(u32::MAX);
        assert_eq!(config.effective_max_depth(), MAX_DEPTH);
    }

    #[test]
    fn zero_tasks() {
        assert_eq!(BenchConfig::new().tasks(0).tasks, 1);
    }

    #[test]
    fn line_format() {
        let stretch = Line::Stretch { depth: 11, check: 4095 };
        assert_eq!(stretch.to_string(), "stretch tree of depth 11\t check: 4095");

        let trees = Line::Trees {
            iterations: 1024,
            depth: 4,
            check: 31744,
        };
        assert_eq!(trees.to_string(), "1024\t trees of depth 4\t check: 31744");
        assert_eq!(trees.expected(), 31744);

        let long_lived = Line::LongLived {
            depth: 10,
            check: 2047,
        };
        assert_eq!(
            long_lived.to_string(),
            "long lived tree of depth 10\t check: 2047"
        );
    }

    #[test]
    fn mismatch_detected() {
        let report = Report {
            strategy: Strategy::Pooled,
            lines: vec![Line::LongLived { depth: 3, check: 14 }],
            elapsed: Duration::default(),
        };
        assert!(!report.is_valid());
        assert_eq!(report.mismatches().count(), 1);
    }

    #[test]
    fn pooled_report() {
        let report = run(Strategy::Pooled, &small()).unwrap();
        assert!(report.is_valid());
        let text = report.to_string();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "stretch tree of depth 9\t check: 1023",
                "256\t trees of depth 4\t check: 7936",
                "64\t trees of depth 6\t check: 8128",
                "16\t trees of depth 8\t check: 8176",
                "long lived tree of depth 8\t check: 511",
            ]
        );
    }

    #[test]
    fn strategies_agree() {
        let config = small();
        let expected = run(Strategy::Boxed, &config).unwrap();
        assert!(expected.is_valid());
        for strategy in [Strategy::Pooled, Strategy::Parallel] {
            let report = run(strategy, &config).unwrap();
            assert!(report.is_valid(), "{strategy}");
            assert_eq!(report.lines, expected.lines, "{strategy}");
        }
    }

    #[test]
    fn parallel_rounds_down_iterations() {
        let config = small().tasks(3);
        let report = run(Strategy::Parallel, &config).unwrap();
        assert!(report.is_valid());
        assert_eq!(
            report.lines[1],
            Line::Trees {
                iterations: 255,
                depth: 4,
                check: 255 * 31
            }
        );
    }

    #[test]
    fn report_json() {
        let report = run(Strategy::Boxed, &small()).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["strategy"], "boxed");
        assert_eq!(json["lines"][0]["kind"], "stretch");
        assert_eq!(json["lines"][0]["check"], 1023);
        assert_eq!(json["lines"][4]["kind"], "long_lived");
    }
}
