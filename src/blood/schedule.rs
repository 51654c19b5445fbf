use serde::{Deserialize, Serialize};

/// Standard sampling times (h post-dose)
pub const STANDARD_GRID: [f64; 24] = [
    0.0, 0.25, 0.5, 0.75, 1.0, 1.25, 1.5, 2.0, 2.5, 3.0, 4.0, 5.0, 6.0, 8.0, 10.0, 12.0, 16.0,
    20.0, 24.0, 30.0, 36.0, 48.0, 60.0, 72.0,
];

/// Longest sampling window (h)
pub const MAX_SAMPLING_HOURS: f64 = 72.0;
/// Half-lives to follow after the peak
const TERMINAL_HALF_LIVES: f64 = 3.0;
/// Assumed when tmax is unknown (h)
pub const DEFAULT_TMAX_HOURS: f64 = 1.0;
/// Assumed when t½ is unknown (h)
pub const DEFAULT_T_HALF_HOURS: f64 = 12.0;

/// Number of grid points kept on each side of the peak
const PEAK_NEIGHBOURS: usize = 3;
/// Of those, the number that can never be trimmed
const PROTECTED_NEIGHBOURS: usize = 2;
/// Terminal-phase points spread between the peak and the terminal anchor
const TERMINAL_POINTS: usize = 4;

/// Sampling window: `tmax + min(3·t½, 72)` rounded up to 24, 36, 48 or 72 h
pub fn sampling_duration(tmax_hours: Option<f64>, t_half_hours: Option<f64>) -> u32 {
    let tmax = tmax_hours.unwrap_or(DEFAULT_TMAX_HOURS);
    let t_half = t_half_hours.unwrap_or(DEFAULT_T_HALF_HOURS);
    let duration = tmax + (TERMINAL_HALF_LIVES * t_half).min(MAX_SAMPLING_HOURS);
    match duration {
        d if d <= 24.0 => 24,
        d if d <= 36.0 => 36,
        d if d <= 48.0 => 48,
        _ => 72,
    }
}

/// Draw-time grid builder
///
/// Works over a fixed grid of candidate times. A schedule always holds the
/// pre-dose sample, the grid point nearest tmax, up to three points on each
/// side of it, a terminal anchor near `min(3·t½, max_hours)` and a few
/// terminal-phase points. Gaps are then filled, or points trimmed, until the
/// schedule has the requested length or the grid is exhausted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingScheduleGenerator {
    grid: Vec<f64>,
}

impl Default for SamplingScheduleGenerator {
    fn default() -> Self {
        Self {
            grid: STANDARD_GRID.to_vec(),
        }
    }
}

impl SamplingScheduleGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the candidate grid; non-finite and negative times are dropped
    pub fn with_grid(mut self, grid: Vec<f64>) -> Self {
        let mut grid: Vec<f64> = grid
            .into_iter()
            .filter(|t| t.is_finite() && *t >= 0.0)
            .collect();
        grid.sort_by(f64::total_cmp);
        grid.dedup();
        self.grid = grid;
        self
    }

    pub fn grid(&self) -> &[f64] {
        &self.grid
    }

    /// Build an ordered, distinct list of draw times within `max_hours`
    pub fn schedule(&self, n_points: usize, tmax: f64, t_half: f64, max_hours: f64) -> Vec<f64> {
        let grid: Vec<f64> = self
            .grid
            .iter()
            .copied()
            .filter(|&t| t <= max_hours)
            .collect();
        let Some(&grid_end) = grid.last() else {
            return vec![0.0];
        };

        let tmax_snap = snap(tmax, &grid);

        let before: Vec<f64> = grid
            .iter()
            .copied()
            .filter(|&t| t > 0.0 && t < tmax_snap)
            .collect();
        let before = before[before.len().saturating_sub(PEAK_NEIGHBOURS)..].to_vec();
        let after: Vec<f64> = grid
            .iter()
            .copied()
            .filter(|&t| t > tmax_snap)
            .take(PEAK_NEIGHBOURS)
            .collect();

        let mut last_snap = snap((TERMINAL_HALF_LIVES * t_half).min(max_hours), &grid);
        if last_snap <= tmax_snap {
            last_snap = grid_end;
        }

        let mut selected = vec![0.0, tmax_snap, last_snap];
        selected.extend(&before);
        selected.extend(&after);

        let endpoint = snap(max_hours, &grid);
        if endpoint > last_snap {
            selected.push(endpoint);
        }

        let terminal_start = after.last().copied().unwrap_or(tmax_snap);
        let terminal: Vec<f64> = grid
            .iter()
            .copied()
            .filter(|&t| t > terminal_start && t <= last_snap)
            .collect();
        if terminal.len() > TERMINAL_POINTS {
            let step = terminal.len() as f64 / TERMINAL_POINTS as f64;
            let mut spread: Vec<f64> = (0..TERMINAL_POINTS)
                .map(|i| terminal[(i as f64 * step) as usize])
                .collect();
            if !spread.contains(&last_snap) {
                spread[TERMINAL_POINTS - 1] = last_snap;
            }
            selected.extend(spread);
        } else {
            selected.extend(terminal);
        }

        selected.sort_by(f64::total_cmp);
        selected.dedup();

        let mut remaining: Vec<f64> = grid
            .iter()
            .copied()
            .filter(|t| !selected.contains(t))
            .collect();
        fill_gaps(&mut selected, &mut remaining, n_points);

        let mut protected = vec![0.0, tmax_snap, last_snap];
        protected.extend(before.iter().take(PROTECTED_NEIGHBOURS));
        protected.extend(after.iter().take(PROTECTED_NEIGHBOURS));
        trim(&mut selected, &protected, n_points);

        selected
    }
}

/// Grid point nearest `value`; the earlier point wins a tie
fn snap(value: f64, grid: &[f64]) -> f64 {
    let mut best = value;
    let mut best_distance = f64::INFINITY;
    for &t in grid {
        let distance = (t - value).abs();
        if distance < best_distance {
            best = t;
            best_distance = distance;
        }
    }
    best
}

/// Insert unused grid points at the middle of the widest gap until full
fn fill_gaps(selected: &mut Vec<f64>, remaining: &mut Vec<f64>, n_points: usize) {
    while selected.len() < n_points && !remaining.is_empty() {
        let mut best_gap = 0.0;
        let mut best_insert = None;

        for pair in selected.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            let gap = hi - lo;
            if gap <= best_gap {
                continue;
            }
            let mid = (lo + hi) / 2.0;
            let candidate = remaining
                .iter()
                .copied()
                .filter(|&t| t > lo && t < hi)
                .fold(None, |best: Option<f64>, t| match best {
                    Some(b) if (b - mid).abs() <= (t - mid).abs() => Some(b),
                    _ => Some(t),
                });
            if let Some(t) = candidate {
                best_gap = gap;
                best_insert = Some(t);
            }
        }

        let Some(t) = best_insert else {
            break;
        };
        remaining.retain(|&r| r != t);
        let index = selected.partition_point(|&s| s < t);
        selected.insert(index, t);
    }
}

/// Remove the interior point whose neighbours are closest together until short enough
fn trim(selected: &mut Vec<f64>, protected: &[f64], n_points: usize) {
    while selected.len() > n_points {
        let mut worst = None;
        let mut min_impact = f64::INFINITY;

        for index in 1..selected.len().saturating_sub(1) {
            if protected.contains(&selected[index]) {
                continue;
            }
            let impact = selected[index + 1] - selected[index - 1];
            if impact < min_impact {
                min_impact = impact;
                worst = Some(index);
            }
        }

        match worst {
            Some(index) => {
                selected.remove(index);
            }
            None => break,
        }
    }
}

/// Protocol wording for a schedule
///
/// `"30 min before dosing and 15, 30, 45 minutes, 1, 1.5, 2 hours after dosing"`
pub fn format_sampling_times(times: &[f64]) -> String {
    if times.is_empty() {
        return String::new();
    }

    let minutes: Vec<String> = times
        .iter()
        .filter(|&&t| t > 0.0 && t < 1.0)
        .map(|t| ((t * 60.0) as u32).to_string())
        .collect();
    let hours: Vec<String> = times
        .iter()
        .filter(|&&t| t >= 1.0)
        .map(|&t| {
            if t.fract() == 0.0 {
                format!("{}", t as u32)
            } else {
                format!("{t}")
            }
        })
        .collect();

    let mut post = Vec::new();
    if !minutes.is_empty() {
        post.push(format!("{} minutes", minutes.join(", ")));
    }
    if !hours.is_empty() {
        post.push(format!("{} hours", hours.join(", ")));
    }

    format!(
        "30 min before dosing of the test/reference product and {} after dosing",
        post.join(", ")
    )
}
