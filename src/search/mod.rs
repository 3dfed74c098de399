//! Tiled grid search around a position estimate.
//!
//! The template patch is the centered `template_size` crop of the template
//! image; the clip is the `search_size` crop of the reference centered at the
//! estimate. Template-sized windows are laid out on a grid inside the clip,
//! each window is scored by the selected strategy and the ranked candidates
//! are reduced to one position.

pub(crate) mod aggregate;
pub mod grid;
pub(crate) mod scan;

use crate::candidate::{rank_candidates, Candidate};
use crate::image::{centered_origin, ImageView, Pixel};
use crate::kernel::phase::PhaseKernel;
use crate::kernel::Kernel;
use crate::refine::PeakRefinement;
use crate::search::aggregate::{average_top, to_pixel};
use crate::search::grid::SearchGrid;
use crate::search::scan::{scan_grid, Placement, ScanOutcome};
use crate::template::{PhasePlan, ZnccPlan};
use crate::trace::{trace_event, trace_span};
use crate::util::{PhaseMatchError, PhaseMatchResult};
use std::time::{Duration, Instant};

#[cfg(not(feature = "simd"))]
use crate::kernel::scalar::ZnccScalar as ZnccKernel;
#[cfg(feature = "simd")]
use crate::kernel::simd::ZnccSimd as ZnccKernel;

/// Default side length of the search clip.
pub const DEFAULT_SEARCH_SIZE: usize = 450;
/// Default side length of the template patch.
pub const DEFAULT_TEMPLATE_SIZE: usize = 300;
/// Default pixel stride between candidate windows.
pub const DEFAULT_GRID_STEP: usize = 50;
/// Default number of top candidates averaged by phase correlation.
pub const DEFAULT_CANDIDATE_COUNT: usize = 3;

/// Window scoring strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Strategy {
    /// Windowed phase correlation, top-K averaged.
    #[default]
    Phase,
    /// Pearson correlation, best single window.
    Zncc,
}

impl Strategy {
    /// Lowercase name used in logs and configuration files.
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Phase => "phase",
            Strategy::Zncc => "zncc",
        }
    }
}

/// Handling of a search span that is not a multiple of the grid step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GridPolicy {
    /// Drop the partial final step.
    #[default]
    Truncate,
    /// Reject the configuration with `UnevenGridStep`.
    Strict,
}

/// Conversion of the averaged position to whole pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Rounding {
    /// Toward zero.
    #[default]
    Truncate,
    /// Nearest integer, halves away from zero.
    Nearest,
}

/// Configuration for [`Matcher`].
#[derive(Clone, Debug, PartialEq)]
pub struct MatchConfig {
    /// Window scoring strategy.
    pub strategy: Strategy,
    /// Number of top candidates averaged (phase strategy).
    pub candidate_count: usize,
    /// Side length of the search clip around the estimate.
    pub search_size: usize,
    /// Side length of the template patch and of every candidate window.
    pub template_size: usize,
    /// Horizontal stride between candidate windows.
    pub step_x: usize,
    /// Vertical stride between candidate windows.
    pub step_y: usize,
    /// Partial step handling.
    pub grid_policy: GridPolicy,
    /// Integer conversion of the final position.
    pub rounding: Rounding,
    /// Sub-pixel refinement of phase correlation peaks.
    pub refinement: PeakRefinement,
    /// Score windows on the rayon pool when the `rayon` feature is enabled.
    pub parallel: bool,
    /// Time budget for the scan; the best result so far is returned once it
    /// elapses.
    pub deadline: Option<Duration>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Phase,
            candidate_count: DEFAULT_CANDIDATE_COUNT,
            search_size: DEFAULT_SEARCH_SIZE,
            template_size: DEFAULT_TEMPLATE_SIZE,
            step_x: DEFAULT_GRID_STEP,
            step_y: DEFAULT_GRID_STEP,
            grid_policy: GridPolicy::Truncate,
            rounding: Rounding::Truncate,
            refinement: PeakRefinement::None,
            parallel: false,
            deadline: None,
        }
    }
}

impl MatchConfig {
    /// Sets both grid steps.
    pub fn with_grid_step(mut self, step: usize) -> Self {
        self.step_x = step;
        self.step_y = step;
        self
    }

    /// Checks sizes, steps and the candidate count against the grid.
    pub fn validate(&self) -> PhaseMatchResult<()> {
        self.grid().map(|_| ())
    }

    pub(crate) fn grid(&self) -> PhaseMatchResult<SearchGrid> {
        let grid = SearchGrid::new(
            self.search_size,
            self.template_size,
            self.step_x,
            self.step_y,
            self.grid_policy,
        )?;
        if self.candidate_count == 0 || self.candidate_count > grid.len() {
            return Err(PhaseMatchError::CandidateCountOutOfRange {
                count: self.candidate_count,
                available: grid.len(),
            });
        }
        Ok(grid)
    }
}

/// Result of a registration.
#[derive(Clone, Debug, PartialEq)]
pub struct Registration {
    /// Template center in the reference image, whole pixels.
    pub x: i64,
    /// Template center in the reference image, whole pixels.
    pub y: i64,
    /// Unrounded mean of the selected candidates.
    pub mean_x: f64,
    /// Unrounded mean of the selected candidates.
    pub mean_y: f64,
    /// Score of the best candidate.
    pub score: f64,
    /// Number of candidates that entered the mean.
    pub averaged: usize,
    /// Every scored candidate, best first.
    pub candidates: Vec<Candidate>,
    /// True if the deadline stopped the scan before the grid was exhausted.
    pub truncated: bool,
}

/// Grid search registration engine.
#[derive(Clone, Debug, Default)]
pub struct Matcher {
    cfg: MatchConfig,
}

impl Matcher {
    /// Creates a matcher; the configuration is checked on every call.
    pub fn new(cfg: MatchConfig) -> Self {
        Self { cfg }
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &MatchConfig {
        &self.cfg
    }

    /// Locates `template_image` in `reference` around the estimate `(x, y)`.
    pub fn register<T: Pixel, U: Pixel>(
        &self,
        template_image: ImageView<'_, T>,
        reference: ImageView<'_, U>,
        x: f64,
        y: f64,
    ) -> PhaseMatchResult<Registration> {
        let cfg = &self.cfg;
        let _span = trace_span!(
            "register",
            strategy = cfg.strategy.as_str(),
            x = x,
            y = y
        )
        .entered();

        if !x.is_finite() || !y.is_finite() {
            return Err(PhaseMatchError::InvalidConfig(
                "position estimate must be finite",
            ));
        }
        let grid = cfg.grid()?;
        let deadline = cfg.deadline.map(|budget| Instant::now() + budget);
        let size = cfg.template_size;

        let tpl = template_image.crop_center(size, size)?;
        let (clip_x, clip_y) = centered_origin(x, y, cfg.search_size, cfg.search_size);
        let clip = reference.crop(clip_x, clip_y, cfg.search_size, cfg.search_size)?;
        trace_event!(
            "grid",
            clip_x = clip_x,
            clip_y = clip_y,
            windows = grid.len()
        );

        let outcome = match cfg.strategy {
            Strategy::Phase => {
                let plan = PhasePlan::from_view(tpl, cfg.refinement)?;
                let placement = window_placement(clip_x, clip_y, (size / 2) as f64, size);
                self.scan::<PhaseKernel, U>(clip, &grid, &plan, placement, deadline)?
            }
            Strategy::Zncc => {
                let plan = ZnccPlan::from_view(tpl)?;
                let placement = window_placement(clip_x, clip_y, size as f64 / 2.0, size);
                self.scan::<ZnccKernel, U>(clip, &grid, &plan, placement, deadline)?
            }
        };

        let ScanOutcome {
            mut candidates,
            truncated,
        } = outcome;
        trace_event!(
            "scan_complete",
            scored = candidates.len(),
            truncated = truncated
        );
        rank_candidates(&mut candidates);

        let (mean_x, mean_y, averaged) = match cfg.strategy {
            Strategy::Phase => average_top(&candidates, cfg.candidate_count)?,
            Strategy::Zncc => {
                let best = candidates
                    .first()
                    .filter(|c| c.score.is_finite())
                    .ok_or(PhaseMatchError::DegenerateScore {
                        candidates: candidates.len(),
                    })?;
                (best.x, best.y, 1)
            }
        };
        let score = candidates.first().map_or(f64::NAN, |c| c.score);

        let registration = Registration {
            x: to_pixel(mean_x, cfg.rounding),
            y: to_pixel(mean_y, cfg.rounding),
            mean_x,
            mean_y,
            score,
            averaged,
            candidates,
            truncated,
        };
        trace_event!(
            "registration",
            x = registration.x,
            y = registration.y,
            score = registration.score,
            averaged = registration.averaged
        );
        Ok(registration)
    }

    /// Like [`Matcher::register`] but returns only the integer position.
    pub fn match_position<T: Pixel, U: Pixel>(
        &self,
        template_image: ImageView<'_, T>,
        reference: ImageView<'_, U>,
        x: f64,
        y: f64,
    ) -> PhaseMatchResult<(i64, i64)> {
        self.register(template_image, reference, x, y)
            .map(|reg| (reg.x, reg.y))
    }

    fn scan<K: Kernel, U: Pixel>(
        &self,
        clip: ImageView<'_, U>,
        grid: &SearchGrid,
        plan: &K::Plan,
        placement: Placement,
        deadline: Option<Instant>,
    ) -> PhaseMatchResult<ScanOutcome> {
        #[cfg(feature = "rayon")]
        if self.cfg.parallel {
            return crate::kernel::rayon::scan_grid_par::<K, U>(
                clip, grid, plan, placement, deadline,
            );
        }
        scan_grid::<K, U>(clip, grid, plan, placement, deadline)
    }
}

fn window_placement(clip_x: i64, clip_y: i64, center: f64, size: usize) -> Placement {
    Placement {
        origin_x: clip_x as f64,
        origin_y: clip_y as f64,
        center,
        size,
    }
}

/// Applies a calibrated camera offset `(er_x, er_y)` to a position estimate.
///
/// The offset is measured with y pointing north while image rows grow
/// southward, so `er_x` is added and `er_y` is subtracted.
pub fn corrected_estimate(x: f64, y: f64, er_x: f64, er_y: f64) -> (f64, f64) {
    (x + er_x, y - er_y)
}

/// Phase correlation registration with the default geometry.
///
/// Averages the top `count` of the grid candidates spaced `grid_step`
/// apart and truncates the mean toward zero.
pub fn phase_match<T: Pixel, U: Pixel>(
    template_image: ImageView<'_, T>,
    reference: ImageView<'_, U>,
    x: f64,
    y: f64,
    count: usize,
    grid_step: usize,
) -> PhaseMatchResult<(i64, i64)> {
    let cfg = MatchConfig {
        candidate_count: count,
        ..MatchConfig::default()
    }
    .with_grid_step(grid_step);
    Matcher::new(cfg).match_position(template_image, reference, x, y)
}

/// Pearson correlation registration with the default geometry.
///
/// Returns the center of the best scoring window.
pub fn template_match<T: Pixel, U: Pixel>(
    template_image: ImageView<'_, T>,
    reference: ImageView<'_, U>,
    x: f64,
    y: f64,
    grid_step: usize,
) -> PhaseMatchResult<(i64, i64)> {
    let cfg = MatchConfig {
        strategy: Strategy::Zncc,
        ..MatchConfig::default()
    }
    .with_grid_step(grid_step);
    Matcher::new(cfg).match_position(template_image, reference, x, y)
}

#[cfg(test)]
mod tests {
    use super::{corrected_estimate, MatchConfig, Matcher, Strategy};
    use crate::util::PhaseMatchError;

    #[test]
    fn default_config_is_valid() {
        let cfg = MatchConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.strategy, Strategy::Phase);
        assert_eq!(Matcher::default().config(), &cfg);
    }

    #[test]
    fn candidate_count_must_fit_grid() {
        let cfg = MatchConfig {
            candidate_count: 10,
            ..MatchConfig::default()
        };
        assert_eq!(
            cfg.validate().unwrap_err(),
            PhaseMatchError::CandidateCountOutOfRange {
                count: 10,
                available: 9,
            }
        );
        let cfg = MatchConfig {
            candidate_count: 0,
            ..MatchConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(PhaseMatchError::CandidateCountOutOfRange { count: 0, .. })
        ));
    }

    #[test]
    fn grid_step_sets_both_axes() {
        let cfg = MatchConfig::default().with_grid_step(25);
        assert_eq!((cfg.step_x, cfg.step_y), (25, 25));
    }

    #[test]
    fn camera_offset_moves_y_against_rows() {
        assert_eq!(corrected_estimate(100.0, 200.0, 5.0, 7.0), (105.0, 193.0));
        assert_eq!(corrected_estimate(100.0, 200.0, -5.0, -7.0), (95.0, 207.0));
        assert_eq!(corrected_estimate(1.5, 2.5, 0.0, 0.0), (1.5, 2.5));
    }
}
