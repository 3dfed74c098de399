//! Python bindings for the phasematch registration engine.
//!
//! Images are passed as C-contiguous 2D numpy arrays (height x width) of
//! `uint8`, `uint16`, `float32` or `float64`.

use numpy::{PyReadonlyArray2, PyUntypedArrayMethods};
use pyo3::exceptions::{PyIOError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use std::time::Duration;

use phasematch::{
    corrected_estimate, load_gray_image, Candidate as RustCandidate, ErrorKind, GridPolicy,
    ImageView, MatchConfig as RustMatchConfig, Matcher as RustMatcher, PeakRefinement,
    PhaseMatchError, Pixel, Registration as RustRegistration, Rounding, Strategy,
};

/// Convert a PhaseMatchError to the closest Python exception.
fn to_py_err(err: PhaseMatchError) -> PyErr {
    match err.kind() {
        ErrorKind::Io => PyIOError::new_err(err.to_string()),
        ErrorKind::InvalidDimensions | ErrorKind::Configuration => {
            PyValueError::new_err(err.to_string())
        }
        ErrorKind::DegenerateScore => PyRuntimeError::new_err(err.to_string()),
    }
}

fn view_of<'a, T: Pixel + numpy::Element>(
    array: &'a PyReadonlyArray2<'_, T>,
) -> PyResult<ImageView<'a, T>> {
    let shape = array.shape();
    let height = shape[0];
    let width = shape[1];
    let data = array.as_slice()?;
    ImageView::from_slice(data, width, height).map_err(to_py_err)
}

/// A 2D intensity array of any supported dtype.
#[derive(FromPyObject)]
enum ImageArray<'py> {
    U8(PyReadonlyArray2<'py, u8>),
    U16(PyReadonlyArray2<'py, u16>),
    F32(PyReadonlyArray2<'py, f32>),
    F64(PyReadonlyArray2<'py, f64>),
}

#[derive(Clone, Copy)]
enum AnyView<'a> {
    U8(ImageView<'a, u8>),
    U16(ImageView<'a, u16>),
    F32(ImageView<'a, f32>),
    F64(ImageView<'a, f64>),
}

impl ImageArray<'_> {
    fn view(&self) -> PyResult<AnyView<'_>> {
        Ok(match self {
            Self::U8(array) => AnyView::U8(view_of(array)?),
            Self::U16(array) => AnyView::U16(view_of(array)?),
            Self::F32(array) => AnyView::F32(view_of(array)?),
            Self::F64(array) => AnyView::F64(view_of(array)?),
        })
    }
}

/// Runs `$body` with `$t` and `$r` bound to the concrete template and
/// reference views.
macro_rules! with_views {
    (@reference $reference:expr, $r:ident, $body:expr) => {
        match $reference {
            AnyView::U8($r) => $body,
            AnyView::U16($r) => $body,
            AnyView::F32($r) => $body,
            AnyView::F64($r) => $body,
        }
    };
    ($tpl:expr, $reference:expr, |$t:ident, $r:ident| $body:expr) => {
        match $tpl {
            AnyView::U8($t) => with_views!(@reference $reference, $r, $body),
            AnyView::U16($t) => with_views!(@reference $reference, $r, $body),
            AnyView::F32($t) => with_views!(@reference $reference, $r, $body),
            AnyView::F64($t) => with_views!(@reference $reference, $r, $body),
        }
    };
}

fn parse_choice<T: Copy>(name: &str, value: &str, choices: &[(&str, T)]) -> PyResult<T> {
    let lower = value.to_lowercase();
    choices
        .iter()
        .find(|(key, _)| *key == lower)
        .map(|(_, v)| *v)
        .ok_or_else(|| {
            let names: Vec<&str> = choices.iter().map(|(key, _)| *key).collect();
            PyValueError::new_err(format!("{name} must be one of {names:?}"))
        })
}

/// One scored candidate window.
#[pyclass]
#[derive(Clone)]
pub struct Candidate {
    /// Estimated template center x in reference pixels.
    #[pyo3(get)]
    pub x: f64,
    /// Estimated template center y in reference pixels.
    #[pyo3(get)]
    pub y: f64,
    /// Phase correlation peak or Pearson coefficient.
    #[pyo3(get)]
    pub score: f64,
    /// Grid generation index.
    #[pyo3(get)]
    pub grid_idx: usize,
}

#[pymethods]
impl Candidate {
    fn __repr__(&self) -> String {
        format!(
            "Candidate(x={:.2}, y={:.2}, score={:.4}, grid_idx={})",
            self.x, self.y, self.score, self.grid_idx
        )
    }
}

impl From<RustCandidate> for Candidate {
    fn from(c: RustCandidate) -> Self {
        Self {
            x: c.x,
            y: c.y,
            score: c.score,
            grid_idx: c.grid_idx,
        }
    }
}

/// Registration result.
#[pyclass]
#[derive(Clone)]
pub struct Registration {
    /// Template center x, whole pixels.
    #[pyo3(get)]
    pub x: i64,
    /// Template center y, whole pixels.
    #[pyo3(get)]
    pub y: i64,
    /// Unrounded mean x of the selected candidates.
    #[pyo3(get)]
    pub mean_x: f64,
    /// Unrounded mean y of the selected candidates.
    #[pyo3(get)]
    pub mean_y: f64,
    /// Best candidate score.
    #[pyo3(get)]
    pub score: f64,
    /// Number of candidates averaged.
    #[pyo3(get)]
    pub averaged: usize,
    /// True if the deadline cut the scan short.
    #[pyo3(get)]
    pub truncated: bool,
    /// Every scored candidate, best first.
    #[pyo3(get)]
    pub candidates: Vec<Candidate>,
}

#[pymethods]
impl Registration {
    fn __repr__(&self) -> String {
        format!(
            "Registration(x={}, y={}, score={:.4}, averaged={}, truncated={})",
            self.x, self.y, self.score, self.averaged, self.truncated
        )
    }
}

impl From<RustRegistration> for Registration {
    fn from(r: RustRegistration) -> Self {
        Self {
            x: r.x,
            y: r.y,
            mean_x: r.mean_x,
            mean_y: r.mean_y,
            score: r.score,
            averaged: r.averaged,
            truncated: r.truncated,
            candidates: r.candidates.into_iter().map(Candidate::from).collect(),
        }
    }
}

/// Configuration for the grid search.
#[pyclass]
#[derive(Clone)]
pub struct MatchConfig {
    inner: RustMatchConfig,
}

#[pymethods]
impl MatchConfig {
    /// Create a new MatchConfig.
    ///
    /// Args:
    ///     strategy: "phase" or "zncc" (default: "phase")
    ///     candidate_count: Top candidates averaged (default: 3)
    ///     search_size: Search clip side length (default: 450)
    ///     template_size: Template patch side length (default: 300)
    ///     step_x: Horizontal window stride (default: 50)
    ///     step_y: Vertical window stride (default: 50)
    ///     grid_policy: "truncate" or "strict" (default: "truncate")
    ///     rounding: "truncate" or "nearest" (default: "truncate")
    ///     refinement: "none" or "quadratic" (default: "none")
    ///     parallel: Score windows in parallel (default: False)
    ///     deadline_ms: Scan time budget in milliseconds (default: None)
    #[new]
    #[pyo3(signature = (
        strategy = "phase",
        candidate_count = 3,
        search_size = 450,
        template_size = 300,
        step_x = 50,
        step_y = 50,
        grid_policy = "truncate",
        rounding = "truncate",
        refinement = "none",
        parallel = false,
        deadline_ms = None
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        strategy: &str,
        candidate_count: usize,
        search_size: usize,
        template_size: usize,
        step_x: usize,
        step_y: usize,
        grid_policy: &str,
        rounding: &str,
        refinement: &str,
        parallel: bool,
        deadline_ms: Option<u64>,
    ) -> PyResult<Self> {
        let inner = RustMatchConfig {
            strategy: parse_choice(
                "strategy",
                strategy,
                &[("phase", Strategy::Phase), ("zncc", Strategy::Zncc)],
            )?,
            candidate_count,
            search_size,
            template_size,
            step_x,
            step_y,
            grid_policy: parse_choice(
                "grid_policy",
                grid_policy,
                &[("truncate", GridPolicy::Truncate), ("strict", GridPolicy::Strict)],
            )?,
            rounding: parse_choice(
                "rounding",
                rounding,
                &[("truncate", Rounding::Truncate), ("nearest", Rounding::Nearest)],
            )?,
            refinement: parse_choice(
                "refinement",
                refinement,
                &[
                    ("none", PeakRefinement::None),
                    ("quadratic", PeakRefinement::Quadratic),
                ],
            )?,
            parallel,
            deadline: deadline_ms.map(Duration::from_millis),
        };
        inner.validate().map_err(to_py_err)?;
        Ok(Self { inner })
    }

    /// Validate the configuration.
    fn validate(&self) -> PyResult<()> {
        self.inner.validate().map_err(to_py_err)
    }

    fn __repr__(&self) -> String {
        format!(
            "MatchConfig(strategy='{}', candidate_count={}, search_size={}, template_size={}, step_x={}, step_y={}, parallel={})",
            self.inner.strategy.as_str(),
            self.inner.candidate_count,
            self.inner.search_size,
            self.inner.template_size,
            self.inner.step_x,
            self.inner.step_y,
            self.inner.parallel
        )
    }
}

/// Grid search registration engine.
#[pyclass]
pub struct Matcher {
    inner: RustMatcher,
}

#[pymethods]
impl Matcher {
    /// Create a matcher.
    ///
    /// Args:
    ///     config: MatchConfig (default: MatchConfig())
    #[new]
    #[pyo3(signature = (config = None))]
    fn new(config: Option<MatchConfig>) -> Self {
        let cfg = config.map(|c| c.inner).unwrap_or_default();
        Self {
            inner: RustMatcher::new(cfg),
        }
    }

    /// Locate the template image in the reference around (x, y).
    ///
    /// The GIL is released while the search runs.
    fn register(
        &self,
        py: Python<'_>,
        template: ImageArray<'_>,
        reference: ImageArray<'_>,
        x: f64,
        y: f64,
    ) -> PyResult<Registration> {
        let tpl = template.view()?;
        let reference = reference.view()?;
        let result = py
            .detach(|| with_views!(tpl, reference, |t, r| self.inner.register(t, r, x, y)))
            .map_err(to_py_err)?;
        Ok(result.into())
    }

    fn __repr__(&self) -> String {
        format!(
            "Matcher(strategy='{}')",
            self.inner.config().strategy.as_str()
        )
    }
}

/// Phase correlation registration with the default geometry.
///
/// Returns:
///     (x, y) tuple of integer reference coordinates
#[pyfunction]
#[pyo3(signature = (template, reference, x, y, count = 3, grid_step = 50))]
fn phase_match(
    template: ImageArray<'_>,
    reference: ImageArray<'_>,
    x: f64,
    y: f64,
    count: usize,
    grid_step: usize,
) -> PyResult<(i64, i64)> {
    let tpl = template.view()?;
    let reference = reference.view()?;
    with_views!(tpl, reference, |t, r| {
        phasematch::phase_match(t, r, x, y, count, grid_step)
    })
    .map_err(to_py_err)
}

/// Pearson correlation registration with the default geometry.
#[pyfunction]
#[pyo3(signature = (template, reference, x, y, grid_step = 50))]
fn template_match(
    template: ImageArray<'_>,
    reference: ImageArray<'_>,
    x: f64,
    y: f64,
    grid_step: usize,
) -> PyResult<(i64, i64)> {
    let tpl = template.view()?;
    let reference = reference.view()?;
    with_views!(tpl, reference, |t, r| {
        phasematch::template_match(t, r, x, y, grid_step)
    })
    .map_err(to_py_err)
}

/// Load a UAV frame and a base map from disk and register them.
///
/// Both images are converted to 8-bit grayscale. `(er_x, er_y)` is the
/// calibrated camera offset with y pointing north, so the search is centered
/// at `(x + er_x, y - er_y)`.
#[pyfunction]
#[pyo3(signature = (aerial_path, map_path, x, y, er_x = 0.0, er_y = 0.0, count = 3, grid_step = 50))]
#[allow(clippy::too_many_arguments)]
fn match_aerial_to_map(
    py: Python<'_>,
    aerial_path: &str,
    map_path: &str,
    x: f64,
    y: f64,
    er_x: f64,
    er_y: f64,
    count: usize,
    grid_step: usize,
) -> PyResult<(i64, i64)> {
    let aerial = load_gray_image(aerial_path).map_err(to_py_err)?;
    let map = load_gray_image(map_path).map_err(to_py_err)?;
    let (cx, cy) = corrected_estimate(x, y, er_x, er_y);
    py.detach(|| phasematch::phase_match(aerial.view(), map.view(), cx, cy, count, grid_step))
    .map_err(to_py_err)
}

/// Python module for phasematch registration.
#[pymodule]
fn _phasematch(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<Candidate>()?;
    m.add_class::<Registration>()?;
    m.add_class::<MatchConfig>()?;
    m.add_class::<Matcher>()?;
    m.add_function(wrap_pyfunction!(phase_match, m)?)?;
    m.add_function(wrap_pyfunction!(template_match, m)?)?;
    m.add_function(wrap_pyfunction!(match_aerial_to_map, m)?)?;

    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}
