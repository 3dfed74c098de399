//! phasematch locates a UAV template chip inside a reference base map.
//!
//! The engine crops the template patch from the center of the UAV frame and a
//! larger search clip from the reference around a position estimate, then
//! scores a grid of template-sized windows inside the clip. The default
//! strategy is Hamming-windowed FFT phase correlation with the top-K window
//! estimates averaged; a Pearson (ZNCC) strategy picks the best single window
//! instead.
//!
//! Optional features: `rayon` (parallel window scoring), `simd` (vectorized
//! ZNCC), `image-io` (image file loading) and `tracing` (spans and events).
//!
//! ```no_run
//! use phasematch::{ImageView, MatchConfig, Matcher};
//!
//! # fn run(uav: &[u8], map: &[u8]) -> phasematch::PhaseMatchResult<()> {
//! let template = ImageView::from_slice(uav, 640, 480)?;
//! let reference = ImageView::from_slice(map, 4000, 3000)?;
//! let matcher = Matcher::new(MatchConfig::default());
//! let reg = matcher.register(template, reference, 1820.0, 1275.0)?;
//! println!("({}, {}) score {:.3}", reg.x, reg.y, reg.score);
//! # Ok(())
//! # }
//! ```

mod candidate;
pub mod fft;
pub mod image;
pub mod kernel;
pub mod lowlevel;
mod refine;
pub mod search;
pub mod template;
mod trace;
pub mod util;

pub use candidate::Candidate;
pub use crate::image::{ImageView, OwnedImage, Pixel};
pub use kernel::phase::phase_correlate;
pub use refine::PeakRefinement;
pub use search::{
    corrected_estimate, phase_match, template_match, GridPolicy, MatchConfig, Matcher,
    Registration, Rounding, Strategy,
};
pub use template::{PhasePlan, ZnccPlan};
pub use util::{ErrorKind, PhaseMatchError, PhaseMatchResult};

#[cfg(feature = "image-io")]
pub use crate::image::io::load_gray_image;
