//! Sky computation stages and the engine that chains them.
//!
//! - [`observer_frame`]: coordinates + local time -> UTC observer frame
//! - [`transform`]: catalog -> horizontal coordinates and plot positions
//! - [`visibility`]: magnitude and horizon predicates
//! - [`constellations`]: visible segments and weighted constellation positions
//! - [`narrative`]: hand-off for the narrative generator
//! - [`sky_engine`]: the full query pipeline

pub mod constellations;
pub mod narrative;
pub mod observer_frame;
pub mod sky_engine;
pub mod transform;
pub mod visibility;

pub use constellations::{assemble, ConstellationAssembly, ConstellationWeighting};
pub use narrative::NarrativeBrief;
pub use observer_frame::{build_observer_context, TimezoneLookup, TzfLookup};
pub use sky_engine::{compute_sky_snapshot, SkyEngine};
pub use transform::transform;
pub use visibility::{above_horizon, filter_by_magnitude};
