//! Return-to-base navigation
//!
//! Path storage and the two algorithms that drive it:
//! - [`recorder`]: adaptive waypoint sampling and loop compaction while outbound
//! - [`guide`]: waypoint advancement and decimated distance refresh on return
//!
//! Distances come from a [`geo::DistanceStrategy`] chosen at configuration time.

pub mod geo;
pub mod guide;
pub mod path;
pub mod recorder;
mod types;

pub use geo::{CoordinateMode, DistanceStrategy, Geometry, Planar, Spherical};
pub use guide::{Guide, GuideOutcome};
pub use path::{ReturnPathIter, WaypointPath, RTB_POINTS_MAX};
pub use recorder::{adaptive_threshold, RecordOutcome, Recorder, RecorderStats};
pub use types::{Kinematics, OverflowPolicy, Position, RtbConfig, Waypoint};
