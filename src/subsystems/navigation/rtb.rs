//! Return-to-base subsystem
//!
//! Process-wide entry points around [`ReturnToBase`]. The controller itself
//! is pure and silent; this wrapper shares it through [`SharedState`] and
//! logs what each call did.
//!
//! # Usage
//!
//! ```ignore
//! use rtb::subsystems::navigation::rtb::RTB;
//!
//! // Arming handler
//! RTB.set_mode(RtbMode::Recording)?;
//!
//! // Navigation task, every tick
//! let status = RTB.update(position, kinematics);
//! if status.mode == RtbMode::Tracking {
//!     steer_towards(status.bearing_to_target);
//! }
//! ```

use rtb_core::mode::RtbEvent;
use rtb_core::navigation::{GuideOutcome, Kinematics, Position, RecordOutcome, RTB_POINTS_MAX};
use rtb_core::parameters::{ParameterStore, RtbParams};
use rtb_core::{ReturnToBase, RtbConfig, RtbError, RtbMode, RtbStatus};

use crate::core::traits::SharedState;

/// Shared handle to a return-to-base controller with capacity `N`
pub struct RtbHandle<S, const N: usize = RTB_POINTS_MAX> {
    state: S,
}

impl<S, const N: usize> RtbHandle<S, N> {
    /// Wrap shared controller state (const fn for static initialization)
    pub const fn new(state: S) -> Self {
        Self { state }
    }
}

impl<S, const N: usize> RtbHandle<S, N>
where
    S: SharedState<ReturnToBase<N>>,
{
    /// Reset to disabled with `config`
    pub fn init(&self, config: RtbConfig) -> Result<(), RtbError> {
        let result = self.state.with_mut(|rtb| rtb.init(config));
        match result {
            Ok(()) => crate::log_info!("RTB initialized"),
            Err(e) => crate::log_error!("RTB init kept previous config: {}", e.as_str()),
        }
        result
    }

    /// Apply a new configuration (disabled only)
    pub fn configure(&self, config: RtbConfig) -> Result<(), RtbError> {
        let (mode, result) = self
            .state
            .with_mut(|rtb| (rtb.mode(), rtb.configure(config)));
        if result.is_err() {
            crate::log_error!("RTB config refused in {} mode", mode.as_str());
        }
        result
    }

    /// Load, validate, and apply the `RTB_*` parameters
    pub fn configure_from_params(&self, store: &ParameterStore) -> Result<(), RtbError> {
        let params = RtbParams::from_store(store);
        if !params.is_valid() {
            crate::log_error!("RTB parameters inconsistent, keeping previous config");
            return Err(RtbError::InvalidConfig);
        }
        self.configure(params.to_config())
    }

    /// Request a mode change
    pub fn set_mode(&self, requested: RtbMode) -> Result<RtbMode, RtbError> {
        let (from, result) = self
            .state
            .with_mut(|rtb| (rtb.mode(), rtb.set_mode(requested)));

        match result {
            Ok(to) if to != from => {
                crate::log_info!("RTB mode transition: {} -> {}", from.as_str(), to.as_str())
            }
            Ok(_) => {}
            Err(_) => {
                let now = self.state.with(|rtb| rtb.mode());
                crate::log_warn!(
                    "RTB rejected {} -> {} (now {})",
                    from.as_str(),
                    requested.as_str(),
                    now.as_str()
                );
            }
        }
        result
    }

    /// Per-tick update
    pub fn update(&self, position: Position, kinematics: Kinematics) -> RtbStatus {
        let (before, status) = self.state.with_mut(|rtb| {
            let before = rtb.status();
            (before, rtb.update(position, kinematics))
        });
        log_tick(&before, &status);
        status
    }

    /// Current status
    pub fn status(&self) -> RtbStatus {
        self.state.with(|rtb| rtb.status())
    }

    /// Copy up to `M` return-path positions, current target first
    pub fn return_path<const M: usize>(&self) -> heapless::Vec<Position, M> {
        self.state
            .with(|rtb| rtb.return_path().take(M).collect())
    }
}

fn log_tick(before: &RtbStatus, status: &RtbStatus) {
    match status.event {
        RtbEvent::Idle => {}
        RtbEvent::Record(RecordOutcome::Started) => {
            crate::log_info!("RTB origin stored");
        }
        RtbEvent::Record(RecordOutcome::Appended) | RtbEvent::Record(RecordOutcome::Recycled) => {
            crate::log_trace!("RTB waypoint {} stored", status.path_len);
        }
        RtbEvent::Record(RecordOutcome::Compacted { removed }) => {
            crate::log_debug!(
                "RTB loop closed, {} waypoints removed ({} left)",
                removed,
                status.path_len
            );
        }
        RtbEvent::Record(RecordOutcome::Refused) => {
            if !before.storage_exhausted {
                crate::log_warn!(
                    "RTB waypoint storage exhausted at {} points",
                    status.path_len
                );
            }
        }
        RtbEvent::Record(RecordOutcome::Discarded) => {}
        RtbEvent::Guide(GuideOutcome::Approaching) => {}
        RtbEvent::Guide(GuideOutcome::Reached { remaining }) => {
            crate::log_debug!(
                "RTB waypoint reached, {} left, {} m home",
                remaining,
                status.distance_to_home
            );
        }
        RtbEvent::Guide(GuideOutcome::Exhausted) => {
            crate::log_info!(
                "RTB path exhausted after {} waypoints, mode -> {}",
                status.counters.reached,
                status.mode.as_str()
            );
        }
    }
}

// ============================================================================
// Embassy Implementation (embedded targets)
// ============================================================================

#[cfg(feature = "embassy")]
mod embassy_impl {
    use super::*;
    use crate::core::traits::EmbassyState;

    /// Global return-to-base controller
    ///
    /// Fed by the navigation task; mode requests come from the arming and
    /// mode-change handlers.
    pub static RTB: RtbHandle<EmbassyState<ReturnToBase>> =
        RtbHandle::new(EmbassyState::new(ReturnToBase::new(RtbConfig::DEFAULT)));
}

#[cfg(feature = "embassy")]
pub use embassy_impl::RTB;
