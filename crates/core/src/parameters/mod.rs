//! Parameter management types and utilities
//!
//! This module provides the runtime parameter store and the return-to-base
//! parameter definitions. Persistence of the store is owned by the host.

pub mod error;
pub mod rtb;
pub mod storage;

pub use error::ParameterError;
pub use rtb::RtbParams;
pub use storage::{ParamValue, ParameterStore, MAX_PARAMS, PARAM_NAME_LEN};
