//! Parameter Storage Types
//!
//! Key/value store for runtime-tunable constants. Names follow the
//! ArduPilot convention (upper case, at most 16 characters) so a ground
//! station can list and edit them. Persistence is left to the host.

use super::error::ParameterError;
use heapless::index_map::FnvIndexMap;
use heapless::String;

/// Maximum parameter name length
pub const PARAM_NAME_LEN: usize = 16;

/// Maximum number of parameters (power of two for the index map)
pub const MAX_PARAMS: usize = 32;

/// Parameter value types
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    /// Boolean parameter
    Bool(bool),
    /// 32-bit signed integer
    Int(i32),
    /// 32-bit floating point
    Float(f32),
}

impl ParamValue {
    /// Get type discriminant for serialization
    pub fn type_id(&self) -> u8 {
        match self {
            ParamValue::Bool(_) => 1,
            ParamValue::Int(_) => 2,
            ParamValue::Float(_) => 3,
        }
    }
}

/// Parameter store for configuration management
pub struct ParameterStore {
    /// Parameter values
    parameters: FnvIndexMap<String<PARAM_NAME_LEN>, ParamValue, MAX_PARAMS>,
    /// Dirty flag (needs to be persisted by the host)
    dirty: bool,
}

impl ParameterStore {
    /// Create a new empty parameter store
    pub fn new() -> Self {
        Self {
            parameters: FnvIndexMap::new(),
            dirty: false,
        }
    }

    /// Get parameter value
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        let key = make_key(name).ok()?;
        self.parameters.get(&key)
    }

    /// Set the value of a registered parameter
    ///
    /// Marks the store as dirty.
    pub fn set(&mut self, name: &str, value: ParamValue) -> Result<(), ParameterError> {
        let key = make_key(name)?;
        let slot = self
            .parameters
            .get_mut(&key)
            .ok_or(ParameterError::InvalidConfig)?;
        *slot = value;
        self.dirty = true;
        Ok(())
    }

    /// Register a new parameter with its default value
    ///
    /// If the parameter already exists, this is a no-op (idempotent).
    pub fn register(&mut self, name: &str, default_value: ParamValue) -> Result<(), ParameterError> {
        let key = make_key(name)?;

        if self.parameters.contains_key(&key) {
            // Already exists, don't overwrite
            return Ok(());
        }

        self.parameters
            .insert(key, default_value)
            .map_err(|_| ParameterError::StoreFull)?;
        self.dirty = true;
        Ok(())
    }

    /// Iterate over all parameters as (name, value) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.parameters.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Check if store has unsaved changes
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear dirty flag (called after the host persisted the values)
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Get parameter count
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new()
    }
}

fn make_key(name: &str) -> Result<String<PARAM_NAME_LEN>, ParameterError> {
    let mut key = String::<PARAM_NAME_LEN>::new();
    key.push_str(name)
        .map_err(|_| ParameterError::InvalidConfig)?;
    Ok(key)
}
