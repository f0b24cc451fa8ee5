//! Vehicle subsystems

pub mod navigation;
