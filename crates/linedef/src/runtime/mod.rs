//! Runtime module: driver lifecycle: boot, then run over the input.

pub mod boot;
pub mod run;
