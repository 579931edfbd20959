//! Getter and setter generators.
//!
//! Each generator emits one inherent `impl` block per record occurrence.
//! The output is meant to be `include!`d next to the record declaration,
//! so field access stays private to the defining module.

pub mod ast;
mod generator;
mod plan;

pub use generator::{
    AccessorGenerator, AccessorKind, GetterGenerator, SetterGenerator, generator_for,
};
pub use plan::{ACCESSOR_TAG, FieldAccessor, plan_fields};
