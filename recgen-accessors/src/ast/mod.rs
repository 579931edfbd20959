//! Builders for the Rust items accessor generators emit.

mod fns;
mod impls;

pub use fns::{Fn, Param};
pub use impls::Impl;
