//! Type representation used by the checker.
//!
//! - [`ty`]: the `Ty` enum, signatures and object shapes
//! - [`display`]: rendering and canonical normalization

pub mod display;
pub mod ty;

pub use display::normalize;
pub use ty::{Lit, ObjectShape, ParamTy, PrimTy, PropTy, Signature, Ty};
