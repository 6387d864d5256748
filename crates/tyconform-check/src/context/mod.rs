//! Checking context: the scope environment a fixture is checked in.

pub mod env;

pub use env::TypeEnv;
