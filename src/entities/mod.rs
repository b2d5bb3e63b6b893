//! Declarative request types

pub mod macros;
