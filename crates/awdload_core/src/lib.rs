//! Loader core for chunked AWD-style binary 3D scene files.
//!
//! The core never performs I/O: callers hand it a fully-read byte buffer and
//! receive either a complete [`awd::SceneGraph`] or a single [`awd::ParseError`].

/// Header validation, block streaming, decoding, and scene-graph construction.
pub mod awd;
