//! Snapshot file format and in-memory snapshot sets.

/// Binary decoding (real and complex variants).
pub mod decode;
/// Binary encoding, the inverse of [`decode`].
pub mod encode;
/// Fixed-size file header.
pub mod header;
/// Typed snapshot sets and the component accessor.
pub mod set;
/// Synthetic velocity fields for demos and tests.
pub mod synth;
