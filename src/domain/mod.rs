// ============================================================
// Layer 3 - Domain Layer
// ============================================================
// Plain types and traits describing what the matting pipeline
// works with. Nothing here touches the filesystem or logs.
//
//   trimap  - the 0 / 128 / 255 trimap convention
//   sample  - one prediction / ground-truth / trimap triple
//   traits  - capabilities other layers implement
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// Trimap value conventions
pub mod trimap;

// A predicted matte paired with its ground truth and trimap
pub mod sample;

// Core abstractions (traits) that other layers implement
pub mod traits;
