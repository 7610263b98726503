// ============================================================
// Layer 4 - Data Layer
// ============================================================
// Everything between the dataset folder on disk and tensors:
//
//   <raw_data_path>/alpha/*.png
//       │
//       ▼
//   names      → list images, read/write name lists
//       │
//       ▼
//   splitter   → shuffle and split into train / valid names
//       │
//       ▼
//   loader     → pred / alpha / trimap images as tensors
//
// Reference: Rust Book §13 (Iterators and Closures)

/// Image listing and train/valid name list files
pub mod names;

/// Shuffles and splits names into train/validation sets
pub mod splitter;

/// Loads prediction / ground-truth / trimap triples
pub mod loader;
