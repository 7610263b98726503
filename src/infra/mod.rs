// ============================================================
// Layer 6 - Infrastructure Layer
// ============================================================
// Cross-cutting concerns used by several other layers:
//
//   checkpoint.rs  - Saving and loading training state
//                    (epoch, model, optimizer, iteration
//                    counters, learning rate, loss) as JSON
//                    files named after epoch and loss.
//
//   logger.rs      - Process logger setup: console sink plus
//                    an optional log.txt file sink, installed
//                    exactly once.
//
//   metrics_log.rs - Per-image evaluation CSV (name, mse, sad).
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)

/// Training checkpoint writer and reader
pub mod checkpoint;

/// Console / file logger factory
pub mod logger;

/// Evaluation metrics CSV logger
pub mod metrics_log;
