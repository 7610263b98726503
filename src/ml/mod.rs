// ============================================================
// Layer 5 - ML Support Layer
// ============================================================
// The numeric pieces a matting training loop is built around.
// The network itself is supplied by the training driver.
//
//   scheduler.rs - Polynomial learning-rate decay written into
//                  optimiser parameter groups
//
//   meter.rs     - Running average of a scalar stream
//                  (loss, MSE, SAD)
//
//   metrics.rs   - Matting errors on burn tensors: MSE over
//                  the trimap's unknown band, and SAD
//
//   session.rs   - Per-run bookkeeping: iteration counter,
//                  best loss, periodic checkpoints, resume
//
// Reference: Burn Book §3 (Tensors)

/// Polynomial learning-rate schedule
pub mod scheduler;

/// Running average tracker
pub mod meter;

/// MSE / SAD matting metrics
pub mod metrics;

/// Resume-aware training bookkeeping
pub mod session;
