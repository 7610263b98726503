// ============================================================
// ada-matting - training support for AdaMatting
// ============================================================
// The crate is split into the same six layers the binary uses:
//
//   cli          - clap argument definitions and mode dispatch
//   application  - prep / test / train workflows
//   domain       - trimap conventions, sample types, traits
//   data         - matte image loading, train/valid name lists
//   ml           - LR schedule, running averages, matting metrics,
//                  training session bookkeeping
//   infra        - checkpoints, logger setup, CSV metric logs
//
// The matting network itself lives outside this crate; a training
// driver links against `ml::session::TrainSession` and the metric
// functions.

pub mod application;
pub mod cli;
pub mod data;
pub mod domain;
pub mod infra;
pub mod ml;

pub use infra::checkpoint::{load_checkpoint, save_checkpoint, CheckpointManager, CheckpointState};
pub use infra::logger::{Logger, LoggerConfig};
pub use ml::meter::AverageMeter;
pub use ml::metrics::{compute_mse, compute_sad};
pub use ml::scheduler::{poly_lr_scheduler, ParamGroup, ParamGroups, PolyLrConfig};
