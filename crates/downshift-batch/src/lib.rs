//! # Downshift Batch
//!
//! Runs the downshift transform over one file or a folder of files, either
//! on the calling thread ([`run_batch`]) or on a background thread
//! ([`BatchHandle`]) that is polled for [`BatchEvent`]s and stopped between
//! files through a [`CancellationToken`].
//!
//! Named parameter sets live in a JSON [`ProfileStore`].
//!
//! ```ignore
//! use downshift_batch::{collect_inputs, BatchHandle, JobSettings};
//! use downshift_core::Mode;
//!
//! let inputs = collect_inputs("masters/".as_ref(), true)?;
//! let handle = BatchHandle::start(inputs, JobSettings::new(Mode::Prepare, "out/"))?;
//!
//! while !handle.is_done() {
//!     for event in handle.poll() {
//!         println!("{:?}", event);
//!     }
//! }
//! let report = handle.wait()?;
//! ```

mod driver;
pub mod error;
mod job;
pub mod profiles;

pub use driver::{run_batch, BatchEvent, BatchHandle, BatchReport, CancellationToken};
pub use error::{BatchError, Result};
pub use job::{collect_inputs, process_file, JobSettings};
pub use profiles::{
    Profile, ProfileStore, ACCURATE_PROFILE, FAST_PROFILE, LAST_INPUT_PATH, LAST_OUTPUT_PATH,
};
