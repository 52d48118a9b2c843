//! Effect wrappers: deferred side effects, asynchronous fallible tasks,
//! environment/log/state transformers and do-notation.
//!
//! # Synchronous
//!
//! - [`IO`]: a deferred side effect, run with `run_unsafe`
//! - [`Reader`]: a computation over a read-only environment
//! - [`Writer`]: a value with an ordered log
//! - [`State`]: a state transition
//!
//! # Asynchronous (feature `async`)
//!
//! - [`TaskIO`]: a deferred asynchronous side effect
//! - [`TaskResult`]: an asynchronous `Result<T, String>`
//! - [`ReaderTaskResult`], [`WriterTaskResult`], [`StateTaskResult`]: the
//!   transformers above, lifted over `TaskResult`
//! - [`Do`] / [`DoScope`]: do-notation workflows with scoped resources
//! - [`CancellationToken`] and [`AsyncDispose`]
//!
//! ```rust
//! use effectkit::effect::IO;
//!
//! let io = IO::pure(10)
//!     .fmap(|x| x * 2)
//!     .flat_map(|x| IO::pure(x + 1));
//! assert_eq!(io.run_unsafe(), 21);
//! ```

// =============================================================================
// Synchronous effects
// =============================================================================

pub mod io;
mod reader;
mod state;
mod writer;

pub use io::IO;
pub use reader::Reader;
pub use state::State;
pub use writer::Writer;

// =============================================================================
// Asynchronous effects (requires async feature)
// =============================================================================

#[cfg(feature = "async")]
mod cancellation;
#[cfg(feature = "async")]
mod reader_task_result;
#[cfg(feature = "async")]
mod state_task_result;
#[cfg(feature = "async")]
mod task_io;
#[cfg(feature = "async")]
mod task_result;
#[cfg(feature = "async")]
mod workflow;
#[cfg(feature = "async")]
mod writer_task_result;

#[cfg(feature = "async")]
pub use cancellation::{AsyncDispose, CancellationToken, Cancelled};
#[cfg(feature = "async")]
pub use reader_task_result::ReaderTaskResult;
#[cfg(feature = "async")]
pub use state_task_result::StateTaskResult;
#[cfg(feature = "async")]
pub use task_io::TaskIO;
#[cfg(feature = "async")]
pub use task_result::TaskResult;
#[cfg(feature = "async")]
pub use workflow::{Do, DoScope, ShortCircuit};
#[cfg(feature = "async")]
pub use writer_task_result::WriterTaskResult;

// =============================================================================
// Do-Notation Macro
// =============================================================================

mod eff_macro;
