//! posixx - typed POSIX handles
//!
//! This crate wraps a handful of POSIX primitives in owned, strongly typed
//! values: file descriptors, `stat` snapshots and `termios` attributes. Every
//! operation is a single pass-through to one syscall; nothing is buffered,
//! retried or scheduled.
//!
//! # Architecture
//!
//! - **Error**: [`ErrorState`] captures a raw syscall result plus `errno`,
//!   [`Error`] / [`Result`] carry failures to the caller
//! - **Termios**: the four flag registers as [`TermiosFlags`] sets with
//!   named, enumerable bits, aggregated by [`Termios`]
//! - **Stat**: [`Stat`] snapshot with a decoded mode dump
//! - **Fd**: [`FileDescriptor`] and its closing-on-drop sibling
//!   [`AutoCloseFileDescriptor`]
//! - **Pipe**: [`Pipe`] creates a connected descriptor pair
//!
//! # Usage
//!
//! ```no_run
//! use posixx::{FileDescriptor, TermiosFlags, debug_dump_flags};
//!
//! fn main() -> posixx::Result<()> {
//!     let fd = FileDescriptor::new(libc::STDOUT_FILENO);
//!     let termios = fd.termios()?;
//!     debug_dump_flags(&termios.local(), &mut std::io::stdout()).ok();
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `log` - report failing syscalls through the `log` facade

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

#[cfg(not(any(
    target_os = "linux",
    target_os = "android",
    target_os = "macos",
    target_os = "ios"
)))]
compile_error!("posixx supports Linux, Android, macOS and iOS targets only");

#[macro_use]
mod logging;

pub mod error;
pub mod fd;
pub mod pipe;
pub mod stat;
pub mod termios;

// Re-export commonly used items
pub use error::{track, Error, ErrorState, Result};
pub use fd::{AutoCloseFileDescriptor, FileDescriptor};
pub use pipe::Pipe;
pub use stat::{FileType, ModeBits, Stat};
pub use termios::{
    debug_dump_flags, ChangeMode, CharSize, ControlFlag, ControlFlags, FlagDump, InputFlag,
    InputFlags, LocalFlag, LocalFlags, NamedFlag, OutputFlag, OutputFlags, TcBitset, Termios,
    TermiosFlags,
};

/// Raw descriptor number as used by the OS
pub use std::os::unix::io::RawFd;
