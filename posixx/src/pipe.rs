//! Unnamed pipes
//!
//! [`Pipe`] only stores the two descriptor numbers. It never closes them;
//! either close them yourself or hand them over to owning handles with
//! [`into_descriptors`](Pipe::into_descriptors).

use std::os::unix::io::RawFd;

use crate::error::{ErrorState, Result};
use crate::fd::AutoCloseFileDescriptor;

const READ_END: usize = 0;
const WRITE_END: usize = 1;

/// A connected `(read, write)` descriptor pair
#[derive(Debug, PartialEq, Eq)]
pub struct Pipe {
    fds: [RawFd; 2],
}

impl Pipe {
    /// Pipe with both ends unset (`-1`)
    pub const fn new() -> Self {
        Self { fds: [-1, -1] }
    }

    /// Creates the descriptor pair
    ///
    /// On failure both ends are reset to `-1`. Opening an already open pipe
    /// replaces the stored pair without closing it; the old descriptors stay
    /// the caller's to close.
    pub fn open(&mut self) -> Result<()> {
        if self.is_open() {
            posix_warn!(
                "pipe reopened, dropping ({}, {}) unclosed",
                self.fds[READ_END],
                self.fds[WRITE_END]
            );
        }
        // SAFETY: `fds` has room for the two descriptors pipe(2) writes.
        let status = ErrorState::from(unsafe { libc::pipe(self.fds.as_mut_ptr()) });
        if status.is_err() {
            self.fds = [-1, -1];
            return status.check("pipe");
        }
        posix_debug!("pipe() = ({}, {})", self.fds[READ_END], self.fds[WRITE_END]);
        Ok(())
    }

    /// True once both ends hold a descriptor
    pub fn is_open(&self) -> bool {
        self.fds.iter().all(|&fd| fd >= 0)
    }

    /// Raw `(read, write)` descriptor values
    pub fn as_pair(&self) -> (RawFd, RawFd) {
        (self.fds[READ_END], self.fds[WRITE_END])
    }

    /// Read end
    pub fn read_end(&self) -> RawFd {
        self.fds[READ_END]
    }

    /// Write end
    pub fn write_end(&self) -> RawFd {
        self.fds[WRITE_END]
    }

    /// Hands both ends to handles that close them on drop, `(read, write)`
    pub fn into_descriptors(self) -> (AutoCloseFileDescriptor, AutoCloseFileDescriptor) {
        let (read, write) = self.as_pair();
        (
            AutoCloseFileDescriptor::new(read),
            AutoCloseFileDescriptor::new(write),
        )
    }
}

impl Default for Pipe {
    fn default() -> Self {
        Self::new()
    }
}
