//! Syscall status and error types
//!
//! [`ErrorState`] is the raw outcome of one syscall. [`Error`] is what the
//! rest of the crate hands back through [`Result`] once a status turned out
//! to be a failure.

use core::fmt;
use core::mem::MaybeUninit;
use libc::c_int;
use std::io;

/// Raw outcome of a single syscall
///
/// `errno` is captured at construction time and only when `state` is
/// negative, so a later syscall cannot clobber it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ErrorState {
    state: isize,
    errno: i32,
}

impl ErrorState {
    /// Wraps a raw syscall return value, capturing `errno` on failure
    pub fn new(state: isize) -> Self {
        let mut status = Self::default();
        status.set(state);
        status
    }

    /// Re-assigns from a new raw syscall return value
    pub fn set(&mut self, state: isize) {
        self.state = state;
        self.errno = if state < 0 { last_errno() } else { 0 };
    }

    /// Raw result as returned by the OS
    pub fn state(&self) -> isize {
        self.state
    }

    /// Captured `errno`, zero unless the call failed
    pub fn errno(&self) -> i32 {
        self.errno
    }

    /// True iff the stored result is non-negative
    pub fn is_ok(&self) -> bool {
        self.state >= 0
    }

    /// True iff the stored result is negative
    pub fn is_err(&self) -> bool {
        !self.is_ok()
    }

    /// Builds an OS-category error carrying the captured code
    pub fn as_system_error(&self) -> io::Error {
        io::Error::from_raw_os_error(self.errno)
    }

    /// Converts to `Ok(())`, or to an [`Error`] naming `op`
    pub fn check(self, op: &'static str) -> Result<()> {
        self.into_size(op).map(|_| ())
    }

    /// Converts to the transferred byte count, or to an [`Error`] naming `op`
    pub fn into_size(self, op: &'static str) -> Result<usize> {
        if self.is_ok() {
            Ok(self.state as usize)
        } else {
            Err(Error::from_state(op, self))
        }
    }
}

impl From<c_int> for ErrorState {
    fn from(state: c_int) -> Self {
        Self::new(state as isize)
    }
}

impl From<isize> for ErrorState {
    fn from(state: isize) -> Self {
        Self::new(state)
    }
}

impl From<ErrorState> for bool {
    fn from(status: ErrorState) -> bool {
        status.is_ok()
    }
}

/// A failed syscall
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Error {
    op: &'static str,
    errno: i32,
}

impl Error {
    /// Creates an error for `op` from a raw `errno` value
    pub fn new(op: &'static str, errno: i32) -> Self {
        posix_debug!("{} failed: errno {}", op, errno);
        Self { op, errno }
    }

    /// Creates an error for `op` from a failed status
    pub fn from_state(op: &'static str, status: ErrorState) -> Self {
        Self::new(op, status.errno())
    }

    /// Creates an error for `op` from the calling thread's current `errno`
    pub fn last_os_error(op: &'static str) -> Self {
        Self::new(op, last_errno())
    }

    /// Name of the syscall that failed
    pub fn op(&self) -> &'static str {
        self.op
    }

    /// Captured `errno`
    pub fn errno(&self) -> i32 {
        self.errno
    }

    /// Portable classification of the `errno`
    pub fn kind(&self) -> io::ErrorKind {
        io::Error::from_raw_os_error(self.errno).kind()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.op, io::Error::from_raw_os_error(self.errno))
    }
}

impl std::error::Error for Error {}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        io::Error::from_raw_os_error(err.errno)
    }
}

/// Result type for posixx operations
pub type Result<T> = core::result::Result<T, Error>;

/// Runs a syscall that fills an out-parameter and returns a status
///
/// The call is made exactly once. On a non-negative status the populated
/// value is returned; otherwise the captured `errno` is.
///
/// # Safety
///
/// `f` must fully initialise the pointee whenever it returns a
/// non-negative status. The pointee starts out zeroed, so `T` must also be
/// valid when all-zero if `f` only writes part of it.
pub unsafe fn track<T, F>(op: &'static str, f: F) -> Result<T>
where
    F: FnOnce(*mut T) -> c_int,
{
    let mut out = MaybeUninit::<T>::zeroed();
    let status = ErrorState::from(f(out.as_mut_ptr()));
    status.check(op)?;
    // SAFETY: the caller guarantees `f` initialised `out` on success.
    Ok(unsafe { out.assume_init() })
}

fn last_errno() -> i32 {
    io::Error::last_os_error().raw_os_error().unwrap_or(0)
}
