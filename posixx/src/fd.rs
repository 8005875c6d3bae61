//! Owned file descriptors
//!
//! A [`FileDescriptor`] owns at most one OS descriptor. It cannot be copied;
//! ownership moves with the value, or explicitly through
//! [`take`](FileDescriptor::take), which leaves the source unowned.
//! [`AutoCloseFileDescriptor`] additionally closes on drop.

use core::ops::{Deref, DerefMut};
use libc::c_void;
use std::os::unix::io::{AsRawFd, FromRawFd, IntoRawFd, RawFd};

use crate::error::{track, ErrorState, Result};
use crate::stat::Stat;
use crate::termios::{ChangeMode, Termios};

/// Descriptor handle; does not close on drop
#[derive(Debug, PartialEq, Eq)]
pub struct FileDescriptor {
    fd: RawFd,
    flags: u32,
}

impl FileDescriptor {
    /// Descriptor value of a handle that owns nothing
    pub const UNOWNED: RawFd = -1;

    /// Takes ownership of `fd`
    pub const fn new(fd: RawFd) -> Self {
        Self { fd, flags: 0 }
    }

    /// Handle that owns nothing
    pub const fn unowned() -> Self {
        Self::new(Self::UNOWNED)
    }

    /// Owned descriptor value, or [`UNOWNED`](Self::UNOWNED)
    pub fn fd(&self) -> RawFd {
        self.fd
    }

    /// Reserved flags word; travels with ownership
    pub fn flags(&self) -> u32 {
        self.flags
    }

    /// True while a descriptor is held
    pub fn is_owned(&self) -> bool {
        self.fd > Self::UNOWNED
    }

    /// Moves ownership into a new handle, leaving this one unowned
    pub fn take(&mut self) -> Self {
        core::mem::replace(self, Self::unowned())
    }

    /// Reads once into `buf`, returning the number of bytes read
    ///
    /// No retry on `EINTR` and no looping on short reads.
    pub fn read<B: AsMut<[u8]> + ?Sized>(&self, buf: &mut B) -> Result<usize> {
        let buf = buf.as_mut();
        // SAFETY: the pointer and length describe a live, writable slice.
        unsafe { self.read_raw(buf.as_mut_ptr().cast(), buf.len()) }
    }

    /// Reads once into `size` bytes at `buf`
    ///
    /// # Safety
    ///
    /// `buf` must be valid for writes of `size` bytes.
    pub unsafe fn read_raw(&self, buf: *mut c_void, size: usize) -> Result<usize> {
        let status = ErrorState::from(unsafe { libc::read(self.fd, buf, size) });
        posix_trace!("read(fd={}, size={}) = {}", self.fd, size, status.state());
        status.into_size("read")
    }

    /// Writes once from `buf`, returning the number of bytes written
    ///
    /// A short write is returned as is.
    pub fn write<B: AsRef<[u8]> + ?Sized>(&self, buf: &B) -> Result<usize> {
        let buf = buf.as_ref();
        // SAFETY: the pointer and length describe a live, readable slice.
        unsafe { self.write_raw(buf.as_ptr().cast(), buf.len()) }
    }

    /// Writes once from `size` bytes at `buf`
    ///
    /// # Safety
    ///
    /// `buf` must be valid for reads of `size` bytes.
    pub unsafe fn write_raw(&self, buf: *const c_void, size: usize) -> Result<usize> {
        let status = ErrorState::from(unsafe { libc::write(self.fd, buf, size) });
        posix_trace!("write(fd={}, size={}) = {}", self.fd, size, status.state());
        status.into_size("write")
    }

    /// Releases the descriptor if one is held
    ///
    /// The handle is unowned afterwards even if `close` failed. Closing an
    /// unowned handle does nothing and succeeds.
    pub fn close(&mut self) -> Result<()> {
        if !self.is_owned() {
            return Ok(());
        }
        let fd = core::mem::replace(&mut self.fd, Self::UNOWNED);
        // SAFETY: we owned `fd` and no longer refer to it.
        let status = ErrorState::from(unsafe { libc::close(fd) });
        posix_trace!("close(fd={}) = {}", fd, status.state());
        status.check("close")
    }

    /// Metadata of the open file
    pub fn stat(&self) -> Result<Stat> {
        // SAFETY: fstat fills the whole structure on success.
        let raw = unsafe { track("fstat", |out| libc::fstat(self.fd, out))? };
        Ok(Stat::from_raw(raw))
    }

    /// Current terminal attributes
    pub fn termios(&self) -> Result<Termios> {
        // SAFETY: tcgetattr fills the whole structure on success.
        let raw = unsafe { track("tcgetattr", |out| libc::tcgetattr(self.fd, out))? };
        Ok(Termios::from_raw(raw))
    }

    /// Applies `termios` to the terminal, timed by `mode`
    pub fn set_termios(&self, termios: &Termios, mode: ChangeMode) -> Result<()> {
        // SAFETY: the structure is borrowed for the duration of the call.
        let status = unsafe { libc::tcsetattr(self.fd, mode.as_raw(), termios.as_raw()) };
        ErrorState::from(status).check("tcsetattr")
    }
}

impl Default for FileDescriptor {
    fn default() -> Self {
        Self::unowned()
    }
}

impl AsRawFd for FileDescriptor {
    fn as_raw_fd(&self) -> RawFd {
        self.fd
    }
}

impl IntoRawFd for FileDescriptor {
    fn into_raw_fd(mut self) -> RawFd {
        self.take().fd
    }
}

impl FromRawFd for FileDescriptor {
    unsafe fn from_raw_fd(fd: RawFd) -> Self {
        Self::new(fd)
    }
}

/// Descriptor handle that closes on drop
#[derive(Debug, Default, PartialEq, Eq)]
pub struct AutoCloseFileDescriptor(FileDescriptor);

impl AutoCloseFileDescriptor {
    /// Takes ownership of `fd`
    pub const fn new(fd: RawFd) -> Self {
        Self(FileDescriptor::new(fd))
    }

    /// Stops closing on drop and hands back the plain handle
    pub fn into_inner(mut self) -> FileDescriptor {
        self.0.take()
    }
}

impl From<FileDescriptor> for AutoCloseFileDescriptor {
    fn from(fd: FileDescriptor) -> Self {
        Self(fd)
    }
}

impl Deref for AutoCloseFileDescriptor {
    type Target = FileDescriptor;

    fn deref(&self) -> &FileDescriptor {
        &self.0
    }
}

impl DerefMut for AutoCloseFileDescriptor {
    fn deref_mut(&mut self) -> &mut FileDescriptor {
        &mut self.0
    }
}

impl AsRawFd for AutoCloseFileDescriptor {
    fn as_raw_fd(&self) -> RawFd {
        self.0.fd
    }
}

impl IntoRawFd for AutoCloseFileDescriptor {
    fn into_raw_fd(self) -> RawFd {
        self.into_inner().into_raw_fd()
    }
}

impl FromRawFd for AutoCloseFileDescriptor {
    unsafe fn from_raw_fd(fd: RawFd) -> Self {
        Self::new(fd)
    }
}

impl Drop for AutoCloseFileDescriptor {
    fn drop(&mut self) {
        let fd = self.0.fd;
        if let Err(err) = self.0.close() {
            posix_warn!("closing fd {} on drop failed: {}", fd, err);
        }
    }
}
