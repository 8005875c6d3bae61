//! Terminal attributes
//!
//! [`Termios`] owns a `libc::termios` and exposes its four flag registers as
//! typed [`TermiosFlags`] sets. Reading and applying attributes against a
//! live descriptor is done by [`FileDescriptor`](crate::FileDescriptor);
//! nothing in this module performs I/O.

pub(crate) mod bitset;
mod flags;

use core::fmt;
use libc::{c_int, cc_t, speed_t};
use std::io;

pub use self::bitset::{shifted_by, NamedFlag, TcBitset, TermiosFlags, TC_WIDTH};
pub use self::flags::{
    CharSize, ControlFlag, ControlFlags, InputFlag, InputFlags, LocalFlag, LocalFlags, OutputFlag,
    OutputFlags,
};

/// When a `tcsetattr` change takes effect
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ChangeMode {
    /// Immediately (`TCSANOW`)
    #[default]
    Now,
    /// After pending output drains (`TCSADRAIN`)
    Drain,
    /// After output drains, discarding pending input (`TCSAFLUSH`)
    Flush,
    /// Immediately, without altering hardware state (`TCSASOFT`)
    #[cfg(any(target_os = "macos", target_os = "ios"))]
    Soft,
}

impl ChangeMode {
    /// Raw `optional_actions` argument for `tcsetattr`
    pub const fn as_raw(self) -> c_int {
        match self {
            ChangeMode::Now => libc::TCSANOW,
            ChangeMode::Drain => libc::TCSADRAIN,
            ChangeMode::Flush => libc::TCSAFLUSH,
            #[cfg(any(target_os = "macos", target_os = "ios"))]
            ChangeMode::Soft => libc::TCSASOFT,
        }
    }
}

/// Terminal attributes of one descriptor
#[derive(Clone, Copy)]
pub struct Termios {
    raw: libc::termios,
}

impl Termios {
    /// All-zero attributes
    pub fn new() -> Self {
        // SAFETY: libc::termios is plain old data; all-zero is a valid value.
        Self {
            raw: unsafe { core::mem::zeroed() },
        }
    }

    /// Wraps attributes obtained elsewhere
    pub fn from_raw(raw: libc::termios) -> Self {
        Self { raw }
    }

    /// The OS structure
    pub fn as_raw(&self) -> &libc::termios {
        &self.raw
    }

    /// The OS structure, mutable
    pub fn as_raw_mut(&mut self) -> &mut libc::termios {
        &mut self.raw
    }

    /// Unwraps into the OS structure
    pub fn into_raw(self) -> libc::termios {
        self.raw
    }

    /// Input modes
    pub fn input(&self) -> InputFlags {
        InputFlags::from(self.raw.c_iflag)
    }

    /// Replaces the input modes
    pub fn set_input(&mut self, flags: InputFlags) {
        self.raw.c_iflag = flags.into();
    }

    /// Output modes
    pub fn output(&self) -> OutputFlags {
        OutputFlags::from(self.raw.c_oflag)
    }

    /// Replaces the output modes
    pub fn set_output(&mut self, flags: OutputFlags) {
        self.raw.c_oflag = flags.into();
    }

    /// Control modes
    pub fn control(&self) -> ControlFlags {
        ControlFlags::from(self.raw.c_cflag)
    }

    /// Replaces the control modes
    pub fn set_control(&mut self, flags: ControlFlags) {
        self.raw.c_cflag = flags.into();
    }

    /// Local modes
    pub fn local(&self) -> LocalFlags {
        LocalFlags::from(self.raw.c_lflag)
    }

    /// Replaces the local modes
    pub fn set_local(&mut self, flags: LocalFlags) {
        self.raw.c_lflag = flags.into();
    }

    /// Control characters (`c_cc`), indexed by `libc::VMIN`, `libc::VEOF`, ...
    pub fn control_chars(&self) -> &[cc_t] {
        &self.raw.c_cc
    }

    /// Control characters, mutable
    pub fn control_chars_mut(&mut self) -> &mut [cc_t] {
        &mut self.raw.c_cc
    }

    /// Input baud rate as stored in the structure
    pub fn input_speed(&self) -> speed_t {
        // SAFETY: cfgetispeed only reads the structure we pass.
        unsafe { libc::cfgetispeed(&self.raw) }
    }

    /// Output baud rate as stored in the structure
    pub fn output_speed(&self) -> speed_t {
        // SAFETY: cfgetospeed only reads the structure we pass.
        unsafe { libc::cfgetospeed(&self.raw) }
    }
}

impl Default for Termios {
    fn default() -> Self {
        Self::new()
    }
}

impl From<libc::termios> for Termios {
    fn from(raw: libc::termios) -> Self {
        Self::from_raw(raw)
    }
}

impl fmt::Debug for Termios {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Termios")
            .field("input", &self.input())
            .field("output", &self.output())
            .field("control", &self.control())
            .field("local", &self.local())
            .field("char_size", &self.control().char_size())
            .finish_non_exhaustive()
    }
}

/// `Display` adapter printing one `"<name> <true|false>"` line per named bit
pub struct FlagDump<'a, T>(&'a T);

impl<'a, T: TermiosFlags> FlagDump<'a, T> {
    /// Wraps `flags` for display
    pub fn new(flags: &'a T) -> Self {
        Self(flags)
    }
}

impl<T: TermiosFlags> fmt::Display for FlagDump<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for named in self.0.named() {
            writeln!(f, "{} {}", named.name, named.set)?;
        }
        Ok(())
    }
}

/// Writes every named bit of `flags` and whether it is set, in declaration order
pub fn debug_dump_flags<T: TermiosFlags, W: io::Write + ?Sized>(
    flags: &T,
    out: &mut W,
) -> io::Result<()> {
    write!(out, "{}", FlagDump::new(flags))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_empty() {
        let termios = Termios::new();
        assert_eq!(termios.input().raw(), 0);
        assert_eq!(termios.output().raw(), 0);
        assert_eq!(termios.control().raw(), 0);
        assert_eq!(termios.local().raw(), 0);
    }

    #[test]
    fn test_set_registers() {
        let mut termios = Termios::default();
        termios.set_input(InputFlags::empty().with(InputFlag::Icrnl));
        termios.set_output(OutputFlags::empty().with(OutputFlag::Opost));
        termios.set_control(ControlFlags::empty().with(ControlFlag::Cread));
        termios.set_local(LocalFlags::empty().with(LocalFlag::Echo));

        assert_eq!(termios.as_raw().c_iflag, libc::ICRNL);
        assert_eq!(termios.as_raw().c_oflag, libc::OPOST);
        assert_eq!(termios.as_raw().c_cflag, libc::CREAD);
        assert_eq!(termios.as_raw().c_lflag, libc::ECHO);
        assert!(termios.local().test(LocalFlag::Echo));
    }

    #[test]
    fn test_registers_are_independent() {
        let mut termios = Termios::new();
        termios.set_local(LocalFlags::from(libc::ICANON));
        termios.set_input(InputFlags::from(libc::IXON));
        assert_eq!(termios.local().raw(), libc::ICANON);
        assert_eq!(termios.input().raw(), libc::IXON);
        assert_eq!(termios.output().raw(), 0);
    }

    #[test]
    fn test_control_chars() {
        let mut termios = Termios::new();
        termios.control_chars_mut()[libc::VMIN] = 1;
        assert_eq!(termios.control_chars()[libc::VMIN], 1);
        assert_eq!(termios.control_chars().len(), libc::NCCS);
    }

    #[test]
    fn test_change_mode_raw() {
        assert_eq!(ChangeMode::default(), ChangeMode::Now);
        assert_eq!(ChangeMode::Now.as_raw(), libc::TCSANOW);
        assert_eq!(ChangeMode::Drain.as_raw(), libc::TCSADRAIN);
        assert_eq!(ChangeMode::Flush.as_raw(), libc::TCSAFLUSH);
    }

    #[test]
    fn test_dump_format() {
        let flags = InputFlags::from(libc::IGNBRK);
        let mut out = Vec::new();
        debug_dump_flags(&flags, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), InputFlags::FLAG_COUNT);
        assert_eq!(lines[0], "ignbrk true");
        assert_eq!(lines[1], "brkint false");
    }

    #[test]
    fn test_flag_dump_display() {
        let flags = OutputFlags::from(libc::OPOST);
        let text = FlagDump::new(&flags).to_string();
        assert!(text.starts_with("opost true\n"));
        assert_eq!(text.lines().count(), OutputFlags::FLAG_COUNT);
    }

    #[test]
    fn test_debug_output() {
        let mut termios = Termios::new();
        termios.set_local(LocalFlags::from(libc::ECHO));
        let text = format!("{:?}", termios);
        assert!(text.contains("\"echo\""));
        assert!(text.starts_with("Termios {"));
    }
}
