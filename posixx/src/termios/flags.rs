//! The four termios flag registers
//!
//! Bit values come straight from `libc`, which mirrors the platform's
//! terminal driver headers. Declaration order follows the BSD headers;
//! bits a platform does not define are left out there.

use super::bitset::termios_flags;
use super::TermiosFlags;
use libc::tcflag_t;

termios_flags! {
    /// Input modes (`c_iflag`)
    pub struct InputFlags;
    /// Named bits of [`InputFlags`]
    pub enum InputFlag {
        Ignbrk = IGNBRK => "ignbrk",
        Brkint = BRKINT => "brkint",
        Ignpar = IGNPAR => "ignpar",
        Parmrk = PARMRK => "parmrk",
        Inpck = INPCK => "inpck",
        Istrip = ISTRIP => "istrip",
        Inlcr = INLCR => "inlcr",
        Igncr = IGNCR => "igncr",
        Icrnl = ICRNL => "icrnl",
        Ixon = IXON => "ixon",
        Ixoff = IXOFF => "ixoff",
        Ixany = IXANY => "ixany",
        Imaxbel = IMAXBEL => "imaxbel",
        Iutf8 = IUTF8 => "iutf8",
    }
}

termios_flags! {
    /// Output modes (`c_oflag`)
    pub struct OutputFlags;
    /// Named bits of [`OutputFlags`]
    pub enum OutputFlag {
        Opost = OPOST => "opost",
        #[cfg(any(target_os = "linux", target_os = "android"))]
        Olcuc = OLCUC => "olcuc",
        Onlcr = ONLCR => "onlcr",
        #[cfg(any(target_os = "macos", target_os = "ios"))]
        Oxtabs = OXTABS => "oxtabs",
        #[cfg(any(target_os = "macos", target_os = "ios"))]
        Onoeot = ONOEOT => "onoeot",
        #[cfg(any(target_os = "linux", target_os = "android"))]
        Ocrnl = OCRNL => "ocrnl",
        #[cfg(any(target_os = "linux", target_os = "android"))]
        Onocr = ONOCR => "onocr",
        #[cfg(any(target_os = "linux", target_os = "android"))]
        Onlret = ONLRET => "onlret",
        #[cfg(any(target_os = "linux", target_os = "android"))]
        Ofill = OFILL => "ofill",
        #[cfg(any(target_os = "linux", target_os = "android"))]
        Ofdel = OFDEL => "ofdel",
    }
}

termios_flags! {
    /// Control modes (`c_cflag`)
    ///
    /// The multi-bit character size field is not a named bit; use
    /// [`ControlFlags::char_size`] for it.
    pub struct ControlFlags;
    /// Named bits of [`ControlFlags`]
    pub enum ControlFlag {
        #[cfg(any(target_os = "macos", target_os = "ios"))]
        Cignore = CIGNORE => "cignore",
        Cstopb = CSTOPB => "cstopb",
        Cread = CREAD => "cread",
        Parenb = PARENB => "parenb",
        Parodd = PARODD => "parodd",
        Hupcl = HUPCL => "hupcl",
        Clocal = CLOCAL => "clocal",
        #[cfg(any(target_os = "macos", target_os = "ios"))]
        CctsOflow = CCTS_OFLOW => "ccts_oflow",
        #[cfg(any(target_os = "macos", target_os = "ios"))]
        CrtsIflow = CRTS_IFLOW => "crts_iflow",
        #[cfg(any(target_os = "macos", target_os = "ios"))]
        CdtrIflow = CDTR_IFLOW => "cdtr_iflow",
        #[cfg(any(target_os = "macos", target_os = "ios"))]
        CdsrOflow = CDSR_OFLOW => "cdsr_oflow",
        #[cfg(any(target_os = "macos", target_os = "ios"))]
        CcarOflow = CCAR_OFLOW => "ccar_oflow",
        #[cfg(any(target_os = "linux", target_os = "android"))]
        Crtscts = CRTSCTS => "crtscts",
        #[cfg(any(target_os = "linux", target_os = "android"))]
        Cmspar = CMSPAR => "cmspar",
    }
}

termios_flags! {
    /// Local modes (`c_lflag`)
    pub struct LocalFlags;
    /// Named bits of [`LocalFlags`]
    pub enum LocalFlag {
        Echoke = ECHOKE => "echoke",
        Echoe = ECHOE => "echoe",
        Echok = ECHOK => "echok",
        Echo = ECHO => "echo",
        Echonl = ECHONL => "echonl",
        Echoprt = ECHOPRT => "echoprt",
        Echoctl = ECHOCTL => "echoctl",
        Isig = ISIG => "isig",
        Icanon = ICANON => "icanon",
        #[cfg(any(target_os = "macos", target_os = "ios"))]
        Altwerase = ALTWERASE => "altwerase",
        Iexten = IEXTEN => "iexten",
        Extproc = EXTPROC => "extproc",
        Tostop = TOSTOP => "tostop",
        Flusho = FLUSHO => "flusho",
        #[cfg(any(target_os = "macos", target_os = "ios"))]
        Nokerninfo = NOKERNINFO => "nokerninfo",
        Pendin = PENDIN => "pendin",
        Noflsh = NOFLSH => "noflsh",
    }
}

/// Character size field of the control register (`CSIZE`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharSize {
    /// 5 bits (`CS5`)
    Cs5,
    /// 6 bits (`CS6`)
    Cs6,
    /// 7 bits (`CS7`)
    Cs7,
    /// 8 bits (`CS8`)
    Cs8,
}

impl CharSize {
    /// Mask of the field inside `c_cflag`
    pub const MASK: tcflag_t = libc::CSIZE;

    /// Raw field value
    pub const fn bits(self) -> tcflag_t {
        match self {
            CharSize::Cs5 => libc::CS5,
            CharSize::Cs6 => libc::CS6,
            CharSize::Cs7 => libc::CS7,
            CharSize::Cs8 => libc::CS8,
        }
    }

    /// Decodes the field from a raw control register
    pub const fn from_cflag(raw: tcflag_t) -> Self {
        match raw & Self::MASK {
            x if x == libc::CS6 => CharSize::Cs6,
            x if x == libc::CS7 => CharSize::Cs7,
            x if x == libc::CS8 => CharSize::Cs8,
            _ => CharSize::Cs5,
        }
    }
}

impl ControlFlags {
    /// Character size currently selected
    pub fn char_size(&self) -> CharSize {
        CharSize::from_cflag(self.raw())
    }

    /// Replaces the character size, leaving every other bit alone
    pub fn set_char_size(&mut self, size: CharSize) {
        let raw = (self.raw() & !CharSize::MASK) | size.bits();
        *self = Self::from(raw);
    }
}
