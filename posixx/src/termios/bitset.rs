//! Fixed-width bitset over one termios register and the flag-set contract

use core::fmt;
use libc::tcflag_t;

/// Width of a termios register in bits
pub const TC_WIDTH: u32 = tcflag_t::BITS;

/// Bit position of a single-bit termios constant
///
/// Multi-bit masks are rejected at compile time by the flag tables, so the
/// lowest set bit is the position.
pub const fn shifted_by(flag: tcflag_t) -> u32 {
    flag.trailing_zeros()
}

/// Bit-for-bit copy of one raw termios register
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TcBitset(tcflag_t);

impl TcBitset {
    /// Number of addressable bits
    pub const WIDTH: u32 = TC_WIDTH;

    /// Wraps a raw register value
    pub const fn new(raw: tcflag_t) -> Self {
        Self(raw)
    }

    /// Raw register value
    pub const fn raw(&self) -> tcflag_t {
        self.0
    }

    /// Tests the bit at `pos`; positions past the width read as clear
    pub const fn test(&self, pos: u32) -> bool {
        pos < Self::WIDTH && self.0 & (1 << pos) != 0
    }

    /// Sets or clears the bit at `pos`; positions past the width are ignored
    pub fn assign(&mut self, pos: u32, value: bool) {
        if pos >= Self::WIDTH {
            return;
        }
        if value {
            self.0 |= 1 << pos;
        } else {
            self.0 &= !(1 << pos);
        }
    }

    /// Number of set bits, named or not
    pub const fn count(&self) -> u32 {
        self.0.count_ones()
    }
}

impl fmt::Debug for TcBitset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TcBitset({:#b})", self.0)
    }
}

/// One named bit of a flag set together with its current state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamedFlag<F> {
    /// The enumeration member
    pub flag: F,
    /// Display name, lower case as in the C headers
    pub name: &'static str,
    /// Whether the bit is currently set
    pub set: bool,
}

/// Contract every termios flag set fulfils
///
/// Implementations come from the `termios_flags!` table macro, which also
/// checks at compile time that `ALL` and `FLAG_NAMES` have `FLAG_COUNT`
/// entries each.
pub trait TermiosFlags: Copy + From<tcflag_t> + Into<tcflag_t> {
    /// Enumeration of the named bits; discriminants are bit positions
    type Flag: Copy + Eq + fmt::Debug + 'static;

    /// Number of named bits
    const FLAG_COUNT: usize;

    /// Named bits in declaration order
    const ALL: &'static [Self::Flag];

    /// Display names, parallel to [`ALL`](Self::ALL)
    const FLAG_NAMES: &'static [&'static str];

    /// Underlying bitset
    fn bits(&self) -> &TcBitset;

    /// Underlying bitset, mutable
    fn bits_mut(&mut self) -> &mut TcBitset;

    /// Bit position of `flag`
    fn position(flag: Self::Flag) -> u32;

    /// Display name of `flag`
    fn name_of(flag: Self::Flag) -> &'static str {
        Self::ALL
            .iter()
            .position(|f| *f == flag)
            .map_or("", |i| Self::FLAG_NAMES[i])
    }

    /// Raw register value
    fn raw(&self) -> tcflag_t {
        self.bits().raw()
    }

    /// Tests one named bit
    fn test(&self, flag: Self::Flag) -> bool {
        self.bits().test(Self::position(flag))
    }

    /// Sets one named bit
    fn set(&mut self, flag: Self::Flag) {
        self.assign(flag, true);
    }

    /// Clears one named bit
    fn clear(&mut self, flag: Self::Flag) {
        self.assign(flag, false);
    }

    /// Sets or clears one named bit
    fn assign(&mut self, flag: Self::Flag, value: bool) {
        self.bits_mut().assign(Self::position(flag), value);
    }

    /// All named bits in declaration order with their names and state
    fn named(&self) -> impl Iterator<Item = NamedFlag<Self::Flag>> + '_ {
        Self::ALL
            .iter()
            .zip(Self::FLAG_NAMES)
            .map(move |(&flag, &name)| NamedFlag {
                flag,
                name,
                set: self.test(flag),
            })
    }

    /// Named bits that are currently set
    fn set_flags(&self) -> impl Iterator<Item = Self::Flag> + '_ {
        self.named().filter(|n| n.set).map(|n| n.flag)
    }
}

/// Declares one flag set type, its bit enumeration and the name tables
///
/// Each entry maps an enumeration member to a `libc` constant and a display
/// name. Entries may carry `#[cfg(...)]` for platform-only bits.
macro_rules! termios_flags {
    (
        $(#[$set_meta:meta])*
        pub struct $set:ident;
        $(#[$flag_meta:meta])*
        pub enum $flag:ident {
            $(
                $(#[$meta:meta])*
                $variant:ident = $bit:ident => $name:literal,
            )+
        }
    ) => {
        $(#[$set_meta])*
        #[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
        pub struct $set($crate::termios::TcBitset);

        $(#[$flag_meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u32)]
        pub enum $flag {
            $(
                $(#[$meta])*
                #[doc = concat!("`", stringify!($bit), "`")]
                $variant = $crate::termios::bitset::shifted_by(libc::$bit),
            )+
        }

        $(
            $(#[$meta])*
            static_assertions::const_assert_eq!(libc::$bit.count_ones(), 1);
        )+

        impl $crate::termios::TermiosFlags for $set {
            type Flag = $flag;

            const FLAG_COUNT: usize = Self::ALL.len();

            const ALL: &'static [$flag] = &[
                $(
                    $(#[$meta])*
                    $flag::$variant,
                )+
            ];

            const FLAG_NAMES: &'static [&'static str] = &[
                $(
                    $(#[$meta])*
                    $name,
                )+
            ];

            fn bits(&self) -> &$crate::termios::TcBitset {
                &self.0
            }

            fn bits_mut(&mut self) -> &mut $crate::termios::TcBitset {
                &mut self.0
            }

            fn position(flag: $flag) -> u32 {
                flag as u32
            }
        }

        static_assertions::const_assert_eq!(
            <$set as $crate::termios::TermiosFlags>::ALL.len(),
            <$set as $crate::termios::TermiosFlags>::FLAG_NAMES.len()
        );

        impl $set {
            /// Set with no bits
            pub const fn empty() -> Self {
                Self($crate::termios::TcBitset::new(0))
            }

            /// Returns a copy with `flag` set
            pub fn with(mut self, flag: $flag) -> Self {
                $crate::termios::TermiosFlags::set(&mut self, flag);
                self
            }
        }

        impl From<libc::tcflag_t> for $set {
            fn from(raw: libc::tcflag_t) -> Self {
                Self($crate::termios::TcBitset::new(raw))
            }
        }

        impl From<$set> for libc::tcflag_t {
            fn from(flags: $set) -> Self {
                flags.0.raw()
            }
        }

        impl core::fmt::Debug for $set {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                let names = $crate::termios::TermiosFlags::named(self)
                    .filter(|n| n.set)
                    .map(|n| n.name);
                write!(f, "{}(", stringify!($set))?;
                f.debug_set().entries(names).finish()?;
                write!(f, " {:#x})", self.0.raw())
            }
        }
    };
}

pub(crate) use termios_flags;
