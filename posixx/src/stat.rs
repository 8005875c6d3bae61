//! File status snapshots
//!
//! [`Stat`] owns a `libc::stat` filled in by `fstat`. Mode bits are decoded
//! either as a [`FileType`] plus [`ModeBits`], or as a human-readable dump
//! against the full POSIX mode table.

use std::io;

/// File mode type
pub type Mode = u32;

const S_IFMT: Mode = libc::S_IFMT as Mode;
const S_IFIFO: Mode = libc::S_IFIFO as Mode;
const S_IFCHR: Mode = libc::S_IFCHR as Mode;
const S_IFDIR: Mode = libc::S_IFDIR as Mode;
const S_IFBLK: Mode = libc::S_IFBLK as Mode;
const S_IFREG: Mode = libc::S_IFREG as Mode;
const S_IFLNK: Mode = libc::S_IFLNK as Mode;
const S_IFSOCK: Mode = libc::S_IFSOCK as Mode;

bitflags::bitflags! {
    /// Permission and special bits of a file mode
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ModeBits: Mode {
        /// Set-user-ID on execution
        const SET_UID = libc::S_ISUID as Mode;
        /// Set-group-ID on execution
        const SET_GID = libc::S_ISGID as Mode;
        /// Sticky bit
        const STICKY = libc::S_ISVTX as Mode;
        /// Read permission for owner
        const OWNER_READ = libc::S_IRUSR as Mode;
        /// Write permission for owner
        const OWNER_WRITE = libc::S_IWUSR as Mode;
        /// Execute permission for owner
        const OWNER_EXEC = libc::S_IXUSR as Mode;
        /// Read permission for group
        const GROUP_READ = libc::S_IRGRP as Mode;
        /// Write permission for group
        const GROUP_WRITE = libc::S_IWGRP as Mode;
        /// Execute permission for group
        const GROUP_EXEC = libc::S_IXGRP as Mode;
        /// Read permission for others
        const OTHER_READ = libc::S_IROTH as Mode;
        /// Write permission for others
        const OTHER_WRITE = libc::S_IWOTH as Mode;
        /// Execute permission for others
        const OTHER_EXEC = libc::S_IXOTH as Mode;

        /// Read, write, execute for owner
        const OWNER_RWX = Self::OWNER_READ.bits() | Self::OWNER_WRITE.bits() | Self::OWNER_EXEC.bits();
        /// Read, write, execute for group
        const GROUP_RWX = Self::GROUP_READ.bits() | Self::GROUP_WRITE.bits() | Self::GROUP_EXEC.bits();
        /// Read, write, execute for others
        const OTHER_RWX = Self::OTHER_READ.bits() | Self::OTHER_WRITE.bits() | Self::OTHER_EXEC.bits();
    }
}

/// File type encoded in the `S_IFMT` bits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    /// Named pipe
    Fifo,
    /// Character device
    CharDevice,
    /// Directory
    Directory,
    /// Block device
    BlockDevice,
    /// Regular file
    Regular,
    /// Symbolic link
    Symlink,
    /// Socket
    Socket,
    /// Type bits no POSIX type matches
    Unknown(Mode),
}

impl FileType {
    /// Decodes the type bits of `mode`
    pub const fn from_mode(mode: Mode) -> Self {
        match mode & S_IFMT {
            S_IFIFO => FileType::Fifo,
            S_IFCHR => FileType::CharDevice,
            S_IFDIR => FileType::Directory,
            S_IFBLK => FileType::BlockDevice,
            S_IFREG => FileType::Regular,
            S_IFLNK => FileType::Symlink,
            S_IFSOCK => FileType::Socket,
            other => FileType::Unknown(other),
        }
    }
}

/// How a mode table entry is matched against `st_mode`
#[derive(Clone, Copy)]
enum Match {
    /// The type field equals the entry
    Type,
    /// Any bit of the entry is set
    Any,
}

struct ModeEntry {
    name: &'static str,
    bits: Mode,
    description: &'static str,
    how: Match,
}

const fn entry(name: &'static str, bits: Mode, how: Match, description: &'static str) -> ModeEntry {
    ModeEntry {
        name,
        bits,
        description,
        how,
    }
}

/// Full POSIX mode table in header order
const MODE_TABLE: &[ModeEntry] = &[
    entry("S_IFMT", S_IFMT, Match::Any, "type of file mask"),
    entry("S_IFIFO", S_IFIFO, Match::Type, "named pipe (fifo)"),
    entry("S_IFCHR", S_IFCHR, Match::Type, "character special"),
    entry("S_IFDIR", S_IFDIR, Match::Type, "directory"),
    entry("S_IFBLK", S_IFBLK, Match::Type, "block special"),
    entry("S_IFREG", S_IFREG, Match::Type, "regular"),
    entry("S_IFLNK", S_IFLNK, Match::Type, "symbolic link"),
    entry("S_IFSOCK", S_IFSOCK, Match::Type, "socket"),
    entry("S_IRWXU", ModeBits::OWNER_RWX.bits(), Match::Any, "RWX mask for owner"),
    entry("S_IRUSR", ModeBits::OWNER_READ.bits(), Match::Any, "R for owner"),
    entry("S_IWUSR", ModeBits::OWNER_WRITE.bits(), Match::Any, "W for owner"),
    entry("S_IXUSR", ModeBits::OWNER_EXEC.bits(), Match::Any, "X for owner"),
    entry("S_IRWXG", ModeBits::GROUP_RWX.bits(), Match::Any, "RWX mask for group"),
    entry("S_IRGRP", ModeBits::GROUP_READ.bits(), Match::Any, "R for group"),
    entry("S_IWGRP", ModeBits::GROUP_WRITE.bits(), Match::Any, "W for group"),
    entry("S_IXGRP", ModeBits::GROUP_EXEC.bits(), Match::Any, "X for group"),
    entry("S_IRWXO", ModeBits::OTHER_RWX.bits(), Match::Any, "RWX mask for other"),
    entry("S_IROTH", ModeBits::OTHER_READ.bits(), Match::Any, "R for other"),
    entry("S_IWOTH", ModeBits::OTHER_WRITE.bits(), Match::Any, "W for other"),
    entry("S_IXOTH", ModeBits::OTHER_EXEC.bits(), Match::Any, "X for other"),
    entry("S_ISUID", ModeBits::SET_UID.bits(), Match::Any, "set user id on execution"),
    entry("S_ISGID", ModeBits::SET_GID.bits(), Match::Any, "set group id on execution"),
    entry("S_ISVTX", ModeBits::STICKY.bits(), Match::Any, "directory restricted delete"),
    // BSD spelling of the sticky bit
    #[cfg(any(target_os = "macos", target_os = "ios"))]
    entry("S_ISTXT", ModeBits::STICKY.bits(), Match::Any, "sticky bit: not supported"),
    entry("S_IREAD", ModeBits::OWNER_READ.bits(), Match::Any, "backward compatibility"),
    entry("S_IWRITE", ModeBits::OWNER_WRITE.bits(), Match::Any, "backward compatibility"),
    entry("S_IEXEC", ModeBits::OWNER_EXEC.bits(), Match::Any, "backward compatibility"),
];

/// Snapshot of one file's metadata
#[derive(Clone, Copy)]
pub struct Stat {
    raw: libc::stat,
}

impl Stat {
    /// Wraps a structure filled in by `fstat` or `stat`
    pub fn from_raw(raw: libc::stat) -> Self {
        Self { raw }
    }

    /// The OS structure
    pub fn as_raw(&self) -> &libc::stat {
        &self.raw
    }

    /// Device containing the file
    pub fn dev(&self) -> u64 {
        self.raw.st_dev as u64
    }

    /// Full mode: type and permission bits
    pub fn mode(&self) -> Mode {
        self.raw.st_mode as Mode
    }

    /// Number of hard links
    pub fn nlink(&self) -> u64 {
        self.raw.st_nlink as u64
    }

    /// Inode number
    pub fn ino(&self) -> u64 {
        self.raw.st_ino as u64
    }

    /// Owner user id
    pub fn uid(&self) -> u32 {
        self.raw.st_uid
    }

    /// Owner group id
    pub fn gid(&self) -> u32 {
        self.raw.st_gid
    }

    /// Device id, for special files
    pub fn rdev(&self) -> u64 {
        self.raw.st_rdev as u64
    }

    /// Size in bytes
    pub fn size(&self) -> i64 {
        self.raw.st_size as i64
    }

    /// Preferred I/O block size
    pub fn blksize(&self) -> i64 {
        self.raw.st_blksize as i64
    }

    /// Number of 512-byte blocks allocated
    pub fn blocks(&self) -> i64 {
        self.raw.st_blocks as i64
    }

    /// Last access time, seconds since the epoch
    pub fn atime(&self) -> i64 {
        self.raw.st_atime as i64
    }

    /// Last modification time, seconds since the epoch
    pub fn mtime(&self) -> i64 {
        self.raw.st_mtime as i64
    }

    /// Last status change time, seconds since the epoch
    pub fn ctime(&self) -> i64 {
        self.raw.st_ctime as i64
    }

    /// User-defined file flags
    #[cfg(any(target_os = "macos", target_os = "ios"))]
    pub fn flags(&self) -> u32 {
        self.raw.st_flags
    }

    /// File generation number
    #[cfg(any(target_os = "macos", target_os = "ios"))]
    pub fn generation(&self) -> u32 {
        self.raw.st_gen
    }

    /// Type decoded from the mode
    pub fn file_type(&self) -> FileType {
        FileType::from_mode(self.mode())
    }

    /// Permission and special bits of the mode
    pub fn permissions(&self) -> ModeBits {
        ModeBits::from_bits_truncate(self.mode())
    }

    /// Writes every field, a blank line, then [`debug_dump_mode`](Self::debug_dump_mode)
    pub fn debug_dump<W: io::Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "device: {}", self.dev())?;
        writeln!(out, "mode: {}", self.mode())?;
        writeln!(out, "nlink: {}", self.nlink())?;
        writeln!(out, "ino: {}", self.ino())?;
        writeln!(out, "uid: {}", self.uid())?;
        writeln!(out, "gid: {}", self.gid())?;
        writeln!(out, "rdev: {}", self.rdev())?;
        writeln!(out, "size: {}", self.size())?;
        writeln!(out, "blksize: {}", self.blksize())?;
        writeln!(out, "blocks: {}", self.blocks())?;
        #[cfg(any(target_os = "macos", target_os = "ios"))]
        {
            writeln!(out, "flags: {}", self.flags())?;
            writeln!(out, "gen: {}", self.generation())?;
        }
        writeln!(out, "mtime: {}", self.mtime())?;
        writeln!(out, "atime: {}", self.atime())?;
        writeln!(out, "ctime: {}", self.ctime())?;
        writeln!(out)?;
        self.debug_dump_mode(out)
    }

    /// Writes the name and description of every mode table entry present in the mode
    pub fn debug_dump_mode<W: io::Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "Flags: ")?;
        for entry in self.mode_entries() {
            write!(out, "\n{} - {}", entry.name, entry.description)?;
        }
        writeln!(out)
    }

    fn mode_entries(&self) -> impl Iterator<Item = &'static ModeEntry> {
        let mode = self.mode();
        MODE_TABLE.iter().filter(move |entry| match entry.how {
            Match::Type => mode & S_IFMT == entry.bits,
            Match::Any => mode & entry.bits != 0,
        })
    }

    /// Symbolic names of the mode table entries present in the mode
    pub fn mode_names(&self) -> Vec<&'static str> {
        self.mode_entries().map(|entry| entry.name).collect()
    }
}

impl From<libc::stat> for Stat {
    fn from(raw: libc::stat) -> Self {
        Self::from_raw(raw)
    }
}

impl core::fmt::Debug for Stat {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Stat")
            .field("dev", &self.dev())
            .field("ino", &self.ino())
            .field("file_type", &self.file_type())
            .field("permissions", &self.permissions())
            .field("nlink", &self.nlink())
            .field("uid", &self.uid())
            .field("gid", &self.gid())
            .field("size", &self.size())
            .finish_non_exhaustive()
    }
}
