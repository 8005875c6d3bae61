//! Integration tests for posixx
//!
//! Flag-set properties run through proptest; descriptor tests use real
//! pipes and temporary files.

use std::fs;
use std::io::Write;
use std::os::unix::io::IntoRawFd;
use std::path::PathBuf;

use libc::tcflag_t;
use posixx::{
    debug_dump_flags, AutoCloseFileDescriptor, ChangeMode, CharSize, ControlFlags, FileType,
    FlagDump, InputFlag, InputFlags, LocalFlag, LocalFlags, ModeBits, OutputFlags, Pipe,
    Termios, TermiosFlags,
};
use proptest::prelude::*;

// ============================================================
// Flag sets
// ============================================================

fn round_trips<T: TermiosFlags>(raw: tcflag_t) -> bool {
    let flags = T::from(raw);
    flags.raw() == raw && Into::<tcflag_t>::into(flags) == raw
}

/// Sets then clears the `index`-th named bit, checking every other bit is untouched
fn set_clear_isolated<T: TermiosFlags>(raw: tcflag_t, index: usize) -> bool {
    let flag = T::ALL[index % T::FLAG_COUNT];
    let mask: tcflag_t = 1 << T::position(flag);

    let mut flags = T::from(raw);
    flags.set(flag);
    let set_ok = flags.test(flag) && flags.raw() == raw | mask;
    flags.clear(flag);
    let clear_ok = !flags.test(flag) && flags.raw() == raw & !mask;
    set_ok && clear_ok
}

fn named_is_stable<T: TermiosFlags>(raw: tcflag_t) -> bool {
    let flags = T::from(raw);
    let first: Vec<_> = flags.named().collect();
    let second: Vec<_> = flags.named().collect();
    first.len() == T::FLAG_COUNT
        && first == second
        && first.iter().all(|n| n.set == flags.test(n.flag) && !n.name.is_empty())
}

proptest! {
    #[test]
    fn flags_round_trip_full_width(raw in any::<tcflag_t>()) {
        prop_assert!(round_trips::<InputFlags>(raw));
        prop_assert!(round_trips::<OutputFlags>(raw));
        prop_assert!(round_trips::<ControlFlags>(raw));
        prop_assert!(round_trips::<LocalFlags>(raw));
    }

    #[test]
    fn flags_set_clear_one_bit(raw in any::<tcflag_t>(), index in 0usize..64) {
        prop_assert!(set_clear_isolated::<InputFlags>(raw, index));
        prop_assert!(set_clear_isolated::<OutputFlags>(raw, index));
        prop_assert!(set_clear_isolated::<ControlFlags>(raw, index));
        prop_assert!(set_clear_isolated::<LocalFlags>(raw, index));
    }

    #[test]
    fn flags_named_order_stable(raw in any::<tcflag_t>()) {
        prop_assert!(named_is_stable::<InputFlags>(raw));
        prop_assert!(named_is_stable::<OutputFlags>(raw));
        prop_assert!(named_is_stable::<ControlFlags>(raw));
        prop_assert!(named_is_stable::<LocalFlags>(raw));
    }

    #[test]
    fn char_size_keeps_other_bits(raw in any::<tcflag_t>()) {
        let mut flags = ControlFlags::from(raw);
        flags.set_char_size(CharSize::Cs7);
        prop_assert_eq!(flags.char_size(), CharSize::Cs7);
        prop_assert_eq!(flags.raw() & !CharSize::MASK, raw & !CharSize::MASK);
    }
}

#[test]
fn test_icrnl_ixon_example() {
    let flags = InputFlags::from(libc::ICRNL | libc::IXON);
    assert!(flags.test(InputFlag::Icrnl));
    assert!(flags.test(InputFlag::Ixon));
    assert!(!flags.test(InputFlag::Ignbrk));
    assert_eq!(flags.raw(), libc::ICRNL | libc::IXON);
}

#[test]
fn test_termios_dump_lists_every_name() {
    let mut termios = Termios::new();
    termios.set_local(LocalFlags::empty().with(LocalFlag::Icanon));

    let mut out = Vec::new();
    debug_dump_flags(&termios.local(), &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.lines().count(), LocalFlags::FLAG_COUNT);
    assert!(text.contains("icanon true\n"));
    assert!(text.contains("echo false\n"));
    assert_eq!(text, FlagDump::new(&termios.local()).to_string());
}

// ============================================================
// Descriptors
// ============================================================

fn open_pipe() -> (AutoCloseFileDescriptor, AutoCloseFileDescriptor) {
    let mut pipe = Pipe::new();
    pipe.open().expect("pipe");
    pipe.into_descriptors()
}

fn temp_path(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("posixx-{}-{}", std::process::id(), tag))
}

#[test]
fn test_pipe_transfers_bytes() {
    let (reader, writer) = open_pipe();
    let payload: Vec<u8> = (0..=255).collect();
    assert_eq!(writer.write(&payload).unwrap(), payload.len());

    let mut buf = vec![0u8; payload.len()];
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..]).unwrap();
        assert!(n > 0);
        filled += n;
    }
    assert_eq!(buf, payload);
}

#[test]
fn test_pipe_ends_are_fifos() {
    let (reader, writer) = open_pipe();
    assert_eq!(reader.stat().unwrap().file_type(), FileType::Fifo);
    let stat = writer.stat().unwrap();
    assert_eq!(stat.file_type(), FileType::Fifo);
    assert!(stat.mode_names().contains(&"S_IFIFO"));
}

#[test]
fn test_stat_size_matches_metadata() {
    let path = temp_path("stat-size");
    {
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(&[7u8; 1234]).unwrap();
    }
    let expected = fs::metadata(&path).unwrap().len();

    let fd = AutoCloseFileDescriptor::new(fs::File::open(&path).unwrap().into_raw_fd());
    let stat = fd.stat().unwrap();
    assert_eq!(stat.size() as u64, expected);
    assert_eq!(stat.file_type(), FileType::Regular);
    assert!(stat.permissions().contains(ModeBits::OWNER_READ));

    drop(fd);
    fs::remove_file(&path).unwrap();
}

#[test]
fn test_stat_dump_of_real_file() {
    let path = temp_path("stat-dump");
    fs::write(&path, b"abc").unwrap();
    let fd = AutoCloseFileDescriptor::new(fs::File::open(&path).unwrap().into_raw_fd());

    let mut out = Vec::new();
    fd.stat().unwrap().debug_dump(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("\nsize: 3\n"));
    assert!(text.contains("\nS_IFREG - regular"));

    drop(fd);
    fs::remove_file(&path).unwrap();
}

#[test]
fn test_stat_on_closed_handle() {
    let (reader, _writer) = open_pipe();
    let mut fd = reader.into_inner();
    fd.close().unwrap();
    let err = fd.stat().unwrap_err();
    assert_eq!(err.op(), "fstat");
    assert_eq!(err.errno(), libc::EBADF);
}

/// Opens a pseudo-terminal, `(controller, terminal)`
fn open_pty() -> (AutoCloseFileDescriptor, AutoCloseFileDescriptor) {
    let (mut controller, mut terminal) = (-1, -1);
    let status = unsafe {
        libc::openpty(
            &mut controller,
            &mut terminal,
            std::ptr::null_mut::<libc::c_char>(),
            std::ptr::null_mut::<libc::termios>(),
            std::ptr::null_mut::<libc::winsize>(),
        )
    };
    assert_eq!(status, 0, "openpty: {}", std::io::Error::last_os_error());
    (
        AutoCloseFileDescriptor::new(controller),
        AutoCloseFileDescriptor::new(terminal),
    )
}

#[test]
fn test_set_termios_applies_given_attributes() {
    let (_controller, terminal) = open_pty();
    let original = terminal.termios().unwrap();
    let echo = original.local().test(LocalFlag::Echo);

    let mut changed = original;
    let mut local = changed.local();
    local.assign(LocalFlag::Echo, !echo);
    changed.set_local(local);
    terminal.set_termios(&changed, ChangeMode::Now).unwrap();

    let applied = terminal.termios().unwrap();
    assert_eq!(applied.local().test(LocalFlag::Echo), !echo);
    // an empty structure would have cleared these too
    assert_eq!(
        applied.local().test(LocalFlag::Icanon),
        original.local().test(LocalFlag::Icanon)
    );
    assert_eq!(applied.control().char_size(), original.control().char_size());

    terminal.set_termios(&original, ChangeMode::Drain).unwrap();
    assert_eq!(terminal.termios().unwrap().local().test(LocalFlag::Echo), echo);
}

#[test]
fn test_termios_on_pipe_is_enotty() {
    let (reader, _writer) = open_pipe();
    let err = reader.termios().unwrap_err();
    assert_eq!(err.errno(), libc::ENOTTY);
    assert_eq!(std::io::Error::from(err).raw_os_error(), Some(libc::ENOTTY));
}

#[test]
fn test_move_leaves_source_unowned() {
    let (reader, writer) = open_pipe();
    let mut source = writer.into_inner();
    let fd = source.fd();
    let dest = AutoCloseFileDescriptor::from(source.take());

    assert!(!source.is_owned());
    assert!(source.close().is_ok());
    assert_eq!(dest.fd(), fd);
    assert_eq!(dest.write(b"z").unwrap(), 1);

    let mut buf = [0u8; 1];
    assert_eq!(reader.read(&mut buf).unwrap(), 1);
}

#[test]
fn test_close_twice_never_fails() {
    let (reader, _writer) = open_pipe();
    let mut fd = reader.into_inner();
    assert!(fd.close().is_ok());
    assert!(fd.close().is_ok());
}
