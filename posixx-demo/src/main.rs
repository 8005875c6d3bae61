use std::io::{self, Write};

use anyhow::{bail, Context};
use log::{Level, LevelFilter, Log, Metadata, Record};
use posixx::{debug_dump_flags, FileDescriptor, RawFd};

/// Minimal stderr logger; level comes from `POSIXX_LOG`
struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let tag = match record.level() {
            Level::Error => "E",
            Level::Warn => "W",
            Level::Info => "I",
            Level::Debug => "D",
            Level::Trace => "T",
        };
        eprintln!("[{}] {}", tag, record.args());
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging() {
    let level = match std::env::var("POSIXX_LOG").as_deref() {
        Ok("error") => LevelFilter::Error,
        Ok("warn") => LevelFilter::Warn,
        Ok("info") => LevelFilter::Info,
        Ok("debug") => LevelFilter::Debug,
        Ok("trace") => LevelFilter::Trace,
        _ => LevelFilter::Warn,
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

struct Options {
    fd: RawFd,
    stat: bool,
}

fn parse_args() -> anyhow::Result<Option<Options>> {
    let mut opts = Options {
        fd: libc::STDOUT_FILENO,
        stat: false,
    };
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--fd" => {
                let value = args.next().context("--fd needs a value")?;
                opts.fd = value
                    .parse()
                    .with_context(|| format!("invalid descriptor {:?}", value))?;
            }
            "--stat" => opts.stat = true,
            "--help" | "-h" => {
                write_help(&mut io::stdout().lock())?;
                return Ok(None);
            }
            other => bail!("unknown argument {:?}", other),
        }
    }
    Ok(Some(opts))
}

fn write_help<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "posixx-demo usage:")?;
    writeln!(out, "  posixx-demo [--fd <n>] [--stat]")?;
    writeln!(out)?;
    writeln!(out, "Options:")?;
    writeln!(out, "  --fd <n>   descriptor to inspect (default: stdout)")?;
    writeln!(out, "  --stat     also dump the file status")?;
    writeln!(out)?;
    writeln!(out, "Environment:")?;
    writeln!(out, "  POSIXX_LOG=error|warn|info|debug|trace")
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let Some(opts) = parse_args()? else {
        return Ok(());
    };

    // Borrowed descriptor: never closed here
    let fd = FileDescriptor::new(opts.fd);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match fd.termios() {
        Ok(termios) => {
            log::info!("terminal attributes of fd {}", opts.fd);
            write!(out, "\nInput: \n")?;
            debug_dump_flags(&termios.input(), &mut out)?;
            write!(out, "\nOutput: \n")?;
            debug_dump_flags(&termios.output(), &mut out)?;
            write!(out, "\nControl: \n")?;
            debug_dump_flags(&termios.control(), &mut out)?;
            writeln!(out, "char_size {:?}", termios.control().char_size())?;
            write!(out, "\nLocal: \n")?;
            debug_dump_flags(&termios.local(), &mut out)?;
        }
        // Not a terminal is expected when output is redirected
        Err(err) if err.errno() == libc::ENOTTY && opts.stat => {
            log::warn!("fd {} is not a terminal", opts.fd);
        }
        Err(err) => {
            return Err(err)
                .with_context(|| format!("reading terminal attributes of fd {}", opts.fd));
        }
    }

    if opts.stat {
        let stat = fd
            .stat()
            .with_context(|| format!("reading status of fd {}", opts.fd))?;
        writeln!(out)?;
        stat.debug_dump(&mut out)?;
    }

    out.flush()?;
    Ok(())
}
