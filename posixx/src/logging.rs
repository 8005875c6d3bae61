//! Feature-gated logging for posixx
//!
//! With the `log` feature these macros forward to the `log` facade. Without
//! it they still consume their arguments, so call sites never need their own
//! `#[cfg]` attributes.

/// Trace-level logging
macro_rules! posix_trace {
    ($($arg:tt)*) => {{
        #[cfg(feature = "log")]
        {
            log::trace!($($arg)*);
        }
        #[cfg(not(feature = "log"))]
        {
            let _ = format_args!($($arg)*);
        }
    }};
}

/// Debug-level logging
macro_rules! posix_debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "log")]
        {
            log::debug!($($arg)*);
        }
        #[cfg(not(feature = "log"))]
        {
            let _ = format_args!($($arg)*);
        }
    }};
}

/// Warn-level logging
macro_rules! posix_warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "log")]
        {
            log::warn!($($arg)*);
        }
        #[cfg(not(feature = "log"))]
        {
            let _ = format_args!($($arg)*);
        }
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_macros_accept_format_args() {
        let fd = 3;
        let op = "read";
        posix_trace!("{} on fd {}", op, fd);
        posix_debug!("{op} failed");
        posix_warn!("plain message");
    }
}
