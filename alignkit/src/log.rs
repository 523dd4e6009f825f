//! Non-allocating console output.
//!
//! Lines are staged in a fixed buffer and handed straight to `write(2)`, so
//! printing never touches the heap and is usable from `const`-heavy test
//! binaries and tools that inspect raw storage.

use spin::Mutex;
use std::fmt;
use std::fmt::Write;

#[doc(hidden)]
#[cold]
pub fn _print(args: fmt::Arguments<'_>, new_line: bool, stream: Stream) {
    let mut out = match stream {
        Stream::Stdout => STDOUT.lock(),
        Stream::Stderr => STDERR.lock(),
    };
    // Formatting only fails if a `Display` impl fails; drop the line then.
    if out.write_fmt(args).is_err() {
        out.cursor = 0;
        return;
    }
    if new_line {
        out.push(b'\n');
    }
    out.flush();
}

#[macro_export]
macro_rules! print {
    ($($arg:tt)*) => {{
        $crate::log::_print(format_args!($($arg)*), false, $crate::log::Stream::Stdout);
    }};
}

#[macro_export]
macro_rules! println {
    () => {{
        $crate::log::_print(format_args!(""), true, $crate::log::Stream::Stdout);
    }};
    ($($arg:tt)*) => {{
        $crate::log::_print(format_args!($($arg)*), true, $crate::log::Stream::Stdout);
    }};
}

#[macro_export]
macro_rules! eprint {
    ($($arg:tt)*) => {{
        $crate::log::_print(format_args!($($arg)*), false, $crate::log::Stream::Stderr);
    }};
}

#[macro_export]
macro_rules! eprintln {
    () => {{
        $crate::log::_print(format_args!(""), true, $crate::log::Stream::Stderr);
    }};
    ($($arg:tt)*) => {{
        $crate::log::_print(format_args!($($arg)*), true, $crate::log::Stream::Stderr);
    }};
}

#[doc(hidden)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

impl Stream {
    const fn fd(self) -> libc::c_int {
        match self {
            Self::Stdout => libc::STDOUT_FILENO,
            Self::Stderr => libc::STDERR_FILENO,
        }
    }
}

static STDOUT: Mutex<LineBuffer> = Mutex::new(LineBuffer::new(Stream::Stdout));
static STDERR: Mutex<LineBuffer> = Mutex::new(LineBuffer::new(Stream::Stderr));

struct LineBuffer {
    stream: Stream,
    cursor: usize,
    buffer: [u8; 80],
}

impl LineBuffer {
    const fn new(stream: Stream) -> Self {
        Self {
            stream,
            cursor: 0,
            buffer: [0; 80],
        }
    }

    fn flush(&mut self) {
        let mut written = 0;
        while written < self.cursor {
            let pending = &self.buffer[written..self.cursor];
            let n = unsafe {
                libc::write(self.stream.fd(), pending.as_ptr() as _, pending.len())
            };
            if n <= 0 {
                // Nowhere to report a failing console; discard the line.
                break;
            }
            written += n as usize;
        }
        self.cursor = 0;
    }

    #[inline(always)]
    fn push(&mut self, c: u8) {
        if self.cursor == self.buffer.len() {
            self.flush();
        }
        self.buffer[self.cursor] = c;
        self.cursor += 1;
    }
}

impl Write for LineBuffer {
    fn write_str(&mut self, s: &str) -> Result<(), fmt::Error> {
        s.bytes().for_each(|b| self.push(b));
        Ok(())
    }
}
