//! Destinations for the progress output of a [`Model`](crate::modelling::Model).
//!
//! Output is only produced when `settings.verbose` is set.  It goes to
//! stdout unless redirected through [`ConfigurablePrintTarget`].

use std::fs::File;
use std::io::{Error, ErrorKind, Result, Stdout, Write};

/// Where verbose output is written
pub(crate) enum PrintTarget {
    Stdout(Stdout),
    File(File),
    Buffer(Vec<u8>),
    Stream(Box<dyn Write + Send + Sync>),
    Sink,
}

impl PrintTarget {
    // the writer behind this target, or None for a buffer or sink
    fn writer(&mut self) -> Option<&mut dyn Write> {
        match self {
            PrintTarget::Stdout(w) => Some(w),
            PrintTarget::File(w) => Some(w),
            PrintTarget::Stream(w) => Some(w),
            PrintTarget::Buffer(_) | PrintTarget::Sink => None,
        }
    }
}

impl std::fmt::Debug for PrintTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PrintTarget::Stdout(_) => "Stdout",
            PrintTarget::File(_) => "File",
            PrintTarget::Buffer(_) => "Buffer",
            PrintTarget::Stream(_) => "Stream",
            PrintTarget::Sink => "Sink",
        };
        write!(f, "PrintTarget::{name}")
    }
}

impl Default for PrintTarget {
    fn default() -> Self {
        PrintTarget::Stdout(std::io::stdout())
    }
}

impl Write for PrintTarget {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        if let PrintTarget::Buffer(buffer) = self {
            buffer.extend_from_slice(buf);
        }
        match self.writer() {
            Some(w) => w.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> Result<()> {
        match self.writer() {
            Some(w) => w.flush(),
            None => Ok(()),
        }
    }
}

/// Redirection of verbose output.  Switching target discards anything
/// held in a previous print buffer.
pub trait ConfigurablePrintTarget {
    /// write to stdout (the default)
    fn print_to_stdout(&mut self);
    /// write to a file
    fn print_to_file(&mut self, file: File);
    /// write to any stream
    fn print_to_stream(&mut self, stream: Box<dyn Write + Send + Sync>);
    /// collect output in memory, see
    /// [`get_print_buffer`](ConfigurablePrintTarget::get_print_buffer)
    fn print_to_buffer(&mut self);
    /// discard all output
    fn print_to_sink(&mut self);
    /// Output collected since the last call to
    /// [`print_to_buffer`](ConfigurablePrintTarget::print_to_buffer).
    /// Fails if output is not being collected.
    fn get_print_buffer(&mut self) -> Result<String>;
}

impl ConfigurablePrintTarget for PrintTarget {
    fn print_to_stdout(&mut self) {
        *self = PrintTarget::default();
    }

    fn print_to_file(&mut self, file: File) {
        *self = PrintTarget::File(file);
    }

    fn print_to_stream(&mut self, stream: Box<dyn Write + Send + Sync>) {
        *self = PrintTarget::Stream(stream);
    }

    fn print_to_buffer(&mut self) {
        *self = PrintTarget::Buffer(Vec::new());
    }

    fn print_to_sink(&mut self) {
        *self = PrintTarget::Sink;
    }

    fn get_print_buffer(&mut self) -> Result<String> {
        match self {
            PrintTarget::Buffer(buffer) => Ok(String::from_utf8_lossy(buffer).into_owned()),
            _ => Err(Error::new(ErrorKind::Other, "output is not being buffered")),
        }
    }
}

#[test]
fn test_print_target_buffer() {
    let mut target = PrintTarget::default();
    assert!(target.get_print_buffer().is_err());

    target.print_to_buffer();
    write!(target, "hello {}", 42).unwrap();
    writeln!(target, " world").unwrap();
    target.flush().unwrap();
    assert_eq!(target.get_print_buffer().unwrap(), "hello 42 world\n");
    assert_eq!(format!("{:?}", target), "PrintTarget::Buffer");

    // switching target discards the buffer
    target.print_to_sink();
    writeln!(target, "gone").unwrap();
    assert!(target.get_print_buffer().is_err());
}
