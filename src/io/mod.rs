use std::error;
use std::fmt::{self, Display};
use std::io::{self, BufRead};

/// The type for errors occurring in reading puzzle data.
#[derive(Debug)]
pub enum ReadError {
    Io(io::Error),
    InvalidFormat,
    InvalidValue,
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ReadError::Io(ref err) => Display::fmt(err, f),
            ReadError::InvalidFormat => write!(f, "invalid format"),
            ReadError::InvalidValue => write!(f, "invalid value"),
        }
    }
}

impl error::Error for ReadError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            ReadError::Io(ref err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ReadError {
    fn from(err: io::Error) -> ReadError {
        ReadError::Io(err)
    }
}

fn is_comment(s: &str) -> bool {
    s.trim_start().starts_with('#')
}

/// Reads the next line that is neither blank nor a `#` comment.
/// Returns `Ok(0)` at end of input.
pub fn next_valid_line<R: BufRead>(reader: &mut R, buf: &mut String) -> io::Result<usize> {
    loop {
        buf.clear();
        let len = reader.read_line(buf)?;

        if len == 0 {
            return Ok(0);
        }

        if !buf.trim().is_empty() && !is_comment(buf) {
            return Ok(len);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_valid_line() {
        let mut src = "
# a comment

first line
second # not a comment marker mid-line
"
        .as_bytes();
        let mut buf = String::new();

        next_valid_line(&mut src, &mut buf).unwrap();
        assert_eq!(buf.trim(), "first line");
        next_valid_line(&mut src, &mut buf).unwrap();
        assert_eq!(buf.trim(), "second # not a comment marker mid-line");
        assert_eq!(next_valid_line(&mut src, &mut buf).unwrap(), 0);
    }
}
