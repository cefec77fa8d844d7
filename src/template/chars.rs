//! Incremental UTF-8 decoding over a buffered byte stream.

use std::io::{self, BufRead};

const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// Yields the characters of a UTF-8 stream one at a time.
///
/// A leading byte-order mark is skipped. The iterator ends after the first error.
pub struct CharReader<R> {
    inner: R,
    started: bool,
    done: bool,
}

impl<R: BufRead> CharReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            started: false,
            done: false,
        }
    }

    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        loop {
            let available = match self.inner.fill_buf() {
                Ok(available) => available,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            let byte = available.first().copied();
            if byte.is_some() {
                self.inner.consume(1);
            }
            return Ok(byte);
        }
    }

    fn read_char(&mut self) -> io::Result<Option<char>> {
        let Some(first) = self.next_byte()? else {
            return Ok(None);
        };
        let width = utf8_width(first).ok_or_else(invalid_utf8)?;

        let mut bytes = [first, 0, 0, 0];
        for slot in bytes.iter_mut().take(width).skip(1) {
            *slot = self.next_byte()?.ok_or_else(invalid_utf8)?;
        }
        let decoded = std::str::from_utf8(&bytes[..width]).map_err(|_| invalid_utf8())?;
        Ok(decoded.chars().next())
    }
}

impl<R: BufRead> Iterator for CharReader<R> {
    type Item = io::Result<char>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            match self.read_char() {
                Ok(Some(c)) => {
                    let first = !self.started;
                    self.started = true;
                    if first && c == BYTE_ORDER_MARK {
                        continue;
                    }
                    return Some(Ok(c));
                }
                Ok(None) => {
                    self.done = true;
                    return None;
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

fn utf8_width(first: u8) -> Option<usize> {
    match first {
        0x00..=0x7F => Some(1),
        0xC2..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF4 => Some(4),
        _ => None,
    }
}

fn invalid_utf8() -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, "template stream is not valid UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(bytes: &[u8]) -> io::Result<String> {
        CharReader::new(bytes).collect()
    }

    #[test]
    fn test_multibyte_characters() {
        assert_eq!(decode("héllo → ✓ 🎉".as_bytes()).unwrap(), "héllo → ✓ 🎉");
    }

    #[test]
    fn test_leading_bom_is_skipped_once() {
        let text = "\u{FEFF}a\u{FEFF}b";
        assert_eq!(decode(text.as_bytes()).unwrap(), "a\u{FEFF}b");
    }

    #[test]
    fn test_invalid_sequences_fail() {
        let err = decode(&[b'a', 0xFF, b'b']).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);

        // Truncated three-byte sequence.
        assert!(decode(&[0xE2, 0x82]).is_err());
    }

    #[test]
    fn test_small_buffers_split_sequences() {
        let text = "ünïcödé";
        let reader = io::BufReader::with_capacity(1, text.as_bytes());
        let decoded: io::Result<String> = CharReader::new(reader).collect();
        assert_eq!(decoded.unwrap(), text);
    }
}
