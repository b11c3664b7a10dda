//! Line-by-line access to a text file of words separated by a common
//! delimiter.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use bstr::ByteSlice;

use crate::error::Result;

const BUFSIZE: usize = 64 * 1024;

/// An iterator over byte slices separated by a delimiter.
/// The iterated-over slices won't contain the delimiter, but may be empty.
#[derive(Clone)]
pub struct DelimIter<'a> {
    bytes: &'a [u8],
    pos: usize,
    delim: u8,
}

impl<'a> DelimIter<'a> {
    pub fn new(bytes: &[u8], delim: u8) -> DelimIter<'_> {
        DelimIter {
            bytes,
            pos: 0,
            delim,
        }
    }

    /// Non-empty words only. Each delimited slice is further split on any
    /// whitespace, so tabs and repeated separators never yield a word.
    pub fn words(self) -> impl Iterator<Item = &'a [u8]> {
        self.flat_map(|w| w.fields())
    }
}

impl<'a> Iterator for DelimIter<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<&'a [u8]> {
        if self.pos == self.bytes.len() {
            None
        } else {
            let start = self.pos;
            let bytes = &self.bytes[start..];
            let (end, new_pos) = match bytes.find_byte(self.delim) {
                None => (bytes.len(), bytes.len()),
                Some(next_line) => (next_line, next_line + 1),
            };
            self.pos = start + new_pos;
            Some(&bytes[..end])
        }
    }
}

/// A `Scanner` reads one file of delimited words, line by line.
///
/// Outside of that, you're on your own. This means lines that start
/// with the delimiter or have repeat delimiters will have empty words
/// being iterated over, unless [`DelimIter::words`] is used.
pub struct Scanner {
    path: PathBuf,
    delimiter: u8,
}

impl Scanner {
    pub fn new(path: impl AsRef<Path>, delimiter: u8) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            delimiter,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Calls `apply` with the 1-based line number and the words of every
    /// line, in file order, stopping at the first error.
    pub fn for_each_line<Apply>(&self, mut apply: Apply) -> Result<()>
    where
        Apply: FnMut(usize, DelimIter<'_>) -> Result<()>,
    {
        let file = File::open(&self.path)?;
        let reader = BufReader::with_capacity(BUFSIZE, file);
        for (i, line) in reader.split(b'\n').enumerate() {
            let line = line?;
            let end = match line.last() {
                Some(b'\r') => line.len() - 1,
                _ => line.len(),
            };
            let line = &line[..end];
            apply(i + 1, DelimIter::new(line, self.delimiter))?;
        }
        Ok(())
    }
}
