use super::models::{Protein, ProteinBuilder};
use crate::errors::{FastaLibError, Result};
use crate::reporting::{LogSink, Warning, WarningSink};
use flate2::read::MultiGzDecoder;
use log::*;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

/// How sequence lines are treated.
///
/// Validation checks every character against the amino acid alphabet and is
/// roughly 3-4x slower than appending lines as they are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadMode {
    #[default]
    Fast,
    Validate,
}

/// Single pass FASTA reader.
///
/// Keeps one line of lookahead: the header of the next entry is found while
/// reading the sequence of the current one. Each call hands out a fresh,
/// caller-owned [`Protein`]. The underlying handle is dropped as soon as the
/// stream is exhausted or an I/O error occurs.
///
/// Lines are decoded leniently: bytes that are not UTF-8 (Latin-1 headers
/// in old databases) become U+FFFD instead of failing the read.
pub struct FastaReader<R, S = LogSink> {
    inner: Option<R>,
    lookahead: Option<String>,
    started: bool,
    mode: ReadMode,
    sink: S,
    line: Vec<u8>,
    /// I/O error hit while an entry was being read, returned by the next call.
    pending_error: Option<FastaLibError>,
}

pub type FileFastaReader = FastaReader<Box<dyn BufRead + Send>>;

impl FileFastaReader {
    /// Opens a plain or gzip (`.gz` suffix) FASTA file.
    pub fn open<P: AsRef<Path>>(path: P, mode: ReadMode) -> Result<Self> {
        let path = path.as_ref();
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("{} could not be opened: {}", path.display(), e);
                return Err(e.into());
            }
        };
        let is_gz = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("gz"))
            .unwrap_or(false);
        let reader: Box<dyn BufRead + Send> = if is_gz {
            Box::new(BufReader::new(MultiGzDecoder::new(file)))
        } else {
            Box::new(BufReader::new(file))
        };
        debug!("Opened {} (gzip: {})", path.display(), is_gz);
        Ok(FastaReader::new(reader, mode))
    }
}

impl<R: BufRead> FastaReader<R> {
    pub fn new(reader: R, mode: ReadMode) -> Self {
        Self {
            inner: Some(reader),
            lookahead: None,
            started: false,
            mode,
            sink: LogSink,
            line: Vec::new(),
            pending_error: None,
        }
    }
}

impl<R: BufRead, S: WarningSink> FastaReader<R, S> {
    /// Routes bad-character warnings to `sink` instead of the log.
    pub fn with_sink<S2: WarningSink>(self, sink: S2) -> FastaReader<R, S2> {
        FastaReader {
            inner: self.inner,
            lookahead: self.lookahead,
            started: self.started,
            mode: self.mode,
            sink,
            line: self.line,
            pending_error: self.pending_error,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    pub fn is_exhausted(&self) -> bool {
        self.inner.is_none()
    }

    /// Next line, or None at EOF. Closes the handle on EOF and on error.
    fn next_line(&mut self) -> Result<Option<String>> {
        let Some(reader) = self.inner.as_mut() else {
            return Ok(None);
        };
        self.line.clear();
        match reader.read_until(b'\n', &mut self.line) {
            Ok(0) => {
                self.inner = None;
                Ok(None)
            }
            Ok(_) => Ok(Some(String::from_utf8_lossy(&self.line).into_owned())),
            Err(e) => {
                self.inner = None;
                Err(e.into())
            }
        }
    }

    fn close(&mut self) {
        self.inner = None;
        self.lookahead = None;
    }

    /// Reads the next entry. `Ok(None)` means the stream is exhausted (or
    /// did not start with a header) and the handle has been closed.
    pub fn read_next(&mut self) -> Result<Option<Protein>> {
        if let Some(e) = self.pending_error.take() {
            self.close();
            return Err(e);
        }
        if !self.started {
            self.started = true;
            match self.next_line()? {
                Some(line) => self.lookahead = Some(line.trim().to_string()),
                None => return Ok(None),
            }
        }

        let header = match self.lookahead.take() {
            Some(header) if header.starts_with('>') => header,
            _ => {
                self.close();
                return Ok(None);
            }
        };

        let mut builder = ProteinBuilder::from_header(&header);
        loop {
            let line = match self.next_line() {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    // hand out what was read so far, fail on the next call
                    self.pending_error = Some(e);
                    break;
                }
            };
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if line.starts_with('>') {
                self.lookahead = Some(trimmed.to_string());
                break;
            }
            match self.mode {
                ReadMode::Fast => builder.append_sequence(trimmed),
                ReadMode::Validate => builder.append_checked(trimmed),
            }
        }

        if !builder.rejected.is_empty() {
            let characters = std::mem::take(&mut builder.rejected);
            self.sink.on_warning(Warning::InvalidCharacters {
                accession: builder.accession.clone(),
                characters,
            });
        }
        Ok(Some(builder.build()))
    }

    /// Fills `slot` with a freshly read entry. Returns false at the end of the
    /// stream, leaving `slot` untouched.
    pub fn read_into(&mut self, slot: &mut Protein) -> Result<bool> {
        match self.read_next()? {
            Some(protein) => {
                *slot = protein;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Drains the reader into a vector.
    pub fn read_all(mut self) -> Result<Vec<Protein>> {
        let st = Instant::now();
        let mut proteins = Vec::new();
        while let Some(protein) = self.read_next()? {
            proteins.push(protein);
        }
        info!("Read {} proteins in {:?}", proteins.len(), st.elapsed());
        Ok(proteins)
    }
}

impl<R: BufRead, S: WarningSink> Iterator for FastaReader<R, S> {
    type Item = Result<Protein>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_next().transpose()
    }
}
