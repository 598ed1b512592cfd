use super::models::Protein;
use crate::errors::Result;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub const DEFAULT_LINE_WIDTH: usize = 80;

/// Writes one entry: `>accession description` and the sequence wrapped at
/// `line_width` characters. A width of 0 puts the whole sequence on one line.
pub fn write_protein<W: Write>(writer: &mut W, protein: &Protein, line_width: usize) -> Result<()> {
    writeln!(writer, ">{}", protein.header())?;
    let sequence = protein.sequence.as_bytes();
    if sequence.is_empty() {
        return Ok(());
    }
    let width = if line_width == 0 {
        sequence.len()
    } else {
        line_width
    };
    for chunk in sequence.chunks(width) {
        writer.write_all(chunk)?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}

/// Uncompressed FASTA output.
pub struct FastaWriter<W: Write> {
    inner: W,
    line_width: usize,
    written: usize,
}

impl FastaWriter<BufWriter<File>> {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path.as_ref())?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> FastaWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            line_width: DEFAULT_LINE_WIDTH,
            written: 0,
        }
    }

    pub fn with_line_width(mut self, line_width: usize) -> Self {
        self.line_width = line_width;
        self
    }

    pub fn write(&mut self, protein: &Protein) -> Result<()> {
        write_protein(&mut self.inner, protein, self.line_width)?;
        self.written += 1;
        Ok(())
    }

    /// Number of entries written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }

    pub fn into_inner(mut self) -> Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protein::fasta::{FastaReader, ReadMode};
    use std::io::Cursor;

    fn roundtrip(proteins: &[Protein], width: usize) -> Vec<Protein> {
        let mut writer = FastaWriter::new(Vec::new()).with_line_width(width);
        for p in proteins {
            writer.write(p).unwrap();
        }
        assert_eq!(writer.written(), proteins.len());
        let bytes = writer.into_inner().unwrap();
        FastaReader::new(Cursor::new(bytes), ReadMode::Fast)
            .read_all()
            .unwrap()
    }

    #[test]
    fn test_wrapping() {
        let p = Protein::new("P1", "test", "MKPEPTIDEK");
        let mut out = Vec::new();
        write_protein(&mut out, &p, 4).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), ">P1 test\nMKPE\nPTID\nEK\n");

        let bare = Protein::new("P2", "", "MK");
        let mut out = Vec::new();
        write_protein(&mut out, &bare, 0).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), ">P2\nMK\n");
    }

    #[test]
    fn test_roundtrip_any_width() {
        let long: String = "ACDEFGHIKLMNPQRSTVWYBJOUXZ*-".repeat(9);
        let proteins = vec![
            Protein::new("sp|P1|A_HUMAN", "Alpha protein OS=Homo sapiens", &long),
            Protein::new("P2", "", "MKPEPTIDEK"),
            Protein::new("gi|3|ref|NP_3|", "merged\u{1}gi|4|ref|NP_4| other", "MK"),
        ];
        for width in [1, 7, 60, 80, 0] {
            assert_eq!(roundtrip(&proteins, width), proteins);
        }
    }
}
