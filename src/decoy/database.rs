use super::reverse::DEFAULT_DECOY_PREFIX;
use crate::errors::Result;
use crate::protein::fasta::{FileFastaReader, ReadMode};
use crate::protein::headers::HeaderStyle;
use crate::protein::models::Protein;
use crate::protein::writer::{FastaWriter, DEFAULT_LINE_WIDTH};
use crate::reporting::{LogSink, NullSink, WarningSink};
use log::*;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoyOptions {
    pub decoy_prefix: String,
    /// Rewrite NCBI / UniProt / contaminant headers before writing.
    pub clean_headers: bool,
    /// NCBI clean-up keeps the RefSeq accession when there is one.
    pub ref_seq_only: bool,
    /// UniProt clean-up keeps the entry name instead of the accession.
    pub keep_uniprot_id: bool,
}

impl Default for DecoyOptions {
    fn default() -> Self {
        Self {
            decoy_prefix: DEFAULT_DECOY_PREFIX.to_string(),
            clean_headers: false,
            ref_seq_only: false,
            keep_uniprot_id: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceKind {
    Extra,
    Contaminant,
    Database,
}

/// Concatenated target/decoy database from extra sequences, contaminants
/// and one or more main databases, in that order.
///
/// All targets are written first, then all decoys. The decoys come from a
/// second pass over the same files so no database is held in memory.
#[derive(Debug, Clone)]
pub struct DecoyDatabaseBuilder {
    sources: Vec<(SourceKind, PathBuf)>,
    options: DecoyOptions,
    line_width: usize,
    mode: ReadMode,
}

impl Default for DecoyDatabaseBuilder {
    fn default() -> Self {
        Self::new(DecoyOptions::default())
    }
}

impl DecoyDatabaseBuilder {
    pub fn new(options: DecoyOptions) -> Self {
        Self {
            sources: Vec::new(),
            options,
            line_width: DEFAULT_LINE_WIDTH,
            mode: ReadMode::Fast,
        }
    }

    pub fn with_line_width(mut self, line_width: usize) -> Self {
        self.line_width = line_width;
        self
    }

    /// Read mode for the main databases. Extras and contaminants are
    /// always validated.
    pub fn with_read_mode(mut self, mode: ReadMode) -> Self {
        self.mode = mode;
        self
    }

    /// Entries renamed `EXTRA_0001`, `EXTRA_0002`, ... with the old
    /// accession moved into the description.
    pub fn add_extras<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.sources
            .push((SourceKind::Extra, path.as_ref().to_path_buf()));
        self
    }

    pub fn add_contaminants<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.sources
            .push((SourceKind::Contaminant, path.as_ref().to_path_buf()));
        self
    }

    pub fn add_database<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.sources
            .push((SourceKind::Database, path.as_ref().to_path_buf()));
        self
    }

    fn ordered_sources(&self) -> impl Iterator<Item = &(SourceKind, PathBuf)> {
        let of_kind = move |kind: SourceKind| self.sources.iter().filter(move |(k, _)| *k == kind);
        of_kind(SourceKind::Extra)
            .chain(of_kind(SourceKind::Contaminant))
            .chain(of_kind(SourceKind::Database))
    }

    fn read_mode(&self, kind: SourceKind) -> ReadMode {
        match kind {
            SourceKind::Database => self.mode,
            SourceKind::Extra | SourceKind::Contaminant => ReadMode::Validate,
        }
    }

    /// Contaminant files always get the `CONT_` clean-up; the others only
    /// the NCBI and UniProt ones.
    fn header_style(&self, kind: SourceKind, accession: &str) -> Option<HeaderStyle> {
        if kind == SourceKind::Contaminant {
            return Some(HeaderStyle::Contaminant);
        }
        HeaderStyle::detect_with(
            accession,
            self.options.ref_seq_only,
            self.options.keep_uniprot_id,
        )
        .filter(|style| *style != HeaderStyle::Contaminant)
    }

    /// Streams every target entry, after header clean-up and renaming, into
    /// `emit`. Bad-character warnings go to `sink`.
    fn for_each_target<F>(&self, sink: &mut dyn WarningSink, mut emit: F) -> Result<()>
    where
        F: FnMut(&Protein) -> Result<()>,
    {
        let mut extra_count = 0;
        for &(kind, ref path) in self.ordered_sources() {
            let reader = FileFastaReader::open(path, self.read_mode(kind))?.with_sink(&mut *sink);
            for protein in reader {
                let mut protein = protein?;
                if self.options.clean_headers {
                    if let Some(style) = self.header_style(kind, &protein.accession) {
                        style.apply(&mut protein);
                    }
                }
                if kind == SourceKind::Extra {
                    extra_count += 1;
                    protein.description = format!("[{}] {}", protein.accession, protein.description);
                    protein.accession = format!("EXTRA_{:04}", extra_count);
                }
                emit(&protein)?;
            }
        }
        Ok(())
    }

    /// Writes targets then decoys to `writer`. Returns the number of
    /// target entries.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<usize> {
        self.write_to_with_sink(writer, LogSink)
    }

    /// Like [`DecoyDatabaseBuilder::write_to`], reporting bad characters to
    /// `sink`. Each entry is reported once, from the target pass.
    pub fn write_to_with_sink<W: Write, S: WarningSink>(&self, writer: W, mut sink: S) -> Result<usize> {
        let st = Instant::now();
        let mut out = FastaWriter::new(writer).with_line_width(self.line_width);
        self.for_each_target(&mut sink, |protein| out.write(protein))?;
        let targets = out.written();
        self.for_each_target(&mut NullSink, |protein| {
            out.write(&protein.reverse(&self.options.decoy_prefix))
        })?;
        out.flush()?;
        info!(
            "Wrote {} target and {} decoy entries in {:?}",
            targets,
            out.written() - targets,
            st.elapsed()
        );
        Ok(targets)
    }

    /// Writes the concatenated database to an uncompressed FASTA file.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<usize> {
        let file = std::fs::File::create(path.as_ref())?;
        let targets = self.write_to(std::io::BufWriter::new(file))?;
        info!("Target/decoy database written to {:?}", path.as_ref());
        Ok(targets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protein::fasta::FastaReader;
    use crate::reporting::{Warning, WarningCollector};
    use std::io::Write;
    use tempfile::TempDir;

    fn write_fasta(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    fn read_back(bytes: &[u8]) -> Vec<Protein> {
        FastaReader::new(bytes, ReadMode::Fast).read_all().unwrap()
    }

    #[test]
    fn test_targets_then_decoys() {
        let dir = TempDir::new().unwrap();
        let main = write_fasta(
            &dir,
            "main.fasta",
            ">sp|P1|ONE_HUMAN One OS=Homo sapiens\nMKPEPTIDEK\n>sp|P2|TWO_HUMAN Two\nGGGR\n",
        );
        let contams = write_fasta(&dir, "contams.fasta", ">CONT_0001|P02769 Albumin\nAAAK\n");
        let extras = write_fasta(&dir, "extras.fasta", ">myGFP green\nMSKGE\n");

        // registration order does not matter
        let builder = DecoyDatabaseBuilder::default()
            .add_database(&main)
            .add_contaminants(&contams)
            .add_extras(&extras);
        let mut out = Vec::new();
        assert_eq!(builder.write_to(&mut out).unwrap(), 4);

        let proteins = read_back(&out);
        let accessions: Vec<&str> = proteins.iter().map(|p| p.accession.as_str()).collect();
        assert_eq!(
            accessions,
            vec![
                "EXTRA_0001",
                "CONT_0001|P02769",
                "sp|P1|ONE_HUMAN",
                "sp|P2|TWO_HUMAN",
                "REV_EXTRA_0001",
                "REV_CONT_0001",
                "REV_P1",
                "REV_P2",
            ]
        );
        assert_eq!(proteins[0].description, "[myGFP] green");
        assert_eq!(proteins[4].sequence, "EGKSM");
        assert_eq!(proteins[6].sequence, "KEDITPEPKM");
        assert_eq!(proteins[6].description, "REVERSED.");
    }

    #[test]
    fn test_clean_headers() {
        let dir = TempDir::new().unwrap();
        let main = write_fasta(
            &dir,
            "main.fasta",
            ">sp|P1|ONE_HUMAN One. OS=Homo sapiens\nMKPEPTIDEK\n>gi|42|ref|NP_9| Two\nGGGR\n",
        );
        let options = DecoyOptions {
            decoy_prefix: "DECOY".to_string(),
            clean_headers: true,
            ..Default::default()
        };
        let builder = DecoyDatabaseBuilder::new(options)
            .with_line_width(4)
            .add_database(&main);
        let path = dir.path().join("out.fasta");
        assert_eq!(builder.write(&path).unwrap(), 2);

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with(">P1 One (ONE_HUMAN).\nMKPE\nPTID\nEK\n"));
        let proteins = read_back(text.as_bytes());
        assert_eq!(proteins[1].accession, "gi|42");
        assert_eq!(proteins[1].description, "Two.");
        assert_eq!(proteins[2].accession, "DECOY_P1");
        assert_eq!(proteins[3].accession, "DECOY_42");
    }

    #[test]
    fn test_extras_and_contaminants_are_validated() {
        let dir = TempDir::new().unwrap();
        let main = write_fasta(&dir, "main.fasta", ">M1 main\nGG1R\n");
        let contams = write_fasta(&dir, "contams.fasta", ">CONT_0001 Albumin\nAA#AK\n");
        let extras = write_fasta(&dir, "extras.fasta", ">myGFP green\nMS1KGE\n");
        let builder = DecoyDatabaseBuilder::default()
            .add_extras(&extras)
            .add_contaminants(&contams)
            .add_database(&main);
        let mut sink = WarningCollector::new();
        let mut out = Vec::new();
        assert_eq!(builder.write_to_with_sink(&mut out, &mut sink).unwrap(), 3);

        let proteins = read_back(&out);
        assert_eq!(proteins[0].sequence, "MSKGE");
        assert_eq!(proteins[1].sequence, "AAAK");
        // main databases follow the configured mode, fast by default
        assert_eq!(proteins[2].sequence, "GG1R");
        assert_eq!(proteins[3].sequence, "EGKSM");
        // one warning per bad entry, none from the decoy pass
        let accessions: Vec<&str> = sink
            .warnings
            .iter()
            .map(|w| match w {
                Warning::InvalidCharacters { accession, .. } => accession.as_str(),
                other => panic!("unexpected warning {:?}", other),
            })
            .collect();
        assert_eq!(accessions, vec!["myGFP", "CONT_0001"]);
    }

    #[test]
    fn test_contaminant_clean_up_only_for_contaminant_files() {
        let dir = TempDir::new().unwrap();
        let main = write_fasta(&dir, "main.fasta", ">CONT_0009|P1 lookalike\nGGGR\n");
        let contams = write_fasta(
            &dir,
            "contams.fasta",
            ">CONT_0001|P02769 Albumin.\nAAAK\n>ALBU_BOVIN|P02769 Albumin\nCCCK\n",
        );
        let options = DecoyOptions {
            clean_headers: true,
            ..Default::default()
        };
        let builder = DecoyDatabaseBuilder::new(options)
            .add_database(&main)
            .add_contaminants(&contams);
        let mut out = Vec::new();
        builder.write_to(&mut out).unwrap();

        let proteins = read_back(&out);
        assert_eq!(proteins[0].accession, "CONT_0001");
        assert_eq!(proteins[0].description, "Albumin (P02769).");
        assert_eq!(proteins[1].accession, "ALBU_BOVIN");
        assert_eq!(proteins[1].description, "Albumin (P02769).");
        assert_eq!(proteins[2].accession, "CONT_0009|P1");
        assert_eq!(proteins[2].description, "lookalike");
    }

    #[test]
    fn test_missing_source() {
        let builder = DecoyDatabaseBuilder::default().add_database("/nonexistent/db.fasta");
        assert!(builder.write_to(Vec::new()).is_err());
    }
}
