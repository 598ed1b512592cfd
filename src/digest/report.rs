use super::unique::PeptideIndex;
use crate::errors::Result;
use crate::models::Peptide;
use csv::WriterBuilder;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

pub fn get_table_labels() -> [&'static str; 8] {
    [
        "Accession",
        "Peptide",
        "Start",
        "End",
        "Mass",
        "Missed_Cleavages",
        "Unique",
        "Other_Proteins",
    ]
}

fn as_table_record(accession: &str, peptide: &Peptide, index: &PeptideIndex) -> [String; 8] {
    let unique = if index.is_unique(&peptide.sequence) {
        "TRUE"
    } else {
        "FALSE"
    };
    let others = index.other_proteins(&peptide.sequence, accession);
    let others = if others.is_empty() {
        " ".to_string()
    } else {
        others.join("; ")
    };
    [
        accession.to_string(),
        peptide.sequence.clone(),
        peptide.start.to_string(),
        peptide.end.to_string(),
        format!("{:.2}", peptide.mass),
        peptide.missed_cleavages.to_string(),
        unique.to_string(),
        others,
    ]
}

/// Tab separated table of every peptide of every protein, flagged unique or
/// shared against `index`.
pub fn write_digest_table<W: Write>(
    writer: W,
    digests: &[(String, Vec<Peptide>)],
    index: &PeptideIndex,
) -> Result<()> {
    let mut writer = WriterBuilder::new().delimiter(b'\t').from_writer(writer);
    writer.write_record(get_table_labels())?;
    for (accession, peptides) in digests {
        for peptide in peptides {
            writer.write_record(&as_table_record(accession, peptide, index))?;
        }
    }
    writer.flush()?;
    Ok(())
}

pub fn write_digest_table_to_path<P: AsRef<Path>>(
    digests: &[(String, Vec<Peptide>)],
    index: &PeptideIndex,
    out_path: P,
) -> Result<()> {
    let start = Instant::now();
    let file = std::fs::File::create(out_path.as_ref())?;
    write_digest_table(std::io::BufWriter::new(file), digests, index)?;
    log::info!(
        "Writing took {:?} -> {:?}",
        start.elapsed(),
        out_path.as_ref()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::digestion::{DigestionParameters, Enzyme};
    use crate::mass::MassType;

    #[test]
    fn test_digest_table() {
        let params = DigestionParameters {
            enzyme: Enzyme::Trypsin,
            low_mass: 0.0,
            high_mass: 10000.0,
            min_length: 3,
            max_missed_cleavages: 0,
            mass_type: MassType::Monoisotopic,
        };
        let digests: Vec<(String, Vec<Peptide>)> = [("P1", "GGGKLLLR"), ("P2", "AAAKIIIR")]
            .into_iter()
            .map(|(acc, seq)| (acc.to_string(), params.digest(seq)))
            .collect();
        let index = PeptideIndex::from_digests(
            digests
                .iter()
                .map(|(acc, peps)| (acc.as_str(), peps.as_slice())),
        );
        let mut out = Vec::new();
        write_digest_table(&mut out, &digests, &index).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "Accession\tPeptide\tStart\tEnd\tMass\tMissed_Cleavages\tUnique\tOther_Proteins"
        );
        assert_eq!(lines.len(), 5);
        let first: Vec<&str> = lines[1].split('\t').collect();
        assert_eq!(&first[..4], &["P1", "GGGK", "1", "4"]);
        assert_eq!(first[6], "TRUE");
        assert_eq!(first[7], " ");
        let shared: Vec<&str> = lines[2].split('\t').collect();
        assert_eq!(shared[1], "LLLR");
        assert_eq!(shared[6], "FALSE");
        assert_eq!(shared[7], "P2");
    }
}
