use crate::decoy::database::{DecoyDatabaseBuilder, DecoyOptions};
use crate::digest::digestion::{DigestionParameters, Digester};
use crate::errors::Result;
use crate::protein::fasta::ReadMode;
use crate::protein::writer::DEFAULT_LINE_WIDTH;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings shared by the database tools, loadable from JSON. Missing keys
/// take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub digestion: DigestionParameters,
    pub decoy: DecoyOptions,
    pub line_width: usize,
    /// Check sequence characters against the amino acid alphabet on read.
    pub validate: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            digestion: DigestionParameters::default(),
            decoy: DecoyOptions::default(),
            line_width: DEFAULT_LINE_WIDTH,
            validate: false,
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        let config: Self = serde_json::from_reader(std::io::BufReader::new(file))?;
        log::debug!("Loaded configuration from {:?}", path.as_ref());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn read_mode(&self) -> ReadMode {
        if self.validate {
            ReadMode::Validate
        } else {
            ReadMode::Fast
        }
    }

    pub fn digester(&self) -> Digester {
        self.digestion.digester()
    }

    pub fn decoy_builder(&self) -> DecoyDatabaseBuilder {
        DecoyDatabaseBuilder::new(self.decoy.clone())
            .with_line_width(self.line_width)
            .with_read_mode(self.read_mode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::digestion::Enzyme;
    use crate::mass::MassType;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::from_json("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.digestion.enzyme, Enzyme::Trypsin);
        assert_eq!(config.digestion.low_mass, 500.0);
        assert_eq!(config.digestion.high_mass, 5000.0);
        assert_eq!(config.digestion.min_length, 7);
        assert_eq!(config.digestion.max_missed_cleavages, 2);
        assert_eq!(config.digestion.mass_type, MassType::Monoisotopic);
        assert_eq!(config.decoy.decoy_prefix, "REV_");
        assert_eq!(config.line_width, 80);
        assert_eq!(config.read_mode(), ReadMode::Fast);
    }

    #[test]
    fn test_partial_json() {
        let json = r#"{
            "digestion": {"enzyme": "Lys-C", "max_missed_cleavages": 1, "mass_type": "ave"},
            "decoy": {"decoy_prefix": "DECOY", "clean_headers": true},
            "validate": true
        }"#;
        let config = EngineConfig::from_json(json).unwrap();
        assert_eq!(config.digestion.enzyme, Enzyme::LysC);
        assert_eq!(config.digestion.max_missed_cleavages, 1);
        assert_eq!(config.digestion.mass_type, MassType::Average);
        assert_eq!(config.digestion.min_length, 7);
        assert_eq!(config.decoy.decoy_prefix, "DECOY");
        assert!(config.decoy.clean_headers);
        assert!(!config.decoy.ref_seq_only);
        assert_eq!(config.read_mode(), ReadMode::Validate);
    }

    #[test]
    fn test_bad_json() {
        assert!(EngineConfig::from_json(r#"{"digestion": {"enzyme": "papain"}}"#).is_err());
        assert!(EngineConfig::from_json("not json").is_err());
        assert!(EngineConfig::from_json_file("/nonexistent/config.json").is_err());
    }

    #[test]
    fn test_file_round_trip() {
        let mut config = EngineConfig::default();
        config.line_width = 60;
        config.digestion.enzyme = Enzyme::GluC;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(config.to_json().unwrap().as_bytes()).unwrap();
        file.flush().unwrap();
        assert_eq!(EngineConfig::from_json_file(file.path()).unwrap(), config);
    }
}
