//! Parameter-file parsing.
//!
//! Scenario parameters arrive as a flat `key = value` text file with
//! `#` comment lines, one entry per line. [`ParamFile`] parses the file
//! strictly and offers typed accessors; unknown keys are preserved so a
//! scenario can pick the fields its model needs.

use crate::error::SceneError;
use indexmap::IndexMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// A parsed parameter file.
///
/// Entries keep file order. Lookups are by exact key.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParamFile {
    values: IndexMap<String, String>,
}

impl ParamFile {
    /// Parse parameter text.
    ///
    /// Blank lines and lines starting with `#` are skipped; every other
    /// line must contain an `=`. Later duplicates overwrite earlier ones.
    pub fn parse(text: &str) -> Result<Self, SceneError> {
        let mut values = IndexMap::new();
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some(eq) = line.find('=') else {
                return Err(SceneError::MalformedLine {
                    line_no: idx + 1,
                    line: raw.to_string(),
                });
            };
            let key = line[..eq].trim().to_string();
            let value = line[eq + 1..].trim().to_string();
            values.insert(key, value);
        }
        Ok(Self { values })
    }

    /// Read and parse a parameter file from disk.
    pub fn from_path(path: &Path) -> Result<Self, SceneError> {
        let text = fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// `true` if `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Raw string value for `key`, if present.
    pub fn get_raw(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    fn get_parsed<T: FromStr>(&self, key: &str) -> Result<T, SceneError> {
        let value = self
            .values
            .get(key)
            .ok_or_else(|| SceneError::MissingParameter {
                key: key.to_string(),
            })?;
        value.parse().map_err(|_| SceneError::MalformedParameter {
            key: key.to_string(),
            value: value.clone(),
        })
    }

    /// Required unsigned integer parameter.
    pub fn get_u32(&self, key: &str) -> Result<u32, SceneError> {
        self.get_parsed(key)
    }

    /// Required floating-point parameter.
    pub fn get_f64(&self, key: &str) -> Result<f64, SceneError> {
        self.get_parsed(key)
    }

    /// Optional floating-point parameter with a default.
    pub fn get_f64_or(&self, key: &str, default: f64) -> Result<f64, SceneError> {
        if self.contains(key) {
            self.get_f64(key)
        } else {
            Ok(default)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_keys_comments_and_blanks() {
        let pf = ParamFile::parse(
            "# scenario parameters\n\
             nofDirections = 8\n\
             \n\
             positionUpdateNoise=0.1\n",
        )
        .unwrap();
        assert_eq!(pf.get_u32("nofDirections").unwrap(), 8);
        assert_eq!(pf.get_f64("positionUpdateNoise").unwrap(), 0.1);
        assert!(!pf.contains("unicycleSpeed"));
    }

    #[test]
    fn missing_equals_is_malformed() {
        match ParamFile::parse("initX 4\n") {
            Err(SceneError::MalformedLine { line_no: 1, .. }) => {}
            other => panic!("expected MalformedLine, got {other:?}"),
        }
    }

    #[test]
    fn missing_key_is_reported() {
        let pf = ParamFile::parse("").unwrap();
        match pf.get_u32("initX") {
            Err(SceneError::MissingParameter { key }) => assert_eq!(key, "initX"),
            other => panic!("expected MissingParameter, got {other:?}"),
        }
    }

    #[test]
    fn unparsable_value_is_reported() {
        let pf = ParamFile::parse("initX = four\n").unwrap();
        match pf.get_u32("initX") {
            Err(SceneError::MalformedParameter { key, value }) => {
                assert_eq!(key, "initX");
                assert_eq!(value, "four");
            }
            other => panic!("expected MalformedParameter, got {other:?}"),
        }
    }

    #[test]
    fn optional_default_applies_only_when_absent() {
        let pf = ParamFile::parse("probabilityDirectionChangeFail = 0.2\n").unwrap();
        assert_eq!(
            pf.get_f64_or("probabilityDirectionChangeFail", 0.0).unwrap(),
            0.2
        );
        assert_eq!(pf.get_f64_or("unicycleSpeed", 1.0).unwrap(), 1.0);
    }
}
