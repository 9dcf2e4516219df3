use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::error::CatalogError;
use crate::catalog::NameResolver;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TleEntry {
    pub name: String,
    /// File the element set was read from.
    pub source: String,
}

/// Satellite names taken from the element sets in a TLE directory.
///
/// Only names are kept. Element sets still go through sgp4, so a file a
/// propagator would reject contributes no names.
pub struct TleCatalog {
    tle_dir: PathBuf,
    entries: HashMap<u32, TleEntry>,
}

impl TleCatalog {
    pub fn new(tle_dir: PathBuf) -> Self {
        Self {
            tle_dir,
            entries: HashMap::new(),
        }
    }

    /// Reads every `.tle`/`.txt` file in the directory. Files that fail to
    /// parse are skipped with a warning. On error the previous names stay.
    pub fn load_all(&mut self) -> Result<(), CatalogError> {
        if !self.tle_dir.is_dir() {
            return Err(CatalogError::DirectoryNotFound(
                self.tle_dir.display().to_string(),
            ));
        }

        let mut entries = HashMap::new();
        for path in tle_files(&self.tle_dir)? {
            let source = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            let parsed = fs::read_to_string(&path)
                .map_err(CatalogError::from)
                .and_then(|text| names_in(&text, &source));

            match parsed {
                Ok(names) => {
                    for (norad, name) in names {
                        entries.insert(
                            norad,
                            TleEntry {
                                name,
                                source: source.clone(),
                            },
                        );
                    }
                }
                Err(e) => log::warn!("Skipping {}: {}", path.display(), e),
            }
        }

        log::debug!(
            "Catalog holds {} satellites from {}",
            entries.len(),
            self.tle_dir.display()
        );
        self.entries = entries;
        Ok(())
    }

    /// Re-read the directory so lookups see updated element sets.
    pub fn reload(&mut self) -> Result<(), CatalogError> {
        self.load_all()
    }

    pub fn get(&self, norad: u32) -> Option<&TleEntry> {
        self.entries.get(&norad)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl NameResolver for TleCatalog {
    fn resolve_name(&self, norad: u32) -> Option<String> {
        self.get(norad).map(|e| e.name.clone())
    }
}

/// Sorted so that a NORAD id present in two files resolves deterministically.
fn tle_files(dir: &Path) -> Result<Vec<PathBuf>, CatalogError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_tle = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("tle") | Some("txt")
        );
        if path.is_file() && is_tle {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// NORAD id and display name of every element set in `text`.
///
/// A file is either all 2-line sets or all 3-line sets, decided by its first
/// line. Unnamed sets are called `NORAD <id>`.
fn names_in(text: &str, source: &str) -> Result<Vec<(u32, String)>, CatalogError> {
    let invalid = |message: String| CatalogError::InvalidTle {
        file: source.to_string(),
        message,
    };

    let cleaned: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    let cleaned = cleaned.join("\n");

    let elements = if cleaned.starts_with("1 ") {
        sgp4::parse_2les(&cleaned)
    } else {
        sgp4::parse_3les(&cleaned)
    }
    .map_err(|e| invalid(e.to_string()))?;

    elements
        .into_iter()
        .map(|el| -> Result<(u32, String), CatalogError> {
            let norad = u32::try_from(el.norad_id)
                .map_err(|_| invalid(format!("NORAD id {} out of range", el.norad_id)))?;
            let name = el
                .object_name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| format!("NORAD {}", norad));
            Ok((norad, name))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_config;
    use tempfile::TempDir;

    const ISS_LINE1: &str = "1 25544U 98067A   20194.88612269 -.00002218  00000-0 -31515-4 0  9992";
    const ISS_LINE2: &str = "2 25544  51.6461 221.2784 0001413  89.1723 280.4612 15.49507896236008";

    fn iss(name: Option<&str>) -> String {
        match name {
            Some(name) => format!("{}\n{}\n{}\n", name, ISS_LINE1, ISS_LINE2),
            None => format!("{}\n{}\n", ISS_LINE1, ISS_LINE2),
        }
    }

    fn catalog_with(files: &[(&str, String)]) -> (TempDir, TleCatalog) {
        let dir = TempDir::new().unwrap();
        for (file, content) in files {
            fs::write(dir.path().join(file), content).unwrap();
        }
        let mut catalog = TleCatalog::new(dir.path().to_path_buf());
        catalog.load_all().unwrap();
        (dir, catalog)
    }

    #[test]
    fn names_from_three_line_sets() {
        let text = format!("\n  ISS (ZARYA)  \n{}\n\n{}\n", ISS_LINE1, ISS_LINE2);
        let names = names_in(&text, "stations.tle").unwrap();
        assert_eq!(names, vec![(25544, "ISS (ZARYA)".to_string())]);
    }

    #[test]
    fn names_from_two_line_sets() {
        let names = names_in(&iss(None), "iss.txt").unwrap();
        assert_eq!(names, vec![(25544, "NORAD 25544".to_string())]);
    }

    #[test]
    fn corrupt_set_reports_file() {
        let text = iss(Some("BROKEN")).replace("25544", "XXXXX");
        match names_in(&text, "bad.tle") {
            Err(CatalogError::InvalidTle { file, .. }) => assert_eq!(file, "bad.tle"),
            other => panic!("expected invalid TLE, got {:?}", other),
        }
    }

    #[test]
    fn resolves_names_from_directory() {
        let (_dir, catalog) = catalog_with(&[("stations.tle", iss(Some("ISS (ZARYA)")))]);

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.resolve_name(25544).as_deref(), Some("ISS (ZARYA)"));
        assert_eq!(
            catalog.get(25544).map(|e| e.source.as_str()),
            Some("stations.tle")
        );
        assert_eq!(catalog.resolve_name(25338), None);
    }

    #[test]
    fn reload_refreshes_satellite_names() {
        let (dir, mut catalog) = catalog_with(&[("stations.tle", iss(Some("ISS (ZARYA)")))]);

        let mut config = default_config();
        config.satellites[0].norad = 25544;
        let sat = config.satellite(25544).unwrap();
        assert_eq!(sat.name(&catalog).as_deref(), Some("ISS (ZARYA)"));

        fs::write(dir.path().join("stations.tle"), iss(Some("ISS"))).unwrap();
        catalog.reload().unwrap();
        assert_eq!(sat.name(&catalog).as_deref(), Some("ISS"));
    }

    #[test]
    fn bad_files_are_skipped() {
        let (_dir, catalog) = catalog_with(&[
            ("good.tle", iss(Some("ISS (ZARYA)"))),
            ("bad.tle", iss(Some("BROKEN")).replace("25544", "XXXXX")),
            ("notes.md", "not a tle".to_string()),
        ]);

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.resolve_name(25544).as_deref(), Some("ISS (ZARYA)"));
    }

    #[test]
    fn later_file_wins_for_duplicate_ids() {
        let (_dir, catalog) = catalog_with(&[
            ("a.tle", iss(Some("ISS (ZARYA)"))),
            ("b.tle", iss(Some("ISS"))),
        ]);
        assert_eq!(catalog.get(25544).map(|e| e.source.as_str()), Some("b.tle"));
    }

    #[test]
    fn missing_directory_keeps_previous_names() {
        let (dir, mut catalog) = catalog_with(&[("stations.tle", iss(Some("ISS (ZARYA)")))]);
        let path = dir.path().to_path_buf();
        drop(dir);

        assert!(!path.exists());
        assert!(matches!(
            catalog.reload(),
            Err(CatalogError::DirectoryNotFound(_))
        ));
        assert_eq!(catalog.resolve_name(25544).as_deref(), Some("ISS (ZARYA)"));
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        let mut catalog = TleCatalog::new(dir.path().join("absent"));
        assert!(matches!(
            catalog.load_all(),
            Err(CatalogError::DirectoryNotFound(_))
        ));
        assert!(catalog.is_empty());
    }
}
