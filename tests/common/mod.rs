#![allow(dead_code)]

use camino::{Utf8Path, Utf8PathBuf};
use orrery::{LoaderConfig, UniverseLoader};
use serde_json::Value;
use tempfile::TempDir;

/// A temporary directory holding catalog files.
pub struct CatalogDir {
    dir: TempDir,
}

impl CatalogDir {
    pub fn new() -> Self {
        CatalogDir {
            dir: TempDir::new().expect("temporary directory"),
        }
    }

    pub fn path(&self) -> &Utf8Path {
        Utf8Path::from_path(self.dir.path()).expect("temporary directory path is UTF-8")
    }

    pub fn write(&self, name: &str, contents: &Value) -> Utf8PathBuf {
        self.write_text(name, &contents.to_string())
    }

    pub fn write_text(&self, name: &str, text: &str) -> Utf8PathBuf {
        let path = self.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("catalog subdirectory");
        }
        std::fs::write(&path, text).expect("catalog file");
        path
    }

    pub fn write_bytes(&self, name: &str, bytes: &[u8]) -> Utf8PathBuf {
        let path = self.path().join(name);
        std::fs::write(&path, bytes).expect("binary file");
        path
    }

    /// A loader whose data search path is this directory.
    pub fn loader(&self) -> UniverseLoader {
        UniverseLoader::with_config(LoaderConfig {
            data_search_path: self.path().to_path_buf(),
            ..LoaderConfig::default()
        })
    }
}

const HEADER_FIELDS_END: usize = 2856;
const RECORD_BYTES: usize = 728 * 8;

/// Serialize a DE406 image covering `records` records of `days` days from `start_jd`.
///
/// Every object slot holds `coeff_count` coefficients per component and one granule per
/// record; records are packed back to back. The series are constant: object slot `s` sits at
/// `(1000 * (s + 1), -1000 * (s + 1), 10 * (s + 1))` km throughout.
pub fn constant_de406(start_jd: f64, days: f64, records: usize, coeff_count: u32) -> Vec<u8> {
    const SLOTS: u32 = 12;
    let mut out = vec![b' '; 84 * 3 + 400 * 6];
    for v in [start_jd, start_jd + days * records as f64, days] {
        out.extend_from_slice(&v.to_be_bytes());
    }
    out.extend_from_slice(&0u32.to_be_bytes());
    out.extend_from_slice(&149_597_870.691f64.to_be_bytes());
    out.extend_from_slice(&81.30056f64.to_be_bytes());

    let mut offset = 3u32;
    for _ in 0..SLOTS {
        for v in [offset, coeff_count, 1] {
            out.extend_from_slice(&v.to_be_bytes());
        }
        offset += 3 * coeff_count;
    }
    out.extend_from_slice(&406i32.to_be_bytes());
    out.extend_from_slice(&[0u8; 12]);
    assert_eq!(out.len(), HEADER_FIELDS_END);
    out.resize(RECORD_BYTES * 2, 0);

    for r in 0..records {
        let rec_start = start_jd + days * r as f64;
        let mut record = Vec::new();
        record.extend_from_slice(&rec_start.to_be_bytes());
        record.extend_from_slice(&(rec_start + days).to_be_bytes());
        for slot in 0..SLOTS {
            let scale = 1000.0 * (slot + 1) as f64;
            for axis_value in [scale, -scale, scale / 100.0] {
                record.extend_from_slice(&axis_value.to_be_bytes());
                for _ in 1..coeff_count {
                    record.extend_from_slice(&0f64.to_be_bytes());
                }
            }
        }
        out.extend_from_slice(&record);
    }
    out
}
