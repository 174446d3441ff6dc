#![allow(dead_code)]

use camino::{Utf8Path, Utf8PathBuf};
use neolab::catalog::{mpcorb_reader::read_mpcorb, store::CatalogStore, NeoRecord};
use tempfile::TempDir;

pub const SAMPLE_FILE: &str = "tests/data/nea_sample.txt";

pub fn sample_records() -> Vec<NeoRecord> {
    read_mpcorb(Utf8Path::new(SAMPLE_FILE)).unwrap()
}

/// Database path inside a fresh temporary directory, the directory must outlive the store.
pub fn temp_database() -> (TempDir, Utf8PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = Utf8PathBuf::from_path_buf(dir.path().join("neo_catalog.sqlite")).unwrap();
    (dir, path)
}

/// Run the full load pipeline on the sample file.
pub fn load_sample(path: &Utf8Path) -> CatalogStore {
    let records = sample_records();
    let mut store = CatalogStore::open(path).unwrap();
    store.create_schema().unwrap();
    store.insert_records(&records).unwrap();
    store.add_derived_columns().unwrap();
    store.classify_all().unwrap();
    store
}
