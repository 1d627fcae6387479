use super::clean::{clean_table, CleanedTable};
use super::load::load_survey_bytes;
use crate::error::Result;
use sha2::{Digest, Sha256};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::{debug, info};

/// Memoizes the load+clean result for one survey file.
///
/// The entry is keyed by the file's content hash, so an edited file is
/// re-parsed on the next `get` while repeated interactions against an
/// unchanged file skip straight to the cached table. The cached table is
/// shared behind an `Arc` and never mutated after construction.
pub struct SurveyCache {
    path: PathBuf,
    entry: Option<(String, Arc<CleanedTable>)>,
}

impl SurveyCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entry: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return the cleaned table, re-reading the file only when its content
    /// has changed since the last call.
    pub fn get(&mut self) -> Result<Arc<CleanedTable>> {
        let bytes = fs::read(&self.path)?;
        let digest = hex::encode(Sha256::digest(&bytes));

        if let Some((cached, table)) = &self.entry {
            if *cached == digest {
                debug!(digest = %&digest[..12], "survey cache hit");
                return Ok(Arc::clone(table));
            }
        }

        let loaded = load_survey_bytes(&bytes, &self.path.display().to_string())?;
        let table = Arc::new(clean_table(&loaded.table)?);
        info!(
            digest = %&digest[..12],
            rows = table.rows.len(),
            quarters = table.quarters.len(),
            "survey cache refreshed"
        );
        self.entry = Some((digest, Arc::clone(&table)));
        Ok(table)
    }

    /// Drop the memoized entry; the next `get` re-reads and re-cleans.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Seek, Write};
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "소득분위,항목,2020/1\n1분위,소비지출,100\n";
    const CHANGED: &str = "소득분위,항목,2020/1\n1분위,소비지출,999\n";

    fn write_all(tmp: &mut NamedTempFile, content: &str) {
        let file = tmp.as_file_mut();
        file.set_len(0).unwrap();
        file.rewind().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
    }

    #[test]
    fn unchanged_content_reuses_the_same_table() {
        let mut tmp = NamedTempFile::new().unwrap();
        write_all(&mut tmp, SAMPLE);

        let mut cache = SurveyCache::new(tmp.path());
        let first = cache.get().unwrap();
        let second = cache.get().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn changed_content_recomputes() {
        let mut tmp = NamedTempFile::new().unwrap();
        write_all(&mut tmp, SAMPLE);

        let mut cache = SurveyCache::new(tmp.path());
        let first = cache.get().unwrap();

        write_all(&mut tmp, CHANGED);
        let second = cache.get().unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.rows[0].values, vec!["999"]);
    }

    #[test]
    fn invalidate_forces_recompute() {
        let mut tmp = NamedTempFile::new().unwrap();
        write_all(&mut tmp, SAMPLE);

        let mut cache = SurveyCache::new(tmp.path());
        let first = cache.get().unwrap();
        cache.invalidate();
        let second = cache.get().unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(*first, *second);
    }
}
