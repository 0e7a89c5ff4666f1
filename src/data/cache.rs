use std::collections::HashMap;
use std::sync::Arc;

use super::error::DataLoadError;
use super::loader::{load_source, LoadOptions, Source};
use super::model::SoilDataset;

/// Memoization key: the same source read with a different row cap is a
/// different dataset.
pub type CacheKey = (Source, Option<usize>);

/// Owns the per-process dataset cache.
///
/// Entries are only ever added; a successful read is kept until [`clear`]
/// or process exit. Failed reads are not cached, so the next request tries
/// the source again.
///
/// [`clear`]: Loader::clear
#[derive(Debug, Default)]
pub struct Loader {
    options: LoadOptions,
    cache: HashMap<CacheKey, Arc<SoilDataset>>,
}

impl Loader {
    pub fn new(options: LoadOptions) -> Self {
        Self {
            options,
            cache: HashMap::new(),
        }
    }

    /// Return the dataset for `(source, row_cap)`, reading the source only
    /// on the first call.
    pub fn load(
        &mut self,
        source: &Source,
        row_cap: Option<usize>,
    ) -> Result<Arc<SoilDataset>, DataLoadError> {
        let key = (source.clone(), row_cap);
        if let Some(hit) = self.cache.get(&key) {
            log::debug!("Cache hit for {source} (row cap {row_cap:?})");
            return Ok(Arc::clone(hit));
        }

        let dataset = Arc::new(load_source(source, row_cap, &self.options)?);
        log::info!(
            "Loaded {} rows with columns {:?} from {source}",
            dataset.len(),
            dataset.headers
        );
        self.cache.insert(key, Arc::clone(&dataset));
        Ok(dataset)
    }

    pub fn contains(&self, source: &Source, row_cap: Option<usize>) -> bool {
        self.cache.contains_key(&(source.clone(), row_cap))
    }

    /// Number of cached datasets.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Drop every cached dataset.
    pub fn clear(&mut self) {
        log::info!("Clearing {} cached dataset(s)", self.cache.len());
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_csv(dir: &TempDir, name: &str, rows: usize) -> Source {
        let mut out = String::from("DATE_TIME,SMANOM_5_CM\n");
        for i in 0..rows {
            out.push_str(&format!("202401{:02}{:02},{}\n", 1 + i / 24, i % 24, i as f64 / 10.0));
        }
        let path = dir.path().join(name);
        fs::write(&path, out).unwrap();
        Source::from(path)
    }

    #[test]
    fn second_load_is_served_from_cache() {
        let dir = TempDir::new().unwrap();
        let source = write_csv(&dir, "soil.csv", 48);
        let mut loader = Loader::default();

        let first = loader.load(&source, Some(10)).unwrap();
        // Deleting the file proves the second call never touches the source.
        if let Source::Path(path) = &source {
            fs::remove_file(path).unwrap();
        }
        let second = loader.load(&source, Some(10)).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*first, *second);
        assert_eq!(loader.len(), 1);
    }

    #[test]
    fn row_cap_is_part_of_the_key() {
        let dir = TempDir::new().unwrap();
        let source = write_csv(&dir, "soil.csv", 48);
        let mut loader = Loader::default();

        assert_eq!(loader.load(&source, Some(10)).unwrap().len(), 10);
        assert_eq!(loader.load(&source, None).unwrap().len(), 48);
        assert!(loader.contains(&source, Some(10)));
        assert!(loader.contains(&source, None));
        assert!(!loader.contains(&source, Some(11)));
    }

    #[test]
    fn failures_are_not_cached() {
        let dir = TempDir::new().unwrap();
        let source = Source::from(dir.path().join("later.csv"));
        let mut loader = Loader::default();

        assert!(loader.load(&source, None).is_err());
        assert!(loader.is_empty());

        write_csv(&dir, "later.csv", 3);
        assert_eq!(loader.load(&source, None).unwrap().len(), 3);
    }

    #[test]
    fn clear_forces_a_reread() {
        let dir = TempDir::new().unwrap();
        let source = write_csv(&dir, "soil.csv", 5);
        let mut loader = Loader::default();

        let first = loader.load(&source, None).unwrap();
        loader.clear();
        assert!(loader.is_empty());
        let second = loader.load(&source, None).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(*first, *second);
    }
}
