use crate::helpers::reader::UploadedFile;
use std::sync::Arc;
use tracing::debug;

/// Identity of an upload: content digest plus the lower-cased name, since the
/// extension decides which reader runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheKey {
    digest: String,
    name: String,
}

impl CacheKey {
    pub fn of(upload: &UploadedFile) -> CacheKey {
        CacheKey {
            digest: upload.digest(),
            name: upload.name.to_lowercase(),
        }
    }
}

/// Memoizes the result of loading one upload. Holds at most one entry: a new
/// key evicts the previous one.
#[derive(Debug)]
pub struct ContentCache<T> {
    entry: Option<(CacheKey, Arc<T>)>,
}

impl<T> Default for ContentCache<T> {
    fn default() -> Self {
        ContentCache { entry: None }
    }
}

impl<T> ContentCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value for `upload`, running `load` on a miss.
    /// Failed loads are not cached and leave the previous entry in place.
    pub fn get_or_try_insert<E>(
        &mut self,
        upload: &UploadedFile,
        load: impl FnOnce(&UploadedFile) -> Result<T, E>,
    ) -> Result<Arc<T>, E> {
        let key = CacheKey::of(upload);
        if let Some((cached_key, value)) = &self.entry {
            if *cached_key == key {
                debug!(file = upload.name, digest = key.digest, "load cache hit");
                return Ok(Arc::clone(value));
            }
        }
        debug!(file = upload.name, digest = key.digest, "load cache miss");
        let value = Arc::new(load(upload)?);
        self.entry = Some((key, Arc::clone(&value)));
        Ok(value)
    }

    pub fn clear(&mut self) {
        self.entry = None;
    }

    pub fn is_empty(&self) -> bool {
        self.entry.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn hits_reuse_the_loaded_value() {
        let mut cache = ContentCache::<usize>::new();
        let loads = Cell::new(0);
        let upload = UploadedFile::new("vendas.csv", "a,b\n");
        for _ in 0..3 {
            let value = cache
                .get_or_try_insert(&upload, |upload| -> Result<usize, ()> {
                    loads.set(loads.get() + 1);
                    Ok(upload.bytes.len())
                })
                .unwrap();
            assert_eq!(*value, 4);
        }
        assert_eq!(loads.get(), 1);
    }

    #[test]
    fn new_content_evicts_previous_entry() {
        let mut cache = ContentCache::<String>::new();
        let first = UploadedFile::new("vendas.csv", "a\n");
        let second = UploadedFile::new("vendas.csv", "b\n");
        let load = |upload: &UploadedFile| -> Result<String, ()> { Ok(String::from_utf8_lossy(&upload.bytes).into_owned()) };
        cache.get_or_try_insert(&first, load).unwrap();
        cache.get_or_try_insert(&second, load).unwrap();
        assert_eq!(cache.entry.as_ref().map(|(key, _)| key.clone()), Some(CacheKey::of(&second)));

        // same bytes under another extension are a different upload
        assert_ne!(CacheKey::of(&first), CacheKey::of(&UploadedFile::new("vendas.xlsx", "a\n")));
        assert_eq!(CacheKey::of(&first), CacheKey::of(&UploadedFile::new("VENDAS.csv", "a\n")));
    }

    #[test]
    fn failures_are_not_cached() {
        let mut cache = ContentCache::<usize>::new();
        let upload = UploadedFile::new("vendas.csv", "a\n");
        assert!(cache.get_or_try_insert(&upload, |_| Err("broken")).is_err());
        assert!(cache.is_empty());
        cache.clear();
    }
}
