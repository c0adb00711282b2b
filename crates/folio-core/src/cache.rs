use std::num::NonZeroUsize;

use lru::LruCache;

pub const DEFAULT_CAPACITY: usize = 256;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageMeta {
    pub width: u32,
    pub height: u32,
}

pub struct ImageCache {
    entries: LruCache<String, ImageMeta>,
}

impl ImageCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
        }
    }

    pub fn remember(&mut self, url: &str, meta: ImageMeta) {
        self.entries.put(url.to_string(), meta);
    }

    pub fn lookup(&mut self, url: &str) -> Option<ImageMeta> {
        self.entries.get(url).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
