// ── Last-published snapshot per view ──

/// Remembers the last value handed to the host and lets a new value
/// through only if it differs structurally.
#[derive(Debug)]
pub struct ViewCache<T> {
    last: Option<T>,
}

impl<T: PartialEq> ViewCache<T> {
    pub fn new() -> Self {
        Self { last: None }
    }

    /// Store `next` and return it if it differs from the cached value.
    /// Returns `None` (and keeps the cache as is) when nothing changed.
    pub fn offer(&mut self, next: T) -> Option<&T> {
        if self.last.as_ref() == Some(&next) {
            return None;
        }
        self.last = Some(next);
        self.last.as_ref()
    }

    pub fn current(&self) -> Option<&T> {
        self.last.as_ref()
    }
}

impl<T: PartialEq> Default for ViewCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_offer_always_passes() {
        let mut cache: ViewCache<Vec<u8>> = ViewCache::new();
        assert_eq!(cache.offer(Vec::new()), Some(&Vec::new()));
    }

    #[test]
    fn equal_value_is_suppressed() {
        let mut cache = ViewCache::new();
        assert!(cache.offer(vec![1, 2]).is_some());
        assert!(cache.offer(vec![1, 2]).is_none());
        assert!(cache.offer(vec![1, 3]).is_some());
        assert_eq!(cache.current(), Some(&vec![1, 3]));
    }
}
