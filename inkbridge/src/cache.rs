//! Per-document render cache.

use inkbridge_engine::{PathData, PathSeg};
use std::collections::HashMap;

/// Accelerator shared across all renders of one document.
///
/// Converting a recorded path into the rasterizer's path form costs a pass
/// over its segments; the cache memoizes the conversion keyed by the path's
/// stable id, so repeated renders of a cached display list (any transform)
/// pay it once per path. The cached form is untransformed; transforms are
/// applied at fill/stroke time.
pub struct RenderCache {
    paths: HashMap<u64, Option<tiny_skia::Path>>,
    hits: u64,
    misses: u64,
}

impl RenderCache {
    /// An empty cache.
    pub fn new() -> Self {
        Self {
            paths: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// The rasterizer form of `path`, converting and caching on first use.
    ///
    /// Returns `None` for degenerate paths the rasterizer cannot represent
    /// (empty, or collapsing to nothing); the `None` is cached too.
    pub(crate) fn sk_path(&mut self, path: &PathData) -> Option<&tiny_skia::Path> {
        let entry = self.paths.entry(path.id());
        match entry {
            std::collections::hash_map::Entry::Occupied(slot) => {
                self.hits += 1;
                slot.into_mut().as_ref()
            }
            std::collections::hash_map::Entry::Vacant(slot) => {
                self.misses += 1;
                slot.insert(build_sk_path(path)).as_ref()
            }
        }
    }

    /// Number of distinct paths converted so far.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether the cache holds nothing yet.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// (hits, misses) lookup counters.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}

impl Default for RenderCache {
    fn default() -> Self {
        Self::new()
    }
}

fn build_sk_path(path: &PathData) -> Option<tiny_skia::Path> {
    let mut builder = tiny_skia::PathBuilder::new();
    for seg in path.segments() {
        match *seg {
            PathSeg::MoveTo(x, y) => builder.move_to(x, y),
            PathSeg::LineTo(x, y) => builder.line_to(x, y),
            PathSeg::CurveTo(x1, y1, x2, y2, x3, y3) => builder.cubic_to(x1, y1, x2, y2, x3, y3),
            PathSeg::Close => builder.close(),
        }
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> PathData {
        PathData::new(vec![
            PathSeg::MoveTo(0.0, 0.0),
            PathSeg::LineTo(10.0, 0.0),
            PathSeg::LineTo(5.0, 10.0),
            PathSeg::Close,
        ])
    }

    #[test]
    fn second_lookup_hits() {
        let mut cache = RenderCache::new();
        let path = triangle();
        assert!(cache.sk_path(&path).is_some());
        assert!(cache.sk_path(&path).is_some());
        assert_eq!(cache.stats(), (1, 1));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn distinct_paths_get_distinct_entries() {
        let mut cache = RenderCache::new();
        cache.sk_path(&triangle());
        cache.sk_path(&triangle());
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats(), (0, 2));
    }

    #[test]
    fn degenerate_path_caches_none() {
        let mut cache = RenderCache::new();
        let empty = PathData::new(Vec::new());
        assert!(cache.sk_path(&empty).is_none());
        assert!(cache.sk_path(&empty).is_none());
        assert_eq!(cache.stats(), (1, 1));
    }
}
