use async_trait::async_trait;
use indexmap::IndexSet;
use metapedia::backend::{CategoryStore, MemoryStore, StoreError, StoreResult};
use metapedia::graph::{CategoryGraph, CategoryKey, CategoryPath, Namespace};
use metapedia::resolver::{CategoryPathResolver, ResolverConfig, ResolverError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

fn key(s: &str) -> CategoryKey {
    CategoryKey::new(s).unwrap()
}

fn en() -> Namespace {
    Namespace::new("en")
}

/// Graph over lowercase keys whose display titles are the uppercase key
fn graph(edges: &[(&str, &str)]) -> CategoryGraph {
    let mut graph = CategoryGraph::new();
    for (parent, child) in edges {
        graph.add_category(parent.to_uppercase(), *parent);
        graph.add_category(child.to_uppercase(), *child);
    }
    for (parent, child) in edges {
        graph.add_subcat(parent, child).unwrap();
    }
    graph
}

fn memory_store(edges: &[(&str, &str)]) -> MemoryStore {
    let store = MemoryStore::new();
    store.insert(en(), graph(edges));
    store
}

fn resolver(edges: &[(&str, &str)]) -> CategoryPathResolver<MemoryStore> {
    CategoryPathResolver::new(Arc::new(memory_store(edges)), ResolverConfig::default())
}

/// Chain n0 -> n1 -> ... -> n{len}
fn chain(len: usize) -> CategoryPathResolver<MemoryStore> {
    let keys: Vec<String> = (0..=len).map(|i| format!("n{}", i)).collect();
    let edges: Vec<(&str, &str)> = keys
        .windows(2)
        .map(|w| (w[0].as_str(), w[1].as_str()))
        .collect();
    resolver(&edges)
}

/// Wraps a MemoryStore and counts ancestor expansions
struct RecordingStore {
    inner: MemoryStore,
    ancestor_calls: AtomicUsize,
}

impl RecordingStore {
    fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            ancestor_calls: AtomicUsize::new(0),
        }
    }

    fn ancestor_calls(&self) -> usize {
        self.ancestor_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CategoryStore for RecordingStore {
    async fn shortest_undirected(
        &self,
        namespace: &Namespace,
        source: &CategoryKey,
        target: &CategoryKey,
        max_hops: usize,
    ) -> StoreResult<Option<CategoryPath>> {
        self.inner.shortest_undirected(namespace, source, target, max_hops).await
    }

    async fn shortest_directed(
        &self,
        namespace: &Namespace,
        source: &CategoryKey,
        target: &CategoryKey,
        max_hops: usize,
    ) -> StoreResult<Option<CategoryPath>> {
        self.inner.shortest_directed(namespace, source, target, max_hops).await
    }

    async fn ancestor_expansion(
        &self,
        namespace: &Namespace,
        start: &CategoryKey,
        max_level: usize,
    ) -> StoreResult<IndexSet<String>> {
        self.ancestor_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.ancestor_expansion(namespace, start, max_level).await
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// Fails every ancestor expansion, and undirected paths when `fail_paths` is set
struct FlakyStore {
    inner: MemoryStore,
    fail_paths: bool,
}

#[async_trait]
impl CategoryStore for FlakyStore {
    async fn shortest_undirected(
        &self,
        namespace: &Namespace,
        source: &CategoryKey,
        target: &CategoryKey,
        max_hops: usize,
    ) -> StoreResult<Option<CategoryPath>> {
        if self.fail_paths {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        self.inner.shortest_undirected(namespace, source, target, max_hops).await
    }

    async fn shortest_directed(
        &self,
        namespace: &Namespace,
        source: &CategoryKey,
        target: &CategoryKey,
        max_hops: usize,
    ) -> StoreResult<Option<CategoryPath>> {
        self.inner.shortest_directed(namespace, source, target, max_hops).await
    }

    async fn ancestor_expansion(
        &self,
        _namespace: &Namespace,
        _start: &CategoryKey,
        _max_level: usize,
    ) -> StoreResult<IndexSet<String>> {
        Err(StoreError::Unavailable("read timed out".to_string()))
    }

    async fn ping(&self) -> StoreResult<()> {
        Err(StoreError::Unavailable("down".to_string()))
    }

    fn name(&self) -> &'static str {
        "flaky"
    }
}

/// Reports no line path leaving `detached`
struct DetachedStore {
    inner: MemoryStore,
    detached: &'static str,
}

#[async_trait]
impl CategoryStore for DetachedStore {
    async fn shortest_undirected(
        &self,
        namespace: &Namespace,
        source: &CategoryKey,
        target: &CategoryKey,
        max_hops: usize,
    ) -> StoreResult<Option<CategoryPath>> {
        self.inner.shortest_undirected(namespace, source, target, max_hops).await
    }

    async fn shortest_directed(
        &self,
        namespace: &Namespace,
        source: &CategoryKey,
        target: &CategoryKey,
        max_hops: usize,
    ) -> StoreResult<Option<CategoryPath>> {
        if source.as_str() == self.detached {
            return Ok(None);
        }
        self.inner.shortest_directed(namespace, source, target, max_hops).await
    }

    async fn ancestor_expansion(
        &self,
        namespace: &Namespace,
        start: &CategoryKey,
        max_level: usize,
    ) -> StoreResult<IndexSet<String>> {
        self.inner.ancestor_expansion(namespace, start, max_level).await
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "detached"
    }
}

/// Holds every undirected query until `release` is notified
struct GatedStore {
    inner: MemoryStore,
    entered: Notify,
    release: Notify,
}

#[async_trait]
impl CategoryStore for GatedStore {
    async fn shortest_undirected(
        &self,
        namespace: &Namespace,
        source: &CategoryKey,
        target: &CategoryKey,
        max_hops: usize,
    ) -> StoreResult<Option<CategoryPath>> {
        self.entered.notify_one();
        self.release.notified().await;
        self.inner.shortest_undirected(namespace, source, target, max_hops).await
    }

    async fn shortest_directed(
        &self,
        namespace: &Namespace,
        source: &CategoryKey,
        target: &CategoryKey,
        max_hops: usize,
    ) -> StoreResult<Option<CategoryPath>> {
        self.inner.shortest_directed(namespace, source, target, max_hops).await
    }

    async fn ancestor_expansion(
        &self,
        namespace: &Namespace,
        start: &CategoryKey,
        max_level: usize,
    ) -> StoreResult<IndexSet<String>> {
        self.inner.ancestor_expansion(namespace, start, max_level).await
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "gated"
    }
}

/// Every consecutive node pair is joined by the edge at the same position
fn assert_walk(path: &CategoryPath) {
    assert_eq!(path.edges.len() + 1, path.nodes.len());
    for (i, edge) in path.edges.iter().enumerate() {
        let here = &path.nodes[i].title;
        let next = &path.nodes[i + 1].title;
        let joins = (&edge.start == here && &edge.end == next)
            || (&edge.start == next && &edge.end == here);
        assert!(joins, "edge {:?} does not join {} and {}", edge, here, next);
    }
}

#[tokio::test]
async fn test_line_path_scenario() {
    let resolver = resolver(&[("a", "b"), ("b", "c")]);
    let result = resolver.resolve(&key("a"), &key("c"), &en()).await.unwrap();

    assert_eq!(result.d1.as_ref().unwrap().nodes, vec!["A", "B", "C"]);
    let d2 = result.d2.as_ref().unwrap();
    assert_eq!(d2.titles(), vec!["A", "B", "C"]);
    assert_eq!(d2.keys(), vec!["a", "b", "c"]);
    assert_eq!(d2.edges.len(), 2);
    assert!(result.d3.is_none());
    assert!(!result.fallback_ran());
}

#[tokio::test]
async fn test_reverse_line_path() {
    let resolver = resolver(&[("a", "b"), ("b", "c")]);
    let result = resolver.resolve(&key("c"), &key("a"), &en()).await.unwrap();

    assert!(result.d2.is_none());
    assert_eq!(result.d3.as_ref().unwrap().keys(), vec!["a", "b", "c"]);
    assert!(result.d4s.is_none());
}

#[tokio::test]
async fn test_common_parent_scenario() {
    let resolver = resolver(&[("x", "a"), ("x", "b")]);
    let result = resolver.resolve(&key("a"), &key("b"), &en()).await.unwrap();

    assert_eq!(result.d1.as_ref().unwrap().nodes, vec!["A", "X", "B"]);
    assert!(result.d2.is_none());
    assert!(result.d3.is_none());

    let d4s = result.d4s.as_ref().unwrap();
    assert_eq!(d4s.len(), 1);
    assert_eq!(d4s[0].ancestor.f_title, "x");
    assert_eq!(d4s[0].path.keys(), vec!["a", "x", "b"]);
    assert_walk(&d4s[0].path);
}

#[tokio::test]
async fn test_disconnected_is_empty_not_error() {
    let resolver = resolver(&[("x", "a"), ("y", "b")]);
    let result = resolver.resolve(&key("a"), &key("b"), &en()).await.unwrap();

    assert!(result.d1.is_none());
    assert!(result.d2.is_none());
    assert!(result.d3.is_none());
    assert_eq!(result.d4s, Some(vec![]));
    assert!(result.is_empty());
}

#[tokio::test]
async fn test_unknown_categories_and_namespace() {
    let resolver = resolver(&[("a", "b")]);

    let result = resolver.resolve(&key("a"), &key("missing"), &en()).await.unwrap();
    assert!(result.is_empty());

    let result = resolver
        .resolve(&key("a"), &key("b"), &Namespace::new("zh"))
        .await
        .unwrap();
    assert!(result.is_empty());
}

#[tokio::test]
async fn test_source_equals_target() {
    let resolver = resolver(&[("a", "b")]);
    let result = resolver.resolve(&key("a"), &key("a"), &en()).await.unwrap();

    let d1 = result.d1.as_ref().unwrap();
    assert_eq!(d1.nodes, vec!["A"]);
    assert!(d1.edges.is_empty());
    assert_eq!(result.d2.as_ref().unwrap().len(), 0);
    assert!(result.d4s.is_none());
}

#[tokio::test]
async fn test_undirected_hop_boundary() {
    let resolver = chain(16);

    let result = resolver.compute(&key("n0"), &key("n15"), &en()).await.unwrap();
    assert_eq!(result.d1.unwrap().edges.len(), 15);

    let result = resolver.compute(&key("n0"), &key("n16"), &en()).await.unwrap();
    assert!(result.d1.is_none());
    assert_eq!(result.d2.unwrap().len(), 16);
}

#[tokio::test]
async fn test_directed_hop_boundary() {
    let resolver = chain(17);
    let result = resolver.compute(&key("n0"), &key("n17"), &en()).await.unwrap();

    assert!(result.d1.is_none());
    assert!(result.d2.is_none());
    assert!(result.d3.is_none());
    // n0 is the root, so the two sides never meet
    assert_eq!(result.d4s, Some(vec![]));
}

#[tokio::test]
async fn test_idempotent_and_cached() {
    let resolver = resolver(&[("x", "a"), ("x", "b"), ("y", "a"), ("y", "b")]);

    let first = resolver.resolve(&key("a"), &key("b"), &en()).await.unwrap();
    let second = resolver.resolve(&key("a"), &key("b"), &en()).await.unwrap();
    assert_eq!(first, second);
    assert!(Arc::ptr_eq(&first, &second));

    let recomputed = resolver.compute(&key("a"), &key("b"), &en()).await.unwrap();
    assert_eq!(*first, recomputed);

    let stats = resolver.cache().stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.len, 1);
}

#[tokio::test]
async fn test_cache_key_is_ordered() {
    let resolver = resolver(&[("a", "b")]);
    resolver.resolve(&key("a"), &key("b"), &en()).await.unwrap();
    let reversed = resolver.resolve(&key("b"), &key("a"), &en()).await.unwrap();

    assert!(reversed.d2.is_none());
    assert!(reversed.d3.is_some());
    assert_eq!(resolver.cache().stats().len, 2);
}

#[tokio::test]
async fn test_fallback_not_issued_when_line_path_exists() {
    let store = Arc::new(RecordingStore::new(memory_store(&[("a", "b"), ("b", "c")])));
    let resolver = CategoryPathResolver::new(Arc::clone(&store), ResolverConfig::default());

    resolver.resolve(&key("a"), &key("c"), &en()).await.unwrap();
    resolver.resolve(&key("c"), &key("a"), &en()).await.unwrap();
    assert_eq!(store.ancestor_calls(), 0);
}

#[tokio::test]
async fn test_fallback_issued_when_no_line_path() {
    let store = Arc::new(RecordingStore::new(memory_store(&[("x", "a"), ("x", "b")])));
    let resolver = CategoryPathResolver::new(Arc::clone(&store), ResolverConfig::default());

    resolver.resolve(&key("a"), &key("b"), &en()).await.unwrap();
    // one level, both sides
    assert_eq!(store.ancestor_calls(), 2);
}

#[tokio::test]
async fn test_saturated_expansion_stops_early() {
    let store = Arc::new(RecordingStore::new(memory_store(&[("x", "a"), ("y", "b")])));
    let resolver = CategoryPathResolver::new(Arc::clone(&store), ResolverConfig::default());

    let result = resolver.resolve(&key("a"), &key("b"), &en()).await.unwrap();
    assert_eq!(result.d4s, Some(vec![]));
    // level 1 reaches the roots, level 2 adds nothing
    assert_eq!(store.ancestor_calls(), 4);
}

#[tokio::test]
async fn test_ancestor_expansion_is_monotonic() {
    let edges = [
        ("root", "arts"),
        ("root", "science"),
        ("science", "physics"),
        ("science", "biology"),
        ("biology", "zoology"),
        ("arts", "music"),
        ("music", "physics"),
        ("zoology", "mammals"),
        ("physics", "optics"),
    ];
    let store = memory_store(&edges);

    for start in ["mammals", "optics", "zoology", "root"] {
        let mut previous: Option<IndexSet<String>> = None;
        for level in 1..=9 {
            let current = store.ancestor_expansion(&en(), &key(start), level).await.unwrap();
            assert!(current.contains(start));
            if let Some(previous) = &previous {
                assert!(previous.is_subset(&current), "{} shrank at level {}", start, level);
            }
            previous = Some(current);
        }
    }
}

#[tokio::test]
async fn test_stitched_paths_are_walks() {
    // g2 is shared at level 2, g1 only at level 3
    let edges = [
        ("g1", "p1"),
        ("p1", "a"),
        ("g1", "q1"),
        ("q1", "q2"),
        ("q2", "b"),
        ("g2", "p1"),
        ("g2", "b"),
    ];
    let resolver = resolver(&edges);
    let result = resolver.resolve(&key("a"), &key("b"), &en()).await.unwrap();
    assert!(result.d2.is_none() && result.d3.is_none());

    let d4s = result.d4s.as_ref().unwrap();
    assert!(!d4s.is_empty());
    for stitched in d4s {
        let path = &stitched.path;
        assert_walk(path);
        assert_eq!(path.keys().first(), Some(&"a"));
        assert_eq!(path.keys().last(), Some(&"b"));

        let ancestor = stitched.ancestor.f_title.as_str();
        assert_eq!(path.keys().iter().filter(|k| **k == ancestor).count(), 1);
    }
}

#[tokio::test]
async fn test_ancestor_at_different_depths() {
    // x is one level above a and two above c
    let edges = [("x", "a"), ("x", "b"), ("b", "c")];
    let resolver = resolver(&edges);
    let result = resolver.resolve(&key("a"), &key("c"), &en()).await.unwrap();

    let d4s = result.d4s.as_ref().unwrap();
    assert_eq!(d4s.len(), 1);
    assert_eq!(d4s[0].path.keys(), vec!["a", "x", "b", "c"]);
}

#[tokio::test]
async fn test_unavailable_store_is_an_error() {
    let store = FlakyStore {
        inner: memory_store(&[("a", "b")]),
        fail_paths: true,
    };
    let resolver = CategoryPathResolver::new(Arc::new(store), ResolverConfig::default());

    let err = resolver.resolve(&key("a"), &key("b"), &en()).await.unwrap_err();
    assert!(matches!(err, ResolverError::Store(StoreError::Unavailable(_))));
    assert_eq!(resolver.cache().stats().len, 0);
}

#[tokio::test]
async fn test_fallback_failure_aborts_resolution() {
    let store = FlakyStore {
        inner: memory_store(&[("x", "a"), ("x", "b")]),
        fail_paths: false,
    };
    let resolver = CategoryPathResolver::new(Arc::new(store), ResolverConfig::default());

    // a line path exists, so the failing expansion is never reached
    assert!(resolver.resolve(&key("x"), &key("a"), &en()).await.is_ok());

    let err = resolver.resolve(&key("a"), &key("b"), &en()).await.unwrap_err();
    assert!(matches!(err, ResolverError::Store(StoreError::Unavailable(_))));
    assert_eq!(resolver.cache().stats().len, 1);
}

#[tokio::test]
async fn test_dyn_store_resolver() {
    let store: Arc<dyn CategoryStore> = Arc::new(memory_store(&[("a", "b")]));
    let resolver = CategoryPathResolver::new(store, ResolverConfig::default());
    let result = resolver.resolve(&key("a"), &key("b"), &en()).await.unwrap();
    assert_eq!(result.d2.as_ref().unwrap().len(), 1);
    assert_eq!(resolver.store().name(), "memory");
}

#[tokio::test]
async fn test_stitch_cap_counts_only_stitched_paths() {
    // p1..p4 are all parents of a and b, but p1 cannot be stitched
    let edges: Vec<(&str, &str)> = ["p1", "p2", "p3", "p4"]
        .iter()
        .flat_map(|p| [(*p, "a"), (*p, "b")])
        .collect();
    let store = DetachedStore {
        inner: memory_store(&edges),
        detached: "p1",
    };
    let config = ResolverConfig {
        max_stitched_paths: Some(2),
        ..Default::default()
    };
    let resolver = CategoryPathResolver::new(Arc::new(store), config);

    let result = resolver.compute(&key("a"), &key("b"), &en()).await.unwrap();
    let ancestors: Vec<String> = result
        .d4s
        .unwrap()
        .into_iter()
        .map(|stitched| stitched.ancestor.f_title)
        .collect();
    assert_eq!(ancestors, vec!["p2", "p3"]);
}

#[tokio::test]
async fn test_clear_during_lookup_discards_result() {
    let store = Arc::new(GatedStore {
        inner: memory_store(&[("a", "b")]),
        entered: Notify::new(),
        release: Notify::new(),
    });
    let resolver = CategoryPathResolver::new(Arc::clone(&store), ResolverConfig::default());

    let (a, b, lang) = (key("a"), key("b"), en());
    let (result, ()) = tokio::join!(resolver.resolve(&a, &b, &lang), async {
        store.entered.notified().await;
        resolver.cache().clear();
        store.release.notify_one();
    });

    assert_eq!(result.unwrap().d2.as_ref().unwrap().len(), 1);
    assert_eq!(resolver.cache().stats().len, 0);
}
