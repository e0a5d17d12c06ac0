//! Append-only cache over an unbounded generator.
//!
//! `LazyList::get(i)` pulls values from the generator until index `i` exists and
//! then serves it from the cache. Generation is strictly sequential and a value is
//! produced at most once; the only way to start over is to build a new list.

/// An endless, stateful source of values.
pub trait Generator {
    type Item;

    fn generate(&mut self) -> Self::Item;

    /// Batch the output of this generator into `Vec`s of `size` values.
    fn grouped(self, size: usize) -> Grouped<Self>
    where
        Self: Sized,
    {
        Grouped::new(self, size)
    }
}

/// Generator backed by a closure.
pub struct FromFn<F>(F);

pub fn from_fn<T, F: FnMut() -> T>(f: F) -> FromFn<F> {
    FromFn(f)
}

impl<T, F: FnMut() -> T> Generator for FromFn<F> {
    type Item = T;

    fn generate(&mut self) -> T {
        (self.0)()
    }
}

/// Fixed-size batches over another generator.
pub struct Grouped<G> {
    inner: G,
    size: usize,
}

impl<G: Generator> Grouped<G> {
    pub fn new(inner: G, size: usize) -> Self {
        debug_assert!(size > 0, "group size must be positive");
        Self {
            inner,
            size: size.max(1),
        }
    }
}

impl<G: Generator> Generator for Grouped<G> {
    type Item = Vec<G::Item>;

    fn generate(&mut self) -> Self::Item {
        (0..self.size).map(|_| self.inner.generate()).collect()
    }
}

pub struct LazyList<G: Generator> {
    cache: Vec<G::Item>,
    source: G,
}

impl<G: Generator> LazyList<G> {
    pub fn new(source: G) -> Self {
        Self {
            cache: Vec::new(),
            source,
        }
    }

    /// Value at `index`, generating everything up to it first.
    pub fn get(&mut self, index: usize) -> &G::Item {
        while self.cache.len() <= index {
            let next = self.source.generate();
            self.cache.push(next);
        }
        &self.cache[index]
    }

    /// Value at `index` only if it was already generated.
    pub fn cached(&self, index: usize) -> Option<&G::Item> {
        self.cache.get(index)
    }

    /// Number of values materialized so far.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
