//! Work drivers (spec.md §4.7), grounded on
//! `original_source/DDT/Scheduler/{Sequential,PSTL}_scheduler.h`. The
//! original also offers a TBB flow-graph scheduler; this crate scopes
//! that variant out (see `DESIGN.md`) since `rayon`'s work-stealing pool
//! already gives the same fork-join shape the splay loop needs.

use rayon::prelude::*;

/// Drives `for_each`/`for_each_rec` over a batch of work, sequentially or
/// in parallel depending on the implementor.
pub trait Scheduler {
    /// Applies `f` to every item. Returns once every item has run.
    fn for_each<T, F>(&self, items: &[T], f: F)
    where
        T: Sync,
        F: Fn(&T) + Sync + Send;

    /// Drives rounds over a growing work-list: `f` processes one item and
    /// returns further items to process, and rounds continue until one
    /// contributes nothing (the splay loop's pass-to-fixed-point shape,
    /// spec.md §4.8).
    fn for_each_rec<T, F>(&self, initial: Vec<T>, f: F)
    where
        T: Sync + Send,
        F: Fn(&T) -> Vec<T> + Sync + Send;
}

/// Single-threaded driver — the baseline against which `Multithread`'s
/// results must agree.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sequential;

impl Scheduler for Sequential {
    fn for_each<T, F>(&self, items: &[T], f: F)
    where
        T: Sync,
        F: Fn(&T) + Sync + Send,
    {
        for item in items {
            f(item);
        }
    }

    fn for_each_rec<T, F>(&self, initial: Vec<T>, f: F)
    where
        T: Sync + Send,
        F: Fn(&T) -> Vec<T> + Sync + Send,
    {
        let mut queue = initial;
        while !queue.is_empty() {
            let mut next = Vec::new();
            for item in &queue {
                next.extend(f(item));
            }
            queue = next;
        }
    }
}

/// `rayon`-backed driver running on a dedicated pool sized to
/// `EngineConfig::max_concurrency`.
pub struct Multithread {
    pool: rayon::ThreadPool,
}

impl Multithread {
    pub fn new(num_threads: usize) -> Self {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build()
            .expect("failed to build rayon thread pool");
        Multithread { pool }
    }

    pub fn default_pool() -> Self {
        Self::new(num_cpus::get())
    }
}

impl std::fmt::Debug for Multithread {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Multithread").field("threads", &self.pool.current_num_threads()).finish()
    }
}

impl Scheduler for Multithread {
    fn for_each<T, F>(&self, items: &[T], f: F)
    where
        T: Sync,
        F: Fn(&T) + Sync + Send,
    {
        self.pool.install(|| {
            items.par_iter().for_each(|item| f(item));
        });
    }

    fn for_each_rec<T, F>(&self, initial: Vec<T>, f: F)
    where
        T: Sync + Send,
        F: Fn(&T) -> Vec<T> + Sync + Send,
    {
        self.pool.install(|| {
            let mut queue = initial;
            while !queue.is_empty() {
                let next: Vec<T> = queue.par_iter().flat_map(|item| f(item)).collect();
                queue = next;
            }
        });
    }
}
