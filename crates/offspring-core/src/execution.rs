//! Execution engines for controlling computation strategy
//!
//! Bootstrap refits are independent and CPU-bound, so the only primitive an
//! engine needs is "map a function over `count` task indices and collect the
//! results in index order". Two engines are provided:
//!
//! - [`SequentialEngine`] runs every task on the calling thread.
//! - [`ParallelEngine`] (feature `parallel`) runs tasks on a dedicated rayon
//!   pool of a fixed size. `execute_batch` blocks until every task finished.

#[cfg(feature = "parallel")]
use crate::{Error, Result};

/// Execution strategy for batch operations
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecutionStrategy {
    /// Process items sequentially
    Sequential,
    /// Process items in parallel
    Parallel,
}

/// Trait for execution engines that control how batches of tasks are run
pub trait ExecutionEngine: Clone + Send + Sync {
    /// Execute a function in the engine's execution context
    fn execute<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send;

    /// Run `f(0) .. f(count - 1)` and collect the results in index order
    fn execute_batch<F, R>(&self, count: usize, f: F) -> Vec<R>
    where
        F: Fn(usize) -> R + Sync + Send,
        R: Send;

    /// Get the execution strategy
    fn strategy(&self) -> ExecutionStrategy;

    /// Check if parallel execution is available
    fn is_parallel(&self) -> bool {
        self.strategy() == ExecutionStrategy::Parallel
    }

    /// Get the number of threads available
    fn num_threads(&self) -> usize;
}

/// Sequential execution engine
///
/// Executes all operations sequentially in the current thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct SequentialEngine;

impl SequentialEngine {
    pub fn new() -> Self {
        Self
    }
}

impl ExecutionEngine for SequentialEngine {
    fn execute<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        f()
    }

    fn execute_batch<F, R>(&self, count: usize, f: F) -> Vec<R>
    where
        F: Fn(usize) -> R + Sync + Send,
        R: Send,
    {
        (0..count).map(f).collect()
    }

    fn strategy(&self) -> ExecutionStrategy {
        ExecutionStrategy::Sequential
    }

    fn num_threads(&self) -> usize {
        1
    }
}

/// Parallel execution engine using Rayon
///
/// Without an explicit pool the global rayon pool is used.
#[cfg(feature = "parallel")]
#[derive(Clone, Debug, Default)]
pub struct ParallelEngine {
    thread_pool: Option<std::sync::Arc<rayon::ThreadPool>>,
}

#[cfg(feature = "parallel")]
impl ParallelEngine {
    /// Create a new parallel engine backed by the global pool
    pub fn new() -> Self {
        Self { thread_pool: None }
    }

    /// Create a new parallel engine with a custom thread pool
    pub fn with_thread_pool(pool: std::sync::Arc<rayon::ThreadPool>) -> Self {
        Self {
            thread_pool: Some(pool),
        }
    }

    /// Create with a specific number of threads
    pub fn with_num_threads(num_threads: usize) -> Result<Self> {
        if num_threads == 0 {
            return Err(Error::configuration("worker count must be positive"));
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|i| format!("offspring-worker-{i}"))
            .build()
            .map_err(|e| Error::Execution(format!("Failed to create thread pool: {e}")))?;

        Ok(Self {
            thread_pool: Some(std::sync::Arc::new(pool)),
        })
    }
}

#[cfg(feature = "parallel")]
impl ExecutionEngine for ParallelEngine {
    fn execute<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        if let Some(pool) = &self.thread_pool {
            pool.install(f)
        } else {
            f()
        }
    }

    fn execute_batch<F, R>(&self, count: usize, f: F) -> Vec<R>
    where
        F: Fn(usize) -> R + Sync + Send,
        R: Send,
    {
        use rayon::prelude::*;

        if let Some(pool) = &self.thread_pool {
            pool.install(|| (0..count).into_par_iter().map(f).collect())
        } else {
            (0..count).into_par_iter().map(f).collect()
        }
    }

    fn strategy(&self) -> ExecutionStrategy {
        ExecutionStrategy::Parallel
    }

    fn num_threads(&self) -> usize {
        if let Some(pool) = &self.thread_pool {
            pool.current_num_threads()
        } else {
            rayon::current_num_threads()
        }
    }
}

/// Either engine, chosen at runtime from a worker count
#[derive(Clone, Debug)]
pub enum AnyEngine {
    Sequential(SequentialEngine),
    #[cfg(feature = "parallel")]
    Parallel(ParallelEngine),
}

impl AnyEngine {
    /// One worker runs sequentially; more workers get a dedicated pool.
    ///
    /// Without the `parallel` feature every worker count falls back to the
    /// sequential engine.
    pub fn with_workers(workers: usize) -> crate::Result<Self> {
        if workers == 0 {
            return Err(crate::Error::configuration("worker count must be positive"));
        }
        #[cfg(feature = "parallel")]
        {
            if workers > 1 {
                return Ok(Self::Parallel(ParallelEngine::with_num_threads(workers)?));
            }
        }
        #[cfg(not(feature = "parallel"))]
        {
            if workers > 1 {
                tracing::warn!(workers, "parallel feature disabled, running sequentially");
            }
        }
        Ok(Self::Sequential(SequentialEngine))
    }
}

impl ExecutionEngine for AnyEngine {
    fn execute<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        match self {
            Self::Sequential(engine) => engine.execute(f),
            #[cfg(feature = "parallel")]
            Self::Parallel(engine) => engine.execute(f),
        }
    }

    fn execute_batch<F, R>(&self, count: usize, f: F) -> Vec<R>
    where
        F: Fn(usize) -> R + Sync + Send,
        R: Send,
    {
        match self {
            Self::Sequential(engine) => engine.execute_batch(count, f),
            #[cfg(feature = "parallel")]
            Self::Parallel(engine) => engine.execute_batch(count, f),
        }
    }

    fn strategy(&self) -> ExecutionStrategy {
        match self {
            Self::Sequential(engine) => engine.strategy(),
            #[cfg(feature = "parallel")]
            Self::Parallel(engine) => engine.strategy(),
        }
    }

    fn num_threads(&self) -> usize {
        match self {
            Self::Sequential(engine) => engine.num_threads(),
            #[cfg(feature = "parallel")]
            Self::Parallel(engine) => engine.num_threads(),
        }
    }
}

/// Create a sequential engine
pub fn sequential() -> SequentialEngine {
    SequentialEngine
}

/// Create a parallel engine sized to the available cores
#[cfg(feature = "parallel")]
pub fn parallel() -> Result<ParallelEngine> {
    ParallelEngine::with_num_threads(num_cpus::get())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_engine() {
        let engine = sequential();
        assert_eq!(engine.strategy(), ExecutionStrategy::Sequential);
        assert_eq!(engine.num_threads(), 1);
        assert!(!engine.is_parallel());

        let results = engine.execute_batch(5, |i| i * 2);
        assert_eq!(results, vec![0, 2, 4, 6, 8]);
        assert_eq!(engine.execute(|| 42), 42);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_engine_preserves_order() {
        let engine = ParallelEngine::with_num_threads(3).unwrap();
        assert_eq!(engine.num_threads(), 3);
        assert!(engine.is_parallel());

        let results = engine.execute_batch(100, |i| i * i);
        let expected: Vec<usize> = (0..100).map(|i| i * i).collect();
        assert_eq!(results, expected);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_zero_threads_rejected() {
        let err = ParallelEngine::with_num_threads(0).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_any_engine_selection() {
        let single = AnyEngine::with_workers(1).unwrap();
        assert_eq!(single.strategy(), ExecutionStrategy::Sequential);
        assert!(AnyEngine::with_workers(0).is_err());

        let multi = AnyEngine::with_workers(2).unwrap();
        let results = multi.execute_batch(4, |i| i + 1);
        assert_eq!(results, vec![1, 2, 3, 4]);
    }
}
