//! Resampling engine for the parametric bootstrap
//!
//! Every resample is an independent task: its random stream is derived from
//! the run seed and the resample index alone, and the task sees only the
//! read-only original sample. Results come back in index order whatever
//! engine ran them, so a fixed seed reproduces a run exactly.
//!
//! A resample whose mean is zero is redrawn, at most `max_redraws` times.
//! Running out of redraws is recorded as an exhausted resample; the rest of
//! the batch carries on.

use offspring_core::{CountData, Error, ExecutionEngine, Result};
use rand::prelude::*;
use tracing::{debug, instrument, warn};

/// Default number of bootstrap resamples
pub const DEFAULT_RESAMPLES: usize = 1000;

/// Default cap on redraws of a zero-mean resample
pub const DEFAULT_MAX_REDRAWS: usize = 100;

/// What happened to one resample
#[derive(Debug, Clone, PartialEq)]
pub enum ResampleOutcome<T> {
    /// A usable resample was drawn and the task ran on it
    Completed {
        index: usize,
        /// Zero-mean draws discarded before this one
        redraws: usize,
        sample_mean: f64,
        value: T,
    },
    /// Every draw, including all redraws, had mean zero
    Exhausted { index: usize, attempts: usize },
}

impl<T> ResampleOutcome<T> {
    pub fn index(&self) -> usize {
        match self {
            Self::Completed { index, .. } | Self::Exhausted { index, .. } => *index,
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Completed { value, .. } => Some(value),
            Self::Exhausted { .. } => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// All outcomes of one bootstrap run, in resample order
#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapRun<T> {
    pub outcomes: Vec<ResampleOutcome<T>>,
    /// Seed the per-resample streams were derived from
    pub seed: u64,
}

impl<T> BootstrapRun<T> {
    pub fn requested(&self) -> usize {
        self.outcomes.len()
    }

    pub fn completed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_completed()).count()
    }

    pub fn exhausted(&self) -> usize {
        self.requested() - self.completed()
    }

    /// Task results of the completed resamples
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.outcomes.iter().filter_map(ResampleOutcome::value)
    }
}

/// Bootstrap driver over an execution engine
#[derive(Debug, Clone)]
pub struct Bootstrap<E> {
    engine: E,
    n_resamples: usize,
    seed: Option<u64>,
    max_redraws: usize,
}

impl<E: ExecutionEngine> Bootstrap<E> {
    /// Create a new bootstrap engine
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            n_resamples: DEFAULT_RESAMPLES,
            seed: None,
            max_redraws: DEFAULT_MAX_REDRAWS,
        }
    }

    /// Set the number of bootstrap resamples
    pub fn with_resamples(mut self, n_resamples: usize) -> Self {
        self.n_resamples = n_resamples;
        self
    }

    /// Set random seed for reproducibility
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_max_redraws(mut self, max_redraws: usize) -> Self {
        self.max_redraws = max_redraws;
        self
    }

    pub fn n_resamples(&self) -> usize {
        self.n_resamples
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn max_redraws(&self) -> usize {
        self.max_redraws
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Draw a resample with positive mean, or give up after `max_redraws`
    fn draw<R: Rng + ?Sized>(&self, data: &CountData, rng: &mut R) -> std::result::Result<(CountData, usize), usize> {
        for redraws in 0..=self.max_redraws {
            let resample = data.resample(rng);
            if resample.mean() > 0.0 {
                return Ok((resample, redraws));
            }
        }
        Err(self.max_redraws + 1)
    }

    /// Run `task` on `n_resamples` resamples of `data`
    ///
    /// `task` receives the resample index and the resample. Fails only for
    /// an invalid run setup; per-resample trouble is recorded in the
    /// outcomes.
    #[instrument(skip(self, data, task), fields(n = data.len(), n_resamples = self.n_resamples))]
    pub fn run<T, F>(&self, data: &CountData, task: F) -> Result<BootstrapRun<T>>
    where
        F: Fn(usize, &CountData) -> T + Sync + Send,
        T: Send,
    {
        if self.n_resamples == 0 {
            return Err(Error::configuration("resample count must be positive"));
        }
        if data.mean() <= 0.0 {
            return Err(Error::InvalidInput(
                "every observation is zero, so no resample can have a positive mean".to_string(),
            ));
        }

        let seed = self.seed.unwrap_or_else(|| thread_rng().gen());
        debug!(
            seed,
            threads = self.engine.num_threads(),
            "Running {} bootstrap resamples",
            self.n_resamples
        );

        let outcomes = self.engine.execute_batch(self.n_resamples, |index| {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(index as u64));
            match self.draw(data, &mut rng) {
                Ok((resample, redraws)) => ResampleOutcome::Completed {
                    index,
                    redraws,
                    sample_mean: resample.mean(),
                    value: task(index, &resample),
                },
                Err(attempts) => {
                    warn!(index, attempts, "no resample with positive mean, giving up");
                    ResampleOutcome::Exhausted { index, attempts }
                }
            }
        });

        let run = BootstrapRun { outcomes, seed };
        debug!(completed = run.completed(), exhausted = run.exhausted(), "Bootstrap completed");
        Ok(run)
    }
}
