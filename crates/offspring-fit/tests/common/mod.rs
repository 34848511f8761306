//! Shared utilities for integration tests
#![allow(dead_code)]

use offspring_core::CountData;
use rand::prelude::*;
use rand_distr::{Beta, Gamma, Poisson};

pub fn plague() -> CountData {
    let mut values = vec![0; 16];
    values.extend(vec![1; 10]);
    values.extend(vec![2; 7]);
    values.extend(vec![3; 2]);
    values.extend(vec![4; 3]);
    values.extend([5, 6]);
    CountData::new(values).unwrap()
}

fn poisson_draw(rng: &mut StdRng, rate: f64) -> u64 {
    if rate <= 0.0 {
        return 0;
    }
    Poisson::new(rate).unwrap().sample(rng) as u64
}

pub fn poisson_sample(lambda: f64, n: usize, seed: u64) -> CountData {
    let mut rng = StdRng::seed_from_u64(seed);
    CountData::new((0..n).map(|_| poisson_draw(&mut rng, lambda)).collect()).unwrap()
}

pub fn geometric_sample(lambda: f64, n: usize, seed: u64) -> CountData {
    // Exponential-mixed Poisson is geometric with the same mean
    negative_binomial_sample(lambda, 1.0, n, seed)
}

pub fn negative_binomial_sample(lambda: f64, theta: f64, n: usize, seed: u64) -> CountData {
    let mut rng = StdRng::seed_from_u64(seed);
    let gamma = Gamma::new(1.0 / theta, lambda * theta).unwrap();
    let values = (0..n)
        .map(|_| {
            let rate = gamma.sample(&mut rng);
            poisson_draw(&mut rng, rate)
        })
        .collect();
    CountData::new(values).unwrap()
}

pub fn zip_sample(lambda: f64, sigma: f64, n: usize, seed: u64) -> CountData {
    let mut rng = StdRng::seed_from_u64(seed);
    let values = (0..n)
        .map(|_| {
            if rng.gen::<f64>() < sigma {
                0
            } else {
                poisson_draw(&mut rng, lambda)
            }
        })
        .collect();
    CountData::new(values).unwrap()
}

pub fn beta_poisson_sample(lambda: f64, phi: f64, contact_rate: f64, n: usize, seed: u64) -> CountData {
    let mut rng = StdRng::seed_from_u64(seed);
    let beta = Beta::new(phi * lambda, phi * (contact_rate - lambda)).unwrap();
    let values = (0..n)
        .map(|_| {
            let p = beta.sample(&mut rng);
            poisson_draw(&mut rng, contact_rate * p)
        })
        .collect();
    CountData::new(values).unwrap()
}
