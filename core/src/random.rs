/// Uniform integer source used for hazard placement.
///
/// Any [`rand::Rng`] works out of the box, so a seeded
/// [`SmallRng`](rand::rngs::SmallRng) gives reproducible boards.
pub trait RandomSource {
    /// Returns a uniformly distributed integer in `[min, max]`, both inclusive.
    fn random_inclusive(&mut self, min: usize, max: usize) -> usize;
}

impl<R: rand::Rng> RandomSource for R {
    fn random_inclusive(&mut self, min: usize, max: usize) -> usize {
        self.random_range(min..=max)
    }
}

/// Replays fixed values, placing hazards exactly where a test wants them.
#[cfg(test)]
pub(crate) struct Scripted(alloc::collections::VecDeque<usize>);

#[cfg(test)]
impl Scripted {
    pub(crate) fn new(values: &[usize]) -> Self {
        Self(values.iter().copied().collect())
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
impl RandomSource for Scripted {
    fn random_inclusive(&mut self, min: usize, max: usize) -> usize {
        let value = self.0.pop_front().expect("script exhausted");
        assert!((min..=max).contains(&value));
        value
    }
}
