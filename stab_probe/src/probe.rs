/// Visits `(initial + j^2) % capacity` for `j` in `0..capacity`.
///
/// The walk is bounded: quadratic offsets repeat for composite capacities, so
/// running longer than `capacity` steps can never reach a new slot.
pub(crate) struct QuadraticProbe {
    capacity: usize,
    index: usize,
    step: usize,
    remaining: usize,
}

impl QuadraticProbe {
    pub(crate) fn new(initial: usize, capacity: usize) -> Self {
        QuadraticProbe {
            capacity,
            index: initial,
            step: 1,
            remaining: capacity,
        }
    }
}

impl Iterator for QuadraticProbe {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let index = self.index;
        // consecutive squares differ by successive odd numbers, so stepping
        // avoids computing j^2 outright
        self.index = (self.index + self.step % self.capacity) % self.capacity;
        self.step += 2;
        Some(index)
    }
}
