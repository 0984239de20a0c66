/// Chooses a catalog index for shuffle mode.
pub trait IndexPicker {
    /// Return an index in `[0, len)`; `len` is never 0.
    fn pick(&mut self, len: usize) -> usize;
}

/// Uniform sampling. The same index may come up twice in a row.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomPicker;

impl IndexPicker for RandomPicker {
    fn pick(&mut self, len: usize) -> usize {
        rand::random_range(0..len)
    }
}
