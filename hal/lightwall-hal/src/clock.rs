//! Monotonic time source

/// Millisecond uptime counter
///
/// Wraps after about 49.7 days; consumers compare deadlines with
/// wrapping arithmetic.
pub trait Monotonic {
    fn now_ms(&self) -> u32;
}

impl<M: Monotonic + ?Sized> Monotonic for &M {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}
