use heapless::Deque;

/// Fixed-capacity circular buffer over a [`heapless::Deque`].
///
/// Pushing into a full buffer overwrites the oldest element. Indices
/// passed to [`get()`](RingBuffer::get) count from the oldest element.
///
/// ```
/// use megamega::midi::RingBuffer;
///
/// let mut ring: RingBuffer<u8, 3> = RingBuffer::new();
/// for b in [1, 2, 3, 4] {
///     ring.push(b);
/// }
/// assert_eq!(ring.len(), 3);
/// assert_eq!(ring.get(0), Some(2));
/// assert_eq!(ring.get(2), Some(4));
/// ```
#[derive(Debug, Clone)]
pub struct RingBuffer<T, const N: usize> {
    items: Deque<T, N>,
}

impl<T: Copy, const N: usize> Default for RingBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy, const N: usize> RingBuffer<T, N> {
    /// An empty buffer.
    pub const fn new() -> Self {
        Self { items: Deque::new() }
    }

    /// Append `value`, overwriting the oldest element when full.
    pub fn push(&mut self, value: T) {
        if self.items.is_full() {
            self.items.pop_front();
        }
        // Room was made above.
        let _ = self.items.push_back(value);
    }

    /// Element `index` positions after the oldest, if present.
    pub fn get(&self, index: usize) -> Option<T> {
        self.items.iter().nth(index).copied()
    }

    /// Drop every element.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Number of stored elements.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(feature = "defmt")]
impl<T, const N: usize> defmt::Format for RingBuffer<T, N> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "RingBuffer({=usize}/{=usize})", self.items.len(), N);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_then_overwrites_oldest() {
        let mut r: RingBuffer<u8, 3> = RingBuffer::new();
        assert!(r.is_empty());
        r.push(10);
        r.push(20);
        assert_eq!(r.len(), 2);
        r.push(30);
        r.push(40);
        assert_eq!(r.len(), 3);
        assert_eq!([r.get(0), r.get(1), r.get(2)], [Some(20), Some(30), Some(40)]);
        assert_eq!(r.get(3), None);
    }

    #[test]
    fn clear_then_refill_past_the_end() {
        let mut r: RingBuffer<u8, 3> = RingBuffer::default();
        r.push(1);
        r.push(2);
        r.clear();
        assert!(r.is_empty());
        assert_eq!(r.get(0), None);

        for b in [3, 4, 5, 6] {
            r.push(b);
        }
        assert_eq!([r.get(0), r.get(1), r.get(2)], [Some(4), Some(5), Some(6)]);
    }
}
