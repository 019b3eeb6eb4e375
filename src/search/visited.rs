/// A fixed-capacity set of finalised nodes, one bit per node.
///
/// # Panics
/// `close` and `is_closed` panic when `index >= capacity`.
pub struct ClosedSet {
    buffer: Box<[u8]>,
    capacity: usize,
}

impl ClosedSet {
    pub fn new(capacity: usize) -> Self {
        let bytes_needed = capacity.div_ceil(8);
        ClosedSet {
            buffer: vec![0u8; bytes_needed].into_boxed_slice(),
            capacity,
        }
    }

    pub fn close(&mut self, index: usize) {
        assert!(index < self.capacity);
        self.buffer[index / 8] |= 1u8 << (index % 8)
    }

    pub fn is_closed(&self, index: usize) -> bool {
        assert!(index < self.capacity);
        self.buffer[index / 8] & (1u8 << (index % 8)) != 0
    }
}
