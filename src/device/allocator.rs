use std::fmt;
use std::mem::size_of;
use zerocopy::{AsBytes, FromBytes, LayoutVerified};

/// Staging memory for device readbacks.
///
/// Memory is handed out as one slice at a time and kept around between
/// allocations. The high watermark since the last shrink decides how much
/// of it survives `shrink_to_watermark`, so a burst of large readbacks is
/// released once it is over.
#[derive(Default)]
pub struct Allocator {
    memory: Vec<Aligned>,
    watermark: usize,
}

impl Allocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bytes currently held.
    pub fn capacity(&self) -> usize {
        self.memory.len() * size_of::<Aligned>()
    }

    pub fn shrink_to_watermark(&mut self) {
        self.memory.truncate(self.watermark);
        self.memory.shrink_to_fit(); // free

        self.watermark = 0;
    }

    pub fn allocate<T: AsBytes + FromBytes>(&mut self, len: usize) -> &mut [T] {
        let bytes = self.allocate_bytes(len * size_of::<T>());

        // blocks are 64-byte aligned and sized to a whole number of `T`
        match LayoutVerified::new_slice(bytes) {
            Some(layout) => layout.into_mut_slice(),
            None => unreachable!("misaligned staging allocation"),
        }
    }

    pub fn allocate_bytes(&mut self, len: usize) -> &mut [u8] {
        let blocks = (len + size_of::<Aligned>() - 1) / size_of::<Aligned>();

        if self.memory.len() < blocks {
            self.memory.resize_with(blocks, Aligned::default); // round up length
        }

        self.watermark = self.watermark.max(blocks);
        &mut self.memory.as_mut_slice().as_bytes_mut()[..len]
    }
}

impl fmt::Debug for Allocator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Allocator {{ {} bytes in use }}", self.capacity())
    }
}

#[repr(align(64), C)]
#[derive(FromBytes, AsBytes, Clone)]
struct Aligned([u8; 64]);

impl Default for Aligned {
    fn default() -> Self {
        Self([0; 64])
    }
}
