//! Bit-packed validity bitmap.

/// Validity bitmap, one bit per element, `true` meaning "value present".
///
/// Bits are packed LSB-first, matching the layout the columnar codecs use.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bitmap {
    bytes: Vec<u8>,
    len: usize,
    unset: usize,
}

impl Bitmap {
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bits.div_ceil(8)),
            len: 0,
            unset: 0,
        }
    }

    pub(crate) fn push(&mut self, bit: bool) {
        let offset = self.len % 8;
        if offset == 0 {
            self.bytes.push(0);
        }
        if bit {
            if let Some(last) = self.bytes.last_mut() {
                *last |= 1 << offset;
            }
        } else {
            self.unset += 1;
        }
        self.len += 1;
    }

    /// Returns the bit at `index`.
    ///
    /// # Panics
    /// Panics if `index >= self.len()`.
    pub fn get(&self, index: usize) -> bool {
        assert!(index < self.len, "bitmap index {index} out of bounds");
        self.bytes[index / 8] & (1 << (index % 8)) != 0
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of `false` bits, i.e. the null count of the owning array.
    pub fn unset_bits(&self) -> usize {
        self.unset
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = bool> + '_ {
        (0..self.len).map(|i| self.get(i))
    }

    /// Drops the bitmap when every bit is set; arrays without nulls carry none.
    pub(crate) fn into_validity(self) -> Option<Bitmap> {
        (self.unset > 0).then_some(self)
    }
}

impl FromIterator<bool> for Bitmap {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut bitmap = Bitmap::with_capacity(iter.size_hint().0);
        for bit in iter {
            bitmap.push(bit);
        }
        bitmap
    }
}
