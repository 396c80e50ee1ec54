//
// Copyright 2024-2026 The Mudlink Authors. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

/// Fixed-capacity, zero-initialized staging buffer.
///
/// Used to stage inflate output chunks before they re-enter the byte parser.
/// The storage is never reallocated; `set_filled` just moves the fill mark.
pub struct ScratchBuffer<const N: usize> {
    buffer: [u8; N],
    filled: usize,
}

impl<const N: usize> Default for ScratchBuffer<N> {
    fn default() -> Self {
        ScratchBuffer {
            buffer: [0u8; N],
            filled: 0,
        }
    }
}

impl<const N: usize> ScratchBuffer<N> {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total capacity in bytes.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// The whole writable storage.
    pub fn storage_mut(&mut self) -> &mut [u8] {
        &mut self.buffer
    }

    /// Marks how many bytes of the storage are now valid.
    ///
    /// # Panics
    /// Panics if `filled` exceeds the capacity.
    pub fn set_filled(&mut self, filled: usize) {
        assert!(filled <= N);
        self.filled = filled;
    }

    /// The valid prefix.
    pub fn filled(&self) -> &[u8] {
        &self.buffer[..self.filled]
    }

    /// Empties the buffer (the storage stays zero-padded beyond the mark).
    pub fn clear(&mut self) {
        self.filled = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_and_clear() {
        let mut scratch = ScratchBuffer::<8>::new();
        assert_eq!(scratch.capacity(), 8);
        assert!(scratch.filled().is_empty());
        scratch.storage_mut()[..3].copy_from_slice(b"abc");
        scratch.set_filled(3);
        assert_eq!(scratch.filled(), b"abc");
        scratch.clear();
        assert!(scratch.filled().is_empty());
    }
}
