/*
    Copyright (C) 2020-2023  Rafal Michalski

    This file is part of TAPEWAVE, a Rust library for rendering tape images as audio.

    For the full copyright notice, see the lib.rs file.
*/
//! Random access byte sources of tape images.

/// A random access source of bytes of a tape image.
///
/// Implemented for anything that implements `AsRef<[u8]>` (e.g. `&[u8]`, `Vec<u8>` or `Box<[u8]>`).
pub trait ByteSource {
    /// Returns the total number of bytes in the source.
    fn len(&self) -> usize;
    /// Returns a byte at the given absolute `index` or `None` if the `index` is out of bounds.
    fn byte_at(&self, index: usize) -> Option<u8>;
    /// Returns `true` if the source has no bytes.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: AsRef<[u8]> + ?Sized> ByteSource for T {
    #[inline(always)]
    fn len(&self) -> usize {
        self.as_ref().len()
    }
    #[inline(always)]
    fn byte_at(&self, index: usize) -> Option<u8> {
        self.as_ref().get(index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_and_len<S: ByteSource + ?Sized>(source: &S) -> (Option<u8>, usize) {
        (source.byte_at(0), ByteSource::len(source))
    }

    #[test]
    fn byte_source_works() {
        let bytes = [1u8, 2, 3];
        assert_eq!((Some(1), 3), first_and_len(&bytes[..]));
        assert_eq!((Some(1), 3), first_and_len(&bytes.to_vec()));
        assert_eq!((None, 0), first_and_len(&Vec::<u8>::new()));
        assert_eq!(Some(3), bytes.byte_at(2));
        assert_eq!(None, bytes.byte_at(3));
        assert!(ByteSource::is_empty(&[0u8;0][..]));
    }
}
