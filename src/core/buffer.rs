//! Bounded copy into caller-supplied, NUL-terminated byte buffers.

/// Copy `src` into `dst` as a NUL-terminated string, truncating as needed.
///
/// At most `dst.len() - 1` bytes of `src` are copied, followed by a single `0`.
/// Nothing is written past `dst.len()`, and an empty `dst` is left untouched.
/// Returns the number of bytes of `src` that were copied (terminator excluded).
pub fn copy_truncated(dst: &mut [u8], src: &[u8]) -> usize {
    let Some(room) = dst.len().checked_sub(1) else {
        return 0;
    };

    let copied = src.len().min(room);
    dst[..copied].copy_from_slice(&src[..copied]);
    dst[copied] = 0;
    copied
}

/// Read back the NUL-terminated prefix of a buffer filled by [`copy_truncated`].
pub fn terminated(buf: &[u8]) -> &[u8] {
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    &buf[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncates_to_capacity() {
        let mut buf = [0xffu8; 3];
        let copied = copy_truncated(&mut buf, b"hello");

        assert_eq!(copied, 2);
        assert_eq!(&buf, b"he\0");
    }

    #[test]
    fn test_short_value_fits() {
        let mut buf = [0xffu8; 8];
        let copied = copy_truncated(&mut buf, b"abc");

        assert_eq!(copied, 3);
        assert_eq!(&buf[..4], b"abc\0");
        // Bytes after the terminator are not touched.
        assert_eq!(&buf[4..], &[0xff; 4]);
        assert_eq!(terminated(&buf), b"abc");
    }

    #[test]
    fn test_exact_fit_leaves_room_for_terminator() {
        let mut buf = [0xffu8; 4];
        assert_eq!(copy_truncated(&mut buf, b"abcd"), 3);
        assert_eq!(&buf, b"abc\0");
    }

    #[test]
    fn test_zero_and_one_capacity() {
        let mut empty: [u8; 0] = [];
        assert_eq!(copy_truncated(&mut empty, b"abc"), 0);

        let mut one = [0xffu8; 1];
        assert_eq!(copy_truncated(&mut one, b"abc"), 0);
        assert_eq!(one, [0]);
    }

    #[test]
    fn test_terminated_without_nul() {
        assert_eq!(terminated(b"abc"), b"abc");
    }
}
