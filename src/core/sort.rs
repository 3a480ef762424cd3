//! Merge sort over a raw node chain.
//!
//! Nodes are only relinked, never copied or reallocated. The chain is split by
//! its known length rather than with slow/fast cursors; either way the front run
//! holds `ceil(n/2)` nodes. Splitting recurses at most `ceil(log2 n)` levels
//! deep and merging is a loop, so chain length never drives recursion depth.

use super::node::Link;

/// Sort a chain of exactly `len` nodes in ascending byte order.
///
/// # Safety
///
/// `head` must start a chain of exactly `len` live nodes that the caller owns
/// exclusively for the duration of the call.
pub(crate) unsafe fn merge_sort(head: Link, len: usize) -> Link {
    if len < 2 {
        return head;
    }

    // The front run keeps the extra node when `len` is odd.
    let front_len = len - len / 2;
    let back = split_off(head, front_len);

    let front = merge_sort(head, front_len);
    let back = merge_sort(back, len - front_len);
    merge(front, back)
}

/// Detach everything after the first `at` nodes (`at >= 1`).
unsafe fn split_off(head: Link, at: usize) -> Link {
    debug_assert!(at > 0);

    let mut last = head?;
    for _ in 1..at {
        last = (*last.as_ptr()).next?;
    }
    (*last.as_ptr()).next.take()
}

/// Merge two ascending chains. Ties take from `left` first.
unsafe fn merge(mut left: Link, mut right: Link) -> Link {
    let mut head: Link = None;
    let mut tail: Link = None;

    while let (Some(l), Some(r)) = (left, right) {
        let node = if (*l.as_ptr()).value <= (*r.as_ptr()).value {
            left = (*l.as_ptr()).next;
            l
        } else {
            right = (*r.as_ptr()).next;
            r
        };

        match tail {
            None => head = Some(node),
            Some(t) => (*t.as_ptr()).next = Some(node),
        }
        tail = Some(node);
    }

    let rest = if left.is_some() { left } else { right };
    match tail {
        None => rest,
        Some(t) => {
            (*t.as_ptr()).next = rest;
            head
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::node::Node;

    fn chain(values: &[&str]) -> Link {
        let mut head: Link = None;
        for value in values.iter().rev() {
            let node = Node::try_new(value).unwrap();
            unsafe { (*node.as_ptr()).next = head };
            head = Some(node);
        }
        head
    }

    /// Free the chain, returning its values in order.
    fn drain(mut link: Link) -> Vec<String> {
        let mut out = Vec::new();
        while let Some(node) = link {
            unsafe {
                link = (*node.as_ptr()).next;
                out.push(Node::free(node));
            }
        }
        out
    }

    #[test]
    fn test_split_off_front_keeps_ceil_half() {
        let head = chain(&["a", "b", "c", "d", "e"]);
        let back = unsafe { split_off(head, 3) };

        assert_eq!(drain(head), vec!["a", "b", "c"]);
        assert_eq!(drain(back), vec!["d", "e"]);
    }

    #[test]
    fn test_split_off_past_end() {
        let head = chain(&["a", "b"]);
        assert!(unsafe { split_off(head, 5) }.is_none());
        assert_eq!(drain(head), vec!["a", "b"]);
    }

    #[test]
    fn test_merge_interleaves() {
        let merged = unsafe { merge(chain(&["a", "c", "e"]), chain(&["b", "d", "f", "g"])) };
        assert_eq!(drain(merged), vec!["a", "b", "c", "d", "e", "f", "g"]);
    }

    #[test]
    fn test_merge_with_empty_side() {
        unsafe {
            assert_eq!(drain(merge(None, chain(&["x"]))), vec!["x"]);
            assert_eq!(drain(merge(chain(&["x"]), None)), vec!["x"]);
            assert!(merge(None, None).is_none());
        }
    }

    #[test]
    fn test_merge_sort_orders_bytewise() {
        let values = ["pear", "Apple", "apple", "", "banana", "apple", "Zebra"];
        let sorted = unsafe { merge_sort(chain(&values), values.len()) };

        let mut expected: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        expected.sort();
        assert_eq!(drain(sorted), expected);
    }
}
