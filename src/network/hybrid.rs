//! Depth-optimised fixed sorting networks for short sub-sorts.
//!
//! Each table lists comparator pairs `(i, j)` with `i < j`; applied in order
//! with the sort direction they sort any input of their length.

const NET_3: [(u8, u8); 3] = [(0, 1), (1, 2), (0, 1)];

const NET_4: [(u8, u8); 5] = [(0, 1), (2, 3), (0, 2), (1, 3), (1, 2)];

const NET_5: [(u8, u8); 9] = [
    (0, 1), (2, 3), (1, 3), (2, 4), (0, 2), (1, 4), (1, 2), (3, 4), (2, 3),
];

const NET_6: [(u8, u8); 13] = [
    (0, 3), (1, 2), (0, 1), (2, 3), (4, 5), (0, 3), (1, 4), (2, 5), (0, 1), (2, 4), (3, 5),
    (1, 2), (3, 4),
];

const NET_12: [(u8, u8); 40] = [
    (0, 1), (2, 3), (4, 5), (6, 7), (8, 9), (10, 11), (0, 2), (1, 3), (4, 6), (5, 7), (8, 10),
    (9, 11), (0, 4), (1, 5), (2, 6), (7, 11), (9, 10), (1, 2), (6, 10), (5, 9), (4, 8), (3, 7),
    (2, 6), (1, 5), (0, 4), (9, 10), (7, 11), (3, 8), (1, 4), (7, 10), (2, 3), (5, 6), (8, 9),
    (2, 4), (3, 5), (6, 8), (7, 9), (3, 4), (5, 6), (7, 8),
];

const NET_13: [(u8, u8); 47] = [
    (0, 1), (2, 3), (4, 5), (6, 7), (8, 9), (10, 11), (0, 2), (1, 3), (4, 6), (5, 7), (8, 10),
    (9, 11), (0, 4), (1, 5), (2, 6), (3, 7), (8, 12), (0, 8), (1, 9), (2, 10), (3, 11), (4, 12),
    (1, 2), (3, 12), (7, 11), (4, 8), (5, 10), (6, 9), (1, 4), (2, 8), (6, 12), (3, 10), (5, 9),
    (2, 4), (3, 5), (6, 8), (7, 9), (10, 12), (3, 6), (5, 8), (7, 10), (9, 12), (3, 4), (5, 6),
    (7, 8), (9, 10), (11, 12),
];

/// Returns the fixed network for length `n`, if one exists.
pub(crate) fn fixed_network(n: usize) -> Option<&'static [(u8, u8)]> {
    match n {
        3 => Some(&NET_3),
        4 => Some(&NET_4),
        5 => Some(&NET_5),
        6 => Some(&NET_6),
        12 => Some(&NET_12),
        13 => Some(&NET_13),
        _ => None,
    }
}
