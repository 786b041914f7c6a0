//! Chunk planning: splitting `[0, total_bytes)` into fixed-size parts.

use crate::PartSpec;

/// Number of parts needed to cover `total_bytes`, i.e. `ceil(total_bytes / part_size)`.
///
/// `part_size` must be non-zero; a zero part size plans nothing.
pub fn part_count(total_bytes: u64, part_size: u64) -> u64 {
    if part_size == 0 {
        return 0;
    }
    total_bytes.div_ceil(part_size)
}

/// Plan the ordered parts for an object of `total_bytes`.
///
/// Part `i` (1-based) covers `[(i-1)*part_size, min(i*part_size, total_bytes))`. Only the last
/// part can be shorter than `part_size` and no part is empty. A zero-length object plans no parts.
/// Callers bound the part count (see [`part_count`]) before planning, part numbers are `u32`.
pub fn plan(total_bytes: u64, part_size: u64) -> Vec<PartSpec> {
    let count = part_count(total_bytes, part_size);
    (0..count)
        .map(|index| {
            let start = index * part_size;
            PartSpec {
                part_number: (index + 1) as u32,
                start,
                end: (start + part_size).min(total_bytes),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIB5: u64 = 5 * 1024 * 1024;

    #[test]
    fn twelve_million_bytes_make_three_parts() {
        let parts = plan(12_000_000, MIB5);
        let sizes: Vec<u64> = parts.iter().map(|p| p.len()).collect();
        assert_eq!(sizes, vec![5_242_880, 5_242_880, 1_514_240]);
        let numbers: Vec<u32> = parts.iter().map(|p| p.part_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(parts[2].end, 12_000_000);
    }

    #[test]
    fn exact_multiple_has_full_last_part() {
        let parts = plan(2 * MIB5, MIB5);
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[1].len(), MIB5);
    }

    #[test]
    fn empty_object_plans_nothing() {
        assert!(plan(0, MIB5).is_empty());
        assert_eq!(part_count(0, MIB5), 0);
    }

    #[test]
    fn tiny_object_is_one_part() {
        let parts = plan(1, MIB5);
        assert_eq!(
            parts,
            vec![PartSpec {
                part_number: 1,
                start: 0,
                end: 1
            }]
        );
    }

    #[test]
    fn zero_part_size_plans_nothing() {
        assert!(plan(100, 0).is_empty());
    }
}
