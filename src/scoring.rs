//! Points awarded per lock.

/// Points for clearing `rows` rows with a single lock: 1 → 100, 2 → 300, 3 → 500,
/// 4 → 800, anything else → 0.
pub const fn points_for(rows: usize) -> u32 {
    match rows {
        1 => 100,
        2 => 300,
        3 => 500,
        4 => 800,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_table() {
        assert_eq!(points_for(0), 0);
        assert_eq!(points_for(1), 100);
        assert_eq!(points_for(2), 300);
        assert_eq!(points_for(3), 500);
        assert_eq!(points_for(4), 800);
    }

    #[test]
    fn test_out_of_range_scores_nothing() {
        assert_eq!(points_for(5), 0);
        assert_eq!(points_for(usize::MAX), 0);
    }
}
