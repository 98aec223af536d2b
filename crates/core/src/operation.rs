//! Operation engine - combine a landing block with the cell it lands on

use crate::types::Operation;

/// Combine the falling value with the occupied cell's value.
///
/// - `Add`: `falling + cell`
/// - `Subtract`: `|falling - cell|`
/// - anything else: `falling` unchanged
///
/// Callers only invoke this when [`Operation::combines`] is true; anything
/// else is a caller bug and asserts in debug builds.
pub fn apply(falling: u32, cell: u32, op: Operation) -> u32 {
    debug_assert!(op.combines(), "cannot combine with {}", op.as_str());
    match op {
        Operation::Add => falling.saturating_add(cell),
        Operation::Subtract => falling.abs_diff(cell),
        Operation::None | Operation::Multiply | Operation::Divide => falling,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add() {
        assert_eq!(apply(5, 5, Operation::Add), 10);
        assert_eq!(apply(78, 78, Operation::Add), 156);
    }

    #[test]
    fn test_subtract_is_absolute() {
        assert_eq!(apply(3, 10, Operation::Subtract), 7);
        assert_eq!(apply(10, 3, Operation::Subtract), 7);
        assert_eq!(apply(5, 5, Operation::Subtract), 0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "cannot combine with none")]
    fn test_none_is_a_caller_bug() {
        apply(9, 4, Operation::None);
    }
}
