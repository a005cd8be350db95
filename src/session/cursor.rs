//! Saturating cursors shared by both navigation modes.

/// Which cursor family drives navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavMode {
    /// All questions of the topic as one list, driven by the flat cursor.
    Flat,
    /// Only questions of the focused level, each level with its own cursor.
    ByLevel,
}

impl NavMode {
    pub fn from_ignore_level(ignore_level_checking: bool) -> Self {
        if ignore_level_checking {
            NavMode::Flat
        } else {
            NavMode::ByLevel
        }
    }
}

/// Result of moving a cursor one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Moved(usize),
    AtEnd,
    AtStart,
}

/// Pulls a stale cursor back into `[0, len)`. Returns `None` for an empty list.
pub fn clamp(cursor: &mut usize, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    if *cursor >= len {
        *cursor = len - 1;
    }
    Some(*cursor)
}

pub fn forward(cursor: &mut usize, len: usize) -> Step {
    let Some(current) = clamp(cursor, len) else {
        return Step::AtEnd;
    };
    if current + 1 < len {
        *cursor = current + 1;
        Step::Moved(*cursor)
    } else {
        Step::AtEnd
    }
}

pub fn backward(cursor: &mut usize, len: usize) -> Step {
    let Some(current) = clamp(cursor, len) else {
        return Step::AtStart;
    };
    if current > 0 {
        *cursor = current - 1;
        Step::Moved(*cursor)
    } else {
        Step::AtStart
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_saturates_at_last_index() {
        let mut cursor = 0;
        for _ in 0..10 {
            forward(&mut cursor, 4);
        }
        assert_eq!(cursor, 3);
        assert_eq!(forward(&mut cursor, 4), Step::AtEnd);
        assert_eq!(cursor, 3);
    }

    #[test]
    fn backward_saturates_at_zero() {
        let mut cursor = 2;
        assert_eq!(backward(&mut cursor, 4), Step::Moved(1));
        assert_eq!(backward(&mut cursor, 4), Step::Moved(0));
        assert_eq!(backward(&mut cursor, 4), Step::AtStart);
        assert_eq!(cursor, 0);
    }

    #[test]
    fn empty_list_never_moves() {
        let mut cursor = 0;
        assert_eq!(forward(&mut cursor, 0), Step::AtEnd);
        assert_eq!(backward(&mut cursor, 0), Step::AtStart);
        assert_eq!(cursor, 0);
        assert_eq!(clamp(&mut cursor, 0), None);
    }

    #[test]
    fn stale_cursor_is_clamped_before_moving() {
        let mut cursor = 7;
        assert_eq!(clamp(&mut cursor, 3), Some(2));

        let mut cursor = 7;
        assert_eq!(forward(&mut cursor, 3), Step::AtEnd);
        assert_eq!(cursor, 2);

        let mut cursor = 7;
        assert_eq!(backward(&mut cursor, 3), Step::Moved(1));
    }

    #[test]
    fn mode_follows_ignore_flag() {
        assert_eq!(NavMode::from_ignore_level(true), NavMode::Flat);
        assert_eq!(NavMode::from_ignore_level(false), NavMode::ByLevel);
    }
}
