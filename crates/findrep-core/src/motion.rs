use crate::buffer::Buffer;
use crate::cursor::Cursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
    LineStart,
    LineEnd,
    DocumentStart,
    DocumentEnd,
}

impl Motion {
    /// `allow_past_end` 在插入模式下为真
    pub fn execute(&self, cursor: &mut Cursor, buffer: &Buffer, allow_past_end: bool) {
        match self {
            Motion::Left => cursor.move_left(1),
            Motion::Right => cursor.move_right(buffer, 1, allow_past_end),
            Motion::Up => cursor.move_up(buffer, 1),
            Motion::Down => cursor.move_down(buffer, 1),
            Motion::LineStart => cursor.move_to_line_start(),
            Motion::LineEnd => cursor.move_to_line_end(buffer),
            Motion::DocumentStart => cursor.move_to_top(buffer),
            Motion::DocumentEnd => cursor.move_to_bottom(buffer),
        }
        cursor.ensure_valid(buffer, allow_past_end);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::BufferId;

    #[test]
    fn test_motions_stay_in_buffer() {
        let buffer = Buffer::from_str(BufferId::new(0), "abc\nde");
        let mut cursor = Cursor::at_origin();

        Motion::LineEnd.execute(&mut cursor, &buffer, false);
        assert_eq!(cursor.column, 2);
        Motion::Right.execute(&mut cursor, &buffer, false);
        assert_eq!(cursor.column, 2);
        Motion::Right.execute(&mut cursor, &buffer, true);
        assert_eq!(cursor.column, 3);

        Motion::DocumentEnd.execute(&mut cursor, &buffer, false);
        assert_eq!((cursor.line, cursor.column), (2, 1));
        Motion::Down.execute(&mut cursor, &buffer, false);
        assert_eq!(cursor.line, 2);
        Motion::DocumentStart.execute(&mut cursor, &buffer, false);
        assert_eq!(cursor.line, 1);
        Motion::Up.execute(&mut cursor, &buffer, false);
        assert_eq!(cursor.line, 1);
    }
}
