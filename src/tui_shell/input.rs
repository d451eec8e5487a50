/// Single-line text field. `cursor` counts chars, not bytes.
#[derive(Debug, Default)]
pub(super) struct Input {
    pub(super) buf: String,
    pub(super) cursor: usize,
}

impl Input {
    pub(super) fn clear(&mut self) {
        self.buf.clear();
        self.cursor = 0;
    }

    pub(super) fn is_blank(&self) -> bool {
        self.buf.trim().is_empty()
    }

    fn byte_at(&self, char_idx: usize) -> usize {
        self.buf
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.buf.len())
    }

    fn char_len(&self) -> usize {
        self.buf.chars().count()
    }

    pub(super) fn insert_char(&mut self, c: char) {
        let at = self.byte_at(self.cursor);
        self.buf.insert(at, c);
        self.cursor += 1;
    }

    pub(super) fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_at(self.cursor);
        self.buf.remove(at);
    }

    pub(super) fn delete(&mut self) {
        if self.cursor >= self.char_len() {
            return;
        }
        let at = self.byte_at(self.cursor);
        self.buf.remove(at);
    }

    pub(super) fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub(super) fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_len());
    }

    pub(super) fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub(super) fn move_end(&mut self) {
        self.cursor = self.char_len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(s: &str) -> Input {
        let mut input = Input::default();
        for c in s.chars() {
            input.insert_char(c);
        }
        input
    }

    #[test]
    fn editing_handles_multibyte_chars() {
        let mut input = typed("Zoë💖");
        assert_eq!(input.cursor, 4);

        input.backspace();
        assert_eq!(input.buf, "Zoë");

        input.move_left();
        input.insert_char('e');
        assert_eq!(input.buf, "Zoeë");

        input.delete();
        assert_eq!(input.buf, "Zoe");
        input.delete();
        assert_eq!(input.buf, "Zoe");
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut input = typed("ab");
        input.move_right();
        assert_eq!(input.cursor, 2);
        input.move_home();
        input.backspace();
        assert_eq!(input.buf, "ab");
        input.move_end();
        assert_eq!(input.cursor, 2);

        assert!(!input.is_blank());
        input.clear();
        assert!(input.is_blank());
    }
}
