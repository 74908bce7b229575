use crate::{
    buffer::{Buffer, Row},
    cursor::{Cursor, Position},
};

/// 描画用の読み取り専用ビュー
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    rows: &'a [Row],
    cursor: Position,
    word_count: usize,
    dirty: bool,
}

impl<'a> Snapshot<'a> {
    pub fn line(&self, index: usize) -> Option<&'a str> {
        self.rows.get(index).map(Row::chars)
    }

    pub fn line_count(&self) -> usize {
        self.rows.len()
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

/// 編集エンジン
///
/// バッファとカーソルを所有し、プリミティブな編集操作を提供する。
/// 描画やモードについては何も知らない
#[derive(Debug, Default)]
pub struct Editor {
    buffer: Buffer,
    cursor: Cursor,
    /// 未保存の変更があるか
    dirty: bool,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_buffer(buffer: Buffer) -> Self {
        Self {
            buffer,
            cursor: Cursor::new(),
            dirty: false,
        }
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn cursor(&self) -> Position {
        self.cursor.position()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// 保存後に呼ぶ
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn line_count(&self) -> usize {
        self.buffer.len()
    }

    pub fn word_count(&self) -> usize {
        self.buffer.word_count()
    }

    pub fn content(&self) -> String {
        self.buffer.content()
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            rows: self.buffer.rows(),
            cursor: self.cursor.position(),
            word_count: self.buffer.word_count(),
            dirty: self.dirty,
        }
    }

    pub fn move_up(&mut self) {
        self.cursor.move_up(&self.buffer);
    }

    pub fn move_down(&mut self) {
        self.cursor.move_down(&self.buffer);
    }

    pub fn move_left(&mut self) {
        self.cursor.move_left();
    }

    pub fn move_right(&mut self) {
        self.cursor.move_right(&self.buffer);
    }

    pub fn move_home(&mut self) {
        self.cursor.move_home();
    }

    pub fn move_end(&mut self) {
        self.cursor.move_end(&self.buffer);
    }

    /// カーソル位置に文字を挿入
    pub fn insert_char(&mut self, ch: char) {
        let pos = self.cursor.position();
        if let Some(row) = self.buffer.row_mut(pos.row) {
            row.insert_char(pos.col, ch);
            self.cursor.set(Position::new(pos.row, pos.col + 1), &self.buffer);
            self.dirty = true;
        }
    }

    /// カーソル位置で行を分割する (Enter)
    pub fn split_line(&mut self) {
        let pos = self.cursor.position();
        let Some(row) = self.buffer.row_mut(pos.row) else {
            return;
        };
        let after = row.split_off(pos.col);
        self.buffer.insert_row(pos.row + 1, after);
        self.cursor.set(Position::new(pos.row + 1, 0), &self.buffer);
        self.dirty = true;
    }

    /// カーソル直前の文字を削除する (Backspace)
    ///
    /// 行頭では前の行と結合する。(0, 0) では何もしない
    pub fn delete_before_cursor(&mut self) {
        let pos = self.cursor.position();
        if pos.col > 0 {
            if let Some(row) = self.buffer.row_mut(pos.row) {
                row.delete_char(pos.col - 1);
                self.cursor.set(Position::new(pos.row, pos.col - 1), &self.buffer);
                self.dirty = true;
            }
        } else if pos.row > 0 {
            let join_col = self.buffer.line_len(pos.row - 1);
            if self.buffer.join_rows(pos.row - 1) {
                self.cursor.set(Position::new(pos.row - 1, join_col), &self.buffer);
                self.dirty = true;
            }
        }
    }

    /// カーソル位置の文字を削除する (Delete)
    ///
    /// 行末では次の行を結合する
    pub fn delete_at_cursor(&mut self) {
        let pos = self.cursor.position();
        if pos.col < self.buffer.line_len(pos.row) {
            if let Some(row) = self.buffer.row_mut(pos.row) {
                row.delete_char(pos.col);
                self.dirty = true;
            }
        } else if self.buffer.join_rows(pos.row) {
            self.dirty = true;
        }
    }
}
