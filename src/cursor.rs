use crate::buffer::Buffer;

/// バッファ上の位置 (0 始まり、col は文字単位)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// カーソル
///
/// 移動はすべてバッファの範囲内にクランプされ、端では何もしない
#[derive(Debug, Default)]
pub struct Cursor {
    pos: Position,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Position {
        self.pos
    }

    /// 任意の位置へ移動する。範囲外はクランプする
    pub fn set(&mut self, pos: Position, buffer: &Buffer) {
        let row = pos.row.min(buffer.len().saturating_sub(1));
        let col = pos.col.min(buffer.line_len(row));
        self.pos = Position::new(row, col);
    }

    pub fn move_up(&mut self, buffer: &Buffer) {
        if self.pos.row > 0 {
            self.pos.row -= 1;
            self.clamp_col(buffer);
        }
    }

    pub fn move_down(&mut self, buffer: &Buffer) {
        if self.pos.row + 1 < buffer.len() {
            self.pos.row += 1;
            self.clamp_col(buffer);
        }
    }

    pub fn move_left(&mut self) {
        if self.pos.col > 0 {
            self.pos.col -= 1;
        }
    }

    pub fn move_right(&mut self, buffer: &Buffer) {
        if self.pos.col < buffer.line_len(self.pos.row) {
            self.pos.col += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.pos.col = 0;
    }

    pub fn move_end(&mut self, buffer: &Buffer) {
        self.pos.col = buffer.line_len(self.pos.row);
    }

    // 行が短くなった場合は行末に寄せる
    fn clamp_col(&mut self, buffer: &Buffer) {
        self.pos.col = self.pos.col.min(buffer.line_len(self.pos.row));
    }
}
