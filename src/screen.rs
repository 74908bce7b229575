use std::io::{self, Write};
use termion::{clear, color, cursor, style};
use unicode_width::UnicodeWidthChar;

use crate::STATUS_BAR_HEIGHT;
use crate::editor::Snapshot;
use crate::mode::Mode;

/// 1 フレームの描画に必要な状態
#[derive(Debug, Clone, Copy)]
pub struct View<'a> {
    pub snapshot: Snapshot<'a>,
    pub mode: Mode,
    /// 入力途中のコマンド (`:` は含まない)
    pub command: &'a str,
    /// 保存先の表示名
    pub target: &'a str,
    pub message: &'a str,
}

/// 画面先頭に表示するバッファ行
#[derive(Debug, Default)]
pub struct Viewport {
    row_offset: usize,
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row_offset(&self) -> usize {
        self.row_offset
    }

    /// カーソル行が表示範囲に入るようにスクロールする
    pub fn scroll(&mut self, cursor_row: usize, text_rows: usize) {
        if cursor_row < self.row_offset {
            self.row_offset = cursor_row;
        } else if text_rows > 0 && cursor_row >= self.row_offset + text_rows {
            self.row_offset = cursor_row + 1 - text_rows;
        }
    }
}

pub struct Screen;

impl Screen {
    pub fn text_rows(rows: u16) -> usize {
        rows.saturating_sub(STATUS_BAR_HEIGHT) as usize
    }

    /// ステータスラインの本文 (パディング前)
    pub fn status_text(view: &View<'_>) -> String {
        let snapshot = &view.snapshot;
        let pos = snapshot.cursor();
        let dirty = if snapshot.is_dirty() { " [+]" } else { "" };
        let mut status = format!(
            " {} lines | {} words | Ln {}, Col {} | {}{}",
            snapshot.line_count(),
            snapshot.word_count(),
            pos.row + 1,
            pos.col + 1,
            view.mode,
            dirty,
        );

        match view.mode {
            Mode::Command => status.push_str(&format!(" | :{}", view.command)),
            Mode::SaveConfirm => status.push_str(&format!(" | save as {}? y/n", view.target)),
            Mode::Editing | Mode::Inserting => {
                if !view.message.is_empty() {
                    status.push_str(&format!(" | {}", view.message));
                }
            }
        }
        status
    }

    /// 端末幅ちょうどに揃えたステータスライン
    ///
    /// 短ければ空白で埋め、長ければ切り詰める
    pub fn status_line(view: &View<'_>, width: u16) -> String {
        let width = width as usize;
        let mut line = String::new();
        let mut used = 0;
        for ch in Self::status_text(view).chars() {
            let w = ch.width().unwrap_or(0);
            if used + w > width {
                break;
            }
            line.push(ch);
            used += w;
        }
        line.push_str(&" ".repeat(width - used));
        line
    }

    fn draw_line(
        stdout: &mut impl Write,
        text: &str,
        cursor_col: Option<usize>,
        width: usize,
    ) -> io::Result<()> {
        let mut used = 0;
        let mut col = 0;
        let mut complete = true;

        for ch in text.chars() {
            // 制御文字は桁がずれるので空白で表示
            let shown = if ch.is_control() { ' ' } else { ch };
            let w = shown.width().unwrap_or(0);
            if used + w > width {
                complete = false;
                break;
            }
            if cursor_col == Some(col) {
                write!(stdout, "{}{}{}", style::Invert, shown, style::NoInvert)?;
            } else {
                write!(stdout, "{}", shown)?;
            }
            used += w;
            col += 1;
        }

        // 行末にカーソルがある場合は空白を反転表示
        if complete && cursor_col == Some(col) && used < width {
            write!(stdout, "{} {}", style::Invert, style::NoInvert)?;
        }
        Ok(())
    }

    pub fn draw_rows(
        stdout: &mut impl Write,
        view: &View<'_>,
        row_offset: usize,
        width: u16,
        height: u16,
    ) -> io::Result<()> {
        let text_rows = Self::text_rows(height);
        let cursor_pos = view.snapshot.cursor();

        for i in 0..text_rows {
            let file_row = row_offset + i;
            write!(stdout, "{}", cursor::Goto(1, i as u16 + 1))?;

            match view.snapshot.line(file_row) {
                Some(text) => {
                    let cursor_col = (file_row == cursor_pos.row).then_some(cursor_pos.col);
                    Self::draw_line(stdout, text, cursor_col, width as usize)?;
                }
                // バッファの終端を超えたら ~ を表示
                None => write!(stdout, "~")?,
            }
            write!(stdout, "{}", clear::UntilNewline)?;
        }
        Ok(())
    }

    pub fn draw_status_bar(
        stdout: &mut impl Write,
        view: &View<'_>,
        width: u16,
        height: u16,
    ) -> io::Result<()> {
        write!(
            stdout,
            "{}{}{}{}{}",
            cursor::Goto(1, height.max(1)),
            color::Bg(color::Blue),
            color::Fg(color::White),
            Self::status_line(view, width),
            style::Reset,
        )
    }

    /// 画面全体を描き直す
    pub fn render(
        stdout: &mut impl Write,
        view: &View<'_>,
        row_offset: usize,
        width: u16,
        height: u16,
    ) -> io::Result<()> {
        // 端末のカーソルは隠し、反転表示で位置を示す
        write!(stdout, "{}{}", cursor::Hide, cursor::Goto(1, 1))?;

        Self::draw_rows(stdout, view, row_offset, width, height)?;
        Self::draw_status_bar(stdout, view, width, height)?;

        stdout.flush()
    }
}
