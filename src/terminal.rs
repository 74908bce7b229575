use std::io::{self, Stdout, Write};

use termion::raw::{IntoRawMode, RawTerminal};

/// raw mode の端末
///
/// drop 時に画面をクリアしてカーソルを戻す。raw mode の解除は RawTerminal の drop が行う
pub struct Terminal {
    stdout: RawTerminal<Stdout>,
}

impl Terminal {
    pub fn new() -> io::Result<Self> {
        let stdout = io::stdout().into_raw_mode()?;
        let mut terminal = Self { stdout };
        terminal.clear_screen()?;
        Ok(terminal)
    }

    pub fn stdout(&mut self) -> &mut RawTerminal<Stdout> {
        &mut self.stdout
    }

    /// 端末サイズ (cols, rows)
    ///
    /// リサイズに追従するため毎回問い合わせる
    pub fn size(&self) -> io::Result<(u16, u16)> {
        termion::terminal_size()
    }

    pub fn clear_screen(&mut self) -> io::Result<()> {
        write!(
            self.stdout,
            "{}{}{}",
            termion::style::Reset,
            termion::clear::All,
            termion::cursor::Goto(1, 1)
        )?;
        self.stdout.flush()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        // 終了時の画面クリア
        let _ = self.clear_screen();
        let _ = write!(self.stdout, "{}", termion::cursor::Show);
        let _ = self.stdout.flush();
    }
}
