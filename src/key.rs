use std::io::{self, Read};

use termion::event::Key;
use termion::input::{Keys, TermRead};

/// デコード済みのキー入力
///
/// これより上の層は termion の Key を見ない
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    Enter,
    Backspace,
    Delete,
    Escape,
    /// Ctrl+C
    Interrupt,
    /// Tab も '\t' としてここに入る
    Char(char),
}

impl KeyEvent {
    /// 扱わないキーは None
    pub fn from_key(key: Key) -> Option<Self> {
        let event = match key {
            Key::Up => KeyEvent::Up,
            Key::Down => KeyEvent::Down,
            Key::Left => KeyEvent::Left,
            Key::Right => KeyEvent::Right,
            Key::Home => KeyEvent::Home,
            Key::End => KeyEvent::End,
            Key::Delete => KeyEvent::Delete,
            // 端末によっては ^H が Backspace
            Key::Backspace | Key::Ctrl('h') => KeyEvent::Backspace,
            Key::Esc => KeyEvent::Escape,
            Key::Ctrl('c') => KeyEvent::Interrupt,
            // raw mode では Enter は '\r' だが termion が '\n' にまとめる
            Key::Char('\n') => KeyEvent::Enter,
            Key::Char(c) => KeyEvent::Char(c),
            _ => return None,
        };
        Some(event)
    }
}

/// キー入力の供給元
pub trait KeySource {
    /// 次のキーを返す。入力が終わったら None
    fn next_key(&mut self) -> io::Result<Option<KeyEvent>>;
}

/// termion の Keys を KeyEvent に変換する
///
/// エスケープシーケンスの続きは termion が同じ reader から読むので、read の境界で分断されても崩れない
pub struct InputKeys<R> {
    keys: Keys<R>,
}

impl<R: Read> InputKeys<R> {
    pub fn new(reader: R) -> Self {
        Self {
            keys: reader.keys(),
        }
    }
}

impl<R: Read> KeySource for InputKeys<R> {
    fn next_key(&mut self) -> io::Result<Option<KeyEvent>> {
        for key in self.keys.by_ref() {
            match key {
                Ok(key) => match KeyEvent::from_key(key) {
                    Some(event) => return Ok(Some(event)),
                    None => log::debug!("ignoring key {:?}", key),
                },
                // 解釈できない入力 (不正な UTF-8 など) は読み捨てる
                Err(e) if matches!(e.kind(), io::ErrorKind::Other | io::ErrorKind::InvalidData) => {
                    log::debug!("ignoring undecodable input: {}", e);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(None)
    }
}
