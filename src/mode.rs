use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// 既定のモード。`:` でコマンド入力に入る
    Editing,
    /// すべての文字をテキストとして挿入する
    Inserting,
    /// `:` の後のコマンド入力中
    Command,
    /// 終了前の保存確認 (y/n)
    SaveConfirm,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Editing => "EDIT",
            Mode::Inserting => "INSERT",
            Mode::Command => "COMMAND",
            Mode::SaveConfirm => "SAVE?",
        };
        f.write_str(name)
    }
}

/// 現在のモードと入力途中のコマンドを管理する
///
/// コマンドバッファはコマンドモードに入るとき・出るときに必ず空になる
#[derive(Debug)]
pub struct ModeManager {
    current: Mode,
    command_buffer: String,
}

impl Default for ModeManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeManager {
    pub fn new() -> Self {
        Self {
            current: Mode::Editing,
            command_buffer: String::new(),
        }
    }

    pub fn current(&self) -> Mode {
        self.current
    }

    pub fn command_buffer(&self) -> &str {
        &self.command_buffer
    }

    pub fn enter_editing(&mut self) {
        self.command_buffer.clear();
        self.current = Mode::Editing;
    }

    pub fn enter_inserting(&mut self) {
        self.command_buffer.clear();
        self.current = Mode::Inserting;
    }

    pub fn enter_command(&mut self) {
        self.command_buffer.clear();
        self.current = Mode::Command;
    }

    pub fn enter_save_confirm(&mut self) {
        self.command_buffer.clear();
        self.current = Mode::SaveConfirm;
    }

    pub fn push_command_char(&mut self, ch: char) {
        if self.current == Mode::Command {
            self.command_buffer.push(ch);
        }
    }

    pub fn pop_command_char(&mut self) {
        self.command_buffer.pop();
    }

    /// 入力済みのコマンドを取り出してエディットモードに戻る
    pub fn take_command(&mut self) -> String {
        let command = std::mem::take(&mut self.command_buffer);
        self.current = Mode::Editing;
        command
    }
}
