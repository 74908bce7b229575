use std::path::PathBuf;

/// `:` で入力できるコマンド
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `save [path]` / `w [path]`
    Save(Option<PathBuf>),
    /// `quit` / `q` / `q!`
    Quit,
    /// `wq [path]` / `x`
    SaveAndQuit(Option<PathBuf>),
}

impl Command {
    /// 未知のコマンドは None
    pub fn parse(input: &str) -> Option<Self> {
        let mut parts = input.split_whitespace();
        let name = parts.next()?;
        let path = parts.next().map(PathBuf::from);
        if parts.next().is_some() {
            return None;
        }

        match (name, path) {
            ("save" | "w", path) => Some(Command::Save(path)),
            ("quit" | "q" | "q!", None) => Some(Command::Quit),
            ("wq" | "x", path) => Some(Command::SaveAndQuit(path)),
            _ => None,
        }
    }
}
