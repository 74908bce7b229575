use std::io::Write;
use std::path::{Path, PathBuf};

use crate::{
    DEFAULT_FILE_NAME,
    command::Command,
    editor::Editor,
    error::Result,
    file_io::Storage,
    key::{KeyEvent, KeySource},
    mode::{Mode, ModeManager},
    screen::{Screen, View, Viewport},
    terminal::Terminal,
};

/// キー処理後にループを続けるか
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// モードの状態機械
///
/// キー入力を解釈して編集エンジンに振り分ける
pub struct Controller<S> {
    editor: Editor,
    modes: ModeManager,
    viewport: Viewport,
    storage: S,
    /// 保存先。未指定なら DEFAULT_FILE_NAME
    target: Option<PathBuf>,
    status_message: String,
}

impl<S: Storage> Controller<S> {
    pub fn new(editor: Editor, storage: S, target: Option<PathBuf>) -> Self {
        Self {
            editor,
            modes: ModeManager::new(),
            viewport: Viewport::new(),
            storage,
            target,
            status_message: String::new(),
        }
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn mode(&self) -> Mode {
        self.modes.current()
    }

    pub fn command_buffer(&self) -> &str {
        self.modes.command_buffer()
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn target(&self) -> Option<&Path> {
        self.target.as_deref()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn target_path(&self) -> PathBuf {
        self.target
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FILE_NAME))
    }

    /// 1 キー分の処理
    pub fn handle_key(&mut self, key: KeyEvent) -> Flow {
        let before = self.modes.current();
        let flow = match before {
            Mode::Editing => self.handle_editing(key),
            Mode::Inserting => self.handle_inserting(key),
            Mode::Command => self.handle_command(key),
            Mode::SaveConfirm => self.handle_save_confirm(key),
        };

        let after = self.modes.current();
        if before != after {
            log::debug!("mode {} -> {}", before, after);
        }
        flow
    }

    fn handle_editing(&mut self, key: KeyEvent) -> Flow {
        match key {
            KeyEvent::Char(':') => self.modes.enter_command(),
            KeyEvent::Char(ch) => {
                self.insert(ch);
                self.modes.enter_inserting();
            }
            KeyEvent::Interrupt => self.modes.enter_save_confirm(),
            KeyEvent::Escape => self.modes.enter_editing(),
            other => self.edit(other),
        }
        Flow::Continue
    }

    fn handle_inserting(&mut self, key: KeyEvent) -> Flow {
        match key {
            KeyEvent::Char(ch) => self.insert(ch),
            KeyEvent::Interrupt => self.modes.enter_save_confirm(),
            KeyEvent::Escape => self.modes.enter_editing(),
            other => self.edit(other),
        }
        Flow::Continue
    }

    fn insert(&mut self, ch: char) {
        self.status_message.clear();
        self.editor.insert_char(ch);
    }

    // Editing / Inserting で共通の移動・編集キー
    fn edit(&mut self, key: KeyEvent) {
        // 編集したらメッセージは消す
        self.status_message.clear();
        match key {
            KeyEvent::Up => self.editor.move_up(),
            KeyEvent::Down => self.editor.move_down(),
            KeyEvent::Left => self.editor.move_left(),
            KeyEvent::Right => self.editor.move_right(),
            KeyEvent::Home => self.editor.move_home(),
            KeyEvent::End => self.editor.move_end(),
            KeyEvent::Enter => self.editor.split_line(),
            KeyEvent::Backspace => self.editor.delete_before_cursor(),
            KeyEvent::Delete => self.editor.delete_at_cursor(),
            KeyEvent::Char(_) | KeyEvent::Escape | KeyEvent::Interrupt => {}
        }
    }

    fn handle_command(&mut self, key: KeyEvent) -> Flow {
        match key {
            KeyEvent::Enter => {
                let input = self.modes.take_command();
                return self.execute(&input);
            }
            KeyEvent::Char(ch) => self.modes.push_command_char(ch),
            KeyEvent::Backspace => self.modes.pop_command_char(),
            KeyEvent::Escape | KeyEvent::Interrupt => self.modes.enter_editing(),
            _ => {}
        }
        Flow::Continue
    }

    fn handle_save_confirm(&mut self, key: KeyEvent) -> Flow {
        match key {
            KeyEvent::Char('y' | 'Y') => {
                if self.save(None) {
                    return Flow::Quit;
                }
                self.modes.enter_editing();
            }
            KeyEvent::Char('n' | 'N') | KeyEvent::Interrupt => return Flow::Quit,
            KeyEvent::Escape => self.modes.enter_editing(),
            _ => {}
        }
        Flow::Continue
    }

    /// コマンドを実行する。未知のコマンドは黙って捨てる
    fn execute(&mut self, input: &str) -> Flow {
        let Some(command) = Command::parse(input) else {
            log::debug!("ignoring unknown command {:?}", input);
            return Flow::Continue;
        };
        log::debug!("command {:?}", command);

        match command {
            Command::Save(path) => {
                self.save(path);
                Flow::Continue
            }
            Command::Quit => Flow::Quit,
            Command::SaveAndQuit(path) => {
                if self.save(path) {
                    Flow::Quit
                } else {
                    Flow::Continue
                }
            }
        }
    }

    /// 保存して結果をステータスラインに出す
    ///
    /// 失敗しても終了はしない
    fn save(&mut self, path: Option<PathBuf>) -> bool {
        if let Some(path) = path {
            self.target = Some(path);
        }
        let path = self.target_path();
        let content = self.editor.content();

        match self.storage.save(&path, &content) {
            Ok(()) => {
                self.editor.mark_clean();
                log::info!(
                    "saved {} ({} lines, {} bytes)",
                    path.display(),
                    self.editor.line_count(),
                    content.len()
                );
                self.status_message = format!(
                    "\"{}\" written, {} lines",
                    path.display(),
                    self.editor.line_count()
                );
                true
            }
            Err(e) => {
                log::warn!("save failed: {}", e);
                self.status_message = format!("save failed: {}", e);
                false
            }
        }
    }

    /// 現在の状態で画面を描き直す
    pub fn render(&mut self, stdout: &mut impl Write, width: u16, height: u16) -> Result<()> {
        let cursor = self.editor.cursor();
        self.viewport.scroll(cursor.row, Screen::text_rows(height));

        let target = self.target_path();
        let target = target.display().to_string();
        let view = View {
            snapshot: self.editor.snapshot(),
            mode: self.modes.current(),
            command: self.modes.command_buffer(),
            target: &target,
            message: &self.status_message,
        };
        Screen::render(stdout, &view, self.viewport.row_offset(), width, height)?;
        Ok(())
    }

    /// キー入力 → 処理 → 再描画 のループ
    pub fn run<K: KeySource>(&mut self, keys: &mut K, terminal: &mut Terminal) -> Result<()> {
        let (width, height) = terminal.size()?;
        self.render(terminal.stdout(), width, height)?;

        while let Some(key) = keys.next_key()? {
            if self.handle_key(key) == Flow::Quit {
                log::debug!("quit");
                break;
            }
            let (width, height) = terminal.size()?;
            self.render(terminal.stdout(), width, height)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Buffer;
    use crate::cursor::Position;
    use crate::error::Error;
    use std::io;

    /// 書き込み内容を記録するだけの Storage
    #[derive(Default)]
    struct MemoryStorage {
        saved: Vec<(PathBuf, String)>,
        fail: bool,
    }

    impl Storage for MemoryStorage {
        fn save(&mut self, path: &Path, content: &str) -> Result<()> {
            if self.fail {
                return Err(Error::Write {
                    path: path.to_path_buf(),
                    source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
                });
            }
            self.saved.push((path.to_path_buf(), content.to_string()));
            Ok(())
        }
    }

    fn controller(lines: &[&str], target: Option<&str>) -> Controller<MemoryStorage> {
        Controller::new(
            Editor::from_buffer(Buffer::from_lines(lines.iter().copied())),
            MemoryStorage::default(),
            target.map(PathBuf::from),
        )
    }

    fn press(controller: &mut Controller<MemoryStorage>, keys: &[KeyEvent]) -> Flow {
        let mut flow = Flow::Continue;
        for key in keys {
            flow = controller.handle_key(*key);
        }
        flow
    }

    fn type_str(controller: &mut Controller<MemoryStorage>, text: &str) -> Flow {
        let keys: Vec<KeyEvent> = text.chars().map(KeyEvent::Char).collect();
        press(controller, &keys)
    }

    fn lines(controller: &Controller<MemoryStorage>) -> Vec<&str> {
        controller
            .editor()
            .buffer()
            .rows()
            .iter()
            .map(|r| r.chars())
            .collect()
    }

    #[test]
    fn test_typing_enters_inserting() {
        let mut c = controller(&[""], None);
        type_str(&mut c, "hi");
        press(&mut c, &[KeyEvent::Enter]);
        type_str(&mut c, "there");

        assert_eq!(lines(&c), vec!["hi", "there"]);
        assert_eq!(c.editor().cursor(), Position::new(1, 5));
        assert_eq!(c.mode(), Mode::Inserting);
    }

    #[test]
    fn test_colon_is_text_while_inserting() {
        let mut c = controller(&[""], None);
        type_str(&mut c, "a:b");

        assert_eq!(lines(&c), vec!["a:b"]);
        assert_eq!(c.mode(), Mode::Inserting);

        press(&mut c, &[KeyEvent::Escape]);
        assert_eq!(c.mode(), Mode::Editing);
    }

    #[test]
    fn test_backspace_scenario() {
        let mut c = controller(&["abc"], None);
        press(&mut c, &[KeyEvent::End]);
        press(&mut c, &[KeyEvent::Backspace; 3]);

        assert_eq!(lines(&c), vec![""]);
        assert_eq!(c.editor().cursor(), Position::new(0, 0));

        press(&mut c, &[KeyEvent::Backspace]);
        assert_eq!(lines(&c), vec![""]);
        assert_eq!(c.mode(), Mode::Editing);
    }

    #[test]
    fn test_save_command_writes_content() {
        let mut c = controller(&["a", "b"], Some("notes.txt"));
        press(&mut c, &[KeyEvent::Char(':')]);
        assert_eq!(c.mode(), Mode::Command);

        type_str(&mut c, "save");
        assert_eq!(c.command_buffer(), "save");

        let flow = press(&mut c, &[KeyEvent::Enter]);

        assert_eq!(flow, Flow::Continue);
        assert_eq!(c.mode(), Mode::Editing);
        assert_eq!(c.command_buffer(), "");
        assert_eq!(
            c.storage().saved,
            vec![(PathBuf::from("notes.txt"), "a\nb".to_string())]
        );
        assert!(!c.editor().is_dirty());
        assert!(c.status_message().contains("notes.txt"));
    }

    #[test]
    fn test_save_with_path_changes_target() {
        let mut c = controller(&["x"], None);
        press(&mut c, &[KeyEvent::Char(':')]);
        type_str(&mut c, "w out.txt");
        press(&mut c, &[KeyEvent::Enter]);

        assert_eq!(c.target(), Some(Path::new("out.txt")));
        assert_eq!(c.storage().saved[0].0, PathBuf::from("out.txt"));
    }

    #[test]
    fn test_save_without_target_uses_default_name() {
        let mut c = controller(&["x"], None);
        press(&mut c, &[KeyEvent::Char(':')]);
        type_str(&mut c, "w");
        press(&mut c, &[KeyEvent::Enter]);

        assert_eq!(c.storage().saved[0].0, PathBuf::from(DEFAULT_FILE_NAME));
    }

    #[test]
    fn test_save_failure_is_reported_and_editing_continues() {
        let mut c = controller(&["a"], Some("notes.txt"));
        c.storage.fail = true;
        press(&mut c, &[KeyEvent::Char(':')]);
        type_str(&mut c, "wq");
        let flow = press(&mut c, &[KeyEvent::Enter]);

        assert_eq!(flow, Flow::Continue);
        assert_eq!(c.mode(), Mode::Editing);
        assert!(c.status_message().starts_with("save failed"));
    }

    #[test]
    fn test_quit_command() {
        let mut c = controller(&[""], None);
        press(&mut c, &[KeyEvent::Char(':')]);
        type_str(&mut c, "quit");
        assert_eq!(press(&mut c, &[KeyEvent::Enter]), Flow::Quit);
        assert!(c.storage().saved.is_empty());
    }

    #[test]
    fn test_unknown_command_is_discarded() {
        let mut c = controller(&["a"], None);
        press(&mut c, &[KeyEvent::Char(':')]);
        type_str(&mut c, "frobnicate");
        let flow = press(&mut c, &[KeyEvent::Enter]);

        assert_eq!(flow, Flow::Continue);
        assert_eq!(c.mode(), Mode::Editing);
        assert_eq!(c.command_buffer(), "");
        assert_eq!(lines(&c), vec!["a"]);
        assert_eq!(c.status_message(), "");
    }

    #[test]
    fn test_escape_cancels_command() {
        let mut c = controller(&[""], None);
        press(&mut c, &[KeyEvent::Char(':')]);
        type_str(&mut c, "q");
        press(&mut c, &[KeyEvent::Escape]);

        assert_eq!(c.mode(), Mode::Editing);
        assert_eq!(c.command_buffer(), "");

        // キャンセル後の ':' は再びコマンド入力になる
        press(&mut c, &[KeyEvent::Char(':')]);
        assert_eq!(c.mode(), Mode::Command);
        assert_eq!(c.command_buffer(), "");
    }

    #[test]
    fn test_interrupt_cancels_command() {
        let mut c = controller(&["a"], None);
        press(&mut c, &[KeyEvent::Char(':')]);
        type_str(&mut c, "wq");
        let flow = press(&mut c, &[KeyEvent::Interrupt]);

        assert_eq!(flow, Flow::Continue);
        assert_eq!(c.mode(), Mode::Editing);
        assert_eq!(c.command_buffer(), "");
        assert!(c.storage().saved.is_empty());
    }

    #[test]
    fn test_typing_clears_status_message() {
        let mut c = controller(&["a"], Some("notes.txt"));
        press(&mut c, &[KeyEvent::Char(':')]);
        type_str(&mut c, "w");
        press(&mut c, &[KeyEvent::Enter]);
        assert!(!c.status_message().is_empty());

        type_str(&mut c, "b");
        assert_eq!(c.status_message(), "");
        assert_eq!(lines(&c), vec!["ba"]);
    }

    #[test]
    fn test_tab_is_inserted_as_text() {
        let mut c = controller(&[""], None);
        press(&mut c, &[KeyEvent::Char('\t'), KeyEvent::Char('x')]);

        assert_eq!(lines(&c), vec!["\tx"]);
        assert_eq!(c.editor().content(), "\tx");
    }

    #[test]
    fn test_command_keys_do_not_touch_buffer() {
        let mut c = controller(&["abc"], None);
        press(&mut c, &[KeyEvent::Char(':'), KeyEvent::Left, KeyEvent::Backspace]);

        assert_eq!(lines(&c), vec!["abc"]);
        assert_eq!(c.editor().cursor(), Position::new(0, 0));
    }

    #[test]
    fn test_interrupt_then_confirm_saves_and_quits() {
        let mut c = controller(&["a", "b"], Some("notes.txt"));
        press(&mut c, &[KeyEvent::Interrupt]);
        assert_eq!(c.mode(), Mode::SaveConfirm);

        // y/n 以外は無視
        assert_eq!(press(&mut c, &[KeyEvent::Char('z')]), Flow::Continue);
        assert_eq!(c.mode(), Mode::SaveConfirm);

        assert_eq!(press(&mut c, &[KeyEvent::Char('y')]), Flow::Quit);
        assert_eq!(c.storage().saved[0].1, "a\nb");
    }

    #[test]
    fn test_interrupt_twice_quits_without_saving() {
        let mut c = controller(&["a"], None);
        type_str(&mut c, "x");
        let flow = press(&mut c, &[KeyEvent::Interrupt, KeyEvent::Interrupt]);

        assert_eq!(flow, Flow::Quit);
        assert!(c.storage().saved.is_empty());
    }

    #[test]
    fn test_decline_save_quits() {
        let mut c = controller(&["a"], None);
        let flow = press(&mut c, &[KeyEvent::Interrupt, KeyEvent::Char('n')]);

        assert_eq!(flow, Flow::Quit);
        assert!(c.storage().saved.is_empty());
    }

    #[test]
    fn test_escape_leaves_save_confirm() {
        let mut c = controller(&["a"], None);
        press(&mut c, &[KeyEvent::Interrupt, KeyEvent::Escape]);

        assert_eq!(c.mode(), Mode::Editing);
    }

    #[test]
    fn test_confirm_with_failing_storage_returns_to_editing() {
        let mut c = controller(&["a"], Some("notes.txt"));
        c.storage.fail = true;
        let flow = press(&mut c, &[KeyEvent::Interrupt, KeyEvent::Char('y')]);

        assert_eq!(flow, Flow::Continue);
        assert_eq!(c.mode(), Mode::Editing);
        assert!(c.status_message().contains("notes.txt"));
    }

    #[test]
    fn test_render_scrolls_to_cursor() {
        let rows: Vec<String> = (0..10).map(|i| format!("line{}", i)).collect();
        let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
        let mut c = controller(&refs, None);
        press(&mut c, &[KeyEvent::Down; 9]);
        // 行頭だと反転表示で "line9" が分断される
        press(&mut c, &[KeyEvent::End]);

        let mut out = Vec::new();
        c.render(&mut out, 40, 5).unwrap();
        let out = String::from_utf8(out).unwrap();

        // 4 行表示なので line6..line9
        assert!(out.contains("line9"));
        assert!(out.contains("line6"));
        assert!(!out.contains("line5"));
    }

    #[test]
    fn test_render_shows_save_prompt() {
        let mut c = controller(&["a"], Some("notes.txt"));
        press(&mut c, &[KeyEvent::Interrupt]);

        let mut out = Vec::new();
        c.render(&mut out, 80, 5).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(out.contains("save as notes.txt? y/n"));
    }
}
