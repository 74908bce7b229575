use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    chars: String,
}

impl Row {
    pub fn new(text: String) -> Self {
        Self { chars: text }
    }

    pub fn chars(&self) -> &str {
        &self.chars
    }

    /// 文字数 (バイト数ではない)
    pub fn len(&self) -> usize {
        self.chars.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// 文字インデックスをバイトオフセットに変換する
    ///
    /// 行末を超える場合は行末のオフセットを返す
    fn byte_index(&self, col: usize) -> usize {
        self.chars
            .char_indices()
            .nth(col)
            .map(|(i, _)| i)
            .unwrap_or(self.chars.len())
    }

    pub fn insert_char(&mut self, col: usize, ch: char) {
        let at = self.byte_index(col);
        self.chars.insert(at, ch);
    }

    /// 指定位置の文字を削除し、削除した文字を返す
    pub fn delete_char(&mut self, col: usize) -> Option<char> {
        if col >= self.len() {
            return None;
        }
        let at = self.byte_index(col);
        Some(self.chars.remove(at))
    }

    /// col で行を分割し、後半を返す
    pub fn split_off(&mut self, col: usize) -> String {
        let at = self.byte_index(col);
        self.chars.split_off(at)
    }

    pub fn append(&mut self, text: &str) {
        self.chars.push_str(text);
    }

    pub fn word_count(&self) -> usize {
        self.chars.unicode_words().count()
    }
}

/// 行バッファ
///
/// 常に 1 行以上を保持する
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    rows: Vec<Row>,
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Buffer {
    pub fn new() -> Self {
        Self {
            rows: vec![Row::default()],
        }
    }

    /// 行のリストから作る。空なら空行 1 行になる
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rows: Vec<Row> = lines.into_iter().map(|l| Row::new(l.into())).collect();
        if rows.is_empty() {
            Self::new()
        } else {
            Self { rows }
        }
    }

    pub fn insert_row(&mut self, at: usize, text: String) {
        if at <= self.rows.len() {
            self.rows.insert(at, Row::new(text));
        }
    }

    /// 行を削除して内容を返す。最後の 1 行は削除しない
    pub fn remove_row(&mut self, at: usize) -> Option<String> {
        if self.rows.len() <= 1 || at >= self.rows.len() {
            return None;
        }
        Some(self.rows.remove(at).chars)
    }

    /// row + 1 行目を row 行目の末尾に結合する
    pub fn join_rows(&mut self, row: usize) -> bool {
        match self.remove_row(row + 1) {
            Some(next) => {
                if let Some(r) = self.rows.get_mut(row) {
                    r.append(&next);
                }
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// 常に false (最低 1 行を保持するため)
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn row_mut(&mut self, index: usize) -> Option<&mut Row> {
        self.rows.get_mut(index)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn line_len(&self, index: usize) -> usize {
        self.row(index).map(Row::len).unwrap_or(0)
    }

    pub fn word_count(&self) -> usize {
        self.rows.iter().map(Row::word_count).sum()
    }

    /// 改行で連結した内容。末尾に改行は付けない
    pub fn content(&self) -> String {
        self.rows
            .iter()
            .map(Row::chars)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
