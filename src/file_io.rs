use std::{
    fs::File,
    io::{self, Write},
    path::Path,
};

use crate::{
    buffer::Buffer,
    error::{Error, Result},
};

/// 保存先
///
/// 内容は行を改行で連結したもので、末尾改行は付け足さない
pub trait Storage {
    fn save(&mut self, path: &Path, content: &str) -> Result<()>;
}

pub struct FileIO;

impl FileIO {
    /// ファイルを読み込む
    ///
    /// `\n` で分割するので末尾改行は空行として残り、保存時にそのまま戻る。
    /// ファイルが存在しない場合は空のバッファを返す
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Buffer> {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Buffer::new()),
            Err(source) => {
                return Err(Error::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let lines = content
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string());
        Ok(Buffer::from_lines(lines))
    }
}

impl Storage for FileIO {
    fn save(&mut self, path: &Path, content: &str) -> Result<()> {
        let write = || -> io::Result<()> {
            let mut file = File::create(path)?;
            file.write_all(content.as_bytes())?;
            file.flush()
        };
        write().map_err(|source| Error::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}
