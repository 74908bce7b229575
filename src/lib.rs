pub mod buffer;
pub mod command;
pub mod controller;
pub mod cursor;
pub mod editor;
pub mod error;
pub mod file_io;
pub mod key;
pub mod logger;
pub mod mode;
pub mod screen;
pub mod terminal;

// 画面レイアウト定数
pub const STATUS_BAR_HEIGHT: u16 = 1;

/// ファイル名未指定で保存するときの既定名
pub const DEFAULT_FILE_NAME: &str = "untitled.txt";
