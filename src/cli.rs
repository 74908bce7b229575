use std::path::PathBuf;

use clap::Parser;

/// 端末用の小さなモーダルテキストエディタ
#[derive(Debug, Parser)]
#[command(name = "tedit", version)]
pub struct Args {
    /// 編集するファイル。存在しなければ最初の保存で作られる
    pub file: Option<PathBuf>,

    /// デバッグログの出力先
    #[arg(long = "log", value_name = "PATH")]
    pub log: Option<PathBuf>,
}
