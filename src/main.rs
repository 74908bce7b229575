mod cli;

use std::io;

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;

use tedit::{
    controller::Controller,
    editor::Editor,
    file_io::FileIO,
    key::InputKeys,
    logger,
    terminal::Terminal,
};

fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();

    if let Some(path) = &args.log {
        logger::init(path, LevelFilter::Debug)
            .with_context(|| format!("failed to open log file {}", path.display()))?;
    }

    let editor = match &args.file {
        Some(path) => Editor::from_buffer(FileIO::open(path)?),
        None => Editor::new(),
    };
    log::info!(
        "starting with {} lines from {:?}",
        editor.line_count(),
        args.file
    );

    let mut controller = Controller::new(editor, FileIO, args.file);
    let mut keys = InputKeys::new(io::stdin());

    // raw mode は Terminal の drop で戻る
    let mut terminal = Terminal::new().context("failed to enter raw mode")?;
    controller.run(&mut keys, &mut terminal)?;

    Ok(())
}
