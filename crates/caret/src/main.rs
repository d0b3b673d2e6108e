use std::cell::RefCell;
use std::io::Write;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use caret_config::CaretConfig;
use caret_core::{
    Cursor, Line, Metrics, RangeSelection, SharedBuffer, TextBuffer, UniformDetector,
};
use clap::Parser;

/// Resolves caret positions in a text file: clicks to rows/columns and
/// rows/columns to pixels.
#[derive(Parser, Debug)]
#[command(name = "caret", version, about)]
struct Cli {
    /// Text file to load.
    file: PathBuf,

    /// Config file to use instead of `caret.json` next to the executable.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured row height in pixels.
    #[arg(long)]
    row_height: Option<f32>,

    /// Resolve a click at pixel X Y. Repeatable; all clicks are answered
    /// before any `--at` query.
    #[arg(long, num_args = 2, value_names = ["X", "Y"], allow_negative_numbers = true)]
    click: Vec<f32>,

    /// Print the pixel position of ROW COL. Repeatable; answered after every
    /// `--click`.
    #[arg(long, num_args = 2, value_names = ["ROW", "COL"])]
    at: Vec<usize>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.clone().unwrap_or_else(CaretConfig::config_path);
    let mut config = CaretConfig::load_or_create(&config_path);
    if let Some(row_height) = cli.row_height {
        config.row_height = row_height;
        config.sanitize();
    }

    let text = std::fs::read_to_string(&cli.file)
        .with_context(|| format!("failed to read {}", cli.file.display()))?;
    tracing::info!("Loaded {} ({} bytes)", cli.file.display(), text.len());

    let stdout = std::io::stdout();
    run(&cli, &config, &text, &mut stdout.lock())
}

/// Builds a caret over `text` and answers every query in `cli`: clicks
/// first, then positions, each group in command-line order.
fn run(cli: &Cli, config: &CaretConfig, text: &str, out: &mut impl Write) -> Result<()> {
    let buffer = SharedBuffer::new(TextBuffer::from(text));
    let selection = Rc::new(RefCell::new(RangeSelection::new(buffer.clone())));
    let mut cursor = Cursor::new(
        Metrics::new(config.row_height, config.boundary_bias),
        Rc::new(buffer.clone()),
        Rc::new(UniformDetector::new(config.char_width)),
        selection,
    );

    for click in cli.click.chunks_exact(2) {
        let (x, y) = (click[0], click[1]);
        cursor.set_physical_position(x, y);
        let row = cursor.logical_row();
        if row >= buffer.row_count() {
            // Below the last row: stick to the last row, like a text widget does.
            cursor.move_to_row_end();
            cursor.set_physical_column(x);
        }
        writeln!(
            out,
            "click ({x}, {y}) -> row {} col {} at ({}, {})",
            cursor.logical_row(),
            cursor.logical_column(),
            cursor.physical_column(),
            cursor.physical_row()
        )?;
    }

    for at in cli.at.chunks_exact(2) {
        let (row, column) = (at[0], at[1]);
        let rows = buffer.row_count();
        if row >= rows {
            anyhow::bail!("row {row} out of range (file has {rows} rows)");
        }
        let len = buffer.content(row).chars().count();
        if column > len {
            anyhow::bail!("column {column} out of range (row {row} has {len} chars)");
        }
        cursor.set_logical_row(row);
        cursor.set_logical_column(column);
        writeln!(
            out,
            "row {row} col {column} -> ({}, {})",
            cursor.physical_column(),
            cursor.physical_row()
        )?;
    }

    Ok(())
}
