//! Output formatting: human-readable or JSON, selected by `--format`.

use clap::ValueEnum;
use serde::Serialize;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, one line per record.
    Human,
    /// Pretty-printed JSON, for scripting.
    Json,
}

/// Implemented by every CLI result type; `write_human` is the only
/// required method, `write_json` falls back to `serde_json` directly.
pub trait Output: Serialize {
    fn write_human<W: Write>(&self, writer: W) -> anyhow::Result<()>;

    fn write_json<W: Write>(&self, writer: W) -> anyhow::Result<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

impl OutputFormat {
    pub fn print<T: Output>(&self, data: &T) -> anyhow::Result<()> {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        match self {
            OutputFormat::Human => data.write_human(&mut lock)?,
            OutputFormat::Json => data.write_json(&mut lock)?,
        }
        writeln!(lock)?;
        Ok(())
    }
}
