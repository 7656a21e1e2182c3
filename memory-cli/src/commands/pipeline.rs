use crate::config::StorageHandle;
use crate::output::{Output, OutputFormat};
use clap::Subcommand;
use memory_core::pipeline::CancellationToken;
use memory_core::MemorySystem;
use serde::Serialize;
use std::io::Write;

#[derive(Subcommand)]
pub enum PipelineCommands {
    /// Run one consolidation/attention cycle
    Run,
}

#[derive(Serialize)]
struct PipelineReportView {
    cancelled: bool,
    unprocessed_events: Option<usize>,
    surprise_boundaries: Option<usize>,
    consolidated_items: Option<usize>,
    saliency_scores: Option<usize>,
    auto_focused: Option<usize>,
}

impl Output for PipelineReportView {
    fn write_human<W: Write>(&self, mut writer: W) -> anyhow::Result<()> {
        writeln!(writer, "cancelled: {}", self.cancelled)?;
        writeln!(writer, "unprocessed events seen: {:?}", self.unprocessed_events)?;
        writeln!(writer, "surprise boundaries found: {:?}", self.surprise_boundaries)?;
        writeln!(writer, "items consolidated: {:?}", self.consolidated_items)?;
        writeln!(writer, "records scored for saliency: {:?}", self.saliency_scores)?;
        writeln!(writer, "focuses auto-set: {:?}", self.auto_focused)?;
        Ok(())
    }
}

pub async fn run(command: PipelineCommands, handle: &StorageHandle, format: OutputFormat) -> anyhow::Result<()> {
    let system = MemorySystem::new(&handle.store, &handle.embedder, handle.config.memory.clone());

    match command {
        PipelineCommands::Run => {
            let token = CancellationToken::new();
            let report = system.run_pipeline(&handle.config.default_project, &token).await?;
            format.print(&PipelineReportView {
                cancelled: report.cancelled,
                unprocessed_events: report.unprocessed_events,
                surprise_boundaries: report.surprise_boundaries.map(|b| b.len()),
                consolidated_items: report.consolidated_items,
                saliency_scores: report.saliency_scores.map(|s| s.len()),
                auto_focused: report.auto_focused,
            })
        }
    }
}
