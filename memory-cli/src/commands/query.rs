use crate::config::StorageHandle;
use crate::output::{Output, OutputFormat};
use clap::Args;
use memory_core::retrieval::{DEFAULT_K, DEFAULT_MAX_SPATIAL_DEPTH};
use memory_core::MemorySystem;
use serde::Serialize;
use std::io::Write;
use uuid::Uuid;

/// Run a two-stage spatial/semantic retrieval query.
#[derive(Args)]
pub struct QueryArgs {
    /// Free-text query
    text: String,
    /// Center the spatial coarse filter on this path
    #[arg(long)]
    spatial_context: Option<String>,
    #[arg(long, default_value_t = DEFAULT_MAX_SPATIAL_DEPTH)]
    max_spatial_depth: usize,
    #[arg(short, long, default_value_t = DEFAULT_K)]
    k: usize,
}

#[derive(Serialize)]
struct ResultView {
    event_id: Uuid,
    content: String,
    combined_score: f32,
    semantic_score: f32,
    spatial_score: f32,
    inhibition: f32,
}

#[derive(Serialize)]
struct ResultList(Vec<ResultView>);

impl Output for ResultList {
    fn write_human<W: Write>(&self, mut writer: W) -> anyhow::Result<()> {
        for r in &self.0 {
            writeln!(
                writer,
                "{:.3} (sem {:.3} / spa {:.3} / inh {:.3}) {} {}",
                r.combined_score, r.semantic_score, r.spatial_score, r.inhibition, r.event_id, r.content
            )?;
        }
        Ok(())
    }
}

pub async fn run(args: QueryArgs, handle: &StorageHandle, format: OutputFormat) -> anyhow::Result<()> {
    let system = MemorySystem::new(&handle.store, &handle.embedder, handle.config.memory.clone());
    let results = system
        .query(
            &handle.config.default_project,
            &args.text,
            args.spatial_context.as_deref(),
            args.max_spatial_depth,
            args.k,
        )
        .await?;

    let views = results
        .into_iter()
        .map(|r| ResultView {
            event_id: r.event.id,
            content: r.event.content,
            combined_score: r.combined_score,
            semantic_score: r.semantic_score,
            spatial_score: r.spatial_score,
            inhibition: r.inhibition,
        })
        .collect();
    format.print(&ResultList(views))
}
