use crate::config::StorageHandle;
use crate::output::{Output, OutputFormat};
use chrono::{DateTime, Utc};
use clap::Subcommand;
use memory_core::types::{Event, EventContext};
use memory_core::MemorySystem;
use serde::Serialize;
use std::io::Write;
use uuid::Uuid;

#[derive(Subcommand)]
pub enum EventCommands {
    /// Record a new episodic event
    Record {
        /// Free-text event content
        content: String,
        /// Event kind, e.g. "agent_action", "observation"
        #[arg(long, default_value = "agent_action")]
        event_type: String,
        /// Working directory this event happened in, for spatial indexing
        #[arg(long)]
        cwd: Option<String>,
    },
    /// List the most recent events
    Recent {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

#[derive(Serialize)]
struct EventView {
    id: Uuid,
    event_type: String,
    content: String,
    timestamp: DateTime<Utc>,
    consolidated: bool,
}

impl From<&Event> for EventView {
    fn from(e: &Event) -> Self {
        Self {
            id: e.id,
            event_type: e.event_type.clone(),
            content: e.content.clone(),
            timestamp: e.timestamp,
            consolidated: e.consolidated,
        }
    }
}

#[derive(Serialize)]
struct EventList(Vec<EventView>);

impl Output for EventView {
    fn write_human<W: Write>(&self, mut writer: W) -> anyhow::Result<()> {
        writeln!(writer, "{} [{}] {}", self.id, self.event_type, self.content)?;
        Ok(())
    }
}

impl Output for EventList {
    fn write_human<W: Write>(&self, mut writer: W) -> anyhow::Result<()> {
        for event in &self.0 {
            writeln!(
                writer,
                "{} {} [{}]{} {}",
                event.timestamp.format("%Y-%m-%d %H:%M:%S"),
                event.id,
                event.event_type,
                if event.consolidated { " (consolidated)" } else { "" },
                event.content
            )?;
        }
        Ok(())
    }
}

pub async fn run(command: EventCommands, handle: &StorageHandle, format: OutputFormat) -> anyhow::Result<()> {
    let system = MemorySystem::new(&handle.store, &handle.embedder, handle.config.memory.clone());
    let project_id = &handle.config.default_project;

    match command {
        EventCommands::Record { content, event_type, cwd } => {
            let event = Event {
                id: Uuid::new_v4(),
                project_id: project_id.clone(),
                session_id: None,
                timestamp: Utc::now(),
                event_type,
                content,
                context: EventContext { cwd, ..EventContext::default() },
                embedding: None,
                consolidated: false,
                wm_id: None,
            };
            let stored = system.episodic().record_event(event, &handle.embedder).await?;
            format.print(&EventView::from(&stored))
        }
        EventCommands::Recent { limit } => {
            let events = system.episodic().get_recent_events(project_id, limit).await?;
            format.print(&EventList(events.iter().map(EventView::from).collect()))
        }
    }
}
