use crate::config::StorageHandle;
use crate::errors::{helpers, EnhancedError};
use crate::output::{Output, OutputFormat};
use chrono::Utc;
use clap::Subcommand;
use memory_core::types::{Goal, GoalStatus, GoalType};
use memory_core::MemorySystem;
use serde::Serialize;
use std::io::Write;
use uuid::Uuid;

#[derive(Subcommand)]
pub enum GoalCommands {
    /// Create a new top-level or child goal
    Set {
        goal_text: String,
        /// Parent goal id, if this is a subgoal
        #[arg(long)]
        parent: Option<Uuid>,
        #[arg(long, default_value_t = 5)]
        priority: u8,
    },
    /// List active goals
    List,
    /// Update a goal's progress (0.0-1.0); reaching 1.0 auto-completes it
    Progress { id: Uuid, progress: f32 },
    /// Complete a goal and cascade completion to its descendants
    Complete { id: Uuid },
}

#[derive(Serialize)]
struct GoalView {
    id: Uuid,
    goal_text: String,
    status: GoalStatus,
    progress: f32,
    parent_goal_id: Option<Uuid>,
}

impl From<&Goal> for GoalView {
    fn from(g: &Goal) -> Self {
        Self {
            id: g.id,
            goal_text: g.goal_text.clone(),
            status: g.status,
            progress: g.progress,
            parent_goal_id: g.parent_goal_id,
        }
    }
}

#[derive(Serialize)]
struct GoalList(Vec<GoalView>);

impl Output for GoalView {
    fn write_human<W: Write>(&self, mut writer: W) -> anyhow::Result<()> {
        writeln!(writer, "{} [{:?}] {:.0}% {}", self.id, self.status, self.progress * 100.0, self.goal_text)?;
        Ok(())
    }
}

impl Output for GoalList {
    fn write_human<W: Write>(&self, mut writer: W) -> anyhow::Result<()> {
        for goal in &self.0 {
            writeln!(writer, "{} [{:?}] {:.0}% {}", goal.id, goal.status, goal.progress * 100.0, goal.goal_text)?;
        }
        Ok(())
    }
}

pub async fn run(command: GoalCommands, handle: &StorageHandle, format: OutputFormat) -> anyhow::Result<()> {
    let system = MemorySystem::new(&handle.store, &handle.embedder, handle.config.memory.clone());
    let project_id = &handle.config.default_project;
    let goals = system.goals();

    match command {
        GoalCommands::Set { goal_text, parent, priority } => {
            let goal = Goal {
                id: Uuid::new_v4(),
                project_id: project_id.clone(),
                goal_text,
                goal_type: if parent.is_some() { GoalType::Subgoal } else { GoalType::Primary },
                parent_goal_id: parent,
                priority,
                status: GoalStatus::Active,
                progress: 0.0,
                deadline: None,
                created_at: Utc::now(),
                embedding: None,
            };
            goals.set_goal(&goal).await?;
            format.print(&GoalView::from(&goal))
        }
        GoalCommands::List => {
            let active = goals.get_active_goals(project_id).await?;
            format.print(&GoalList(active.iter().map(GoalView::from).collect()))
        }
        GoalCommands::Progress { id, progress } => {
            goals
                .update_goal_progress(id, progress)
                .await
                .context_with_help("failed to update goal progress", helpers::GOAL_NOT_FOUND_HELP)?;
            println!("updated {id}");
            Ok(())
        }
        GoalCommands::Complete { id } => {
            goals
                .complete_goal(project_id, id)
                .await
                .context_with_help("failed to complete goal", helpers::GOAL_NOT_FOUND_HELP)?;
            println!("completed {id}");
            Ok(())
        }
    }
}
