use crate::config::StorageHandle;
use crate::errors::{helpers, EnhancedError};
use crate::output::{Output, OutputFormat};
use chrono::Utc;
use clap::Subcommand;
use memory_core::types::{Priority, ProspectiveTask, TaskStatus};
use memory_core::MemorySystem;
use serde::Serialize;
use std::io::Write;
use uuid::Uuid;

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Create a prospective task (reminder)
    Add {
        content: String,
        /// Tag that, when queried, activates this task even without a due date
        #[arg(long)]
        tag: Option<String>,
        #[arg(long, value_enum, default_value_t = PriorityArg::Med)]
        priority: PriorityArg,
    },
    /// List tasks currently activated (due date passed, or tag matched)
    List {
        #[arg(long)]
        tag: Option<String>,
    },
    /// Mark a task complete
    Complete { id: Uuid },
}

#[derive(Clone, Copy, clap::ValueEnum)]
pub enum PriorityArg {
    Low,
    Med,
    High,
}

impl From<PriorityArg> for Priority {
    fn from(p: PriorityArg) -> Self {
        match p {
            PriorityArg::Low => Priority::Low,
            PriorityArg::Med => Priority::Med,
            PriorityArg::High => Priority::High,
        }
    }
}

#[derive(Serialize)]
struct TaskView {
    id: Uuid,
    content: String,
    status: TaskStatus,
    activation_tag: Option<String>,
}

impl From<&ProspectiveTask> for TaskView {
    fn from(t: &ProspectiveTask) -> Self {
        Self { id: t.id, content: t.content.clone(), status: t.status, activation_tag: t.activation_tag.clone() }
    }
}

#[derive(Serialize)]
struct TaskList(Vec<TaskView>);

impl Output for TaskView {
    fn write_human<W: Write>(&self, mut writer: W) -> anyhow::Result<()> {
        writeln!(writer, "{} [{:?}] {}", self.id, self.status, self.content)?;
        Ok(())
    }
}

impl Output for TaskList {
    fn write_human<W: Write>(&self, mut writer: W) -> anyhow::Result<()> {
        for task in &self.0 {
            writeln!(writer, "{} [{:?}] {}", task.id, task.status, task.content)?;
        }
        Ok(())
    }
}

pub async fn run(command: TaskCommands, handle: &StorageHandle, format: OutputFormat) -> anyhow::Result<()> {
    let system = MemorySystem::new(&handle.store, &handle.embedder, handle.config.memory.clone());
    let project_id = &handle.config.default_project;
    let tasks = system.prospective();

    match command {
        TaskCommands::Add { content, tag, priority } => {
            let task = ProspectiveTask {
                id: Uuid::new_v4(),
                project_id: project_id.clone(),
                active_form: content.clone(),
                content,
                priority: priority.into(),
                due: None,
                status: TaskStatus::Pending,
                activation_tag: tag,
                created_at: Utc::now(),
                wm_id: None,
            };
            tasks.create_task(&task).await?;
            format.print(&TaskView::from(&task))
        }
        TaskCommands::List { tag } => {
            let activated = tasks.get_activated_tasks(project_id, Utc::now(), tag.as_deref()).await?;
            format.print(&TaskList(activated.iter().map(TaskView::from).collect()))
        }
        TaskCommands::Complete { id } => {
            tasks
                .complete(id)
                .await
                .context_with_help("failed to complete task", helpers::TASK_NOT_FOUND_HELP)?;
            println!("completed {id}");
            Ok(())
        }
    }
}
