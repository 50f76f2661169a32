//! Text rendering of board views with `minijinja` templates.

use crate::task::{
    domain::{LIFECYCLE_STEPS, StatusFilter, Task},
    ports::GatewayMode,
    services::{ActionHint, Leaderboard, Standing},
};
use minijinja::Environment;
use serde::Serialize;
use thiserror::Error;

const BOARD_TEMPLATE: &str = "\
{{ heading }} [{{ mode }} mode]
{% for task in tasks -%}
{{ task.id }}  {{ task.title }}  {{ task.amount }} ALGO  ({{ task.status }})
    {{ task.progress }}
{%- if task.worker %}
    worker: {{ task.worker }}{% endif %}
{%- if task.deadline %}
    deadline: {{ task.deadline }}{% endif %}
{%- if task.actions %}
    actions: {{ task.actions | join(\", \") }}{% endif %}
{% else -%}
No tasks to show.
{% endfor %}";

const LEADERBOARD_TEMPLATE: &str = "\
Top earners
{% for row in earners -%}
{{ loop.index }}. {{ row.address }}  {{ row.total }} ALGO  ({{ row.tasks }} tasks)
{% else -%}
No completed tasks yet.
{% endfor %}
Top posters
{% for row in posters -%}
{{ loop.index }}. {{ row.address }}  {{ row.total }} ALGO  ({{ row.tasks }} tasks)
{% else -%}
No tasks posted yet.
{% endfor %}
Recent completions
{% for task in recent -%}
- {{ task.title }}  {{ task.amount }} ALGO
{% else -%}
Nothing completed yet.
{% endfor %}";

/// Template rendering failure.
#[derive(Debug, Clone, Error)]
#[error("failed to render {template}: {reason}")]
pub struct RenderError {
    /// Template name.
    pub template: &'static str,
    /// Engine message.
    pub reason: String,
}

/// One task as shown on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskRow {
    /// Task identifier.
    pub id: String,
    /// Task title.
    pub title: String,
    /// Bounty in ALGO.
    pub amount: String,
    /// Status label.
    pub status: String,
    /// Badge style class.
    pub badge: String,
    /// Lifecycle progress line.
    pub progress: String,
    /// Claiming wallet.
    pub worker: Option<String>,
    /// Deadline, `YYYY-MM-DD`.
    pub deadline: Option<String>,
    /// Permitted actions, highlighted ones marked with `*`.
    pub actions: Vec<String>,
}

impl TaskRow {
    /// Builds the row for `task` with the given control hints.
    #[must_use]
    pub fn new(task: &Task, hints: &[ActionHint]) -> Self {
        let display = task.status().display();
        Self {
            id: task.id().to_string(),
            title: task.title().to_owned(),
            amount: task.amount().to_string(),
            status: display.label.to_owned(),
            badge: display.badge_class.to_owned(),
            progress: progress_line(display.step, display.label),
            worker: task.worker().map(ToString::to_string),
            deadline: task.deadline().map(|date| date.format("%Y-%m-%d").to_string()),
            actions: hints
                .iter()
                .filter(|hint| hint.permitted)
                .map(|hint| {
                    if hint.emphasised {
                        format!("{}*", hint.action)
                    } else {
                        hint.action.to_string()
                    }
                })
                .collect(),
        }
    }
}

/// Formats the stepper, bracketing the current step.
///
/// Tasks off the happy path show only their status label.
#[must_use]
pub fn progress_line(step: Option<usize>, label: &str) -> String {
    let Some(current) = step else {
        return format!("{label} (off the usual path)");
    };
    LIFECYCLE_STEPS
        .iter()
        .enumerate()
        .map(|(index, lifecycle_step)| {
            if index == current {
                format!("[{}]", lifecycle_step.label)
            } else {
                lifecycle_step.label.to_owned()
            }
        })
        .collect::<Vec<_>>()
        .join(" > ")
}

#[derive(Serialize)]
struct BoardContext<'a> {
    heading: String,
    mode: &'static str,
    tasks: &'a [TaskRow],
}

#[derive(Serialize)]
struct StandingRow {
    address: String,
    total: String,
    tasks: usize,
}

impl From<&Standing> for StandingRow {
    fn from(standing: &Standing) -> Self {
        Self {
            address: standing.address.to_string(),
            total: standing.total.to_string(),
            tasks: standing.tasks,
        }
    }
}

#[derive(Serialize)]
struct LeaderboardContext {
    earners: Vec<StandingRow>,
    posters: Vec<StandingRow>,
    recent: Vec<TaskRow>,
}

fn environment() -> Result<Environment<'static>, RenderError> {
    let mut environment = Environment::new();
    environment
        .add_template("board", BOARD_TEMPLATE)
        .map_err(|error| template_error("board", &error))?;
    environment
        .add_template("leaderboard", LEADERBOARD_TEMPLATE)
        .map_err(|error| template_error("leaderboard", &error))?;
    Ok(environment)
}

fn template_error(template: &'static str, error: &minijinja::Error) -> RenderError {
    RenderError {
        template,
        reason: error.to_string(),
    }
}

fn render(template: &'static str, context: impl Serialize) -> Result<String, RenderError> {
    environment()?
        .get_template(template)
        .and_then(|compiled| compiled.render(context))
        .map_err(|error| template_error(template, &error))
}

/// Renders a filtered board listing.
///
/// # Errors
///
/// Returns [`RenderError`] when the template fails.
pub fn render_board(
    filter: StatusFilter,
    mode: GatewayMode,
    rows: &[TaskRow],
) -> Result<String, RenderError> {
    let heading = match filter {
        StatusFilter::All => "All tasks".to_owned(),
        StatusFilter::Only(status) => format!("{} tasks", status.display().label),
    };
    render_listing(heading, mode, rows)
}

/// Renders a listing under a custom heading.
///
/// # Errors
///
/// Returns [`RenderError`] when the template fails.
pub fn render_listing(
    heading: String,
    mode: GatewayMode,
    rows: &[TaskRow],
) -> Result<String, RenderError> {
    render(
        "board",
        BoardContext {
            heading,
            mode: mode.as_str(),
            tasks: rows,
        },
    )
}

/// Renders the leaderboard.
///
/// # Errors
///
/// Returns [`RenderError`] when the template fails.
pub fn render_leaderboard(leaderboard: &Leaderboard) -> Result<String, RenderError> {
    render(
        "leaderboard",
        LeaderboardContext {
            earners: leaderboard.top_earners.iter().map(StandingRow::from).collect(),
            posters: leaderboard.top_posters.iter().map(StandingRow::from).collect(),
            recent: leaderboard
                .recent_completions
                .iter()
                .map(|task| TaskRow::new(task, &[]))
                .collect(),
        },
    )
}
