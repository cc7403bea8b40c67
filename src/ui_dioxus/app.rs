use dioxus::prelude::*;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::MindFlowConfig;
use crate::domain::calendar::today;
use crate::domain::user::UserId;
use crate::repository::Repository;
use crate::services::{DataSnapshot, DateWindow, RolloverService, SnapshotFeed, TaskService, UserErrorFormatter};
use crate::ui_dioxus::components::{DateNavigator, RolloverNotice, SubtaskChecklist};
use crate::ui_dioxus::views::MindMap;

/// Top-level window. Expects `Arc<Repository>`, `MindFlowConfig` and the
/// signed-in `UserId` in context.
#[component]
pub fn App() -> Element {
    let repository = use_context::<Arc<Repository>>();
    let config = use_context::<MindFlowConfig>();
    let user = use_context::<UserId>();
    let feed = use_hook(|| Arc::new(SnapshotFeed::new()));

    let today = today();
    let mut snapshot = use_signal(|| None::<Arc<DataSnapshot>>);
    let mut window = use_signal(|| DateWindow::new(today, config.date_stride_days));
    let mut rolled_over = use_signal(|| None::<usize>);
    let mut selected_task = use_signal(|| None::<Uuid>);
    let mut error_message = use_signal(|| None::<String>);

    // Mirror published snapshots into the view.
    use_hook({
        let feed = feed.clone();
        move || {
            spawn(async move {
                let mut receiver = feed.subscribe();
                while receiver.changed().await.is_ok() {
                    let latest = receiver.borrow_and_update().clone();
                    snapshot.set(latest);
                }
            })
        }
    });

    // Roll overdue tasks forward once, then load.
    use_hook({
        let repository = repository.clone();
        let feed = feed.clone();
        let user = user.clone();
        move || {
            spawn(async move {
                let rollover = RolloverService::new(repository.clone());
                match rollover.roll_over(&user, today).await {
                    Ok(0) => {}
                    Ok(count) => rolled_over.set(Some(count)),
                    Err(e) => {
                        warn!("Rollover failed: {}", e);
                        error_message.set(Some(UserErrorFormatter::format_for_ui(&e)));
                    }
                }

                if let Err(e) = feed.refresh(repository.as_ref(), &user).await {
                    warn!("Initial load failed: {}", e);
                    error_message.set(Some(UserErrorFormatter::format_for_ui(&e)));
                }
            })
        }
    });

    let toggle_selected = {
        let repository = repository.clone();
        let feed = feed.clone();
        let user = user.clone();
        move |id: Uuid, completed: bool| {
            let repository = repository.clone();
            let feed = feed.clone();
            let user = user.clone();
            spawn(async move {
                let service = TaskService::new(repository.clone());
                let result = if completed {
                    service.reopen(&user, id).await
                } else {
                    service.complete(&user, id).await
                };
                match result {
                    Ok(()) => {
                        info!(task_id = %id, "Toggled completion");
                        if let Err(e) = feed.refresh(repository.as_ref(), &user).await {
                            error_message.set(Some(UserErrorFormatter::format_for_ui(&e)));
                        }
                    }
                    Err(e) => error_message.set(Some(UserErrorFormatter::format_for_ui(&e))),
                }
            });
        }
    };

    let toggle_subtask = {
        let repository = repository.clone();
        let feed = feed.clone();
        let user = user.clone();
        move |task_id: Uuid, subtask_id: Uuid| {
            let repository = repository.clone();
            let feed = feed.clone();
            let user = user.clone();
            spawn(async move {
                let service = TaskService::new(repository.clone());
                match service.toggle_subtask(task_id, subtask_id).await {
                    Ok(_) => {
                        if let Err(e) = feed.refresh(repository.as_ref(), &user).await {
                            error_message.set(Some(UserErrorFormatter::format_for_ui(&e)));
                        }
                    }
                    Err(e) => error_message.set(Some(UserErrorFormatter::format_for_ui(&e))),
                }
            });
        }
    };

    let current = snapshot();
    let loading = current.is_none();
    let (tasks, categories) = current
        .as_ref()
        .map(|s| (s.tasks.clone(), s.categories.clone()))
        .unwrap_or_default();
    let selected = selected_task().and_then(|id| tasks.iter().find(|t| t.id == id).cloned());

    rsx! {
        div {
            class: "app-container",
            style: "display: flex; flex-direction: column; height: 100vh; background: #0f172a;
                   font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;",

            header {
                style: "display: flex; align-items: center; justify-content: space-between;
                       padding: 0 16px; background: #1e293b; color: #f8fafc;",
                h1 { style: "margin: 0; font-size: 20px;", "MindFlow" }
                DateNavigator {
                    window: window(),
                    today,
                    on_change: move |next: DateWindow| window.set(next),
                }
            }

            if let Some(count) = rolled_over() {
                RolloverNotice {
                    count,
                    on_dismiss: move |_| rolled_over.set(None),
                }
            }

            if let Some(message) = error_message() {
                div {
                    class: "error-banner",
                    style: "padding: 8px 16px; background: #7f1d1d; color: #fecaca; font-size: 13px;",
                    onclick: move |_| error_message.set(None),
                    "{message}"
                }
            }

            div {
                style: "flex: 1; position: relative; min-height: 0;",
                MindMap {
                    tasks,
                    categories,
                    loading,
                    selected_date: window().selected(),
                    today,
                    on_task_selected: move |id: Uuid| selected_task.set(Some(id)),
                }
            }

            if let Some(task) = selected {
                div {
                    class: "task-details",
                    style: "display: flex; align-items: center; gap: 12px; padding: 10px 16px;
                           background: #1e293b; color: #f8fafc; font-size: 14px;",
                    span { style: "opacity: 0.6;", "Selected:" }
                    strong { "{task.title}" }
                    span { style: "opacity: 0.6; font-size: 12px;", "{task.id}" }
                    SubtaskChecklist {
                        subtasks: task.subtasks.clone(),
                        on_toggle: {
                            let toggle = toggle_subtask.clone();
                            let task_id = task.id;
                            move |subtask_id: Uuid| toggle(task_id, subtask_id)
                        },
                    }
                    button {
                        onclick: {
                            let toggle = toggle_selected.clone();
                            let (id, completed) = (task.id, task.is_completed());
                            move |_| toggle(id, completed)
                        },
                        if task.is_completed() { "Reopen" } else { "Mark complete" }
                    }
                    button {
                        onclick: move |_| selected_task.set(None),
                        "Close"
                    }
                }
            }
        }
    }
}
