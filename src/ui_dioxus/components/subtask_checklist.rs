use dioxus::prelude::*;
use uuid::Uuid;

use crate::domain::task::SubTask;

pub fn progress_text(done: usize, total: usize) -> String {
    format!("{}/{} subtasks", done, total)
}

/// Completed/total counter plus one toggle per subtask. Renders nothing for
/// tasks without subtasks.
#[component]
pub fn SubtaskChecklist(subtasks: Vec<SubTask>, on_toggle: EventHandler<Uuid>) -> Element {
    if subtasks.is_empty() {
        return None;
    }
    let done = subtasks.iter().filter(|s| s.completed).count();
    let text = progress_text(done, subtasks.len());

    rsx! {
        div {
            class: "subtasks",
            style: "display: flex; align-items: center; gap: 8px; font-size: 12px;",
            span { class: "subtask-progress", style: "opacity: 0.7;", "{text}" }
            for subtask in subtasks.iter() {
                label {
                    key: "{subtask.id}",
                    class: if subtask.completed { "subtask subtask-done" } else { "subtask" },
                    style: "display: flex; align-items: center; gap: 4px; cursor: pointer;",
                    input {
                        r#type: "checkbox",
                        checked: subtask.completed,
                        onclick: {
                            let id = subtask.id;
                            move |_| on_toggle.call(id)
                        },
                    }
                    span {
                        style: if subtask.completed { "text-decoration: line-through; opacity: 0.6;" } else { "" },
                        "{subtask.title}"
                    }
                }
            }
        }
    }
}
