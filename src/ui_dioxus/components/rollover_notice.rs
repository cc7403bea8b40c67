use dioxus::prelude::*;
use std::time::Duration;

pub const NOTICE_DURATION: Duration = Duration::from_secs(5);

pub fn notice_text(count: usize) -> String {
    if count == 1 {
        "1 task rolled over to today".to_string()
    } else {
        format!("{} tasks rolled over to today", count)
    }
}

/// Banner announcing how many overdue tasks were carried forward. Dismisses
/// itself after `NOTICE_DURATION`.
#[component]
pub fn RolloverNotice(count: usize, on_dismiss: EventHandler<()>) -> Element {
    use_hook(move || {
        spawn(async move {
            tokio::time::sleep(NOTICE_DURATION).await;
            on_dismiss.call(());
        })
    });

    let text = notice_text(count);

    rsx! {
        div {
            class: "rollover-notice",
            role: "status",
            style: "position: fixed; top: 16px; right: 16px; z-index: 1000;
                   display: flex; align-items: center; gap: 12px;
                   padding: 12px 16px; border-radius: 8px;
                   background: #4f46e5; color: white; font-size: 14px;
                   box-shadow: 0 4px 12px rgba(0, 0, 0, 0.25);",
            span { "↻ {text}" }
            button {
                style: "border: none; background: transparent; color: white;
                       cursor: pointer; font-size: 16px;",
                onclick: move |_| on_dismiss.call(()),
                "×"
            }
        }
    }
}
