use chrono::NaiveDate;
use dioxus::prelude::*;

use crate::domain::calendar::format_calendar_day;
use crate::services::DateWindow;

#[component]
pub fn DateNavigator(window: DateWindow, today: NaiveDate, on_change: EventHandler<DateWindow>) -> Element {
    let selected = window.selected();
    let stride = window.stride();
    let picker_value = format_calendar_day(selected);
    let days: Vec<(NaiveDate, String, String)> = window
        .visible_days()
        .into_iter()
        .map(|day| (day, day.format("%a").to_string(), day.format("%-d").to_string()))
        .collect();

    rsx! {
        div {
            class: "date-navigator",
            style: "display: flex; align-items: center; gap: 8px; padding: 10px 16px;
                   background: #1e293b; color: #f8fafc;",

            button {
                class: "nav-prev",
                title: "Back {stride} days",
                onclick: move |_| {
                    let mut next = window;
                    next.retreat();
                    on_change.call(next);
                },
                "‹"
            }

            for (day, weekday, number) in days {
                button {
                    key: "{day}",
                    class: if day == selected { "day selected" } else if day == today { "day today" } else { "day" },
                    style: if day == selected {
                        "padding: 6px 10px; border-radius: 6px; border: none; background: #6366f1; color: white;"
                    } else {
                        "padding: 6px 10px; border-radius: 6px; border: none; background: transparent; color: inherit;"
                    },
                    onclick: move |_| {
                        let mut next = window;
                        next.select(day);
                        on_change.call(next);
                    },
                    div { style: "font-size: 11px; opacity: 0.7;", "{weekday}" }
                    div { "{number}" }
                }
            }

            button {
                class: "nav-next",
                title: "Forward {stride} days",
                onclick: move |_| {
                    let mut next = window;
                    next.advance();
                    on_change.call(next);
                },
                "›"
            }

            button {
                class: "nav-today",
                disabled: selected == today,
                onclick: move |_| {
                    let mut next = window;
                    next.jump_to(today);
                    on_change.call(next);
                },
                "Today"
            }

            input {
                r#type: "date",
                value: "{picker_value}",
                oninput: move |evt: FormEvent| {
                    if let Ok(day) = NaiveDate::parse_from_str(&evt.value(), "%Y-%m-%d") {
                        let mut next = window;
                        next.jump_to(day);
                        on_change.call(next);
                    }
                },
            }
        }
    }
}
