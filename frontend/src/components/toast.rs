//! Toast notifications

use std::rc::Rc;
use std::time::Duration;

use leptos::*;
use vault_core::{NotificationKind, NotificationSink};

use crate::state::Services;

#[derive(Clone, Debug, PartialEq)]
struct ToastItem {
    id: u64,
    message: String,
    kind: NotificationKind,
}

/// Queue of visible toasts
#[derive(Clone, Copy)]
pub struct ToastQueue {
    items: RwSignal<Vec<ToastItem>>,
    next_id: StoredValue<u64>,
    timeout: Duration,
}

impl ToastQueue {
    fn new(timeout_ms: u32) -> Self {
        Self {
            items: create_rw_signal(Vec::new()),
            next_id: store_value(0),
            timeout: Duration::from_millis(timeout_ms as u64),
        }
    }

    fn dismiss(&self, id: u64) {
        self.items.update(|items| items.retain(|t| t.id != id));
    }
}

impl NotificationSink for ToastQueue {
    fn add_notification(&self, message: &str, kind: NotificationKind) {
        let id = self.next_id.get_value();
        self.next_id.set_value(id + 1);

        self.items.update(|items| {
            items.push(ToastItem {
                id,
                message: message.to_string(),
                kind,
            })
        });

        let queue = *self;
        set_timeout(move || queue.dismiss(id), self.timeout);
    }
}

/// Toast container; the shell's notification widget while mounted
#[component]
pub fn Toast() -> impl IntoView {
    let services = expect_context::<Services>();
    let queue = ToastQueue::new(services.shell.config().toast_timeout_ms);

    services.shell.attach_notifications(Rc::new(queue));
    log::debug!("Notification widget attached");

    let shell = services.shell.clone();
    on_cleanup(move || shell.detach_notifications());

    view! {
        <div class="toast-container">
            <For
                each=move || queue.items.get()
                key=|toast| toast.id
                children=move |toast| {
                    let id = toast.id;
                    let class = format!("toast toast-{}", toast.kind.as_str());
                    view! {
                        <div class=class on:click=move |_| queue.dismiss(id)>
                            {toast.message}
                        </div>
                    }
                }
            />
        </div>
    }
}
