use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::window;

use crate::scheduler::{Scheduler, Task, TaskId};

/// `setTimeout` takes a signed delay; anything past `i32::MAX` saturates.
pub(super) fn timeout_ms(delay_ms: u32) -> i32 {
    i32::try_from(delay_ms).unwrap_or(i32::MAX)
}

/// `setTimeout`-backed scheduler. Expired tasks are handed back to the page
/// session; the timeout handle doubles as the task id.
pub struct BrowserScheduler;

impl Scheduler for BrowserScheduler {
    fn schedule(&mut self, delay_ms: u32, task: Task) -> TaskId {
        let callback = Closure::once_into_js(move || super::dispatch(task));
        let handle = window().map(|w| {
            w.set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                timeout_ms(delay_ms),
            )
        });
        match handle {
            Some(Ok(handle)) => TaskId(handle as u32 as u64),
            Some(Err(err)) => {
                log::warn!("could not schedule {task:?}: {err:?}");
                TaskId(0)
            }
            None => {
                log::warn!("could not schedule {task:?}: no window");
                TaskId(0)
            }
        }
    }

    fn cancel(&mut self, id: TaskId) {
        if let Some(w) = window() {
            w.clear_timeout_with_handle(id.0 as i32);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_delays_saturate_instead_of_wrapping() {
        assert_eq!(timeout_ms(500), 500);
        assert_eq!(timeout_ms(i32::MAX as u32), i32::MAX);
        assert_eq!(timeout_ms(u32::MAX), i32::MAX);
        assert_eq!(timeout_ms(3_000_000_000), i32::MAX);
    }
}
