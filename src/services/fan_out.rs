//! Fork-join helper for independent git queries.

use std::thread;

/// Run `task` once per input, each on its own scoped thread, and return the
/// results in input order once every thread has finished.
///
/// Each thread writes only to its own join handle, so no slot is shared.
/// A task that panics, or whose thread cannot be started, leaves `None` in
/// its slot instead of tearing down the whole join.
pub fn fork_join<T, R, F>(inputs: &[T], task: F) -> Vec<Option<R>>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync,
{
    fork_join_with(inputs, task, |index| {
        thread::Builder::new().name(format!("fan-out-{}", index))
    })
}

fn fork_join_with<T, R, F, B>(inputs: &[T], task: F, builder: B) -> Vec<Option<R>>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync,
    B: Fn(usize) -> thread::Builder,
{
    let task = &task;
    thread::scope(|scope| {
        let handles: Vec<_> = inputs
            .iter()
            .enumerate()
            .map(|(index, input)| {
                match builder(index).spawn_scoped(scope, move || task(input)) {
                    Ok(handle) => Some(handle),
                    Err(err) => {
                        tracing::warn!("Could not start worker {}: {}", index, err);
                        None
                    }
                }
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.and_then(|h| h.join().ok()))
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn results_follow_input_order() {
        let inputs = vec![30u64, 10, 20, 0];
        let results = fork_join(&inputs, |ms| {
            thread::sleep(Duration::from_millis(*ms));
            *ms * 2
        });
        assert_eq!(results, vec![Some(60), Some(20), Some(40), Some(0)]);
    }

    #[test]
    fn panicking_task_leaves_empty_slot() {
        let inputs = vec![1, 2, 3];
        let results = fork_join(&inputs, |n| {
            if *n == 2 {
                panic!("task failed");
            }
            *n
        });
        assert_eq!(results, vec![Some(1), None, Some(3)]);
    }

    #[test]
    fn thread_that_cannot_start_leaves_empty_slot() {
        let inputs = vec![1, 2, 3];
        // No system can map a stack this large
        let results = fork_join_with(
            &inputs,
            |n| *n,
            |index| {
                let builder = thread::Builder::new();
                if index == 1 {
                    builder.stack_size(1 << 60)
                } else {
                    builder
                }
            },
        );
        assert_eq!(results, vec![Some(1), None, Some(3)]);
    }

    #[test]
    fn empty_input_spawns_nothing() {
        let inputs: Vec<u8> = Vec::new();
        assert!(fork_join(&inputs, |n| *n).is_empty());
    }
}
