//! Bounded-width executor for a task graph that grows while it runs.
//!
//! Tasks are submitted through a cloneable [`QueueHandle`], including from
//! inside tasks that are already running. [`TaskQueue::drain`] keeps at most
//! `width` tasks in flight and returns once nothing is running and nothing is
//! waiting, or as soon as any task fails.

use futures::future::BoxFuture;
use std::collections::VecDeque;
use std::future::Future;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

type Task<E> = BoxFuture<'static, Result<(), E>>;

pub struct TaskQueue<E> {
    width: usize,
    tx: mpsc::UnboundedSender<Task<E>>,
    rx: mpsc::UnboundedReceiver<Task<E>>,
}

/// Submission side of a [`TaskQueue`].
pub struct QueueHandle<E> {
    tx: mpsc::UnboundedSender<Task<E>>,
}

impl<E> Clone for QueueHandle<E> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<E> QueueHandle<E>
where
    E: Send + 'static,
{
    /// Queues a task. Submissions after the queue was dropped are discarded.
    pub fn submit<F>(&self, task: F)
    where
        F: Future<Output = Result<(), E>> + Send + 'static,
    {
        let _ = self.tx.send(Box::pin(task));
    }

    pub fn submit_all<I, F>(&self, tasks: I)
    where
        I: IntoIterator<Item = F>,
        F: Future<Output = Result<(), E>> + Send + 'static,
    {
        for task in tasks {
            self.submit(task);
        }
    }
}

impl<E> TaskQueue<E>
where
    E: Send + 'static,
{
    #[must_use]
    pub fn new(width: usize) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            width: width.max(1),
            tx,
            rx,
        }
    }

    #[must_use]
    pub fn handle(&self) -> QueueHandle<E> {
        QueueHandle {
            tx: self.tx.clone(),
        }
    }

    /// Runs tasks until the queue is empty and idle. Returns how many tasks
    /// completed, or the first error; remaining tasks are aborted on error.
    pub async fn drain(mut self) -> Result<usize, E> {
        let mut running: JoinSet<Result<(), E>> = JoinSet::new();
        let mut pending: VecDeque<Task<E>> = VecDeque::new();
        let mut completed = 0usize;

        loop {
            while let Ok(task) = self.rx.try_recv() {
                pending.push_back(task);
            }

            while running.len() < self.width {
                match pending.pop_front() {
                    Some(task) => {
                        running.spawn(task);
                    }
                    None => break,
                }
            }

            // Only running tasks can submit more work, so an idle queue with
            // an empty channel is finished.
            if running.is_empty() {
                break;
            }

            tokio::select! {
                Some(task) = self.rx.recv() => pending.push_back(task),
                Some(joined) = running.join_next() => {
                    match joined {
                        Ok(Ok(())) => completed += 1,
                        Ok(Err(e)) => return Err(e),
                        Err(join_err) => {
                            if join_err.is_panic() {
                                std::panic::resume_unwind(join_err.into_panic());
                            }
                        }
                    }
                }
            }
        }

        Ok(completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn empty_queue_drains_immediately() {
        let queue: TaskQueue<()> = TaskQueue::new(4);
        assert_eq!(queue.drain().await, Ok(0));
    }

    #[tokio::test]
    async fn never_exceeds_width() {
        let queue: TaskQueue<()> = TaskQueue::new(3);
        let handle = queue.handle();
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        for _ in 0..20 {
            let in_flight = in_flight.clone();
            let peak = peak.clone();
            handle.submit(async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                Ok(())
            });
        }

        assert_eq!(queue.drain().await, Ok(20));
        assert!(peak.load(Ordering::SeqCst) <= 3);
        assert!(peak.load(Ordering::SeqCst) >= 2);
    }

    fn fan_out(handle: QueueHandle<()>, depth: u32, counter: Arc<AtomicUsize>) -> Task<()> {
        Box::pin(async move {
            counter.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(1)).await;
            if depth > 0 {
                for _ in 0..2 {
                    handle.submit(fan_out(handle.clone(), depth - 1, counter.clone()));
                }
            }
            Ok(())
        })
    }

    #[tokio::test]
    async fn tasks_can_submit_more_tasks() {
        let queue: TaskQueue<()> = TaskQueue::new(2);
        let counter = Arc::new(AtomicUsize::new(0));
        queue
            .handle()
            .submit(fan_out(queue.handle(), 3, counter.clone()));

        // 1 + 2 + 4 + 8
        assert_eq!(queue.drain().await, Ok(15));
        assert_eq!(counter.load(Ordering::SeqCst), 15);
    }

    #[tokio::test]
    async fn first_error_stops_the_drain() {
        let queue: TaskQueue<String> = TaskQueue::new(1);
        let handle = queue.handle();
        let ran_after = Arc::new(AtomicUsize::new(0));

        handle.submit(async { Err("page 2 failed".to_string()) });
        for _ in 0..5 {
            let ran_after = ran_after.clone();
            handle.submit(async move {
                ran_after.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
        }

        assert_eq!(queue.drain().await, Err("page 2 failed".to_string()));
        assert_eq!(ran_after.load(Ordering::SeqCst), 0);
    }
}
