//! Write-once completion handles for asynchronous flush and shutdown.
//!
//! A [`Completion`] represents the eventual outcome of an operation that
//! may finish on another thread: it starts pending, transitions exactly
//! once to success or failure, and can be observed by any number of
//! threads through polling ([`Completion::is_done`]), blocking with a
//! timeout ([`Completion::wait`]), or callbacks
//! ([`Completion::on_completion`]).
//!
//! Handles fan in with [`Completion::all`], which aggregates the outcomes
//! of many operations into one handle regardless of the order or thread
//! their completions arrive on.
//!
//! There is no cancellation: a timed-out [`Completion::wait`] only stops
//! waiting, the underlying operation keeps running.
//!
//! # Examples
//!
//! ```rust
//! use std::time::Duration;
//!
//! use lumen_logs::Completion;
//!
//! let completion = Completion::pending();
//! assert!(!completion.is_done());
//!
//! let observer = completion.clone();
//! std::thread::spawn(move || observer.succeed());
//!
//! let outcome = completion.wait(Duration::from_secs(1)).unwrap();
//! assert!(outcome.is_success());
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use crate::error::Error;

/// The terminal outcome of a [`Completion`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// The operation finished successfully.
    Success,
    /// The operation failed with the given cause.
    Failure(Error),
}

impl CompletionOutcome {
    /// Returns `true` for [`CompletionOutcome::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, CompletionOutcome::Success)
    }

    /// Returns the failure cause, if the operation failed.
    pub fn error(&self) -> Option<&Error> {
        match self {
            CompletionOutcome::Success => None,
            CompletionOutcome::Failure(error) => Some(error),
        }
    }
}

type Callback = Box<dyn FnOnce(&CompletionOutcome) + Send>;

enum State {
    /// Callbacks registered before the terminal transition.
    Pending(Vec<Callback>),
    Done(CompletionOutcome),
}

struct Inner {
    state: Mutex<State>,
    done: Condvar,
}

/// A clonable, write-once handle to the outcome of an asynchronous
/// operation.
///
/// All clones share the same underlying state; completing any clone
/// completes them all.
#[derive(Clone)]
pub struct Completion {
    inner: Arc<Inner>,
}

impl core::fmt::Debug for Completion {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match &*self.inner.state.lock().unwrap() {
            State::Pending(_) => f.write_str("Completion(pending)"),
            State::Done(outcome) => write!(f, "Completion({outcome:?})"),
        }
    }
}

impl Completion {
    /// Creates a handle that has not completed yet.
    pub fn pending() -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(State::Pending(Vec::new())),
                done: Condvar::new(),
            }),
        }
    }

    /// Creates a handle that has already completed successfully.
    pub fn succeeded() -> Self {
        let completion = Self::pending();
        completion.succeed();
        completion
    }

    /// Creates a handle that has already completed with a failure.
    pub fn failed(error: Error) -> Self {
        let completion = Self::pending();
        completion.fail(error);
        completion
    }

    /// Completes the handle successfully.
    ///
    /// A no-op if the handle is already terminal; the first terminal write
    /// wins.
    pub fn succeed(&self) {
        self.complete(CompletionOutcome::Success);
    }

    /// Completes the handle with a failure cause.
    ///
    /// A no-op if the handle is already terminal; the first terminal write
    /// wins.
    pub fn fail(&self, error: Error) {
        self.complete(CompletionOutcome::Failure(error));
    }

    /// Returns whether the handle has reached a terminal state, without
    /// blocking.
    pub fn is_done(&self) -> bool {
        matches!(&*self.inner.state.lock().unwrap(), State::Done(_))
    }

    /// Returns the outcome if the handle is terminal, without blocking.
    pub fn outcome(&self) -> Option<CompletionOutcome> {
        match &*self.inner.state.lock().unwrap() {
            State::Pending(_) => None,
            State::Done(outcome) => Some(outcome.clone()),
        }
    }

    /// Blocks the calling thread until the handle completes or `timeout`
    /// elapses.
    ///
    /// Returns `None` if the handle did not complete in time. That is
    /// distinct from failure: the underlying operation is not cancelled
    /// and may still complete later.
    pub fn wait(&self, timeout: Duration) -> Option<CompletionOutcome> {
        // `Instant + Duration` panics on overflow; an unrepresentable
        // deadline means "wait without one".
        let deadline = Instant::now().checked_add(timeout);

        let mut state = self.inner.state.lock().unwrap();
        loop {
            if let State::Done(outcome) = &*state {
                return Some(outcome.clone());
            }

            match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return None;
                    }
                    state = self
                        .inner
                        .done
                        .wait_timeout(state, deadline - now)
                        .unwrap()
                        .0;
                }
                None => state = self.inner.done.wait(state).unwrap(),
            }
        }
    }

    /// Registers a callback invoked exactly once with the outcome.
    ///
    /// Runs synchronously on the calling thread if the handle is already
    /// terminal, otherwise later on the completing thread.
    pub fn on_completion<F>(&self, callback: F)
    where
        F: FnOnce(&CompletionOutcome) + Send + 'static,
    {
        let mut state = self.inner.state.lock().unwrap();
        match &mut *state {
            State::Pending(callbacks) => callbacks.push(Box::new(callback)),
            State::Done(outcome) => {
                let outcome = outcome.clone();
                // Run outside the lock so the callback can touch this handle.
                drop(state);
                callback(&outcome);
            }
        }
    }

    /// Returns a handle that completes once every input handle has
    /// completed.
    ///
    /// The aggregate succeeds only if every input succeeds; otherwise it
    /// fails with the first observed failure cause. Inputs may complete in
    /// any order, from any thread. An empty input completes successfully
    /// right away.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lumen_logs::{Completion, Error};
    ///
    /// let ok = Completion::succeeded();
    /// let broken = Completion::failed(Error::Export("disk full".into()));
    ///
    /// let all = Completion::all([ok, broken]);
    /// let outcome = all.outcome().unwrap();
    /// assert_eq!(outcome.error(), Some(&Error::Export("disk full".into())));
    /// ```
    pub fn all<I>(completions: I) -> Completion
    where
        I: IntoIterator<Item = Completion>,
    {
        let completions: Vec<Completion> = completions.into_iter().collect();
        if completions.is_empty() {
            return Completion::succeeded();
        }

        let aggregate = Completion::pending();
        let remaining = Arc::new(AtomicUsize::new(completions.len()));
        let first_failure = Arc::new(Mutex::new(None::<Error>));

        for completion in &completions {
            let aggregate = aggregate.clone();
            let remaining = Arc::clone(&remaining);
            let first_failure = Arc::clone(&first_failure);

            completion.on_completion(move |outcome| {
                if let CompletionOutcome::Failure(error) = outcome {
                    first_failure
                        .lock()
                        .unwrap()
                        .get_or_insert_with(|| error.clone());
                }

                // The thread that observes the last remaining input settles
                // the aggregate.
                if remaining.fetch_sub(1, Ordering::AcqRel) == 1 {
                    match first_failure.lock().unwrap().take() {
                        Some(error) => aggregate.fail(error),
                        None => aggregate.succeed(),
                    }
                }
            });
        }

        aggregate
    }

    fn complete(&self, outcome: CompletionOutcome) {
        let callbacks = {
            let mut state = self.inner.state.lock().unwrap();
            match &mut *state {
                State::Done(_) => return,
                State::Pending(callbacks) => {
                    let callbacks = core::mem::take(callbacks);
                    *state = State::Done(outcome.clone());
                    callbacks
                }
            }
        };

        self.inner.done.notify_all();

        for callback in callbacks {
            callback(&outcome);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicBool;

    use super::*;

    #[test]
    fn first_terminal_write_wins() {
        let completion = Completion::pending();
        completion.fail(Error::Export("boom".into()));
        completion.succeed();

        assert_eq!(
            completion.outcome(),
            Some(CompletionOutcome::Failure(Error::Export("boom".into())))
        );
    }

    #[test]
    fn wait_on_completed_handle_returns_immediately() {
        let completion = Completion::succeeded();
        let outcome = completion.wait(Duration::ZERO).unwrap();
        assert!(outcome.is_success());
    }

    #[test]
    fn wait_with_zero_timeout_on_pending_handle_does_not_block() {
        let completion = Completion::pending();
        assert_eq!(completion.wait(Duration::ZERO), None);
        assert_eq!(completion.wait(Duration::from_millis(10)), None);
        assert!(!completion.is_done());
    }

    #[test]
    fn wait_observes_completion_from_another_thread() {
        let completion = Completion::pending();
        let completer = completion.clone();

        let handle = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            completer.succeed();
        });

        let outcome = completion.wait(Duration::from_secs(5)).unwrap();
        assert!(outcome.is_success());
        handle.join().unwrap();
    }

    #[test]
    fn callback_registered_before_completion_runs_once() {
        let completion = Completion::pending();
        let ran = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&ran);
        completion.on_completion(move |outcome| {
            assert!(outcome.is_success());
            counter.fetch_add(1, Ordering::SeqCst);
        });

        completion.succeed();
        completion.succeed();
        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn callback_registered_after_completion_runs_synchronously() {
        let completion = Completion::failed(Error::AlreadyShutdown);
        let ran = Arc::new(AtomicBool::new(false));

        let flag = Arc::clone(&ran);
        completion.on_completion(move |outcome| {
            assert_eq!(outcome.error(), Some(&Error::AlreadyShutdown));
            flag.store(true, Ordering::SeqCst);
        });

        assert!(ran.load(Ordering::SeqCst));
    }

    #[test]
    fn all_of_empty_succeeds_immediately() {
        let all = Completion::all(std::iter::empty::<Completion>());
        assert!(all.outcome().unwrap().is_success());
    }

    #[test]
    fn all_succeeds_only_if_every_input_succeeds() {
        let a = Completion::pending();
        let b = Completion::pending();
        let all = Completion::all([a.clone(), b.clone()]);

        a.succeed();
        assert!(!all.is_done());

        b.succeed();
        assert!(all.outcome().unwrap().is_success());
    }

    #[test]
    fn all_fails_if_any_input_fails() {
        let a = Completion::pending();
        let b = Completion::pending();
        let c = Completion::pending();
        let all = Completion::all([a.clone(), b.clone(), c.clone()]);

        // Complete out of registration order.
        c.succeed();
        b.fail(Error::Export("disk full".into()));
        a.succeed();

        assert_eq!(
            all.outcome().unwrap().error(),
            Some(&Error::Export("disk full".into()))
        );
    }

    #[test]
    fn all_is_race_free_across_threads() {
        for _ in 0..50 {
            let inputs: Vec<Completion> = (0..8).map(|_| Completion::pending()).collect();
            let all = Completion::all(inputs.clone());

            let threads: Vec<_> = inputs
                .into_iter()
                .enumerate()
                .map(|(index, completion)| {
                    std::thread::spawn(move || {
                        if index == 3 {
                            completion.fail(Error::Export("racy".into()));
                        } else {
                            completion.succeed();
                        }
                    })
                })
                .collect();

            for thread in threads {
                thread.join().unwrap();
            }

            assert_eq!(
                all.wait(Duration::from_secs(5)).unwrap().error(),
                Some(&Error::Export("racy".into()))
            );
        }
    }
}
