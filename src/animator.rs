//! Threaded animator
//!
//! Owns an [`AnimationScheduler`] and drives it from a dedicated thread. The
//! thread sleeps until the earliest next change, steps every animation,
//! commits the merged frame to the device sink and repeats until all
//! animations complete or a stop is requested.
//!
//! Ticks are strictly serialized: the next wake is only armed after the
//! previous commit returned. Running several animators against one device is
//! not supported, their writes interleave arbitrarily.

use core::cell::RefCell;
use core::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use critical_section::Mutex;
use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};
use embassy_time::{Duration, Instant};

#[cfg(feature = "log")]
use log::{debug, error, trace, warn};

use crate::DeviceSink;
use crate::animation::Animation;
use crate::error::AnimatorError;
use crate::registry::LedRegistry;
use crate::scheduler::{AnimationId, AnimationScheduler, Wake};

/// Outcome of waiting for an animator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The scheduler thread exited
    Finished,
    /// The timeout elapsed, the scheduler may still be running
    TimedOut,
}

struct Shared {
    scheduler: Mutex<RefCell<AnimationScheduler>>,
    running: AtomicBool,
    stop: AtomicBool,
}

type WorkerResult<S> = (S, Result<(), <S as DeviceSink>::Error>);

struct Worker<S: DeviceSink> {
    wakeup: Sender<()>,
    done: Receiver<()>,
    handle: JoinHandle<WorkerResult<S>>,
}

/// Runs animations on a background thread and commits them to a device
pub struct Animator<S>
where
    S: DeviceSink + Send + 'static,
    S::Error: Send + 'static,
{
    leds: &'static LedRegistry,
    shared: Arc<Shared>,
    sink: Option<S>,
    worker: Option<Worker<S>>,
}

impl<S> Animator<S>
where
    S: DeviceSink + Send + 'static,
    S::Error: Send + 'static,
{
    /// Create an animator for an already enabled device
    pub fn new(sink: S, leds: &'static LedRegistry) -> Self {
        Self {
            leds,
            shared: Arc::new(Shared {
                scheduler: Mutex::new(RefCell::new(AnimationScheduler::new())),
                running: AtomicBool::new(false),
                stop: AtomicBool::new(false),
            }),
            sink: Some(sink),
            worker: None,
        }
    }

    /// Register an animation
    ///
    /// Animations registered later take priority on shared LEDs.
    pub fn add_animation(
        &mut self,
        animation: impl Into<Animation>,
    ) -> Result<AnimationId, AnimatorError<S::Error>> {
        if self.is_running() {
            return Err(AnimatorError::AlreadyStarted);
        }
        let animation = animation.into();
        critical_section::with(|cs| self.shared.scheduler.borrow(cs).borrow_mut().add(animation))
            .map_err(|_| AnimatorError::TooManyAnimations)
    }

    /// Enable or disable a registered animation, also while running
    pub fn set_enabled(
        &self,
        id: AnimationId,
        enabled: bool,
    ) -> Result<(), AnimatorError<S::Error>> {
        let found = critical_section::with(|cs| {
            self.shared
                .scheduler
                .borrow(cs)
                .borrow_mut()
                .set_enabled(id, enabled, self.leds)
        });
        if found {
            Ok(())
        } else {
            Err(AnimatorError::UnknownAnimation)
        }
    }

    pub fn is_enabled(&self, id: AnimationId) -> Option<bool> {
        critical_section::with(|cs| {
            self.shared
                .scheduler
                .borrow(cs)
                .borrow()
                .get(id)
                .map(Animation::is_enabled)
        })
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }

    /// Initialize all animations and start the scheduler thread
    ///
    /// Returns right away. Without any pending change the animator
    /// terminates immediately and never touches the device.
    pub fn start(&mut self) -> Result<(), AnimatorError<S::Error>> {
        if self.is_running() {
            return Err(AnimatorError::AlreadyStarted);
        }
        if let Some(worker) = self.worker.take() {
            self.join(worker)?;
        }
        let Some(sink) = self.sink.take() else {
            return Err(AnimatorError::AlreadyStarted);
        };

        let now = Instant::now();
        #[cfg(feature = "log")]
        debug!("starting animation at {}ms", now.as_millis());

        self.shared.stop.store(false, Ordering::Release);
        let wake = critical_section::with(|cs| self.shared.scheduler.borrow(cs).borrow_mut().start(now));
        if wake == Wake::Complete {
            #[cfg(feature = "log")]
            debug!("no pending animation steps, animator stopped");
            self.sink = Some(sink);
            return Ok(());
        }

        let (wakeup, wakeup_rx) = channel::bounded(1);
        let (done_tx, done) = channel::bounded(0);
        let shared = Arc::clone(&self.shared);
        let leds = self.leds;

        self.shared.running.store(true, Ordering::Release);
        let handle = thread::spawn(move || {
            let result = Self::run(&shared, leds, sink, wake, &wakeup_rx);
            shared.running.store(false, Ordering::Release);
            drop(done_tx);
            result
        });

        self.worker = Some(Worker {
            wakeup,
            done,
            handle,
        });
        Ok(())
    }

    /// Request the scheduler to stop
    ///
    /// A tick in progress is finished, no further ticks are scheduled.
    pub fn stop(&self) {
        self.shared.stop.store(true, Ordering::Release);
        if let Some(worker) = &self.worker {
            let _ = worker.wakeup.try_send(());
        }
    }

    /// Block until the scheduler thread exits or `timeout` elapses
    ///
    /// A timeout is reported but the scheduler is left running. Once the
    /// thread exited the device sink is available again through
    /// [`Animator::sink_mut`].
    pub fn wait_for_termination(
        &mut self,
        timeout: Duration,
    ) -> Result<Termination, AnimatorError<S::Error>> {
        let Some(worker) = self.worker.take() else {
            return Ok(Termination::Finished);
        };

        match worker.done.recv_timeout(to_std(timeout)) {
            Err(RecvTimeoutError::Timeout) => {
                #[cfg(feature = "log")]
                warn!(
                    "timed out after {}ms waiting for animator termination",
                    timeout.as_millis()
                );
                self.worker = Some(worker);
                Ok(Termination::TimedOut)
            }
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                self.join(worker)?;
                Ok(Termination::Finished)
            }
        }
    }

    /// Device sink, unless the scheduler thread currently owns it
    pub fn sink_mut(&mut self) -> Option<&mut S> {
        self.sink.as_mut()
    }

    /// Stop the animator and take the device sink back
    pub fn into_sink(mut self) -> Option<S> {
        self.shutdown();
        self.sink.take()
    }

    fn join(&mut self, worker: Worker<S>) -> Result<(), AnimatorError<S::Error>> {
        let (sink, result) = match worker.handle.join() {
            Ok(output) => output,
            Err(panic) => std::panic::resume_unwind(panic),
        };
        self.sink = Some(sink);
        result.map_err(AnimatorError::Device)
    }

    fn shutdown(&mut self) {
        self.stop();
        if let Some(worker) = self.worker.take() {
            let _ = self.join(worker);
        }
    }

    /// Scheduler thread body
    fn run(
        shared: &Shared,
        leds: &LedRegistry,
        mut sink: S,
        mut wake: Wake,
        wakeup: &Receiver<()>,
    ) -> WorkerResult<S> {
        let result = loop {
            let Wake::After(delay) = wake else {
                #[cfg(feature = "log")]
                debug!("all animations complete");
                break Ok(());
            };

            #[cfg(feature = "log")]
            trace!("next step in {}ms", delay.as_millis());

            if delay > Duration::from_ticks(0) {
                match wakeup.recv_timeout(to_std(delay)) {
                    Err(RecvTimeoutError::Timeout) => {}
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break Ok(()),
                }
            }
            if shared.stop.load(Ordering::Acquire) {
                break Ok(());
            }

            let now = Instant::now();
            let frame =
                critical_section::with(|cs| shared.scheduler.borrow(cs).borrow_mut().step(now, leds));

            if let Err(err) = frame.commit(&mut sink) {
                #[cfg(feature = "log")]
                error!("animation commit failed, stopping animator: {:?}", err);
                break Err(err);
            }

            wake = critical_section::with(|cs| shared.scheduler.borrow(cs).borrow().next_wake(now));
        };

        #[cfg(feature = "log")]
        debug!("animator stopped");
        (sink, result)
    }
}

impl<S> Drop for Animator<S>
where
    S: DeviceSink + Send + 'static,
    S::Error: Send + 'static,
{
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn to_std(duration: Duration) -> std::time::Duration {
    std::time::Duration::from_micros(duration.as_micros())
}
