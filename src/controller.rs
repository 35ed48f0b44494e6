//! Suspension points that turn plain sorting code into a pausable, steppable,
//! stoppable process.
//!
//! Engines only ever see the [`Suspend`] trait. The session hands them a shared
//! [`Controller`] and keeps a second handle for the commands coming from the UI
//! (pause, stop, step advance, speed changes). All waits are condvar based, so a
//! command wakes the engine immediately instead of at the next poll.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::session::Mode;
use crate::util::delay_from_speed;

/// Returned from a suspension point once a stop has been requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stopped;

/// Outcome of a suspension point. `Err(Stopped)` unwinds the engine with `?`.
pub type Flow = Result<(), Stopped>;

pub trait Suspend {
    /// Must be called before any observable mutation.
    fn checkpoint(&self) -> Flow;

    /// Timed wait in auto mode, wait for one step signal in step mode.
    fn paced_delay(&self) -> Flow;

    /// Blocks while the pause flag is set.
    fn await_pause(&self) -> Flow;
}

#[derive(Debug)]
struct Control {
    mode: Mode,
    speed: u8,
    paused: bool,
    stopped: bool,
    step_pending: bool,
    awaiting_step: bool,
}

impl Control {
    fn flow(&self) -> Flow {
        if self.stopped {
            Err(Stopped)
        } else {
            Ok(())
        }
    }
}

#[derive(Debug)]
pub struct Controller {
    control: Mutex<Control>,
    wake: Condvar,
    delay_unit: Duration,
}

impl Controller {
    pub fn new(mode: Mode, speed: u8, delay_unit: Duration) -> Self {
        Self {
            control: Mutex::new(Control {
                mode,
                speed,
                paused: false,
                stopped: false,
                step_pending: false,
                awaiting_step: false,
            }),
            wake: Condvar::new(),
            delay_unit,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Control> {
        self.control.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Latched: once set, every suspension point returns `Err(Stopped)`.
    pub fn request_stop(&self) {
        let mut control = self.lock();
        control.stopped = true;
        control.awaiting_step = false;
        self.wake.notify_all();
    }

    /// Releases a pending step wait. A no-op unless the engine is currently parked
    /// on one, so at most one advance is ever outstanding.
    pub fn advance_step(&self) -> bool {
        let mut control = self.lock();
        if !control.awaiting_step || control.step_pending || control.stopped {
            return false;
        }
        control.step_pending = true;
        control.awaiting_step = false;
        self.wake.notify_all();
        true
    }

    pub fn set_paused(&self, paused: bool) {
        self.lock().paused = paused;
        self.wake.notify_all();
    }

    /// Applies from the next paced delay on.
    pub fn set_speed(&self, speed: u8) {
        self.lock().speed = speed;
    }

    pub fn is_paused(&self) -> bool {
        self.lock().paused
    }

    pub fn is_awaiting_step(&self) -> bool {
        self.lock().awaiting_step
    }
}

impl Suspend for Controller {
    fn checkpoint(&self) -> Flow {
        self.lock().flow()
    }

    fn paced_delay(&self) -> Flow {
        let mut control = self.lock();
        control.flow()?;

        let mode = control.mode;
        match mode {
            Mode::Auto => {
                let wait = self.delay_unit * delay_from_speed(control.speed);
                let (control, _) = self
                    .wake
                    .wait_timeout_while(control, wait, |c| !c.stopped)
                    .unwrap_or_else(PoisonError::into_inner);
                control.flow()
            }
            Mode::Step => {
                control.awaiting_step = true;
                let mut control = self
                    .wake
                    .wait_while(control, |c| !c.step_pending && !c.stopped)
                    .unwrap_or_else(PoisonError::into_inner);
                control.step_pending = false;
                control.awaiting_step = false;
                control.flow()
            }
        }
    }

    fn await_pause(&self) -> Flow {
        let control = self
            .wake
            .wait_while(self.lock(), |c| c.paused && !c.stopped)
            .unwrap_or_else(PoisonError::into_inner);
        control.flow()
    }
}

/// Never waits and never stops. Drives a run straight through.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unpaced;

impl Suspend for Unpaced {
    fn checkpoint(&self) -> Flow {
        Ok(())
    }

    fn paced_delay(&self) -> Flow {
        Ok(())
    }

    fn await_pause(&self) -> Flow {
        Ok(())
    }
}
