use std::ops::ControlFlow;
use std::time::{Duration, Instant};

use anyhow::Result;
use rand::{rngs::ThreadRng, Rng};

use crate::game::{GameState, RunState, Snapshot, Step};
use crate::snake::Direction;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Turn(Direction),
    Restart,
    Quit,
}

/// Periodic tick capability supplied by the host.
pub trait TickSource {
    fn start(&mut self);
    fn stop(&mut self);
    /// How long until the next tick is due. Zero if it already is.
    fn time_until_tick(&self) -> Duration;
    /// Consumes a due tick, if any.
    fn tick_due(&mut self) -> bool;
}

/// Directional and restart input supplied by the host.
pub trait InputSource {
    /// Waits at most `timeout` for the next command.
    fn next_command(&mut self, timeout: Duration) -> Result<Option<Command>>;
}

pub trait Renderer {
    fn draw(&mut self, view: &Snapshot<'_>) -> Result<()>;
}

impl<D: Renderer + ?Sized> Renderer for &mut D {
    fn draw(&mut self, view: &Snapshot<'_>) -> Result<()> {
        (**self).draw(view)
    }
}

pub struct GameLoop<T, I, D, R = ThreadRng> {
    state: GameState<R>,
    ticker: T,
    input: I,
    display: D,
}

impl<T, I, D, R> GameLoop<T, I, D, R>
where
    T: TickSource,
    I: InputSource,
    D: Renderer,
    R: Rng,
{
    pub fn new(state: GameState<R>, ticker: T, input: I, display: D) -> Self {
        GameLoop { state, ticker, input, display }
    }

    pub fn state(&self) -> &GameState<R> {
        &self.state
    }

    pub fn run(&mut self) -> Result<()> {
        self.ticker.start();
        self.redraw()?;

        loop {
            let timeout = self.ticker.time_until_tick();
            if let Some(command) = self.input.next_command(timeout)? {
                if self.on_command(command)?.is_break() {
                    return Ok(());
                }
            }

            if self.ticker.tick_due() {
                self.on_tick()?;
            }
        }
    }

    pub fn on_tick(&mut self) -> Result<()> {
        if self.state.run_state() == RunState::Running && self.state.advance() == Step::Crashed {
            self.ticker.stop();
        }

        self.redraw()
    }

    pub fn on_command(&mut self, command: Command) -> Result<ControlFlow<()>> {
        match command {
            Command::Turn(direction) => self.state.set_heading(direction),
            // Only honored once the game is over
            Command::Restart if self.state.run_state() == RunState::Terminated => {
                self.state.restart();
                self.ticker.start();
                self.redraw()?;
            }
            Command::Restart => {}
            Command::Quit => return Ok(ControlFlow::Break(())),
        }

        Ok(ControlFlow::Continue(()))
    }

    fn redraw(&mut self) -> Result<()> {
        self.display.draw(&self.state.snapshot())
    }
}

/// Wall-clock ticker firing at a fixed interval.
pub struct FixedTicker {
    interval: Duration,
    next: Option<Instant>,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        FixedTicker { interval, next: None }
    }
}

impl TickSource for FixedTicker {
    fn start(&mut self) {
        self.next = Some(Instant::now() + self.interval);
    }

    fn stop(&mut self) {
        self.next = None;
    }

    fn time_until_tick(&self) -> Duration {
        match self.next {
            Some(next) => next.saturating_duration_since(Instant::now()),
            // Stopped: input still gets polled in interval-sized waits
            None => self.interval,
        }
    }

    fn tick_due(&mut self) -> bool {
        let now = Instant::now();
        match self.next {
            Some(next) if now >= next => {
                let following = next + self.interval;
                self.next = Some(if following > now { following } else { now + self.interval });
                true
            }
            _ => false,
        }
    }
}
