use crate::runtime::command::Command;
use crate::runtime::effect::Effect;
use crate::runtime::event::AppEvent;
use crate::runtime::key_bindings::KeyBindings;
use crate::runtime::reducer::Reducer;
use crate::runtime::scheduler::Scheduler;
use crate::state::AppState;
use crate::terminal::{Terminal, TerminalEvent};
use std::io;
use std::time::{Duration, Instant};
use tracing::{debug, info};

const IDLE_POLL: Duration = Duration::from_millis(120);

pub struct Runtime {
    state: AppState,
    terminal: Terminal,
    scheduler: Scheduler,
    key_bindings: KeyBindings,
}

impl Runtime {
    pub fn new(state: AppState, terminal: Terminal) -> Self {
        Self::with_key_bindings(state, terminal, KeyBindings::new())
    }

    pub fn with_key_bindings(
        state: AppState,
        terminal: Terminal,
        key_bindings: KeyBindings,
    ) -> Self {
        Self {
            state,
            terminal,
            scheduler: Scheduler::new(),
            key_bindings,
        }
    }

    /// Runs until exit and hands the final state back.
    pub fn run(mut self) -> io::Result<AppState> {
        self.terminal.enter()?;
        info!("header started");

        let run_result = (|| -> io::Result<()> {
            self.render()?;

            while !self.state.should_exit() {
                for event in self.scheduler.drain_ready(Instant::now()) {
                    self.dispatch(event)?;
                }

                let timeout = self.scheduler.poll_timeout(Instant::now(), IDLE_POLL);
                let event = self.terminal.poll_event(timeout)?;
                self.dispatch(AppEvent::Terminal(event))?;
            }

            Ok(())
        })();

        let exit_result = self.terminal.exit();
        info!("header stopped");
        run_result.and(exit_result)?;
        Ok(self.state)
    }

    fn dispatch(&mut self, event: AppEvent) -> io::Result<()> {
        match event {
            AppEvent::Terminal(TerminalEvent::Resize(size)) => {
                self.terminal.set_size(size);
                self.render()
            }
            AppEvent::Terminal(TerminalEvent::Key(key)) => {
                let command = self
                    .key_bindings
                    .resolve(key)
                    .unwrap_or(Command::InputKey(key));
                self.process(command)
            }
            AppEvent::Terminal(TerminalEvent::Mouse(mouse)) => {
                self.process(Command::Pointer(mouse))
            }
            AppEvent::Terminal(TerminalEvent::Tick) => self.process(Command::Tick),
            AppEvent::Command(command) => self.process(command),
        }
    }

    fn process(&mut self, command: Command) -> io::Result<()> {
        if !matches!(command, Command::Tick | Command::Pointer(_)) {
            debug!(?command, "command");
        }
        let effects = Reducer::reduce(&mut self.state, command);
        self.apply_effects(effects)
    }

    fn apply_effects(&mut self, effects: Vec<Effect>) -> io::Result<()> {
        let mut render_requested = false;

        for effect in effects {
            match effect {
                Effect::Schedule(cmd) => {
                    self.scheduler.schedule(cmd, Instant::now());
                }
                Effect::RequestRender => {
                    render_requested = true;
                }
            }
        }

        if render_requested {
            self.render()?;
        }

        Ok(())
    }

    fn render(&mut self) -> io::Result<()> {
        let view = self.state.view();
        self.terminal.render_frame(&view.frame)
    }
}
