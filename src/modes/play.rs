use anyhow::{Context, Result};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::interval;
use tracing::{debug, info};

use crate::clock::{ClockCommand, TickClock};
use crate::game::{GameEngine, Intent};
use crate::input::{InputHandler, KeyAction, Point, SwipeTracker};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

/// Approximate pixel size of a terminal cell, so swipe thresholds keep
/// their screen-unit meaning for mouse drags
const CELL_WIDTH_PX: f32 = 8.0;
const CELL_HEIGHT_PX: f32 = 16.0;

/// Interactive terminal session.
///
/// One task owns the engine; key presses, mouse drags and clock ticks are
/// all handled in turn from the same `select!` loop.
pub struct PlayMode {
    engine: GameEngine,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    swipe: SwipeTracker,
    clock: TickClock,
    should_quit: bool,
}

impl PlayMode {
    pub fn new(engine: GameEngine) -> Self {
        let swipe = SwipeTracker::new(engine.config().swipe_threshold);

        Self {
            engine,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            swipe,
            clock: TickClock::new(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // No tick may run after teardown
        self.clock.cancel();
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                // Game logic tick, only while armed
                _ = self.clock.tick() => {
                    self.on_tick();
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update();
                    let snapshot = self.engine.snapshot();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &snapshot, &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                info!("quitting");
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => {
                // Only process key press events, not release
                if key.kind != KeyEventKind::Press {
                    return;
                }

                match self.input_handler.handle_key_event(key) {
                    KeyAction::Intent(intent) => self.apply_intent(intent),
                    KeyAction::Quit => self.should_quit = true,
                    KeyAction::None => {}
                }
            }
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let point = Point::new(
            f32::from(mouse.column) * CELL_WIDTH_PX,
            f32::from(mouse.row) * CELL_HEIGHT_PX,
        );

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.swipe.begin(point),
            MouseEventKind::Up(MouseButton::Left) => {
                if let Some(gesture) = self.swipe.finish(point) {
                    debug!(?gesture, "gesture");
                    self.apply_intent(gesture.into_intent());
                }
            }
            _ => {}
        }
    }

    fn apply_intent(&mut self, intent: Intent) {
        let accepted = self.engine.handle_intent(intent);

        if accepted && intent == Intent::Start {
            self.metrics.on_game_start();
            self.clock.arm(self.engine.speed());
        }
    }

    fn on_tick(&mut self) {
        let outcome = self.engine.tick();

        let command =
            ClockCommand::after_tick(&outcome, self.engine.phase(), self.engine.speed());
        self.clock.apply(command);

        if outcome.phase_changed {
            self.metrics.on_game_over(self.engine.state().score);
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(
            terminal.backend_mut(),
            DisableMouseCapture,
            LeaveAlternateScreen
        )
        .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
