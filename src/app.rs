use color_eyre::Result;
use ratatui::{Terminal, backend::Backend, layout::Size};
use std::time::{Duration, Instant};

use crate::config::{CELL_HEIGHT, CELL_WIDTH, GameConfig};
use crate::entities::Bounds;
use crate::input::{InputAction, InputManager};
use crate::renderer::{GameRenderer, RenderView};
use crate::session::{FrameReport, GameSession};

/// Sleep between frames, roughly 60 FPS once drawing is accounted for.
const FRAME_SLEEP: Duration = Duration::from_millis(16);

/// The main application which holds the state and logic of the application.
pub struct App {
    running: bool,
    session: GameSession,
    /// Monotonic origin for the simulation clock
    started: Instant,
    last_frame_time: Instant,
    fps: u32,
    /// internal components
    input_manager: InputManager,
    renderer: GameRenderer,
}

impl App {
    /// Construct a new instance of [`App`] for a terminal of `size` cells.
    pub fn new(config: &GameConfig, size: Size) -> Self {
        let now = Instant::now();
        Self {
            running: true,
            session: GameSession::new(config, bounds_for(size), 0),
            started: now,
            last_frame_time: now,
            fps: 0,
            input_manager: InputManager::new(config.joystick_max_radius, config.player_speed),
            renderer: GameRenderer::new(config.grid_spacing, config.grid_scroll_speed),
        }
    }

    fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    /// Run the application's main loop.
    pub fn run<B: Backend>(mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let mut rng = rand::rng();
        log::info!("Session started");

        while self.running {
            // Calculate FPS
            let now = Instant::now();
            let frame_time = now.duration_since(self.last_frame_time);
            self.last_frame_time = now;
            if frame_time.as_micros() > 0 {
                self.fps = (1_000_000 / frame_time.as_micros()) as u32;
            }

            self.session.resize(bounds_for(terminal.size()?));

            // Poll input events and get actions
            self.input_manager.poll_events(self.session.state)?;
            let actions = self.input_manager.take_actions();
            self.process_actions(&actions);

            self.session
                .player
                .steer(self.input_manager.velocity_intent());
            let report = self.session.update(self.now_ms(), &mut rng);
            self.log_report(&report);

            // Rendering happens every frame, running or not
            terminal.draw(|frame| {
                let view = RenderView {
                    game_state: self.session.state,
                    player: &self.session.player,
                    enemies: &self.session.enemies.enemies,
                    particles: &self.session.particles,
                    power_ups: self.session.power_ups,
                    joystick: self.input_manager.joystick(),
                    joystick_radius: self.session.config().joystick_max_radius,
                    score: self.session.score,
                    bounds: self.session.bounds(),
                    fps: self.fps,
                };
                self.renderer.render(frame, &view);
            })?;

            std::thread::sleep(FRAME_SLEEP);
        }
        Ok(())
    }

    /// Process input actions and update game state accordingly
    fn process_actions(&mut self, actions: &[InputAction]) {
        for action in actions {
            match action {
                InputAction::Quit => {
                    self.running = false;
                }
                InputAction::Restart => {
                    if self.session.restart(self.now_ms()) {
                        self.input_manager.reset();
                    }
                }
            }
        }
    }

    fn log_report(&self, report: &FrameReport) {
        if let Some(points) = report.scored {
            log::debug!("Scored {} (total {})", points, self.session.score);
        }
        if report.game_over {
            log::debug!("Run ended after {} ms", self.now_ms());
        }
    }
}

/// World size covered by a terminal of `size` cells.
pub fn bounds_for(size: Size) -> Bounds {
    Bounds::new(
        size.width as f32 * CELL_WIDTH,
        size.height as f32 * CELL_HEIGHT,
    )
}
