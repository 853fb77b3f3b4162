use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use glam::Vec2;
use std::time::Duration;

use crate::config::{CELL_HEIGHT, CELL_WIDTH};
use crate::entities::GameState;

/// One-shot actions produced by input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Restart,
    Quit,
}

/// Tracks the state of keys that can be held down for continuous input
#[derive(Debug, Default, Clone, PartialEq)]
struct KeyState {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
}

impl KeyState {
    fn direction(&self) -> Vec2 {
        let x = self.right as i8 - self.left as i8;
        let y = self.down as i8 - self.up as i8;
        Vec2::new(x as f32, y as f32).normalize_or_zero()
    }
}

/// Virtual joystick driven by a mouse drag.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Joystick {
    /// Where the drag started, in world units.
    pub anchor: Vec2,
    /// Stick offset from the anchor, at most `max_radius` long.
    pub stick: Vec2,
    pub active: bool,
}

/// Turns terminal events into a velocity intention plus one-shot actions.
/// Handlers only record state; the simulation reads it once per frame.
pub struct InputManager {
    key_state: KeyState,
    joystick: Joystick,
    max_radius: f32,
    player_speed: f32,
    oneshot_actions: Vec<InputAction>,
}

impl InputManager {
    pub fn new(max_radius: f32, player_speed: f32) -> Self {
        Self {
            key_state: KeyState::default(),
            joystick: Joystick::default(),
            max_radius,
            player_speed,
            oneshot_actions: Vec::new(),
        }
    }

    /// Polls for all input events and stores one-shot actions
    /// Should be called once per frame before taking actions
    pub fn poll_events(&mut self, game_state: GameState) -> color_eyre::Result<()> {
        self.oneshot_actions.clear();

        // Poll for all available events without blocking
        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(key_event) => self.handle_key_event(key_event, game_state),
                Event::Mouse(mouse_event) => self.handle_mouse_event(mouse_event, game_state),
                // Resize is picked up from the terminal size each frame
                _ => {}
            }
        }

        Ok(())
    }

    pub fn take_actions(&mut self) -> Vec<InputAction> {
        std::mem::take(&mut self.oneshot_actions)
    }

    pub fn handle_key_event(&mut self, key_event: KeyEvent, game_state: GameState) {
        match key_event.kind {
            KeyEventKind::Press => self.handle_key_press(key_event, game_state),
            KeyEventKind::Release => self.handle_key_release(key_event.code),
            _ => {}
        }
    }

    fn handle_key_press(&mut self, key_event: KeyEvent, game_state: GameState) {
        // Quit works in any state
        if matches!(
            key_event.code,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc
        ) || (key_event.code == KeyCode::Char('c')
            && key_event.modifiers.contains(KeyModifiers::CONTROL))
        {
            self.oneshot_actions.push(InputAction::Quit);
            return;
        }

        match game_state {
            // Any other key is a restart tap
            GameState::GameOver => {
                self.oneshot_actions.push(InputAction::Restart);
            }
            GameState::Running => match key_event.code {
                KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => {
                    self.key_state.up = true;
                    self.key_state.down = false;
                }
                KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => {
                    self.key_state.down = true;
                    self.key_state.up = false;
                }
                KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => {
                    self.key_state.left = true;
                    self.key_state.right = false;
                }
                KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => {
                    self.key_state.right = true;
                    self.key_state.left = false;
                }
                _ => {}
            },
        }
    }

    fn handle_key_release(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => {
                self.key_state.up = false;
            }
            KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => {
                self.key_state.down = false;
            }
            KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => {
                self.key_state.left = false;
            }
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => {
                self.key_state.right = false;
            }
            _ => {}
        }
    }

    pub fn handle_mouse_event(&mut self, mouse_event: MouseEvent, game_state: GameState) {
        let point = cell_to_world(mouse_event.column, mouse_event.row);
        match mouse_event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if game_state == GameState::GameOver {
                    self.oneshot_actions.push(InputAction::Restart);
                } else {
                    self.joystick = Joystick {
                        anchor: point,
                        stick: Vec2::ZERO,
                        active: true,
                    };
                }
            }
            MouseEventKind::Drag(MouseButton::Left) if self.joystick.active => {
                self.joystick.stick = (point - self.joystick.anchor).clamp_length_max(self.max_radius);
            }
            MouseEventKind::Up(MouseButton::Left) => self.release_joystick(),
            _ => {}
        }
    }

    fn release_joystick(&mut self) {
        self.joystick.active = false;
        self.joystick.stick = Vec2::ZERO;
    }

    pub fn joystick(&self) -> &Joystick {
        &self.joystick
    }

    /// Desired player velocity. An active drag overrides held keys.
    pub fn velocity_intent(&self) -> Vec2 {
        if self.joystick.active {
            self.joystick.stick / self.max_radius * self.player_speed
        } else {
            self.key_state.direction() * self.player_speed
        }
    }

    /// Drops held keys and any drag in progress.
    pub fn reset(&mut self) {
        self.key_state = KeyState::default();
        self.joystick = Joystick::default();
        self.oneshot_actions.clear();
    }
}

/// Center of a terminal cell, in world units.
pub fn cell_to_world(column: u16, row: u16) -> Vec2 {
    Vec2::new(
        (column as f32 + 0.5) * CELL_WIDTH,
        (row as f32 + 0.5) * CELL_HEIGHT,
    )
}
