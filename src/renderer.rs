use crate::config::{GRID_COLOR, PROJECTILE_COLOR};
use crate::entities::{Bounds, Enemy, GameState, ParticleSystem, Player, PowerUps};
use crate::input::Joystick;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style, Stylize},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Block, Borders, Clear, Paragraph,
        canvas::{Canvas, Circle, Context, Line as CanvasLine, Points},
    },
};

/// Below this radius an object is drawn as a dot rather than a ring.
const DOT_RADIUS: f32 = 8.0;

/// Read-only snapshot of everything the renderer needs for one frame
pub struct RenderView<'a> {
    pub game_state: GameState,
    pub player: &'a Player,
    pub enemies: &'a [Enemy],
    pub particles: &'a ParticleSystem,
    pub power_ups: PowerUps,
    pub joystick: &'a Joystick,
    pub joystick_radius: f32,
    pub score: u32,
    pub bounds: Bounds,
    pub fps: u32,
}

/// Draws the playfield with braille canvas shapes. World y grows downward,
/// canvas y grows upward, so every y is flipped against the bounds height.
pub struct GameRenderer {
    grid_scroll: f32,
    grid_spacing: f32,
    grid_scroll_speed: f32,
}

impl GameRenderer {
    pub fn new(grid_spacing: f32, grid_scroll_speed: f32) -> Self {
        Self {
            grid_scroll: 0.0,
            grid_spacing,
            grid_scroll_speed,
        }
    }

    pub fn grid_scroll(&self) -> f32 {
        self.grid_scroll
    }

    /// Draws one frame. Only the grid scroll counter changes.
    pub fn render(&mut self, frame: &mut Frame, view: &RenderView) {
        let area = frame.area();
        self.clear(frame, area);

        self.grid_scroll = (self.grid_scroll + self.grid_scroll_speed) % self.grid_spacing;
        let scroll = self.grid_scroll;
        let spacing = self.grid_spacing;
        let bounds = view.bounds;

        let canvas = Canvas::default()
            .marker(Marker::Braille)
            .background_color(Color::Black)
            .x_bounds([0.0, bounds.width as f64])
            .y_bounds([0.0, bounds.height as f64])
            .paint(|ctx| {
                draw_background(ctx, bounds, spacing, scroll);
                ctx.layer();
                draw_particles(ctx, bounds, view.particles);
                draw_enemies(ctx, bounds, view.enemies);
                draw_player(ctx, bounds, view.player);
                if view.game_state == GameState::Running {
                    draw_joystick(ctx, bounds, view.joystick, view.joystick_radius);
                }
            });
        frame.render_widget(canvas, area);

        self.draw_hud(frame, view);
        if view.game_state == GameState::GameOver {
            self.draw_game_over(frame, view.score);
        }
    }

    pub fn clear(&self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Clear, area);
    }

    /// Score, level, xp and held power-ups along the top row.
    fn draw_hud(&self, frame: &mut Frame, view: &RenderView) {
        let area = frame.area();
        let powers: Vec<&str> = view.power_ups.active().map(|p| p.get_name()).collect();
        let powers = if powers.is_empty() {
            "-".to_string()
        } else {
            powers.join(", ")
        };

        let stats = Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{}", view.score),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  Level: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{}", view.player.level),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  XP: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{:.0}/{:.0}", view.player.xp, view.player.xp_to_next_level),
                Style::default().fg(Color::White),
            ),
            Span::styled("  Power: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                powers,
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  FPS: ", Style::default().fg(Color::DarkGray)),
            Span::styled(format!("{}", view.fps), Style::default().fg(Color::White)),
        ]);

        let stats_area = Rect {
            x: area.x + 1,
            y: area.y,
            width: area.width.saturating_sub(2),
            height: 1u16.min(area.height),
        };
        frame.render_widget(Paragraph::new(stats), stats_area);

        let controls = Line::from(vec![Span::styled(
            "[Drag mouse / WASD: Move] [Q: Quit]",
            Style::default().fg(Color::DarkGray),
        )]);
        let controls_area = Rect {
            x: area.x + 1,
            y: area.y + area.height.saturating_sub(1),
            width: area.width.saturating_sub(2),
            height: 1u16.min(area.height),
        };
        frame.render_widget(Paragraph::new(controls).centered(), controls_area);
    }

    pub fn draw_game_over(&self, frame: &mut Frame, score: u32) {
        let area = frame.area();
        let game_over_text = vec![
            Line::from(""),
            Line::from("GAME OVER!").centered().red().bold(),
            Line::from(""),
            Line::from(format!("Final Score: {}", score))
                .centered()
                .yellow()
                .bold(),
            Line::from(""),
            Line::from("Click or press any key to restart")
                .centered()
                .white(),
            Line::from("Press Q to quit").centered().white(),
        ];

        let width = 40u16.min(area.width);
        let height = 9u16.min(area.height);
        let box_area = Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + (area.height - height) / 2,
            width,
            height,
        };

        frame.render_widget(Clear, box_area);
        frame.render_widget(
            Paragraph::new(game_over_text)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Red)),
                )
                .alignment(Alignment::Center),
            box_area,
        );
    }
}

fn to_canvas(bounds: Bounds, x: f32, y: f32) -> (f64, f64) {
    (x as f64, (bounds.height - y) as f64)
}

fn draw_neon_circle(ctx: &mut Context, bounds: Bounds, x: f32, y: f32, radius: f32, color: Color) {
    let (cx, cy) = to_canvas(bounds, x, y);
    if radius <= DOT_RADIUS {
        ctx.draw(&Points {
            coords: &[(cx, cy)],
            color,
        });
    } else {
        ctx.draw(&Circle {
            x: cx,
            y: cy,
            radius: radius as f64,
            color,
        });
    }
}

pub fn draw_background(ctx: &mut Context, bounds: Bounds, spacing: f32, scroll: f32) {
    let mut x = scroll;
    while x < bounds.width {
        let (cx, _) = to_canvas(bounds, x, 0.0);
        ctx.draw(&CanvasLine {
            x1: cx,
            y1: 0.0,
            x2: cx,
            y2: bounds.height as f64,
            color: GRID_COLOR,
        });
        x += spacing;
    }

    let mut y = scroll;
    while y < bounds.height {
        let (_, cy) = to_canvas(bounds, 0.0, y);
        ctx.draw(&CanvasLine {
            x1: 0.0,
            y1: cy,
            x2: bounds.width as f64,
            y2: cy,
            color: GRID_COLOR,
        });
        y += spacing;
    }
}

pub fn draw_player(ctx: &mut Context, bounds: Bounds, player: &Player) {
    draw_neon_circle(ctx, bounds, player.pos.x, player.pos.y, player.radius, player.color);
    for projectile in &player.projectiles {
        draw_neon_circle(
            ctx,
            bounds,
            projectile.pos.x,
            projectile.pos.y,
            projectile.radius,
            PROJECTILE_COLOR,
        );
    }
}

pub fn draw_enemies(ctx: &mut Context, bounds: Bounds, enemies: &[Enemy]) {
    for enemy in enemies {
        draw_neon_circle(
            ctx,
            bounds,
            enemy.pos.x,
            enemy.pos.y,
            enemy.radius(),
            enemy.archetype().color,
        );
    }
}

pub fn draw_particles(ctx: &mut Context, bounds: Bounds, particles: &ParticleSystem) {
    for particle in particles.particles() {
        draw_neon_circle(
            ctx,
            bounds,
            particle.pos.x,
            particle.pos.y,
            particle.radius,
            fade(particle.color, particle.life),
        );
    }
}

/// Anchor ring and stick position while a drag is in progress.
pub fn draw_joystick(ctx: &mut Context, bounds: Bounds, joystick: &Joystick, radius: f32) {
    if !joystick.active {
        return;
    }
    let (ax, ay) = to_canvas(bounds, joystick.anchor.x, joystick.anchor.y);
    ctx.draw(&Circle {
        x: ax,
        y: ay,
        radius: radius as f64,
        color: Color::DarkGray,
    });
    let stick = joystick.anchor + joystick.stick;
    let (sx, sy) = to_canvas(bounds, stick.x, stick.y);
    ctx.draw(&Points {
        coords: &[(sx, sy)],
        color: Color::White,
    });
}

/// Scales an RGB color toward black by `alpha` in `[0, 1]`.
pub fn fade(color: Color, alpha: f32) -> Color {
    let alpha = alpha.clamp(0.0, 1.0);
    match color {
        Color::Rgb(r, g, b) => Color::Rgb(
            (r as f32 * alpha) as u8,
            (g as f32 * alpha) as u8,
            (b as f32 * alpha) as u8,
        ),
        other => other,
    }
}
