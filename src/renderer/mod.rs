//! Canvas2D presentation
//!
//! Draws read-only snapshots of the simulation; the sim never calls back in.
//! World entities are offset by the camera, HUD and overlays are drawn in
//! screen space.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::Settings;
use crate::consts::*;
use crate::sim::{Adversary, BlockKind, GamePhase, GameState, Palette, Particle, ParticleClass};

const SKY: &str = "#6B8CFF";
const EARTH: &str = "#94552C";
const PIPE_GREEN: &str = "#2E8B57";
const BONUS_GOLD: &str = "#E9B44C";

/// Rainbow hues for kill/hurt particles
const RAINBOW: [&str; 10] = [
    "#FF0000", "#FF7F00", "#FFFF00", "#00FF00", "#0000FF", "#4B0082", "#9400D3", "#FF69B4",
    "#00FFFF", "#FFD700",
];

/// Green hues for heal particles
const HEAL_GREENS: [&str; 6] = [
    "#00FF00", "#7FFF00", "#98FB98", "#32CD32", "#00FA9A", "#90EE90",
];

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { ctx })
    }

    /// Paint one frame. `time_ms` drives cosmetic wobbles only.
    pub fn draw(
        &self,
        state: &GameState,
        settings: &Settings,
        top_score: u64,
        fps: u32,
        time_ms: f64,
    ) {
        self.ctx.set_fill_style_str(SKY);
        self.ctx.fill_rect(0.0, 0.0, VIEW_W as f64, VIEW_H as f64);

        match state.phase {
            GamePhase::Splash => self.draw_splash(time_ms),
            GamePhase::Playing | GamePhase::GameOver => {
                self.draw_world(state);
                self.draw_hud(state, settings, top_score, fps);
                if state.phase == GamePhase::GameOver {
                    self.draw_game_over(state, time_ms);
                }
            }
        }
    }

    fn draw_world(&self, state: &GameState) {
        let cam = state.camera_x as f64;

        for block in &state.blocks {
            let color = match block.kind {
                BlockKind::Ground | BlockKind::Platform => EARTH,
                BlockKind::Pipe => PIPE_GREEN,
                BlockKind::Bonus => BONUS_GOLD,
            };
            self.ctx.set_fill_style_str(color);
            self.ctx.fill_rect(
                block.rect.x as f64 - cam,
                block.rect.y as f64,
                block.rect.w as f64,
                block.rect.h as f64,
            );
        }

        for adversary in &state.adversaries {
            self.draw_adversary(adversary, cam);
        }

        // Invulnerability flicker: translucent every other stretch of ticks
        let flicker = state.player.is_invulnerable() && (state.time_ticks / 6) % 2 == 0;
        self.ctx
            .set_fill_style_str(if flicker { "rgba(255, 0, 0, 0.5)" } else { "#FF0000" });
        let p = state.player.body.rect;
        self.ctx
            .fill_rect(p.x as f64 - cam, p.y as f64, p.w as f64, p.h as f64);

        for particle in state.particles.particles() {
            self.draw_particle(particle, cam);
        }
    }

    fn draw_adversary(&self, adversary: &Adversary, cam: f64) {
        if adversary.dead {
            return;
        }
        let r = adversary.body.rect;
        let color = match adversary.params.palette {
            Palette::Crimson => "#8B0000",
            Palette::Magenta => "#FF00FF",
        };
        self.ctx.set_fill_style_str(color);
        self.ctx
            .fill_rect(r.x as f64 - cam, r.y as f64, r.w as f64, r.h as f64);

        // Direction marker on the leading edge
        let facing_right = adversary.body.vel.x > 0.0;
        self.ctx
            .set_fill_style_str(if facing_right { "#FFF" } else { "#000" });
        let marker_x = if facing_right { r.right() - 8.0 } else { r.x };
        self.ctx
            .fill_rect(marker_x as f64 - cam, r.y as f64 + 8.0, 8.0, 8.0);

        // Leapers wear a little crest
        if adversary.special {
            self.ctx.set_fill_style_str("#FFFF00");
            self.ctx.begin_path();
            let cx = (r.x + r.w / 2.0) as f64 - cam;
            self.ctx.move_to(cx, r.y as f64);
            self.ctx.line_to(cx - 5.0, r.y as f64 - 8.0);
            self.ctx.line_to(cx + 5.0, r.y as f64 - 8.0);
            self.ctx.close_path();
            self.ctx.fill();
        }
    }

    fn draw_particle(&self, particle: &Particle, cam: f64) {
        let color = match particle.class {
            ParticleClass::Heal => HEAL_GREENS[particle.hue as usize % HEAL_GREENS.len()],
            _ => RAINBOW[particle.hue as usize % RAINBOW.len()],
        };
        self.ctx.set_fill_style_str(color);
        self.ctx.set_global_alpha(particle.life.clamp(0.0, 1.0) as f64);
        let half = (particle.size / 2.0) as f64;
        self.ctx.fill_rect(
            particle.pos.x as f64 - cam - half,
            particle.pos.y as f64 - half,
            particle.size as f64,
            particle.size as f64,
        );
        self.ctx.set_global_alpha(1.0);
    }

    fn draw_hud(&self, state: &GameState, settings: &Settings, top_score: u64, fps: u32) {
        self.ctx.set_font("20px monospace");
        self.ctx.set_text_align("left");
        self.ctx.set_fill_style_str("rgba(0, 0, 0, 0.5)");
        let _ = self
            .ctx
            .fill_text(&format!("SCORE: {}", state.score), 22.0, 42.0);
        let _ = self.ctx.fill_text(&format!("TOP: {top_score}"), 22.0, 82.0);
        self.ctx.set_fill_style_str("#FFFFFF");
        let _ = self
            .ctx
            .fill_text(&format!("SCORE: {}", state.score), 20.0, 40.0);
        let _ = self.ctx.fill_text(&format!("TOP: {top_score}"), 20.0, 80.0);

        if settings.show_fps {
            let _ = self.ctx.fill_text(&format!("FPS: {fps}"), 20.0, 120.0);
        }

        self.draw_hearts(state.player.health);
        self.draw_slash_bar(state);
    }

    /// Three hearts, two hit points each
    fn draw_hearts(&self, health: u8) {
        let size = 32.0;
        let spacing = 40.0;
        let start_x = VIEW_W as f64 - (spacing * 3.0 + 20.0);
        let y = 20.0;

        for i in 0..3u8 {
            let remaining = health.saturating_sub(i * 2).min(2);
            self.heart_path(start_x + spacing * i as f64, y, size);
            match remaining {
                0 => {
                    self.ctx.set_fill_style_str("#333333");
                    self.ctx.fill();
                }
                1 => {
                    self.ctx.set_fill_style_str("#FF0000");
                    self.ctx.set_global_alpha(0.5);
                    self.ctx.fill();
                    self.ctx.set_global_alpha(1.0);
                }
                _ => {
                    self.ctx.set_fill_style_str("#FF0000");
                    self.ctx.fill();
                }
            }
            self.ctx.set_stroke_style_str("#000000");
            self.ctx.set_line_width(2.0);
            self.ctx.stroke();
        }
    }

    fn heart_path(&self, x: f64, y: f64, size: f64) {
        let c = &self.ctx;
        c.begin_path();
        c.move_to(x + size / 2.0, y + size / 4.0);
        c.bezier_curve_to(x + size / 2.0, y, x, y, x, y + size / 4.0);
        c.bezier_curve_to(x, y + size / 2.0, x + size / 2.0, y + size, x + size / 2.0, y + size);
        c.bezier_curve_to(x + size / 2.0, y + size, x + size, y + size / 2.0, x + size, y + size / 4.0);
        c.bezier_curve_to(x + size, y, x + size / 2.0, y, x + size / 2.0, y + size / 4.0);
        c.close_path();
    }

    fn draw_slash_bar(&self, state: &GameState) {
        let bar_w = 120.0;
        let bar_h = 10.0;
        let x = VIEW_W as f64 - (bar_w + 20.0);
        let y = 70.0;

        self.ctx.set_fill_style_str("#333333");
        self.ctx.fill_rect(x, y, bar_w, bar_h);

        let energy = state.player.slash_energy;
        let full = energy >= MAX_SLASH_ENERGY;
        // Blink while the charge is ready
        let visible = !full || (state.time_ticks / 12) % 2 == 0;
        if visible {
            self.ctx.set_fill_style_str("#00FF00");
            self.ctx
                .fill_rect(x, y, (energy / MAX_SLASH_ENERGY) as f64 * bar_w, bar_h);
        }

        self.ctx.set_stroke_style_str("#FFFFFF");
        self.ctx.set_line_width(2.0);
        self.ctx.stroke_rect(x, y, bar_w, bar_h);
    }

    fn draw_splash(&self, time_ms: f64) {
        // Pixel stars behind everything
        self.ctx.set_fill_style_str("#FFE5A9");
        for (x, y) in [
            (100.0, 100.0),
            (700.0, 150.0),
            (200.0, 500.0),
            (600.0, 450.0),
            (150.0, 300.0),
            (650.0, 350.0),
        ] {
            self.ctx.fill_rect(x, y, 4.0, 4.0);
            self.ctx.fill_rect(x - 2.0, y, 8.0, 2.0);
            self.ctx.fill_rect(x, y - 2.0, 2.0, 8.0);
        }

        let cx = VIEW_W as f64 / 2.0;
        let bounce = (time_ms * 0.005).sin() * 10.0;

        self.ctx.set_font("48px monospace");
        self.ctx.set_text_align("center");
        self.ctx.set_fill_style_str("rgba(0, 0, 0, 0.5)");
        let _ = self
            .ctx
            .fill_text("RIFT RUNNER", cx + 4.0, VIEW_H as f64 / 3.0 + bounce + 4.0);
        self.ctx.set_fill_style_str("#FFFFFF");
        let _ = self
            .ctx
            .fill_text("RIFT RUNNER", cx, VIEW_H as f64 / 3.0 + bounce);

        self.ctx.set_font("18px monospace");
        let controls_y = VIEW_H as f64 / 2.0;
        self.ctx.set_fill_style_str("rgba(0, 0, 0, 0.3)");
        self.ctx.fill_rect(cx - 250.0, controls_y - 30.0, 500.0, 160.0);
        self.ctx.set_fill_style_str("#FFFFFF");
        let _ = self.ctx.fill_text("CONTROLS", cx, controls_y);
        let _ = self.ctx.fill_text("ARROWS  MOVE", cx, controls_y + 40.0);
        let _ = self.ctx.fill_text("SPACE   JUMP", cx, controls_y + 75.0);
        let _ = self.ctx.fill_text("X       SLASH", cx, controls_y + 110.0);

        let prompt_bounce = (time_ms * 0.003).sin() * 5.0;
        self.ctx.set_font("20px monospace");
        self.ctx.set_fill_style_str("#FFFF00");
        let _ = self
            .ctx
            .fill_text("PRESS SPACE TO START", cx, VIEW_H as f64 - 80.0 + prompt_bounce);
    }

    fn draw_game_over(&self, state: &GameState, time_ms: f64) {
        self.ctx.set_fill_style_str("rgba(0, 0, 0, 0.7)");
        self.ctx.fill_rect(0.0, 0.0, VIEW_W as f64, VIEW_H as f64);

        let cx = VIEW_W as f64 / 2.0;
        let cy = VIEW_H as f64 / 2.0;

        self.ctx.set_font("56px monospace");
        self.ctx.set_text_align("center");
        self.ctx.set_fill_style_str("#FF0000");
        let _ = self.ctx.fill_text("GAME OVER", cx, cy);

        self.ctx.set_font("20px monospace");
        self.ctx.set_fill_style_str("#FFFFFF");
        let _ = self
            .ctx
            .fill_text(&format!("SCORE: {}", state.score), cx, cy + 50.0);
        let bounce = (time_ms * 0.005).sin() * 5.0;
        let _ = self
            .ctx
            .fill_text("PRESS SPACE TO RESTART", cx, cy + 100.0 + bounce);
    }
}
