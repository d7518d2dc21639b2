//! Draw-call contract and scene composition
//!
//! `draw_scene` walks the registry in order and emits one draw call per
//! entity through the `Canvas` trait, converting physics positions into the
//! screen's pixel frame (Y flipped, meters scaled). The frontend decides what
//! a rectangle or a glyph actually looks like.

use glam::Vec2;

use crate::assets::TextureKey;
use crate::consts::HUD_TEXT_SIZE;
use crate::sim::{EntityKind, GamePhase, GameState};
use crate::{flip_y, meters_to_pixels, radians_to_degrees};

/// RGBA color, 8 bits per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const YELLOW: Color = Color {
        r: 255,
        g: 255,
        b: 0,
        a: 255,
    };
    pub const MAGENTA: Color = Color {
        r: 255,
        g: 0,
        b: 255,
        a: 255,
    };
}

/// Rendering backend supplied by the frontend. Positions and sizes are in
/// pixels; rotation is clockwise degrees.
pub trait Canvas {
    fn draw_rectangle(&mut self, center: Vec2, size: Vec2, rotation_deg: f32, texture: TextureKey);
    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn draw_text(&mut self, text: &str, position: Vec2, size_px: f32, color: Color);
}

/// Emit the frame's draw calls: every entity in registry order, then the HUD.
pub fn draw_scene(state: &GameState, canvas: &mut dyn Canvas) {
    for entity in state.entities.iter() {
        let Some(position) = state.physics.position(entity.body) else {
            log::warn!("render: {:?} record has no live body", entity.kind);
            continue;
        };
        let center = Vec2::new(
            meters_to_pixels(position.x),
            meters_to_pixels(flip_y(position.y)),
        );
        let size = Vec2::new(
            meters_to_pixels(entity.width),
            meters_to_pixels(entity.height),
        );

        match entity.kind {
            EntityKind::Ground => canvas.draw_rectangle(center, size, 0.0, TextureKey::Ground),
            EntityKind::StoneBlock => canvas.draw_rectangle(center, size, 0.0, TextureKey::Stone),
            EntityKind::Character => {
                let angle = state.physics.rotation(entity.body).unwrap_or(0.0);
                canvas.draw_rectangle(
                    center,
                    size,
                    radians_to_degrees(-angle),
                    TextureKey::Character,
                );
            }
            EntityKind::Coin => canvas.draw_circle(center, size.x / 2.0, Color::YELLOW),
        }
    }

    draw_hud(state, canvas);
}

fn draw_hud(state: &GameState, canvas: &mut dyn Canvas) {
    let camera = &state.camera;
    match state.banner() {
        Some(message) => {
            let y = if state.phase == GamePhase::Won { 420.0 } else { 220.0 };
            canvas.draw_text(
                &message,
                Vec2::new(camera.center.x - 550.0, y),
                HUD_TEXT_SIZE,
                Color::MAGENTA,
            );
        }
        None => canvas.draw_text(
            &state.score.to_string(),
            Vec2::new(camera.center.x, 220.0),
            HUD_TEXT_SIZE,
            Color::MAGENTA,
        ),
    }
}

/// A recorded draw call, for headless runs and tests.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Rectangle {
        center: Vec2,
        size: Vec2,
        rotation_deg: f32,
        texture: TextureKey,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    Text {
        text: String,
        position: Vec2,
        size_px: f32,
        color: Color,
    },
}

/// Canvas backend that records draw calls instead of rasterizing.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub commands: Vec<DrawCommand>,
}

impl Canvas for RecordingCanvas {
    fn draw_rectangle(&mut self, center: Vec2, size: Vec2, rotation_deg: f32, texture: TextureKey) {
        self.commands.push(DrawCommand::Rectangle {
            center,
            size,
            rotation_deg,
            texture,
        });
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn draw_text(&mut self, text: &str, position: Vec2, size_px: f32, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            position,
            size_px,
            color,
        });
    }
}
