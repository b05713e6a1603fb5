//! Scene building
//!
//! Turns the orchestrator's read-only view into flat lists of draw commands
//! in playfield units. Backends only paint; they never look at game state.

use glam::Vec2;

use crate::game::{Game, Stage};
use crate::settings::Settings;
use crate::sim::{
    GameOverCause, Goal, LevelConfig, LevelId, LevelPhase, LevelState, Movement, ObstacleKind,
    Rect, Snapshot,
};

/// RGBA, each channel in 0.0 - 1.0
pub type Color = [f32; 4];

pub mod palette {
    use super::Color;

    pub const ROAD: Color = [0.22, 0.22, 0.24, 1.0];
    pub const LANE_MARK: Color = [0.95, 0.95, 0.85, 0.6];
    pub const BLOCKED_LANE: Color = [0.85, 0.1, 0.1, 0.35];
    pub const PLATFORM: Color = [0.55, 0.5, 0.62, 1.0];
    pub const TRAIN: Color = [0.56, 0.14, 0.67, 1.0];
    pub const DOOR: Color = [1.0, 0.84, 0.0, 1.0];
    pub const DOOR_LIT: Color = [1.0, 1.0, 1.0, 1.0];
    pub const STADIUM: Color = [0.1, 0.45, 0.2, 1.0];
    pub const PITCH: Color = [0.8, 0.7, 0.45, 1.0];
    pub const TROPHY: Color = [1.0, 0.8, 0.1, 1.0];
    pub const PLAYER: Color = [0.9, 0.1, 0.2, 1.0];
    pub const RAIN: Color = [0.68, 0.85, 0.9, 1.0];
    pub const TEXT: Color = [1.0, 1.0, 1.0, 1.0];
    pub const SHADE: Color = [0.0, 0.0, 0.0, 0.65];
    pub const BAR_TRACK: Color = [0.2, 0.2, 0.2, 0.8];
    pub const BAR_FILL: Color = [0.0, 0.75, 0.68, 1.0];
    pub const HIGH_CONTRAST_PLAYER: Color = [1.0, 1.0, 0.0, 1.0];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Rect {
        rect: Rect,
        color: Color,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Color,
    },
    Text {
        pos: Vec2,
        text: String,
        size: f32,
        align: TextAlign,
        color: Color,
    },
}

/// Everything needed to paint one frame, back to front
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub size: Vec2,
    pub background: Color,
    /// Playfield scenery and entities
    pub world: Vec<DrawCmd>,
    /// Decorative effects (rain)
    pub effects: Vec<DrawCmd>,
    /// HUD and overlays
    pub hud: Vec<DrawCmd>,
}

impl Scene {
    fn new(size: Vec2, background: Color) -> Self {
        Self {
            size,
            background,
            world: Vec::new(),
            effects: Vec::new(),
            hud: Vec::new(),
        }
    }

    /// All commands in paint order
    pub fn commands(&self) -> impl Iterator<Item = &DrawCmd> {
        self.world.iter().chain(&self.effects).chain(&self.hud)
    }

    /// Every string drawn in the frame
    pub fn texts(&self) -> Vec<&str> {
        self.commands()
            .filter_map(|cmd| match cmd {
                DrawCmd::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn rect(layer: &mut Vec<DrawCmd>, min: Vec2, size: Vec2, color: Color) {
        layer.push(DrawCmd::Rect {
            rect: Rect::new(min, size),
            color,
        });
    }

    fn text(layer: &mut Vec<DrawCmd>, pos: Vec2, text: impl Into<String>, size: f32, align: TextAlign) {
        layer.push(DrawCmd::Text {
            pos,
            text: text.into(),
            size,
            align,
            color: palette::TEXT,
        });
    }

    fn shade(&mut self) {
        Self::rect(&mut self.hud, Vec2::ZERO, self.size, palette::SHADE);
    }

    fn banner(&mut self, lines: &[(&str, f32)]) {
        self.shade();
        let mut y = self.size.y / 2.0 - 40.0 * (lines.len() as f32 - 1.0) / 2.0;
        for (line, size) in lines {
            Self::text(
                &mut self.hud,
                Vec2::new(self.size.x / 2.0, y),
                *line,
                *size,
                TextAlign::Center,
            );
            y += 40.0;
        }
    }
}

/// Build the frame for the current stage of the run
pub fn build_scene(game: &Game, settings: &Settings) -> Scene {
    match game.stage() {
        Stage::Level(level) => {
            let mut scene = level_scene(level, settings);
            if level.phase == LevelPhase::Welcome {
                let id = level.id();
                let title = format!("Level {}: {}", id.number(), id.name());
                scene.banner(&[
                    (title.as_str(), 36.0),
                    (id.briefing(), 18.0),
                    ("Press Enter to start", 22.0),
                ]);
            }
            scene
        }
        Stage::GameOver(level) => {
            let mut scene = level_scene(level, settings);
            let cause = level.game_over_cause.map(cause_text).unwrap_or_default();
            scene.banner(&[
                ("Game Over", 44.0),
                (cause.as_str(), 22.0),
                ("Press R to play again", 22.0),
            ]);
            scene
        }
        Stage::Transition { next, .. } => {
            let config = LevelConfig::for_level(*next, &game.tuning);
            let mut scene = Scene::new(config.playfield, background(*next));
            let line = transition_text(*next);
            scene.banner(&[("Level Complete!", 40.0), (line.as_str(), 24.0)]);
            scene
        }
        Stage::Victory => {
            let config = LevelConfig::for_level(LevelId::Finale, &game.tuning);
            let mut scene = Scene::new(config.playfield, palette::STADIUM);
            scene.banner(&[
                ("Ee Sala Cup Namde!", 44.0),
                ("RCB lift the trophy. Press N for a new game", 22.0),
            ]);
            scene
        }
    }
}

pub fn transition_text(next: LevelId) -> String {
    format!("Get ready for Level {}: {}!", next.number(), next.name())
}

pub fn cause_text(cause: GameOverCause) -> String {
    match cause {
        GameOverCause::Collision(kind) => format!("You hit a {}!", kind.label()),
        GameOverCause::TrainDeparted => "Train Left!".to_string(),
    }
}

fn background(id: LevelId) -> Color {
    match id {
        LevelId::TrafficDodge => palette::ROAD,
        LevelId::MetroRush => palette::PLATFORM,
        LevelId::Finale => palette::STADIUM,
    }
}

fn obstacle_color(kind: ObstacleKind) -> Color {
    match kind {
        ObstacleKind::Zepto => [0.5, 0.2, 0.8, 1.0],
        ObstacleKind::Auto => [0.1, 0.6, 0.1, 1.0],
        ObstacleKind::Cow => [0.95, 0.95, 0.9, 1.0],
        ObstacleKind::Crowd => [0.9, 0.5, 0.1, 1.0],
        ObstacleKind::TeaStall => [0.6, 0.4, 0.2, 1.0],
        ObstacleKind::Watchman => [0.4, 0.4, 0.6, 1.0],
        ObstacleKind::Police => [0.1, 0.2, 0.7, 1.0],
        ObstacleKind::Csk => [1.0, 0.85, 0.0, 1.0],
    }
}

fn level_scene(level: &LevelState, settings: &Settings) -> Scene {
    let snap = level.snapshot();
    let mut scene = Scene::new(snap.playfield, background(snap.level));

    scenery(&mut scene, level, &snap, settings);

    for obs in snap.obstacles {
        Scene::rect(&mut scene.world, obs.pos, obs.size, obstacle_color(obs.kind));
        Scene::text(
            &mut scene.world,
            obs.pos + Vec2::new(obs.size.x / 2.0, obs.size.y + 12.0),
            obs.kind.label(),
            11.0,
            TextAlign::Center,
        );
    }

    let player_color = if settings.high_contrast {
        palette::HIGH_CONTRAST_PLAYER
    } else {
        palette::PLAYER
    };
    Scene::rect(&mut scene.world, snap.player.pos, snap.player.size, player_color);

    if snap.decor.raining && settings.rain_visible() {
        for drop in &snap.decor.rain {
            let mut color = palette::RAIN;
            color[3] = drop.opacity;
            scene.effects.push(DrawCmd::Line {
                from: drop.pos,
                to: drop.pos + Vec2::new(0.0, drop.length),
                width: 2.0,
                color,
            });
        }
    }

    hud(&mut scene, level, &snap, settings);
    scene
}

fn scenery(scene: &mut Scene, level: &LevelState, snap: &Snapshot<'_>, settings: &Settings) {
    let config = &level.config;
    match config.movement {
        Movement::Lanes {
            count, lane_height, ..
        } => {
            for lane in 1..count {
                let y = lane as f32 * lane_height;
                scene.world.push(DrawCmd::Line {
                    from: Vec2::new(0.0, y),
                    to: Vec2::new(snap.playfield.x, y),
                    width: 2.0,
                    color: palette::LANE_MARK,
                });
            }
            if let Some(lane) = snap.blocked_lane {
                let top = lane as f32 * lane_height;
                Scene::rect(
                    &mut scene.world,
                    Vec2::new(0.0, top),
                    Vec2::new(snap.playfield.x, lane_height),
                    palette::BLOCKED_LANE,
                );
                Scene::text(
                    &mut scene.world,
                    Vec2::new(snap.playfield.x / 2.0, top + lane_height / 2.0),
                    "Out of Service",
                    24.0,
                    TextAlign::Center,
                );
            }
        }
        Movement::Falling { .. } => {
            if let Some(band) = config.fall_band.filter(|_| config.id == LevelId::Finale) {
                Scene::rect(
                    &mut scene.world,
                    Vec2::new(band.min_x, 0.0),
                    Vec2::new(band.width, snap.playfield.y),
                    palette::PITCH,
                );
            }
        }
    }

    if let Goal::TopEdgeAt(y) = config.goal {
        Scene::rect(
            &mut scene.world,
            Vec2::new(snap.playfield.x / 2.0 - 20.0, (y - 45.0).max(0.0)),
            Vec2::new(40.0, 40.0),
            palette::TROPHY,
        );
    }

    if config.train.is_some() {
        let train_x = snap.playfield.x - 40.0;
        Scene::rect(
            &mut scene.world,
            Vec2::new(train_x, 0.0),
            Vec2::new(40.0, snap.playfield.y),
            palette::TRAIN,
        );
        let door = if snap.decor.door_lit && settings.door_blink_visible() {
            palette::DOOR_LIT
        } else {
            palette::DOOR
        };
        Scene::rect(
            &mut scene.world,
            Vec2::new(train_x + 8.0, level.config.player_start.y),
            Vec2::new(24.0, level.config.player_size.y),
            door,
        );
    }
}

fn hud(scene: &mut Scene, level: &LevelState, snap: &Snapshot<'_>, settings: &Settings) {
    let id = snap.level;
    Scene::text(
        &mut scene.hud,
        Vec2::new(16.0, 28.0),
        format!("Level {}: {}", id.number(), id.name()),
        20.0,
        TextAlign::Left,
    );

    if level.config.train.is_some() && settings.show_progress {
        let track = Vec2::new(300.0, 14.0);
        let min = Vec2::new(snap.playfield.x / 2.0 - track.x / 2.0, 16.0);
        Scene::rect(&mut scene.hud, min, track, palette::BAR_TRACK);
        Scene::rect(
            &mut scene.hud,
            min,
            Vec2::new(track.x * snap.progress, track.y),
            palette::BAR_FILL,
        );
    }

    if snap.phase == LevelPhase::Playing && snap.decor.instructions_visible && settings.show_instructions
    {
        let hint = match level.config.movement {
            Movement::Lanes { .. } => "Use Up/Down arrows to switch lanes",
            Movement::Falling { .. } => "Use Left/Right arrows to move",
        };
        Scene::text(
            &mut scene.hud,
            Vec2::new(snap.playfield.x / 2.0, snap.playfield.y - 24.0),
            hint,
            18.0,
            TextAlign::Center,
        );
    }
}
