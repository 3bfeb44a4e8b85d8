// Galaxy stage: starfield warp tunnel behind the boot title.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use rand::Rng;

use crate::stages::{ACCENT_GREEN, Stage};

pub struct GalaxyPlugin;

impl Plugin for GalaxyPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(Stage::Galaxy), (setup_warp_field, spawn_boot_title))
            .add_systems(OnExit(Stage::Galaxy), exit_galaxy)
            .add_systems(
                Update,
                (advance_warp_field, paint_warp_field)
                    .chain()
                    .run_if(in_state(Stage::Galaxy)),
            );
    }
}

const STAR_COUNT: usize = 800;
/// Depth decrease per second, 50 px per 60 Hz frame.
const WARP_SPEED: f32 = 3000.0;
/// Perspective projection strength.
const FOCAL: f32 = 200.0;
/// Stars spawn spread over this multiple of the viewport.
const SPREAD: f32 = 3.0;

const STAR_COLORS: [Color; 5] = [
    Color::WHITE,
    ACCENT_GREEN,
    Color::srgb(0.0, 0.83, 1.0),
    Color::srgb(1.0, 0.42, 0.42),
    Color::srgb(1.0, 0.85, 0.24),
];

struct WarpStar {
    x: f32,
    y: f32,
    z: f32,
    prev_z: f32,
    color: Color,
}

/// Simulation state for the warp tunnel, stepped independently of painting.
#[derive(Resource)]
pub struct WarpField {
    stars: Vec<WarpStar>,
    /// Viewport size captured at seeding time; respawn bounds.
    bounds: Vec2,
}

impl WarpField {
    fn seeded(bounds: Vec2) -> WarpField {
        let mut rng = rand::rng();
        let stars = (0..STAR_COUNT)
            .map(|_| WarpStar {
                x: (rng.random_range(0.0..1.0) - 0.5) * bounds.x * SPREAD,
                y: (rng.random_range(0.0..1.0) - 0.5) * bounds.y * SPREAD,
                z: rng.random_range(1.0..bounds.x),
                prev_z: 0.0,
                color: STAR_COLORS[rng.random_range(0..STAR_COLORS.len())],
            })
            .collect();
        WarpField { stars, bounds }
    }

    /// Pull every star toward the camera; stars crossing the focal plane
    /// respawn at maximum depth with a fresh lateral position.
    fn advance(&mut self, dt: f32) {
        let mut rng = rand::rng();
        for star in &mut self.stars {
            star.prev_z = star.z;
            star.z -= WARP_SPEED * dt;

            if star.z <= 0.0 {
                star.x = (rng.random_range(0.0..1.0) - 0.5) * self.bounds.x * SPREAD;
                star.y = (rng.random_range(0.0..1.0) - 0.5) * self.bounds.y * SPREAD;
                star.z = self.bounds.x;
                star.prev_z = star.z;
            }
        }
    }
}

fn setup_warp_field(mut commands: Commands, windows: Query<&Window, With<PrimaryWindow>>) {
    let bounds = windows
        .single()
        .map(|w| Vec2::new(w.width(), w.height()))
        .unwrap_or(Vec2::new(1280.0, 720.0));
    commands.insert_resource(WarpField::seeded(bounds));
}

fn spawn_boot_title(mut commands: Commands) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(16.0),
                ..default()
            },
            DespawnOnExit(Stage::Galaxy),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("MOVEBUSS"),
                TextFont {
                    font_size: 64.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
            parent.spawn((
                Text::new("I N I C I A N D O   S I S T E M A . . ."),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(ACCENT_GREEN),
            ));
        });
}

fn advance_warp_field(time: Res<Time>, mut field: Option<ResMut<WarpField>>) {
    let Some(field) = field.as_mut() else {
        return;
    };
    field.advance(time.delta_secs());
}

/// Project each star and draw its motion streak plus a head dot. World
/// origin is the viewport center, matching the 2D camera.
fn paint_warp_field(field: Option<Res<WarpField>>, mut gizmos: Gizmos) {
    let Some(field) = field else {
        return;
    };

    for star in &field.stars {
        let head = Vec2::new(star.x / star.z, star.y / star.z) * FOCAL;
        let tail = Vec2::new(star.x / star.prev_z, star.y / star.prev_z) * FOCAL;
        let size = (1.0 - star.z / field.bounds.x) * 4.0;

        gizmos.line_2d(tail, head, star.color);
        if size > 0.5 {
            gizmos.circle_2d(head, size * 0.5, star.color);
        }
    }
}

fn exit_galaxy(mut commands: Commands) {
    commands.remove_resource::<WarpField>();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeding_fills_the_field_within_bounds() {
        let field = WarpField::seeded(Vec2::new(1280.0, 720.0));
        assert_eq!(field.stars.len(), STAR_COUNT);
        for star in &field.stars {
            assert!(star.x.abs() <= 1280.0 * SPREAD / 2.0);
            assert!(star.y.abs() <= 720.0 * SPREAD / 2.0);
            assert!(star.z > 0.0 && star.z <= 1280.0);
        }
    }

    #[test]
    fn advance_respawns_stars_that_cross_the_camera() {
        let mut field = WarpField::seeded(Vec2::new(800.0, 600.0));
        // One second at warp speed exceeds the maximum depth, so every star
        // respawns at least once and none ends up at or behind the camera.
        for _ in 0..60 {
            field.advance(1.0 / 60.0);
            for star in &field.stars {
                assert!(star.z > 0.0);
                assert!(star.z <= 800.0);
            }
        }
        assert_eq!(field.stars.len(), STAR_COUNT);
    }
}
