// Character rain backdrop behind the dashboard.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use rand::Rng;

use crate::stages::{ACCENT_GREEN, Stage};

pub struct RainPlugin;

impl Plugin for RainPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(Stage::Dashboard), setup_rain)
            .add_systems(
                Update,
                (advance_rain, sync_rain_glyphs)
                    .chain()
                    .run_if(in_state(Stage::Dashboard)),
            );
    }
}

const COLUMN_WIDTH: f32 = 20.0;
const CELL_HEIGHT: f32 = 20.0;
/// Cells per second, one cell per 60 Hz frame.
const FALL_RATE: f32 = 60.0;
/// Chance per second of a column resetting once past the bottom edge,
/// roughly 1% per 60 Hz frame.
const RESET_RATE: f32 = 0.6;
const TRAIL_LEN: usize = 14;
const GLYPHS: &[char] = &[
    'M', 'O', 'V', 'E', 'B', 'U', 'S', 'S', '0', '1', 'ア', 'イ', 'ウ', 'エ', 'オ', 'カ', 'キ',
    'ク', 'ケ', 'コ',
];

struct RainColumn {
    /// Head position in cells; negative means above the top edge.
    head: f32,
    trail: [char; TRAIL_LEN],
}

/// Simulation state for the rain; glyph entities are synced from it.
#[derive(Resource)]
pub struct RainField {
    columns: Vec<RainColumn>,
    rows: f32,
}

impl RainField {
    fn seeded(size: Vec2) -> RainField {
        let mut rng = rand::rng();
        let count = (size.x / COLUMN_WIDTH) as usize;
        let columns = (0..count)
            .map(|_| RainColumn {
                head: rng.random_range(-100.0..0.0),
                trail: std::array::from_fn(|_| GLYPHS[rng.random_range(0..GLYPHS.len())]),
            })
            .collect();
        RainField {
            columns,
            rows: size.y / CELL_HEIGHT,
        }
    }

    fn advance(&mut self, dt: f32) {
        let mut rng = rand::rng();
        for column in &mut self.columns {
            column.head += FALL_RATE * dt;
            if column.head > self.rows && rng.random_range(0.0..1.0) < RESET_RATE * dt {
                column.head = 0.0;
            }
            // Shimmer a glyph now and then.
            if rng.random_range(0.0..1.0) < 8.0 * dt {
                let slot = rng.random_range(0..TRAIL_LEN);
                column.trail[slot] = GLYPHS[rng.random_range(0..GLYPHS.len())];
            }
        }
    }
}

#[derive(Component)]
struct RainGlyphs(usize);

fn setup_rain(mut commands: Commands, windows: Query<&Window, With<PrimaryWindow>>) {
    let size = windows
        .single()
        .map(|w| Vec2::new(w.width(), w.height()))
        .unwrap_or(Vec2::new(1280.0, 720.0));

    let field = RainField::seeded(size);
    for (i, _) in field.columns.iter().enumerate() {
        let x = i as f32 * COLUMN_WIDTH - size.x / 2.0 + COLUMN_WIDTH / 2.0;
        commands.spawn((
            RainGlyphs(i),
            Text2d::new(""),
            TextFont {
                font_size: 15.0,
                ..default()
            },
            TextColor(ACCENT_GREEN.with_alpha(0.3)),
            Transform::from_xyz(x, size.y / 2.0, -5.0),
            DespawnOnExit(Stage::Dashboard),
        ));
    }
    commands.insert_resource(field);
}

fn advance_rain(time: Res<Time>, mut field: Option<ResMut<RainField>>) {
    let Some(field) = field.as_mut() else {
        return;
    };
    field.advance(time.delta_secs());
}

fn sync_rain_glyphs(
    field: Option<Res<RainField>>,
    mut glyphs: Query<(&RainGlyphs, &mut Text2d, &mut Transform)>,
) {
    let Some(field) = field else {
        return;
    };

    for (index, mut text, mut transform) in &mut glyphs {
        let Some(column) = field.columns.get(index.0) else {
            continue;
        };
        let mut stacked = String::with_capacity(TRAIL_LEN * 3);
        for glyph in column.trail {
            stacked.push(glyph);
            stacked.push('\n');
        }
        **text = stacked;
        let half = field.rows * CELL_HEIGHT / 2.0;
        transform.translation.y = half - column.head * CELL_HEIGHT;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_column_per_twenty_pixels() {
        let field = RainField::seeded(Vec2::new(1280.0, 720.0));
        assert_eq!(field.columns.len(), 64);
        for column in &field.columns {
            assert!(column.head >= -100.0 && column.head <= 0.0);
        }
    }

    #[test]
    fn heads_fall_monotonically_until_reset() {
        let mut field = RainField::seeded(Vec2::new(400.0, 300.0));
        let dt = 1.0 / 60.0;
        for _ in 0..240 {
            let before: Vec<f32> = field.columns.iter().map(|c| c.head).collect();
            field.advance(dt);
            for (column, prev) in field.columns.iter().zip(&before) {
                let fell = column.head > *prev;
                let reset = column.head == 0.0;
                assert!(fell || reset);
            }
        }
    }

    #[test]
    fn columns_past_the_bottom_eventually_reset() {
        let mut field = RainField::seeded(Vec2::new(800.0, 100.0));
        // Plenty of frames for every column to clear the 5 rows and roll a
        // reset many times over.
        for _ in 0..3000 {
            field.advance(1.0 / 60.0);
        }
        assert!(field.columns.iter().any(|c| c.head < field.rows));
    }
}
