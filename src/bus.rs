// Bus drive-by hero scene behind the dashboard chrome.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use noiz::prelude::{common_noise::*, *};

use crate::stages::{ACCENT_GREEN, Stage};

pub struct BusPlugin;

impl Plugin for BusPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(Stage::Dashboard), setup_drive_by)
            .add_systems(OnExit(Stage::Dashboard), exit_drive_by)
            .add_systems(
                Update,
                (advance_drive_by, apply_drive_by, paint_street)
                    .chain()
                    .run_if(in_state(Stage::Dashboard)),
            );
    }
}

/// Bus speed while driving in, 8 px per 60 Hz frame.
const BUS_SPEED: f32 = 480.0;
const BUS_WIDTH: f32 = 280.0;
const BUS_HEIGHT: f32 = 90.0;
const WHEEL_RADIUS: f32 = 18.0;
/// Wheel spin while driving, radians per second.
const WHEEL_SPIN: f32 = 18.0;

/// Vertical placement of the road surface in world coordinates.
const ROAD_Y: f32 = -200.0;
const ROAD_HEIGHT: f32 = 100.0;
const DASH_SPACING: f32 = 50.0;
const DASH_LENGTH: f32 = 30.0;

const BUILDING_COUNT: usize = 15;

const SKY_TOP: Color = Color::srgb(0.04, 0.04, 0.1);
const SKY_BOTTOM: Color = Color::srgb(0.16, 0.16, 0.29);
const BUILDING_FILL: Color = Color::srgb(0.1, 0.1, 0.18);

/// Drive-in state: the bus enters from the left and parks at center.
#[derive(Resource)]
struct DriveBy {
    x: f32,
    road_offset: f32,
    wheel_angle: f32,
    parked: bool,
}

#[derive(Component)]
struct BusBody;

#[derive(Component)]
struct BusWheel;

#[derive(Resource)]
struct SkylineNoise(Noise<Fbm<Perlin>>);

impl Default for SkylineNoise {
    fn default() -> SkylineNoise {
        let mut noise: Noise<Fbm<Perlin>> = Noise::<Fbm<Perlin>>::default();
        noise.set_seed(21);
        noise.set_frequency(1.4);
        SkylineNoise(noise)
    }
}

fn setup_drive_by(
    mut commands: Commands,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    let size = windows
        .single()
        .map(|w| Vec2::new(w.width(), w.height()))
        .unwrap_or(Vec2::new(1280.0, 720.0));

    commands.insert_resource(DriveBy {
        x: -size.x / 2.0 - BUS_WIDTH,
        road_offset: 0.0,
        wheel_angle: 0.0,
        parked: false,
    });

    // Night sky, two bands standing in for a vertical gradient.
    commands.spawn((
        Sprite {
            color: SKY_TOP,
            custom_size: Some(Vec2::new(size.x, size.y)),
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, -4.9),
        DespawnOnExit(Stage::Dashboard),
    ));
    commands.spawn((
        Sprite {
            color: SKY_BOTTOM,
            custom_size: Some(Vec2::new(size.x, size.y * 0.4)),
            ..default()
        },
        Transform::from_xyz(0.0, ROAD_Y + size.y * 0.2, -4.8),
        DespawnOnExit(Stage::Dashboard),
    ));

    // Skyline silhouette, heights off the noise field.
    let noise = SkylineNoise::default();
    for i in 0..BUILDING_COUNT {
        let sample: f32 = noise.0.sample_for::<f32>(Vec3::new(i as f32 * 0.37, 0.0, 0.0));
        let height = 120.0 + sample.abs() * 140.0;
        let width = 60.0 + (i as f32 * 0.9).cos() * 20.0;
        let x = i as f32 * (size.x / BUILDING_COUNT as f32) - size.x / 2.0 + 30.0;
        commands.spawn((
            Sprite {
                color: BUILDING_FILL,
                custom_size: Some(Vec2::new(width, height)),
                ..default()
            },
            Transform::from_xyz(x, ROAD_Y + ROAD_HEIGHT / 2.0 + height / 2.0, -4.5),
            DespawnOnExit(Stage::Dashboard),
        ));
    }
    commands.insert_resource(noise);

    // Road bed; lane dashes are painted immediate-mode so they can scroll.
    commands.spawn((
        Sprite {
            color: Color::srgb(0.2, 0.2, 0.2),
            custom_size: Some(Vec2::new(size.x, ROAD_HEIGHT)),
            ..default()
        },
        Transform::from_xyz(0.0, ROAD_Y, -4.4),
        DespawnOnExit(Stage::Dashboard),
    ));

    spawn_bus(&mut commands, &mut meshes, &mut materials);
}

/// The bus itself: white shell, green livery bands, window row, destination
/// sign, lights and two wheels.
fn spawn_bus(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<ColorMaterial>,
) {
    let body_y = ROAD_Y + ROAD_HEIGHT / 2.0 + BUS_HEIGHT / 2.0;
    commands
        .spawn((
            BusBody,
            Sprite {
                color: Color::WHITE,
                custom_size: Some(Vec2::new(BUS_WIDTH, BUS_HEIGHT)),
                ..default()
            },
            Transform::from_xyz(-2000.0, body_y, -4.0),
            DespawnOnExit(Stage::Dashboard),
        ))
        .with_children(|bus| {
            // Upper livery band.
            bus.spawn((
                Sprite {
                    color: Color::srgb(0.0, 0.67, 0.33),
                    custom_size: Some(Vec2::new(BUS_WIDTH, 35.0)),
                    ..default()
                },
                Transform::from_xyz(0.0, 2.5, 0.1),
            ));
            // Skirt band.
            bus.spawn((
                Sprite {
                    color: Color::srgb(0.0, 0.8, 0.4),
                    custom_size: Some(Vec2::new(BUS_WIDTH, 25.0)),
                    ..default()
                },
                Transform::from_xyz(0.0, -27.5, 0.1),
            ));
            // Window row.
            for i in 0..5 {
                bus.spawn((
                    Sprite {
                        color: Color::srgb(0.1, 0.1, 0.18),
                        custom_size: Some(Vec2::new(35.0, 30.0)),
                        ..default()
                    },
                    Transform::from_xyz(-75.0 + i as f32 * 45.0, 0.0, 0.2),
                ));
            }
            // Door at the front.
            bus.spawn((
                Sprite {
                    color: Color::srgb(0.1, 0.1, 0.18),
                    custom_size: Some(Vec2::new(30.0, 50.0)),
                    ..default()
                },
                Transform::from_xyz(-BUS_WIDTH / 2.0 + 20.0, -5.0, 0.2),
            ));
            // Destination sign above the windshield.
            bus.spawn((
                Sprite {
                    color: Color::srgb(0.07, 0.07, 0.07),
                    custom_size: Some(Vec2::new(BUS_WIDTH - 10.0, 18.0)),
                    ..default()
                },
                Transform::from_xyz(0.0, BUS_HEIGHT / 2.0 + 9.0, 0.1),
            ))
            .with_children(|sign| {
                sign.spawn((
                    Text2d::new("524M-10"),
                    TextFont {
                        font_size: 12.0,
                        ..default()
                    },
                    TextColor(Color::srgb(1.0, 0.4, 0.0)),
                    Transform::from_xyz(-90.0, 0.0, 0.1),
                ));
            });
            bus.spawn((
                Text2d::new("MOVEBUSS"),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(ACCENT_GREEN),
                Transform::from_xyz(0.0, -27.5, 0.3),
            ));
            // Headlight and taillight.
            bus.spawn((
                Mesh2d(meshes.add(Circle::new(8.0))),
                MeshMaterial2d(materials.add(Color::srgb(1.0, 1.0, 0.0))),
                Transform::from_xyz(BUS_WIDTH / 2.0 - 4.0, 10.0, 0.2),
            ));
            bus.spawn((
                Mesh2d(meshes.add(Circle::new(6.0))),
                MeshMaterial2d(materials.add(Color::srgb(1.0, 0.0, 0.0))),
                Transform::from_xyz(-BUS_WIDTH / 2.0 + 4.0, 10.0, 0.2),
            ));
            // Wheels: tyre, hub, and a spoke cross that spins.
            for wx in [-BUS_WIDTH / 2.0 + 50.0, BUS_WIDTH / 2.0 - 50.0] {
                bus.spawn((
                    BusWheel,
                    Mesh2d(meshes.add(Circle::new(WHEEL_RADIUS))),
                    MeshMaterial2d(materials.add(Color::srgb(0.13, 0.13, 0.13))),
                    Transform::from_xyz(wx, -BUS_HEIGHT / 2.0, 0.3),
                ))
                .with_children(|wheel| {
                    wheel.spawn((
                        Mesh2d(meshes.add(Circle::new(WHEEL_RADIUS - 5.0))),
                        MeshMaterial2d(materials.add(Color::srgb(0.27, 0.27, 0.27))),
                        Transform::from_xyz(0.0, 0.0, 0.1),
                    ));
                    for angle in [0.0, std::f32::consts::FRAC_PI_3] {
                        wheel.spawn((
                            Sprite {
                                color: Color::srgb(0.4, 0.4, 0.4),
                                custom_size: Some(Vec2::new(2.0, (WHEEL_RADIUS - 5.0) * 2.0)),
                                ..default()
                            },
                            Transform::from_xyz(0.0, 0.0, 0.2)
                                .with_rotation(Quat::from_rotation_z(angle)),
                        ));
                    }
                });
            }
        });
}

fn advance_drive_by(time: Res<Time>, mut drive: Option<ResMut<DriveBy>>) {
    let Some(drive) = drive.as_mut() else {
        return;
    };
    if drive.parked {
        return;
    }

    let dt = time.delta_secs();
    drive.x += BUS_SPEED * dt;
    drive.road_offset = (drive.road_offset + BUS_SPEED * dt) % DASH_SPACING;
    drive.wheel_angle += WHEEL_SPIN * dt;
    if drive.x >= 0.0 {
        drive.x = 0.0;
        drive.parked = true;
    }
}

fn apply_drive_by(
    drive: Option<Res<DriveBy>>,
    mut bodies: Query<&mut Transform, (With<BusBody>, Without<BusWheel>)>,
    mut wheels: Query<&mut Transform, With<BusWheel>>,
) {
    let Some(drive) = drive else {
        return;
    };
    if let Ok(mut transform) = bodies.single_mut() {
        transform.translation.x = drive.x;
    }
    for mut transform in &mut wheels {
        transform.rotation = Quat::from_rotation_z(-drive.wheel_angle);
    }
}

/// Scrolling lane dashes and the fixed star sprinkle over the skyline.
fn paint_street(
    drive: Option<Res<DriveBy>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut gizmos: Gizmos,
) {
    let Some(drive) = drive else {
        return;
    };
    let Ok(window) = windows.single() else {
        return;
    };
    let half_w = window.width() / 2.0;

    let dash_y = ROAD_Y - 15.0;
    let mut x = -half_w - drive.road_offset;
    while x < half_w + DASH_SPACING {
        gizmos.line_2d(
            Vec2::new(x, dash_y),
            Vec2::new(x + DASH_LENGTH, dash_y),
            Color::srgb(1.0, 0.8, 0.0),
        );
        x += DASH_SPACING;
    }

    // Deterministic star sprinkle over the skyline.
    let height = window.height();
    for i in 0..100 {
        let sx = (i as f32 * 137.0) % window.width() - half_w;
        let sy = height / 2.0 - (i as f32 * 97.0) % (height * 0.4);
        gizmos.circle_2d(Vec2::new(sx, sy), 1.0, Color::srgba(1.0, 1.0, 1.0, 0.5));
    }
}

fn exit_drive_by(mut commands: Commands) {
    commands.remove_resource::<DriveBy>();
    commands.remove_resource::<SkylineNoise>();
}
