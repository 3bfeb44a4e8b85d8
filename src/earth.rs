// Earth stage: zoom-in on the planet while the locator HUD fills up.

use bevy::asset::LoadState;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use fast_poisson::Poisson2D;
use noiz::prelude::{common_noise::*, *};

use crate::sequencer::EarthZoom;
use crate::stages::{ACCENT_GREEN, Stage};

pub struct EarthPlugin;

impl Plugin for EarthPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TwinkleNoise>()
            .add_systems(Startup, load_earth_texture)
            .add_systems(
                OnEnter(Stage::Earth),
                (setup_sky_field, spawn_earth, spawn_locator_hud),
            )
            .add_systems(OnExit(Stage::Earth), exit_earth)
            .add_systems(
                Update,
                (
                    track_texture_state,
                    toggle_earth_surface,
                    scale_earth,
                    paint_sky_field,
                    paint_orbit_decor,
                    update_locator_marker,
                    update_progress_bar,
                )
                    .run_if(in_state(Stage::Earth)),
            );
    }
}

/// Fraction of the smaller viewport dimension used as the un-zoomed radius.
const BASE_RADIUS_FRACTION: f32 = 0.15;
/// Zoom growth: radius triples by the time progress reaches 1.
const ZOOM_GAIN: f32 = 2.0;
/// Minimum spacing of backdrop stars, in pixels.
const STAR_SPACING: f32 = 40.0;
/// Scan line sweep rate, radians per second.
const SCAN_RATE: f32 = 1.8;
/// Zoom level past which the São Paulo marker appears.
const MARKER_THRESHOLD: f32 = 0.3;

const EARTH_TEXTURE_PATH: &str = "textures/earth.png";

/// Best-effort handle to the Earth photograph.
#[derive(Resource)]
struct EarthAssets {
    texture: Handle<Image>,
}

/// Where the texture load stands. Painting picks the photographic or the
/// procedural surface off this with a plain conditional.
#[derive(Resource, Default, PartialEq)]
enum EarthTexture {
    #[default]
    Pending,
    Loaded,
    Failed,
}

#[derive(Resource)]
struct TwinkleNoise(Noise<Fbm<Perlin>>);

impl Default for TwinkleNoise {
    fn default() -> TwinkleNoise {
        let mut noise: Noise<Fbm<Perlin>> = Noise::<Fbm<Perlin>>::default();
        noise.set_seed(7);
        noise.set_frequency(0.8);
        TwinkleNoise(noise)
    }
}

/// Fixed star backdrop; only the alpha animates.
#[derive(Resource)]
struct SkyField {
    stars: Vec<Vec2>,
}

/// The photographic Earth disc.
#[derive(Component)]
struct EarthSurface;

/// The procedural stand-in drawn until (or instead of) the photograph.
#[derive(Component)]
struct EarthFallback;

#[derive(Component)]
struct LocatorMarker;

#[derive(Component)]
struct ProgressBarFill;

fn load_earth_texture(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.insert_resource(EarthAssets {
        texture: asset_server.load(EARTH_TEXTURE_PATH),
    });
    commands.init_resource::<EarthTexture>();
}

fn track_texture_state(
    assets: Res<EarthAssets>,
    asset_server: Res<AssetServer>,
    mut state: ResMut<EarthTexture>,
) {
    if *state != EarthTexture::Pending {
        return;
    }
    match asset_server.load_state(&assets.texture) {
        LoadState::Loaded => *state = EarthTexture::Loaded,
        LoadState::Failed(_) => {
            info!("earth texture unavailable, using procedural surface");
            *state = EarthTexture::Failed;
        }
        _ => {}
    }
}

fn setup_sky_field(mut commands: Commands, windows: Query<&Window, With<PrimaryWindow>>) {
    let size = windows
        .single()
        .map(|w| Vec2::new(w.width(), w.height()))
        .unwrap_or(Vec2::new(1280.0, 720.0));

    let stars = Poisson2D::new()
        .with_dimensions([size.x, size.y], STAR_SPACING)
        .with_seed(11)
        .generate()
        .into_iter()
        .map(|[x, y]| Vec2::new(x - size.x / 2.0, y - size.y / 2.0))
        .collect();

    commands.insert_resource(SkyField { stars });
}

fn spawn_earth(
    mut commands: Commands,
    assets: Res<EarthAssets>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    // Photographic disc, revealed once the texture lands.
    commands.spawn((
        EarthSurface,
        Sprite {
            image: assets.texture.clone(),
            custom_size: Some(Vec2::splat(2.0)),
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 1.0),
        Visibility::Hidden,
        DespawnOnExit(Stage::Earth),
    ));

    // Procedural stand-in: ocean disc with one landmass blob.
    commands
        .spawn((
            EarthFallback,
            Mesh2d(meshes.add(Circle::new(1.0))),
            MeshMaterial2d(materials.add(Color::srgb(0.29, 0.56, 0.85))),
            Transform::from_xyz(0.0, 0.0, 1.0),
            DespawnOnExit(Stage::Earth),
        ))
        .with_children(|parent| {
            parent.spawn((
                Mesh2d(meshes.add(Ellipse::new(0.4, 0.3))),
                MeshMaterial2d(materials.add(Color::srgb(0.24, 0.55, 0.24))),
                Transform::from_xyz(-0.3, 0.2, 0.1).with_rotation(Quat::from_rotation_z(0.3)),
            ));
        });
}

/// Swap the fallback for the photograph when the load settles.
fn toggle_earth_surface(
    state: Res<EarthTexture>,
    mut surface: Query<&mut Visibility, (With<EarthSurface>, Without<EarthFallback>)>,
    mut fallback: Query<&mut Visibility, With<EarthFallback>>,
) {
    let loaded = *state == EarthTexture::Loaded;
    if let Ok(mut visibility) = surface.single_mut() {
        *visibility = if loaded { Visibility::Inherited } else { Visibility::Hidden };
    }
    if let Ok(mut visibility) = fallback.single_mut() {
        *visibility = if loaded { Visibility::Hidden } else { Visibility::Inherited };
    }
}

fn current_radius(zoom: &EarthZoom, window: &Window) -> f32 {
    let base = window.width().min(window.height()) * BASE_RADIUS_FRACTION;
    base * (1.0 + ZOOM_GAIN * zoom.progress)
}

fn scale_earth(
    zoom: Res<EarthZoom>,
    time: Res<Time>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut discs: Query<&mut Transform, Or<(With<EarthSurface>, With<EarthFallback>)>>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let radius = current_radius(&zoom, window);
    for mut transform in &mut discs {
        transform.scale = Vec3::splat(radius);
        // Slow spin so the disc doesn't read as a still image.
        transform.rotation = Quat::from_rotation_z(time.elapsed_secs() * 0.12);
    }
}

fn paint_sky_field(
    sky: Option<Res<SkyField>>,
    noise: Res<TwinkleNoise>,
    time: Res<Time>,
    mut gizmos: Gizmos,
) {
    let Some(sky) = sky else {
        return;
    };

    let t = time.elapsed_secs();
    for (i, star) in sky.stars.iter().enumerate() {
        let sample: f32 = noise.0.sample_for::<f32>(Vec3::new(i as f32 * 0.13, t * 0.6, 0.0));
        let alpha = (0.55 + 0.45 * sample).clamp(0.15, 1.0);
        gizmos.circle_2d(*star, 1.2, Color::srgba(1.0, 1.0, 1.0, alpha));
    }
}

/// Atmosphere rings and the rotating radar sweep.
fn paint_orbit_decor(
    zoom: Res<EarthZoom>,
    time: Res<Time>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut gizmos: Gizmos,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let radius = current_radius(&zoom, window);

    for i in 1..=3 {
        gizmos.circle_2d(
            Vec2::ZERO,
            radius + i as f32 * 8.0,
            Color::srgba(0.39, 0.7, 1.0, 0.3 / i as f32),
        );
    }

    let angle = time.elapsed_secs() * SCAN_RATE;
    let tip = Vec2::new(angle.cos(), angle.sin()) * (radius + 30.0);
    gizmos.line_2d(Vec2::ZERO, tip, ACCENT_GREEN.with_alpha(0.8));
}

fn spawn_locator_hud(mut commands: Commands) {
    // World-space marker label, hidden until the zoom is deep enough.
    commands.spawn((
        LocatorMarker,
        Text2d::new("SÃO PAULO, BRASIL"),
        TextFont {
            font_size: 14.0,
            ..default()
        },
        TextColor(ACCENT_GREEN),
        Transform::from_xyz(110.0, -10.0, 2.0),
        Visibility::Hidden,
        DespawnOnExit(Stage::Earth),
    ));

    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::FlexEnd,
                align_items: AlignItems::Center,
                row_gap: Val::Px(8.0),
                padding: UiRect::bottom(Val::Px(40.0)),
                ..default()
            },
            DespawnOnExit(Stage::Earth),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("LOCALIZANDO: SÃO PAULO, BRASIL"),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(ACCENT_GREEN),
            ));
            parent
                .spawn((
                    Node {
                        width: Val::Px(256.0),
                        height: Val::Px(4.0),
                        ..default()
                    },
                    BackgroundColor(Color::srgb(0.12, 0.12, 0.12)),
                ))
                .with_children(|bar| {
                    bar.spawn((
                        ProgressBarFill,
                        Node {
                            width: Val::Percent(0.0),
                            height: Val::Percent(100.0),
                            ..default()
                        },
                        BackgroundColor(ACCENT_GREEN),
                    ));
                });
        });
}

fn update_locator_marker(
    zoom: Res<EarthZoom>,
    time: Res<Time>,
    mut markers: Query<&mut Visibility, With<LocatorMarker>>,
    mut gizmos: Gizmos,
) {
    let deep_enough = zoom.progress > MARKER_THRESHOLD;
    if let Ok(mut visibility) = markers.single_mut() {
        *visibility = if deep_enough { Visibility::Inherited } else { Visibility::Hidden };
    }
    if deep_enough {
        let pulse = 8.0 + (time.elapsed_secs() * 5.0).sin() * 3.0;
        gizmos.circle_2d(Vec2::new(20.0, 10.0), pulse, ACCENT_GREEN.with_alpha(0.8));
    }
}

fn update_progress_bar(zoom: Res<EarthZoom>, mut fills: Query<&mut Node, With<ProgressBarFill>>) {
    if let Ok(mut node) = fills.single_mut() {
        node.width = Val::Percent(zoom.progress * 100.0);
    }
}

fn exit_earth(mut commands: Commands) {
    commands.remove_resource::<SkyField>();
}
