// Stage sequencer: timed splash transitions and the skip escape hatch.

use bevy::prelude::*;

use crate::stages::{ACCENT_GREEN, Stage};

pub struct SequencerPlugin;

impl Plugin for SequencerPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<SkipIntro>()
            .insert_resource(ClearColor(Color::BLACK))
            .add_systems(Startup, spawn_camera)
            .add_systems(OnEnter(Stage::Galaxy), |mut commands: Commands| {
                commands.insert_resource(StageDwell::holding(GALAXY_DWELL_SECS));
            })
            .add_systems(OnExit(Stage::Galaxy), |mut commands: Commands| {
                commands.remove_resource::<StageDwell>();
            })
            .add_systems(OnEnter(Stage::Earth), |mut commands: Commands| {
                commands.insert_resource(StageDwell::holding(EARTH_DWELL_SECS));
                commands.insert_resource(EarthZoom::default());
            })
            .add_systems(OnExit(Stage::Earth), |mut commands: Commands| {
                commands.remove_resource::<StageDwell>();
                commands.remove_resource::<EarthZoom>();
            })
            .add_systems(OnEnter(Stage::Galaxy), spawn_skip_control)
            .add_systems(OnEnter(Stage::Dashboard), despawn_skip_control)
            .add_systems(
                Update,
                (stage_dwell, zoom_tick.run_if(in_state(Stage::Earth)), handle_skip)
                    .run_if(in_state(Stage::Galaxy).or(in_state(Stage::Earth))),
            )
            .add_systems(
                Update,
                (skip_visuals, skip_actions)
                    .run_if(in_state(Stage::Galaxy).or(in_state(Stage::Earth))),
            );

        #[cfg(debug_assertions)]
        app.add_systems(Startup, spawn_stage_readout)
            .add_systems(Update, update_stage_readout);
    }
}

/// Dwell before the automatic Galaxy → Earth transition.
const GALAXY_DWELL_SECS: f32 = 3.0;
/// Dwell before the automatic Earth → Dashboard transition. Independent of
/// the zoom ticker below; T2 fires whether or not the zoom reached 1.
const EARTH_DWELL_SECS: f32 = 4.0;

/// Fixed period of the zoom ticker.
const ZOOM_TICK_SECS: f32 = 0.05;
/// Zoom increment per tick, clamped at 1.
const ZOOM_STEP: f32 = 0.025;

/// User request to cut the splash short and jump to the dashboard.
#[derive(Message)]
pub struct SkipIntro;

/// Countdown for the current stage's automatic transition. Armed on stage
/// entry, removed on exit, so a skip leaves nothing ticking.
#[derive(Resource)]
struct StageDwell {
    elapsed: f32,
    hold: f32,
}

impl StageDwell {
    fn holding(hold: f32) -> StageDwell {
        StageDwell { elapsed: 0.0, hold }
    }
}

/// Zoom ratio for the Earth stage. Advances by [`ZOOM_STEP`] every
/// [`ZOOM_TICK_SECS`], monotonically, clamped at 1. Only exists while in
/// [`Stage::Earth`].
#[derive(Resource, Default)]
pub struct EarthZoom {
    pub progress: f32,
    accumulator: f32,
}

impl EarthZoom {
    /// Run as many fixed-period ticks as `dt` covers.
    pub fn advance(&mut self, dt: f32) {
        self.accumulator += dt;
        while self.accumulator >= ZOOM_TICK_SECS {
            self.accumulator -= ZOOM_TICK_SECS;
            self.progress = (self.progress + ZOOM_STEP).min(1.0);
        }
    }
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

fn stage_dwell(
    time: Res<Time>,
    mut dwell: Option<ResMut<StageDwell>>,
    stage: Res<State<Stage>>,
    mut next_stage: ResMut<NextState<Stage>>,
) {
    let Some(dwell) = dwell.as_mut() else {
        return;
    };

    dwell.elapsed += time.delta_secs();
    if dwell.elapsed < dwell.hold {
        return;
    }

    match stage.get() {
        Stage::Galaxy => next_stage.set(Stage::Earth),
        Stage::Earth => next_stage.set(Stage::Dashboard),
        Stage::Dashboard => {}
    }
}

fn zoom_tick(time: Res<Time>, mut zoom: Option<ResMut<EarthZoom>>) {
    let Some(zoom) = zoom.as_mut() else {
        return;
    };
    zoom.advance(time.delta_secs());
}

fn handle_skip(
    mut skips: MessageReader<SkipIntro>,
    mut next_stage: ResMut<NextState<Stage>>,
) {
    if skips.read().next().is_some() {
        next_stage.set(Stage::Dashboard);
    }
}

// Skip control overlay. Lives across Galaxy and Earth, removed on reaching
// the dashboard.

const NORMAL_SKIP: Color = Color::srgba(0.0, 0.0, 0.0, 0.4);
const HOVERED_SKIP: Color = Color::srgba(0.0, 0.2, 0.1, 0.7);

#[derive(Component)]
struct SkipControl;

fn spawn_skip_control(mut commands: Commands) {
    commands
        .spawn((
            SkipControl,
            Button,
            Node {
                position_type: PositionType::Absolute,
                right: Val::Px(24.0),
                bottom: Val::Px(24.0),
                padding: UiRect::axes(Val::Px(18.0), Val::Px(10.0)),
                border: UiRect::all(Val::Px(1.0)),
                ..default()
            },
            BorderColor::all(ACCENT_GREEN.with_alpha(0.5)),
            BackgroundColor(NORMAL_SKIP),
            GlobalZIndex(300),
        ))
        .with_children(|btn| {
            btn.spawn((
                Text::new("PULAR INTRO ▶"),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(ACCENT_GREEN),
            ));
        });
}

fn despawn_skip_control(mut commands: Commands, controls: Query<Entity, With<SkipControl>>) {
    for entity in &controls {
        commands.entity(entity).despawn();
    }
}

fn skip_visuals(
    mut query: Query<
        (&Interaction, &mut BackgroundColor),
        (Changed<Interaction>, With<SkipControl>),
    >,
) {
    for (interaction, mut bg) in &mut query {
        *bg = match *interaction {
            Interaction::Hovered | Interaction::Pressed => HOVERED_SKIP.into(),
            Interaction::None => NORMAL_SKIP.into(),
        };
    }
}

fn skip_actions(
    query: Query<&Interaction, (Changed<Interaction>, With<SkipControl>)>,
    mut skips: MessageWriter<SkipIntro>,
) {
    for interaction in &query {
        if *interaction == Interaction::Pressed {
            skips.write(SkipIntro);
        }
    }
}

// Debug-only stage readout, bottom-left corner.

#[cfg(debug_assertions)]
#[derive(Component)]
struct StageReadout;

#[cfg(debug_assertions)]
fn spawn_stage_readout(mut commands: Commands) {
    commands.spawn((
        StageReadout,
        Text::new("FASE: GALAXY"),
        TextFont {
            font_size: 14.0,
            ..default()
        },
        TextColor(Color::srgba(1.0, 1.0, 1.0, 0.5)),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(10.0),
            bottom: Val::Px(10.0),
            ..default()
        },
        GlobalZIndex(300),
    ));
}

#[cfg(debug_assertions)]
fn update_stage_readout(
    stage: Res<State<Stage>>,
    mut readouts: Query<&mut Text, With<StageReadout>>,
) {
    if !stage.is_changed() {
        return;
    }
    if let Ok(mut text) = readouts.single_mut() {
        **text = format!("FASE: {}", stage.get());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::state::app::StatesPlugin;
    use std::time::Duration;

    /// Headless app with the full sequencer wired up and a hand-driven clock.
    fn sequencer_app() -> App {
        let mut app = App::new();
        app.add_plugins(StatesPlugin);
        app.init_state::<Stage>();
        app.init_resource::<Time>();
        app.add_plugins(SequencerPlugin);
        // First update applies the initial state transition (OnEnter(Galaxy))
        // without advancing the clock.
        app.update();
        app
    }

    fn advance(app: &mut App, secs: f32) {
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_secs_f32(secs));
        app.update();
    }

    fn stage(app: &App) -> Stage {
        *app.world().resource::<State<Stage>>().get()
    }

    #[test]
    fn starts_in_galaxy() {
        let app = sequencer_app();
        assert_eq!(stage(&app), Stage::Galaxy);
    }

    #[test]
    fn t1_fires_after_galaxy_dwell() {
        let mut app = sequencer_app();
        advance(&mut app, 2.9);
        assert_eq!(stage(&app), Stage::Galaxy);
        advance(&mut app, 0.1);
        // Transition requested this frame, applied on the next.
        advance(&mut app, 0.0);
        assert_eq!(stage(&app), Stage::Earth);
    }

    #[test]
    fn t2_fires_after_earth_dwell_regardless_of_zoom() {
        let mut app = sequencer_app();
        advance(&mut app, 3.0);
        advance(&mut app, 0.0);
        assert_eq!(stage(&app), Stage::Earth);

        advance(&mut app, 3.9);
        assert_eq!(stage(&app), Stage::Earth);
        advance(&mut app, 0.1);
        advance(&mut app, 0.0);
        assert_eq!(stage(&app), Stage::Dashboard);
    }

    #[test]
    fn end_to_end_stage_walk_in_small_steps() {
        let mut app = sequencer_app();
        let mut elapsed = 0.0;
        while elapsed < 2.95 {
            advance(&mut app, 0.05);
            elapsed += 0.05;
        }
        assert_eq!(stage(&app), Stage::Galaxy);

        // Cross T1, then confirm the zoom is advancing mid-Earth.
        advance(&mut app, 0.05);
        advance(&mut app, 0.0);
        assert_eq!(stage(&app), Stage::Earth);
        advance(&mut app, 0.5);
        let mid = app.world().resource::<EarthZoom>().progress;
        assert!(mid > 0.0);
        advance(&mut app, 0.5);
        assert!(app.world().resource::<EarthZoom>().progress > mid);

        // Remaining Earth dwell.
        let mut elapsed = 1.0;
        while elapsed < 4.0 {
            advance(&mut app, 0.05);
            elapsed += 0.05;
        }
        advance(&mut app, 0.0);
        assert_eq!(stage(&app), Stage::Dashboard);
    }

    #[test]
    fn skip_from_galaxy_goes_straight_to_dashboard() {
        let mut app = sequencer_app();
        advance(&mut app, 1.0);
        app.world_mut().write_message(SkipIntro);
        advance(&mut app, 0.0);
        advance(&mut app, 0.0);
        assert_eq!(stage(&app), Stage::Dashboard);
        // Dwell state is gone; nothing can fire a later transition.
        assert!(app.world().get_resource::<StageDwell>().is_none());
        advance(&mut app, 30.0);
        assert_eq!(stage(&app), Stage::Dashboard);
    }

    #[test]
    fn skip_from_earth_halts_both_earth_timers() {
        let mut app = sequencer_app();
        advance(&mut app, 3.0);
        advance(&mut app, 0.0);
        assert_eq!(stage(&app), Stage::Earth);

        app.world_mut().write_message(SkipIntro);
        advance(&mut app, 0.0);
        advance(&mut app, 0.0);
        assert_eq!(stage(&app), Stage::Dashboard);
        assert!(app.world().get_resource::<StageDwell>().is_none());
        assert!(app.world().get_resource::<EarthZoom>().is_none());
    }

    #[test]
    fn zoom_progress_is_step_per_tick_clamped_and_monotone() {
        let mut zoom = EarthZoom::default();
        for n in 1..=10 {
            zoom.advance(0.05);
            assert!((zoom.progress - n as f32 * 0.025).abs() < 1e-6);
        }

        // A large delta covers many ticks at once and still clamps at 1.
        let mut zoom = EarthZoom::default();
        let mut last = 0.0;
        for _ in 0..100 {
            zoom.advance(0.2);
            assert!(zoom.progress >= last);
            assert!(zoom.progress <= 1.0);
            last = zoom.progress;
        }
        assert!((zoom.progress - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn zoom_saturates_before_t2_and_stage_still_holds() {
        // With a 50 ms tick and 0.025 step the zoom saturates at 2 s, half
        // the Earth dwell. The stage must still be Earth at that point.
        let mut app = sequencer_app();
        advance(&mut app, 3.0);
        advance(&mut app, 0.0);

        let mut elapsed = 0.0;
        while elapsed < 2.5 {
            advance(&mut app, 0.05);
            elapsed += 0.05;
        }
        assert_eq!(stage(&app), Stage::Earth);
        assert!((app.world().resource::<EarthZoom>().progress - 1.0).abs() < f32::EPSILON);
    }
}
