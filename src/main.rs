// Main
mod bus;
mod catalog;
mod dashboard;
mod earth;
mod galaxy;
mod rain;
mod sequencer;
mod stages;

use bevy::prelude::*;
use bus::BusPlugin;
use dashboard::DashboardPlugin;
use earth::EarthPlugin;
use galaxy::GalaxyPlugin;
use rain::RainPlugin;
use sequencer::SequencerPlugin;
use stages::Stage;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "MOVEBUSS".into(),
                ..default()
            }),
            ..default()
        }))
        .init_state::<Stage>()
        .add_plugins((
            SequencerPlugin,
            GalaxyPlugin,
            EarthPlugin,
            RainPlugin,
            BusPlugin,
            DashboardPlugin,
        ))
        .run();
}
