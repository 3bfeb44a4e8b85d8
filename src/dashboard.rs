// Operational dashboard: searchable line grid and the telemetry modal.

use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;

use crate::catalog::{self, BusLine};
use crate::stages::{ACCENT_GREEN, ALERT_RED, Stage};

pub struct DashboardPlugin;

impl Plugin for DashboardPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SearchTerm>()
            .init_resource::<SelectedLine>()
            .add_systems(OnEnter(Stage::Dashboard), setup_dashboard)
            .add_systems(
                Update,
                (
                    search_input,
                    sync_search_text,
                    rebuild_cards,
                    card_visuals,
                    card_actions,
                    modal_actions,
                    scroll_dashboard,
                    sweep_scanlines,
                )
                    .run_if(in_state(Stage::Dashboard)),
            );
    }
}

const PANEL_BG: Color = Color::srgba(0.0, 0.1, 0.05, 0.9);
const CARD_BORDER: Color = Color::srgb(0.0, 0.27, 0.13);
const SEARCH_PLACEHOLDER: &str = "BUSCAR LINHA OU DESTINO...";
/// Pixels per wheel line.
const SCROLL_LINE: f32 = 40.0;
/// Scanline sweep period over a photo frame, seconds.
const SCAN_PERIOD: f32 = 3.0;

/// Live search string, edited from raw keyboard input.
#[derive(Resource, Default)]
pub struct SearchTerm(pub String);

/// Which line's telemetry modal is open, if any.
#[derive(Resource, Default)]
pub struct SelectedLine(pub Option<&'static BusLine>);

#[derive(Component)]
struct DashboardRoot;

#[derive(Component)]
struct SearchText;

#[derive(Component)]
struct CardsGrid;

#[derive(Component)]
struct LineCard(&'static BusLine);

#[derive(Component)]
struct ModalRoot;

#[derive(Component)]
struct ModalPanel;

#[derive(Component)]
struct ModalClose;

#[derive(Component)]
struct Scanline;

fn setup_dashboard(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut search: ResMut<SearchTerm>,
    mut selected: ResMut<SelectedLine>,
) {
    // Fresh UI state; the ResMut writes also force the first grid build.
    *search = SearchTerm::default();
    *selected = SelectedLine::default();

    commands
        .spawn((
            DashboardRoot,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Center,
                overflow: Overflow::scroll_y(),
                ..default()
            },
            ScrollPosition(Vec2::ZERO),
            DespawnOnExit(Stage::Dashboard),
        ))
        .with_children(|root| {
            root.spawn(Node {
                width: Val::Px(1100.0),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(20.0),
                padding: UiRect::axes(Val::Px(16.0), Val::Px(24.0)),
                ..default()
            })
            .with_children(|content| {
                spawn_header(content);
                spawn_photo_frame(content, &asset_server, "photos/frota.png");

                // Search field.
                content
                    .spawn((
                        Node {
                            width: Val::Percent(100.0),
                            padding: UiRect::axes(Val::Px(16.0), Val::Px(12.0)),
                            border: UiRect::all(Val::Px(1.0)),
                            ..default()
                        },
                        BorderColor::all(ACCENT_GREEN.with_alpha(0.5)),
                        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.8)),
                    ))
                    .with_children(|field| {
                        field.spawn((
                            SearchText,
                            Text::new(SEARCH_PLACEHOLDER),
                            TextFont {
                                font_size: 16.0,
                                ..default()
                            },
                            TextColor(ACCENT_GREEN.with_alpha(0.5)),
                        ));
                    });

                content
                    .spawn(Node {
                        width: Val::Percent(100.0),
                        justify_content: JustifyContent::Center,
                        ..default()
                    })
                    .with_children(|hint| {
                        hint.spawn((
                            Text::new("[ SELECIONE UMA LINHA PARA TELEMETRIA ]"),
                            TextFont {
                                font_size: 13.0,
                                ..default()
                            },
                            TextColor(ALERT_RED),
                        ));
                    });

                // Card grid, rebuilt whenever the search term changes.
                content.spawn((
                    CardsGrid,
                    Node {
                        width: Val::Percent(100.0),
                        flex_direction: FlexDirection::Row,
                        flex_wrap: FlexWrap::Wrap,
                        column_gap: Val::Px(12.0),
                        row_gap: Val::Px(12.0),
                        ..default()
                    },
                ));

                spawn_photo_frame(content, &asset_server, "photos/operacao.png");
                spawn_footer(content);
            });
        });
}

fn spawn_header(parent: &mut ChildSpawnerCommands) {
    parent
        .spawn((
            Node {
                width: Val::Percent(100.0),
                justify_content: JustifyContent::SpaceBetween,
                align_items: AlignItems::FlexEnd,
                padding: UiRect::bottom(Val::Px(16.0)),
                border: UiRect::bottom(Val::Px(1.0)),
                ..default()
            },
            BorderColor::all(ACCENT_GREEN.with_alpha(0.3)),
        ))
        .with_children(|header| {
            header
                .spawn(Node {
                    flex_direction: FlexDirection::Column,
                    row_gap: Val::Px(4.0),
                    ..default()
                })
                .with_children(|left| {
                    left.spawn((
                        Text::new("MOVEBUSS"),
                        TextFont {
                            font_size: 36.0,
                            ..default()
                        },
                        TextColor(ACCENT_GREEN),
                    ));
                    left.spawn((
                        Text::new("C O N T R O L E   O P E R A C I O N A L"),
                        TextFont {
                            font_size: 11.0,
                            ..default()
                        },
                        TextColor(Color::srgba(1.0, 1.0, 1.0, 0.5)),
                    ));
                });
            header
                .spawn(Node {
                    flex_direction: FlexDirection::Column,
                    align_items: AlignItems::FlexEnd,
                    row_gap: Val::Px(2.0),
                    ..default()
                })
                .with_children(|right| {
                    right.spawn((
                        Text::new("SYSTEM ACTIVE: YES"),
                        TextFont {
                            font_size: 11.0,
                            ..default()
                        },
                        TextColor(ACCENT_GREEN),
                    ));
                    for line in ["R. Murta do Campo, 405 - Vila Alpina", "São Paulo - SP, 03210-010"] {
                        right.spawn((
                            Text::new(line),
                            TextFont {
                                font_size: 11.0,
                                ..default()
                            },
                            TextColor(Color::srgba(1.0, 1.0, 1.0, 0.7)),
                        ));
                    }
                });
        });
}

/// Bordered photo panel with the animated scanline sweep. A missing asset
/// leaves the frame empty, which is all the handling the photos get.
fn spawn_photo_frame(
    parent: &mut ChildSpawnerCommands,
    asset_server: &AssetServer,
    path: &'static str,
) {
    parent
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Px(200.0),
                border: UiRect::all(Val::Px(1.0)),
                overflow: Overflow::clip(),
                ..default()
            },
            BorderColor::all(ACCENT_GREEN.with_alpha(0.5)),
            BackgroundColor(Color::BLACK),
        ))
        .with_children(|frame| {
            frame.spawn((
                ImageNode::new(asset_server.load(path)),
                Node {
                    width: Val::Percent(100.0),
                    height: Val::Percent(100.0),
                    ..default()
                },
            ));
            frame.spawn((
                Scanline,
                Node {
                    position_type: PositionType::Absolute,
                    width: Val::Percent(100.0),
                    height: Val::Px(2.0),
                    top: Val::Percent(0.0),
                    ..default()
                },
                BackgroundColor(ACCENT_GREEN),
            ));
        });
}

fn spawn_footer(parent: &mut ChildSpawnerCommands) {
    parent
        .spawn((
            Node {
                width: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Center,
                row_gap: Val::Px(6.0),
                padding: UiRect::top(Val::Px(20.0)),
                border: UiRect::top(Val::Px(1.0)),
                ..default()
            },
            BorderColor::all(Color::srgba(1.0, 1.0, 1.0, 0.1)),
        ))
        .with_children(|footer| {
            footer.spawn((
                Text::new("SISTEMA OPERACIONAL MOVEBUSS // 2026"),
                TextFont {
                    font_size: 11.0,
                    ..default()
                },
                TextColor(Color::srgba(1.0, 1.0, 1.0, 0.3)),
            ));
            footer.spawn((
                Text::new("movebuss.com.br"),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(ACCENT_GREEN),
            ));
        });
}

/// Feed printable keystrokes into the search term.
fn search_input(mut keys: MessageReader<KeyboardInput>, mut search: ResMut<SearchTerm>) {
    for key in keys.read() {
        if !key.state.is_pressed() {
            continue;
        }
        match &key.logical_key {
            Key::Character(chars) => {
                for c in chars.chars().filter(|c| !c.is_control()) {
                    search.0.push(c);
                }
            }
            Key::Space => search.0.push(' '),
            Key::Backspace => {
                search.0.pop();
            }
            _ => {}
        }
    }
}

fn sync_search_text(
    search: Res<SearchTerm>,
    mut texts: Query<(&mut Text, &mut TextColor), With<SearchText>>,
) {
    if !search.is_changed() {
        return;
    }
    let Ok((mut text, mut color)) = texts.single_mut() else {
        return;
    };
    if search.0.is_empty() {
        **text = SEARCH_PLACEHOLDER.to_string();
        color.0 = ACCENT_GREEN.with_alpha(0.5);
    } else {
        **text = search.0.clone();
        color.0 = ACCENT_GREEN;
    }
}

fn rebuild_cards(
    mut commands: Commands,
    search: Res<SearchTerm>,
    grids: Query<Entity, With<CardsGrid>>,
) {
    if !search.is_changed() {
        return;
    }
    let Ok(grid) = grids.single() else {
        return;
    };

    commands.entity(grid).despawn_related::<Children>();
    commands.entity(grid).with_children(|cards| {
        for line in catalog::filter_lines(&search.0) {
            cards
                .spawn((
                    LineCard(line),
                    Button,
                    Node {
                        width: Val::Px(352.0),
                        flex_direction: FlexDirection::Column,
                        row_gap: Val::Px(4.0),
                        padding: UiRect::all(Val::Px(14.0)),
                        border: UiRect::all(Val::Px(1.0)),
                        ..default()
                    },
                    BorderColor::all(CARD_BORDER),
                    BackgroundColor(PANEL_BG),
                ))
                .with_children(|card| {
                    card.spawn((
                        Text::new(line.code),
                        TextFont {
                            font_size: 18.0,
                            ..default()
                        },
                        TextColor(ALERT_RED),
                    ));
                    card.spawn((
                        Text::new(line.name),
                        TextFont {
                            font_size: 13.0,
                            ..default()
                        },
                        TextColor(Color::srgba(1.0, 1.0, 1.0, 0.8)),
                    ));
                });
        }
    });
}

fn card_visuals(
    mut query: Query<
        (&Interaction, &mut BorderColor),
        (Changed<Interaction>, With<LineCard>),
    >,
) {
    for (interaction, mut border) in &mut query {
        *border = match *interaction {
            Interaction::Hovered | Interaction::Pressed => BorderColor::all(ACCENT_GREEN),
            Interaction::None => BorderColor::all(CARD_BORDER),
        };
    }
}

fn card_actions(
    query: Query<(&Interaction, &LineCard), Changed<Interaction>>,
    mut selected: ResMut<SelectedLine>,
    open_modals: Query<Entity, With<ModalRoot>>,
    mut commands: Commands,
) {
    for (interaction, card) in &query {
        if *interaction != Interaction::Pressed {
            continue;
        }
        for entity in &open_modals {
            commands.entity(entity).despawn();
        }
        selected.0 = Some(card.0);
        spawn_modal(&mut commands, card.0);
    }
}

fn spawn_modal(commands: &mut Commands, line: &'static BusLine) {
    let metrics = catalog::lookup_metrics(line.code);
    let rows = [
        ("TEMPO DE VIAGEM", format!("{} min", metrics.trip_minutes)),
        ("INTERVALO", format!("{} min", metrics.headway_minutes)),
        ("DISTÂNCIA", format!("{:.1} km", metrics.distance_km)),
        ("FROTA", format!("{} veículos", metrics.fleet)),
        ("ÔNIBUS/HORA", format!("{}", metrics.vehicles_per_hour())),
    ];

    commands
        .spawn((
            ModalRoot,
            // The backdrop is itself a button: pressing it closes the modal.
            Button,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.8)),
            GlobalZIndex(400),
            DespawnOnExit(Stage::Dashboard),
        ))
        .with_children(|backdrop| {
            backdrop
                .spawn((
                    // Also a button, so clicks inside land here instead of
                    // on the closing backdrop.
                    ModalPanel,
                    Button,
                    Node {
                        width: Val::Px(420.0),
                        flex_direction: FlexDirection::Column,
                        row_gap: Val::Px(10.0),
                        padding: UiRect::all(Val::Px(24.0)),
                        border: UiRect::all(Val::Px(2.0)),
                        ..default()
                    },
                    BorderColor::all(ACCENT_GREEN),
                    BackgroundColor(Color::BLACK),
                ))
                .with_children(|panel| {
                    panel.spawn((
                        Text::new(format!("LINHA {}", line.code)),
                        TextFont {
                            font_size: 22.0,
                            ..default()
                        },
                        TextColor(ALERT_RED),
                    ));
                    panel.spawn((
                        Text::new(line.name),
                        TextFont {
                            font_size: 14.0,
                            ..default()
                        },
                        TextColor(Color::srgba(1.0, 1.0, 1.0, 0.8)),
                    ));

                    for (label, value) in rows {
                        panel
                            .spawn(Node {
                                width: Val::Percent(100.0),
                                justify_content: JustifyContent::SpaceBetween,
                                ..default()
                            })
                            .with_children(|row| {
                                row.spawn((
                                    Text::new(label),
                                    TextFont {
                                        font_size: 13.0,
                                        ..default()
                                    },
                                    TextColor(Color::srgba(1.0, 1.0, 1.0, 0.5)),
                                ));
                                row.spawn((
                                    Text::new(value),
                                    TextFont {
                                        font_size: 13.0,
                                        ..default()
                                    },
                                    TextColor(ACCENT_GREEN),
                                ));
                            });
                    }

                    panel
                        .spawn((
                            ModalClose,
                            Button,
                            Node {
                                justify_content: JustifyContent::Center,
                                padding: UiRect::axes(Val::Px(0.0), Val::Px(10.0)),
                                margin: UiRect::top(Val::Px(8.0)),
                                border: UiRect::all(Val::Px(1.0)),
                                ..default()
                            },
                            BorderColor::all(ACCENT_GREEN.with_alpha(0.5)),
                            BackgroundColor(Color::srgba(0.0, 0.2, 0.1, 0.6)),
                        ))
                        .with_children(|close| {
                            close.spawn((
                                Text::new("FECHAR"),
                                TextFont {
                                    font_size: 14.0,
                                    ..default()
                                },
                                TextColor(ACCENT_GREEN),
                            ));
                        });
                });
        });
}

fn modal_actions(
    closers: Query<
        (&Interaction, Option<&ModalClose>, Option<&ModalRoot>, Option<&ModalPanel>),
        Changed<Interaction>,
    >,
    open_modals: Query<Entity, With<ModalRoot>>,
    mut selected: ResMut<SelectedLine>,
    mut commands: Commands,
) {
    for (interaction, close, backdrop, panel) in &closers {
        if *interaction != Interaction::Pressed {
            continue;
        }
        // The panel swallows clicks; only FECHAR and the backdrop close.
        if panel.is_some() || (close.is_none() && backdrop.is_none()) {
            continue;
        }
        selected.0 = None;
        for entity in &open_modals {
            commands.entity(entity).despawn();
        }
    }
}

fn scroll_dashboard(
    mut wheels: MessageReader<MouseWheel>,
    mut roots: Query<&mut ScrollPosition, With<DashboardRoot>>,
) {
    let Ok(mut scroll) = roots.single_mut() else {
        wheels.clear();
        return;
    };
    for wheel in wheels.read() {
        let dy = match wheel.unit {
            MouseScrollUnit::Line => wheel.y * SCROLL_LINE,
            MouseScrollUnit::Pixel => wheel.y,
        };
        scroll.0.y -= dy;
    }
}

fn sweep_scanlines(time: Res<Time>, mut scanlines: Query<&mut Node, With<Scanline>>) {
    let sweep = (time.elapsed_secs() % SCAN_PERIOD) / SCAN_PERIOD * 100.0;
    for mut node in &mut scanlines {
        node.top = Val::Percent(sweep);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CATALOG;

    fn dashboard_app() -> App {
        let mut app = App::new();
        app.init_resource::<SearchTerm>();
        app.init_resource::<SelectedLine>();
        app.add_systems(Update, (card_actions, modal_actions));
        app
    }

    #[test]
    fn pressing_a_card_selects_its_line_and_opens_the_modal() {
        let mut app = dashboard_app();
        app.world_mut()
            .spawn((LineCard(&CATALOG[2]), Interaction::Pressed));
        app.update();

        let selected = app.world().resource::<SelectedLine>();
        assert_eq!(selected.0.map(|l| l.code), Some("414P-10"));

        let mut modals = app.world_mut().query_filtered::<Entity, With<ModalRoot>>();
        assert_eq!(modals.iter(app.world()).count(), 1);
    }

    #[test]
    fn close_button_clears_the_selection_and_modal() {
        let mut app = dashboard_app();
        app.world_mut()
            .spawn((LineCard(&CATALOG[0]), Interaction::Pressed));
        app.update();

        let close = {
            let mut closers = app.world_mut().query_filtered::<Entity, With<ModalClose>>();
            closers.iter(app.world()).next().expect("modal close button")
        };
        app.world_mut().entity_mut(close).insert(Interaction::Pressed);
        app.update();

        assert!(app.world().resource::<SelectedLine>().0.is_none());
        let mut modals = app.world_mut().query_filtered::<Entity, With<ModalRoot>>();
        assert_eq!(modals.iter(app.world()).count(), 0);
    }

    #[test]
    fn clicks_inside_the_panel_do_not_close_the_modal() {
        let mut app = dashboard_app();
        app.world_mut()
            .spawn((LineCard(&CATALOG[0]), Interaction::Pressed));
        app.update();

        let panel = {
            let mut panels = app.world_mut().query_filtered::<Entity, With<ModalPanel>>();
            panels.iter(app.world()).next().expect("modal panel")
        };
        app.world_mut().entity_mut(panel).insert(Interaction::Pressed);
        app.update();

        assert!(app.world().resource::<SelectedLine>().0.is_some());
        let mut modals = app.world_mut().query_filtered::<Entity, With<ModalRoot>>();
        assert_eq!(modals.iter(app.world()).count(), 1);
    }

    #[test]
    fn selecting_another_card_replaces_the_open_modal() {
        let mut app = dashboard_app();
        app.world_mut()
            .spawn((LineCard(&CATALOG[0]), Interaction::Pressed));
        app.update();
        app.world_mut()
            .spawn((LineCard(&CATALOG[1]), Interaction::Pressed));
        app.update();

        let selected = app.world().resource::<SelectedLine>();
        assert_eq!(selected.0.map(|l| l.code), Some("3112-10"));
        let mut modals = app.world_mut().query_filtered::<Entity, With<ModalRoot>>();
        assert_eq!(modals.iter(app.world()).count(), 1);
    }
}
