//! Text captions over the map plane: the country and capital backdrop, the
//! ecosystem names on restoration sites, and the currency glyph on program
//! markers. Labels counter-scale against the viewport so they hold a
//! constant on-screen size.

use bevy::prelude::*;

use crate::layers::{LayerSet, GOLD, TEAL};
use crate::project;
use crate::viewport::Viewport;

const DOLLAR_BROWN: Color = Color::srgb(0.471, 0.208, 0.059);

/// A map-anchored caption. `anchor` is in map pixels; `offset_px` is a
/// screen-pixel nudge applied on top so it holds at any zoom.
#[derive(Component)]
pub struct MapLabel {
    anchor: Vec2,
    offset_px: Vec2,
}

/// Rebuild the caption set when the classified layers move. The static
/// country and capital captions are part of the rebuild so a single system
/// owns every label entity. Restoration and program captions follow their
/// layers, so mode switches and toggles already filter them.
pub fn sync_labels(
    mut commands: Commands,
    layer_set: Res<LayerSet>,
    viewport: Res<Viewport>,
    existing: Query<Entity, With<MapLabel>>,
) {
    if !layer_set.is_changed() {
        return;
    }
    for entity in &existing {
        commands.entity(entity).despawn();
    }

    spawn_label(
        &mut commands,
        &viewport,
        "KENYA".to_string(),
        project::project(0.5, 37.5),
        Vec2::ZERO,
        40.0,
        Color::srgba(1.0, 1.0, 1.0, 0.1),
    );
    spawn_label(
        &mut commands,
        &viewport,
        "Nairobi".to_string(),
        project::project(-1.29, 36.82),
        Vec2::new(10.0, 0.0),
        12.0,
        Color::srgba(1.0, 1.0, 1.0, 0.5),
    );

    for site in &layer_set.restoration {
        spawn_label(
            &mut commands,
            &viewport,
            site.ecosystem.label().to_uppercase(),
            project::project_point(site.location),
            Vec2::new(0.0, -25.0),
            10.0,
            if site.funded { GOLD } else { TEAL },
        );
    }

    for program in &layer_set.programs {
        spawn_label(
            &mut commands,
            &viewport,
            "$".to_string(),
            project::project_point(program.location),
            Vec2::ZERO,
            14.0,
            DOLLAR_BROWN,
        );
    }
}

/// Keep captions at constant screen size as the viewport glides.
pub fn scale_labels(viewport: Res<Viewport>, mut labels: Query<(&MapLabel, &mut Transform)>) {
    if !viewport.is_changed() {
        return;
    }
    let ssw = 1.0 / viewport.current.scale;
    for (label, mut transform) in &mut labels {
        let world = project::map_to_world(label.anchor + label.offset_px * ssw);
        transform.translation.x = world.x;
        transform.translation.y = world.y;
        transform.scale = Vec3::splat(ssw);
    }
}

fn spawn_label(
    commands: &mut Commands,
    viewport: &Viewport,
    text: String,
    anchor: Vec2,
    offset_px: Vec2,
    font_size: f32,
    color: Color,
) {
    let ssw = 1.0 / viewport.current.scale;
    let world = project::map_to_world(anchor + offset_px * ssw);
    commands.spawn((
        MapLabel { anchor, offset_px },
        Text2d::new(text),
        TextFont {
            font_size,
            ..default()
        },
        TextColor(color),
        Transform::from_translation(world.extend(1.0)).with_scale(Vec3::splat(ssw)),
    ));
}
