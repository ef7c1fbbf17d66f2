//! Equirectangular projection of Kenya onto a fixed map plane.
//!
//! Geographic coordinates project into "map space": a y-down pixel plane of
//! `MAP_WIDTH` x `MAP_HEIGHT` covering the country's bounding box. Marker
//! geometry, hit testing, and viewport fitting all happen in map space;
//! only the final draw step converts to Bevy's y-up world coordinates.

use bevy::prelude::*;
use session::geo::GeoPoint;

pub const MAP_WIDTH: f32 = 800.0;
pub const MAP_HEIGHT: f32 = 1000.0;

/// Kenya bounding box, degrees.
const MIN_LNG: f32 = 33.5;
const MAX_LNG: f32 = 42.0;
const MIN_LAT: f32 = -5.0;
const MAX_LAT: f32 = 5.5;

/// Approximate national boundary, lat/lng pairs, closed loop.
pub const KENYA_BOUNDARY_POINTS: [(f32, f32); 9] = [
    (4.6, 35.5),  // NW corner (Turkana)
    (3.9, 41.8),  // NE corner (Mandera)
    (-1.0, 41.0), // east (Somalia border)
    (-2.0, 40.7), // coast north
    (-4.7, 39.2), // south coast (Shimoni)
    (-3.0, 37.5), // south (Kilimanjaro border)
    (-1.0, 34.0), // SW (Lake Victoria)
    (1.0, 34.5),  // west (Mt Elgon)
    (4.6, 35.5),  // close loop
];

/// Geographic center used for the no-data default view.
pub const KENYA_CENTER: GeoPoint = GeoPoint::new(0.0236, 37.9062);

/// Project lat/lng into map space. Y grows southward.
pub fn project(lat: f64, lng: f64) -> Vec2 {
    let x_norm = (lng as f32 - MIN_LNG) / (MAX_LNG - MIN_LNG);
    let y_norm = (lat as f32 - MIN_LAT) / (MAX_LAT - MIN_LAT);
    Vec2::new(x_norm * MAP_WIDTH, MAP_HEIGHT - y_norm * MAP_HEIGHT)
}

pub fn project_point(point: GeoPoint) -> Vec2 {
    project(point.lat, point.lng)
}

/// Inverse of `project`: a map-plane position back to geographic
/// coordinates. Click handling uses it to resolve the cursor.
pub fn unproject(map: Vec2) -> GeoPoint {
    let x_norm = map.x / MAP_WIDTH;
    let y_norm = (MAP_HEIGHT - map.y) / MAP_HEIGHT;
    GeoPoint::new(
        (MIN_LAT + y_norm * (MAX_LAT - MIN_LAT)) as f64,
        (MIN_LNG + x_norm * (MAX_LNG - MIN_LNG)) as f64,
    )
}

/// Map space to Bevy world space: centered on the map, y flipped upward.
pub fn map_to_world(map: Vec2) -> Vec2 {
    Vec2::new(map.x - MAP_WIDTH / 2.0, MAP_HEIGHT / 2.0 - map.y)
}

pub fn world_to_map(world: Vec2) -> Vec2 {
    Vec2::new(world.x + MAP_WIDTH / 2.0, MAP_HEIGHT / 2.0 - world.y)
}

/// Axis-aligned bounds of a point set in map space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl MapBounds {
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }
}

/// Bounds of a point set; an empty set yields the whole map plane.
pub fn bounds_of(points: &[Vec2]) -> MapBounds {
    if points.is_empty() {
        return MapBounds {
            min: Vec2::ZERO,
            max: Vec2::new(MAP_WIDTH, MAP_HEIGHT),
        };
    }
    let mut min = Vec2::splat(f32::INFINITY);
    let mut max = Vec2::splat(f32::NEG_INFINITY);
    for p in points {
        min = min.min(*p);
        max = max.max(*p);
    }
    MapBounds { min, max }
}

/// Pan/zoom state over the map plane, expressed the way a screen transform
/// would be: `screen = translate + scale * map`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapTransform {
    pub translate: Vec2,
    pub scale: f32,
}

impl MapTransform {
    pub const IDENTITY: Self = Self {
        translate: Vec2::ZERO,
        scale: 1.0,
    };

    /// The map-space point currently centered in the viewport.
    pub fn center(&self) -> Vec2 {
        (Vec2::new(MAP_WIDTH, MAP_HEIGHT) / 2.0 - self.translate) / self.scale
    }

    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            translate: self.translate.lerp(other.translate, t),
            scale: self.scale + (other.scale - self.scale) * t,
        }
    }
}

/// Pixels kept clear around fitted bounds.
const FIT_PADDING: f32 = 150.0;
/// Scale used when fitting a single point (or a degenerate flat bounds).
const POINT_FOCUS_SCALE: f32 = 50.0;

/// Transform that centers `bounds` in the viewport with padding, then
/// applies `zoom` on top. Degenerate bounds (single point, straight line)
/// get a fixed close-up scale instead.
pub fn fit_bounds(bounds: MapBounds, zoom: f32) -> MapTransform {
    let width = bounds.width();
    let height = bounds.height();

    if width == 0.0 || height == 0.0 {
        return MapTransform {
            translate: Vec2::new(MAP_WIDTH / 2.0 - bounds.min.x, MAP_HEIGHT / 2.0 - bounds.min.y),
            scale: POINT_FOCUS_SCALE * zoom,
        };
    }

    let available_width = MAP_WIDTH - FIT_PADDING * 2.0;
    let available_height = MAP_HEIGHT - FIT_PADDING * 2.0;
    let scale = (available_width / width).min(available_height / height) * zoom;

    let center = bounds.center();
    MapTransform {
        translate: Vec2::new(MAP_WIDTH, MAP_HEIGHT) / 2.0 - center * scale,
        scale,
    }
}

/// Fit a set of geographic points. An empty set centers on Kenya at unit
/// scale.
pub fn fit_geo_points(points: &[GeoPoint], zoom: f32) -> MapTransform {
    if points.is_empty() {
        let center = project_point(KENYA_CENTER);
        return MapTransform {
            translate: Vec2::new(MAP_WIDTH / 2.0, MAP_HEIGHT / 2.0) - center,
            scale: 1.0,
        };
    }
    let projected: Vec<Vec2> = points.iter().map(|p| project_point(*p)).collect();
    fit_bounds(bounds_of(&projected), zoom)
}

/// Fit the national boundary itself, the default view before any data loads.
pub fn fit_kenya(zoom: f32) -> MapTransform {
    let projected: Vec<Vec2> = KENYA_BOUNDARY_POINTS
        .iter()
        .map(|(lat, lng)| project(*lat as f64, *lng as f64))
        .collect();
    fit_bounds(bounds_of(&projected), zoom)
}

/// Even-odd ray cast in map space.
pub fn point_in_polygon(point: Vec2, polygon: &[Vec2]) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let a = polygon[i];
        let b = polygon[j];
        if (a.y > point.y) != (b.y > point.y) {
            let x_cross = (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x;
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_maps_bounds_to_plane_corners() {
        let nw = project(MAX_LAT as f64, MIN_LNG as f64);
        assert!(nw.abs_diff_eq(Vec2::new(0.0, 0.0), 1e-3));
        let se = project(MIN_LAT as f64, MAX_LNG as f64);
        assert!(se.abs_diff_eq(Vec2::new(MAP_WIDTH, MAP_HEIGHT), 1e-3));
    }

    #[test]
    fn test_projection_of_nairobi() {
        let p = project(-1.25, 36.85);
        assert!((p.x - 315.294).abs() < 0.01, "x was {}", p.x);
        assert!((p.y - 642.857).abs() < 0.01, "y was {}", p.y);
    }

    #[test]
    fn test_world_round_trip() {
        let map = Vec2::new(315.3, 642.9);
        let back = world_to_map(map_to_world(map));
        assert!(back.abs_diff_eq(map, 1e-4));
    }

    #[test]
    fn test_unproject_inverts_project_within_bounds() {
        let fixes = [
            GeoPoint::new(-1.25, 36.85),
            GeoPoint::new(4.6, 35.5),
            GeoPoint::new(-4.2, 39.5),
            GeoPoint::new(0.0, 37.75),
        ];
        for fix in fixes {
            let back = unproject(project_point(fix));
            assert!((back.lat - fix.lat).abs() < 1e-3, "lat {} became {}", fix.lat, back.lat);
            assert!((back.lng - fix.lng).abs() < 1e-3, "lng {} became {}", fix.lng, back.lng);
        }
    }

    #[test]
    fn test_empty_bounds_cover_whole_plane() {
        let bounds = bounds_of(&[]);
        assert_eq!(bounds.min, Vec2::ZERO);
        assert_eq!(bounds.max, Vec2::new(MAP_WIDTH, MAP_HEIGHT));
    }

    #[test]
    fn test_fit_bounds_pads_and_centers() {
        let bounds = MapBounds {
            min: Vec2::new(100.0, 100.0),
            max: Vec2::new(300.0, 200.0),
        };
        let fitted = fit_bounds(bounds, 1.0);
        // Width 200 against 500 available, height 100 against 700 available.
        assert!((fitted.scale - 2.5).abs() < 1e-4);
        // Bounds center lands on the viewport center.
        let center = bounds.center();
        let centered = fitted.translate + center * fitted.scale;
        assert!(centered.abs_diff_eq(Vec2::new(400.0, 500.0), 1e-3));
    }

    #[test]
    fn test_fit_keeps_corners_inside_padding() {
        let boxes = [
            MapBounds {
                min: Vec2::new(100.0, 100.0),
                max: Vec2::new(300.0, 200.0),
            },
            MapBounds {
                min: Vec2::ZERO,
                max: Vec2::new(MAP_WIDTH, MAP_HEIGHT),
            },
            MapBounds {
                min: Vec2::new(650.0, 20.0),
                max: Vec2::new(780.0, 940.0),
            },
        ];
        for bounds in boxes {
            let fitted = fit_bounds(bounds, 1.0);
            let corners = [
                bounds.min,
                bounds.max,
                Vec2::new(bounds.min.x, bounds.max.y),
                Vec2::new(bounds.max.x, bounds.min.y),
            ];
            for corner in corners {
                let placed = fitted.translate + corner * fitted.scale;
                assert!(
                    placed.x >= FIT_PADDING - 1e-3 && placed.x <= MAP_WIDTH - FIT_PADDING + 1e-3,
                    "corner x {placed:?} escaped the padded surface"
                );
                assert!(
                    placed.y >= FIT_PADDING - 1e-3 && placed.y <= MAP_HEIGHT - FIT_PADDING + 1e-3,
                    "corner y {placed:?} escaped the padded surface"
                );
            }
        }
    }

    #[test]
    fn test_fit_single_point_uses_focus_scale() {
        let point = project(-1.25, 36.85);
        let fitted = fit_bounds(bounds_of(&[point]), 8.0);
        assert!((fitted.scale - 400.0).abs() < 1e-3);
        assert!((fitted.translate.x - (400.0 - point.x)).abs() < 1e-3);
    }

    #[test]
    fn test_fit_empty_geo_set_centers_kenya_at_unit_scale() {
        let fitted = fit_geo_points(&[], 0.9);
        assert!((fitted.scale - 1.0).abs() < f32::EPSILON);
        assert!(fitted.center().abs_diff_eq(project_point(KENYA_CENTER), 1e-3));
    }

    #[test]
    fn test_transform_center_inverts_fit() {
        let points = [GeoPoint::new(-0.55, 35.7), GeoPoint::new(-1.285, 36.89)];
        let fitted = fit_geo_points(&points, 0.9);
        let projected: Vec<Vec2> = points.iter().map(|p| project_point(*p)).collect();
        let expected = bounds_of(&projected).center();
        assert!(fitted.center().abs_diff_eq(expected, 1e-2));
    }

    #[test]
    fn test_point_in_polygon_square() {
        let square = [
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ];
        assert!(point_in_polygon(Vec2::new(5.0, 5.0), &square));
        assert!(!point_in_polygon(Vec2::new(15.0, 5.0), &square));
        assert!(!point_in_polygon(Vec2::new(-1.0, 5.0), &square));
    }

    #[test]
    fn test_nairobi_inside_kenya_boundary() {
        let boundary: Vec<Vec2> = KENYA_BOUNDARY_POINTS
            .iter()
            .map(|(lat, lng)| project(*lat as f64, *lng as f64))
            .collect();
        assert!(point_in_polygon(project(-1.29, 36.82), &boundary));
        // Off the coast, outside the loop.
        assert!(!point_in_polygon(project(-4.0, 41.5), &boundary));
    }
}
