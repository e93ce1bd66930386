use super::geo::{is_within_service_area, BoundingBox, GeoPoint, Polygon};
use smartstring::alias::String;

pub const MAKOLA: &str = "Makola";

const MAKOLA_BOUNDS: BoundingBox = BoundingBox {
    north: 6.981,
    south: 6.9695,
    east: 79.958,
    west: 79.94,
};

// (lat, lng), clockwise from the north-west corner
const MAKOLA_VERTICES: [(f64, f64); 12] = [
    (6.9800, 79.9450),
    (6.9805, 79.9500),
    (6.9798, 79.9555),
    (6.9770, 79.9575),
    (6.9740, 79.9570),
    (6.9712, 79.9560),
    (6.9700, 79.9530),
    (6.9698, 79.9480),
    (6.9705, 79.9440),
    (6.9723, 79.9410),
    (6.9750, 79.9405),
    (6.9780, 79.9420),
];

/// A named jurisdiction. Issue reports are accepted only for points inside
/// both its bounding box and its polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceArea {
    pub name: String,
    pub bounds: BoundingBox,
    pub polygon: Polygon,
}

impl ServiceArea {
    pub fn new(name: &str, bounds: BoundingBox, polygon: Polygon) -> Self {
        ServiceArea {
            name: name.into(),
            bounds,
            polygon,
        }
    }

    pub fn makola() -> Self {
        let polygon = MAKOLA_VERTICES.to_vec().into();
        ServiceArea::new(MAKOLA, MAKOLA_BOUNDS, polygon)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    /// Centroid of the polygon, used to center maps on the area.
    pub fn center(&self) -> Option<GeoPoint> {
        self.polygon.centroid()
    }

    pub fn is_within(&self, point: &GeoPoint) -> bool {
        is_within_service_area(point, &self.bounds, &self.polygon)
    }

    /// Vertices the bounding box does not cover. Any entry means the box
    /// rejects part of the polygon and the configuration should be fixed.
    pub fn vertices_outside_bounds(&self) -> Vec<(usize, GeoPoint)> {
        self.polygon
            .vertices()
            .iter()
            .enumerate()
            .filter(|(_, vertex)| !self.bounds.contains(vertex))
            .map(|(idx, vertex)| (idx, *vertex))
            .collect()
    }
}

impl Default for ServiceArea {
    fn default() -> Self {
        ServiceArea::makola()
    }
}
