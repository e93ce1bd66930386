use geo::prelude::*;
use geo_types::{Coordinate, LineString, Point, Polygon as GeoPolygon, Rect};
use serde::{Deserialize, Serialize};

/// A coordinate pair in degrees.
///
/// Latitude maps to the y axis and longitude to the x axis, both here and in
/// every conversion into `geo_types`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[serde(alias = "lng", alias = "lon")]
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        GeoPoint {
            latitude,
            longitude,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

impl From<GeoPoint> for Coordinate<f64> {
    fn from(point: GeoPoint) -> Self {
        Coordinate {
            x: point.longitude,
            y: point.latitude,
        }
    }
}

impl From<Coordinate<f64>> for GeoPoint {
    fn from(coordinate: Coordinate<f64>) -> Self {
        GeoPoint {
            latitude: coordinate.y,
            longitude: coordinate.x,
        }
    }
}

impl From<Point<f64>> for GeoPoint {
    fn from(point: Point<f64>) -> Self {
        GeoPoint {
            latitude: point.lat(),
            longitude: point.lng(),
        }
    }
}

impl From<GeoPoint> for [f64; 2] {
    fn from(point: GeoPoint) -> Self {
        [point.longitude, point.latitude]
    }
}

impl From<GeoPoint> for (f64, f64) {
    fn from(point: GeoPoint) -> Self {
        (point.longitude, point.latitude)
    }
}

/// Axis-aligned rectangle in degrees. Expected to satisfy `north > south`
/// and `east > west`; the config loader checks this, the geometry does not.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl BoundingBox {
    pub fn contains(&self, point: &GeoPoint) -> bool {
        point.latitude >= self.south
            && point.latitude <= self.north
            && point.longitude >= self.west
            && point.longitude <= self.east
    }

    /// South-west and north-east corners as `[x, y]` pairs.
    pub fn sw_ne(&self) -> ([f64; 2], [f64; 2]) {
        ([self.west, self.south], [self.east, self.north])
    }
}

impl From<Rect<f64>> for BoundingBox {
    fn from(rect: Rect<f64>) -> Self {
        BoundingBox {
            north: rect.max().y,
            south: rect.min().y,
            east: rect.max().x,
            west: rect.min().x,
        }
    }
}

/// An implicitly closed ring of vertices. A trailing vertex repeating the
/// first one is accepted and has no effect on containment.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(transparent)]
pub struct Polygon {
    vertices: Vec<GeoPoint>,
}

impl Polygon {
    pub fn new(vertices: Vec<GeoPoint>) -> Self {
        Polygon { vertices }
    }

    pub fn vertices(&self) -> &[GeoPoint] {
        &self.vertices
    }

    /// Even-odd ray casting with a ray pointing east from `point`.
    ///
    /// Points exactly on an edge may land on either side.
    pub fn contains(&self, point: &GeoPoint) -> bool {
        let vertices = &self.vertices;
        let (x, y) = (point.longitude, point.latitude);
        let mut inside = false;

        for (i, vi) in vertices.iter().enumerate() {
            let j = if i == 0 { vertices.len() - 1 } else { i - 1 };
            let vj = &vertices[j];
            // zero-length edge
            if vi == vj {
                continue;
            }

            let (xi, yi) = (vi.longitude, vi.latitude);
            let (xj, yj) = (vj.longitude, vj.latitude);
            if (yi > y) != (yj > y) {
                let x_intersect = (xj - xi) * (y - yi) / (yj - yi) + xi;
                if x < x_intersect {
                    inside = !inside;
                }
            }
        }

        inside
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let polygon: GeoPolygon<f64> = self.into();
        let rect = polygon.bounding_rect()?;
        Some(rect.into())
    }

    pub fn centroid(&self) -> Option<GeoPoint> {
        let polygon: GeoPolygon<f64> = self.into();
        let point = polygon.centroid()?;
        Some(point.into())
    }

    /// Closed exterior ring as `(lng, lat)` pairs.
    pub fn exterior_ring(&self) -> Vec<(f64, f64)> {
        let polygon: GeoPolygon<f64> = self.into();
        polygon
            .exterior()
            .points_iter()
            .map(|p| (p.lng(), p.lat()))
            .collect()
    }
}

impl From<&Polygon> for GeoPolygon<f64> {
    fn from(polygon: &Polygon) -> Self {
        let coordinates: Vec<Coordinate<f64>> =
            polygon.vertices.iter().map(|&v| v.into()).collect();
        let line_string: LineString<f64> = coordinates.into();
        GeoPolygon::new(line_string, vec![])
    }
}

impl From<Vec<(f64, f64)>> for Polygon {
    /// Builds a polygon from `(lat, lng)` pairs.
    fn from(pairs: Vec<(f64, f64)>) -> Self {
        let vertices = pairs
            .into_iter()
            .map(|(lat, lng)| GeoPoint::new(lat, lng))
            .collect();
        Polygon { vertices }
    }
}

/// Bounding-box pre-filter followed by the polygon test.
pub fn is_within_service_area(point: &GeoPoint, bounds: &BoundingBox, polygon: &Polygon) -> bool {
    bounds.contains(point) && polygon.contains(point)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::*;

    fn unit_square() -> (BoundingBox, Polygon) {
        let bounds = BoundingBox {
            north: 1.,
            south: 0.,
            east: 1.,
            west: 0.,
        };
        let polygon = vec![(0., 0.), (0., 1.), (1., 1.), (1., 0.)].into();
        (bounds, polygon)
    }

    // 1 ---+
    // |    |
    // |  +-+
    // |  |
    // 0--+
    fn notched_square() -> (BoundingBox, Polygon) {
        let (bounds, _) = unit_square();
        let polygon = vec![
            (0., 0.),
            (1., 0.),
            (1., 0.5),
            (0.5, 0.5),
            (0.5, 1.),
            (0., 1.),
        ]
        .into();
        (bounds, polygon)
    }

    #[test]
    fn square_centroid_is_inside() {
        let (bounds, polygon) = unit_square();
        let point = GeoPoint::new(0.5, 0.5);
        assert!(is_within_service_area(&point, &bounds, &polygon));
    }

    #[test]
    fn far_point_is_outside() {
        let (bounds, polygon) = unit_square();
        let point = GeoPoint::new(5., 5.);
        assert!(!is_within_service_area(&point, &bounds, &polygon));
    }

    #[test]
    fn outside_box_is_rejected_regardless_of_polygon() {
        let bounds = BoundingBox {
            north: 1.,
            south: 0.,
            east: 1.,
            west: 0.,
        };
        // the polygon covers far more than the box
        let polygon: Polygon = vec![(-10., -10.), (-10., 10.), (10., 10.), (10., -10.)].into();
        for &(lat, lng) in &[(1.5, 0.5), (-0.5, 0.5), (0.5, 1.5), (0.5, -0.5), (3., 3.)] {
            let point = GeoPoint::new(lat, lng);
            assert!(polygon.contains(&point));
            assert!(!is_within_service_area(&point, &bounds, &polygon));
        }
    }

    #[test]
    fn box_alone_does_not_decide() {
        let (bounds, polygon) = notched_square();
        let notch = GeoPoint::new(0.75, 0.75);
        assert!(bounds.contains(&notch));
        assert!(!is_within_service_area(&notch, &bounds, &polygon));

        let upper_arm = GeoPoint::new(0.75, 0.25);
        let right_arm = GeoPoint::new(0.25, 0.75);
        assert!(is_within_service_area(&upper_arm, &bounds, &polygon));
        assert!(is_within_service_area(&right_arm, &bounds, &polygon));
    }

    #[test]
    fn triangle_is_enough() {
        let polygon: Polygon = vec![(0., 0.), (2., 1.), (0., 2.)].into();
        assert!(polygon.contains(&GeoPoint::new(0.5, 1.)));
        assert!(!polygon.contains(&GeoPoint::new(1.5, 0.2)));
    }

    #[test]
    fn transposed_axes_change_the_result() {
        let bounds = BoundingBox {
            north: 10.,
            south: -10.,
            east: 10.,
            west: -10.,
        };
        let polygon: Polygon = vec![(0., 0.), (0., 4.), (1., 0.)].into();
        let transposed: Polygon = vec![(0., 0.), (4., 0.), (0., 1.)].into();
        let point = GeoPoint::new(0.5, 1.5);
        assert!(is_within_service_area(&point, &bounds, &polygon));
        assert!(!is_within_service_area(&point, &bounds, &transposed));
    }

    #[test]
    fn explicit_closing_vertex_is_harmless() {
        let open: Polygon = vec![(0., 0.), (0., 1.), (1., 1.), (1., 0.)].into();
        let closed: Polygon = vec![(0., 0.), (0., 1.), (1., 1.), (1., 0.), (0., 0.)].into();
        for &(lat, lng) in &[(0.5, 0.5), (0.1, 0.9), (1.5, 0.5), (0.5, -0.2)] {
            let point = GeoPoint::new(lat, lng);
            assert_eq!(open.contains(&point), closed.contains(&point));
        }
    }

    #[test]
    fn duplicate_vertices_are_skipped() {
        let polygon: Polygon = vec![(0., 0.), (0., 1.), (0., 1.), (1., 1.), (1., 0.), (1., 0.)].into();
        assert!(polygon.contains(&GeoPoint::new(0.5, 0.5)));
        assert!(!polygon.contains(&GeoPoint::new(0.5, 1.5)));
    }

    #[test]
    fn degenerate_polygon_contains_nothing() {
        let empty = Polygon::new(vec![]);
        assert!(!empty.contains(&GeoPoint::new(0., 0.)));
        let line: Polygon = vec![(0., 0.), (1., 1.)].into();
        assert!(!line.contains(&GeoPoint::new(0.5, 0.2)));
    }

    #[test]
    fn repeated_calls_agree() {
        let (bounds, polygon) = notched_square();
        let point = GeoPoint::new(0.25, 0.75);
        let first = is_within_service_area(&point, &bounds, &polygon);
        let second = is_within_service_area(&point, &bounds, &polygon);
        assert_eq!(first, second);
    }

    #[test]
    fn agrees_with_geo_contains_on_clear_points() {
        let (_, polygon) = notched_square();
        let geo_polygon: GeoPolygon<f64> = (&polygon).into();
        for &(lat, lng) in &[(0.25, 0.25), (0.75, 0.25), (0.25, 0.75), (0.75, 0.75), (2., 2.)] {
            let point = GeoPoint::new(lat, lng);
            let geo_point = Point::new(lng, lat);
            assert_eq!(polygon.contains(&point), geo_polygon.contains(&geo_point));
        }
    }

    #[test]
    fn bounding_box_of_polygon() {
        let (_, polygon) = notched_square();
        let bounds = polygon.bounding_box().unwrap();
        assert_relative_eq!(bounds.north, 1.);
        assert_relative_eq!(bounds.south, 0.);
        assert_relative_eq!(bounds.east, 1.);
        assert_relative_eq!(bounds.west, 0.);
    }

    #[test]
    fn centroid_of_square() {
        let (_, polygon) = unit_square();
        let center = polygon.centroid().unwrap();
        assert_relative_eq!(center.latitude, 0.5, epsilon = 1e-9);
        assert_relative_eq!(center.longitude, 0.5, epsilon = 1e-9);
    }

    #[test]
    fn exterior_ring_is_closed_and_lng_first() {
        let polygon: Polygon = vec![(6., 79.), (6., 80.), (7., 80.)].into();
        let ring = polygon.exterior_ring();
        assert_eq!(ring, vec![(79., 6.), (80., 6.), (80., 7.), (79., 6.)]);
    }
}
