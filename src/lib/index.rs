use super::area::ServiceArea;
use super::geo::GeoPoint;
use rstar::{RTree, RTreeObject, AABB};

impl RTreeObject for ServiceArea {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        let (sw, ne) = self.bounds.sw_ne();
        AABB::from_corners(sw, ne)
    }
}

/// Several service areas, looked up by their bounding boxes first.
pub struct AreaIndex {
    tree: RTree<ServiceArea>,
}

impl AreaIndex {
    pub fn new(areas: Vec<ServiceArea>) -> Self {
        let tree = RTree::bulk_load(areas);
        AreaIndex { tree }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// All areas containing `point`, in no particular order.
    pub fn locate(&self, point: &GeoPoint) -> Vec<&ServiceArea> {
        let corner: [f64; 2] = (*point).into();
        let envelope = AABB::from_point(corner);
        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .filter(|area| area.polygon.contains(point))
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&ServiceArea> {
        self.tree.iter().find(|area| area.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::BoundingBox;

    fn square(name: &str, south: f64, west: f64) -> ServiceArea {
        let bounds = BoundingBox {
            north: south + 1.,
            south,
            east: west + 1.,
            west,
        };
        let polygon = vec![
            (south, west),
            (south + 1., west),
            (south + 1., west + 1.),
            (south, west + 1.),
        ]
        .into();
        ServiceArea::new(name, bounds, polygon)
    }

    fn names(areas: Vec<&ServiceArea>) -> Vec<&str> {
        let mut names: Vec<&str> = areas.into_iter().map(|area| area.name()).collect();
        names.sort();
        names
    }

    #[test]
    fn locate_single_area() {
        let index = AreaIndex::new(vec![square("a", 0., 0.), square("b", 5., 5.)]);
        assert_eq!(index.len(), 2);
        let matches = index.locate(&GeoPoint::new(0.5, 0.5));
        assert_eq!(names(matches), vec!["a"]);
    }

    #[test]
    fn locate_overlapping_areas() {
        let index = AreaIndex::new(vec![square("a", 0., 0.), square("b", 0.5, 0.5)]);
        let matches = index.locate(&GeoPoint::new(0.75, 0.75));
        assert_eq!(names(matches), vec!["a", "b"]);
    }

    #[test]
    fn locate_nothing() {
        let index = AreaIndex::new(vec![square("a", 0., 0.)]);
        assert!(index.locate(&GeoPoint::new(3., 3.)).is_empty());
    }

    #[test]
    fn box_match_without_polygon_match() {
        let bounds = BoundingBox {
            north: 1.,
            south: 0.,
            east: 1.,
            west: 0.,
        };
        let triangle = vec![(0., 0.), (1., 0.), (0., 1.)].into();
        let index = AreaIndex::new(vec![ServiceArea::new("t", bounds, triangle)]);
        assert!(index.locate(&GeoPoint::new(0.9, 0.9)).is_empty());
        assert_eq!(names(index.locate(&GeoPoint::new(0.2, 0.2))), vec!["t"]);
    }

    #[test]
    fn makola_lookup() {
        let index = AreaIndex::new(vec![ServiceArea::makola(), square("elsewhere", 0., 0.)]);
        let matches = index.locate(&GeoPoint::new(6.9745, 79.95));
        assert_eq!(names(matches), vec!["Makola"]);
        assert!(index.get("Makola").is_some());
        assert!(index.get("Kiribathgoda").is_none());
    }
}
