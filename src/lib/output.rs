use super::area::ServiceArea;
use super::error::Result;
use super::geo::{BoundingBox, GeoPoint};
use super::geojson::{Entity, Geometry};
use super::request::ValidationResult;
use serde::Serialize;
use serde_json::{json, to_string, Value};
use std::collections::HashMap;
use std::io::Write;

pub trait Output {
    fn write_geojson(&self, writer: &mut dyn Write) -> Result<()>;
    fn write_json_lines(&self, writer: &mut dyn Write) -> Result<()>;
}

#[derive(Serialize)]
struct JSONArea<'a> {
    name: &'a str,
    bounds: &'a BoundingBox,
    #[serde(skip_serializing_if = "Option::is_none")]
    center: Option<GeoPoint>,
}

impl Output for Vec<ServiceArea> {
    fn write_json_lines(&self, writer: &mut dyn Write) -> Result<()> {
        for area in self.iter() {
            let json_area = JSONArea {
                name: area.name(),
                bounds: area.bounds(),
                center: area.center(),
            };
            let json = to_string(&json_area)?;
            writeln!(writer, "{}", json)?;
        }
        Ok(())
    }

    fn write_geojson(&self, writer: &mut dyn Write) -> Result<()> {
        let features = self
            .iter()
            .map(|area| {
                let coordinates = vec![area.polygon().exterior_ring()];
                let geometry = Geometry::Polygon { coordinates };
                let bounds = area.bounds();
                let mut properties: HashMap<String, Value> = HashMap::new();
                properties.insert("name".into(), area.name().into());
                properties.insert(
                    "bounds".into(),
                    json!([bounds.west, bounds.south, bounds.east, bounds.north]),
                );
                if let Some(center) = area.center() {
                    let center: [f64; 2] = center.into();
                    properties.insert("center".into(), json!(center));
                }
                Entity::Feature {
                    geometry,
                    properties,
                }
            })
            .collect();

        let feature_collection = Entity::FeatureCollection { features };
        let string = to_string(&feature_collection)?;
        writeln!(writer, "{}", string)?;
        Ok(())
    }
}

impl Output for Vec<ValidationResult> {
    fn write_json_lines(&self, writer: &mut dyn Write) -> Result<()> {
        for result in self.iter() {
            let json = to_string(result)?;
            writeln!(writer, "{}", json)?;
        }
        Ok(())
    }

    /// Results without echoed coordinates have no geometry and are left out.
    fn write_geojson(&self, writer: &mut dyn Write) -> Result<()> {
        let features = self
            .iter()
            .filter_map(|result| {
                let point = result.point()?;
                let geometry = Geometry::Point {
                    coordinates: point.into(),
                };
                let mut properties: HashMap<String, Value> = HashMap::new();
                properties.insert("valid".into(), result.valid.into());
                Some(Entity::Feature {
                    geometry,
                    properties,
                })
            })
            .collect();

        let feature_collection = Entity::FeatureCollection { features };
        let string = to_string(&feature_collection)?;
        writeln!(writer, "{}", string)?;
        Ok(())
    }
}
