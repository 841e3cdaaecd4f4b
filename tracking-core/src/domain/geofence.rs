use serde::{Deserialize, Serialize};
use snafu::ResultExt;

use crate::{
    Coordinate, GeofenceId, GeometryError,
    geometry::distinct_vertex_count,
    geometry_error::{CenterSnafu, RadiusSnafu, TooFewVerticesSnafu, VertexSnafu},
};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Geofence {
    pub id: GeofenceId,
    pub name: String,
    pub shape: GeofenceShape,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GeofenceShape {
    #[serde(rename_all = "camelCase")]
    Circle {
        center: Coordinate,
        radius_meters: f64,
    },
    /// An ordered ring of vertices, implicitly closed.
    Polygon { ring: Vec<Coordinate> },
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeofenceMembership {
    pub geofence_id: GeofenceId,
    pub name: String,
    pub inside: bool,
}

impl GeofenceShape {
    /// Checks that the stored shape can be evaluated at all.
    pub fn validate(&self) -> Result<(), GeometryError> {
        match self {
            GeofenceShape::Circle {
                center,
                radius_meters,
            } => {
                center.validate().context(CenterSnafu)?;
                if !radius_meters.is_finite() || *radius_meters < 0.0 {
                    return RadiusSnafu {
                        radius: *radius_meters,
                    }
                    .fail();
                }
                Ok(())
            }
            GeofenceShape::Polygon { ring } => {
                for (index, vertex) in ring.iter().enumerate() {
                    vertex.validate().context(VertexSnafu { index })?;
                }
                let count = distinct_vertex_count(ring);
                if count < 3 {
                    return TooFewVerticesSnafu { count }.fail();
                }
                Ok(())
            }
        }
    }
}
