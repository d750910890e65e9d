//! Spatial layers for external renderers.
//!
//! Rendering itself is out of scope; these structures are what a map
//! frontend needs to draw a gradient layer and a legend-per-tier layer
//! without re-deriving anything.

use serde::Serialize;

use crate::classify::ServiceTier;
use crate::report::NodeImpactRecord;

/// Scalar choice for the continuous layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarField {
    BasePressureM,
    ClosedPressureM,
    DropM,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContinuousPoint {
    pub node_id: String,
    pub x: f64,
    pub y: f64,
    pub value: f64,
}

/// Gradient-renderable layer: one scalar per positioned node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContinuousLayer {
    pub field: ScalarField,
    pub points: Vec<ContinuousPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoricalPoint {
    pub node_id: String,
    pub x: f64,
    pub y: f64,
}

/// One legend entry worth of nodes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierGroup {
    pub tier: ServiceTier,
    pub color: &'static str,
    pub points: Vec<CategoricalPoint>,
}

/// Tier-grouped layer; the renderer draws one legend entry per group
/// instead of styling points one by one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoricalLayer {
    /// Non-empty tiers in severity order.
    pub groups: Vec<TierGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpatialLayers {
    pub continuous: ContinuousLayer,
    pub categorical: CategoricalLayer,
}

/// The fixed tier → color legend, one entry per tier regardless of which
/// tiers actually occur.
pub fn legend() -> [(ServiceTier, &'static str); 5] {
    ServiceTier::ALL.map(|t| (t, t.legend_color()))
}

/// Join records with their coordinates into the two renderable layers.
///
/// Nodes without a position stay in the tabular report but are absent
/// here; that is the only effect of missing map data.
pub fn build_layers(records: &[NodeImpactRecord], field: ScalarField) -> SpatialLayers {
    let mut continuous = Vec::new();
    for r in records {
        let (Some(x), Some(y)) = (r.x, r.y) else {
            continue;
        };
        if let Some(value) = scalar_of(r, field) {
            continuous.push(ContinuousPoint {
                node_id: r.node_id.clone(),
                x,
                y,
                value,
            });
        }
    }

    let mut groups = Vec::new();
    for tier in ServiceTier::ALL {
        let points: Vec<CategoricalPoint> = records
            .iter()
            .filter(|r| r.status == tier)
            .filter_map(|r| match (r.x, r.y) {
                (Some(x), Some(y)) => Some(CategoricalPoint {
                    node_id: r.node_id.clone(),
                    x,
                    y,
                }),
                _ => None,
            })
            .collect();
        if !points.is_empty() {
            groups.push(TierGroup {
                tier,
                color: tier.legend_color(),
                points,
            });
        }
    }

    SpatialLayers {
        continuous: ContinuousLayer {
            field,
            points: continuous,
        },
        categorical: CategoricalLayer { groups },
    }
}

fn scalar_of(r: &NodeImpactRecord, field: ScalarField) -> Option<f64> {
    match field {
        ScalarField::BasePressureM => r.pressure_base_m,
        ScalarField::ClosedPressureM => r.pressure_closed_m,
        ScalarField::DropM => r.drop_m,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, status: ServiceTier, xy: Option<(f64, f64)>) -> NodeImpactRecord {
        NodeImpactRecord {
            node_id: id.to_string(),
            pressure_base_m: Some(40.0),
            pressure_closed_m: Some(10.0),
            drop_m: Some(30.0),
            pressure_base_bar: Some(40.0 / 10.2),
            pressure_closed_bar: Some(10.0 / 10.2),
            drop_bar: Some(30.0 / 10.2),
            status,
            x: xy.map(|(x, _)| x),
            y: xy.map(|(_, y)| y),
        }
    }

    #[test]
    fn nodes_without_coordinates_are_skipped() {
        let records = vec![
            record("J1", ServiceTier::Ok, Some((1.0, 2.0))),
            record("R1", ServiceTier::Ok, None),
        ];
        let layers = build_layers(&records, ScalarField::DropM);
        assert_eq!(layers.continuous.points.len(), 1);
        assert_eq!(layers.continuous.points[0].node_id, "J1");
        assert_eq!(layers.categorical.groups.len(), 1);
        assert_eq!(layers.categorical.groups[0].points.len(), 1);
    }

    #[test]
    fn continuous_layer_carries_the_chosen_scalar() {
        let records = vec![record("J1", ServiceTier::Low, Some((1.0, 2.0)))];
        let drop = build_layers(&records, ScalarField::DropM);
        assert_eq!(drop.continuous.points[0].value, 30.0);
        let closed = build_layers(&records, ScalarField::ClosedPressureM);
        assert_eq!(closed.continuous.points[0].value, 10.0);
    }

    #[test]
    fn groups_come_out_in_severity_order_without_empties() {
        let records = vec![
            record("J1", ServiceTier::Ok, Some((1.0, 1.0))),
            record("J2", ServiceTier::Dead, Some((2.0, 2.0))),
            record("J3", ServiceTier::Dead, Some((3.0, 3.0))),
        ];
        let layers = build_layers(&records, ScalarField::DropM);
        let tiers: Vec<ServiceTier> = layers.categorical.groups.iter().map(|g| g.tier).collect();
        assert_eq!(tiers, vec![ServiceTier::Dead, ServiceTier::Ok]);
        assert_eq!(layers.categorical.groups[0].points.len(), 2);
        assert_eq!(layers.categorical.groups[0].color, "red");
    }

    #[test]
    fn legend_is_fixed_and_complete() {
        let entries = legend();
        assert_eq!(entries.len(), 5);
        assert_eq!(entries[0], (ServiceTier::Dead, "red"));
        assert_eq!(entries[3], (ServiceTier::Ok, "green"));
        assert_eq!(entries[4], (ServiceTier::Unknown, "gray"));
    }
}
