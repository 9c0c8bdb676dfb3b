//! Builds a [`Model`] from an AFE file.

use std::path::Path;
use tracing::{debug, info, warn};

use super::container::classify;
use super::markup::{MarkupDecoder, XmlDecoder, XmlNode};
use crate::config::{Dimensions, LengthUnit};
use crate::error::{Diagnostic, ImportError, Result};
use crate::model::{Component, Joint, LabeledPoint, Model, Point2D, Support};

/// Walks a decoded AFE tree and fills in a [`Model`].
///
/// Expected markup:
///
/// ```text
/// <File Title="..." LengthUnit="ft">
///   <Elements>
///     <Ided TypeID="Joint" ObjectId="3">
///       <Point Label="Origin" x="0" y="0"/>
///     </Ided>
///     <Ided TypeID="Component" ObjectId="2">
///       <StartJoint ObjId="3"/>
///       <EndJoint ObjId="4"/>
///     </Ided>
///     <Ided TypeID="Support" ObjectId="1"/>
///   </Elements>
/// </File>
/// ```
#[derive(Debug, Clone, Default)]
pub struct ModelBuilder {
    defaults: Dimensions,
}

impl ModelBuilder {
    /// Create a builder whose models start with the given dimensions.
    pub fn new(defaults: Dimensions) -> Self {
        Self { defaults }
    }

    /// Build a model from the root element of a decoded file.
    ///
    /// Never fails: a missing `Elements` collection or an unresolvable
    /// member is recorded as a diagnostic and the rest is still built.
    pub fn build(&self, root: &XmlNode, filename: &str) -> Model {
        let mut model = Model::new(filename, self.defaults);

        if let Some(title) = root.field("Title").filter(|t| !t.is_empty()) {
            model.title = title.to_string();
        }

        if let Some(unit) = root.field("LengthUnit").filter(|u| !u.is_empty()) {
            model.length_unit = LengthUnit::from_attr(unit);
            if !model.length_unit.is_known() {
                warn!(
                    "Unrecognized length unit '{}', using values unconverted",
                    unit
                );
            }
        }

        match root.child("Elements") {
            Some(elements) => self.collect_elements(&mut model, elements),
            None => {
                warn!("{}", Diagnostic::MissingElements);
                model.diagnostics.push(Diagnostic::MissingElements);
            }
        }

        compute_extents(&mut model);

        info!(
            "Read {} joint(s), {} component(s), {} support(s)",
            model.joints.len(),
            model.components.len(),
            model.supports.len()
        );

        model
    }

    /// Route each element into the joint, component or support table.
    fn collect_elements(&self, model: &mut Model, elements: &XmlNode) {
        for elem in &elements.children {
            let Some(type_id) = elem.field("TypeID") else {
                continue;
            };
            let id = elem.field("ObjectId").unwrap_or_default().to_string();

            match type_id {
                "Joint" => {
                    let joint = parse_joint(elem, id.clone());
                    model.joints.insert(id, joint);
                }
                "Component" => {
                    let component = parse_component(elem, id.clone());
                    model.components.insert(id, component);
                }
                "Support" => {
                    let support = Support {
                        id: id.clone(),
                        attributes: elem.attributes.clone(),
                    };
                    model.supports.insert(id, support);
                }
                other => debug!("Skipping element {} of type {}", id, other),
            }
        }
    }
}

/// Parse a joint and its labeled points.
fn parse_joint(elem: &XmlNode, id: String) -> Joint {
    let points = elem
        .children_named("Point")
        .filter_map(|p| {
            let label = p.field("Label").unwrap_or_default();
            match (p.number("x"), p.number("y")) {
                (Some(x), Some(y)) => Some(LabeledPoint {
                    label: label.to_string(),
                    point: Point2D::new(x, y),
                }),
                _ => {
                    debug!("Joint {}: point '{}' has no numeric x/y", id, label);
                    None
                }
            }
        })
        .collect();

    Joint { id, points }
}

/// Parse a component's joint references.
fn parse_component(elem: &XmlNode, id: String) -> Component {
    let joint_ref = |name: &str| {
        elem.child(name)
            .and_then(|j| j.field("ObjId"))
            .unwrap_or_default()
            .to_string()
    };

    Component {
        start_joint: joint_ref("StartJoint"),
        end_joint: joint_ref("EndJoint"),
        id,
    }
}

/// Compute bounds and member length extrema over all resolvable members.
fn compute_extents(model: &mut Model) {
    let resolved: Vec<_> = model
        .components
        .values()
        .map(|c| model.canonical_endpoints(c))
        .collect();

    for result in resolved {
        match result {
            Ok((start, end)) => {
                model.bounds.include(start);
                model.bounds.include(end);
                model.line_lengths.include(start.distance_to(end));
            }
            Err(diag) => {
                warn!("{}", diag);
                model.diagnostics.push(diag);
            }
        }
    }
}

/// Parse an AFE buffer (text or binary container) into a model.
pub fn parse_afe_bytes(bytes: &[u8], filename: &str, defaults: Dimensions) -> Result<Model> {
    parse_afe_bytes_with(&XmlDecoder, bytes, filename, defaults)
}

/// Parse an AFE buffer using a specific markup decoder.
pub fn parse_afe_bytes_with<D: MarkupDecoder>(
    decoder: &D,
    bytes: &[u8],
    filename: &str,
    defaults: Dimensions,
) -> Result<Model> {
    let container = classify(bytes)?;
    debug!(
        "{}: {:?} container, markup bytes {:?}",
        filename, container.kind, container.markup
    );

    let root = decoder.decode(container.markup_bytes(bytes))?;
    Ok(ModelBuilder::new(defaults).build(&root, filename))
}

/// Parse an AFE file from a path.
pub fn parse_afe_file(path: &Path, defaults: Dimensions) -> Result<Model> {
    if !path.exists() {
        return Err(ImportError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let bytes = std::fs::read(path)?;
    let filename = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("input.afe");

    parse_afe_bytes(&bytes, filename, defaults)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const EPS: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    fn joint(id: &str, x: &str, y: &str) -> XmlNode {
        XmlNode::new("Ided")
            .with_attr("TypeID", "Joint")
            .with_attr("ObjectId", id)
            .with_child(
                XmlNode::new("Point")
                    .with_attr("Label", "Origin")
                    .with_attr("x", x)
                    .with_attr("y", y),
            )
    }

    fn component(id: &str, start: &str, end: &str) -> XmlNode {
        XmlNode::new("Ided")
            .with_attr("TypeID", "Component")
            .with_attr("ObjectId", id)
            .with_child(XmlNode::new("StartJoint").with_attr("ObjId", start))
            .with_child(XmlNode::new("EndJoint").with_attr("ObjId", end))
    }

    fn file(unit: &str, elements: Vec<XmlNode>) -> XmlNode {
        let mut list = XmlNode::new("Elements");
        list.children = elements;
        XmlNode::new("File")
            .with_attr("Title", "Truss")
            .with_attr("LengthUnit", unit)
            .with_child(list)
    }

    fn build(root: &XmlNode) -> Model {
        ModelBuilder::default().build(root, "truss.afe")
    }

    // ==================== Element routing tests ====================

    #[test]
    fn test_build_routes_by_type() {
        let root = file(
            "ft",
            vec![
                joint("1", "0", "0"),
                joint("2", "3", "4"),
                component("5", "1", "2"),
                XmlNode::new("Ided")
                    .with_attr("TypeID", "Support")
                    .with_attr("ObjectId", "9")
                    .with_attr("Fixed", "1"),
                XmlNode::new("Ided").with_attr("ObjectId", "77"),
                XmlNode::new("Ided")
                    .with_attr("TypeID", "Load")
                    .with_attr("ObjectId", "78"),
            ],
        );
        let model = build(&root);

        assert_eq!(model.title, "Truss");
        assert_eq!(model.filename, "truss.afe");
        assert_eq!(model.joints.len(), 2);
        assert_eq!(model.components.len(), 1);
        assert_eq!(model.supports.len(), 1);
        assert_eq!(model.supports["9"].attributes.get("Fixed").unwrap(), "1");
        assert_eq!(model.components["5"], Component::new("5", "1", "2"));
        assert!(model.diagnostics.is_empty());
    }

    #[test]
    fn test_build_preserves_component_order() {
        let root = file(
            "ft",
            vec![
                joint("1", "0", "0"),
                joint("2", "1", "0"),
                component("30", "1", "2"),
                component("4", "2", "1"),
                component("12", "1", "2"),
            ],
        );
        let model = build(&root);
        let ids: Vec<_> = model.components.keys().cloned().collect();
        assert_eq!(ids, vec!["30", "4", "12"]);
    }

    #[test]
    fn test_build_single_and_multiple_points() {
        let multi = XmlNode::new("Ided")
            .with_attr("TypeID", "Joint")
            .with_attr("ObjectId", "1")
            .with_child(
                XmlNode::new("Point")
                    .with_attr("Label", "Force")
                    .with_attr("x", "5")
                    .with_attr("y", "5"),
            )
            .with_child(
                XmlNode::new("Point")
                    .with_attr("Label", "Origin")
                    .with_attr("x", "1")
                    .with_attr("y", "2"),
            );
        let root = file("in", vec![multi, joint("2", "0", "0")]);
        let model = build(&root);

        assert_eq!(model.joints["1"].points.len(), 2);
        assert_eq!(model.joints["1"].point("Origin"), Some(Point2D::new(1.0, 2.0)));
        assert_eq!(model.joints["2"].point("Origin"), Some(Point2D::new(0.0, 0.0)));
    }

    // ==================== Header tests ====================

    #[test]
    fn test_build_default_title_and_unit() {
        let root = XmlNode::new("File")
            .with_attr("Title", "")
            .with_child(XmlNode::new("Elements"));
        let model = build(&root);
        assert_eq!(model.title, "ForceEffect Import");
        assert_eq!(model.length_unit, LengthUnit::Foot);
    }

    #[test]
    fn test_build_unknown_unit_passes_through() {
        let root = file(
            "cubit",
            vec![joint("1", "0", "0"), joint("2", "3", "4"), component("3", "1", "2")],
        );
        let model = build(&root);
        assert_eq!(model.length_unit, LengthUnit::Other("cubit".to_string()));
        assert!(approx_eq(model.bounds.x_max, 3.0));
        assert!(approx_eq(model.line_lengths.max, 5.0));
    }

    // ==================== Extents tests ====================

    #[test]
    fn test_build_bounds_and_lengths_in_feet() {
        let root = file(
            "ft",
            vec![joint("1", "0", "0"), joint("2", "3", "4"), component("3", "1", "2")],
        );
        let model = build(&root);

        assert!(approx_eq(model.bounds.x_min, 0.0));
        assert!(approx_eq(model.bounds.y_min, 0.0));
        assert!(approx_eq(model.bounds.x_max, 91.44));
        assert!(approx_eq(model.bounds.y_max, 121.92));
        assert!(approx_eq(model.line_lengths.min, 152.4));
        assert!(approx_eq(model.line_lengths.max, 152.4));
    }

    #[test]
    fn test_build_length_extrema() {
        let root = file(
            "m",
            vec![
                joint("1", "0", "0"),
                joint("2", "1", "0"),
                joint("3", "1", "2"),
                component("10", "1", "2"),
                component("11", "2", "3"),
                component("12", "1", "3"),
            ],
        );
        let model = build(&root);
        assert!(approx_eq(model.line_lengths.min, 100.0));
        assert!(approx_eq(model.line_lengths.max, 5f64.sqrt() * 100.0));
        assert!(approx_eq(model.bounds.y_max, 200.0));
    }

    #[test]
    fn test_build_skips_missing_joint_reference() {
        let root = file(
            "ft",
            vec![
                joint("1", "0", "0"),
                joint("2", "1", "0"),
                component("10", "1", "2"),
                component("11", "2", "99"),
            ],
        );
        let model = build(&root);

        assert_eq!(model.components.len(), 2);
        assert_eq!(
            model.diagnostics,
            vec![Diagnostic::MissingReference {
                component_id: "11".to_string(),
                joint_id: "99".to_string(),
            }]
        );
        assert!(approx_eq(model.bounds.x_max, 30.48));
        assert!(approx_eq(model.line_lengths.min, 30.48));
    }

    #[test]
    fn test_build_skips_non_numeric_point() {
        let root = file(
            "ft",
            vec![joint("1", "0", "0"), joint("2", "abc", "0"), component("10", "1", "2")],
        );
        let model = build(&root);
        assert!(model.joints["2"].points.is_empty());
        assert!(matches!(
            model.diagnostics.as_slice(),
            [Diagnostic::MissingPoint { .. }]
        ));
        assert!(model.is_empty());
    }

    #[test]
    fn test_build_skips_non_finite_point() {
        let root = file(
            "ft",
            vec![
                joint("1", "0", "0"),
                joint("2", "NaN", "0"),
                joint("3", "0", "inf"),
                joint("4", "1", "0"),
                component("10", "1", "2"),
                component("11", "1", "3"),
                component("12", "1", "4"),
            ],
        );
        let model = build(&root);
        assert_eq!(model.diagnostics.len(), 2);
        assert!(model
            .diagnostics
            .iter()
            .all(|d| matches!(d, Diagnostic::MissingPoint { .. })));
        assert!(approx_eq(model.line_lengths.min, 30.48));
        assert!(approx_eq(model.line_lengths.max, 30.48));
        assert!(approx_eq(model.bounds.x_max, 30.48));
    }

    #[test]
    fn test_build_missing_elements_is_empty_model() {
        let root = XmlNode::new("File").with_attr("Title", "Nothing");
        let model = build(&root);
        assert_eq!(model.diagnostics, vec![Diagnostic::MissingElements]);
        assert!(model.is_empty());
        assert!(model.bounds.is_empty());
    }

    // ==================== Byte-level tests ====================

    #[test]
    fn test_parse_text_bytes() {
        let xml = r#"<File Schema="9" Title="Diagram00014" LengthUnit="in">
            <Elements>
              <Ided TypeID="Joint" ObjectId="1"><Point Label="Origin" x="0" y="0"/></Ided>
              <Ided TypeID="Joint" ObjectId="2"><Point Label="Origin" x="10" y="0"/></Ided>
              <Ided TypeID="Component" ObjectId="3"><StartJoint ObjId="1"/><EndJoint ObjId="2"/></Ided>
            </Elements>
        </File>"#;
        let model = parse_afe_bytes(xml.as_bytes(), "d.afe", Dimensions::default()).unwrap();
        assert_eq!(model.title, "Diagram00014");
        assert_eq!(model.length_unit, LengthUnit::Inch);
        assert!(approx_eq(model.line_lengths.max, 25.4));
    }

    #[test]
    fn test_parse_short_buffer_fails() {
        let err = parse_afe_bytes(b"<File/>", "x.afe", Dimensions::default()).unwrap_err();
        assert!(matches!(err, ImportError::InvalidFormat { .. }));
    }

    #[test]
    fn test_parse_missing_file() {
        let err = parse_afe_file(Path::new("/nonexistent/dir/x.afe"), Dimensions::default())
            .unwrap_err();
        assert!(matches!(err, ImportError::FileNotFound { .. }));
    }
}
