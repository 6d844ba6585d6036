//! Scene description loader
//!
//! Reads the XML document that places meshes and lights:
//!
//! ```xml
//! <scene>
//!     <mesh name="planet">
//!         <model>models/sphere.obj</model>
//!         <position>0, 0, -10</position>
//!         <rotation>0, 0, 0</rotation>
//!         <scale>1</scale>
//!         <color>40, 120, 220</color>
//!         <speed>1.5</speed>
//!         <children>
//!             <mesh name="moon">...</mesh>
//!         </children>
//!     </mesh>
//!     <light>
//!         <position>10, 10, 0</position>
//!         <rotation>0, 0, 0</rotation>
//!         <scale>1</scale>
//!         <intensity>1</intensity>
//!     </light>
//! </scene>
//! ```
//!
//! Rotations are in degrees and `speed` in degrees per frame. Any element the
//! loader does not recognise aborts the whole load.

use crate::foundation::math::{Vec3, utils};
use crate::render::lighting::Light;
use crate::render::primitives::Color;
use roxmltree::Node;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Scene loading errors
#[derive(Error, Debug)]
pub enum SceneError {
    /// The scene file could not be read
    #[error("Failed to read scene {path}: {source}")]
    Io {
        /// Scene file path
        path: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The document is not well-formed XML
    #[error("XML error: {0}")]
    Xml(#[from] roxmltree::Error),

    /// The root element is not `<scene>`
    #[error("Expected root element <scene>, found <{0}>")]
    UnexpectedRoot(String),

    /// An element the loader does not know about
    #[error("Unknown element <{element}> inside <{parent}>")]
    UnknownElement {
        /// Offending element name
        element: String,
        /// Enclosing element name
        parent: String,
    },

    /// An element whose text could not be parsed
    #[error("Malformed <{element}> value '{value}': {reason}")]
    Malformed {
        /// Element name
        element: String,
        /// Raw text
        value: String,
        /// What was expected
        reason: String,
    },

    /// A required element is absent
    #[error("<{parent}> is missing required <{element}>")]
    MissingElement {
        /// Enclosing element name
        parent: String,
        /// Missing element name
        element: String,
    },

    /// Two sibling meshes share a name
    #[error("Duplicate node name '{0}' among siblings")]
    DuplicateName(String),
}

/// One `<mesh>` element and its subtree
#[derive(Debug, Clone, PartialEq)]
pub struct MeshDescription {
    /// Node name, unique among siblings
    pub name: String,
    /// Mesh file reference as written in the document
    pub model: PathBuf,
    /// Local position
    pub position: Vec3,
    /// Local rotation in degrees around X, Y and Z
    pub rotation: Vec3,
    /// Uniform scale
    pub scale: f32,
    /// Base color
    pub color: Color,
    /// Y-axis spin in degrees per frame
    pub rotation_speed: f32,
    /// Nested meshes
    pub children: Vec<MeshDescription>,
}

/// One `<light>` element
#[derive(Debug, Clone, PartialEq)]
pub struct LightDescription {
    /// Light position
    pub position: Vec3,
    /// Rotation in degrees
    pub rotation: Vec3,
    /// Uniform scale
    pub scale: f32,
    /// Intensity scalar
    pub intensity: f32,
}

impl LightDescription {
    /// Build the runtime light (angles converted to radians)
    pub fn to_light(&self) -> Light {
        Light::new(
            self.position,
            self.rotation.map(utils::deg_to_rad),
            self.scale,
            self.intensity,
        )
    }
}

/// Parsed scene document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneDescription {
    /// Root meshes in document order
    pub meshes: Vec<MeshDescription>,
    /// Lights in document order
    pub lights: Vec<LightDescription>,
}

impl SceneDescription {
    /// Read and parse a scene file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Parse a scene document
    pub fn parse(text: &str) -> Result<Self, SceneError> {
        let document = roxmltree::Document::parse(text)?;
        let root = document.root_element();

        if root.tag_name().name() != "scene" {
            return Err(SceneError::UnexpectedRoot(root.tag_name().name().to_string()));
        }

        let mut scene = Self::default();
        for element in root.children().filter(Node::is_element) {
            match element.tag_name().name() {
                "mesh" => {
                    let index = scene.meshes.len();
                    scene.meshes.push(parse_mesh(element, index)?);
                }
                "light" => scene.lights.push(parse_light(element)?),
                other => return Err(unknown(other, "scene")),
            }
        }

        log::debug!("Parsed scene: {} root mesh(es), {} light(s)", scene.meshes.len(), scene.lights.len());
        Ok(scene)
    }
}

fn unknown(element: &str, parent: &str) -> SceneError {
    SceneError::UnknownElement {
        element: element.to_string(),
        parent: parent.to_string(),
    }
}

fn malformed(element: &str, value: &str, reason: impl Into<String>) -> SceneError {
    SceneError::Malformed {
        element: element.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

fn element_text<'a>(element: Node<'a, '_>) -> &'a str {
    element.text().map_or("", str::trim)
}

fn parse_floats<const N: usize>(element: Node) -> Result<[f32; N], SceneError> {
    let name = element.tag_name().name();
    let text = element_text(element);

    let values = text
        .split(',')
        .map(|part| part.trim().parse::<f32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| malformed(name, text, e.to_string()))?;

    values
        .try_into()
        .map_err(|values: Vec<f32>| malformed(name, text, format!("expected {} value(s), found {}", N, values.len())))
}

fn parse_vec3(element: Node) -> Result<Vec3, SceneError> {
    let [x, y, z] = parse_floats::<3>(element)?;
    Ok(Vec3::new(x, y, z))
}

fn parse_scalar(element: Node) -> Result<f32, SceneError> {
    let [value] = parse_floats::<1>(element)?;
    Ok(value)
}

fn parse_color(element: Node) -> Result<Color, SceneError> {
    let [r, g, b] = parse_floats::<3>(element)?;
    let channel = |value: f32| {
        if (0.0..=255.0).contains(&value) {
            Ok(value as u8)
        } else {
            Err(malformed("color", element_text(element), format!("channel {value} outside 0..=255")))
        }
    };
    Ok(Color::rgb(channel(r)?, channel(g)?, channel(b)?))
}

fn parse_mesh(element: Node, index: usize) -> Result<MeshDescription, SceneError> {
    let mut model = None;
    let mut position = Vec3::zeros();
    let mut rotation = Vec3::zeros();
    let mut scale = 1.0;
    let mut color = Color::WHITE;
    let mut rotation_speed = 0.0;
    let mut children = Vec::new();

    for tag in element.children().filter(Node::is_element) {
        match tag.tag_name().name() {
            "model" => {
                let text = element_text(tag);
                if text.is_empty() {
                    return Err(malformed("model", text, "empty mesh reference"));
                }
                model = Some(PathBuf::from(text));
            }
            "position" => position = parse_vec3(tag)?,
            "rotation" => rotation = parse_vec3(tag)?,
            "scale" => scale = parse_scalar(tag)?,
            "color" => color = parse_color(tag)?,
            "speed" => rotation_speed = parse_scalar(tag)?,
            "children" => children = parse_children(tag)?,
            other => return Err(unknown(other, "mesh")),
        }
    }

    let model = model.ok_or_else(|| SceneError::MissingElement {
        parent: "mesh".to_string(),
        element: "model".to_string(),
    })?;

    let name = element
        .attribute("name")
        .map(str::to_string)
        .or_else(|| model.file_stem().map(|stem| stem.to_string_lossy().to_string()))
        .unwrap_or_else(|| format!("mesh{index}"));

    Ok(MeshDescription {
        name,
        model,
        position,
        rotation,
        scale,
        color,
        rotation_speed,
        children,
    })
}

fn parse_children(element: Node) -> Result<Vec<MeshDescription>, SceneError> {
    let mut names = HashSet::new();
    let mut children = Vec::new();

    for child in element.children().filter(Node::is_element) {
        if child.tag_name().name() != "mesh" {
            return Err(unknown(child.tag_name().name(), "children"));
        }
        let mesh = parse_mesh(child, children.len())?;
        if !names.insert(mesh.name.clone()) {
            return Err(SceneError::DuplicateName(mesh.name));
        }
        children.push(mesh);
    }

    Ok(children)
}

fn parse_light(element: Node) -> Result<LightDescription, SceneError> {
    let mut light = LightDescription {
        position: Vec3::zeros(),
        rotation: Vec3::zeros(),
        scale: 1.0,
        intensity: 1.0,
    };

    for tag in element.children().filter(Node::is_element) {
        match tag.tag_name().name() {
            "position" => light.position = parse_vec3(tag)?,
            "rotation" => light.rotation = parse_vec3(tag)?,
            "scale" => light.scale = parse_scalar(tag)?,
            "intensity" => light.intensity = parse_scalar(tag)?,
            other => return Err(unknown(other, "light")),
        }
    }

    Ok(light)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const ONE_MESH_ONE_LIGHT: &str = r#"
        <scene>
            <!-- a single cube -->
            <mesh>
                <model>models/cube.obj</model>
                <position>1, 2, -10</position>
                <rotation>0, 90, 0</rotation>
                <scale>2</scale>
                <color>255, 128, 0</color>
            </mesh>
            <light>
                <position>0, 10, 0</position>
                <rotation>0, 0, 0</rotation>
                <scale>1</scale>
                <intensity>0.8</intensity>
            </light>
        </scene>"#;

    #[test]
    fn test_one_mesh_one_light() {
        let scene = SceneDescription::parse(ONE_MESH_ONE_LIGHT).unwrap();

        assert_eq!(scene.meshes.len(), 1);
        assert_eq!(scene.lights.len(), 1);

        let mesh = &scene.meshes[0];
        assert_eq!(mesh.name, "cube");
        assert_eq!(mesh.model, PathBuf::from("models/cube.obj"));
        assert_eq!(mesh.position, Vec3::new(1.0, 2.0, -10.0));
        assert_eq!(mesh.rotation, Vec3::new(0.0, 90.0, 0.0));
        assert_eq!(mesh.scale, 2.0);
        assert_eq!(mesh.color, Color::rgb(255, 128, 0));
        assert_eq!(mesh.rotation_speed, 0.0);
        assert!(mesh.children.is_empty());

        assert_relative_eq!(scene.lights[0].intensity, 0.8);
    }

    #[test]
    fn test_named_children() {
        let text = r#"
            <scene>
                <mesh name="sun">
                    <model>sun.obj</model>
                    <speed>2</speed>
                    <children>
                        <mesh name="earth"><model>sphere.obj</model></mesh>
                        <mesh name="mars"><model>sphere.obj</model></mesh>
                    </children>
                </mesh>
            </scene>"#;
        let scene = SceneDescription::parse(text).unwrap();

        let sun = &scene.meshes[0];
        assert_eq!(sun.name, "sun");
        assert_eq!(sun.rotation_speed, 2.0);
        let names: Vec<_> = sun.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["earth", "mars"]);
    }

    #[test]
    fn test_duplicate_sibling_names_rejected() {
        let text = r#"
            <scene>
                <mesh><model>a.obj</model>
                    <children>
                        <mesh><model>sphere.obj</model></mesh>
                        <mesh><model>sphere.obj</model></mesh>
                    </children>
                </mesh>
            </scene>"#;
        assert!(matches!(SceneDescription::parse(text), Err(SceneError::DuplicateName(name)) if name == "sphere"));
    }

    #[test]
    fn test_unknown_element_aborts() {
        let text = "<scene><camera/></scene>";
        assert!(matches!(SceneDescription::parse(text), Err(SceneError::UnknownElement { .. })));

        let text = "<scene><light><colour>1,1,1</colour></light></scene>";
        assert!(matches!(SceneDescription::parse(text), Err(SceneError::UnknownElement { .. })));
    }

    #[test]
    fn test_wrong_root() {
        assert!(matches!(SceneDescription::parse("<world/>"), Err(SceneError::UnexpectedRoot(root)) if root == "world"));
    }

    #[test]
    fn test_malformed_values() {
        let short = "<scene><mesh><model>a.obj</model><position>1, 2</position></mesh></scene>";
        assert!(matches!(SceneDescription::parse(short), Err(SceneError::Malformed { .. })));

        let text = "<scene><light><intensity>bright</intensity></light></scene>";
        assert!(matches!(SceneDescription::parse(text), Err(SceneError::Malformed { .. })));

        let color = "<scene><mesh><model>a.obj</model><color>300, 0, 0</color></mesh></scene>";
        assert!(matches!(SceneDescription::parse(color), Err(SceneError::Malformed { .. })));
    }

    #[test]
    fn test_mesh_requires_model() {
        let text = "<scene><mesh><scale>1</scale></mesh></scene>";
        assert!(matches!(SceneDescription::parse(text), Err(SceneError::MissingElement { .. })));
    }

    #[test]
    fn test_not_xml() {
        assert!(matches!(SceneDescription::parse("<scene>"), Err(SceneError::Xml(_))));
    }

    #[test]
    fn test_light_angles_converted() {
        let light = LightDescription {
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Vec3::new(180.0, 0.0, 90.0),
            scale: 1.0,
            intensity: 0.5,
        }
        .to_light();

        assert_relative_eq!(light.rotation().x, std::f32::consts::PI, epsilon = 1e-6);
        assert_relative_eq!(light.rotation().z, std::f32::consts::FRAC_PI_2, epsilon = 1e-6);
        assert_eq!(light.intensity(), 0.5);
    }
}
