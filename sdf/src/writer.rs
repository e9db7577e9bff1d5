use anyhow::Result;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use geom::{trim_f64, LonLat, Pt3D};

use crate::{Building, ModelPlacement, Road, WorldDocument};

pub const SDF_VERSION: &str = "1.6";

const MATERIAL_SCRIPT_URI: &str = "file://media/materials/scripts/gazebo.material";
const GROUND_MATERIAL: &str = "Gazebo/Grey";

impl WorldDocument {
    /// Serializes the document to SDF XML, entirely in memory. Callers write the returned
    /// string in one shot, so an aborted run never leaves a partial file behind.
    ///
    /// Element order is fixed: spherical coordinates, ground plane, then models, buildings and
    /// roads, each ascending by id.
    pub fn to_xml(&self) -> Result<String> {
        let mut w = Writer::new_with_indent(Vec::new(), b' ', 2);
        w.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        open_with(&mut w, "sdf", &[("version", SDF_VERSION)])?;
        open_with(&mut w, "world", &[("name", &self.name)])?;

        write_spherical_coordinates(&mut w, self.origin)?;
        write_ground_plane(&mut w, self.ground_extent)?;
        for model in &self.models {
            write_model(&mut w, model)?;
        }
        for building in &self.buildings {
            write_building(&mut w, building)?;
        }
        for road in &self.roads {
            write_road(&mut w, road)?;
        }

        close(&mut w, "world")?;
        close(&mut w, "sdf")?;
        Ok(String::from_utf8(w.into_inner())?)
    }
}

fn write_spherical_coordinates(w: &mut Writer<Vec<u8>>, origin: LonLat) -> Result<()> {
    open(w, "spherical_coordinates")?;
    leaf(w, "surface_model", "EARTH_WGS84")?;
    leaf(w, "latitude_deg", &origin.latitude.to_string())?;
    leaf(w, "longitude_deg", &origin.longitude.to_string())?;
    leaf(w, "elevation", "0")?;
    leaf(w, "heading_deg", "0")?;
    close(w, "spherical_coordinates")
}

fn write_ground_plane(w: &mut Writer<Vec<u8>>, extent: Pt3D) -> Result<()> {
    let size = format!("{} {}", extent.x(), extent.y());
    // The region spans [0, extent], so the plane sits at its middle.
    let center = Pt3D::new(extent.x() / 2.0, extent.y() / 2.0, 0.0);

    open_with(w, "model", &[("name", "ground_plane")])?;
    leaf(w, "static", "true")?;
    leaf(w, "pose", &pose(center))?;
    open_with(w, "link", &[("name", "link")])?;
    open_with(w, "collision", &[("name", "collision")])?;
    write_plane_geometry(w, &size)?;
    close(w, "collision")?;
    open_with(w, "visual", &[("name", "visual")])?;
    leaf(w, "cast_shadows", "false")?;
    write_plane_geometry(w, &size)?;
    open(w, "material")?;
    open(w, "script")?;
    leaf(w, "uri", MATERIAL_SCRIPT_URI)?;
    leaf(w, "name", GROUND_MATERIAL)?;
    close(w, "script")?;
    close(w, "material")?;
    close(w, "visual")?;
    close(w, "link")?;
    close(w, "model")
}

fn write_plane_geometry(w: &mut Writer<Vec<u8>>, size: &str) -> Result<()> {
    open(w, "geometry")?;
    open(w, "plane")?;
    leaf(w, "normal", "0 0 1")?;
    leaf(w, "size", size)?;
    close(w, "plane")?;
    close(w, "geometry")
}

fn write_model(w: &mut Writer<Vec<u8>>, model: &ModelPlacement) -> Result<()> {
    open(w, "include")?;
    leaf(w, "uri", &format!("model://{}", model.model))?;
    leaf(w, "name", &format!("{}_{}", model.model, model.id))?;
    leaf(w, "pose", &pose(model.pose))?;
    close(w, "include")
}

fn write_building(w: &mut Writer<Vec<u8>>, building: &Building) -> Result<()> {
    open_with(w, "model", &[("name", &format!("building_{}", building.id))])?;
    leaf(w, "static", "true")?;
    leaf(w, "pose", &pose(building.center))?;
    open_with(w, "link", &[("name", "link")])?;
    open_with(w, "collision", &[("name", "collision")])?;
    write_footprint_geometry(w, building)?;
    close(w, "collision")?;
    open_with(w, "visual", &[("name", "visual")])?;
    write_footprint_geometry(w, building)?;
    let rgba = format!(
        "{} {} {} 1",
        building.color.r, building.color.g, building.color.b
    );
    open(w, "material")?;
    leaf(w, "ambient", &rgba)?;
    leaf(w, "diffuse", &rgba)?;
    close(w, "material")?;
    close(w, "visual")?;
    close(w, "link")?;
    close(w, "model")
}

fn write_footprint_geometry(w: &mut Writer<Vec<u8>>, building: &Building) -> Result<()> {
    open(w, "geometry")?;
    open(w, "polyline")?;
    // The polyline closes itself, so the duplicated closing vertex stays out of the document.
    // Points are relative to the model pose at the centroid.
    for pt in &building.footprint[..building.footprint.len() - 1] {
        leaf(
            w,
            "point",
            &format!(
                "{} {}",
                trim_f64(pt.x() - building.center.x()),
                trim_f64(pt.y() - building.center.y())
            ),
        )?;
    }
    leaf(w, "height", &building.height.inner_meters().to_string())?;
    close(w, "polyline")?;
    close(w, "geometry")
}

fn write_road(w: &mut Writer<Vec<u8>>, road: &Road) -> Result<()> {
    open_with(w, "road", &[("name", &format!("road_{}", road.id))])?;
    leaf(w, "width", &road.width.inner_meters().to_string())?;
    for pt in &road.center_points {
        leaf(w, "point", &format!("{} {} {}", pt.x(), pt.y(), pt.z()))?;
    }
    close(w, "road")
}

fn pose(pt: Pt3D) -> String {
    // Identity orientation; roll/pitch/yaw stay 0.
    format!("{} {} {} 0 0 0", pt.x(), pt.y(), pt.z())
}

fn open(w: &mut Writer<Vec<u8>>, tag: &str) -> Result<()> {
    w.write_event(Event::Start(BytesStart::new(tag)))?;
    Ok(())
}

fn open_with(w: &mut Writer<Vec<u8>>, tag: &str, attrs: &[(&str, &str)]) -> Result<()> {
    let mut el = BytesStart::new(tag);
    for (key, value) in attrs {
        el.push_attribute((*key, *value));
    }
    w.write_event(Event::Start(el))?;
    Ok(())
}

fn close(w: &mut Writer<Vec<u8>>, tag: &str) -> Result<()> {
    w.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn leaf(w: &mut Writer<Vec<u8>>, tag: &str, text: &str) -> Result<()> {
    open(w, tag)?;
    w.write_event(Event::Text(BytesText::new(text)))?;
    close(w, tag)
}
