//! Converts a piece of OpenStreetMap into an SDF world a robotics simulator can load.
//!
//! The pipeline runs in fixed stages: parse the OSM XML into an index, settle on a bounding
//! box and anchor a projection at its southwest corner, classify ways and nodes into
//! roads/buildings/models, derive metric geometry for each, then assemble the world document.
//! Every stage finishes before the next starts, and nothing is written until the whole
//! document exists.

#[macro_use]
extern crate log;

use std::fmt;

use thiserror::Error;

use geom::{Distance, GPSBounds, UtmProjector};
use sdf::{WorldBuilder, WorldDocument};

pub mod catalog;
pub mod classify;
pub mod extract;
pub mod fetch;
pub mod osm;
pub mod osm_reader;

pub use crate::classify::Filter;

/// Everything that aborts a conversion. Warnings, by contrast, drop a single feature and keep
/// going.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// The OSM XML itself is broken or self-contradictory.
    #[error("malformed OSM XML: {0}")]
    Parse(String),
    /// The requested region can't be projected into one local frame.
    #[error("unsupported region: {0}")]
    Projection(String),
    /// The caller didn't give us enough to determine what to convert.
    #[error("{0}")]
    Configuration(String),
    #[error("I/O problem: {0}")]
    Io(#[from] std::io::Error),
}

/// A single dropped or suspicious feature. These accumulate over the run and get reported at
/// the end; the feature just doesn't appear in the output.
#[derive(Clone, Debug, PartialEq)]
pub enum Warning {
    /// A feature matched more than one category's tag rules.
    Classification(String),
    /// A way too degenerate to turn into geometry.
    Geometry(String),
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Warning::Classification(msg) | Warning::Geometry(msg) => write!(f, "{}", msg),
        }
    }
}

pub struct Options {
    pub filter: Filter,
    /// The `<world>` element's name.
    pub world_name: String,
}

impl Options {
    pub fn new(filter: Filter) -> Options {
        Options {
            filter,
            world_name: "default".to_string(),
        }
    }
}

/// Where the raw OSM XML comes from.
#[derive(Debug, PartialEq)]
pub enum Source {
    /// Read this local file; its own bounding box takes precedence.
    File(String),
    /// Fetch the extract covering this bounding box.
    Fetch(GPSBounds),
}

/// Decides between reading a local file and fetching, before anything touches the disk or the
/// network. With no input file and no bounding box there's nothing to convert, and that's a
/// typed error the caller can handle, not a process exit.
pub fn resolve_source(
    input_file: Option<String>,
    bounds: Option<GPSBounds>,
) -> Result<Source, ConvertError> {
    if let Some(path) = input_file {
        return Ok(Source::File(path));
    }
    if let Some(bounds) = bounds {
        return Ok(Source::Fetch(bounds));
    }
    Err(ConvertError::Configuration(
        "nothing to convert: give a bounding box or an input .osm file".to_string(),
    ))
}

/// Runs the whole pipeline on raw OSM XML. `fallback_bounds` is only consulted when the file
/// doesn't declare its own `<bounds>`; as a last resort the bounds are scraped from the nodes.
pub fn convert(
    raw_osm: &str,
    fallback_bounds: Option<GPSBounds>,
    opts: &Options,
) -> Result<(WorldDocument, Vec<Warning>), ConvertError> {
    let doc = osm_reader::read(raw_osm)?;
    info!("The extract has {} nodes and {} ways", doc.nodes.len(), doc.ways.len());

    let bounds = match doc.bounds.clone().or(fallback_bounds).or_else(|| doc.scrape_bounds()) {
        Some(b) => b,
        None => {
            return Err(ConvertError::Configuration(
                "neither the .osm file nor the command line carries a bounding box".to_string(),
            ));
        }
    };
    let projector =
        UtmProjector::new(&bounds).map_err(|err| ConvertError::Projection(err.to_string()))?;

    let mut warnings = Vec::new();
    let candidates = classify::classify(&doc, &opts.filter, &mut warnings);
    let out = extract::extract(&doc, candidates, &projector, &mut warnings);

    let mut world = WorldBuilder::new(
        &opts.world_name,
        projector.origin(),
        projector.project(bounds.northeast(), Distance::ZERO),
    );
    for model in out.models {
        world.add_model(model);
    }
    for building in out.buildings {
        world.add_building(building);
    }
    for road in out.roads {
        world.add_road(road);
    }

    Ok((world.build(), warnings))
}
