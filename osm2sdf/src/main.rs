//! The command-line wrapper: figure out where the OSM data comes from, run the conversion,
//! report what got dropped, write the world.

#[macro_use]
extern crate log;

use std::path::{Path, PathBuf};

use structopt::StructOpt;

use geom::GPSBounds;
use osm2sdf::{fetch, ConvertError, Filter, Options, Source};

#[derive(StructOpt)]
#[structopt(
    name = "osm2sdf",
    about = "Converts a piece of OpenStreetMap into a simulator world"
)]
struct Flags {
    /// Output SDF file name
    #[structopt(long = "out_file", default_value = "map.sdf")]
    out_file: String,

    /// Where to save the downloaded OSM extract
    #[structopt(long = "osm_file", default_value = "map.osm")]
    osm_file: String,

    /// Read this OSM file instead of downloading one. Its embedded bounding box, if any,
    /// overrides --boundingbox.
    #[structopt(long = "input_osm_file")]
    input_osm_file: Option<String>,

    /// Output directory
    #[structopt(long = "directory", default_value = ".")]
    directory: String,

    /// The area to convert. Format: min_lon min_lat max_lon max_lat
    #[structopt(
        long = "boundingbox",
        number_of_values = 4,
        allow_hyphen_values = true
    )]
    boundingbox: Option<Vec<f64>>,

    /// Display roads
    #[structopt(long = "roads")]
    roads: bool,

    /// Display models
    #[structopt(long = "models")]
    models: bool,

    /// Display buildings
    #[structopt(long = "buildings")]
    buildings: bool,

    /// Display everything
    #[structopt(long = "all")]
    all: bool,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run(Flags::from_args()).await {
        error!("{}", err);
        std::process::exit(1);
    }
}

async fn run(flags: Flags) -> Result<(), ConvertError> {
    let bounds = match &flags.boundingbox {
        Some(values) => {
            if values.len() != 4 {
                return Err(ConvertError::Configuration(format!(
                    "--boundingbox takes exactly 4 values, got {}",
                    values.len()
                )));
            }
            Some(
                GPSBounds::from_degrees(values[0], values[1], values[2], values[3])
                    .map_err(|err| ConvertError::Configuration(err.to_string()))?,
            )
        }
        None => None,
    };

    let filter = Filter {
        roads: flags.roads,
        models: flags.models,
        buildings: flags.buildings,
        all: flags.all,
    };
    let source = osm2sdf::resolve_source(flags.input_osm_file.clone(), bounds.clone())?;

    fs_err::create_dir_all(&flags.directory)?;

    let raw_osm = match source {
        Source::File(path) => fs_err::read_to_string(path)?,
        Source::Fetch(fetch_bounds) => {
            let raw = fetch::download_osm(&fetch_bounds)
                .await
                .map_err(|err| ConvertError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    err.to_string(),
                )))?;
            // Keep a copy, so reruns can use --input_osm_file instead of hitting the API.
            let cache = out_path(&flags.directory, &flags.osm_file);
            fs_err::write(&cache, &raw)?;
            info!("Cached the extract at {}", cache.display());
            raw
        }
    };

    let (world, warnings) = osm2sdf::convert(&raw_osm, bounds, &Options::new(filter))?;
    for warning in &warnings {
        warn!("{}", warning);
    }
    if !warnings.is_empty() {
        warn!("{} features were dropped or reclassified", warnings.len());
    }

    let xml = world
        .to_xml()
        .map_err(|err| ConvertError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            err.to_string(),
        )))?;
    let out = out_path(&flags.directory, &flags.out_file);
    fs_err::write(&out, xml)?;
    info!(
        "Wrote {} with {} models, {} buildings, {} roads",
        out.display(),
        world.models.len(),
        world.buildings.len(),
        world.roads.len()
    );
    Ok(())
}

fn out_path(directory: &str, file: &str) -> PathBuf {
    Path::new(directory).join(file)
}
