use civic_geofence::output::Output;
use civic_geofence::request::{check_location, LocationRequest};
use civic_geofence::{load_config, logger, process, AreaIndex, ServiceArea};
use std::error::Error;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(
    name = "civic_geofence",
    about = "Checks whether locations fall inside a municipal service area"
)]
struct Opt {
    /// TOML file with [[area]] tables, defaults to the built-in Makola area
    #[structopt(short, long, parse(from_os_str))]
    config: Option<PathBuf>,

    /// Service area to validate against, defaults to the first configured one
    #[structopt(short, long)]
    area: Option<String>,

    #[structopt(short, long)]
    verbose: bool,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(StructOpt, Debug)]
enum Command {
    /// Check a single coordinate pair, exits with 1 when it is outside
    Check {
        #[structopt(allow_hyphen_values = true)]
        latitude: String,
        #[structopt(allow_hyphen_values = true)]
        longitude: String,
    },
    /// Check JSON lines of {"latitude", "longitude"} from a file or stdin
    Batch {
        #[structopt(parse(from_os_str))]
        input: Option<PathBuf>,
    },
    /// Print the configured service areas
    Area {
        #[structopt(long)]
        geojson: bool,
    },
    /// List all configured areas containing a coordinate pair
    Locate {
        #[structopt(allow_hyphen_values = true)]
        latitude: String,
        #[structopt(allow_hyphen_values = true)]
        longitude: String,
    },
}

fn select_area(areas: &[ServiceArea], name: Option<&str>) -> Result<ServiceArea, Box<dyn Error>> {
    let area = match name {
        Some(name) => areas.iter().find(|area| area.name() == name),
        None => areas.first(),
    };
    let area = area.ok_or_else(|| format!("unknown service area: {}", name.unwrap_or("")))?;
    Ok(area.clone())
}

fn main() -> Result<(), Box<dyn Error>> {
    let opt = Opt::from_args();
    logger::init_cli_logger(opt.verbose);

    let config = load_config(opt.config.as_deref())?;
    let areas = config.service_areas();
    let stdout = io::stdout();
    let mut handle = io::BufWriter::new(stdout.lock());

    match opt.cmd {
        Command::Check {
            latitude,
            longitude,
        } => {
            let area = select_area(&areas, opt.area.as_deref())?;
            let request = LocationRequest::new(latitude.as_str(), longitude.as_str());
            let result = check_location(&area, &request)?;
            vec![result].write_json_lines(&mut handle)?;
            if !result.valid {
                handle.flush()?;
                std::process::exit(1);
            }
        }
        Command::Batch { input } => {
            let area = select_area(&areas, opt.area.as_deref())?;
            match input {
                Some(path) => {
                    let file = BufReader::new(File::open(path)?);
                    process(file, &mut handle, &area)?;
                }
                None => {
                    let stdin = io::stdin();
                    process(stdin.lock(), &mut handle, &area)?;
                }
            };
        }
        Command::Area { geojson } => {
            if geojson {
                areas.write_geojson(&mut handle)?;
            } else {
                areas.write_json_lines(&mut handle)?;
            }
        }
        Command::Locate {
            latitude,
            longitude,
        } => {
            let point = LocationRequest::new(latitude.as_str(), longitude.as_str()).to_point()?;
            let index = AreaIndex::new(areas);
            for area in index.locate(&point) {
                writeln!(handle, "{}", area.name())?;
            }
        }
    }
    Ok(())
}
