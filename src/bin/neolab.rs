//! neolab command-line front-end.
//!
//! Subcommands:
//! - `fetch`: read the NEO count from the catalog page and download the orbit flat file
//! - `load`: parse the flat file into the SQLite catalog, derive q/Q and classify
//! - `classify`: orbit class of an `(a, q, Q)` triple
//! - `stats`: number of catalog objects per orbit class
//! - `magnitude`: apparent magnitude table of one object at a list of dates

use anyhow::{bail, Context, Result};
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand, ValueEnum};
use neolab::{
    catalog::{
        fetcher::{read_count, write_count, CatalogFetcher},
        mpcorb_reader::read_mpcorb,
        store::CatalogStore,
    },
    env_state::{NeoConfig, NeoEnv},
    ephemeris::{
        geometry::ephemeris_table, horizons::HorizonsEphemeris, mean_earth::MeanEarthEphemeris,
        spk::SpkEphemeris, EphemerisProvider,
    },
    neo_class,
    time::date_to_mjd,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Near-Earth object catalog analysis
#[derive(Parser, Debug)]
#[command(name = "neolab")]
#[command(version)]
struct Args {
    /// Data directory, overrides NEOLAB_DATA_DIR
    #[arg(long, global = true)]
    data_dir: Option<Utf8PathBuf>,

    #[command(subcommand)]
    command: Command,
}

/// Source of the Earth position
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum EarthSource {
    /// JPL Horizons vector tables (network)
    Horizons,
    /// Local JPL planetary kernel, downloaded once into the data directory
    Spk,
    /// Mean orbital elements (offline, approximate)
    Mean,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read the object count from the catalog page and download the orbit flat file
    Fetch {
        /// Only read the object count
        #[arg(long)]
        count_only: bool,
    },

    /// Load an MPCORB flat file into the SQLite catalog
    Load {
        /// Flat file to load, defaults to the downloaded one
        #[arg(long)]
        file: Option<Utf8PathBuf>,
    },

    /// Classify an orbit from its semi-major axis, perihelion and aphelion (AU)
    Classify {
        /// Semi-major axis
        a: f64,
        /// Perihelion distance
        q: f64,
        /// Aphelion distance
        #[arg(value_name = "BIG_Q")]
        big_q: f64,
    },

    /// Number of catalog objects per orbit class
    Stats,

    /// Apparent V magnitude of a catalog object at the given dates
    Magnitude {
        /// Packed or readable designation
        designation: String,

        /// Dates, e.g. 2025-05-05T00:00:00 UTC
        #[arg(required = true)]
        dates: Vec<String>,

        /// Earth ephemeris
        #[arg(long, value_enum, default_value_t = EarthSource::Horizons)]
        earth: EarthSource,

        /// SPK kernel file, implies `--earth spk`
        #[arg(long)]
        kernel: Option<Utf8PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut config = NeoConfig::from_env();
    if let Some(dir) = args.data_dir {
        config.data_dir = dir;
    }
    let env = NeoEnv::new(config);

    match args.command {
        Command::Fetch { count_only } => cmd_fetch(&env, count_only),
        Command::Load { file } => cmd_load(&env, file),
        Command::Classify { a, q, big_q } => {
            println!("{}", neo_class(a, q, big_q));
            Ok(())
        }
        Command::Stats => cmd_stats(&env),
        Command::Magnitude {
            designation,
            dates,
            earth,
            kernel,
        } => cmd_magnitude(&env, &designation, &dates, earth, kernel),
    }
}

fn cmd_fetch(env: &NeoEnv, count_only: bool) -> Result<()> {
    let config = &env.config;
    let fetcher = CatalogFetcher::new(env);

    let count = fetcher
        .fetch_object_count()
        .with_context(|| format!("reading the object count from {}", config.catalog_page_url))?;
    config.ensure_data_dir()?;
    write_count(&config.count_file_path(), count)?;
    println!("{count} near-Earth objects advertised");

    if !count_only {
        let path = fetcher
            .download_catalog()
            .with_context(|| format!("downloading {}", config.flat_file_url))?;
        println!("orbit file saved to {path}");
    }
    Ok(())
}

fn cmd_load(env: &NeoEnv, file: Option<Utf8PathBuf>) -> Result<()> {
    let config = &env.config;
    let path = file.unwrap_or_else(|| config.flat_file_path());
    if !path.exists() {
        bail!("{path} does not exist, run `neolab fetch` first or pass --file");
    }

    let records = read_mpcorb(&path).with_context(|| format!("parsing {path}"))?;

    config.ensure_data_dir()?;
    let mut store = CatalogStore::open(&config.database_path())?;
    store.create_schema()?;
    let inserted = store.insert_records(&records)?;
    store.add_derived_columns()?;
    store.classify_all()?;
    info!(inserted, database = %config.database_path(), "catalog loaded");

    if let Ok(advertised) = read_count(&config.count_file_path()) {
        if advertised != records.len() as u64 {
            warn!(
                advertised,
                parsed = records.len(),
                "object count differs from the catalog page"
            );
        }
    }

    print_stats(&store)
}

fn cmd_stats(env: &NeoEnv) -> Result<()> {
    let store = open_catalog(env)?;
    print_stats(&store)
}

fn open_catalog(env: &NeoEnv) -> Result<CatalogStore> {
    CatalogStore::open_existing(&env.config.database_path()).context("run `neolab load` first")
}

fn print_stats(store: &CatalogStore) -> Result<()> {
    let by_class = store.count_by_class()?;
    for (class, count) in &by_class {
        println!("{:<8} {count:>8}", class.to_string());
    }
    println!("{:<8} {:>8}", "Total", store.record_count()?);
    Ok(())
}

fn earth_provider(
    env: &NeoEnv,
    mjds: &[f64],
    earth: EarthSource,
    kernel: Option<Utf8PathBuf>,
) -> Result<Box<dyn EphemerisProvider>> {
    if let Some(path) = kernel {
        let ephem = SpkEphemeris::from_file(&path).with_context(|| format!("reading {path}"))?;
        return Ok(Box::new(ephem));
    }
    Ok(match earth {
        EarthSource::Mean => Box::new(MeanEarthEphemeris),
        EarthSource::Spk => Box::new(
            SpkEphemeris::load(&env.config)
                .with_context(|| format!("loading {}", env.config.kernel_url()))?,
        ),
        EarthSource::Horizons => {
            Box::new(HorizonsEphemeris::fetch(env, mjds).context("querying JPL Horizons")?)
        }
    })
}

fn cmd_magnitude(
    env: &NeoEnv,
    designation: &str,
    dates: &[String],
    earth: EarthSource,
    kernel: Option<Utf8PathBuf>,
) -> Result<()> {
    let store = open_catalog(env)?;
    let record = store.find(designation)?;

    let mjds = dates
        .iter()
        .map(|date| date_to_mjd(date))
        .collect::<Result<Vec<_>, _>>()?;

    let provider = earth_provider(env, &mjds, earth, kernel)?;

    let table = ephemeris_table(&record, &mjds, provider.as_ref())?;

    println!("{} ({})", record.name, record.neo_class());
    println!(
        "{:>12} {:>8} {:>8} {:>7} {:>7} {:>6}",
        "MJD", "r (AU)", "Δ (AU)", "α (°)", "ε (°)", "V"
    );
    for row in &table {
        println!("{row}");
    }
    Ok(())
}
