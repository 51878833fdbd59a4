use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use airpath_cli::output::{render_comparison, render_path, render_statistics};
use airpath_lib::{
    compare_paths, export_graph, plan_path, resolve_airport, Airport, AirportDirectory,
    NewAirport, NewRoute, PathRequest, SqliteDirectory,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Airport route database and path queries")]
struct Cli {
    /// Path to the airport database.
    #[arg(long, global = true, default_value = "airports.db")]
    db: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the database file and schema if missing.
    Init,
    /// Register an airport.
    AddAirport {
        /// IATA code, stored uppercase.
        #[arg(long)]
        code: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        country: Option<String>,
        /// Store the airport as inactive so it never resolves.
        #[arg(long)]
        inactive: bool,
    },
    /// Register a route between two airports (codes or numeric ids).
    AddRoute {
        #[arg(long = "from")]
        from: String,
        #[arg(long = "to")]
        to: String,
        /// Great-circle distance in km; must be positive.
        #[arg(long)]
        distance: i64,
        /// Estimated flight time in minutes.
        #[arg(long)]
        time: Option<i64>,
        /// Estimated fuel burn in litres.
        #[arg(long)]
        fuel: Option<f64>,
    },
    /// Flag a route inactive so it is left out of the graph.
    DeactivateRoute {
        #[arg(long)]
        id: i64,
    },
    /// Flag a route active again.
    ActivateRoute {
        #[arg(long)]
        id: i64,
    },
    /// Lowest total distance between two airports.
    Shortest {
        #[arg(long = "from")]
        from: String,
        #[arg(long = "to")]
        to: String,
        /// Print the response as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Fewest legs between two airports.
    Stops {
        #[arg(long = "from")]
        from: String,
        #[arg(long = "to")]
        to: String,
        #[arg(long)]
        json: bool,
    },
    /// Run both searches and show them side by side.
    Compare {
        #[arg(long = "from")]
        from: String,
        #[arg(long = "to")]
        to: String,
        #[arg(long)]
        json: bool,
    },
    /// Dump the active route network as JSON.
    Export {
        /// Print only the summary statistics line.
        #[arg(long)]
        stats: bool,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    debug!(db = %cli.db.display(), command = ?cli.command, "starting");

    match cli.command {
        Command::Init => handle_init(&cli.db),
        Command::AddAirport {
            code,
            name,
            city,
            country,
            inactive,
        } => handle_add_airport(
            &cli.db,
            NewAirport {
                city,
                country,
                active: !inactive,
                ..NewAirport::new(code, name)
            },
        ),
        Command::AddRoute {
            from,
            to,
            distance,
            time,
            fuel,
        } => handle_add_route(&cli.db, &from, &to, distance, time, fuel),
        Command::DeactivateRoute { id } => handle_route_active(&cli.db, id, false),
        Command::ActivateRoute { id } => handle_route_active(&cli.db, id, true),
        Command::Shortest { from, to, json } => {
            handle_path(&cli.db, PathRequest::dijkstra(from, to), json)
        }
        Command::Stops { from, to, json } => handle_path(&cli.db, PathRequest::bfs(from, to), json),
        Command::Compare { from, to, json } => handle_compare(&cli.db, &from, &to, json),
        Command::Export { stats } => handle_export(&cli.db, stats),
    }
}

fn open_directory(db: &Path) -> Result<SqliteDirectory> {
    SqliteDirectory::open(db)
        .with_context(|| format!("failed to open airport database at {}", db.display()))
}

fn handle_init(db: &Path) -> Result<()> {
    let directory = SqliteDirectory::create(db)
        .with_context(|| format!("failed to initialise database at {}", db.display()))?;
    println!(
        "Database ready at {} ({} airports, {} routes)",
        db.display(),
        directory.airport_count()?,
        directory.route_count()?
    );
    Ok(())
}

fn handle_add_airport(db: &Path, airport: NewAirport) -> Result<()> {
    let directory = open_directory(db)?;
    let id = directory
        .insert_airport(&airport)
        .with_context(|| format!("failed to add airport '{}'", airport.code))?;
    println!(
        "Added airport {} (id {})",
        airport.code.trim().to_ascii_uppercase(),
        id
    );
    Ok(())
}

fn handle_add_route(
    db: &Path,
    from: &str,
    to: &str,
    distance_km: i64,
    time_min: Option<i64>,
    fuel_liters: Option<f64>,
) -> Result<()> {
    let directory = open_directory(db)?;
    let origin = require_airport(&directory, from)?;
    let destination = require_airport(&directory, to)?;

    let id = directory.insert_route(&NewRoute {
        origin: origin.id,
        destination: destination.id,
        distance_km,
        time_min,
        fuel_liters,
    })?;
    println!(
        "Added route {} -> {} (id {}, {} km)",
        origin.code, destination.code, id, distance_km
    );
    Ok(())
}

fn require_airport(directory: &dyn AirportDirectory, identifier: &str) -> Result<Airport> {
    resolve_airport(directory, identifier)?
        .ok_or_else(|| anyhow!("airport '{identifier}' not found or inactive"))
}

fn handle_route_active(db: &Path, id: i64, active: bool) -> Result<()> {
    let directory = open_directory(db)?;
    if !directory.set_route_active(id, active)? {
        bail!("route {id} does not exist");
    }
    let state = if active { "active" } else { "inactive" };
    println!("Route {id} is now {state}");
    Ok(())
}

fn handle_path(db: &Path, request: PathRequest, json: bool) -> Result<()> {
    let directory = open_directory(db)?;
    let response = plan_path(&directory, &request)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        println!("{}", render_path(&response));
    }
    Ok(())
}

fn handle_compare(db: &Path, from: &str, to: &str, json: bool) -> Result<()> {
    let directory = open_directory(db)?;
    let comparison = compare_paths(&directory, from, to)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&comparison)?);
    } else {
        println!("{}", render_comparison(&comparison));
    }
    Ok(())
}

fn handle_export(db: &Path, stats: bool) -> Result<()> {
    let directory = open_directory(db)?;
    let export = export_graph(&directory)?;
    if stats {
        println!("{}", render_statistics(&export.statistics));
    } else {
        println!("{}", serde_json::to_string_pretty(&export)?);
    }
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
