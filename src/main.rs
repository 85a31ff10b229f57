/*

    Fit a collision primitive to a vertex selection given in a JSON request.

    @date: Oct, 2025
    @author: Bartu

*/

use std::{self, env, path::Path};
use tracing::{info, warn, error, debug};
use tracing_subscriber;

use bound_forge::fitter::fit_primitive;
use bound_forge::json_parser::parse_request;
use bound_forge::transform::world_scale;

fn main() -> Result<(), Box<dyn std::error::Error>> {

    // Logging on console
    tracing_subscriber::fmt::init();

    // Parse args
    let args: Vec<String> = env::args().collect();
    let json_path: &String = if args.len() == 1 {
        warn!("No arguments were provided, setting default request path...");
        &String::from("./inputs/fit_request.json")
    } else if args.len() == 2 {
        &args[1]
    } else {
        error!("Usage: {} <filename>.json", args[0]);
        std::process::exit(1);
    };

    // Parse JSON
    info!("Loading fit request from {}...", json_path);
    let mut request = parse_request(json_path).map_err(|e| {
        error!("Failed to load request: {}", e);
        e
    })?;

    let json_path = Path::new(json_path).canonicalize()?;
    request.setup(&json_path)?;
    debug!("Request is setup successfully.\n {:#?}", request);

    let points = request.points()?;
    let world = request.world_matrix();
    let scale = world_scale(&world);
    info!("Fitting a {} to {} vertices", request.shape_kind, points.len());

    let fitted = fit_primitive(&points, &world, scale, request.shape_kind)?;
    info!("Center: {}", fitted.center);
    if let Some(radius) = fitted.shape.radius() {
        info!("Radius: {}", radius);
    }
    if let Some(height) = fitted.shape.height() {
        info!("Height: {}", height);
    }
    debug!("Shape: {:?}, orientation: {}", fitted.shape, fitted.orientation);
    info!("Finished execution.");
    Ok(())
}
