//! Resolve command handler

use semester_roadmap::config::Config;
use semester_roadmap::core::roadmap::{MarkerPlacement, Resolution};
use semester_roadmap::{info, verbose, RoadmapSession, ViewContext};
use serde::Serialize;

/// JSON shape printed by `resolve --json`
#[derive(Debug, Serialize)]
pub struct ResolveOutput {
    /// Progress value as given
    pub progress: f64,
    /// View the marker was resolved for
    pub context: ViewContext,
    /// Resolver outcome in SVG user units
    pub resolution: Resolution,
    /// Marker placement in percent of the container
    pub placement: MarkerPlacement,
}

/// Resolve `progress` against `session` and build the printable result
pub fn resolve_output(
    session: &RoadmapSession,
    config: &Config,
    context: ViewContext,
    progress: f64,
) -> ResolveOutput {
    let viewport = config.viewport.for_context(context);
    let resolution = session.resolve(context, progress);
    let placement = match &resolution {
        Resolution::Positioned(pos) => viewport.place(&session.view_box(), pos),
        Resolution::Unavailable { .. } => viewport.fallback(),
    };
    ResolveOutput {
        progress,
        context,
        resolution,
        placement,
    }
}

/// Print a resolver result as text
pub fn print_output(output: &ResolveOutput) {
    match &output.resolution {
        Resolution::Positioned(pos) => {
            println!("✓ Segment {} ({})", pos.segment, output.context);
            println!("  Point:    ({:.2}, {:.2})", pos.x, pos.y);
            println!("  Length:   {:.2}", pos.target_length);
            println!("  Heading:  {:.2}°", pos.rotation_degrees);
            println!("  Mirrored: {}", if pos.mirror { "yes" } else { "no" });
        }
        Resolution::Unavailable { segment } => {
            println!(
                "✗ Segment {segment} ({}) has no curve; marker stays at its fallback position",
                output.context
            );
        }
    }
    println!(
        "  Marker:   left {:.3}%, top {:.3}%",
        output.placement.left_percent, output.placement.top_percent
    );
    verbose!("  Style:    {}", output.placement.style_css());
}

/// Run the resolve command
pub fn run(progress: f64, context: ViewContext, json: bool, config: &Config) {
    let (_, session) = super::load_session(config);
    info!("Resolving progress {progress} for the {context} roadmap");
    let output = resolve_output(&session, config, context, progress);

    if json {
        match serde_json::to_string_pretty(&output) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("✗ Failed to serialize result: {e}");
                std::process::exit(1);
            }
        }
    } else {
        print_output(&output);
    }
}
