/// FacetView Terminal Viewer
///
/// Loads a triangulated mesh from the comma-separated text format and
/// displays it in the terminal.
/// Controls:
///   - Left mouse drag: rotate the mesh
///   - M: toggle wireframe / shaded mode
///   - 0: reset the orientation
///   - Q/ESC: quit

use std::{env, fs, io};

use facetview_core::{Mesh, Viewer, ViewerConfig};
use facetview_terminal::TerminalApp;
use tracing_subscriber::EnvFilter;

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let mut viewer = Viewer::new(ViewerConfig::default());
    match env::args().nth(1) {
        Some(path) => {
            let text = fs::read_to_string(&path)?;
            viewer.load_mesh_from_text(&text).map_err(|e| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("failed to load {}: {}", path, e),
                )
            })?;
        }
        None => {
            eprintln!("No mesh file provided, using the built-in tetrahedron...");
            viewer.set_mesh(Mesh::tetrahedron());
        }
    }

    let mut app = TerminalApp::new(viewer)?;
    app.run()
}
