//! Example: Render a particle field headlessly and dump PNG frames.
//!
//! Runs the simulation against the software raster surface for a few
//! seconds of ticks and writes every 30th frame to `target/frames/`.
//!
//! Run with:
//!     cargo run --example render_frames

use anyhow::Result;
use dotfield::{Host, ParticleField, RasterSurface, SettingsInput};
use std::fs;
use std::path::PathBuf;

struct HeadlessHost {
    surface: RasterSurface,
    frames_requested: usize,
}

impl Host for HeadlessHost {
    type Surface = RasterSurface;

    fn surface(&mut self, id: &str) -> Option<&mut RasterSurface> {
        (id == "demo").then_some(&mut self.surface)
    }

    fn request_frame(&mut self) {
        self.frames_requested += 1;
    }

    fn is_mobile(&self) -> bool {
        false
    }
}

fn main() -> Result<()> {
    env_logger::init();

    println!("Dotfield - Headless Frame Dump");
    println!("==============================\n");

    let width = 640;
    let height = 360;
    let total_ticks = 300;

    println!("Setting up field...");
    println!("  Surface: {width}x{height}");
    println!("  Ticks: {total_ticks}");

    let mut host = HeadlessHost {
        surface: RasterSurface::new(width, height),
        frames_requested: 0,
    };
    let mut field = ParticleField::with_seed(
        "demo",
        SettingsInput {
            amount: Some(60.0),
            tolerance: Some(120.0),
            line_width: Some(1.0),
            speed_min: Some(400.0),
            speed_max: Some(900.0),
            ..Default::default()
        },
        2024,
    );

    let out_dir = PathBuf::from("target/frames");
    fs::create_dir_all(&out_dir)?;

    field.start(&mut host);
    println!("  Particles: {}\n", field.particles().len());

    println!("Rendering...");
    for tick in 0..total_ticks {
        // Hover in for the middle third so the excited state shows up in
        // the dumped frames.
        if tick == total_ticks / 3 {
            field.pointer_entered();
        } else if tick == 2 * total_ticks / 3 {
            field.pointer_left();
        }

        field.tick(&mut host);

        if tick % 30 == 0 {
            let path = out_dir.join(format!("frame_{tick:04}.png"));
            host.surface.image().save(&path)?;
            println!("  Wrote {}", path.display());
        }
    }

    println!("\nDone: {} frames scheduled.", host.frames_requested);
    Ok(())
}
