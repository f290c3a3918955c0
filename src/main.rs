mod app;
mod background;
mod camera;
mod model;
mod pipeline;
mod util;

use std::env;

const WIDTH: u32 = 800;
const HEIGHT: u32 = 800;

#[show_image::main]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Default values.
    let mut model_path = String::from("assets/model.obj");
    let mut output_path: Option<String> = None;
    let mut headless = false;
    let mut print_fps = false;

    let args: Vec<String> = env::args().collect();
    for i in 1..args.len() {
        match args[i].as_str() {
            "-p" => { model_path = args[i + 1].clone(); }
            "-o" => { output_path = Some(args[i + 1].clone()); }
            "--headless" => { headless = true; }
            "--fps" => { print_fps = true; }
            _ => ()
        }
    }

    let params = app::Params {
        width: WIDTH,
        height: HEIGHT,
        print_fps,
        model_path,
        output_path,
        headless,
    };

    app::run(params)?;

    return Ok(());
}
