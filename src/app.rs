use std::cell::RefCell;
use std::rc::Rc;
use std::time;

use nalgebra as na;
use na::{vector, Matrix4, Rotation3, Vector3};
use show_image::{create_window, event, ImageInfo, ImageView, WindowOptions};

use crate::background;
use crate::camera::Camera;
use crate::model::{self, Model, Vertex};
use crate::pipeline::buffer::Buffer;
use crate::pipeline::geometry::ClipVertex;
use crate::pipeline::{Pipeline, ShaderPair};
use crate::util::{self, Color};

const SKY_TOP: Color = Color { r: 8, g: 10, b: 36 };
const SKY_BOTTOM: Color = Color { r: 48, g: 16, b: 64 };
const STAR_COUNT: u32 = 400;
const STAR_SEED: u64 = 0x5eed;

pub struct Params {
    pub width: u32,
    pub height: u32,
    pub print_fps: bool,
    pub model_path: String,
    pub output_path: Option<String>,
    pub headless: bool,
}

/// Helper, defining exit event to be an Escape key press.
fn is_exit_event(window_event: event::WindowEvent) -> bool {
    if let event::WindowEvent::KeyboardInput(event) = window_event {
        if event.input.key_code == Some(event::VirtualKeyCode::Escape) && event.input.state.is_released() {
            return true;
        }
    }

    return false;
}

/// Rebinds the shader pair for this frame's transform. The combined matrix
/// is composed once here, not per vertex; the closures just apply it.
fn bind_frame_shaders(pipeline: &mut Pipeline<Vertex, Color>, matrix: Matrix4<f32>, world: Matrix4<f32>) {
    let light_direction = vector![0.6, 0.7, 0.4].normalize();
    pipeline.bind_shaders(ShaderPair {
        vertex: Box::new(move |position, vertex: &Vertex| {
            let mut data = *vertex;
            // Normals follow the model rotation, not the projection.
            data.normal = util::from_hom_vector(world * util::to_hom_vector(vertex.normal));
            return ClipVertex { position: matrix * position, data };
        }),
        pixel: Box::new(move |vertex: &Vertex, _z| {
            let normal = vertex.normal.normalize();
            let intensity = normal.dot(&light_direction).max(0.0);
            return Color::from_unit(vertex.ambient * (0.2 + 0.8 * intensity));
        }),
    });
}

/// One full frame: clear, backdrop pre-pass, mesh pass.
fn render_frame(
    pipeline: &mut Pipeline<Vertex, Color>,
    render_target: &Rc<RefCell<Buffer<Color>>>,
    model: &Model,
    camera: &Camera,
    passed_time: f32,
) {
    let world = Rotation3::from_axis_angle(&Vector3::y_axis(), 0.5 * passed_time).to_homogeneous()
        * model.world_matrix;
    let matrix = camera.get_projection_matrix() * camera.get_view_matrix() * world;
    bind_frame_shaders(pipeline, matrix, world);

    pipeline.clear_render_target(Color { r: 0, g: 0, b: 0 });
    {
        let mut target = render_target.borrow_mut();
        background::draw_gradient(&mut target, SKY_TOP, SKY_BOTTOM);
        background::scatter_stars(&mut target, STAR_COUNT, STAR_SEED);
    }
    pipeline.draw(model.index_buffer.len() as u32, 0);
}

/// Loads the model, wires up the pipeline and either renders a single frame
/// to disk (headless) or keeps presenting frames in a window until Escape.
pub fn run(params: Params) -> Result<(), Box<dyn std::error::Error>> {
    let model = model::load_model(&params.model_path)?;

    let mut pipeline = Pipeline::<Vertex, Color>::new();
    pipeline.set_viewport(params.width, params.height);
    let render_target = Rc::new(RefCell::new(Buffer::<Color>::new(params.width, params.height)));
    let depth_buffer = Rc::new(RefCell::new(Buffer::<f32>::new(params.width, params.height)));
    pipeline.set_render_target(Rc::clone(&render_target), Rc::clone(&depth_buffer));
    pipeline.set_vertex_buffer(Rc::clone(&model.vertex_buffer));
    pipeline.set_index_buffer(Rc::clone(&model.index_buffer));

    let camera = Camera {
        look_from: vector![0.0, 0.5, 3.0],
        look_at: vector![0.0, 0.0, 0.0],
        up: vector![0.0, 1.0, 0.0],
        fov_y: std::f32::consts::FRAC_PI_3,
        aspect: params.width as f32 / params.height as f32,
        z_near: 0.1,
        z_far: 100.0,
    };

    if params.headless {
        render_frame(&mut pipeline, &render_target, &model, &camera, 0.0);
        if let Some(path) = &params.output_path {
            util::save_image(&render_target.borrow(), path)?;
            println!("Saved render to {}", path);
        }
        return Ok(());
    }

    let window_options: WindowOptions = WindowOptions {
        size: Some([params.width, params.height]),
        ..Default::default()
    };
    let window = create_window("output", window_options)?;
    let event_channel = window.event_channel()?;

    let mut saved = false;
    let mut exit = false;
    let time_begin = time::Instant::now();
    let mut frame_counter_time_begin = time::Instant::now();
    let mut frame_counter: u32 = 0;
    while !exit {
        let passed_time = time::Instant::now().duration_since(time_begin).as_secs_f32();
        render_frame(&mut pipeline, &render_target, &model, &camera, passed_time);

        let pixel_data = util::buffer_to_rgb8(&render_target.borrow());
        let image_data = ImageView::new(ImageInfo::rgb8(params.width, params.height), &pixel_data);
        window.set_image("image", image_data)?;

        if !saved {
            if let Some(path) = &params.output_path {
                util::save_image(&render_target.borrow(), path)?;
                println!("Saved render to {}", path);
            }
            saved = true;
        }

        // Unloading all the events that have piled up, looking for exit.
        let exit_poll_result = event_channel
            .try_iter()
            .map(is_exit_event)
            .reduce(|was_exit_event, is_exit_event| was_exit_event || is_exit_event);
        exit = exit_poll_result.unwrap_or(false);

        if params.print_fps {
            // Counting frames to print stats every second.
            frame_counter += 1;
            if time::Instant::now()
                .duration_since(frame_counter_time_begin)
                .as_secs_f32()
                > 1.0
            {
                println!("FPS --- {}", frame_counter);
                frame_counter_time_begin = time::Instant::now();
                frame_counter = 0;
            }
        }
    }

    return Ok(());
}
