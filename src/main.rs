use std::path::PathBuf;
use std::process::ExitCode;

use log::{debug, error, info};

use meshcast::colors;
use meshcast::input::{CameraController, InputEvent, Key};
use meshcast::math::Vec3;
use meshcast::window::{FrameLimiter, Window};
use meshcast::{Canvas, Config, MeshEntity, Projector, Resources, Scene, Viewport};

const DEFAULT_MESH: &str = "assets/cube.obj";
const GRID_SPACING: i32 = 50;

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    let mesh_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_MESH));

    let mut resources = Resources::with_default_colors();
    resources.load_mesh("mesh", &mesh_path)?;
    let mesh = resources
        .mesh("mesh")
        .cloned()
        .ok_or("mesh missing from registry after load")?
        .with_scale_factor(config.mesh_scale);
    mesh.validate()?;

    let mut scene = Scene::new();
    let camera = scene.add_camera(meshcast::Camera::default().with_angle_policy(config.angle_policy));
    let origin = Vec3::new(config.width as f32 / 2.0, config.height as f32 / 2.0, 100.0);
    scene.add_mesh_entity(MeshEntity::new("mesh", mesh, origin, camera).with_angle_policy(config.angle_policy))?;

    let controller = CameraController::from_config(&config);
    let projector = Projector::new(config.depth_strategy);
    let style = config.style();
    let background = resources.color("BACKGROUND").unwrap_or(colors::BACKGROUND);

    let mut window = Window::new("Meshcast", config.width, config.height)?;
    let mut canvas = Canvas::new(config.width, config.height);
    let mut limiter = FrameLimiter::new(&window, config.fps);
    info!(
        "rendering {} at {}x{} ({:?}, {:?})",
        mesh_path.display(),
        config.width,
        config.height,
        config.depth_strategy,
        config.angle_policy
    );

    let mut frames = 0u32;
    let mut elapsed_ms = 0u64;
    'running: loop {
        for event in window.poll_events() {
            match event {
                InputEvent::Quit | InputEvent::KeyPressed(Key::Escape) => break 'running,
                InputEvent::Resized { width, height } => {
                    window.resize(width, height)?;
                    canvas.resize(width, height);
                }
                _ => {}
            }
            if let Some(camera) = scene.camera_mut(camera) {
                if controller.handle(&event, camera) {
                    debug!(
                        "camera position {:?}, orientation {:?}",
                        camera.position(),
                        camera.orientation()
                    );
                }
            }
        }

        scene.update();

        let viewport = Viewport::from_size(canvas.width(), canvas.height());
        let batches = scene.render(&viewport, &projector, &style)?;

        canvas.clear(background);
        canvas.draw_grid(GRID_SPACING, colors::GRID);
        for batch in &batches {
            canvas.draw_batch(batch);
        }
        window.present(canvas.as_bytes())?;

        elapsed_ms += limiter.wait_and_get_delta(&window);
        frames += 1;
        if elapsed_ms >= 1000 {
            debug!("fps: {frames}");
            frames = 0;
            elapsed_ms = 0;
        }
    }

    Ok(())
}
