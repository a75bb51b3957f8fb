/// Demo application entry point: window creation, input handling and the
/// frame loop driving the software renderer over a procedural city scene.
use glam::Vec3;
use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Instant;

use painter_engine::rendering::texture::{TEX_ASPHALT, TEX_BRICK, TEX_FACADE, TEX_ROOF};
use painter_engine::scene::shapes;
use painter_engine::*;
use winit::{
    event::*,
    event_loop::{ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::WindowBuilder,
};

// Native resolution of the output surface.
const SCREEN_WIDTH: usize = 480;
const SCREEN_HEIGHT: usize = 270;

const SKY_TOP: u32 = 0xFF27408B;
const SKY_HORIZON: u32 = 0xFFB8C6E0;

struct SceneMeshes {
    ground: MeshData,
    buildings: Vec<(MeshData, Vec3)>,
    sphere: MeshData,
}

fn build_scene() -> SceneMeshes {
    SceneMeshes {
        ground: shapes::ground_plane(120.0, TEX_ASPHALT),
        buildings: shapes::city_blocks(42, 8, 8, 8.0, TEX_FACADE, TEX_ROOF),
        sphere: shapes::uv_sphere(3.0, 20, 12, TEX_ROOF),
    }
}

/// Cull, collect, sort and rasterize one frame. Returns how many mesh
/// instances survived frustum culling, plus per-stage timings.
fn render_frame(
    framebuffer: &mut Framebuffer,
    rasterizer: &Rasterizer,
    ctx: &mut FrameContext,
    camera: &Camera,
    scene: &SceneMeshes,
) -> (usize, FrameStats) {
    let mut stats = FrameStats::new();
    let frame_start = Instant::now();

    ctx.begin_frame(camera);
    let stage = Instant::now();
    let frustum = Frustum::from_pose(camera, ctx.projection());

    // Ground is a background layer: depth-biased behind everything and
    // never culled (it surrounds the whole scene).
    let mut ground = MeshInstance::new(&scene.ground, Vec3::ZERO);
    ground.background = true;

    // Floating landmark sphere; the texture override exercises the
    // per-instance texture path.
    let mut sphere = MeshInstance::new(&scene.sphere, Vec3::new(0.0, -14.0, 0.0));
    sphere.texture_override = Some(TEX_BRICK);

    let mut visible: Vec<MeshInstance<'_>> = vec![ground];
    for (mesh, offset) in &scene.buildings {
        let instance = MeshInstance::new(mesh, *offset);
        if frustum.intersects_aabb(&instance.world_aabb()) {
            visible.push(instance);
        }
    }
    if frustum.intersects_aabb(&sphere.world_aabb()) {
        visible.push(sphere);
    }
    stats.visibility_us = stage.elapsed().as_secs_f64() * 1e6;

    let stage = Instant::now();
    for instance in &visible {
        ctx.collect_mesh(instance);
    }
    stats.collect_us = stage.elapsed().as_secs_f64() * 1e6;

    let stage = Instant::now();
    ctx.sort_back_to_front();
    stats.sort_us = stage.elapsed().as_secs_f64() * 1e6;

    let stage = Instant::now();
    framebuffer.clear_gradient(SKY_TOP, SKY_HORIZON);
    rasterizer.draw_frame(&ctx.triangles, framebuffer);
    stats.raster_us = stage.elapsed().as_secs_f64() * 1e6;

    stats.total_us = frame_start.elapsed().as_secs_f64() * 1e6;
    (visible.len(), stats)
}

fn main() {
    env_logger::init();

    log::info!("painter_engine demo");
    log::info!("controls: WASD move, Space/Shift up/down, click + mouse look, ESC exit");

    // Create event loop and window
    let event_loop = EventLoop::new().unwrap();
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("painter_engine")
            .with_inner_size(winit::dpi::LogicalSize::new(
                SCREEN_WIDTH as u32,
                SCREEN_HEIGHT as u32,
            ))
            .build(&event_loop)
            .unwrap(),
    );

    // Software rendering context
    let context = softbuffer::Context::new(window.clone()).unwrap();
    let mut surface = softbuffer::Surface::new(&context, window.clone()).unwrap();

    let window_size = window.inner_size();
    let mut framebuffer =
        Framebuffer::new(window_size.width as usize, window_size.height as usize);
    let mut projection = Projection::new(
        70.0,
        framebuffer.width,
        framebuffer.height,
        0.5,
        400.0,
    )
    .expect("default projection parameters are valid");

    // Camera starts above the ground (y is down), looking into the city.
    let mut camera = Camera::new(Vec3::new(0.0, -4.0, -45.0));
    let mut camera_controller = CameraController::new();

    let scene = build_scene();
    log::info!(
        "scene: {} buildings, {} ground faces, {} sphere faces",
        scene.buildings.len(),
        scene.ground.faces.len(),
        scene.sphere.faces.len()
    );

    let rasterizer = Rasterizer::new();
    let mut ctx = FrameContext::new(&camera, projection);

    // Timing
    let mut last_frame = Instant::now();
    let mut frame_count = 0u32;
    let mut fps_timer = Instant::now();

    // Mouse state
    let mut mouse_captured = false;
    let mut last_mouse_pos: Option<(f64, f64)> = None;

    // Stage-timing printout toggle
    let mut stats_enabled = false;
    let mut last_stats = FrameStats::new();

    event_loop
        .run(move |event, elwt| {
            elwt.set_control_flow(ControlFlow::Poll);

            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => {
                        elwt.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        let (w, h) = (new_size.width as usize, new_size.height as usize);
                        match Projection::new(70.0, w, h, 0.5, 400.0) {
                            Ok(p) => {
                                framebuffer.resize(w, h);
                                projection = p;
                                ctx = FrameContext::new(&camera, projection);
                            }
                            Err(err) => log::warn!("ignoring resize to {w}x{h}: {err}"),
                        }
                    }
                    WindowEvent::KeyboardInput { event, .. } => {
                        let pressed = event.state == ElementState::Pressed;

                        if let PhysicalKey::Code(keycode) = event.physical_key {
                            match keycode {
                                KeyCode::KeyW => camera_controller.forward_pressed = pressed,
                                KeyCode::KeyS => camera_controller.backward_pressed = pressed,
                                KeyCode::KeyA => camera_controller.left_pressed = pressed,
                                KeyCode::KeyD => camera_controller.right_pressed = pressed,
                                KeyCode::Space => camera_controller.up_pressed = pressed,
                                KeyCode::ShiftLeft => camera_controller.down_pressed = pressed,
                                KeyCode::KeyT if pressed => {
                                    stats_enabled = !stats_enabled;
                                    log::info!(
                                        "stage timings: {}",
                                        if stats_enabled { "ON" } else { "OFF" }
                                    );
                                }
                                #[cfg(feature = "profiling")]
                                KeyCode::KeyP if pressed => {
                                    PIPELINE_COUNTERS.snapshot().print_report();
                                    PIPELINE_COUNTERS.reset();
                                }
                                KeyCode::Escape if pressed => {
                                    if mouse_captured {
                                        mouse_captured = false;
                                        window.set_cursor_visible(true);
                                    } else {
                                        elwt.exit();
                                    }
                                }
                                _ => {}
                            }
                        }
                    }
                    WindowEvent::MouseInput { state, button, .. } => {
                        if button == MouseButton::Left && state == ElementState::Pressed {
                            mouse_captured = true;
                            window.set_cursor_visible(false);
                        }
                    }
                    WindowEvent::CursorMoved { position, .. } => {
                        if mouse_captured {
                            if let Some(last_pos) = last_mouse_pos {
                                let delta_x = position.x - last_pos.0;
                                let delta_y = position.y - last_pos.1;
                                camera.rotate(delta_x as f32, delta_y as f32);
                            }
                        }
                        last_mouse_pos = Some((position.x, position.y));
                    }
                    WindowEvent::RedrawRequested => {
                        let now = Instant::now();
                        let dt = (now - last_frame).as_secs_f32();
                        last_frame = now;

                        camera_controller.update_camera(&mut camera, dt);

                        let (drawn, stats) =
                            render_frame(&mut framebuffer, &rasterizer, &mut ctx, &camera, &scene);
                        last_stats = stats;

                        // Copy framebuffer to window
                        surface
                            .resize(
                                NonZeroU32::new(framebuffer.width as u32).unwrap(),
                                NonZeroU32::new(framebuffer.height as u32).unwrap(),
                            )
                            .unwrap();

                        let mut buffer = surface.buffer_mut().unwrap();
                        buffer.copy_from_slice(framebuffer.pixels());
                        buffer.present().unwrap();

                        frame_count += 1;
                        if fps_timer.elapsed().as_secs() >= 1 {
                            log::info!(
                                "fps: {} | instances drawn: {} | triangles: {}",
                                frame_count,
                                drawn,
                                ctx.triangles.len()
                            );
                            if stats_enabled {
                                last_stats.print_summary();
                            }
                            frame_count = 0;
                            fps_timer = Instant::now();
                        }
                    }
                    _ => {}
                },
                Event::AboutToWait => {
                    window.request_redraw();
                }
                _ => {}
            }
        })
        .unwrap();
}
