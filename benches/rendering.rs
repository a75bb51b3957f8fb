/// Benchmark suite for the rendering pipeline: full frames plus the
/// hot-path primitives (span fill, frustum test, depth sort).
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::Vec3;
use painter_engine::rendering::texture::{TEX_ASPHALT, TEX_FACADE, TEX_ROOF};
use painter_engine::scene::shapes;
use painter_engine::*;

fn demo_camera() -> Camera {
    let mut camera = Camera::new(Vec3::new(0.0, -5.0, -40.0));
    camera.pitch = -0.1;
    camera
}

fn bench_render_city_frame(c: &mut Criterion) {
    c.bench_function("render_city_frame", |b| {
        let ground = shapes::ground_plane(120.0, TEX_ASPHALT);
        let buildings = shapes::city_blocks(42, 8, 8, 8.0, TEX_FACADE, TEX_ROOF);

        let camera = demo_camera();
        let projection = Projection::new(70.0, 480, 270, 0.5, 400.0).unwrap();
        let mut ctx = FrameContext::new(&camera, projection);
        let mut framebuffer = Framebuffer::new(480, 270);
        let rasterizer = Rasterizer::new();

        b.iter(|| {
            ctx.begin_frame(&camera);
            let frustum = Frustum::from_pose(&camera, &projection);

            let mut ground_instance = MeshInstance::new(&ground, Vec3::ZERO);
            ground_instance.background = true;
            ctx.collect_mesh(&ground_instance);

            for (mesh, offset) in &buildings {
                let instance = MeshInstance::new(mesh, *offset);
                if frustum.intersects_aabb(&instance.world_aabb()) {
                    ctx.collect_mesh(&instance);
                }
            }
            ctx.sort_back_to_front();

            framebuffer.clear(0xFF87CEEB);
            rasterizer.draw_frame(black_box(&ctx.triangles), &mut framebuffer);
        });
    });
}

fn bench_collect_sphere(c: &mut Criterion) {
    c.bench_function("collect_sphere_mesh", |b| {
        let sphere = shapes::uv_sphere(3.0, 32, 20, TEX_ROOF);
        let camera = demo_camera();
        let projection = Projection::new(70.0, 480, 270, 0.5, 400.0).unwrap();
        let mut ctx = FrameContext::new(&camera, projection);

        b.iter(|| {
            ctx.begin_frame(&camera);
            ctx.collect_mesh(black_box(&MeshInstance::new(&sphere, Vec3::ZERO)));
        });
    });
}

fn bench_frustum_aabb_test(c: &mut Criterion) {
    c.bench_function("frustum_aabb_test_1k", |b| {
        let camera = demo_camera();
        let projection = Projection::new(70.0, 480, 270, 0.5, 400.0).unwrap();
        let frustum = Frustum::from_pose(&camera, &projection);

        let boxes: Vec<Aabb> = (0..1000)
            .map(|i| {
                let f = i as f32;
                Aabb::new(
                    Vec3::new((f * 7.3) % 200.0 - 100.0, -(f % 9.0), (f * 3.1) % 300.0 - 50.0),
                    Vec3::splat(2.0),
                )
            })
            .collect();

        b.iter(|| {
            let mut visible = 0usize;
            for aabb in &boxes {
                if frustum.intersects_aabb(black_box(aabb)) {
                    visible += 1;
                }
            }
            black_box(visible)
        });
    });
}

fn bench_depth_sort_coherent(c: &mut Criterion) {
    c.bench_function("depth_sort_nearly_sorted", |b| {
        let camera = Camera::new(Vec3::ZERO);
        let projection = Projection::new(70.0, 480, 270, 0.5, 400.0).unwrap();
        let buildings = shapes::city_blocks(11, 10, 10, 6.0, TEX_FACADE, TEX_ROOF);

        let mut ctx = FrameContext::new(&camera, projection);
        for (mesh, offset) in &buildings {
            ctx.collect_mesh(&MeshInstance::new(mesh, *offset + Vec3::new(0.0, 0.0, 80.0)));
        }
        ctx.sort_back_to_front();
        // Mimic inter-frame coherence: resort a list that is already almost
        // in order after a small camera move.
        let sorted = ctx.triangles.clone();

        b.iter(|| {
            ctx.triangles.clear();
            ctx.triangles.extend_from_slice(&sorted);
            ctx.sort_back_to_front();
            black_box(ctx.triangles.len())
        });
    });
}

fn bench_span_fill(c: &mut Criterion) {
    use painter_engine::rendering::SpanPoint;

    c.bench_function("textured_span_480px", |b| {
        let atlas = TextureAtlas::default();
        let texture = atlas.get(TEX_FACADE);
        let mut framebuffer = Framebuffer::new(480, 270);

        let left = SpanPoint {
            x: 0.0,
            w: 1.0 / 5.0,
            uw: 0.0,
            vw: 0.0,
        };
        let right = SpanPoint {
            x: 480.0,
            w: 1.0 / 60.0,
            uw: 64.0 / 60.0,
            vw: 16.0 / 60.0,
        };

        b.iter(|| {
            framebuffer.draw_textured_span(135, black_box(left), black_box(right), texture);
        });
    });
}

criterion_group!(
    benches,
    bench_render_city_frame,
    bench_collect_sphere,
    bench_frustum_aabb_test,
    bench_depth_sort_coherent,
    bench_span_fill
);
criterion_main!(benches);
