//! The shading pipeline: ray generation, closest-hit search and shader dispatch.
//!
//! A `Raytracer` borrows a built [`Scene`] and carries three optional shader
//! hooks. The same scene can back several tracers with different hooks; the
//! default renderer uses one for primary visibility and a second one, with
//! only an any-hit shader, for shadow rays.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracer_core::Color;
use tracer_math::{Interval, Ray, Vec2, Vec3};

use crate::{FrameBuffers, Payload, Scene, ShadingError, ShadingResult, TraceCounts, TraceStats, Triangle};

/// Default far end of the trace window.
pub const DEFAULT_MAX_T: f32 = 1000.0;
/// Default near end of the trace window, keeps secondary rays off their own surface.
pub const DEFAULT_MIN_T: f32 = 0.001;

/// Invoked when a trace hits nothing inside its window.
pub type MissShader<'a> = Box<dyn Fn(&Ray) -> Payload + Send + Sync + 'a>;
/// Invoked with the nearest hit; may issue further traces.
pub type ClosestHitShader<'a> =
    Box<dyn Fn(&Ray, Payload, &Triangle, usize) -> ShadingResult<Payload> + Send + Sync + 'a>;
/// Invoked with the first qualifying hit; its result ends the trace.
pub type AnyHitShader<'a> = Box<dyn Fn(&Ray, Payload, &Triangle) -> Payload + Send + Sync + 'a>;

/// Trace configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TracerConfig {
    /// Far end of the window used by [`Raytracer::trace_default`]
    pub max_t: f32,
    /// Near end of the window used by [`Raytracer::trace_default`]
    pub min_t: f32,
    /// Skip a whole bounding volume when the ray misses its box
    pub cull_bounding_volumes: bool,
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            max_t: DEFAULT_MAX_T,
            min_t: DEFAULT_MIN_T,
            cull_bounding_volumes: true,
        }
    }
}

impl TracerConfig {
    pub fn with_window(mut self, min_t: f32, max_t: f32) -> Self {
        self.min_t = min_t;
        self.max_t = max_t;
        self
    }

    pub fn with_culling(mut self, enabled: bool) -> Self {
        self.cull_bounding_volumes = enabled;
        self
    }
}

/// Ray tracer over a borrowed scene with optional miss, closest-hit and
/// any-hit shaders.
pub struct Raytracer<'a> {
    scene: &'a Scene,
    config: TracerConfig,
    miss_shader: Option<MissShader<'a>>,
    closest_hit_shader: Option<ClosestHitShader<'a>>,
    any_hit_shader: Option<AnyHitShader<'a>>,
    stats: Arc<TraceStats>,
}

impl<'a> Raytracer<'a> {
    /// Create a tracer with no shaders installed.
    pub fn new(scene: &'a Scene) -> Self {
        Self {
            scene,
            config: TracerConfig::default(),
            miss_shader: None,
            closest_hit_shader: None,
            any_hit_shader: None,
            stats: Arc::default(),
        }
    }

    pub fn with_config(mut self, config: TracerConfig) -> Self {
        self.config = config;
        self
    }

    /// Count into `stats` instead of this tracer's own counters. Tracers
    /// sharing one `TraceStats` report combined totals.
    pub fn with_stats(mut self, stats: Arc<TraceStats>) -> Self {
        self.stats = stats;
        self
    }

    pub fn with_miss_shader<F>(mut self, shader: F) -> Self
    where
        F: Fn(&Ray) -> Payload + Send + Sync + 'a,
    {
        self.miss_shader = Some(Box::new(shader));
        self
    }

    pub fn with_closest_hit_shader<F>(mut self, shader: F) -> Self
    where
        F: Fn(&Ray, Payload, &Triangle, usize) -> ShadingResult<Payload> + Send + Sync + 'a,
    {
        self.closest_hit_shader = Some(Box::new(shader));
        self
    }

    pub fn with_any_hit_shader<F>(mut self, shader: F) -> Self
    where
        F: Fn(&Ray, Payload, &Triangle) -> Payload + Send + Sync + 'a,
    {
        self.any_hit_shader = Some(Box::new(shader));
        self
    }

    /// Replace (or remove) the miss shader.
    pub fn set_miss_shader(&mut self, shader: Option<MissShader<'a>>) {
        self.miss_shader = shader;
    }

    /// Replace (or remove) the closest-hit shader.
    pub fn set_closest_hit_shader(&mut self, shader: Option<ClosestHitShader<'a>>) {
        self.closest_hit_shader = shader;
    }

    /// Replace (or remove) the any-hit shader.
    pub fn set_any_hit_shader(&mut self, shader: Option<AnyHitShader<'a>>) {
        self.any_hit_shader = shader;
    }

    pub fn scene(&self) -> &'a Scene {
        self.scene
    }

    pub fn config(&self) -> &TracerConfig {
        &self.config
    }

    /// Counts of every trace recorded into this tracer's `TraceStats`.
    pub fn stats(&self) -> TraceCounts {
        self.stats.snapshot()
    }

    /// Handle to the counters, for sharing with another tracer.
    pub fn shared_stats(&self) -> Arc<TraceStats> {
        Arc::clone(&self.stats)
    }

    pub fn reset_stats(&self) {
        self.stats.reset();
    }

    /// Trace `ray` with the configured `[min_t, max_t]` window.
    pub fn trace_default(&self, ray: &Ray, depth: usize) -> ShadingResult<Payload> {
        self.trace(ray, depth, self.config.max_t, self.config.min_t)
    }

    /// Find the hit with the smallest `t` in `(min_t, max_t)` and dispatch it.
    ///
    /// - With an any-hit shader the scan stops at the first qualifying hit and
    ///   returns the shader's result.
    /// - Otherwise the nearest hit goes to the closest-hit shader; a hit with
    ///   no closest-hit shader installed is [`ShadingError::MissingClosestHit`].
    /// - Without a hit, the miss shader's result is returned, or the sentinel
    ///   payload (`t == max_t`) when no miss shader is installed.
    pub fn trace(&self, ray: &Ray, depth: usize, max_t: f32, min_t: f32) -> ShadingResult<Payload> {
        let mut closest = Payload::miss(max_t);
        let mut closest_triangle: Option<&Triangle> = None;
        let mut tests = 0u64;
        let mut culled = 0u64;

        for volume in self.scene.volumes() {
            if self.config.cull_bounding_volumes && !volume.ray_box_test(ray) {
                culled += 1;
                continue;
            }

            for triangle in volume.triangles() {
                tests += 1;
                let Some(payload) = triangle.intersect(ray) else {
                    continue;
                };
                if !Interval::new(min_t, closest.t).surrounds(payload.t) {
                    continue;
                }

                if let Some(any_hit) = &self.any_hit_shader {
                    self.stats.record(tests, culled);
                    return Ok(any_hit(ray, payload, triangle));
                }
                closest = payload;
                closest_triangle = Some(triangle);
            }
        }

        self.stats.record(tests, culled);

        match closest_triangle {
            Some(triangle) => match &self.closest_hit_shader {
                Some(closest_hit) => closest_hit(ray, closest, triangle, depth),
                None => Err(ShadingError::MissingClosestHit),
            },
            None => Ok(match &self.miss_shader {
                Some(miss) => miss(ray),
                None => closest,
            }),
        }
    }

    /// Deterministic sub-pixel offset in `[0, 1) x [0, 1)`.
    ///
    /// The generator is created per call and seeded with `sample_index`, so
    /// the same index always yields the same offset.
    pub fn get_jitter(sample_index: u64) -> Vec2 {
        let mut rng = StdRng::seed_from_u64(sample_index);
        Vec2::new(rng.gen::<f32>(), rng.gen::<f32>())
    }

    /// Trace one primary ray per pixel and write its color into `frame`.
    ///
    /// Pixel `(x, y)` maps to `u = (x + jitter.x) / width - 0.5`,
    /// `v = (y + jitter.y) / height - 0.5` and the ray direction
    /// `normalize(forward + u * right + v * up)`. Rows are traced in parallel.
    #[allow(clippy::too_many_arguments)]
    pub fn ray_generation<RT>(
        &self,
        frame: &mut FrameBuffers<RT>,
        position: Vec3,
        forward: Vec3,
        right: Vec3,
        up: Vec3,
        depth: usize,
        sample_index: u64,
    ) -> ShadingResult<()>
    where
        RT: From<Color> + Send,
    {
        if self.closest_hit_shader.is_none() && self.any_hit_shader.is_none() {
            return Err(ShadingError::MissingClosestHit);
        }

        let width = frame.width();
        let height = frame.height();
        if frame.output().is_empty() {
            return Ok(());
        }

        let jitter = Self::get_jitter(sample_index);
        let start = std::time::Instant::now();

        frame
            .output_mut()
            .get_data_mut()
            .par_chunks_mut(width)
            .enumerate()
            .try_for_each(|(y, row)| {
                let v = (y as f32 + jitter.y) / height as f32 - 0.5;
                for (x, pixel) in row.iter_mut().enumerate() {
                    let u = (x as f32 + jitter.x) / width as f32 - 0.5;
                    let ray = Ray::new(position, forward + u * right + v * up);
                    let payload = self.trace_default(&ray, depth)?;
                    *pixel = RT::from(payload.color);
                }
                Ok(())
            })?;

        let counts = self.stats.snapshot();
        log::debug!(
            "Traced {}x{} in {:?} (sample {}): {} rays, {} triangle tests, {} volumes culled",
            width,
            height,
            start.elapsed(),
            sample_index,
            counts.rays,
            counts.triangle_tests,
            counts.volumes_culled
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracer_core::{Mesh, Vertex};

    /// Triangle facing the origin in the plane z = `z`, tinted by `diffuse`.
    fn wall(z: f32, diffuse: Color) -> Mesh {
        let v = |x, y| Vertex::new(Vec3::new(x, y, z), Vec3::NEG_Z, diffuse);
        Mesh::new(format!("wall{z}"), vec![v(-1.0, -1.0), v(1.0, -1.0), v(0.0, 1.0)], vec![0, 1, 2])
    }

    /// Three walls along +Z at distances 2, 5, 8, inserted far to near.
    fn stacked_scene() -> Scene {
        Scene::build(
            &[
                wall(8.0, Color::new(0.0, 0.0, 1.0)),
                wall(5.0, Color::new(0.0, 1.0, 0.0)),
                wall(2.0, Color::new(1.0, 0.0, 0.0)),
            ],
            vec![],
        )
    }

    fn forward_ray() -> Ray {
        Ray::new(Vec3::ZERO, Vec3::Z)
    }

    fn passthrough(_ray: &Ray, payload: Payload, _tri: &Triangle, _depth: usize) -> ShadingResult<Payload> {
        Ok(payload)
    }

    #[test]
    fn test_trace_returns_closest_hit() {
        let scene = stacked_scene();
        let tracer = Raytracer::new(&scene).with_closest_hit_shader(passthrough);

        let payload = tracer.trace(&forward_ray(), 1, 100.0, 0.0).unwrap();

        assert!((payload.t - 2.0).abs() < 1e-5);
        assert_eq!(payload.color, Color::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_trace_respects_window() {
        let scene = stacked_scene();
        let tracer = Raytracer::new(&scene).with_closest_hit_shader(passthrough);

        // Near wall excluded by min_t, far wall by max_t
        let payload = tracer.trace(&forward_ray(), 1, 6.0, 3.0).unwrap();
        assert!((payload.t - 5.0).abs() < 1e-5);

        let tracer = tracer.with_config(TracerConfig::default().with_window(3.0, 6.0));
        let payload = tracer.trace_default(&forward_ray(), 1).unwrap();
        assert!((payload.t - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_setters_replace_and_remove_shaders() {
        let scene = stacked_scene();
        let backwards = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let mut tracer = Raytracer::new(&scene).with_closest_hit_shader(passthrough);

        let payload = tracer.trace_default(&forward_ray(), 1).unwrap();
        assert!((payload.t - 2.0).abs() < 1e-5);
        assert_eq!(payload.color, Color::new(1.0, 0.0, 0.0));

        // An any-hit shader takes over: the far wall is scanned first
        tracer.set_any_hit_shader(Some(Box::new(|_ray: &Ray, mut payload: Payload, _tri: &Triangle| {
            payload.color = Color::ONE;
            payload
        })));
        let payload = tracer.trace_default(&forward_ray(), 1).unwrap();
        assert!((payload.t - 8.0).abs() < 1e-5);
        assert_eq!(payload.color, Color::ONE);

        tracer.set_any_hit_shader(None);
        let payload = tracer.trace_default(&forward_ray(), 1).unwrap();
        assert!((payload.t - 2.0).abs() < 1e-5);

        tracer.set_closest_hit_shader(None);
        assert_eq!(
            tracer.trace_default(&forward_ray(), 1),
            Err(ShadingError::MissingClosestHit)
        );

        tracer.set_miss_shader(Some(Box::new(|_ray: &Ray| Payload::with_color(Color::splat(0.5)))));
        assert_eq!(tracer.trace_default(&backwards, 1).unwrap().color, Color::splat(0.5));

        tracer.set_miss_shader(None);
        assert_eq!(tracer.trace_default(&backwards, 1).unwrap().t, DEFAULT_MAX_T);
    }

    #[test]
    fn test_closest_hit_receives_triangle_and_depth() {
        let scene = stacked_scene();
        let tracer = Raytracer::new(&scene).with_closest_hit_shader(|_ray, mut payload, tri, depth| {
            assert_eq!(depth, 3);
            assert_eq!(tri.a.z, 2.0);
            payload.color = Color::splat(0.25);
            Ok(payload)
        });

        let payload = tracer.trace_default(&forward_ray(), 3).unwrap();
        assert_eq!(payload.color, Color::splat(0.25));
    }

    #[test]
    fn test_miss_shader_and_sentinel() {
        let scene = stacked_scene();
        let backwards = Ray::new(Vec3::ZERO, Vec3::NEG_Z);

        // No miss shader: sentinel payload
        let tracer = Raytracer::new(&scene);
        let payload = tracer.trace(&backwards, 1, 100.0, 0.0).unwrap();
        assert_eq!(payload.t, 100.0);

        let tracer = Raytracer::new(&scene)
            .with_miss_shader(|_ray| Payload::with_color(Color::new(0.3, 0.5, 0.7)));
        let payload = tracer.trace(&backwards, 1, 100.0, 0.0).unwrap();
        assert_eq!(payload.color, Color::new(0.3, 0.5, 0.7));
    }

    #[test]
    fn test_hit_without_closest_hit_shader_fails() {
        let scene = stacked_scene();
        let tracer = Raytracer::new(&scene);

        assert_eq!(
            tracer.trace_default(&forward_ray(), 1),
            Err(ShadingError::MissingClosestHit)
        );
    }

    #[test]
    fn test_any_hit_exits_on_first_qualifying_hit() {
        let scene = stacked_scene();
        let calls = AtomicUsize::new(0);
        let tracer = Raytracer::new(&scene)
            .with_config(TracerConfig::default().with_culling(false))
            .with_any_hit_shader(|_ray, payload, _tri| {
                calls.fetch_add(1, Ordering::Relaxed);
                payload
            });

        let payload = tracer.trace(&forward_ray(), 1, 100.0, 0.0).unwrap();

        // Scan order is insertion order: the far wall qualifies first
        assert!((payload.t - 8.0).abs() < 1e-5);
        assert_eq!(calls.load(Ordering::Relaxed), 1);
        assert_eq!(tracer.stats().triangle_tests, 1);
    }

    #[test]
    fn test_full_scan_without_any_hit() {
        let scene = stacked_scene();
        let tracer = Raytracer::new(&scene)
            .with_config(TracerConfig::default().with_culling(false))
            .with_closest_hit_shader(passthrough);

        tracer.trace(&forward_ray(), 1, 100.0, 0.0).unwrap();
        assert_eq!(tracer.stats().triangle_tests, 3);
        assert_eq!(tracer.stats().rays, 1);
    }

    #[test]
    fn test_culling_skips_volumes_without_changing_result() {
        let scene = stacked_scene();
        let off_axis = Ray::new(Vec3::new(10.0, 0.0, 0.0), Vec3::Z);

        let culled = Raytracer::new(&scene).with_closest_hit_shader(passthrough);
        let unculled = Raytracer::new(&scene)
            .with_config(TracerConfig::default().with_culling(false))
            .with_closest_hit_shader(passthrough);

        assert_eq!(
            culled.trace(&off_axis, 1, 100.0, 0.0),
            unculled.trace(&off_axis, 1, 100.0, 0.0)
        );
        assert_eq!(culled.stats().volumes_culled, 3);
        assert_eq!(culled.stats().triangle_tests, 0);
        assert_eq!(unculled.stats().triangle_tests, 3);
    }

    #[test]
    fn test_culling_keeps_hits_through_vertices_and_edges() {
        const SAMPLES: usize = 10_000;
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let random_point = |rng: &mut StdRng, extent: f32| {
            Vec3::new(
                rng.gen_range(-extent..extent),
                rng.gen_range(-extent..extent),
                rng.gen_range(-extent..extent),
            )
        };

        let mut hits = 0;
        for sample in 0..SAMPLES {
            let corners = [
                random_point(&mut rng, 3.0),
                random_point(&mut rng, 3.0),
                random_point(&mut rng, 3.0),
            ];
            let v = |p| Vertex::new(p, Vec3::Y, Color::ONE);
            let mesh = Mesh::new("random", corners.iter().map(|&p| v(p)).collect(), vec![0, 1, 2]);
            let scene = Scene::build(&[mesh], vec![]);

            // Aim at a vertex, a point on an edge, or the interior
            let target = match sample % 3 {
                0 => corners[sample % 2],
                1 => corners[0].lerp(corners[1 + sample % 2], rng.gen::<f32>()),
                _ => {
                    let (a, b) = (rng.gen::<f32>(), rng.gen::<f32>());
                    let (a, b) = if a + b > 1.0 { (1.0 - a, 1.0 - b) } else { (a, b) };
                    corners[0] + (corners[1] - corners[0]) * a + (corners[2] - corners[0]) * b
                }
            };
            let direction = loop {
                let d = random_point(&mut rng, 1.0);
                if (0.1..=1.0).contains(&d.length()) {
                    break d.normalize();
                }
            };
            let ray = Ray::new(target - direction * 10.0, direction);

            let culled = Raytracer::new(&scene).with_closest_hit_shader(passthrough);
            let unculled = Raytracer::new(&scene)
                .with_config(TracerConfig::default().with_culling(false))
                .with_closest_hit_shader(passthrough);

            let expected = unculled.trace(&ray, 1, 100.0, 0.0);
            assert_eq!(culled.trace(&ray, 1, 100.0, 0.0), expected, "sample {sample}: {ray:?}");
            if matches!(expected, Ok(payload) if payload.t < 100.0) {
                hits += 1;
            }
        }

        assert!(hits > SAMPLES / 5, "only {hits} hits");
    }

    #[test]
    fn test_jitter_is_deterministic() {
        for k in [0, 1, 7, 12345, u64::MAX] {
            let a = Raytracer::get_jitter(k);
            let b = Raytracer::get_jitter(k);
            assert_eq!(a.x.to_bits(), b.x.to_bits());
            assert_eq!(a.y.to_bits(), b.y.to_bits());
        }
    }

    #[test]
    fn test_jitter_covers_unit_square() {
        let n = 4000;
        let mut quadrants = [0usize; 4];
        let mut sum = Vec2::ZERO;

        for k in 0..n {
            let j = Raytracer::get_jitter(k);
            assert!((0.0..1.0).contains(&j.x) && (0.0..1.0).contains(&j.y));
            sum += j;
            let q = (j.x >= 0.5) as usize + 2 * (j.y >= 0.5) as usize;
            quadrants[q] += 1;
        }

        let mean = sum / n as f32;
        assert!((mean.x - 0.5).abs() < 0.03, "mean {mean:?}");
        assert!((mean.y - 0.5).abs() < 0.03, "mean {mean:?}");
        for count in quadrants {
            // Expected n / 4 = 1000 per quadrant
            assert!((850..1150).contains(&count), "quadrants {quadrants:?}");
        }
    }

    #[test]
    fn test_ray_generation_writes_every_pixel() {
        let scene = stacked_scene();
        let tracer = Raytracer::new(&scene)
            .with_miss_shader(|_ray| Payload::with_color(Color::ZERO))
            .with_closest_hit_shader(passthrough);

        let mut frame: FrameBuffers<Color> = FrameBuffers::new(8, 6);
        frame.clear(Color::ONE);
        tracer
            .ray_generation(&mut frame, Vec3::ZERO, Vec3::Z, Vec3::X, Vec3::Y, 1, 1)
            .unwrap();

        // Central pixels see the near (red) wall
        assert_eq!(*frame.output().get_xy(4, 3), Color::new(1.0, 0.0, 0.0));
        // Nothing is left at the clear value
        assert!(frame.output().iter().all(|&c| c != Color::ONE));
        assert_eq!(tracer.stats().rays, 48);
    }

    #[test]
    fn test_ray_generation_is_reproducible() {
        let scene = stacked_scene();
        let tracer = Raytracer::new(&scene)
            .with_miss_shader(|ray| Payload::with_color(ray.direction()))
            .with_closest_hit_shader(passthrough);

        let render = |sample| {
            let mut frame: FrameBuffers<Color> = FrameBuffers::new(5, 4);
            tracer
                .ray_generation(&mut frame, Vec3::ZERO, Vec3::Z, Vec3::X * 4.0, Vec3::Y * 4.0, 1, sample)
                .unwrap();
            frame.into_output()
        };

        assert_eq!(render(3), render(3));
        assert_ne!(render(3), render(4));
    }

    #[test]
    fn test_ray_generation_without_shaders_fails() {
        let scene = stacked_scene();
        let tracer = Raytracer::new(&scene);
        let mut frame: FrameBuffers<Color> = FrameBuffers::new(2, 2);

        let result = tracer.ray_generation(&mut frame, Vec3::ZERO, Vec3::Z, Vec3::X, Vec3::Y, 1, 0);
        assert_eq!(result, Err(ShadingError::MissingClosestHit));
    }
}
