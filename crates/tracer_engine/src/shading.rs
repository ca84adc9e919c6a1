//! Stock shaders: constant background, Lambert with shadow rays, and the
//! occlusion any-hit used by shadow tracers.

use tracer_core::{Color, Light};
use tracer_math::Ray;

use crate::{Payload, Raytracer, Scene, ShadingResult, Triangle, TracerConfig};

/// Background of the default miss shader.
pub const DEFAULT_BACKGROUND: Color = Color::new(0.3, 0.5, 0.7);

/// Miss shader returning `color` (with `t = 0`).
pub fn constant_miss(color: Color) -> impl Fn(&Ray) -> Payload + Send + Sync {
    move |_ray| Payload::with_color(color)
}

/// Any-hit shader that reports an occluder at `t = 0` as soon as one is found.
pub fn occlusion_any_hit() -> impl Fn(&Ray, Payload, &Triangle) -> Payload + Send + Sync {
    |_ray, mut payload, _triangle| {
        payload.t = 0.0;
        payload
    }
}

/// Closest-hit shader: ambient + emissive, plus diffuse Lambert from every
/// light that `shadow` finds unoccluded.
///
/// A shadow ray runs from the hit point towards each light with its window
/// capped at the light distance, so geometry behind the light never occludes
/// it. The light counts when the shadow trace's `t` is not less than that
/// distance.
pub fn lambert_closest_hit<'a>(
    lights: &'a [Light],
    shadow: Raytracer<'a>,
) -> impl Fn(&Ray, Payload, &Triangle, usize) -> ShadingResult<Payload> + Send + Sync + 'a {
    move |ray, mut payload, triangle, depth| {
        let hit_position = ray.at(payload.t);
        let normal = triangle.interpolate_normal(payload.barycentric);
        let min_t = shadow.config().min_t;

        let mut color = triangle.ambient + triangle.emissive;
        for light in lights {
            let to_light = light.position - hit_position;
            let distance = to_light.length();
            let shadow_ray = Ray::new(hit_position, to_light);
            let shadow_payload = shadow.trace(&shadow_ray, depth, distance, min_t)?;

            if shadow_payload.t >= distance {
                let intensity = normal.dot(shadow_ray.direction()).max(0.0);
                color += triangle.diffuse * light.color * intensity;
            }
        }

        payload.color = color;
        Ok(payload)
    }
}

/// Primary tracer over `scene` with the stock shaders installed: constant
/// `background` on miss, Lambert closest-hit over the scene's lights, and a
/// second tracer with only [`occlusion_any_hit`] for the shadow rays.
///
/// Both tracers count into the same [`TraceStats`](crate::TraceStats), so the
/// returned tracer's `stats()` include every shadow ray.
pub fn lambert_pipeline(scene: &Scene, config: TracerConfig, background: Color) -> Raytracer<'_> {
    let shadow = Raytracer::new(scene)
        .with_config(config)
        .with_any_hit_shader(occlusion_any_hit());
    let stats = shadow.shared_stats();

    Raytracer::new(scene)
        .with_config(config)
        .with_stats(stats)
        .with_miss_shader(constant_miss(background))
        .with_closest_hit_shader(lambert_closest_hit(scene.lights(), shadow))
}
