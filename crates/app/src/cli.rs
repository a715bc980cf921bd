//! Command-line flags.
//!
//! `--gpu-backend=auto|vulkan|dx12|metal|gl`, `--show-fps[=on|off]`,
//! `--size=WxH`, `--width=N`, `--height=N`, `--light=x,y,z`.
//! Each `--model=PATH` starts a new model; `--at=x,y,z`, `--yaw=DEG`,
//! `--scale=S|x,y,z` and `--color=r,g,b` apply to the most recent one.
//! Without any `--model` the built-in demo scene is used.

use corelib::{Vec3, light::PointLight};
use platform::{ModelSpec, RunConfig};

pub fn parse_args<I>(args: I) -> RunConfig
where
    I: IntoIterator<Item = String>,
{
    let mut backends = wgpu::Backends::all(); // default = auto
    let mut show_fps = false;
    let mut w: Option<u32> = None;
    let mut h: Option<u32> = None;
    let mut light = PointLight::default();
    let mut models: Vec<ModelSpec> = Vec::new();

    for arg in args {
        if let Some(val) = arg.strip_prefix("--gpu-backend=") {
            backends = parse_backend(val);
        } else if arg == "--show-fps" {
            show_fps = true;
        } else if let Some(val) = arg.strip_prefix("--show-fps=") {
            show_fps = matches!(
                val.to_ascii_lowercase().as_str(),
                "1" | "true" | "on" | "yes"
            );
        } else if let Some(v) = arg.strip_prefix("--size=") {
            if let Some((sw, sh)) = v.split_once('x').or_else(|| v.split_once('X')) {
                if let (Ok(pw), Ok(ph)) = (sw.parse::<u32>(), sh.parse::<u32>()) {
                    w = Some(pw);
                    h = Some(ph);
                }
            }
        } else if let Some(v) = arg.strip_prefix("--width=") {
            w = v.parse().ok().or(w);
        } else if let Some(v) = arg.strip_prefix("--height=") {
            h = v.parse().ok().or(h);
        } else if let Some(v) = arg.strip_prefix("--light=") {
            match parse_vec3(v) {
                Some(p) => light.position = p,
                None => log::warn!("Ignoring malformed light position '{}'", v),
            }
        } else if let Some(path) = arg.strip_prefix("--model=") {
            models.push(ModelSpec::new(path));
        } else if let Some((key, val)) = model_option(&arg) {
            let Some(model) = models.last_mut() else {
                log::warn!("'{}' given before any --model; ignored", arg);
                continue;
            };
            let applied = match key {
                "at" => parse_vec3(val).map(|p| model.position = p),
                "yaw" => val
                    .parse::<f32>()
                    .ok()
                    .map(|deg| model.angle_y = deg.to_radians()),
                "scale" => parse_scale(val).map(|s| model.scale = s),
                "color" => parse_vec3(val).map(|c| model.color = c),
                _ => None,
            };
            if applied.is_none() {
                log::warn!("Ignoring malformed '{}'", arg);
            }
        }
    }

    RunConfig {
        backends,
        show_fps,
        width: w.unwrap_or(1280).max(1),
        height: h.unwrap_or(720).max(1),
        models: if models.is_empty() {
            demo_scene()
        } else {
            models
        },
        light,
    }
}

fn parse_backend(val: &str) -> wgpu::Backends {
    match val.to_ascii_lowercase().as_str() {
        "auto" => wgpu::Backends::all(),
        "vulkan" | "vk" => wgpu::Backends::VULKAN,
        "dx12" | "d3d12" => wgpu::Backends::DX12,
        "metal" | "mtl" => wgpu::Backends::METAL,
        "gl" | "opengl" | "gles" => wgpu::Backends::GL,
        other => {
            log::warn!("Unknown backend '{}', falling back to auto.", other);
            wgpu::Backends::all()
        }
    }
}

fn model_option(arg: &str) -> Option<(&str, &str)> {
    let (key, val) = arg.strip_prefix("--")?.split_once('=')?;
    matches!(key, "at" | "yaw" | "scale" | "color").then_some((key, val))
}

fn parse_vec3(v: &str) -> Option<Vec3> {
    let mut parts = v.split(',').map(|p| p.trim().parse::<f32>());
    let x = parts.next()?.ok()?;
    let y = parts.next()?.ok()?;
    let z = parts.next()?.ok()?;
    parts.next().is_none().then(|| Vec3::new(x, y, z))
}

fn parse_scale(v: &str) -> Option<Vec3> {
    v.parse::<f32>().ok().map(Vec3::splat).or_else(|| parse_vec3(v))
}

/// Three models under `assets/models`, spread along X.
pub fn demo_scene() -> Vec<ModelSpec> {
    let place = |path: &str, position: Vec3, scale: f32, color: Vec3| ModelSpec {
        position,
        scale: Vec3::splat(scale),
        color,
        ..ModelSpec::new(path)
    };
    vec![
        place(
            "assets/models/octahedron.obj",
            Vec3::new(-1.0, 0.0, 0.0),
            0.5,
            Vec3::new(0.9, 0.55, 0.2),
        ),
        place(
            "assets/models/cube.obj",
            Vec3::new(1.0, 0.0, 0.0),
            0.35,
            Vec3::new(0.2, 0.55, 0.9),
        ),
        place(
            "assets/models/ground.obj",
            Vec3::new(0.0, -0.6, 0.0),
            0.3,
            Vec3::new(0.2, 0.9, 0.2),
        ),
    ]
}
