use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;

use tinyshade::prelude::*;
use tinyshade::render::DrawStats;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ShaderKind {
    Flat,
    Gouraud,
    Phong,
    Unlit,
}

/// tinyshade - render an OBJ model to an image on the CPU
#[derive(Parser, Debug)]
#[command(name = "tinyshade", version, about = "CPU software rasterizer")]
struct Args {
    /// Path to the OBJ file. Texture maps named <stem>_diffuse.tga,
    /// <stem>_nm.tga and <stem>_spec.tga are picked up from the same directory.
    obj: PathBuf,

    /// Output image (format from extension)
    #[arg(short, long, default_value = "output.png")]
    output: PathBuf,

    /// Also write a grayscale depth image
    #[arg(long)]
    depth: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = ShaderKind::Phong)]
    shader: ShaderKind,

    #[arg(long, default_value_t = 800)]
    width: u32,

    #[arg(long, default_value_t = 800)]
    height: u32,

    /// Vertical field of view in degrees
    #[arg(long, default_value_t = 45.0)]
    fov: f32,

    /// Use the one-parameter distance projection instead of a frustum
    #[arg(long)]
    distance_projection: bool,

    /// Tilt the model around its horizontal axis, in degrees
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    rotate_x: f32,

    /// Turn the model around its vertical axis, in degrees
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    rotate_y: f32,

    /// Roll the model around the viewing axis, in degrees
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    rotate_z: f32,

    /// Uniform scale about the model's center
    #[arg(long, default_value_t = 1.0)]
    scale: f32,

    /// Skip triangles facing away from the camera
    #[arg(long)]
    cull: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp_millis()
        .init();

    anyhow::ensure!(
        args.width > 0 && args.height > 0,
        "image size must be positive, got {}x{}",
        args.width,
        args.height
    );

    let mut model = Model::from_obj(&args.obj)
        .with_context(|| format!("Failed to load model {}", args.obj.display()))?;
    anyhow::ensure!(args.scale > 0.0, "scale must be positive, got {}", args.scale);
    model
        .transform_mut()
        .rotate_x(args.rotate_x.to_radians())
        .rotate_y(args.rotate_y.to_radians())
        .rotate_z(args.rotate_z.to_radians())
        .set_scale_uniform(args.scale);

    let (min, max) = model
        .bounds()
        .with_context(|| format!("Model {} has no vertices", args.obj.display()))?;
    let center = (min + max) * 0.5;
    let radius = ((max - min) * 0.5).magnitude();
    let camera = Camera::framing(min, max, args.fov);
    info!(
        "Framing {} faces: center {:?}, radius {:.3}, eye {:?}",
        model.face_count(),
        center,
        radius,
        camera.eye()
    );

    let projection = if args.distance_projection {
        camera.distance_projection()?
    } else {
        let distance = camera.distance();
        let near = (distance - radius * 2.0).max(distance * 0.01);
        let far = distance + radius * 2.0;
        let aspect = args.width as f32 / args.height as f32;
        Projection::perspective(args.fov, aspect, near, far)?
    };
    match (projection.fov_y(), projection.clip_planes()) {
        (Some(fov_y), Some((near, far))) => info!(
            "Perspective projection: fov {:.1} deg, near {near:.3}, far {far:.3}",
            fov_y.to_degrees()
        ),
        _ => {
            if let Some(distance) = projection.focal_distance() {
                info!("Distance projection: focal distance {distance:.3}");
            }
        }
    }

    // Spin and scale about the model's own center, not the world origin.
    let model_matrix = Mat4::translation(center.x, center.y, center.z)
        * model.transform().to_matrix()
        * Mat4::translation(-center.x, -center.y, -center.z);

    let uniforms = Uniforms::new(args.width, args.height)
        .with_model(model_matrix)
        .with_camera(&camera)
        .with_projection(projection.matrix())
        .with_light(DirectionalLight::new(Vec3::new(-1.0, -1.0, -1.0)));

    let settings = RenderSettings {
        cull_mode: if args.cull { CullMode::Back } else { CullMode::None },
        ..RenderSettings::default()
    };
    let mut renderer = Renderer::with_settings(args.width, args.height, settings);

    let faces = model.face_count();
    let stats = match args.shader {
        ShaderKind::Flat => renderer.draw(&uniforms, &mut FlatShader::new(&model), faces),
        ShaderKind::Gouraud => renderer.draw(&uniforms, &mut GouraudShader::new(&model), faces),
        ShaderKind::Phong => renderer.draw(&uniforms, &mut PhongShader::new(&model), faces),
        ShaderKind::Unlit => renderer.draw(&uniforms, &mut UnlitShader::new(&model), faces),
    };
    report(args.shader, &stats);

    let framebuffer = renderer.into_framebuffer();
    framebuffer
        .save(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    if let Some(depth) = &args.depth {
        framebuffer
            .save_depth(depth)
            .with_context(|| format!("Failed to write {}", depth.display()))?;
    }

    Ok(())
}

fn report(shader: ShaderKind, stats: &DrawStats) {
    info!(
        "{:?}: {}/{} faces rasterized, {} pixels written",
        shader, stats.rasterized, stats.faces, stats.pixels_written
    );
}
