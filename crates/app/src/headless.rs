use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use glam::Vec2;
use lookdev_app::{
    DemoLibrary, DisplayerEvent, FrameScheduler, LookDev, OffscreenDisplayer, PreviewPipeline,
    SessionSettings,
};
use lookdev_core::{
    Layout, MemoryAssetDatabase, SurfaceSize, ViewCompositionIndex, DEFAULT_CONFIG_PATH,
};
use render::{PreviewRenderer, RenderTexture};

const DEFAULT_OUTPUT: &str = "lookdev_composite.png";

struct HeadlessArgs {
    layout: Option<Layout>,
    size: SurfaceSize,
    first: Option<String>,
    second: Option<String>,
    env_first: Option<String>,
    env_second: Option<String>,
    out_path: PathBuf,
    config_path: PathBuf,
}

pub fn maybe_run_headless(args: &[String]) -> Result<bool, String> {
    if !args
        .iter()
        .any(|arg| arg == "--headless" || arg == "-headless")
    {
        return Ok(false);
    }

    let parsed = parse_headless_args(args)?;
    let composite = render_composite(&parsed)?;
    write_png(&composite, &parsed.out_path)?;
    tracing::info!("headless: wrote composite to {:?}", parsed.out_path);
    Ok(true)
}

fn render_composite(args: &HeadlessArgs) -> Result<RenderTexture, String> {
    let assets = Arc::new(MemoryAssetDatabase::new());
    let library = DemoLibrary::populate(&assets);
    let pipeline = Arc::new(PreviewPipeline::new(0));
    let settings = SessionSettings {
        config_path: args.config_path.clone(),
        ..SessionSettings::default()
    };
    let mut session = LookDev::new(
        settings,
        pipeline,
        assets.clone(),
        Box::new(PreviewRenderer::new()),
    );

    let mut scheduler = FrameScheduler::new();
    session
        .open(Box::new(OffscreenDisplayer::new(args.size)), &mut scheduler)
        .map_err(|err| err.to_string())?;
    while scheduler.take_one() {
        session.tick(&mut scheduler);
    }
    if !session.is_renderer_configured() {
        return Err("look-dev renderer was not configured".to_string());
    }

    if let Some(layout) = args.layout {
        session.dispatch(DisplayerEvent::LayoutChanged(layout));
    }
    for (name, index) in [
        (&args.first, ViewCompositionIndex::First),
        (&args.second, ViewCompositionIndex::Second),
    ] {
        let Some(name) = name else {
            continue;
        };
        let object = library
            .object(name)
            .ok_or_else(|| format!("unknown object {name}"))?;
        session.dispatch(DisplayerEvent::ChangingObjectInView {
            object: Some(object.clone()),
            index,
            local_pos: Vec2::ZERO,
        });
    }
    for (name, index) in [
        (&args.env_first, ViewCompositionIndex::First),
        (&args.env_second, ViewCompositionIndex::Second),
    ] {
        let Some(name) = name else {
            continue;
        };
        let environment = library
            .environment(name)
            .ok_or_else(|| format!("unknown environment {name}"))?;
        session.dispatch(DisplayerEvent::ChangingEnvironmentInView {
            object: Some(environment.clone()),
            index,
            local_pos: Vec2::ZERO,
        });
    }

    let composite = session
        .render_frame()
        .cloned()
        .ok_or_else(|| "nothing was rendered".to_string())?;
    session.dispatch(DisplayerEvent::Closed);
    Ok(composite)
}

fn parse_headless_args(args: &[String]) -> Result<HeadlessArgs, String> {
    let mut parsed = HeadlessArgs {
        layout: None,
        size: SurfaceSize::new(960, 540),
        first: None,
        second: None,
        env_first: None,
        env_second: None,
        out_path: PathBuf::from(DEFAULT_OUTPUT),
        config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
    };
    let mut iter = args.iter().skip(1);

    while let Some(arg) = iter.next() {
        let mut value = || {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("{arg} requires a value"))
        };
        match arg.as_str() {
            "--headless" | "-headless" => {}
            "--layout" => {
                let name = value()?;
                let layout = Layout::from_style_name(&name)
                    .ok_or_else(|| format!("unknown layout {name}"))?;
                parsed.layout = Some(layout);
            }
            "--size" => parsed.size = parse_size(&value()?)?,
            "--first" => parsed.first = Some(value()?),
            "--second" => parsed.second = Some(value()?),
            "--env-first" => parsed.env_first = Some(value()?),
            "--env-second" => parsed.env_second = Some(value()?),
            "--out" => parsed.out_path = PathBuf::from(value()?),
            "--config" => parsed.config_path = PathBuf::from(value()?),
            "--help" | "-h" => {
                print_headless_help();
                process::exit(0);
            }
            other => tracing::warn!("headless: ignoring argument {}", other),
        }
    }

    Ok(parsed)
}

fn parse_size(text: &str) -> Result<SurfaceSize, String> {
    let (width, height) = text
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("size must look like WxH, got {text}"))?;
    let width: u32 = width.trim().parse().map_err(|_| format!("bad width in {text}"))?;
    let height: u32 = height.trim().parse().map_err(|_| format!("bad height in {text}"))?;
    if width == 0 || height == 0 {
        return Err(format!("size must be non-zero, got {text}"));
    }
    Ok(SurfaceSize::new(width, height))
}

fn print_headless_help() {
    let layouts: Vec<_> = Layout::ALL.iter().map(|layout| layout.style_name()).collect();
    println!(
        "Headless mode options:\n  --headless | -headless\n  --layout <{}>\n  --size <WxH>\n  --first <object>\n  --second <object>\n  --env-first <environment>\n  --env-second <environment>\n  --out <png path>\n  --config <path>",
        layouts.join("|")
    );
}

fn write_png(composite: &RenderTexture, path: &Path) -> Result<(), String> {
    let size = composite.size();
    let image = image::RgbaImage::from_raw(size.width, size.height, composite.as_bytes().to_vec())
        .ok_or_else(|| "composite buffer has the wrong length".to_string())?;
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|err| err.to_string())?;
    }
    image.save(path).map_err(|err| err.to_string())
}
