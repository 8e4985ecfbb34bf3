use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "cvpress", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the available templates.
    Templates,
    /// Render the preview as a PNG.
    Preview(PreviewArgs),
    /// Export the résumé as a single-page PDF.
    Export(ExportArgs),
}

#[derive(Parser, Debug)]
struct FormArgs {
    /// Input record JSON (camelCase field names). Starts from an empty record when omitted.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    /// Template id (`template1`..`template5`) or number.
    #[arg(long, default_value = "template1")]
    template: cvpress::TemplateId,

    /// Profile photo file.
    #[arg(long)]
    photo: Option<PathBuf>,

    /// Field edit `field=value`, applied in order after loading the record.
    #[arg(long = "set", value_parser = parse_edit)]
    edits: Vec<(cvpress::Field, String)>,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    #[command(flatten)]
    form: FormArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Device pixels per logical pixel.
    #[arg(long, default_value_t = cvpress::DEFAULT_SCALE)]
    scale: f32,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    #[command(flatten)]
    form: FormArgs,

    /// Directory receiving `{first}_{last}_CV.pdf`.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Device pixels per logical pixel (overrides `CVPRESS_SCALE`).
    #[arg(long)]
    scale: Option<f32>,

    /// Page width in millimetres (overrides `CVPRESS_PAGE_WIDTH_MM`).
    #[arg(long)]
    page_width_mm: Option<f64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Templates => cmd_templates(),
        Command::Preview(args) => cmd_preview(args),
        Command::Export(args) => cmd_export(args),
    }
}

fn parse_edit(raw: &str) -> Result<(cvpress::Field, String), String> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected field=value, got '{raw}'"))?;
    let field = field.parse::<cvpress::Field>().map_err(|e| e.to_string())?;
    Ok((field, value.replace("\\n", "\n")))
}

fn read_record_json(path: &Path) -> anyhow::Result<cvpress::ResumeRecord> {
    let f = File::open(path).with_context(|| format!("open record '{}'", path.display()))?;
    let r = BufReader::new(f);
    let record: cvpress::ResumeRecord =
        serde_json::from_reader(r).with_context(|| "parse record JSON")?;
    Ok(record)
}

fn load_form(args: &FormArgs) -> anyhow::Result<cvpress::FormState> {
    let record = match &args.in_path {
        Some(path) => read_record_json(path)?,
        None => cvpress::ResumeRecord::default(),
    };
    let mut state = cvpress::FormState::with_record(record);
    for (field, value) in &args.edits {
        state.update_field(*field, value.as_str());
    }
    if let Some(path) = &args.photo {
        let upload = cvpress::ImageUpload::from_path(path)?;
        if !state.update_image(&upload) {
            tracing::warn!(path = %path.display(), mime = %upload.mime, "photo ignored: not an image");
        }
    }
    state.select_template(args.template);
    Ok(state)
}

fn make_shaper() -> anyhow::Result<cvpress::ParleyShaper> {
    let fonts = cvpress::FontSet::discover(&[]).context("discover fonts")?;
    Ok(cvpress::ParleyShaper::new(fonts))
}

fn cmd_templates() -> anyhow::Result<()> {
    for t in cvpress::TemplateId::ALL {
        let d = t.descriptor();
        println!("{}\t{}\t{}px", t.id(), t.display_name(), d.width);
    }
    Ok(())
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let state = load_form(&args.form)?;
    let missing = state.missing_required();
    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(|f| f.name()).collect();
        tracing::warn!(missing = %names.join(", "), "required fields are blank");
    }

    let settings = cvpress::RenderSettings {
        scale: args.scale,
        ..cvpress::RenderSettings::default()
    };
    let mut shaper = make_shaper()?;
    let frame = cvpress::rasterize(&state.preview(), &mut shaper, &settings)?;

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &args.out,
        &frame.to_straight_rgba8(),
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let state = load_form(&args.form)?;
    if !state.can_export() {
        anyhow::bail!("first name and last name are required to export");
    }

    let mut settings = cvpress::ExportSettings::from_env();
    if let Some(scale) = args.scale {
        settings.render.scale = scale;
    }
    if let Some(width) = args.page_width_mm {
        settings.page_width_mm = width;
    }

    let mut shaper = make_shaper()?;
    match cvpress::export_pdf(&state, &mut shaper, &settings, &args.out_dir) {
        Ok(outcome) => {
            eprintln!(
                "wrote {} ({:.1} x {:.1} mm)",
                outcome.path.display(),
                outcome.page.width_mm,
                outcome.page.height_mm
            );
            Ok(())
        }
        Err(err) => {
            eprintln!("PDF generation failed, please try again.");
            Err(anyhow::Error::new(err).context("export PDF"))
        }
    }
}
