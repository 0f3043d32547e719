use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgGroup, Parser};

use value_report_pdf::config::parse_hex_color;
use value_report_pdf::generate::{
    DirectorySink, PregeneratedText, Profile, ReportPipeline, ReportRequest, build_prompt,
};
use value_report_pdf::model::Rgb;
use value_report_pdf::resume::looks_like_pdf;
use value_report_pdf::{Error, FontSet, Logo, ParsedResume, ReportConfig};

#[derive(Parser)]
#[command(name = "value-report-pdf")]
#[command(version)]
#[command(about = "Lay out a generated value-add report as a styled PDF", long_about = None)]
#[command(group(ArgGroup::new("profile").required(true).args(["linkedin", "resume", "resume_base64"])))]
struct Cli {
    /// Client name, used in the salutation and file name
    #[arg(long)]
    name: String,

    /// Client email
    #[arg(long)]
    email: String,

    /// Client LinkedIn profile URL
    #[arg(long, value_name = "URL")]
    linkedin: Option<String>,

    /// Client resume, PDF or plain text
    #[arg(long, value_name = "FILE")]
    resume: Option<PathBuf>,

    /// Client resume as a base64 PDF (optionally a data: URL) in a file
    #[arg(long, value_name = "FILE")]
    resume_base64: Option<PathBuf>,

    /// Generated report text ("-" reads stdin)
    #[arg(long, value_name = "FILE", default_value = "-")]
    input: PathBuf,

    /// Output PDF (defaults to the generated file name)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Also store the PDF in this directory
    #[arg(long, value_name = "DIR")]
    upload_dir: Option<PathBuf>,

    /// PNG or JPEG logo for the first page
    #[arg(long, value_name = "FILE", env = "VALUE_REPORT_LOGO")]
    logo: Option<PathBuf>,

    /// TrueType font for body text (requires --font-bold)
    #[arg(long, value_name = "FILE", env = "VALUE_REPORT_FONT_REGULAR", requires = "font_bold")]
    font_regular: Option<PathBuf>,

    /// TrueType font for headings (requires --font-regular)
    #[arg(long, value_name = "FILE", env = "VALUE_REPORT_FONT_BOLD", requires = "font_regular")]
    font_bold: Option<PathBuf>,

    /// Page background as hex, e.g. 0D4026
    #[arg(long, value_name = "HEX", env = "VALUE_REPORT_BACKGROUND", value_parser = parse_color)]
    background: Option<Rgb>,

    /// Salutation and header color as hex, e.g. F2CC33
    #[arg(long, value_name = "HEX", env = "VALUE_REPORT_ACCENT", value_parser = parse_color)]
    accent: Option<Rgb>,

    /// Note centered at the bottom of the last page
    #[arg(long, value_name = "TEXT")]
    footer: Option<String>,

    /// Print the generation prompt and exit
    #[arg(long)]
    print_prompt: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_color(val: &str) -> Result<Rgb, String> {
    parse_hex_color(val).ok_or_else(|| format!("expected 6 hex digits, got {val:?}"))
}

fn read_input(path: &Path) -> Result<String, Error> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

fn read_resume(path: &Path) -> Result<Profile, Error> {
    let bytes = std::fs::read(path)?;
    if looks_like_pdf(&bytes) {
        return Ok(Profile::ParsedResume(ParsedResume::from_pdf(&bytes)?));
    }
    String::from_utf8(bytes)
        .map(Profile::Resume)
        .map_err(|_| Error::Resume(format!("{} is neither a PDF nor UTF-8 text", path.display())))
}

fn run(cli: Cli) -> Result<(), Error> {
    let profile = match (&cli.linkedin, &cli.resume, &cli.resume_base64) {
        (Some(url), _, _) => Profile::LinkedIn(url.clone()),
        (None, Some(path), _) => read_resume(path)?,
        (None, None, Some(path)) => {
            Profile::ParsedResume(ParsedResume::from_base64(&std::fs::read_to_string(path)?)?)
        }
        (None, None, None) => {
            return Err(Error::InvalidRequest("missing linkedin URL or resume".into()));
        }
    };
    let request = ReportRequest {
        name: cli.name,
        email: cli.email,
        profile,
    };

    let mut config = ReportConfig::default();
    if let Some(bg) = cli.background {
        config.background = bg;
    }
    if let Some(accent) = cli.accent {
        config.styles = config.styles.with_accent(accent);
    }
    config.footer_note = cli.footer;

    if cli.print_prompt {
        request.validate()?;
        let prompt = build_prompt(&request, &config.section_titles);
        println!("{}\n\n{}", prompt.system, prompt.user);
        return Ok(());
    }

    let fonts = match (&cli.font_regular, &cli.font_bold) {
        (Some(regular), Some(bold)) => FontSet::from_files(regular, bold)?,
        _ => FontSet::builtin(),
    };
    let logo = cli.logo.as_deref().and_then(Logo::load);
    let generator = PregeneratedText(read_input(&cli.input)?);
    let sink = cli.upload_dir.map(DirectorySink::new);

    let mut pipeline =
        ReportPipeline::new(&generator, &config, &fonts).with_logo(logo.as_ref());
    if let Some(sink) = &sink {
        pipeline = pipeline.with_storage(sink);
    }
    let outcome = pipeline.run(&request)?;

    let output = cli
        .output
        .unwrap_or_else(|| PathBuf::from(&outcome.file_name));
    std::fs::write(&output, &outcome.pdf)?;
    println!("Wrote {} ({} bytes)", output.display(), outcome.pdf.len());
    if let Some(stored) = &outcome.stored {
        println!("Stored {} at {}", stored.id, stored.link);
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
