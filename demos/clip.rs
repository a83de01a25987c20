//! Runs a boolean operation and draws the result as an svg.
//!
//! Input files contain one polygon per line, as whitespace-separated `x,y`
//! pairs. A line containing only `--` separates the subject polygons from the
//! clip polygons.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context};
use clap::{Args, Parser, ValueEnum};
use svg::{node::element::Path as SvgPath, Document};

use scanclip::{generators, BinaryOp, ClipOptions, Clipper, FillRule, Paths, Point, PolyType};

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Op {
    Union,
    Intersection,
    Xor,
    Difference,
}

impl From<Op> for BinaryOp {
    fn from(op: Op) -> BinaryOp {
        match op {
            Op::Union => BinaryOp::Union,
            Op::Intersection => BinaryOp::Intersection,
            Op::Xor => BinaryOp::Xor,
            Op::Difference => BinaryOp::Difference,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Fill {
    EvenOdd,
    NonZero,
    Positive,
    Negative,
}

impl From<Fill> for FillRule {
    fn from(fill: Fill) -> FillRule {
        match fill {
            Fill::EvenOdd => FillRule::EvenOdd,
            Fill::NonZero => FillRule::NonZero,
            Fill::Positive => FillRule::Positive,
            Fill::Negative => FillRule::Negative,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Example {
    Checkerboard,
    SlantedCheckerboard,
    Slanties,
    Star,
}

#[derive(Parser)]
struct Cli {
    #[arg(long)]
    output: PathBuf,

    #[command(flatten)]
    input: Input,

    #[arg(long, value_enum, default_value = "union")]
    op: Op,

    #[arg(long, value_enum, default_value = "even-odd")]
    fill: Fill,

    #[arg(long)]
    strictly_simple: bool,

    #[arg(long)]
    preserve_collinear: bool,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct Input {
    input: Option<PathBuf>,

    #[arg(long)]
    example: Option<Example>,
}

fn parse_point(s: &str) -> anyhow::Result<Point> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| anyhow!("expected x,y but found {s:?}"))?;
    Ok(Point::new(x.trim().parse()?, y.trim().parse()?))
}

fn parse_contours(text: &str) -> anyhow::Result<(Paths, Paths)> {
    let mut subject = Vec::new();
    let mut clip = Vec::new();
    let mut in_clip = false;
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "--" {
            if in_clip {
                bail!("line {}: more than one separator", i + 1);
            }
            in_clip = true;
            continue;
        }
        let path = line
            .split_whitespace()
            .map(parse_point)
            .collect::<anyhow::Result<Vec<_>>>()
            .with_context(|| format!("line {}", i + 1))?;
        if in_clip {
            clip.push(path);
        } else {
            subject.push(path);
        }
    }
    Ok((subject, clip))
}

fn get_contours(input: &Input) -> anyhow::Result<(Paths, Paths)> {
    match (&input.input, &input.example) {
        (Some(path), None) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            parse_contours(&text)
        }
        (None, Some(example)) => Ok(match example {
            Example::Checkerboard => generators::checkerboard(10),
            Example::SlantedCheckerboard => generators::slanted_checkerboard(10),
            Example::Slanties => generators::slanties(10),
            Example::Star => (
                vec![generators::star((0, 0), 200.0, 7, 3)],
                vec![generators::star((50, 50), 150.0, 5, 2)],
            ),
        }),
        _ => bail!("exactly one of an input file or --example is required"),
    }
}

fn svg_path(paths: &Paths, color: &str, stroke_width: f64) -> SvgPath {
    let mut bez = kurbo::BezPath::new();
    for p in paths {
        bez.extend(scanclip::path_to_bez(p, true));
    }
    SvgPath::new()
        .set("stroke", color)
        .set("stroke-width", stroke_width)
        .set("stroke-linejoin", "round")
        .set("fill", color)
        .set("fill-opacity", 0.2)
        .set("fill-rule", "nonzero")
        .set("d", bez.to_svg())
}

pub fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args = Cli::parse();
    let (subject, clip) = get_contours(&args.input)?;

    let options = ClipOptions {
        strictly_simple: args.strictly_simple,
        preserve_collinear: args.preserve_collinear,
        ..ClipOptions::default()
    };
    let mut clipper = Clipper::new(options);
    clipper.add_paths(&subject, PolyType::Subject, true)?;
    clipper.add_paths(&clip, PolyType::Clip, true)?;
    let fill = FillRule::from(args.fill);
    let output = clipper.execute(args.op.into(), fill, fill)?;
    tracing::info!(contours = output.len(), "clipped");

    let all = subject.iter().chain(&clip).chain(&output).flatten();
    let min_x = all.clone().map(|p| p.x).min().unwrap_or(0) as f64;
    let max_x = all.clone().map(|p| p.x).max().unwrap_or(0) as f64;
    let min_y = all.clone().map(|p| p.y).min().unwrap_or(0) as f64;
    let max_y = all.map(|p| p.y).max().unwrap_or(0) as f64;
    let size = (max_x - min_x).max(max_y - min_y);
    let pad = 1.0 + size / 32.0;
    let stroke_width = size / 512.0;

    let width = max_x - min_x + 2.0 * pad;
    let document = Document::new()
        .set(
            "viewBox",
            (min_x - pad, min_y - pad, 2.0 * width, max_y - min_y + 2.0 * pad),
        )
        .add(svg_path(&subject, "blue", stroke_width))
        .add(svg_path(&clip, "red", stroke_width))
        .add(
            svg_path(&output, "black", stroke_width)
                .set("transform", format!("translate({width} 0)")),
        );

    svg::save(&args.output, &document)?;
    Ok(())
}
