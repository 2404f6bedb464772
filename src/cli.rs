//! Command Line Interface
//! Headless entry points for every tool. Without a subcommand the GUI opens.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use dts_toolkit::files::{gladiator, parse_folder_names, parse_lines, wind, CleanRule, FileKind};
use dts_toolkit::kpi::{run_coverage, CoverageQuery};
use dts_toolkit::pptx::{collect_pptx_in_folder, process_presentations, PictureTool};
use dts_toolkit::util::constants::{ALIGN_WEIGHTS, BORDER_WEIGHTS, MISSING_MARKER};
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dts-toolkit", version, about = "Drive-test desktop toolkit")]
pub struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Centre every picture on its slide and set its outline weight
    Align(PictureArgs),
    /// Give every picture a solid black outline
    Border(PictureArgs),
    /// RSRP/CINR coverage of every CSV under a directory
    Coverage {
        dir: PathBuf,
        /// RSRP column (repeatable)
        #[arg(long = "rsrp")]
        rsrp: Vec<String>,
        /// CINR column (repeatable)
        #[arg(long = "cinr")]
        cinr: Vec<String>,
        #[arg(long, allow_negative_numbers = true)]
        rsrp_min: Option<i64>,
        #[arg(long, allow_negative_numbers = true)]
        cinr_min: Option<i64>,
    },
    /// Copy the single CSV of each sub-folder, cleaning selected columns
    CleanCopy {
        src: PathBuf,
        dst: PathBuf,
        /// Column to clean (repeatable)
        #[arg(long = "column")]
        columns: Vec<String>,
        /// Cell value to blank out, or "missing" to drop empty rows
        #[arg(long, default_value = MISSING_MARKER, allow_hyphen_values = true)]
        value: String,
        /// Write .xlsx workbooks instead of CSV
        #[arg(long)]
        excel: bool,
    },
    /// Move loose CSV files into named folders
    Distribute {
        dir: PathBuf,
        /// Comma-separated folder names
        #[arg(long)]
        folders: String,
        #[arg(long)]
        per_folder: usize,
    },
    /// Rename the CSV files inside named folders
    Rename {
        dir: PathBuf,
        #[arg(long)]
        folders: String,
        /// Text file with one desired name per line
        #[arg(long)]
        names_file: PathBuf,
        #[arg(long)]
        excel: bool,
    },
    /// Copy selected files under new names
    Copy {
        src: PathBuf,
        dst: PathBuf,
        /// File name inside <SRC> (repeatable)
        #[arg(long = "file")]
        files: Vec<String>,
        /// New name, one per --file
        #[arg(long = "name")]
        names: Vec<String>,
        /// Sub-folder of <DST> to create and copy into
        #[arg(long)]
        new_folder: Option<String>,
    },
}

#[derive(Args, Debug)]
pub struct PictureArgs {
    /// Presentations to edit in place
    pub files: Vec<PathBuf>,
    /// Outline weight in points
    #[arg(long)]
    pub weight: Option<f64>,
    /// Also edit every .pptx directly inside this folder
    #[arg(long)]
    pub folder: Option<PathBuf>,
}

fn kind(excel: bool) -> FileKind {
    if excel {
        FileKind::Excel
    } else {
        FileKind::Csv
    }
}

fn print_line(line: &str) {
    println!("{line}");
}

fn run_pictures(args: PictureArgs, tool: impl Fn(f64) -> PictureTool, default_weight: f64) -> Result<bool> {
    let mut paths = args.files;
    if let Some(folder) = &args.folder {
        let found = collect_pptx_in_folder(folder)
            .with_context(|| format!("Failed to list {}", folder.display()))?;
        paths.extend(found);
    }
    if paths.is_empty() {
        bail!("No presentations selected.");
    }

    let tool = tool(args.weight.unwrap_or(default_weight));
    let report = process_presentations(&paths, tool, print_line)?;
    println!(
        "{} presentation(s) processed, {} failed, {} picture(s) edited",
        report.processed, report.failed, report.pictures
    );
    Ok(report.is_success())
}

/// Run one subcommand. `Ok(false)` means some items failed.
pub fn run(command: Command) -> Result<bool> {
    match command {
        Command::Align(args) => run_pictures(args, |weight_pt| PictureTool::Align { weight_pt }, ALIGN_WEIGHTS[0]),
        Command::Border(args) => run_pictures(args, |weight_pt| PictureTool::Border { weight_pt }, BORDER_WEIGHTS[0]),
        Command::Coverage {
            dir,
            rsrp,
            cinr,
            rsrp_min,
            cinr_min,
        } => {
            let threshold = |v: Option<i64>| v.map(|v| v.to_string()).unwrap_or_default();
            let query = CoverageQuery::from_form(&rsrp, &cinr, &threshold(rsrp_min), &threshold(cinr_min))?;
            let (report, _) = run_coverage(&dir, &query, print_line)?;
            if report.skipped > 0 {
                println!("{} file(s) had none of the selected columns", report.skipped);
            }
            Ok(report.warnings.is_empty())
        }
        Command::CleanCopy {
            src,
            dst,
            columns,
            value,
            excel,
        } => {
            let rule = CleanRule::from_form(&columns, &value);
            let report = gladiator::copy_and_clean(&src, &dst, kind(excel), &rule, print_line)?;
            Ok(report.is_success())
        }
        Command::Distribute {
            dir,
            folders,
            per_folder,
        } => {
            let folders = parse_folder_names(&folders);
            let report = gladiator::distribute_into_folders(&dir, &folders, per_folder, print_line)?;
            Ok(report.is_success())
        }
        Command::Rename {
            dir,
            folders,
            names_file,
            excel,
        } => {
            let names = fs::read_to_string(&names_file)
                .with_context(|| format!("Failed to read {}", names_file.display()))?;
            let report = gladiator::rename_in_folders(
                &dir,
                &parse_folder_names(&folders),
                &parse_lines(&names),
                kind(excel),
                print_line,
            )?;
            Ok(report.is_success())
        }
        Command::Copy {
            src,
            dst,
            files,
            names,
            new_folder,
        } => {
            let report = wind::copy_selected(&src, &dst, &files, &names, new_folder.as_deref(), print_line)?;
            Ok(report.is_success())
        }
    }
}
