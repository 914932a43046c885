//! yolosplit: turn a folder of labeled images into a YOLO dataset.
//!
//! Images and their YOLO label files are partitioned into train, test and
//! val splits with a seeded shuffle, copied into
//! `<dataset>/{images,labels}/{train,test,val}/`, and described by a
//! `data.yaml` manifest.
//!
//! # Modules
//!
//! - [`split`]: ratio validation, file discovery and the split itself
//! - [`layout`]: dataset directory tree creation
//! - [`copy`]: copying image/label pairs into their split directories
//! - [`classes`]: class list loading
//! - [`manifest`]: `data.yaml` generation
//! - [`pipeline`]: the whole run, start to finish
//! - [`logging`]: run log setup
//! - [`error`]: error types

pub mod classes;
pub mod copy;
pub mod error;
pub mod layout;
pub mod logging;
pub mod manifest;
pub mod pipeline;
pub mod split;

use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

use clap::Parser;
use tracing::info;

pub use error::{DatasetError, ErrorCategory};

use pipeline::DatasetOptions;
use split::{DiscoveryOrder, DEFAULT_SEED};

/// The yolosplit CLI application.
#[derive(Debug, Parser)]
#[command(name = "yolosplit")]
#[command(version, about = "Generate YOLO datasets from images and YOLO annotations")]
struct Cli {
    /// Directory containing the source images.
    #[arg(long, env = "YOLOSPLIT_IMAGES_PATH", default_value = "./images")]
    images_path: PathBuf,

    /// Directory containing one YOLO `.txt` label per image.
    #[arg(long, env = "YOLOSPLIT_LABELS_PATH", default_value = "./labels")]
    labels_path: PathBuf,

    /// Root of the dataset to create.
    #[arg(long, env = "YOLOSPLIT_DATASET_PATH", default_value = "./dataset")]
    dataset_path: PathBuf,

    /// Text file with one class name per line.
    #[arg(long, env = "YOLOSPLIT_CLASS_FILE", default_value = "./classes.txt")]
    class_file: PathBuf,

    /// Train split ratio, e.g. 0.8.
    #[arg(long, env = "YOLOSPLIT_TRAIN")]
    train: Option<f64>,

    /// Test split ratio, e.g. 0.1.
    #[arg(long, env = "YOLOSPLIT_TEST")]
    test: Option<f64>,

    /// Validation split ratio, e.g. 0.1.
    #[arg(long, env = "YOLOSPLIT_VAL")]
    val: Option<f64>,

    /// Seed for the shuffle.
    #[arg(long, env = "YOLOSPLIT_SEED", default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Where to write the manifest. An existing file is never overwritten.
    #[arg(long, env = "YOLOSPLIT_MANIFEST_PATH", default_value = manifest::DEFAULT_MANIFEST_PATH)]
    manifest_path: PathBuf,

    /// Run log, appended to on every run.
    #[arg(long, env = "YOLOSPLIT_LOG_FILE", default_value = logging::DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    /// Sort discovered files by name so the split does not depend on
    /// directory listing order.
    #[arg(long, env = "YOLOSPLIT_SORT_FILES")]
    sort_files: bool,
}

impl From<Cli> for DatasetOptions {
    fn from(cli: Cli) -> Self {
        Self {
            images_path: cli.images_path,
            labels_path: cli.labels_path,
            dataset_path: cli.dataset_path,
            class_file: cli.class_file,
            manifest_path: cli.manifest_path,
            train: cli.train,
            test: cli.test,
            val: cli.val,
            seed: cli.seed,
            order: if cli.sort_files {
                DiscoveryOrder::Sorted
            } else {
                DiscoveryOrder::FileSystem
            },
        }
    }
}

/// Run the yolosplit CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), DatasetError> {
    run_from(std::env::args_os())
}

/// Run the CLI with an explicit argument list (program name first).
pub fn run_from<I, T>(args: I) -> Result<(), DatasetError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let raw: Vec<OsString> = args.into_iter().map(Into::into).collect();
    let forwarded = forwarded_args(&raw);
    let cli = Cli::parse_from(&forwarded);

    logging::init_logging(&cli.log_file)?;
    info!("Command line arguments received: {:?}", &forwarded[1..]);
    info!("Parsed arguments: {:?}", cli);

    pipeline::create_dataset(&cli.into())?;
    Ok(())
}

/// Keep the program name plus everything after the first bare `--`, or the
/// whole list when there is none. Host applications that embed the tool pass
/// their own flags before the `--`.
fn forwarded_args(raw: &[OsString]) -> Vec<OsString> {
    let program = raw
        .first()
        .cloned()
        .unwrap_or_else(|| OsString::from("yolosplit"));

    match raw
        .iter()
        .skip(1)
        .position(|arg| arg.as_os_str() == OsStr::new("--"))
    {
        Some(index) => std::iter::once(program)
            .chain(raw[index + 2..].iter().cloned())
            .collect(),
        None if raw.is_empty() => vec![program],
        None => raw.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn os(args: &[&str]) -> Vec<OsString> {
        args.iter().map(OsString::from).collect()
    }

    #[test]
    fn args_after_double_dash_are_forwarded() {
        let forwarded = forwarded_args(&os(&["host", "--background", "--", "--train", "0.8"]));
        assert_eq!(forwarded, os(&["host", "--train", "0.8"]));
    }

    #[test]
    fn args_without_double_dash_pass_through() {
        let forwarded = forwarded_args(&os(&["yolosplit", "--train", "0.8"]));
        assert_eq!(forwarded, os(&["yolosplit", "--train", "0.8"]));
        assert_eq!(forwarded_args(&[]), os(&["yolosplit"]));
    }

    #[test]
    fn cli_defaults_match_conventional_layout() {
        let cli = Cli::try_parse_from(["yolosplit"]).expect("parse defaults");
        let opts: DatasetOptions = cli.into();
        let defaults = DatasetOptions::default();

        assert_eq!(opts.images_path, defaults.images_path);
        assert_eq!(opts.labels_path, defaults.labels_path);
        assert_eq!(opts.dataset_path, defaults.dataset_path);
        assert_eq!(opts.class_file, defaults.class_file);
        assert_eq!(opts.manifest_path, defaults.manifest_path);
        assert_eq!(opts.seed, 59);
        assert!(opts.train.is_none() && opts.test.is_none() && opts.val.is_none());
        assert_eq!(opts.order, DiscoveryOrder::FileSystem);
    }

    #[test]
    fn cli_parses_ratios_and_sorting() {
        let cli = Cli::try_parse_from([
            "yolosplit",
            "--train",
            "0.8",
            "--test",
            "0.1",
            "--val",
            "0.1",
            "--sort-files",
            "--seed",
            "7",
        ])
        .expect("parse args");
        let opts: DatasetOptions = cli.into();

        assert_eq!(opts.train, Some(0.8));
        assert_eq!(opts.test, Some(0.1));
        assert_eq!(opts.val, Some(0.1));
        assert_eq!(opts.seed, 7);
        assert_eq!(opts.order, DiscoveryOrder::Sorted);
    }
}
